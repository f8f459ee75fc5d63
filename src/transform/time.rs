//! Time-dimension builder: expands each distinct play timestamp into
//! calendar attributes.

use crate::records::TimeEntry;
use crate::transform::events::PlayEvent;
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::collections::HashSet;

/// Build the `time` dimension: one row per distinct `start_time` present
/// in the play events (not one per event).
pub fn build_time(plays: &[PlayEvent]) -> Vec<TimeEntry> {
    let mut distinct: Vec<DateTime<Utc>> = plays
        .iter()
        .map(|play| play.start_time)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    distinct.sort();
    distinct.into_iter().map(time_entry).collect()
}

/// Derive every calendar attribute from the timestamp alone.
///
/// `week` is the ISO week-of-year; `weekday` is numbered 1 = Sunday
/// through 7 = Saturday.
pub fn time_entry(start_time: DateTime<Utc>) -> TimeEntry {
    TimeEntry {
        start_time,
        hour: start_time.hour(),
        day: start_time.day(),
        week: start_time.iso_week().week(),
        month: start_time.month(),
        year: start_time.year(),
        weekday: start_time.weekday().num_days_from_sunday() + 1,
    }
}
