//! Event-log transformer: filters activity events down to plays, derives
//! the `users` dimension and a canonical UTC timestamp per event.

use crate::records::{LogEvent, User};
use anyhow::{bail, Result};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;

/// Page value that marks a play event.
const PLAY_PAGE: &str = "NextSong";

/// A play event together with its canonical timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayEvent {
    pub event: LogEvent,
    pub start_time: DateTime<Utc>,
}

/// Keep only events whose `page` is `NextSong`.
pub fn filter_plays(events: Vec<LogEvent>) -> Vec<LogEvent> {
    events
        .into_iter()
        .filter(|event| event.page.as_deref() == Some(PLAY_PAGE))
        .collect()
}

/// Derive the `users` dimension from the filtered play events.
///
/// One row per user_id: the row carries the attributes of the user's most
/// recent event (greatest `ts`; ties broken by the greatest remaining
/// tuple). The reduction is a commutative max, so the result does not
/// depend on input order. Events without a user_id (null or the empty
/// logged-out marker) are excluded.
pub fn build_users(plays: &[LogEvent]) -> Vec<User> {
    let mut latest: HashMap<&str, &LogEvent> = HashMap::new();
    for event in plays {
        let Some(user_id) = event.user_id.as_deref() else {
            continue;
        };
        if user_id.is_empty() {
            continue;
        }
        let replace = match latest.get(user_id) {
            Some(current) => event_rank(event) > event_rank(current),
            None => true,
        };
        if replace {
            latest.insert(user_id, event);
        }
    }

    let mut users: Vec<User> = latest
        .into_iter()
        .map(|(user_id, event)| User {
            user_id: user_id.to_string(),
            first_name: event.first_name.clone(),
            last_name: event.last_name.clone(),
            gender: event.gender.clone(),
            level: event.level.clone(),
        })
        .collect();
    users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
    users
}

/// Total order used to pick the winning event per user. `ts` dominates;
/// the remaining fields only break exact-timestamp ties deterministically.
fn event_rank(
    event: &LogEvent,
) -> (
    Option<i64>,
    &Option<String>,
    &Option<String>,
    &Option<String>,
    &Option<String>,
) {
    (
        event.ts,
        &event.level,
        &event.first_name,
        &event.last_name,
        &event.gender,
    )
}

/// Attach the canonical timestamp to every play event with a non-null
/// `ts`, interpreting `ts` as milliseconds since the epoch in UTC.
pub fn with_start_times(plays: &[LogEvent]) -> Result<Vec<PlayEvent>> {
    let mut timestamped = Vec::with_capacity(plays.len());
    for event in plays {
        let Some(ts) = event.ts else {
            continue;
        };
        let Some(start_time) = Utc.timestamp_millis_opt(ts).single() else {
            bail!("Event timestamp {} is out of range", ts);
        };
        timestamped.push(PlayEvent {
            event: event.clone(),
            start_time,
        });
    }
    Ok(timestamped)
}
