//! Fact-table joiner: reconstructs the `songplays` fact table by joining
//! play events against the song catalog on natural keys.
//!
//! The two datasets share no foreign key, so the join predicate is
//! `event.artist == catalog.artist_name AND event.song == catalog.title`.
//! Events without a catalog match are dropped and counted; duplicate
//! natural keys on the catalog side fan out into one row per match.
//! Exact-duplicate rows are removed before surrogate ids are assigned, so
//! the dedup actually collapses rows instead of seeing every row made
//! unique by its id.

use crate::records::{SongPlay, SongRecord};
use crate::transform::dedup::dedup_records;
use crate::transform::events::PlayEvent;
use chrono::{DateTime, Datelike, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Counters describing one join run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    /// Events with at least one catalog match.
    pub matched_events: usize,
    /// Events with no catalog match, dropped from the fact table.
    pub unmatched_events: usize,
    /// Exact-duplicate join rows removed before id assignment.
    pub duplicate_rows_removed: usize,
}

/// A fact row before its surrogate id is assigned; exact-duplicate
/// removal operates on this shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct JoinRow {
    start_time: DateTime<Utc>,
    user_id: Option<String>,
    level: Option<String>,
    song_id: Option<String>,
    artist_id: Option<String>,
    session_id: Option<i64>,
    location: Option<String>,
    user_agent: Option<String>,
}

/// Join play events against the raw deduplicated catalog records and
/// assign surrogate ids.
///
/// Ids are a strictly increasing counter in post-dedup input order,
/// unique across the full output set.
pub fn build_songplays(plays: &[PlayEvent], catalog: &[SongRecord]) -> (Vec<SongPlay>, JoinStats) {
    // Index the catalog by its natural key. Duplicate keys are kept so the
    // join fans out, one row per matching catalog record.
    let mut by_natural_key: HashMap<(&str, &str), Vec<&SongRecord>> = HashMap::new();
    for record in catalog {
        if let (Some(artist_name), Some(title)) = (&record.artist_name, &record.title) {
            by_natural_key
                .entry((artist_name.as_str(), title.as_str()))
                .or_default()
                .push(record);
        }
    }

    let mut stats = JoinStats::default();
    let mut rows = Vec::new();
    for play in plays {
        let matches = match (&play.event.artist, &play.event.song) {
            (Some(artist), Some(song)) => by_natural_key.get(&(artist.as_str(), song.as_str())),
            _ => None,
        };
        let Some(matches) = matches else {
            stats.unmatched_events += 1;
            continue;
        };
        stats.matched_events += 1;
        for record in matches {
            rows.push(JoinRow {
                start_time: play.start_time,
                user_id: play.event.user_id.clone(),
                level: play.event.level.clone(),
                song_id: record.song_id.clone(),
                artist_id: record.artist_id.clone(),
                session_id: play.event.session_id,
                location: play.event.location.clone(),
                user_agent: play.event.user_agent.clone(),
            });
        }
    }

    let before = rows.len();
    let rows = dedup_records(rows);
    stats.duplicate_rows_removed = before - rows.len();
    debug!(
        "Join matched {} events, dropped {} unmatched, removed {} duplicate rows",
        stats.matched_events, stats.unmatched_events, stats.duplicate_rows_removed
    );

    let songplays = rows
        .into_iter()
        .enumerate()
        .map(|(id, row)| SongPlay {
            songplay_id: id as u64,
            start_time: row.start_time,
            month: row.start_time.month(),
            year: row.start_time.year(),
            user_id: row.user_id,
            level: row.level,
            song_id: row.song_id,
            artist_id: row.artist_id,
            session_id: row.session_id,
            location: row.location,
            user_agent: row.user_agent,
        })
        .collect();

    (songplays, stats)
}
