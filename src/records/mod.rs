//! Row types for the raw inputs and the star-schema outputs.
//!
//! Raw records keep every field optional because the source files are
//! semi-structured JSON lines with nulls and absent keys. Output rows carry
//! a non-null primary key; nullability of the remaining columns mirrors the
//! warehouse schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Bitwise view of an optional float, so that exact-duplicate detection
/// treats two NaNs (and two nulls) as equal.
fn f64_bits(v: &Option<f64>) -> Option<u64> {
    v.map(f64::to_bits)
}

// =============================================================================
// Raw records
// =============================================================================

/// One song-catalog entry as found in the `song_data` JSON files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SongRecord {
    pub song_id: Option<String>,
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub artist_name: Option<String>,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
    pub year: Option<i32>,
    pub duration: Option<f64>,
}

impl PartialEq for SongRecord {
    fn eq(&self, other: &Self) -> bool {
        self.song_id == other.song_id
            && self.title == other.title
            && self.artist_id == other.artist_id
            && self.artist_name == other.artist_name
            && self.artist_location == other.artist_location
            && f64_bits(&self.artist_latitude) == f64_bits(&other.artist_latitude)
            && f64_bits(&self.artist_longitude) == f64_bits(&other.artist_longitude)
            && self.year == other.year
            && f64_bits(&self.duration) == f64_bits(&other.duration)
    }
}

impl Eq for SongRecord {}

impl Hash for SongRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.song_id.hash(state);
        self.title.hash(state);
        self.artist_id.hash(state);
        self.artist_name.hash(state);
        self.artist_location.hash(state);
        f64_bits(&self.artist_latitude).hash(state);
        f64_bits(&self.artist_longitude).hash(state);
        self.year.hash(state);
        f64_bits(&self.duration).hash(state);
    }
}

/// One user-activity event as found in the `log_data` JSON files.
///
/// Field names in the files are camelCase; `page == "NextSong"` marks a
/// play event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct LogEvent {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
    pub page: Option<String>,
    /// Epoch milliseconds.
    pub ts: Option<i64>,
    pub song: Option<String>,
    pub artist: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<i64>,
    pub location: Option<String>,
    #[serde(rename = "userAgent")]
    pub user_agent: Option<String>,
}

// =============================================================================
// Dimension rows
// =============================================================================

/// Row of the `songs` dimension.
#[derive(Debug, Clone, Serialize)]
pub struct Song {
    pub song_id: String,
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub year: Option<i32>,
    pub duration: Option<f64>,
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.song_id == other.song_id
            && self.title == other.title
            && self.artist_id == other.artist_id
            && self.year == other.year
            && f64_bits(&self.duration) == f64_bits(&other.duration)
    }
}

impl Eq for Song {}

impl Hash for Song {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.song_id.hash(state);
        self.title.hash(state);
        self.artist_id.hash(state);
        self.year.hash(state);
        f64_bits(&self.duration).hash(state);
    }
}

/// Row of the `artists` dimension.
#[derive(Debug, Clone, Serialize)]
pub struct Artist {
    pub artist_id: String,
    pub artist_name: Option<String>,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
}

impl PartialEq for Artist {
    fn eq(&self, other: &Self) -> bool {
        self.artist_id == other.artist_id
            && self.artist_name == other.artist_name
            && self.artist_location == other.artist_location
            && f64_bits(&self.artist_latitude) == f64_bits(&other.artist_latitude)
            && f64_bits(&self.artist_longitude) == f64_bits(&other.artist_longitude)
    }
}

impl Eq for Artist {}

impl Hash for Artist {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.artist_id.hash(state);
        self.artist_name.hash(state);
        self.artist_location.hash(state);
        f64_bits(&self.artist_latitude).hash(state);
        f64_bits(&self.artist_longitude).hash(state);
    }
}

/// Row of the `users` dimension. One row per user; `level` is the value
/// observed on the user's most recent play event.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct User {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

/// Row of the `time` dimension. Every column is functionally derived from
/// `start_time`; `weekday` is numbered 1 = Sunday through 7 = Saturday.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct TimeEntry {
    pub start_time: DateTime<Utc>,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: u32,
}

// =============================================================================
// Fact rows
// =============================================================================

/// Row of the `songplays` fact table.
///
/// `song_id`/`artist_id` are nullable in the warehouse schema; the inner
/// join populates both on every row it emits.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct SongPlay {
    pub songplay_id: u64,
    pub start_time: DateTime<Utc>,
    pub month: u32,
    pub year: i32,
    pub user_id: Option<String>,
    pub level: Option<String>,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}
