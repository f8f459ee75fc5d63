//! Pipeline orchestration: reads the two raw datasets, runs the
//! transformations and writes the five output tables.
//!
//! The run either completes every table write or fails before completing
//! them; there are no retries and no partial-success mode. Tables already
//! written before a failure stay on disk — a restart converges because
//! every write is a whole-table overwrite.

use crate::config::EtlConfig;
use crate::records::{LogEvent, SongRecord};
use crate::sink::TableSink;
use crate::source::RecordSource;
use crate::transform::{
    build_artists, build_songplays, build_songs, build_time, build_users, dedup_records,
    filter_plays, with_start_times,
};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

/// Counters describing one pipeline run.
#[derive(Debug, Default, Clone, Copy)]
pub struct EtlStats {
    pub song_records_read: usize,
    pub song_duplicates_removed: usize,
    pub songs_rows: usize,
    pub artists_rows: usize,
    pub log_records_read: usize,
    pub log_duplicates_removed: usize,
    pub events_filtered_out: usize,
    pub play_events: usize,
    pub users_rows: usize,
    pub time_rows: usize,
    pub songplays_rows: usize,
    pub unmatched_events: usize,
    pub duplicate_fact_rows_removed: usize,
}

impl EtlStats {
    /// Log the run summary.
    pub fn log_summary(&self) {
        info!("Run Summary");
        info!("===========");
        info!("Song records read: {}", self.song_records_read);
        info!(
            "Log records read: {} ({} play events)",
            self.log_records_read, self.play_events
        );
        info!("songs rows written: {}", self.songs_rows);
        info!("artists rows written: {}", self.artists_rows);
        info!("users rows written: {}", self.users_rows);
        info!("time rows written: {}", self.time_rows);
        info!("songplays rows written: {}", self.songplays_rows);
        if self.unmatched_events > 0 {
            warn!(
                "{} play events had no catalog match and produced no fact rows",
                self.unmatched_events
            );
        }
    }
}

/// Run the full transformation pipeline.
pub fn run_pipeline(
    config: &EtlConfig,
    source: &impl RecordSource,
    sink: &impl TableSink,
) -> Result<EtlStats> {
    let mut stats = EtlStats::default();

    // =========================================================================
    // Song catalog: songs + artists dimensions
    // =========================================================================
    info!(
        "Reading song catalog from {:?} ({})",
        config.input_dir, config.song_glob
    );
    let song_records: Vec<SongRecord> = source
        .read(&config.song_glob)
        .context("Failed to read song catalog")?;
    stats.song_records_read = song_records.len();

    let song_records = dedup_records(song_records);
    stats.song_duplicates_removed = stats.song_records_read - song_records.len();
    info!(
        "Loaded {} catalog records ({} duplicates removed)",
        song_records.len(),
        stats.song_duplicates_removed
    );

    let songs = build_songs(&song_records);
    stats.songs_rows = songs.len();
    info!("Writing songs table ({} rows)...", songs.len());
    sink.write_table("songs", &to_rows(&songs)?, &["year", "artist_id"])
        .context("Failed to write songs table")?;

    let artists = build_artists(&song_records);
    stats.artists_rows = artists.len();
    info!("Writing artists table ({} rows)...", artists.len());
    sink.write_table("artists", &to_rows(&artists)?, &[])
        .context("Failed to write artists table")?;

    // =========================================================================
    // Activity log: users + time dimensions
    // =========================================================================
    info!(
        "Reading activity log from {:?} ({})",
        config.input_dir, config.log_glob
    );
    let log_events: Vec<LogEvent> = source
        .read(&config.log_glob)
        .context("Failed to read activity log")?;
    stats.log_records_read = log_events.len();

    let log_events = dedup_records(log_events);
    stats.log_duplicates_removed = stats.log_records_read - log_events.len();

    let plays = filter_plays(log_events);
    stats.events_filtered_out =
        stats.log_records_read - stats.log_duplicates_removed - plays.len();
    info!(
        "Loaded {} log events, {} are plays ({} duplicates removed)",
        stats.log_records_read,
        plays.len(),
        stats.log_duplicates_removed
    );

    let users = build_users(&plays);
    stats.users_rows = users.len();
    info!("Writing users table ({} rows)...", users.len());
    sink.write_table("users", &to_rows(&users)?, &[])
        .context("Failed to write users table")?;

    let plays = with_start_times(&plays)?;
    stats.play_events = plays.len();

    let time = build_time(&plays);
    stats.time_rows = time.len();
    info!("Writing time table ({} rows)...", time.len());
    sink.write_table("time", &to_rows(&time)?, &["year", "month"])
        .context("Failed to write time table")?;

    // =========================================================================
    // Fact table: natural-key join of plays against the catalog
    // =========================================================================
    info!("Joining {} play events against the catalog...", plays.len());
    let (songplays, join_stats) = build_songplays(&plays, &song_records);
    stats.songplays_rows = songplays.len();
    stats.unmatched_events = join_stats.unmatched_events;
    stats.duplicate_fact_rows_removed = join_stats.duplicate_rows_removed;

    info!("Writing songplays table ({} rows)...", songplays.len());
    sink.write_table("songplays", &to_rows(&songplays)?, &["year", "month"])
        .context("Failed to write songplays table")?;

    Ok(stats)
}

/// Serialize typed rows into the JSON objects the sink consumes.
fn to_rows<T: Serialize>(rows: &[T]) -> Result<Vec<Value>> {
    rows.iter()
        .map(|row| serde_json::to_value(row).context("Failed to serialize row"))
        .collect()
}
