//! Test fixture creation: raw input trees and output-table readers.
//!
//! Fixtures are JSON-lines files written into a `TempDir` laid out like
//! the real datasets (`song_data/<A>/<B>/<C>/<id>.json`,
//! `log_data/<year>/<month>/<date>-events.json`).

use super::constants::*;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Create an empty input root.
pub fn create_input_root() -> TempDir {
    TempDir::new().unwrap()
}

/// Write one JSON record per line at `relative` under the root.
pub fn write_jsonl(root: &Path, relative: &str, rows: &[Value]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let content = rows
        .iter()
        .map(|row| row.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(path, content + "\n").unwrap();
}

/// One catalog record for song 1 / artist 1.
pub fn catalog_record_1() -> Value {
    json!({
        "song_id": SONG_1_ID,
        "title": SONG_1_TITLE,
        "artist_id": ARTIST_1_ID,
        "artist_name": ARTIST_1_NAME,
        "artist_location": "Nowhere",
        "artist_latitude": 1.5,
        "artist_longitude": -2.5,
        "year": 2000,
        "duration": 200.0
    })
}

/// One play event for user 1 naming the given song/artist.
pub fn play_event(song: &str, artist: &str, ts: i64, level: &str) -> Value {
    json!({
        "userId": USER_1_ID,
        "firstName": "Ada",
        "lastName": "L",
        "gender": "F",
        "level": level,
        "page": "NextSong",
        "ts": ts,
        "song": song,
        "artist": artist,
        "sessionId": SESSION_1_ID,
        "location": "Nowhere, XX",
        "userAgent": "test-agent"
    })
}

/// Write the standard single-song catalog into the input root.
pub fn write_catalog_1(root: &Path) {
    write_jsonl(
        root,
        &format!("song_data/A/A/A/{}.json", SONG_1_ID),
        &[catalog_record_1()],
    );
}

/// Read every row of an output table, in file order; partition columns are
/// not part of the rows (they are encoded in the directory layout).
pub fn read_table(output_root: &Path, table: &str) -> Vec<Value> {
    let mut rows = Vec::new();
    for entry in WalkDir::new(output_root.join(table))
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() {
            let content = fs::read_to_string(entry.path()).unwrap();
            for line in content.lines().filter(|l| !l.trim().is_empty()) {
                rows.push(serde_json::from_str(line).unwrap());
            }
        }
    }
    rows
}

/// List the partition directories of a table (relative slash-separated
/// paths of every directory that contains a data file).
pub fn list_partitions(output_root: &Path, table: &str) -> BTreeSet<String> {
    let table_dir = output_root.join(table);
    let mut partitions = BTreeSet::new();
    for entry in WalkDir::new(&table_dir).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() {
            let relative = entry
                .path()
                .parent()
                .unwrap()
                .strip_prefix(&table_dir)
                .unwrap();
            let segments: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect();
            partitions.insert(segments.join("/"));
        }
    }
    partitions
}

/// Snapshot an output tree as (relative path, contents) pairs, for
/// byte-level idempotence comparisons.
pub fn snapshot_tree(root: &Path) -> Vec<(String, String)> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() {
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .to_string();
            files.push((relative, fs::read_to_string(entry.path()).unwrap()));
        }
    }
    files.sort();
    files
}
