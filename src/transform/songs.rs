//! Song-catalog transformer: derives the `songs` and `artists` dimensions
//! from deduplicated catalog records.
//!
//! Both tables are independent projections over the same input; rows with
//! a null primary key are excluded rather than reported.

use crate::records::{Artist, Song, SongRecord};
use std::collections::HashSet;

/// Project the `songs` dimension: {song_id, title, artist_id, year,
/// duration}, distinct, excluding rows without a song_id.
pub fn build_songs(records: &[SongRecord]) -> Vec<Song> {
    let mut seen = HashSet::new();
    let mut songs = Vec::new();
    for record in records {
        let Some(song_id) = record.song_id.clone() else {
            continue;
        };
        let song = Song {
            song_id,
            title: record.title.clone(),
            artist_id: record.artist_id.clone(),
            year: record.year,
            duration: record.duration,
        };
        if seen.insert(song.clone()) {
            songs.push(song);
        }
    }
    songs
}

/// Project the `artists` dimension: {artist_id, artist_name,
/// artist_location, artist_latitude, artist_longitude}, distinct,
/// excluding rows without an artist_id.
pub fn build_artists(records: &[SongRecord]) -> Vec<Artist> {
    let mut seen = HashSet::new();
    let mut artists = Vec::new();
    for record in records {
        let Some(artist_id) = record.artist_id.clone() else {
            continue;
        };
        let artist = Artist {
            artist_id,
            artist_name: record.artist_name.clone(),
            artist_location: record.artist_location.clone(),
            artist_latitude: record.artist_latitude,
            artist_longitude: record.artist_longitude,
        };
        if seen.insert(artist.clone()) {
            artists.push(artist);
        }
    }
    artists
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(song_id: Option<&str>, artist_id: Option<&str>) -> SongRecord {
        SongRecord {
            song_id: song_id.map(String::from),
            title: Some("Red".into()),
            artist_id: artist_id.map(String::from),
            artist_name: Some("Band".into()),
            artist_location: Some("Nowhere".into()),
            artist_latitude: Some(1.5),
            artist_longitude: Some(-2.5),
            year: Some(2000),
            duration: Some(200.0),
        }
    }

    #[test]
    fn test_songs_projection() {
        let songs = build_songs(&[record(Some("S1"), Some("A1"))]);
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].song_id, "S1");
        assert_eq!(songs[0].title.as_deref(), Some("Red"));
        assert_eq!(songs[0].artist_id.as_deref(), Some("A1"));
        assert_eq!(songs[0].year, Some(2000));
        assert_eq!(songs[0].duration, Some(200.0));
    }

    #[test]
    fn test_songs_exclude_null_song_id() {
        let songs = build_songs(&[record(None, Some("A1")), record(Some("S1"), Some("A1"))]);
        assert_eq!(songs.len(), 1);
        assert!(songs.iter().all(|s| !s.song_id.is_empty()));
    }

    #[test]
    fn test_songs_distinct_collapses_repeats() {
        // Same projected tuple from two catalog records that differ only in
        // artist attributes.
        let mut a = record(Some("S1"), Some("A1"));
        a.artist_location = Some("Somewhere".into());
        let b = record(Some("S1"), Some("A1"));
        let songs = build_songs(&[a, b]);
        assert_eq!(songs.len(), 1);
    }

    #[test]
    fn test_artists_projection_and_null_exclusion() {
        let artists = build_artists(&[record(Some("S1"), None), record(Some("S2"), Some("A1"))]);
        assert_eq!(artists.len(), 1);
        assert_eq!(artists[0].artist_id, "A1");
        assert_eq!(artists[0].artist_name.as_deref(), Some("Band"));
        assert_eq!(artists[0].artist_latitude, Some(1.5));
    }

    #[test]
    fn test_artists_distinct_over_full_tuple() {
        // Two songs by the same artist produce one artist row.
        let artists = build_artists(&[record(Some("S1"), Some("A1")), record(Some("S2"), Some("A1"))]);
        assert_eq!(artists.len(), 1);
    }
}
