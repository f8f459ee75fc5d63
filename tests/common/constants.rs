//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When the fixture data changes, update only this file.

// ============================================================================
// Catalog fixture
// ============================================================================

/// Song ID for "Red" by Band
pub const SONG_1_ID: &str = "S1";

/// Title of song 1
pub const SONG_1_TITLE: &str = "Red";

/// Artist ID for Band
pub const ARTIST_1_ID: &str = "A1";

/// Artist name for artist 1
pub const ARTIST_1_NAME: &str = "Band";

// ============================================================================
// Activity-log fixture
// ============================================================================

/// User ID used by the play events
pub const USER_1_ID: &str = "7";

/// Session ID used by the play events
pub const SESSION_1_ID: i64 = 5;

/// Epoch millis of the play event: 2018-10-31T15:33:20Z
pub const PLAY_TS: i64 = 1541000000000;
