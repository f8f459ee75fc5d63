//! Exact-duplicate row removal.

use std::collections::HashSet;
use std::hash::Hash;

/// Remove exact-duplicate rows (all fields equal, nulls compared as equal),
/// keeping the first occurrence so the result is stable for a given input
/// order. Idempotent; empty input yields empty output.
pub fn dedup_records<T: Eq + Hash + Clone>(rows: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter().filter(|row| seen.insert(row.clone())).collect()
}
