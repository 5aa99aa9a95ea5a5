use crate::model::Searchable;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Allocates an id from the current time in epoch milliseconds.
///
/// When the clock has not moved past the largest id already in the overlay
/// (two creates in the same millisecond, or a clock set backwards), the id is
/// bumped to one past that maximum so it stays unique within the overlay.
/// If the maximum is `i64::MAX`, the smallest free positive id is used.
pub fn next_id(existing: impl IntoIterator<Item = i64>, now: DateTime<Utc>) -> i64 {
    let stamp = now.timestamp_millis();
    let taken: HashSet<i64> = existing.into_iter().collect();
    match taken.iter().copied().max() {
        Some(max) if max >= stamp => max
            .checked_add(1)
            .or_else(|| (1..).find(|id| !taken.contains(id)))
            .unwrap_or(stamp),
        _ => stamp,
    }
}

/// Case-insensitive substring filter. A blank query returns the input as is.
pub fn text_filter<R: Searchable>(records: Vec<R>, query: &str) -> Vec<R> {
    if query.trim().is_empty() {
        return records;
    }
    let needle = query.to_lowercase();
    records
        .into_iter()
        .filter(|r| r.matches_text(&needle))
        .collect()
}
