//! # Merge Engine
//!
//! Combines a read-only remote snapshot with the local overlay into one view.
//!
//! ## Rules
//!
//! 1. **Keyed by id**: records are collected into an insertion-ordered map
//!    keyed by [`Record::id`]. Remote records go in first, local records second.
//! 2. **Local wins**: a local record replaces the remote record with the same
//!    id *entirely*. There is no field-level merge and no timestamp comparison,
//!    so a local edit older than the remote copy still wins.
//! 3. **Most recent first**: the result is sorted by [`Record::sort_key`]
//!    descending. The sort is stable, so equal timestamps keep map order.
//! 4. **Duplicates don't crash**: repeated ids on the same side resolve to the
//!    last one seen.
//!
//! With an empty overlay the output holds exactly the remote records, sorted.

use crate::model::Record;
use indexmap::IndexMap;
use tracing::debug;

pub fn merge<R: Record>(remote: Vec<R>, local: Vec<R>) -> Vec<R> {
    let remote_len = remote.len();
    let local_len = local.len();

    let mut merged: IndexMap<i64, R> = IndexMap::with_capacity(remote_len + local_len);
    for record in remote.into_iter().chain(local) {
        merged.insert(record.id(), record);
    }

    let mut result: Vec<R> = merged.into_values().collect();
    sort_recent_first(&mut result);

    if local_len > 0 {
        debug!(
            kind = %R::KIND,
            remote = remote_len,
            local = local_len,
            merged = result.len(),
            "merged local overlay"
        );
    }
    result
}

pub fn sort_recent_first<R: Record>(records: &mut [R]) {
    records.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
}
