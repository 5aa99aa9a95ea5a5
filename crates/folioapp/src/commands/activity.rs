//! Activity derivation.
//!
//! Document and collection commands call [`record`] after every create or
//! update; deletes never do. Each call appends exactly one [`ActivityItem`] to
//! the activity overlay with a denormalized label, so the feed still reads
//! correctly after the subject is renamed or removed.

use crate::commands::helpers::next_id;
use crate::commands::CmdContext;
use crate::merge;
use crate::model::{ActivityAction, ActivityItem, Collection, Document};
use crate::store::backend::StorageBackend;
use crate::store::local::LocalStore;
use crate::store::StoreKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const KEY: StoreKey = StoreKey::Activities;

/// What an activity entry is about.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    Document(&'a Document),
    Collection(&'a Collection),
}

pub fn record<B: StorageBackend>(
    ctx: &CmdContext<'_, B>,
    action: ActivityAction,
    subject: Subject<'_>,
) -> ActivityItem {
    let mut items = list_local(ctx.store);
    let now = ctx.clock.now();
    let id = next_id(items.iter().map(|item| item.id), now);

    let item = match subject {
        Subject::Document(doc) => ActivityItem {
            id,
            action,
            author: doc.author.clone(),
            author_initials: doc.author_initials.clone(),
            document_title: doc.title.clone(),
            document_id: Some(doc.id),
            collection_id: doc.collection_id,
            timestamp: now,
        },
        Subject::Collection(col) => ActivityItem {
            id,
            action,
            author: ctx.author.name.clone(),
            author_initials: ctx.author.initials.clone(),
            document_title: format!("Collection: {}", col.name),
            document_id: None,
            collection_id: Some(col.id),
            timestamp: now,
        },
    };

    items.push(item.clone());
    ctx.store.save(KEY, &items);
    debug!(id, %action, title = %item.document_title, "recorded activity");
    item
}

pub fn list_local<B: StorageBackend>(store: &LocalStore<B>) -> Vec<ActivityItem> {
    store.load(KEY)
}

/// Remote feed overlaid with local activity, newest first.
pub fn merge<B: StorageBackend>(
    store: &LocalStore<B>,
    remote: Vec<ActivityItem>,
) -> Vec<ActivityItem> {
    merge::merge(remote, list_local(store))
}

pub fn clear<B: StorageBackend>(store: &LocalStore<B>) {
    store.clear(KEY);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ActivityFilter {
    #[default]
    All,
    Only(ActivityAction),
}

impl fmt::Display for ActivityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityFilter::All => f.write_str("all"),
            ActivityFilter::Only(action) => fmt::Display::fmt(action, f),
        }
    }
}

impl FromStr for ActivityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(ActivityFilter::All);
        }
        s.parse().map(ActivityFilter::Only)
    }
}

impl From<ActivityFilter> for String {
    fn from(filter: ActivityFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for ActivityFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Keeps only entries with the requested action, preserving order.
pub fn filter(items: Vec<ActivityItem>, filter: ActivityFilter) -> Vec<ActivityItem> {
    match filter {
        ActivityFilter::All => items,
        ActivityFilter::Only(action) => items
            .into_iter()
            .filter(|item| item.action == action)
            .collect(),
    }
}
