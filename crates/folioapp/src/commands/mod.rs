//! # Command Layer
//!
//! This module contains the **core business logic** of folio. Each record kind
//! lives in its own submodule and implements plain functions over the local
//! overlay.
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Read-modify-write the local overlay through [`LocalStore`]
//! - Fill defaults for partial records
//! - Emit one activity entry per create/update of a document or collection
//! - Merge the overlay with a remote snapshot on request
//!
//! ## What Commands Do NOT Do
//!
//! - **Fetch remote data**: the caller hands the remote snapshot in
//! - **Report storage failures**: `LocalStore` degrades them to "nothing stored"
//! - **Validate input**: missing or blank fields get defaults
//! - **Any terminal I/O**
//!
//! ## Not Found Is a Value
//!
//! Lookups return `Option`, deletes return `bool`. Updates never fail: an id
//! missing from the overlay is *upserted* and reported as
//! [`UpdateOutcome::Created`], whether or not the remote snapshot knows it.
//!
//! ## Command Modules
//!
//! - [`documents`]: document overlay CRUD, merge and text search
//! - [`collections`]: collection overlay CRUD, merge and text search
//! - [`activity`]: activity derivation, merge and filtering
//! - [`query`]: listing (filter, sort, paginate) and combined search
//! - [`helpers`]: id allocation and text filtering shared by all kinds

use crate::clock::Clock;
use crate::model::{Author, Record};
use crate::store::backend::StorageBackend;
use crate::store::local::LocalStore;
use serde::Serialize;

pub mod activity;
pub mod collections;
pub mod documents;
pub mod helpers;
pub mod query;

/// Everything a mutating command needs.
pub struct CmdContext<'a, B: StorageBackend> {
    pub store: &'a LocalStore<B>,
    pub clock: &'a dyn Clock,
    pub author: &'a Author,
}

impl<'a, B: StorageBackend> CmdContext<'a, B> {
    pub fn new(store: &'a LocalStore<B>, clock: &'a dyn Clock, author: &'a Author) -> Self {
        Self {
            store,
            clock,
            author,
        }
    }
}

/// Result of an update against the local overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "record", rename_all = "lowercase")]
pub enum UpdateOutcome<R> {
    /// The id was in the overlay and the patch was merged onto it.
    Updated(R),
    /// The id was not in the overlay; a record was synthesized from the patch.
    Created(R),
}

impl<R: Record> UpdateOutcome<R> {
    pub fn record(&self) -> &R {
        match self {
            UpdateOutcome::Updated(r) | UpdateOutcome::Created(r) => r,
        }
    }

    pub fn into_record(self) -> R {
        match self {
            UpdateOutcome::Updated(r) | UpdateOutcome::Created(r) => r,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, UpdateOutcome::Created(_))
    }
}
