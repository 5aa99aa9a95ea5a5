//! # Storage Layer
//!
//! The local overlay lives in a plain key/value store: one named JSON blob per
//! record kind plus one blob of UI preferences.
//!
//! ```text
//! <data dir>/
//! ├── documents.json     # JSON array of Document
//! ├── collections.json   # JSON array of Collection
//! ├── activities.json    # JSON array of ActivityItem
//! └── preferences.json   # JSON object of Preferences
//! ```
//!
//! ## Split of Responsibilities
//!
//! - [`backend::StorageBackend`] handles the "how": raw strings in and out of a
//!   medium (memory, filesystem). Its methods return `Result` and report real
//!   failures.
//! - [`local::LocalStore`] handles the "what": typed records over a backend.
//!   It never hands a storage failure to its caller. A missing or corrupt blob
//!   reads as empty and a failed write is logged and dropped, so the rest of
//!   the application acts as if nothing were stored locally.
//!
//! ## Known Limitation: Concurrent Writers
//!
//! Every mutation is a read-modify-write of a whole blob with no versioning.
//! Two processes writing the same key race, and the last write wins. Single
//! writer per data directory is assumed.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one file per key, atomic replace on write.
//! - [`mem_backend::MemBackend`]: in-memory, with failure simulation for tests.

use std::fmt;

pub mod backend;
pub mod fs_backend;
pub mod local;
pub mod mem_backend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Documents,
    Collections,
    Activities,
    Preferences,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Documents => "documents",
            StoreKey::Collections => "collections",
            StoreKey::Activities => "activities",
            StoreKey::Preferences => "preferences",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
