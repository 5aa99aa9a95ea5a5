//! # Folio Architecture
//!
//! Folio is a **UI-agnostic knowledge-base record store**. It keeps documents,
//! collections and an activity feed, layering a mutable *local overlay* over a
//! read-only *remote snapshot*. The `folio` binary is one client; nothing in
//! this crate assumes a terminal.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (the folio CLI, or anything else)                   │
//! │  - Fetches a remote snapshot, renders results               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade: owns store, clock and acting author         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - CRUD on the overlay, activity derivation, queries        │
//! │  - Merge of overlay and snapshot (merge.rs)                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StorageBackend trait: FsBackend, MemBackend              │
//! │  - LocalStore: typed, failure-tolerant access               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Overlay Semantics
//!
//! - Local records win entirely over remote records with the same id.
//! - Merged views are ordered most recent first.
//! - Every create or update of a document or collection appends one activity
//!   entry. Deletes append none.
//! - Deletes only reach the overlay. A record that exists only remotely cannot
//!   be deleted and keeps showing up in merged views.
//!
//! ## Failure Model
//!
//! Local storage is best effort: an unreadable overlay reads as empty and a
//! failed write is logged and dropped (see [`store`]). Errors that do surface
//! are [`error::FolioError`]: remote fetch failures, bad configuration, and
//! lookups the caller asked to be strict about.
//!
//! ## Testing Strategy
//!
//! - **Commands**: unit tests against `MemBackend` with a `ManualClock`
//! - **Store**: `FsBackend` integration tests in `tests/` on temp dirs
//! - **Merge**: property tests in `tests/merge_props.rs`
//! - **CLI**: end-to-end tests in the `folio` crate

pub mod api;
pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod merge;
pub mod model;
pub mod preferences;
pub mod remote;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
