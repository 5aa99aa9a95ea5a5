//! # Folio CLI Architecture
//!
//! The binary is thin: the CLI lives in `src/cli/`, and this file only invokes
//! `cli::run()` and turns an error into exit code 1.
//!
//! ## Workspace Structure
//!
//! - `crates/folioapp/`: UI-agnostic library (records, overlay store, merge,
//!   activity, search, preferences, remote sources)
//! - `crates/folio/`: this CLI, depending on `folioapp`
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/folio/src/cli/)                          │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - context wiring + dispatch (commands.rs)                  │
//! │  - terminal rendering (render.rs, styles.rs)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/folioapp/src/api.rs)                     │
//! │  - One method per operation, over one store and clock       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (crates/folioapp/src/commands/*)             │
//! │  - Overlay CRUD, activity, merge, query                     │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Testing Approach
//!
//! - **Commands and API**: unit tests against the in-memory backend and a
//!   manual clock.
//! - **CLI**: argument parsing and rendering are unit tested in place;
//!   `tests/cli.rs` drives the built binary against a temporary data dir.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
