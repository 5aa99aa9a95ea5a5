//! # CLI Behavior
//!
//! This is **one possible client** for folio, not the application itself. The
//! CLI is the only place that knows about terminal I/O, exit codes and output
//! formatting.
//!
//! ## Remote Plus Local
//!
//! Every read command fetches the remote snapshot first (the demo seed, or the
//! JSON files in `snapshot_dir`), then asks the library to merge the local
//! overlay over it. Write commands only touch the overlay.
//!
//! ### Naked Execution (`folio`)
//!
//! Running `folio` with no arguments lists documents, as does `folio docs`.
//!
//! ### Updates Are Upserts
//!
//! `folio docs update 3 --title X` on a document that only exists remotely
//! creates a local document with id 3 from the given fields and defaults. The
//! remote fields are *not* copied. The CLI prints a warning when this happens.
//!
//! ### Deletes Are Local
//!
//! `folio docs delete 3` fails when 3 is not in the local overlay, even if the
//! remote snapshot has it.
//!
//! ## Module Structure
//!
//! - `commands`: per-command handlers that call the API and print output
//! - `render`: output formatting
//! - `setup`: argument parsing via clap
//! - `styles`: terminal styling

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
