//! # Configuration
//!
//! Folio configuration is loaded with [`confique`] from layered sources.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `FOLIO_AUTHOR`, `FOLIO_AUTHOR_INITIALS`,
//!    `FOLIO_SNAPSHOT_DIR`, `FOLIO_FAILURE_RATE`.
//! 2. **Data dir file**: `folio.toml` inside the data directory.
//! 3. **Compiled defaults**: `#[config(default = ...)]` below.
//!
//! The data directory itself is not a config key: it has to be known before
//! `folio.toml` can be found. See [`crate::init::resolve_data_dir`].
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `author` | `DK` | Name stamped on new records and collection activity |
//! | `author_initials` | `DK` | Initials shown next to the author |
//! | `snapshot_dir` | unset | Directory of remote JSON snapshots; unset uses the demo seed |
//! | `failure_rate` | `0.0` | Probability that a remote fetch fails |

use crate::error::Result;
use crate::model::Author;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "folio.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FolioConfig {
    /// Display name used as the author of locally created records.
    #[config(env = "FOLIO_AUTHOR", default = "DK")]
    pub author: String,

    #[config(env = "FOLIO_AUTHOR_INITIALS", default = "DK")]
    pub author_initials: String,

    /// Read the remote snapshot from this directory instead of the built-in seed.
    #[config(env = "FOLIO_SNAPSHOT_DIR")]
    pub snapshot_dir: Option<PathBuf>,

    /// Fraction of remote fetches that fail, `0.0..=1.0`.
    #[config(env = "FOLIO_FAILURE_RATE", default = 0.0)]
    pub failure_rate: f64,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            author: "DK".to_string(),
            author_initials: "DK".to_string(),
            snapshot_dir: None,
            failure_rate: 0.0,
        }
    }
}

impl FolioConfig {
    /// Environment first, then `folio.toml` in `data_dir`, then defaults.
    /// A missing file is fine; a malformed one is an error.
    pub fn load_from(data_dir: &Path) -> Result<Self> {
        let config = FolioConfig::builder()
            .env()
            .file(data_dir.join(CONFIG_FILE))
            .load()?;
        Ok(config)
    }

    pub fn author(&self) -> Author {
        Author::new(self.author.trim(), self.author_initials.trim())
    }
}
