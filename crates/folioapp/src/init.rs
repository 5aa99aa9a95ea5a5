//! # Startup
//!
//! [`initialize`] turns "where do I keep my data" into a ready [`FolioContext`]:
//!
//! 1. Resolve the data directory ([`resolve_data_dir`]):
//!    - an explicit override (the CLI's `--data`) wins,
//!    - then the `FOLIO_DATA_DIR` environment variable,
//!    - then the OS data directory for `folio` (via the `directories` crate).
//! 2. Load [`FolioConfig`] from the environment and `<data dir>/folio.toml`.
//! 3. Open an [`FsBackend`] rooted at the data directory.
//! 4. Pick the remote snapshot: `snapshot_dir` if configured, otherwise the
//!    demo seed. A non-zero `failure_rate` wraps it in a [`FlakySource`].

use crate::api::FolioApi;
use crate::clock::{Clock, SystemClock};
use crate::config::FolioConfig;
use crate::error::{FolioError, Result};
use crate::remote::{FlakySource, JsonDirSource, RemoteSource, SeedSource};
use crate::store::fs_backend::FsBackend;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

pub const DATA_DIR_ENV: &str = "FOLIO_DATA_DIR";

pub struct FolioContext {
    pub api: FolioApi<FsBackend>,
    pub config: FolioConfig,
    pub data_dir: PathBuf,
    pub remote: Box<dyn RemoteSource>,
}

pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    ProjectDirs::from("", "", "folio")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| FolioError::Config("could not determine a data directory".to_string()))
}

pub fn remote_for(config: &FolioConfig, clock: &dyn Clock) -> Box<dyn RemoteSource> {
    let base: Box<dyn RemoteSource> = match &config.snapshot_dir {
        Some(dir) => Box::new(JsonDirSource::new(dir.clone())),
        None => Box::new(SeedSource::new(clock.now())),
    };
    if config.failure_rate > 0.0 {
        Box::new(FlakySource::new(base, config.failure_rate))
    } else {
        base
    }
}

pub fn initialize(data_override: Option<PathBuf>) -> Result<FolioContext> {
    let data_dir = resolve_data_dir(data_override)?;
    let config = FolioConfig::load_from(&data_dir)?;
    debug!(data_dir = %data_dir.display(), ?config, "initializing folio");

    let api = FolioApi::new(FsBackend::new(data_dir.clone()), SystemClock, config.author());
    let remote = remote_for(&config, &SystemClock);

    Ok(FolioContext {
        api,
        config,
        data_dir,
        remote,
    })
}
