use super::backend::StorageBackend;
use super::StoreKey;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Typed access to the local overlay.
///
/// The `try_*` methods report failures; the plain methods swallow them:
/// an unreadable or corrupt blob loads as empty, a failed write is dropped.
pub struct LocalStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: StorageBackend> LocalStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn try_load<R: DeserializeOwned>(&self, key: StoreKey) -> Result<Vec<R>> {
        match self.backend.read(key)? {
            None => Ok(Vec::new()),
            Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Some(raw) => Ok(serde_json::from_str(&raw)?),
        }
    }

    /// Load every record stored under `key`, or nothing if the blob is
    /// missing, unreadable or malformed.
    pub fn load<R: DeserializeOwned>(&self, key: StoreKey) -> Vec<R> {
        self.try_load(key).unwrap_or_else(|e| {
            warn!(%key, error = %e, "local overlay unreadable, treating as empty");
            Vec::new()
        })
    }

    pub fn try_save<R: Serialize>(&self, key: StoreKey, records: &[R]) -> Result<()> {
        let raw = serde_json::to_string_pretty(records)?;
        self.backend.write(key, &raw)?;
        debug!(%key, count = records.len(), "saved local overlay");
        Ok(())
    }

    /// Fire-and-forget save.
    pub fn save<R: Serialize>(&self, key: StoreKey, records: &[R]) {
        if let Err(e) = self.try_save(key, records) {
            warn!(%key, error = %e, "failed to save local overlay, write dropped");
        }
    }

    /// Load a single JSON value (e.g. the preferences object).
    pub fn load_value<T: DeserializeOwned + Default>(&self, key: StoreKey) -> T {
        let loaded = self.backend.read(key).and_then(|raw| match raw {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(T::default()),
        });
        loaded.unwrap_or_else(|e| {
            warn!(%key, error = %e, "stored value unreadable, using default");
            T::default()
        })
    }

    pub fn save_value<T: Serialize>(&self, key: StoreKey, value: &T) {
        let result = serde_json::to_string_pretty(value)
            .map_err(Into::into)
            .and_then(|raw| self.backend.write(key, &raw));
        if let Err(e) = result {
            warn!(%key, error = %e, "failed to save value, write dropped");
        }
    }

    /// Drop everything stored under `key`.
    pub fn clear(&self, key: StoreKey) {
        match self.backend.remove(key) {
            Ok(()) => debug!(%key, "cleared local overlay"),
            Err(e) => warn!(%key, error = %e, "failed to clear local overlay"),
        }
    }
}
