use super::backend::StorageBackend;
use super::StoreKey;
use crate::error::{FolioError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since folio is single-threaded.
/// This keeps every `StorageBackend` method on `&self`.
#[derive(Default)]
pub struct MemBackend {
    blobs: RefCell<HashMap<StoreKey, String>>,
    simulate_write_error: Cell<bool>,
    simulate_read_error: Cell<bool>,
    writes: Cell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Enable read error simulation (an unavailable store).
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Test helper to plant an arbitrary blob, e.g. malformed JSON.
    pub fn put_raw(&self, key: StoreKey, raw: &str) {
        self.blobs.borrow_mut().insert(key, raw.to_string());
    }

    /// Test helper to inspect what was written.
    pub fn raw(&self, key: StoreKey) -> Option<String> {
        self.blobs.borrow().get(&key).cloned()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl StorageBackend for MemBackend {
    fn read(&self, key: StoreKey) -> Result<Option<String>> {
        if self.simulate_read_error.get() {
            return Err(FolioError::Store("Simulated read error".to_string()));
        }
        Ok(self.blobs.borrow().get(&key).cloned())
    }

    fn write(&self, key: StoreKey, content: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(FolioError::Store("Simulated write error".to_string()));
        }
        self.blobs.borrow_mut().insert(key, content.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove(&self, key: StoreKey) -> Result<()> {
        self.blobs.borrow_mut().remove(&key);
        Ok(())
    }

    fn location(&self, key: StoreKey) -> PathBuf {
        PathBuf::from(format!("memory://{}", key.file_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_key_is_none() {
        let backend = MemBackend::new();
        assert_eq!(backend.read(StoreKey::Documents).unwrap(), None);
    }

    #[test]
    fn write_then_read() {
        let backend = MemBackend::new();
        backend.write(StoreKey::Collections, "[]").unwrap();
        assert_eq!(
            backend.read(StoreKey::Collections).unwrap(),
            Some("[]".to_string())
        );
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn simulated_write_error() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        assert!(backend.write(StoreKey::Documents, "[]").is_err());
        assert_eq!(backend.raw(StoreKey::Documents), None);
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn remove_is_idempotent() {
        let backend = MemBackend::new();
        backend.put_raw(StoreKey::Activities, "[]");
        backend.remove(StoreKey::Activities).unwrap();
        backend.remove(StoreKey::Activities).unwrap();
        assert_eq!(backend.read(StoreKey::Activities).unwrap(), None);
    }

    #[test]
    fn location_is_virtual() {
        let backend = MemBackend::new();
        assert_eq!(
            backend.location(StoreKey::Preferences),
            PathBuf::from("memory://preferences.json")
        );
    }
}
