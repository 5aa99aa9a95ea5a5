use super::StoreKey;
use crate::error::Result;
use std::path::PathBuf;

/// Abstract interface for raw key/value I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while LocalStore handles the "what" (typed records, failure recovery).
pub trait StorageBackend {
    /// Read the raw blob stored under `key`.
    /// Returns Ok(None) if nothing is stored.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read(&self, key: StoreKey) -> Result<Option<String>>;

    /// Replace the blob stored under `key`.
    /// MUST NOT leave a half-written blob behind.
    fn write(&self, key: StoreKey, content: &str) -> Result<()>;

    /// Remove the blob. Removing a missing key is not an error.
    fn remove(&self, key: StoreKey) -> Result<()>;

    /// Where the blob lives. For MemBackend, a virtual path.
    fn location(&self, key: StoreKey) -> PathBuf;
}
