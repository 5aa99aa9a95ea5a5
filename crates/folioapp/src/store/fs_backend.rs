use super::backend::StorageBackend;
use super::StoreKey;
use crate::error::{FolioError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One `<key>.json` file per key inside a data directory.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: StoreKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(FolioError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read(&self, key: StoreKey) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FolioError::Io(e)),
        }
    }

    fn write(&self, key: StoreKey, content: &str) -> Result<()> {
        self.ensure_dir()?;

        // Atomic write: tmp file in the same directory, then rename over the target
        let tmp_path = self
            .root
            .join(format!(".{}-{}.tmp", key.as_str(), Uuid::new_v4()));
        fs::write(&tmp_path, content).map_err(FolioError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, self.path_for(key)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(FolioError::Io(e));
        }
        Ok(())
    }

    fn remove(&self, key: StoreKey) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FolioError::Io(e)),
        }
    }

    fn location(&self, key: StoreKey) -> PathBuf {
        self.path_for(key)
    }
}
