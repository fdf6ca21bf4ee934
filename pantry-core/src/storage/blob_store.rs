use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::models::error::PantryError;

/// Key-value store holding one opaque blob per key.
///
/// Writes replace the whole value; readers never observe a partial write.
pub trait BlobStore: Send {
    /// The stored blob, or `None` if nothing was ever written under `key`.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PantryError>;

    fn write(&mut self, key: &str, data: &[u8]) -> Result<(), PantryError>;
}

/// Blob store keeping `{key}.json` files in a directory.
///
/// Each write goes to a temporary sibling first and is renamed over the
/// target, so a crash mid-write leaves the previous blob intact.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    directory: PathBuf,
}

impl FileBlobStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PantryError> {
        match fs::read(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PantryError::Storage(format!("failed to read {key}: {e}"))),
        }
    }

    fn write(&mut self, key: &str, data: &[u8]) -> Result<(), PantryError> {
        fs::create_dir_all(&self.directory)
            .map_err(|e| PantryError::Storage(format!("failed to create directory: {e}")))?;

        let target = self.path_for(key);
        let staging = self.directory.join(format!(".{key}.json.tmp"));
        {
            let mut file = fs::File::create(&staging)
                .map_err(|e| PantryError::Storage(format!("failed to create {key}: {e}")))?;
            file.write_all(data)
                .map_err(|e| PantryError::Storage(format!("write failed: {e}")))?;
            file.sync_all()
                .map_err(|e| PantryError::Storage(format!("sync failed: {e}")))?;
        }
        fs::rename(&staging, &target)
            .map_err(|e| PantryError::Storage(format!("failed to replace {key}: {e}")))?;
        Ok(())
    }
}

/// In-process blob store.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with `data` already present under `key`.
    pub fn with_blob(key: &str, data: &[u8]) -> Self {
        let mut store = Self::new();
        store.blobs.insert(key.to_string(), data.to_vec());
        store
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PantryError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write(&mut self, key: &str, data: &[u8]) -> Result<(), PantryError> {
        self.blobs.insert(key.to_string(), data.to_vec());
        Ok(())
    }
}
