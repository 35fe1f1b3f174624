//! File-backed key-value store.
//!
//! Each key is stored as `<dir>/<key>.json`, written atomically. Blocking file
//! I/O runs on the blocking thread pool.

use async_trait::async_trait;
use dexswipe_core::PersistenceError;
use dexswipe_core::storage::KeyValueStore;
use std::path::{Path, PathBuf};

use super::atomic_file::AtomicFile;
use crate::paths::DexPaths;

#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store in the standard storage directory.
    pub fn from_paths(paths: &DexPaths) -> Result<Self, PersistenceError> {
        let dir = paths
            .storage_dir()
            .map_err(|e| PersistenceError::io(e.to_string()))?;
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, key: &str) -> Result<AtomicFile, PersistenceError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(PersistenceError::io(format!("invalid storage key '{}'", key)));
        }
        Ok(AtomicFile::new(self.dir.join(format!("{}.json", key))))
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, PersistenceError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PersistenceError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PersistenceError::io(format!("Failed to join task: {}", e)))?
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let file = self.file_for(key)?;
        run_blocking(move || file.load()).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let file = self.file_for(key)?;
        let len = value.len();
        let value = value.to_string();
        run_blocking(move || file.save(&value)).await?;
        tracing::debug!("[FileStore] Wrote key '{}' ({} bytes)", key, len);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let file = self.file_for(key)?;
        run_blocking(move || file.remove()).await
    }
}
