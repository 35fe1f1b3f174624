//! Atomic file writes with advisory locking.
//!
//! Provides a thin layer for safe concurrent access to single-blob files.

use dexswipe_core::PersistenceError;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

/// A handle to a file that is only ever replaced as a whole.
///
/// Provides:
/// - **Atomicity**: writes go to a tmp file that is renamed over the target
/// - **Isolation**: an exclusive lock file serializes writers
/// - **Durability**: explicit fsync before rename
#[derive(Debug, Clone)]
pub struct AtomicFile {
    path: PathBuf,
}

impl AtomicFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file contents.
    ///
    /// - `Ok(Some(String))`: file exists and is non-empty
    /// - `Ok(None)`: file doesn't exist or is blank
    /// - `Err`: failed to read
    pub fn load(&self) -> Result<Option<String>, PersistenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    /// Replaces the file contents atomically while holding the lock.
    pub fn save(&self, content: &str) -> Result<(), PersistenceError> {
        let _lock = FileLock::acquire(&self.path)?;
        self.write_atomic(content)
    }

    /// Deletes the file. Missing files are ignored.
    pub fn remove(&self) -> Result<(), PersistenceError> {
        let _lock = FileLock::acquire(&self.path)?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_atomic(&self, content: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf, PersistenceError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| PersistenceError::io("Path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| PersistenceError::io("Path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// A file lock guard. The lock is released when the handle is closed on drop.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, PersistenceError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        use fs2::FileExt;
        file.lock_exclusive()
            .map_err(|e| PersistenceError::Lock(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("blob.json"));

        file.save(r#"{"a":1}"#).unwrap();
        assert_eq!(file.load().unwrap().as_deref(), Some(r#"{"a":1}"#));

        file.save("second").unwrap();
        assert_eq!(file.load().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_load_missing_or_blank() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("missing.json"));
        assert!(file.load().unwrap().is_none());

        fs::write(file.path(), "   \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_creates_parent_dirs_and_leaves_no_tmp() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/blob.json");
        let file = AtomicFile::new(path.clone());

        file.save("x").unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("nested/dir/.blob.json.tmp").exists());
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("blob.json"));
        file.save("x").unwrap();
        file.remove().unwrap();
        assert!(file.load().unwrap().is_none());
        // Second remove is a no-op.
        file.remove().unwrap();
    }
}
