//! Unified path management for DexSwipe files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/dexswipe/          # Config directory
//! ├── config.toml              # Optional configuration overlay
//! └── storage/                 # Key-value blobs (FileKeyValueStore)
//!     └── pokemon-storage.json
//! ```

use std::path::PathBuf;

const APP_DIR_NAME: &str = "dexswipe";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves DexSwipe paths, either under the platform config directory or
/// under an explicit base (used by tests and embedding hosts).
#[derive(Debug, Clone, Default)]
pub struct DexPaths {
    base_override: Option<PathBuf>,
}

impl DexPaths {
    /// Creates a resolver. `None` uses the platform config directory.
    pub fn new(base_override: Option<PathBuf>) -> Self {
        Self { base_override }
    }

    /// Returns the DexSwipe configuration directory.
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/dexswipe/`
    /// - `Err(PathError::ConfigDirNotFound)`: no platform config directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(ref base) = self.base_override {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Directory holding one file per key-value entry.
    pub fn storage_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("storage"))
    }
}
