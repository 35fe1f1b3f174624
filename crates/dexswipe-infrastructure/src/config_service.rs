//! Configuration resolution.
//!
//! The effective `AppConfig` is built in three layers:
//! 1. the preset for the selected environment (`DEXSWIPE_ENV`, or `env` in the overlay file)
//! 2. an optional TOML overlay file (`config.toml` in the config directory)
//! 3. individual environment variable overrides

use dexswipe_core::config::{AppConfig, ConfigOverlay, Environment};
use dexswipe_core::error::{DexError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths::DexPaths;

pub const ENV_ENVIRONMENT: &str = "DEXSWIPE_ENV";
pub const ENV_API_URL: &str = "DEXSWIPE_API_URL";
pub const ENV_MAX_ID: &str = "DEXSWIPE_MAX_ID";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "DEXSWIPE_REQUEST_TIMEOUT_MS";

/// Builds the effective configuration from presets, file and environment.
pub struct ConfigService {
    overlay_path: Option<PathBuf>,
}

impl ConfigService {
    /// Uses `config.toml` in the standard config directory, if it can be resolved.
    pub fn new(paths: &DexPaths) -> Self {
        Self {
            overlay_path: paths.config_file().ok(),
        }
    }

    /// Uses an explicit overlay file.
    pub fn with_overlay_file(path: impl Into<PathBuf>) -> Self {
        Self {
            overlay_path: Some(path.into()),
        }
    }

    /// Ignores overlay files; presets and environment only.
    pub fn without_overlay_file() -> Self {
        Self { overlay_path: None }
    }

    /// Resolves the configuration from the process environment.
    pub fn load(&self) -> Result<AppConfig> {
        self.load_with(|name| std::env::var(name).ok())
    }

    /// Resolves the configuration using `lookup` for environment variables.
    pub fn load_with<F>(&self, lookup: F) -> Result<AppConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let overlay = match self.overlay_path {
            Some(ref path) => read_overlay(path)?,
            None => None,
        };

        let env = match lookup(ENV_ENVIRONMENT) {
            Some(value) => value.parse::<Environment>()?,
            None => overlay
                .as_ref()
                .and_then(|o| o.env)
                .unwrap_or_default(),
        };

        let mut config = AppConfig::for_environment(env);
        if let Some(ref overlay) = overlay {
            config.apply(overlay);
        }

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup(ENV_MAX_ID) {
            config.max_id = parse_number(ENV_MAX_ID, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_MS) {
            config.request_timeout = Duration::from_millis(parse_number(ENV_REQUEST_TIMEOUT_MS, &raw)?);
        }

        config.validate()?;
        tracing::info!(
            "[Config] Resolved {} configuration (api: {}, max_id: {})",
            config.env,
            config.api_url,
            config.max_id
        );
        Ok(config)
    }
}

fn read_overlay(path: &Path) -> Result<Option<ConfigOverlay>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(DexError::config(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )));
        }
    };

    if content.trim().is_empty() {
        return Ok(None);
    }

    ConfigOverlay::from_toml_str(&content)
        .map(Some)
        .map_err(|e| DexError::config(format!("{}: {}", path.display(), e)))
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| DexError::config(format!("{} must be a number, got '{}'", name, raw)))
}
