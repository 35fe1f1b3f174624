//! Application configuration model.
//!
//! Presets per deployment environment plus a partial overlay type that can be
//! read from a TOML file and applied on top of a preset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{DexError, Result};
use crate::pokemon::PokemonId;

const POKEAPI_URL: &str = "https://pokeapi.co/api/v2";
const STAGING_POKEAPI_URL: &str = "https://staging.pokeapi.co/api/v2";
const DREAM_WORLD_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/dream-world";

/// As of Gen 9 the national Pokédex ends at 1025.
pub const DEFAULT_MAX_ID: PokemonId = 1025;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_AUTO_RETRIES: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = DexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(DexError::config(format!("unknown environment '{}'", other))),
        }
    }
}

/// Effective configuration of the data layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub env: Environment,
    /// Catalog base URL, without trailing slash (`{api_url}/pokemon/{id}`).
    pub api_url: String,
    pub image_storage_url: String,
    pub api_version: String,
    /// How long a cached entity stays valid.
    pub cache_expiration: Duration,
    /// Optional bound on the number of cached entities.
    pub cache_capacity: Option<usize>,
    /// Random draws pick uniformly from `1..=max_id`.
    pub max_id: PokemonId,
    pub request_timeout: Duration,
    /// Automatic retries of a failed discovery fetch before the failure is published.
    pub auto_retries: u32,
}

impl AppConfig {
    /// Preset for the given environment.
    pub fn for_environment(env: Environment) -> Self {
        let (api_url, cache_expiration) = match env {
            Environment::Development => (POKEAPI_URL, Duration::from_secs(5 * 60)),
            Environment::Staging => (STAGING_POKEAPI_URL, Duration::from_secs(30 * 60)),
            Environment::Production => (POKEAPI_URL, Duration::from_secs(24 * 60 * 60)),
        };

        Self {
            env,
            api_url: api_url.to_string(),
            image_storage_url: DREAM_WORLD_URL.to_string(),
            api_version: "v2".to_string(),
            cache_expiration,
            cache_capacity: None,
            max_id: DEFAULT_MAX_ID,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            auto_retries: DEFAULT_AUTO_RETRIES,
        }
    }

    /// Applies every field present in `overlay`.
    pub fn apply(&mut self, overlay: &ConfigOverlay) {
        if let Some(ref url) = overlay.api_url {
            self.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(ref url) = overlay.image_storage_url {
            self.image_storage_url = url.trim_end_matches('/').to_string();
        }
        if let Some(ref version) = overlay.api_version {
            self.api_version = version.clone();
        }
        if let Some(ms) = overlay.cache_expiration_ms {
            self.cache_expiration = Duration::from_millis(ms);
        }
        if let Some(capacity) = overlay.cache_capacity {
            self.cache_capacity = Some(capacity);
        }
        if let Some(max_id) = overlay.max_id {
            self.max_id = max_id;
        }
        if let Some(ms) = overlay.request_timeout_ms {
            self.request_timeout = Duration::from_millis(ms);
        }
        if let Some(retries) = overlay.auto_retries {
            self.auto_retries = retries;
        }
    }

    /// Rejects configurations the data layer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(DexError::config("api_url must not be empty"));
        }
        if self.max_id == 0 {
            return Err(DexError::config("max_id must be at least 1"));
        }
        if self.request_timeout.is_zero() {
            return Err(DexError::config("request_timeout must be positive"));
        }
        if self.cache_expiration.is_zero() {
            return Err(DexError::config("cache_expiration must be positive"));
        }
        if self.cache_capacity == Some(0) {
            return Err(DexError::config("cache_capacity must be positive when set"));
        }
        Ok(())
    }

    /// Catalog endpoint for a single entity.
    pub fn pokemon_url(&self, id: PokemonId) -> String {
        format!("{}/pokemon/{}", self.api_url, id)
    }

    /// Dream-world artwork URL built from the image storage base.
    pub fn artwork_url(&self, id: PokemonId) -> String {
        format!("{}/{}.svg", self.image_storage_url, id)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

/// Partial configuration, typically read from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverlay {
    pub env: Option<Environment>,
    pub api_url: Option<String>,
    pub image_storage_url: Option<String>,
    pub api_version: Option<String>,
    pub cache_expiration_ms: Option<u64>,
    pub cache_capacity: Option<usize>,
    pub max_id: Option<PokemonId>,
    pub request_timeout_ms: Option<u64>,
    pub auto_retries: Option<u32>,
}

impl ConfigOverlay {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
