//! Error types for DexSwipe.

use crate::pokemon::PokemonId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single remote catalog fetch failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchCause {
    /// The catalog answered with a non-2xx status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Connection, DNS or other transport-level failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request did not finish within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The body could not be decoded into a `Pokemon`.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// A single-entity remote fetch failed. Never cached.
///
/// `Clone` so that one coalesced failure can be handed to every caller that
/// was waiting on the same in-flight request.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("Failed to fetch Pokémon with ID {id}: {cause}")]
pub struct FetchError {
    pub id: PokemonId,
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(id: PokemonId, cause: FetchCause) -> Self {
        Self { id, cause }
    }

    pub fn status(id: PokemonId, status: u16) -> Self {
        Self::new(id, FetchCause::Status(status))
    }

    pub fn transport(id: PokemonId, message: impl Into<String>) -> Self {
        Self::new(id, FetchCause::Transport(message.into()))
    }

    pub fn timeout(id: PokemonId) -> Self {
        Self::new(id, FetchCause::Timeout)
    }

    pub fn decode(id: PokemonId, message: impl Into<String>) -> Self {
        Self::new(id, FetchCause::Decode(message.into()))
    }

    /// True when the catalog reported that the ID does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self.cause, FetchCause::Status(404))
    }
}

/// A bulk fetch failed because at least one constituent fetch failed.
///
/// The whole batch is considered failed; no partial results are surfaced.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("Bulk fetch failed: {first_failure}")]
pub struct BulkFetchError {
    pub first_failure: FetchError,
}

impl From<FetchError> for BulkFetchError {
    fn from(first_failure: FetchError) -> Self {
        Self { first_failure }
    }
}

/// Durable storage read/write failure.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersistenceError {
    /// File system or storage backend error.
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML"
        message: String,
    },

    /// The storage lock could not be acquired.
    #[error("Lock error: {0}")]
    Lock(String),

    /// Stored data exists but does not describe a valid state.
    #[error("Corrupt data under key '{key}': {message}")]
    Corrupt { key: String, message: String },
}

impl PersistenceError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn corrupt(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A shared error type for the whole DexSwipe data layer.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum DexError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    BulkFetch(#[from] BulkFetchError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DexError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::BulkFetch(_))
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<std::io::Error> for DexError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence(err.into())
    }
}

impl From<serde_json::Error> for DexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(err.into())
    }
}

impl From<toml::de::Error> for DexError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("TOML - {}", err))
    }
}

/// A type alias for `Result<T, DexError>`.
pub type Result<T> = std::result::Result<T, DexError>;
