//! Domain layer for DexSwipe.
//!
//! Holds the catalog entity model, the persisted preference model, the
//! configuration model, the shared error types and the port traits that the
//! infrastructure crate implements.

pub mod config;
pub mod error;
pub mod pokemon;
pub mod preferences;
pub mod storage;

// Re-export common error type
pub use error::{BulkFetchError, DexError, FetchCause, FetchError, PersistenceError};
