//! Durable key-value storage port.

use async_trait::async_trait;

use crate::error::PersistenceError;

/// Storage key under which the preferences blob is kept.
pub const PREFERENCES_KEY: &str = "pokemon-storage";

/// A key-value persistence layer holding serialized blobs.
///
/// Each key maps to a single opaque string. Writes replace the whole value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value under `key`, or `None` if nothing has been written.
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Removes the value under `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}
