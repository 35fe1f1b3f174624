//! Preferences repository backed by a key-value store.
//!
//! The whole `UserPreferences` value is serialized as one JSON blob under
//! `PREFERENCES_KEY`.

use async_trait::async_trait;
use dexswipe_core::PersistenceError;
use dexswipe_core::preferences::{PreferencesRepository, UserPreferences};
use dexswipe_core::storage::{KeyValueStore, PREFERENCES_KEY};
use std::sync::Arc;

#[derive(Clone)]
pub struct KeyValuePreferencesRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl KeyValuePreferencesRepository {
    /// Creates a repository using the standard storage key.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, PREFERENCES_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

#[async_trait]
impl PreferencesRepository for KeyValuePreferencesRepository {
    async fn load(&self) -> Result<Option<UserPreferences>, PersistenceError> {
        let Some(raw) = self.store.get(&self.key).await? else {
            return Ok(None);
        };

        let preferences: UserPreferences = serde_json::from_str(&raw)
            .map_err(|e| PersistenceError::corrupt(self.key.clone(), e.to_string()))?;
        Ok(Some(preferences.deduplicated()))
    }

    async fn save(&self, preferences: &UserPreferences) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(preferences)?;
        self.store.set(&self.key, &raw).await
    }
}
