//! Preferences repository trait.

use async_trait::async_trait;

use crate::error::PersistenceError;
use crate::preferences::model::UserPreferences;

/// Repository for the persisted user preferences blob.
#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    /// Loads the stored preferences.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet. Unreadable or
    /// corrupt data is reported as an error; callers decide whether to fall
    /// back to defaults.
    async fn load(&self) -> Result<Option<UserPreferences>, PersistenceError>;

    /// Saves the preferences, replacing any previous value.
    async fn save(&self, preferences: &UserPreferences) -> Result<(), PersistenceError>;
}
