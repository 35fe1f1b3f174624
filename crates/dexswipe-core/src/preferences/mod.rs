//! Persisted user preferences: liked IDs and theme.

pub mod model;
pub mod repository;

pub use model::{Theme, UserPreferences};
pub use repository::PreferencesRepository;
