//! Infrastructure layer for DexSwipe.
//!
//! Adapters for the ports defined in `dexswipe-core`: the HTTP catalog
//! client, durable key-value storage, the preferences codec, configuration
//! loading and tracing setup.

pub mod config_service;
pub mod http_catalog;
pub mod paths;
pub mod preferences_repository;
pub mod storage;
pub mod telemetry;

pub use crate::config_service::ConfigService;
pub use crate::http_catalog::HttpPokemonCatalog;
pub use crate::paths::DexPaths;
pub use crate::preferences_repository::KeyValuePreferencesRepository;
pub use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
