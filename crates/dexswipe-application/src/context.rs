//! Application context.
//!
//! Wires the catalog, fetch client, collection store and discovery controller
//! into one handle that the presentation layer holds. Multiple independent
//! contexts can coexist in a process.

use anyhow::{Result, anyhow};
use dexswipe_core::config::AppConfig;
use dexswipe_core::pokemon::PokemonCatalog;
use dexswipe_core::preferences::{PreferencesRepository, Theme};
use dexswipe_infrastructure::{
    ConfigService, DexPaths, FileKeyValueStore, HttpPokemonCatalog, KeyValuePreferencesRepository,
};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::collection_store::CollectionStore;
use crate::discovery::DiscoveryController;
use crate::fetch_client::EntityFetchClient;
use crate::rehydration::{RehydrationOutcome, Rehydrator};

#[derive(Clone)]
pub struct DexSwipeContext {
    config: AppConfig,
    fetch_client: EntityFetchClient,
    store: CollectionStore,
    discovery: DiscoveryController,
}

impl DexSwipeContext {
    /// Builds a context from explicit collaborators.
    ///
    /// `device_theme` is the host's reported preference; it only matters when
    /// no preferences have been persisted yet.
    pub async fn new(
        config: AppConfig,
        catalog: Arc<dyn PokemonCatalog>,
        preferences: Arc<dyn PreferencesRepository>,
        device_theme: Option<Theme>,
    ) -> Self {
        let fetch_client = EntityFetchClient::new(catalog, &config);
        Self::assemble(config, fetch_client, preferences, device_theme).await
    }

    /// Builds the production context: configuration from presets, the
    /// overlay file and environment, preferences on disk under `paths`, and
    /// the HTTP catalog.
    pub async fn bootstrap(paths: &DexPaths, device_theme: Option<Theme>) -> Result<Self> {
        let config = ConfigService::new(paths)
            .load()
            .map_err(|e| anyhow!("Failed to resolve configuration: {}", e))?;

        let store = FileKeyValueStore::from_paths(paths)
            .map_err(|e| anyhow!("Failed to resolve storage directory: {}", e))?;
        tracing::info!("[Bootstrap] Storage directory: {}", store.dir().display());
        let preferences = Arc::new(KeyValuePreferencesRepository::new(Arc::new(store)));

        let catalog = HttpPokemonCatalog::from_config(&config)
            .map_err(|e| anyhow!("Failed to build catalog client: {}", e))?;

        Ok(Self::new(config, Arc::new(catalog), preferences, device_theme).await)
    }

    async fn assemble(
        config: AppConfig,
        fetch_client: EntityFetchClient,
        preferences: Arc<dyn PreferencesRepository>,
        device_theme: Option<Theme>,
    ) -> Self {
        let store = CollectionStore::load(preferences, device_theme).await;
        let discovery =
            DiscoveryController::new(fetch_client.clone(), store.clone(), config.auto_retries);
        Self {
            config,
            fetch_client,
            store,
            discovery,
        }
    }

    /// Starts background rehydration of the liked collection.
    ///
    /// Does not wait for it; the returned handle reports the outcome.
    pub fn start(&self) -> JoinHandle<RehydrationOutcome> {
        Rehydrator::new(self.fetch_client.clone(), self.store.clone()).spawn()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn fetch_client(&self) -> &EntityFetchClient {
        &self.fetch_client
    }

    pub fn collection(&self) -> &CollectionStore {
        &self.store
    }

    pub fn discovery(&self) -> &DiscoveryController {
        &self.discovery
    }
}
