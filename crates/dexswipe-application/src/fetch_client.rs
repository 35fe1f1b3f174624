//! Entity fetch client.
//!
//! Read-through access to the remote catalog with an in-memory cache and
//! per-ID request coalescing: concurrent callers asking for the same uncached
//! ID await one shared remote call.

use dexswipe_core::config::AppConfig;
use dexswipe_core::error::{BulkFetchError, FetchError};
use dexswipe_core::pokemon::{Pokemon, PokemonCatalog, PokemonId};
use futures::future::{BoxFuture, FutureExt, Shared, try_join_all};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cache::EntityCache;

type SharedFetch = Shared<BoxFuture<'static, Result<Pokemon, FetchError>>>;

/// Chooses the ID for a random draw.
pub trait IdPicker: Send + Sync {
    /// Returns an ID in `1..=max_id`.
    fn pick(&self, max_id: PokemonId) -> PokemonId;
}

/// Uniform draw over `1..=max_id`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformIdPicker;

impl IdPicker for UniformIdPicker {
    fn pick(&self, max_id: PokemonId) -> PokemonId {
        rand::thread_rng().gen_range(1..=max_id.max(1))
    }
}

struct Inner {
    catalog: Arc<dyn PokemonCatalog>,
    cache: EntityCache,
    in_flight: Mutex<HashMap<PokemonId, SharedFetch>>,
    id_picker: Arc<dyn IdPicker>,
    max_id: PokemonId,
}

/// Fetches catalog entities, caching successes and never caching failures.
#[derive(Clone)]
pub struct EntityFetchClient {
    inner: Arc<Inner>,
}

impl EntityFetchClient {
    pub fn new(catalog: Arc<dyn PokemonCatalog>, config: &AppConfig) -> Self {
        Self::with_id_picker(catalog, config, Arc::new(UniformIdPicker))
    }

    pub fn with_id_picker(
        catalog: Arc<dyn PokemonCatalog>,
        config: &AppConfig,
        id_picker: Arc<dyn IdPicker>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                catalog,
                cache: EntityCache::new(config.cache_expiration, config.cache_capacity),
                in_flight: Mutex::new(HashMap::new()),
                id_picker,
                max_id: config.max_id,
            }),
        }
    }

    pub fn max_id(&self) -> PokemonId {
        self.inner.max_id
    }

    /// Returns the entity with `id`, from cache when present.
    ///
    /// A cache hit makes no remote call. Otherwise the caller joins the
    /// in-flight request for `id`, starting one if none exists. The result
    /// is cached only on success.
    pub async fn fetch_one(&self, id: PokemonId) -> Result<Pokemon, FetchError> {
        if let Some(pokemon) = self.inner.cache.get(id).await {
            tracing::debug!("[FetchClient] Cache hit for ID {}", id);
            return Ok(pokemon);
        }

        let pending = {
            let mut in_flight = self.inner.in_flight.lock().await;

            // A request may have completed between the first lookup and taking the lock.
            if let Some(pokemon) = self.inner.cache.get(id).await {
                return Ok(pokemon);
            }

            match in_flight.get(&id) {
                Some(existing) => {
                    tracing::debug!("[FetchClient] Joining in-flight request for ID {}", id);
                    existing.clone()
                }
                None => {
                    let pending = Self::start_remote_fetch(self.inner.clone(), id);
                    in_flight.insert(id, pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// Fetches every ID in `ids` concurrently, preserving input order.
    ///
    /// All-or-nothing: the first failure fails the whole call and any
    /// results already received are discarded. Duplicate IDs are allowed and
    /// share one remote call.
    pub async fn fetch_many(&self, ids: &[PokemonId]) -> Result<Vec<Pokemon>, BulkFetchError> {
        try_join_all(ids.iter().map(|&id| self.fetch_one(id)))
            .await
            .map_err(|first_failure| {
                tracing::error!(
                    "[FetchClient] Error in parallel fetch of {} IDs: {}",
                    ids.len(),
                    first_failure
                );
                BulkFetchError::from(first_failure)
            })
    }

    /// Fetches a random entity from `1..=max_id`. Repeated draws are possible.
    pub async fn fetch_random(&self) -> Result<Pokemon, FetchError> {
        let id = self.inner.id_picker.pick(self.inner.max_id);
        tracing::debug!("[FetchClient] Random draw: ID {}", id);
        self.fetch_one(id).await
    }

    /// Returns the cached entity without touching the network.
    pub async fn cached(&self, id: PokemonId) -> Option<Pokemon> {
        self.inner.cache.get(id).await
    }

    /// Drops the cached entity so the next read refetches it.
    pub async fn invalidate(&self, id: PokemonId) -> bool {
        self.inner.cache.remove(id).await
    }

    /// Drops every cached entity.
    pub async fn clear_cache(&self) {
        self.inner.cache.clear().await;
    }

    /// Spawns the remote call so it runs to completion even if every caller
    /// stops waiting, then clears the in-flight entry.
    fn start_remote_fetch(inner: Arc<Inner>, id: PokemonId) -> SharedFetch {
        let task = tokio::spawn(async move {
            let result = inner.catalog.fetch_pokemon(id).await;
            match result {
                Ok(ref pokemon) => inner.cache.insert(pokemon.clone()).await,
                Err(ref e) => {
                    tracing::warn!("[FetchClient] Error fetching Pokémon ID {}: {}", id, e)
                }
            }
            inner.in_flight.lock().await.remove(&id);
            result
        });

        async move {
            task.await.unwrap_or_else(|e| {
                Err(FetchError::transport(id, format!("fetch task failed: {}", e)))
            })
        }
        .boxed()
        .shared()
    }
}
