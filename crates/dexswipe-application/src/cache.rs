use dexswipe_core::pokemon::{Pokemon, PokemonId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

struct CacheEntry {
    pokemon: Pokemon,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() < ttl
    }
}

/// In-memory cache of fetched entities, keyed by ID.
///
/// Entries expire after `ttl`; an expired entry behaves as absent. When a
/// capacity is set, inserting into a full cache evicts the oldest entry.
#[derive(Clone)]
pub struct EntityCache {
    entries: Arc<RwLock<HashMap<PokemonId, CacheEntry>>>,
    ttl: Duration,
    capacity: Option<usize>,
}

impl EntityCache {
    pub fn new(ttl: Duration, capacity: Option<usize>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            capacity,
        }
    }

    /// Gets a fresh cached entity by ID.
    pub async fn get(&self, id: PokemonId) -> Option<Pokemon> {
        let entries = self.entries.read().await;
        entries
            .get(&id)
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.pokemon.clone())
    }

    /// Inserts or replaces the entry for `pokemon.id`.
    pub async fn insert(&self, pokemon: Pokemon) {
        let mut entries = self.entries.write().await;

        if let Some(capacity) = self.capacity {
            entries.retain(|_, entry| entry.is_fresh(self.ttl));
            while entries.len() >= capacity && !entries.contains_key(&pokemon.id) {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted_at)
                    .map(|(id, _)| *id);
                match oldest {
                    Some(id) => {
                        entries.remove(&id);
                    }
                    None => break,
                }
            }
        }

        entries.insert(
            pokemon.id,
            CacheEntry {
                pokemon,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Removes an entry. Returns whether one was present.
    pub async fn remove(&self, id: PokemonId) -> bool {
        self.entries.write().await.remove(&id).is_some()
    }

    /// Clears all cached entities.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
