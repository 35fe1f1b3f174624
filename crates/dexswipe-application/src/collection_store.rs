//! Persisted collection store.
//!
//! Owns the liked collection (ID sequence plus hydrated records) and the theme.
//! Every state transition is applied in one step on a `watch` channel, so
//! subscribers never observe the two liked sequences out of step. Only the ID
//! sequence and the theme are written to the preferences repository.

use dexswipe_core::pokemon::{Pokemon, PokemonId};
use dexswipe_core::preferences::{PreferencesRepository, Theme, UserPreferences};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

/// Read-only view of the collection published to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSnapshot {
    /// Liked IDs in insertion order, without duplicates.
    pub liked_ids: Vec<PokemonId>,
    /// Hydrated records for `liked_ids`, in the same relative order.
    pub liked: Vec<Pokemon>,
    pub theme: Theme,
}

impl CollectionSnapshot {
    fn from_preferences(preferences: UserPreferences) -> Self {
        let preferences = preferences.deduplicated();
        Self {
            liked_ids: preferences.liked_pokemon_ids,
            liked: Vec::new(),
            theme: preferences.theme,
        }
    }

    fn to_preferences(&self) -> UserPreferences {
        UserPreferences::new(self.liked_ids.clone(), self.theme)
    }

    pub fn is_liked(&self, id: PokemonId) -> bool {
        self.liked_ids.contains(&id)
    }
}

/// Process-wide owner of the liked collection and theme.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct CollectionStore {
    state: Arc<watch::Sender<CollectionSnapshot>>,
    repository: Arc<dyn PreferencesRepository>,
    /// Serializes writes so the last persisted blob reflects the latest state.
    persist_lock: Arc<Mutex<()>>,
}

impl CollectionStore {
    /// Loads persisted preferences.
    ///
    /// Missing or unreadable data counts as a first run: the collection starts
    /// empty, the theme follows `device_theme` (light when unknown), and that
    /// initial state is persisted right away. Afterwards the device preference
    /// is never consulted again. Hydrated records always start empty.
    pub async fn load(
        repository: Arc<dyn PreferencesRepository>,
        device_theme: Option<Theme>,
    ) -> Self {
        let loaded = match repository.load().await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(
                    "[CollectionStore] Ignoring unreadable preferences, starting fresh: {}",
                    e
                );
                None
            }
        };

        let first_run = loaded.is_none();
        let preferences = loaded.unwrap_or_else(|| {
            UserPreferences::new(Vec::new(), device_theme.unwrap_or_default())
        });

        let (state, _) = watch::channel(CollectionSnapshot::from_preferences(preferences));
        let store = Self {
            state: Arc::new(state),
            repository,
            persist_lock: Arc::new(Mutex::new(())),
        };

        if first_run {
            tracing::info!(
                "[CollectionStore] First run, adopting {} theme",
                store.theme()
            );
            store.persist().await;
        } else {
            tracing::info!(
                "[CollectionStore] Loaded {} liked IDs, {} theme",
                store.state.borrow().liked_ids.len(),
                store.theme()
            );
        }

        store
    }

    /// Appends `pokemon` to both liked sequences. Returns `false` if it was
    /// already liked, in which case nothing changes.
    pub async fn add_liked(&self, pokemon: Pokemon) -> bool {
        let id = pokemon.id;
        let added = self.state.send_if_modified(|state| {
            if state.is_liked(id) {
                return false;
            }
            state.liked_ids.push(id);
            state.liked.push(pokemon);
            true
        });

        if added {
            tracing::debug!("[CollectionStore] Liked ID {}", id);
            self.persist().await;
        }
        added
    }

    /// Removes `id` from both liked sequences. Returns `false` if absent.
    pub async fn remove_liked(&self, id: PokemonId) -> bool {
        let removed = self.state.send_if_modified(|state| {
            if !state.is_liked(id) {
                return false;
            }
            state.liked_ids.retain(|liked| *liked != id);
            state.liked.retain(|pokemon| pokemon.id != id);
            true
        });

        if removed {
            tracing::debug!("[CollectionStore] Removed liked ID {}", id);
            self.persist().await;
        }
        removed
    }

    /// Replaces the hydrated records wholesale.
    ///
    /// The caller guarantees `records` matches the liked ID sequence; it is not
    /// re-validated. Hydrated records are not persisted.
    pub fn hydrate_liked(&self, records: Vec<Pokemon>) {
        self.state.send_modify(|state| state.liked = records);
    }

    /// Merges fetched records into the hydrated sequence.
    ///
    /// The hydrated sequence is rebuilt in the order of the *current* liked
    /// IDs, so records for IDs removed in the meantime are dropped and likes
    /// added in the meantime keep their place. Returns how many IDs gained a
    /// record.
    pub fn merge_hydrated(&self, records: Vec<Pokemon>) -> usize {
        let mut added = 0;
        self.state.send_if_modified(|state| {
            let mut by_id: HashMap<PokemonId, Pokemon> = records
                .into_iter()
                .map(|pokemon| (pokemon.id, pokemon))
                .collect();
            let mut existing: HashMap<PokemonId, Pokemon> = state
                .liked
                .drain(..)
                .map(|pokemon| (pokemon.id, pokemon))
                .collect();

            let mut merged = Vec::with_capacity(state.liked_ids.len());
            for id in &state.liked_ids {
                if let Some(pokemon) = existing.remove(id) {
                    merged.push(pokemon);
                } else if let Some(pokemon) = by_id.remove(id) {
                    merged.push(pokemon);
                    added += 1;
                }
            }
            state.liked = merged;
            added > 0
        });
        added
    }

    pub async fn set_theme(&self, theme: Theme) {
        let changed = self.state.send_if_modified(|state| {
            let changed = state.theme != theme;
            state.theme = theme;
            changed
        });

        if changed {
            tracing::debug!("[CollectionStore] Theme set to {}", theme);
            self.persist().await;
        }
    }

    /// Flips light and dark, returning the new theme.
    pub async fn toggle_theme(&self) -> Theme {
        let mut theme = Theme::default();
        self.state.send_modify(|state| {
            state.theme = state.theme.toggled();
            theme = state.theme;
        });
        tracing::debug!("[CollectionStore] Theme toggled to {}", theme);
        self.persist().await;
        theme
    }

    pub fn snapshot(&self) -> CollectionSnapshot {
        self.state.borrow().clone()
    }

    pub fn liked_ids(&self) -> Vec<PokemonId> {
        self.state.borrow().liked_ids.clone()
    }

    pub fn liked(&self) -> Vec<Pokemon> {
        self.state.borrow().liked.clone()
    }

    pub fn theme(&self) -> Theme {
        self.state.borrow().theme
    }

    pub fn is_liked(&self, id: PokemonId) -> bool {
        self.state.borrow().is_liked(id)
    }

    /// Liked IDs that have no hydrated record yet, in liked order.
    pub fn missing_hydration(&self) -> Vec<PokemonId> {
        let state = self.state.borrow();
        let hydrated: HashSet<PokemonId> = state.liked.iter().map(|p| p.id).collect();
        state
            .liked_ids
            .iter()
            .copied()
            .filter(|id| !hydrated.contains(id))
            .collect()
    }

    /// Subscribes to collection changes. The receiver starts at the current snapshot.
    pub fn subscribe(&self) -> watch::Receiver<CollectionSnapshot> {
        self.state.subscribe()
    }

    /// Best-effort write of the persisted fields. Failures are logged only.
    async fn persist(&self) {
        let _guard = self.persist_lock.lock().await;
        let preferences = self.state.borrow().to_preferences();
        if let Err(e) = self.repository.save(&preferences).await {
            tracing::warn!("[CollectionStore] Failed to persist preferences: {}", e);
        }
    }
}
