//! Test doubles for the core ports.

use async_trait::async_trait;
use dexswipe_core::error::{FetchError, PersistenceError};
use dexswipe_core::pokemon::{Pokemon, PokemonCatalog, PokemonId};
use dexswipe_core::preferences::{PreferencesRepository, UserPreferences};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::fetch_client::IdPicker;

/// Catalog double that serves `Pokemon::new(id, "pokemon-{id}")`.
///
/// IDs can be made to fail, and gated so that their response is held back
/// until `release` is called.
#[derive(Default)]
pub struct FakeCatalog {
    calls: Mutex<Vec<PokemonId>>,
    failing: Mutex<HashSet<PokemonId>>,
    /// Number of upcoming calls that fail regardless of ID.
    fail_next: AtomicU32,
    gates: Mutex<HashMap<PokemonId, Arc<Notify>>>,
}

impl FakeCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_id(&self, id: PokemonId) {
        self.failing.lock().unwrap().insert(id);
    }

    pub fn heal_id(&self, id: PokemonId) {
        self.failing.lock().unwrap().remove(&id);
    }

    pub fn fail_next_calls(&self, count: u32) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    /// Holds responses for `id` until `release(id)`.
    pub fn gate(&self, id: PokemonId) {
        self.gates
            .lock()
            .unwrap()
            .insert(id, Arc::new(Notify::new()));
    }

    pub fn release(&self, id: PokemonId) {
        if let Some(gate) = self.gates.lock().unwrap().get(&id) {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<PokemonId> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, id: PokemonId) -> usize {
        self.calls().iter().filter(|c| **c == id).count()
    }
}

#[async_trait]
impl PokemonCatalog for FakeCatalog {
    async fn fetch_pokemon(&self, id: PokemonId) -> Result<Pokemon, FetchError> {
        self.calls.lock().unwrap().push(id);

        let gate = self.gates.lock().unwrap().get(&id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let forced = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if forced || self.failing.lock().unwrap().contains(&id) {
            return Err(FetchError::status(id, 500));
        }
        Ok(pokemon(id))
    }
}

pub fn pokemon(id: PokemonId) -> Pokemon {
    Pokemon::new(id, format!("pokemon-{}", id))
}

/// Picks 1, 2, 3, ... in order, wrapping at `max_id`.
#[derive(Default)]
pub struct SequentialIdPicker {
    next: AtomicU32,
}

impl IdPicker for SequentialIdPicker {
    fn pick(&self, max_id: PokemonId) -> PokemonId {
        self.next.fetch_add(1, Ordering::SeqCst) % max_id + 1
    }
}

/// Preferences repository double with optional failure injection.
#[derive(Default)]
pub struct FakePreferencesRepository {
    stored: Mutex<Option<UserPreferences>>,
    fail_load: bool,
    fail_save: bool,
    saves: AtomicU32,
}

impl FakePreferencesRepository {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with(preferences: UserPreferences) -> Arc<Self> {
        Arc::new(Self {
            stored: Mutex::new(Some(preferences)),
            ..Self::default()
        })
    }

    pub fn unreadable() -> Arc<Self> {
        Arc::new(Self {
            fail_load: true,
            ..Self::default()
        })
    }

    pub fn unwritable() -> Arc<Self> {
        Arc::new(Self {
            fail_save: true,
            ..Self::default()
        })
    }

    pub fn stored(&self) -> Option<UserPreferences> {
        self.stored.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> u32 {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PreferencesRepository for FakePreferencesRepository {
    async fn load(&self) -> Result<Option<UserPreferences>, PersistenceError> {
        if self.fail_load {
            return Err(PersistenceError::corrupt("pokemon-storage", "garbage"));
        }
        Ok(self.stored())
    }

    async fn save(&self, preferences: &UserPreferences) -> Result<(), PersistenceError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_save {
            return Err(PersistenceError::io("disk full"));
        }
        *self.stored.lock().unwrap() = Some(preferences.clone());
        Ok(())
    }
}
