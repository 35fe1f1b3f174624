//! Discovery session controller.
//!
//! Drives the "show me the next Pokémon" loop. Each `request_next` call takes
//! a fresh request token; a completed fetch may only touch session state if
//! its token is still the active one. Superseded requests run to completion
//! and are then discarded.

use dexswipe_core::error::FetchError;
use dexswipe_core::pokemon::Pokemon;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::collection_store::CollectionStore;
use crate::fetch_client::EntityFetchClient;

/// Message shown when no Pokémon could be loaded and there is nothing to fall back on.
pub const CONNECTION_FAILED_MESSAGE: &str =
    "Failed to encounter a Pokémon. Check your connection.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// No current entity and nothing in flight.
    #[default]
    Idle,
    /// First fetch in flight; nothing to show yet.
    Loading,
    /// Current entity set, nothing in flight.
    Ready,
    /// Last fetch failed with no current entity to fall back on.
    Error,
    /// Current entity still shown while its replacement is in flight.
    Refreshing,
}

/// Read-only view of the session published to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub current: Option<Pokemon>,
    /// Blocking error, set only in `SessionPhase::Error`.
    pub error: Option<String>,
    /// Failure of the latest request while an older entity stays on screen.
    pub transient_error: Option<String>,
    /// Token of the most recently issued request.
    pub request_token: u64,
}

impl SessionSnapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Loading | SessionPhase::Refreshing)
    }
}

/// Session controller. Cheap to clone; clones share one session.
#[derive(Clone)]
pub struct DiscoveryController {
    fetch_client: EntityFetchClient,
    store: CollectionStore,
    state: Arc<watch::Sender<SessionSnapshot>>,
    auto_retries: u32,
}

impl DiscoveryController {
    pub fn new(fetch_client: EntityFetchClient, store: CollectionStore, auto_retries: u32) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            fetch_client,
            store,
            state: Arc::new(state),
            auto_retries,
        }
    }

    /// Starts fetching a random Pokémon, superseding any request in flight.
    ///
    /// Session state moves to `Loading`, or `Refreshing` when a current entity
    /// is shown. The returned handle resolves once this request has completed,
    /// whether its result was applied or discarded as stale. Must be called
    /// from within a tokio runtime.
    pub fn request_next(&self) -> JoinHandle<()> {
        let mut token = 0;
        self.state.send_modify(|state| {
            state.request_token += 1;
            token = state.request_token;
            state.phase = if state.current.is_some() {
                SessionPhase::Refreshing
            } else {
                SessionPhase::Loading
            };
            state.error = None;
            state.transient_error = None;
        });
        tracing::debug!("[Discovery] Issued request {}", token);

        let controller = self.clone();
        tokio::spawn(async move {
            let result = controller.fetch_with_retry(token).await;
            controller.complete(token, result);
        })
    }

    /// Adds `pokemon` to the liked collection, then requests the next one.
    ///
    /// Awaiting this waits for the like to be applied and persisted. The
    /// returned handle is the one from `request_next` and resolves when the
    /// follow-up request has completed, so callers that need the next entity
    /// await twice: `controller.like(p).await.await`.
    pub async fn like(&self, pokemon: Pokemon) -> JoinHandle<()> {
        self.store.add_liked(pokemon).await;
        self.request_next()
    }

    /// Passes on `pokemon` without touching the collection.
    pub fn dislike(&self, pokemon: &Pokemon) -> JoinHandle<()> {
        tracing::debug!("[Discovery] Passed on ID {}", pokemon.id);
        self.request_next()
    }

    /// Clears the current entity and invalidates any request in flight.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            state.request_token += 1;
            state.phase = SessionPhase::Idle;
            state.current = None;
            state.error = None;
            state.transient_error = None;
        });
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn current(&self) -> Option<Pokemon> {
        self.state.borrow().current.clone()
    }

    /// Subscribes to session changes. The receiver starts at the current snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    fn is_active(&self, token: u64) -> bool {
        self.state.borrow().request_token == token
    }

    async fn fetch_with_retry(&self, token: u64) -> Result<Pokemon, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_client.fetch_random().await {
                Ok(pokemon) => return Ok(pokemon),
                Err(e) if attempt < self.auto_retries && self.is_active(token) => {
                    attempt += 1;
                    tracing::warn!(
                        "[Discovery] Request {} failed ({}), retry {}/{}",
                        token,
                        e,
                        attempt,
                        self.auto_retries
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Applies a finished request if it is still the active one.
    fn complete(&self, token: u64, result: Result<Pokemon, FetchError>) {
        let applied = self.state.send_if_modified(|state| {
            if state.request_token != token {
                return false;
            }
            match result {
                Ok(pokemon) => {
                    state.current = Some(pokemon);
                    state.phase = SessionPhase::Ready;
                    state.error = None;
                    state.transient_error = None;
                }
                Err(ref e) => {
                    tracing::error!("[Discovery] Request {} failed: {}", token, e);
                    if state.current.is_some() {
                        state.phase = SessionPhase::Ready;
                        state.transient_error = Some(CONNECTION_FAILED_MESSAGE.to_string());
                    } else {
                        state.phase = SessionPhase::Error;
                        state.error = Some(CONNECTION_FAILED_MESSAGE.to_string());
                    }
                }
            }
            true
        });

        if !applied {
            tracing::debug!("[Discovery] Discarded stale result of request {}", token);
        }
    }
}
