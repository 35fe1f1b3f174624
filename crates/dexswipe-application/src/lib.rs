//! Application layer for DexSwipe.
//!
//! Use cases built on the `dexswipe-core` ports: cached entity fetching,
//! the persisted liked collection, startup rehydration and the discovery
//! session state machine. `DexSwipeContext` wires them together.

pub mod cache;
pub mod collection_store;
pub mod context;
pub mod discovery;
pub mod fetch_client;
pub mod rehydration;

#[cfg(test)]
mod testing;

pub use cache::EntityCache;
pub use collection_store::{CollectionSnapshot, CollectionStore};
pub use context::DexSwipeContext;
pub use discovery::{DiscoveryController, SessionPhase, SessionSnapshot};
pub use fetch_client::{EntityFetchClient, IdPicker, UniformIdPicker};
pub use rehydration::{RehydrationOutcome, Rehydrator};
