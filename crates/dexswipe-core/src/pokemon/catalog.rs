//! Remote catalog port.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::pokemon::model::{Pokemon, PokemonId};

/// Source of catalog entities (the remote REST service in production).
///
/// Implementations perform exactly one remote lookup per call; caching and
/// coalescing live above this trait.
#[async_trait]
pub trait PokemonCatalog: Send + Sync {
    /// Fetches the entity with the given ID.
    ///
    /// Non-success statuses, transport failures and timeouts all surface as
    /// `FetchError`.
    async fn fetch_pokemon(&self, id: PokemonId) -> Result<Pokemon, FetchError>;
}
