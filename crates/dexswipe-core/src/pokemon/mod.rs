//! Pokémon catalog domain.
//!
//! Entities are value objects: fetched once from the remote catalog, cached by
//! ID and never mutated afterwards.

pub mod catalog;
pub mod model;

pub use catalog::PokemonCatalog;
pub use model::{
    NamedResource, Pokemon, PokemonAbility, PokemonId, PokemonStat, PokemonType, Sprites,
    MAX_BASE_STAT,
};
