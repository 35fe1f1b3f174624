//! HttpPokemonCatalog - REST client for the remote Pokémon catalog.
//!
//! Issues `GET {api_url}/pokemon/{id}` and decodes the JSON body. No caching
//! happens here; every call is one remote request.

use async_trait::async_trait;
use dexswipe_core::config::AppConfig;
use dexswipe_core::error::{DexError, FetchError};
use dexswipe_core::pokemon::{Pokemon, PokemonCatalog, PokemonId};
use reqwest::Client;
use std::time::Duration;

/// Catalog implementation that talks to the catalog HTTP API.
#[derive(Clone)]
pub struct HttpPokemonCatalog {
    client: Client,
    api_url: String,
}

impl HttpPokemonCatalog {
    /// Creates a client for `api_url` with the given per-request timeout.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, DexError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DexError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, DexError> {
        Self::new(config.api_url.clone(), config.request_timeout)
    }

    pub fn pokemon_url(&self, id: PokemonId) -> String {
        format!("{}/pokemon/{}", self.api_url, id)
    }

    fn map_transport_error(id: PokemonId, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::timeout(id)
        } else if err.is_decode() {
            FetchError::decode(id, err.to_string())
        } else {
            FetchError::transport(id, err.to_string())
        }
    }
}

#[async_trait]
impl PokemonCatalog for HttpPokemonCatalog {
    async fn fetch_pokemon(&self, id: PokemonId) -> Result<Pokemon, FetchError> {
        let url = self.pokemon_url(id);
        tracing::debug!("[PokemonCatalog] GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::map_transport_error(id, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                "[PokemonCatalog] Failed to fetch Pokémon with ID {}. Status: {}",
                id,
                status.as_u16()
            );
            return Err(FetchError::status(id, status.as_u16()));
        }

        let pokemon = response
            .json::<Pokemon>()
            .await
            .map_err(|e| Self::map_transport_error(id, e))?;

        if pokemon.id != id {
            return Err(FetchError::decode(
                id,
                format!("catalog returned ID {} for request {}", pokemon.id, id),
            ));
        }

        Ok(pokemon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building_strips_trailing_slash() {
        let catalog =
            HttpPokemonCatalog::new("https://pokeapi.co/api/v2/", Duration::from_secs(10)).unwrap();
        assert_eq!(catalog.pokemon_url(1), "https://pokeapi.co/api/v2/pokemon/1");
    }

    #[test]
    fn test_from_config() {
        let config = AppConfig::default();
        let catalog = HttpPokemonCatalog::from_config(&config).unwrap();
        assert_eq!(catalog.pokemon_url(25), config.pokemon_url(25));
    }
}
