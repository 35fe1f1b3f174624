//! User preference domain models.
//!
//! Contains the minimal state that survives process restarts: the liked IDs
//! and the theme. Hydrated records are never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::pokemon::PokemonId;

/// Two-valued display theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The opposite theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Persisted user preferences.
///
/// Serialized as `{ "likedPokemonIds": [..], "theme": "light" | "dark" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Liked IDs in insertion order, without duplicates.
    #[serde(default)]
    pub liked_pokemon_ids: Vec<PokemonId>,

    #[serde(default)]
    pub theme: Theme,
}

impl UserPreferences {
    pub fn new(liked_pokemon_ids: Vec<PokemonId>, theme: Theme) -> Self {
        Self {
            liked_pokemon_ids,
            theme,
        }
    }

    /// Drops repeated IDs, keeping the first occurrence of each.
    ///
    /// Persisted data written by older builds or edited by hand may violate
    /// the no-duplicates rule; loaders call this before trusting the list.
    pub fn deduplicated(mut self) -> Self {
        let mut seen = std::collections::HashSet::new();
        self.liked_pokemon_ids.retain(|id| seen.insert(*id));
        self
    }
}
