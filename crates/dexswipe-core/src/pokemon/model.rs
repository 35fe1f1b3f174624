//! Pokémon domain models.
//!
//! Field names mirror the catalog's JSON so that responses deserialize
//! directly. Unknown fields are ignored and missing lists default to empty.

use serde::{Deserialize, Serialize};

/// National Pokédex number. Always positive.
pub type PokemonId = u32;

/// Upper bound of a base stat by convention of the catalog. Not enforced.
pub const MAX_BASE_STAT: u32 = 255;

/// A resource reference with a name and a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl NamedResource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: String::new(),
        }
    }
}

/// A typed categorical tag (e.g. "grass").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonType {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// A named ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonAbility {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
    pub slot: u32,
}

/// A named base stat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedResource,
}

impl PokemonStat {
    /// Stat name with hyphens replaced by spaces ("special-attack" -> "special attack").
    pub fn display_label(&self) -> String {
        self.stat.name.replace('-', " ")
    }

    /// Fraction of `MAX_BASE_STAT`, clamped to `1.0`.
    pub fn fill_ratio(&self) -> f32 {
        (self.base_stat as f32 / MAX_BASE_STAT as f32).min(1.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DreamWorldSprite {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(default)]
    pub dream_world: DreamWorldSprite,
}

/// Sprite URLs. Only the dream-world artwork is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub other: OtherSprites,
}

/// A catalog entity.
///
/// `height` is in decimeters and `weight` in hectograms, as the catalog
/// reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: PokemonId,
    pub name: String,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub abilities: Vec<PokemonAbility>,
    #[serde(default)]
    pub types: Vec<PokemonType>,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
}

impl Pokemon {
    /// Creates a bare entity with no tags, abilities or stats.
    pub fn new(id: PokemonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sprites: Sprites::default(),
            abilities: Vec::new(),
            types: Vec::new(),
            stats: Vec::new(),
            height: 0,
            weight: 0,
        }
    }

    /// Name with the first letter upper-cased ("bulbasaur" -> "Bulbasaur").
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Pokédex number padded to three digits ("#001").
    pub fn dex_number(&self) -> String {
        format!("#{:03}", self.id)
    }

    pub fn height_meters(&self) -> f32 {
        self.height as f32 / 10.0
    }

    pub fn weight_kilograms(&self) -> f32 {
        self.weight as f32 / 10.0
    }

    /// The type in the lowest slot, if any.
    pub fn primary_type(&self) -> Option<&str> {
        self.types
            .iter()
            .min_by_key(|t| t.slot)
            .map(|t| t.kind.name.as_str())
    }

    /// Dream-world artwork URL as reported by the catalog.
    pub fn artwork_url(&self) -> Option<&str> {
        self.sprites.other.dream_world.front_default.as_deref()
    }

    pub fn ability_names(&self) -> impl Iterator<Item = &str> {
        self.abilities.iter().map(|a| a.ability.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BULBASAUR_JSON: &str = r#"{
        "id": 1,
        "name": "bulbasaur",
        "base_experience": 64,
        "height": 7,
        "weight": 69,
        "sprites": {
            "front_default": "ignored",
            "other": { "dream_world": { "front_default": "https://img/1.svg", "front_female": null } }
        },
        "abilities": [
            { "ability": { "name": "overgrow", "url": "https://pokeapi.co/api/v2/ability/65/" }, "is_hidden": false, "slot": 1 },
            { "ability": { "name": "chlorophyll", "url": "https://pokeapi.co/api/v2/ability/34/" }, "is_hidden": true, "slot": 3 }
        ],
        "types": [
            { "slot": 2, "type": { "name": "poison", "url": "https://pokeapi.co/api/v2/type/4/" } },
            { "slot": 1, "type": { "name": "grass", "url": "https://pokeapi.co/api/v2/type/12/" } }
        ],
        "stats": [
            { "base_stat": 45, "effort": 0, "stat": { "name": "hp", "url": "" } },
            { "base_stat": 65, "effort": 1, "stat": { "name": "special-attack", "url": "" } }
        ]
    }"#;

    #[test]
    fn test_deserialize_catalog_payload() {
        let pokemon: Pokemon = serde_json::from_str(BULBASAUR_JSON).unwrap();
        assert_eq!(pokemon.id, 1);
        assert_eq!(pokemon.name, "bulbasaur");
        assert_eq!(pokemon.height, 7);
        assert_eq!(pokemon.weight, 69);
        assert_eq!(pokemon.artwork_url(), Some("https://img/1.svg"));
        assert_eq!(
            pokemon.ability_names().collect::<Vec<_>>(),
            vec!["overgrow", "chlorophyll"]
        );
        assert!(pokemon.abilities[1].is_hidden);
        assert_eq!(pokemon.stats.len(), 2);
    }

    #[test]
    fn test_deserialize_sparse_payload() {
        // Payloads without stats/height/weight still decode.
        let json = r#"{"id": 5, "name": "charmeleon", "sprites": {"other": {"dream_world": {"front_default": "url"}}}, "abilities": [], "types": []}"#;
        let pokemon: Pokemon = serde_json::from_str(json).unwrap();
        assert_eq!(pokemon.id, 5);
        assert!(pokemon.stats.is_empty());
        assert_eq!(pokemon.height, 0);
    }

    #[test]
    fn test_display_helpers() {
        let pokemon: Pokemon = serde_json::from_str(BULBASAUR_JSON).unwrap();
        assert_eq!(pokemon.display_name(), "Bulbasaur");
        assert_eq!(pokemon.dex_number(), "#001");
        assert!((pokemon.height_meters() - 0.7).abs() < 1e-6);
        assert!((pokemon.weight_kilograms() - 6.9).abs() < 1e-5);
        assert_eq!(pokemon.primary_type(), Some("grass"));

        assert_eq!(Pokemon::new(25, "").display_name(), "");
        assert_eq!(Pokemon::new(1025, "x").dex_number(), "#1025");
    }

    #[test]
    fn test_stat_helpers() {
        let pokemon: Pokemon = serde_json::from_str(BULBASAUR_JSON).unwrap();
        assert_eq!(pokemon.stats[1].display_label(), "special attack");

        let maxed = PokemonStat {
            base_stat: 300,
            effort: 0,
            stat: NamedResource::new("hp"),
        };
        assert_eq!(maxed.fill_ratio(), 1.0);
        assert!((pokemon.stats[0].fill_ratio() - 45.0 / 255.0).abs() < 1e-6);
    }
}
