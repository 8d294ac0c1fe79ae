//! Upstream response shapes.
//!
//! These mirror the JSON the catalog service returns and are converted into
//! core models right after decoding. Only the consumed subset of fields is
//! declared; everything else in the payload is ignored.

use pokedex_core::{
    CatalogEntryDetail, CatalogEntrySummary, EntryList, Sprites, StatValue, TypeName,
};
use serde::Deserialize;

// ============================================================================
// Shared
// ============================================================================

/// A `{ name, url }` reference, used all over the upstream API.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    /// Resource name.
    pub name: String,
    /// Resource URL.
    #[serde(default)]
    pub url: String,
}

impl From<NamedResource> for CatalogEntrySummary {
    fn from(resource: NamedResource) -> Self {
        CatalogEntrySummary::new(resource.name, resource.url)
    }
}

// ============================================================================
// GET /pokemon?limit=&offset=
// ============================================================================

/// Response from the paginated list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    /// Total entries upstream.
    pub count: usize,
    /// URL of the next page, if any.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page, if any.
    #[serde(default)]
    pub previous: Option<String>,
    /// Entries on this page.
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

impl From<ListResponse> for EntryList {
    fn from(response: ListResponse) -> Self {
        EntryList {
            count: response.count,
            next_page_exists: response.next.is_some(),
            previous_page_exists: response.previous.is_some(),
            results: response.results.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// GET /pokemon/{nameOrId}
// ============================================================================

/// Response from the detail endpoint.
#[derive(Debug, Deserialize)]
pub struct PokemonResponse {
    /// Numeric id.
    pub id: u32,
    /// Name.
    pub name: String,
    /// Height in decimetres.
    #[serde(default)]
    pub height: u32,
    /// Weight in hectograms.
    #[serde(default)]
    pub weight: u32,
    /// Sprite URLs.
    #[serde(default)]
    pub sprites: SpritesResponse,
    /// Type slots.
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    /// Base stats.
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    /// Abilities.
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
}

/// One entry of `types[]`.
#[derive(Debug, Deserialize)]
pub struct TypeSlot {
    /// Slot number (1 = primary).
    #[serde(default)]
    pub slot: u32,
    /// The type reference.
    #[serde(rename = "type")]
    pub type_ref: NamedResource,
}

/// One entry of `stats[]`.
#[derive(Debug, Deserialize)]
pub struct StatSlot {
    /// Base value.
    pub base_stat: u32,
    /// The stat reference.
    pub stat: NamedResource,
}

/// One entry of `abilities[]`.
#[derive(Debug, Deserialize)]
pub struct AbilitySlot {
    /// The ability reference.
    pub ability: NamedResource,
}

/// The `sprites` object.
#[derive(Debug, Default, Deserialize)]
pub struct SpritesResponse {
    /// Default front sprite.
    #[serde(default)]
    pub front_default: Option<String>,
    /// Alternative artwork sets.
    #[serde(default)]
    pub other: OtherSprites,
}

/// The `sprites.other` object.
#[derive(Debug, Default, Deserialize)]
pub struct OtherSprites {
    /// Official artwork.
    #[serde(default, rename = "official-artwork")]
    pub official_artwork: ArtworkSprites,
}

/// The `sprites.other.official-artwork` object.
#[derive(Debug, Default, Deserialize)]
pub struct ArtworkSprites {
    /// Front artwork image.
    #[serde(default)]
    pub front_default: Option<String>,
}

impl From<PokemonResponse> for CatalogEntryDetail {
    fn from(mut response: PokemonResponse) -> Self {
        response.types.sort_by_key(|slot| slot.slot);

        CatalogEntryDetail {
            id: response.id,
            name: response.name,
            types: response
                .types
                .into_iter()
                .map(|slot| TypeName::new(slot.type_ref.name))
                .collect(),
            stats: response
                .stats
                .into_iter()
                .map(|slot| StatValue::new(slot.stat.name, slot.base_stat))
                .collect(),
            height: response.height,
            weight: response.weight,
            abilities: response
                .abilities
                .into_iter()
                .map(|slot| slot.ability.name)
                .collect(),
            sprites: Sprites {
                front_default: response.sprites.front_default,
                official_artwork: response.sprites.other.official_artwork.front_default,
            },
        }
    }
}

// ============================================================================
// GET /type and GET /type/{name}
// ============================================================================

/// Response from the type list endpoint.
#[derive(Debug, Deserialize)]
pub struct TypeListResponse {
    /// Type references.
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

impl TypeListResponse {
    /// Type names in upstream order.
    pub fn into_type_names(self) -> Vec<TypeName> {
        self.results
            .into_iter()
            .map(|r| TypeName::new(r.name))
            .collect()
    }
}

/// Response from the type detail endpoint.
#[derive(Debug, Deserialize)]
pub struct TypeDetailResponse {
    /// Members of this type.
    #[serde(default)]
    pub pokemon: Vec<TypeMember>,
}

/// One entry of `pokemon[]` on a type.
#[derive(Debug, Deserialize)]
pub struct TypeMember {
    /// The member reference.
    pub pokemon: NamedResource,
}

impl TypeDetailResponse {
    /// Member names in upstream order.
    pub fn into_member_names(self) -> Vec<String> {
        self.pokemon.into_iter().map(|m| m.pokemon.name).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_list_response() {
        let response: ListResponse = serde_json::from_value(json!({
            "count": 1302,
            "next": "https://pokeapi.co/api/v2/pokemon?offset=20&limit=20",
            "previous": null,
            "results": [
                { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/" }
            ]
        }))
        .unwrap();

        let list = EntryList::from(response);
        assert_eq!(list.count, 1302);
        assert!(list.next_page_exists);
        assert!(!list.previous_page_exists);
        assert_eq!(list.results[0].name, "bulbasaur");
    }

    #[test]
    fn test_parse_pokemon_response() {
        let response: PokemonResponse = serde_json::from_value(json!({
            "id": 6,
            "name": "charizard",
            "height": 17,
            "weight": 905,
            "base_experience": 267,
            "sprites": {
                "front_default": "https://img/6.png",
                "other": {
                    "official-artwork": { "front_default": "https://img/art/6.png" },
                    "home": { "front_default": "ignored" }
                }
            },
            "types": [
                { "slot": 2, "type": { "name": "flying", "url": "" } },
                { "slot": 1, "type": { "name": "fire", "url": "" } }
            ],
            "stats": [
                { "base_stat": 78, "effort": 0, "stat": { "name": "hp", "url": "" } }
            ],
            "abilities": [
                { "ability": { "name": "blaze", "url": "" }, "is_hidden": false, "slot": 1 },
                { "ability": { "name": "solar-power", "url": "" }, "is_hidden": true, "slot": 3 }
            ]
        }))
        .unwrap();

        let detail = CatalogEntryDetail::from(response);
        assert_eq!(detail.id, 6);
        assert_eq!(detail.types, vec![TypeName::new("fire"), TypeName::new("flying")]);
        assert_eq!(detail.stat("hp"), Some(78));
        assert_eq!(detail.abilities, vec!["blaze", "solar-power"]);
        assert_eq!(detail.display_image(), Some("https://img/art/6.png"));
    }

    #[test]
    fn test_missing_sprites_default_to_none() {
        let response: PokemonResponse =
            serde_json::from_value(json!({ "id": 10001, "name": "deoxys-attack" })).unwrap();
        let detail = CatalogEntryDetail::from(response);
        assert_eq!(detail.display_image(), None);
        assert!(detail.types.is_empty());
    }

    #[test]
    fn test_parse_type_responses() {
        let list: TypeListResponse = serde_json::from_value(json!({
            "count": 2,
            "results": [{ "name": "normal", "url": "" }, { "name": "fire", "url": "" }]
        }))
        .unwrap();
        assert_eq!(list.into_type_names(), vec![TypeName::new("normal"), TypeName::new("fire")]);

        let detail: TypeDetailResponse = serde_json::from_value(json!({
            "name": "fire",
            "pokemon": [
                { "slot": 1, "pokemon": { "name": "charmander", "url": "" } },
                { "slot": 1, "pokemon": { "name": "vulpix", "url": "" } }
            ]
        }))
        .unwrap();
        assert_eq!(detail.into_member_names(), vec!["charmander", "vulpix"]);
    }
}
