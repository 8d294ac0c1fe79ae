//! Catalog record types.
//!
//! This module contains the records returned by the catalog:
//! - [`CatalogEntrySummary`] - Lightweight list reference
//! - [`CatalogEntryDetail`] - Full record for a single entry
//! - [`StatValue`] - Base stat pair
//! - [`Sprites`] - Image URLs

use serde::{Deserialize, Serialize};

use super::type_name::TypeName;

/// Highest base value any stat can reach; used to scale stat bars.
pub const MAX_BASE_STAT: u32 = 255;

// ============================================================================
// Summary
// ============================================================================

/// A lightweight reference returned by the list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntrySummary {
    /// Entry name (lower-case upstream).
    pub name: String,
    /// URL of the detail resource.
    pub url: String,
}

impl CatalogEntrySummary {
    /// Creates a new summary.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

// ============================================================================
// Detail
// ============================================================================

/// The full record for one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntryDetail {
    /// Stable numeric identifier.
    pub id: u32,
    /// Entry name.
    pub name: String,
    /// Type tags, in slot order.
    pub types: Vec<TypeName>,
    /// Base stats.
    pub stats: Vec<StatValue>,
    /// Height in decimetres.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
    /// Ability names.
    pub abilities: Vec<String>,
    /// Image URLs.
    pub sprites: Sprites,
}

impl CatalogEntryDetail {
    /// Returns true if the entry carries the given type tag (case-insensitive).
    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.iter().any(|t| t.matches(type_name))
    }

    /// Height in metres.
    pub fn height_meters(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    /// Weight in kilograms.
    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }

    /// The preferred image: official artwork, else the front sprite.
    pub fn display_image(&self) -> Option<&str> {
        self.sprites
            .official_artwork
            .as_deref()
            .or(self.sprites.front_default.as_deref())
    }

    /// Looks up a base stat by name.
    pub fn stat(&self, name: &str) -> Option<u32> {
        self.stats
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.base_value)
    }
}

// ============================================================================
// Stats & Sprites
// ============================================================================

/// One `(stat name, base value)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatValue {
    /// Stat name, e.g. `special-attack`.
    pub name: String,
    /// Base value.
    pub base_value: u32,
}

impl StatValue {
    /// Creates a new stat value.
    pub fn new(name: impl Into<String>, base_value: u32) -> Self {
        Self {
            name: name.into(),
            base_value,
        }
    }

    /// Bar fill in percent, relative to [`MAX_BASE_STAT`] and capped at 100.
    pub fn bar_percent(&self) -> f64 {
        (f64::from(self.base_value) / f64::from(MAX_BASE_STAT) * 100.0).min(100.0)
    }

    /// Stat name with hyphens replaced by spaces.
    pub fn display_name(&self) -> String {
        self.name.replace('-', " ")
    }
}

/// Image URLs for an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    /// The default front-facing sprite.
    pub front_default: Option<String>,
    /// The official artwork image.
    pub official_artwork: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
