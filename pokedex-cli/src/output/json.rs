//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use pokedex_core::{CatalogEntryDetail, PageResult, TypeName};
use pokedex_store::{Phase, SearchState};
use serde::{Serialize, Serializer};

// ============================================================================
// Output Types
// ============================================================================

/// One entry in a list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryOutput {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub height_m: f64,
    pub weight_kg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One base stat.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatOutput {
    pub name: String,
    pub base_value: u32,
    pub bar_percent: f64,
}

/// The full detail view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailOutput {
    #[serde(flatten)]
    pub entry: EntryOutput,
    pub abilities: Vec<String>,
    pub stats: Vec<StatOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_sprite: Option<String>,
}

/// One assembled page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOutput {
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub has_more: bool,
    pub entries: Vec<EntryOutput>,
    #[serde(serialize_with = "serialize_datetime")]
    pub fetched_at: DateTime<Utc>,
}

/// Everything a browse session accumulated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseOutput {
    pub search_term: String,
    pub type_filter: String,
    pub pages_loaded: usize,
    pub total_count: usize,
    pub has_more: bool,
    pub entries: Vec<EntryOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_datetime_opt")]
    pub settled_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

#[allow(clippy::ref_option)]
fn serialize_datetime_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&dt.to_rfc3339()),
        None => s.serialize_none(),
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats one assembled page.
    pub fn format_page(
        &self,
        result: &PageResult,
        page: usize,
        page_size: usize,
        fetched_at: DateTime<Utc>,
    ) -> Result<String> {
        self.format(&PageOutput {
            page,
            page_size,
            total_count: result.total_count,
            has_more: result.has_more,
            entries: result.entries.iter().map(entry_output).collect(),
            fetched_at,
        })
    }

    /// Formats a browse session's final state.
    pub fn format_browse(
        &self,
        state: &SearchState,
        settled_at: Option<DateTime<Utc>>,
    ) -> Result<String> {
        let pages_loaded = if state.entries.is_empty() {
            0
        } else {
            state.current_page + 1
        };

        self.format(&BrowseOutput {
            search_term: state.search_term.clone(),
            type_filter: state.type_filter.clone(),
            pages_loaded,
            total_count: state.total_count,
            has_more: state.has_more,
            entries: state.entries.iter().map(entry_output).collect(),
            error: (state.phase == Phase::Error)
                .then(|| state.error.clone())
                .flatten(),
            settled_at,
        })
    }

    /// Formats the detail view.
    pub fn format_detail(&self, entry: &CatalogEntryDetail) -> Result<String> {
        self.format(&detail_output(entry))
    }

    /// Formats the type list as an array of names.
    pub fn format_types(&self, types: &[TypeName]) -> Result<String> {
        self.format(&types)
    }
}

/// Converts an entry to list output.
pub fn entry_output(entry: &CatalogEntryDetail) -> EntryOutput {
    EntryOutput {
        id: entry.id,
        name: entry.name.clone(),
        types: entry.types.iter().map(|t| t.as_str().to_string()).collect(),
        height_m: entry.height_meters(),
        weight_kg: entry.weight_kg(),
        image: entry.display_image().map(str::to_string),
    }
}

/// Converts an entry to detail output.
pub fn detail_output(entry: &CatalogEntryDetail) -> DetailOutput {
    DetailOutput {
        entry: entry_output(entry),
        abilities: entry.abilities.clone(),
        stats: entry
            .stats
            .iter()
            .map(|s| StatOutput {
                name: s.name.clone(),
                base_value: s.base_value,
                bar_percent: s.bar_percent(),
            })
            .collect(),
        front_sprite: entry.sprites.front_default.clone(),
    }
}
