//! In-memory catalog for tests.
//!
//! [`FixtureCatalog`] answers every [`CatalogApi`] call from a fixed entry
//! set, records each call, and can hold a call open until the test releases
//! it. Gate keys are:
//!
//! - `list:{limit}:{offset}`
//! - `detail:{name}`
//! - `types`
//! - `type:{name}`

use async_trait::async_trait;
use pokedex_core::{CatalogEntryDetail, CatalogEntrySummary, EntryList, Sprites, StatValue, TypeName};
use pokedex_fetch::{AttemptError, FetchError};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Notify;

use crate::source::CatalogApi;

/// A catalog backed by a fixed entry list.
#[derive(Debug, Default)]
pub struct FixtureCatalog {
    entries: Vec<CatalogEntryDetail>,
    failing: HashSet<String>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl FixtureCatalog {
    /// Creates a catalog over `entries`, ordered by id.
    pub fn new(mut entries: Vec<CatalogEntryDetail>) -> Self {
        entries.sort_by_key(|e| e.id);
        Self {
            entries,
            ..Self::default()
        }
    }

    /// Makes `entry_detail(name)` fail with HTTP 503.
    pub fn with_failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_lowercase());
        self
    }

    /// Holds the call identified by `key` until the returned handle is
    /// notified. Each notification releases one waiting call.
    pub fn hold(&self, key: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), gate.clone());
        gate
    }

    /// Every call made so far, as gate keys, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls whose key starts with `prefix`.
    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|key| key.starts_with(prefix))
            .count()
    }

    async fn enter(&self, key: String) {
        let gate = self
            .gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key);
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn find(&self, name_or_id: &str) -> Option<&CatalogEntryDetail> {
        match name_or_id.parse::<u32>() {
            Ok(id) => self.entries.iter().find(|e| e.id == id),
            Err(_) => self.entries.iter().find(|e| e.name == name_or_id),
        }
    }
}

fn failure(url: String, status: u16, reason: &str) -> FetchError {
    FetchError::failed(
        url,
        3,
        AttemptError::HttpStatus {
            status,
            reason: reason.to_string(),
        },
    )
}

#[async_trait]
impl CatalogApi for FixtureCatalog {
    async fn list_entries(&self, limit: usize, offset: usize) -> Result<EntryList, FetchError> {
        self.enter(format!("list:{limit}:{offset}")).await;

        let start = offset.min(self.entries.len());
        let end = start.saturating_add(limit).min(self.entries.len());
        Ok(EntryList {
            count: self.entries.len(),
            next_page_exists: end < self.entries.len(),
            previous_page_exists: start > 0,
            results: self.entries[start..end]
                .iter()
                .map(|e| CatalogEntrySummary::new(&e.name, format!("fixture://pokemon/{}", e.id)))
                .collect(),
        })
    }

    async fn entry_detail(&self, name_or_id: &str) -> Result<CatalogEntryDetail, FetchError> {
        let name = name_or_id.trim().to_lowercase();
        self.enter(format!("detail:{name}")).await;

        let url = format!("fixture://pokemon/{name}");
        if self.failing.contains(&name) {
            return Err(failure(url, 503, "Service Unavailable"));
        }
        self.find(&name)
            .cloned()
            .ok_or_else(|| failure(url, 404, "Not Found"))
    }

    async fn type_names(&self) -> Result<Vec<TypeName>, FetchError> {
        self.enter("types".to_string()).await;

        let mut names: Vec<TypeName> = Vec::new();
        for type_name in self.entries.iter().flat_map(|e| e.types.iter()) {
            if !names.contains(type_name) {
                names.push(type_name.clone());
            }
        }
        Ok(names)
    }

    async fn type_members(&self, type_name: &str) -> Result<Vec<String>, FetchError> {
        let type_name = type_name.trim().to_lowercase();
        self.enter(format!("type:{type_name}")).await;

        let members: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.has_type(&type_name))
            .map(|e| e.name.clone())
            .collect();
        if members.is_empty() {
            return Err(failure(format!("fixture://type/{type_name}"), 404, "Not Found"));
        }
        Ok(members)
    }
}

/// Builds a minimal entry.
pub fn entry(id: u32, name: &str, types: &[&str]) -> CatalogEntryDetail {
    CatalogEntryDetail {
        id,
        name: name.to_string(),
        types: types.iter().map(|t| TypeName::new(*t)).collect(),
        stats: vec![StatValue::new("hp", 40 + id % 60)],
        height: 3 + id % 20,
        weight: 50 + id * 7,
        abilities: vec!["run-away".to_string()],
        sprites: Sprites {
            front_default: Some(format!("https://img.example/{id}.png")),
            official_artwork: None,
        },
    }
}

/// Twenty-one early entries; twelve of them carry `fire`.
pub fn starter_catalog() -> FixtureCatalog {
    FixtureCatalog::new(vec![
        entry(1, "bulbasaur", &["grass", "poison"]),
        entry(2, "ivysaur", &["grass", "poison"]),
        entry(3, "venusaur", &["grass", "poison"]),
        entry(4, "charmander", &["fire"]),
        entry(5, "charmeleon", &["fire"]),
        entry(6, "charizard", &["fire", "flying"]),
        entry(7, "squirtle", &["water"]),
        entry(8, "wartortle", &["water"]),
        entry(9, "blastoise", &["water"]),
        entry(25, "pikachu", &["electric"]),
        entry(26, "raichu", &["electric"]),
        entry(37, "vulpix", &["fire"]),
        entry(38, "ninetales", &["fire"]),
        entry(58, "growlithe", &["fire"]),
        entry(59, "arcanine", &["fire"]),
        entry(77, "ponyta", &["fire"]),
        entry(78, "rapidash", &["fire"]),
        entry(126, "magmar", &["fire"]),
        entry(136, "flareon", &["fire"]),
        entry(146, "moltres", &["fire", "flying"]),
        entry(172, "pichu", &["electric"]),
    ])
}
