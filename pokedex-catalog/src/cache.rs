//! Request memoization.
//!
//! A [`MemoCache`] maps a request key to a decoded response for a bounded
//! time and a bounded number of keys. It only saves network traffic: a cold
//! cache produces the same results, and failed requests are never stored.

use pokedex_core::{CatalogEntryDetail, EntryList, TypeName};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Default time-to-live for memo entries.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default number of keys per memo.
pub const DEFAULT_CAPACITY: usize = 1024;

// ============================================================================
// Memo Cache
// ============================================================================

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// A bounded, time-limited memo keyed by request.
///
/// When full, an insert first drops expired entries, then the oldest one.
pub struct MemoCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    capacity: usize,
}

impl<V: Clone> MemoCache<V> {
    /// Creates a memo with the given lifetime and capacity.
    ///
    /// A capacity of zero disables the memo.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            capacity,
        }
    }

    /// Returns the value for `key` unless it is missing or expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.inserted_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Stores `value` under `key`, evicting if at capacity.
    pub async fn insert(&self, key: impl Into<String>, value: V) {
        if self.capacity == 0 {
            return;
        }

        let key = key.into();
        let mut entries = self.entries.write().await;

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);

            if entries.len() >= self.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    debug!(key = %oldest, "Evicting oldest memo entry");
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drops expired entries, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        before - entries.len()
    }

    /// Number of stored entries, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drops everything.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl<V> fmt::Debug for MemoCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoCache")
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Catalog Cache
// ============================================================================

/// One memo per catalog operation, injected into
/// [`CatalogClient::with_cache`](crate::CatalogClient::with_cache).
#[derive(Debug)]
pub struct CatalogCache {
    /// `list_entries` results.
    pub lists: MemoCache<EntryList>,
    /// `entry_detail` results.
    pub details: MemoCache<CatalogEntryDetail>,
    /// `type_names` results.
    pub type_names: MemoCache<Vec<TypeName>>,
    /// `type_members` results.
    pub type_members: MemoCache<Vec<String>>,
}

impl CatalogCache {
    /// Creates a cache whose memos share the given lifetime and capacity.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            lists: MemoCache::new(ttl, capacity),
            details: MemoCache::new(ttl, capacity),
            type_names: MemoCache::new(ttl, capacity),
            type_members: MemoCache::new(ttl, capacity),
        }
    }

    /// Drops every memo entry.
    pub async fn clear(&self) {
        self.lists.clear().await;
        self.details.clear().await;
        self.type_names.clear().await;
        self.type_members.clear().await;
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

// ============================================================================
// Tests
// ============================================================================
