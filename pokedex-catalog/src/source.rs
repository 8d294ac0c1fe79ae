//! The catalog read interface.

use async_trait::async_trait;
use pokedex_core::{CatalogEntryDetail, EntryList, TypeName};
use pokedex_fetch::FetchError;

/// Read operations against the upstream catalog.
///
/// All operations are idempotent. Implementations:
/// - [`CatalogClient`](crate::CatalogClient) - REST calls to the catalog service
/// - `FixtureCatalog` (feature `tests`) - In-memory data for tests
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Lists up to `limit` summaries starting at `offset`.
    async fn list_entries(&self, limit: usize, offset: usize) -> Result<EntryList, FetchError>;

    /// Fetches the full record for an entry by name or numeric id.
    ///
    /// Lookup is case-insensitive.
    async fn entry_detail(&self, name_or_id: &str) -> Result<CatalogEntryDetail, FetchError>;

    /// Lists every type name.
    async fn type_names(&self) -> Result<Vec<TypeName>, FetchError>;

    /// Lists the names of every entry carrying `type_name`.
    ///
    /// Lookup is case-insensitive.
    async fn type_members(&self, type_name: &str) -> Result<Vec<String>, FetchError>;
}
