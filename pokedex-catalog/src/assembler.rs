//! Filtered page assembly.
//!
//! The upstream service only paginates plainly; it cannot search names by
//! substring or combine a type filter with a name filter. [`PageAssembler`]
//! does both client-side:
//!
//! | Filters set        | Names come from                    | `total_count`     | `has_more`            |
//! |--------------------|------------------------------------|-------------------|-----------------------|
//! | type (± term)      | `type_members(type)`               | filtered members  | more beyond this page |
//! | term only          | `list_entries(batch_limit, 0)`     | filtered batch    | more beyond this page |
//! | neither            | `list_entries(size, page * size)`  | upstream `count`  | upstream next flag    |
//!
//! Details for the names on the page are then fetched concurrently. If any
//! of them fails the whole page fails.

use futures::future::try_join_all;
use pokedex_core::{CatalogEntryDetail, FilterMode, PageQuery, PageResult};
use pokedex_fetch::FetchError;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::error::AssemblyError;
use crate::source::CatalogApi;

/// Default size of the summary batch scanned by a search-only query.
pub const DEFAULT_SEARCH_BATCH_LIMIT: usize = 2000;

// ============================================================================
// Page Assembler
// ============================================================================

/// Produces fully detailed pages for a search term and type filter.
#[derive(Clone)]
pub struct PageAssembler {
    catalog: Arc<dyn CatalogApi>,
    search_batch_limit: usize,
}

impl std::fmt::Debug for PageAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageAssembler")
            .field("search_batch_limit", &self.search_batch_limit)
            .finish_non_exhaustive()
    }
}

impl PageAssembler {
    /// Creates an assembler reading from `catalog`.
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self {
            catalog,
            search_batch_limit: DEFAULT_SEARCH_BATCH_LIMIT,
        }
    }

    /// Sets how many summaries a search-only query scans.
    pub fn with_search_batch_limit(mut self, limit: usize) -> Self {
        self.search_batch_limit = limit;
        self
    }

    /// The catalog this assembler reads from.
    pub fn catalog(&self) -> &Arc<dyn CatalogApi> {
        &self.catalog
    }

    /// Assembles one page.
    ///
    /// Calling this twice with the same query against unchanged upstream data
    /// yields the same result.
    ///
    /// # Errors
    ///
    /// - [`AssemblyError::InvalidQuery`] if the page size is zero
    /// - [`AssemblyError::PageAssemblyFailed`] if any catalog call fails
    #[instrument(skip(self), fields(mode = tracing::field::Empty))]
    pub async fn get_page(&self, query: &PageQuery) -> Result<PageResult, AssemblyError> {
        query.validate()?;

        let mode = query.filter_mode();
        tracing::Span::current().record("mode", tracing::field::debug(mode));

        let result = match mode {
            FilterMode::ByType => {
                let members = self.catalog.type_members(&query.normalized_type()).await;
                let members = page_error(query, members)?;
                self.filtered_page(query, members).await
            }
            FilterMode::BySearch => {
                let batch = self.catalog.list_entries(self.search_batch_limit, 0).await;
                let batch = page_error(query, batch)?;
                let names = batch.results.into_iter().map(|s| s.name).collect();
                self.filtered_page(query, names).await
            }
            FilterMode::Unfiltered => self.upstream_page(query).await,
        }?;

        info!(
            page = query.page_index,
            entries = result.len(),
            total = result.total_count,
            has_more = result.has_more,
            "Assembled page"
        );

        Ok(result)
    }

    /// Narrows `names` by the search term, slices out the requested page and
    /// fetches its details.
    async fn filtered_page(
        &self,
        query: &PageQuery,
        names: Vec<String>,
    ) -> Result<PageResult, AssemblyError> {
        let matching: Vec<String> = names
            .into_iter()
            .filter(|name| query.matches_name(name))
            .collect();
        let total_count = matching.len();
        let bounds = query.page_bounds(total_count);

        debug!(
            matching = total_count,
            start = bounds.start,
            end = bounds.end,
            "Filtered names"
        );

        let entries = self.details(query, &matching[bounds]).await?;

        Ok(PageResult {
            entries,
            total_count,
            has_more: query.has_more_after(total_count),
        })
    }

    /// Uses upstream pagination directly.
    async fn upstream_page(&self, query: &PageQuery) -> Result<PageResult, AssemblyError> {
        let list = self
            .catalog
            .list_entries(query.page_size, query.offset())
            .await;
        let list = page_error(query, list)?;

        let names: Vec<String> = list
            .results
            .into_iter()
            .take(query.page_size)
            .map(|s| s.name)
            .collect();
        let entries = self.details(query, &names).await?;

        Ok(PageResult {
            entries,
            total_count: list.count,
            has_more: list.next_page_exists,
        })
    }

    /// Fetches every detail concurrently, preserving order. Fails on the
    /// first error.
    async fn details(
        &self,
        query: &PageQuery,
        names: &[String],
    ) -> Result<Vec<CatalogEntryDetail>, AssemblyError> {
        let fetches = names.iter().map(|name| self.catalog.entry_detail(name));
        let details = try_join_all(fetches).await;
        page_error(query, details)
    }
}

/// Tags a catalog failure with the page being assembled.
fn page_error<T>(query: &PageQuery, result: Result<T, FetchError>) -> Result<T, AssemblyError> {
    result.map_err(|source| AssemblyError::PageAssemblyFailed {
        page: query.page_index,
        source,
    })
}

// ============================================================================
// Tests
// ============================================================================
