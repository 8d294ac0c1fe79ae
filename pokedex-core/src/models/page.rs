//! Paging types.
//!
//! - [`EntryList`] - One page as reported by the upstream list endpoint
//! - [`PageQuery`] - What the caller asked for
//! - [`FilterMode`] - Which assembly branch a query takes
//! - [`PageResult`] - What the page assembler returns

use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::entry::{CatalogEntryDetail, CatalogEntrySummary};
use crate::error::CoreError;

// ============================================================================
// Entry List
// ============================================================================

/// One page of summaries from the upstream list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryList {
    /// Total number of entries upstream.
    pub count: usize,
    /// Whether the upstream reports a following page.
    pub next_page_exists: bool,
    /// Whether the upstream reports a preceding page.
    pub previous_page_exists: bool,
    /// Summaries on this page.
    pub results: Vec<CatalogEntrySummary>,
}

// ============================================================================
// Filter Mode
// ============================================================================

/// Which branch of page assembly a query takes.
///
/// Precedence is type filter, then search term, then neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Type membership list, optionally narrowed by the search term.
    ByType,
    /// Bulk summary batch narrowed by the search term.
    BySearch,
    /// Plain upstream pagination.
    Unfiltered,
}

// ============================================================================
// Page Query
// ============================================================================

/// A request for one page of entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageQuery {
    /// Raw search term; matched as a case-insensitive substring, whitespace
    /// included.
    pub search_term: String,
    /// Raw type filter; empty means no type filter.
    pub type_filter: String,
    /// Zero-based page index.
    pub page_index: usize,
    /// Entries per page. Must be non-zero.
    pub page_size: usize,
}

impl PageQuery {
    /// Creates a new page query.
    pub fn new(
        search_term: impl Into<String>,
        type_filter: impl Into<String>,
        page_index: usize,
        page_size: usize,
    ) -> Self {
        Self {
            search_term: search_term.into(),
            type_filter: type_filter.into(),
            page_index,
            page_size,
        }
    }

    /// Same filters, different page.
    pub fn with_page(&self, page_index: usize) -> Self {
        Self {
            page_index,
            ..self.clone()
        }
    }

    /// Rejects queries that cannot be served.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidQuery`] when the page size is zero.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.page_size == 0 {
            return Err(CoreError::InvalidQuery(
                "page size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Search term lower-cased. Whitespace is part of the term.
    pub fn normalized_term(&self) -> String {
        self.search_term.to_lowercase()
    }

    /// Type filter trimmed and lower-cased, as used in the membership URL.
    pub fn normalized_type(&self) -> String {
        self.type_filter.trim().to_lowercase()
    }

    /// Which assembly branch this query takes.
    pub fn filter_mode(&self) -> FilterMode {
        if !self.normalized_type().is_empty() {
            FilterMode::ByType
        } else if !self.search_term.is_empty() {
            FilterMode::BySearch
        } else {
            FilterMode::Unfiltered
        }
    }

    /// Index of the first entry on this page.
    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }

    /// The slice of a `total`-long list that falls on this page.
    pub fn page_bounds(&self, total: usize) -> Range<usize> {
        let start = self.offset().min(total);
        let end = start.saturating_add(self.page_size).min(total);
        start..end
    }

    /// Whether entries remain past this page in a `total`-long list.
    pub fn has_more_after(&self, total: usize) -> bool {
        self.page_index
            .saturating_add(1)
            .saturating_mul(self.page_size)
            < total
    }

    /// Case-insensitive substring match of `name` against the search term.
    ///
    /// An empty term matches everything.
    pub fn matches_name(&self, name: &str) -> bool {
        let term = self.normalized_term();
        term.is_empty() || name.to_lowercase().contains(&term)
    }
}

// ============================================================================
// Page Result
// ============================================================================

/// One assembled page of fully detailed entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// Entries on this page, in list order. Never longer than the page size.
    pub entries: Vec<CatalogEntryDetail>,
    /// Number of entries matching the query across all pages.
    pub total_count: usize,
    /// Whether unseen matching entries exist past this page.
    pub has_more: bool,
}

impl PageResult {
    /// An empty, exhausted page.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of entries on this page.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the page holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
