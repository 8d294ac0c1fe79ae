//! Page assembly errors.

use pokedex_core::CoreError;
use pokedex_fetch::FetchError;
use thiserror::Error;

/// Errors from [`PageAssembler::get_page`](crate::PageAssembler::get_page).
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// The query cannot be served (zero page size).
    #[error(transparent)]
    InvalidQuery(#[from] CoreError),

    /// A catalog call needed for this page failed; no partial page is returned.
    #[error("Failed to assemble page {page}: {source}")]
    PageAssemblyFailed {
        /// Zero-based index of the page being assembled.
        page: usize,
        /// The underlying fetch failure.
        #[source]
        source: FetchError,
    },
}

impl AssemblyError {
    /// Returns the underlying fetch failure, if any.
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            Self::PageAssemblyFailed { source, .. } => Some(source),
            Self::InvalidQuery(_) => None,
        }
    }
}
