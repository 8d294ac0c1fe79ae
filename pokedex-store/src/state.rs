//! Incremental search state.
//!
//! [`SearchState`] is a plain value and [`reduce`] is a pure function from a
//! state and an event to the next state. Nothing here performs I/O; a
//! [`SearchSession`](crate::SearchSession) runs the requests a state asks for
//! and feeds their outcomes back in as events.
//!
//! Every issued request bumps [`SearchState::generation`]. Completion events
//! carry the generation they were issued under, and a completion whose
//! generation is not the current one is discarded. This keeps a slow page
//! for an old filter from overwriting the results of a newer one.

use pokedex_core::{CatalogEntryDetail, PageQuery, PageResult};
use serde::{Deserialize, Serialize};

/// Default number of entries per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

// ============================================================================
// Phase
// ============================================================================

/// Where the accumulator is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Page 0 is in flight for the current filters.
    LoadingInitial,
    /// A follow-up page is in flight.
    LoadingMore,
    /// The last request succeeded.
    Ready,
    /// The last request failed.
    Error,
}

// ============================================================================
// State
// ============================================================================

/// Everything a front end needs to render the result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    /// All entries loaded so far for the current filters, in page order.
    pub entries: Vec<CatalogEntryDetail>,
    /// Index of the last page appended to `entries`.
    pub current_page: usize,
    /// Current raw search term.
    pub search_term: String,
    /// Current raw type filter.
    pub type_filter: String,
    /// Entries per page.
    pub page_size: usize,
    /// Load cycle phase.
    pub phase: Phase,
    /// Message of the last failure, cleared by the next request.
    pub error: Option<String>,
    /// Whether more pages exist for the current filters.
    pub has_more: bool,
    /// Total entries matching the current filters.
    pub total_count: usize,
    /// Generation of the most recently issued request.
    pub generation: u64,
    /// Page whose request failed, while in [`Phase::Error`].
    pub failed_page: Option<usize>,
}

impl SearchState {
    /// Creates an idle state.
    pub fn new(page_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            current_page: 0,
            search_term: String::new(),
            type_filter: String::new(),
            page_size,
            phase: Phase::Idle,
            error: None,
            has_more: false,
            total_count: 0,
            generation: 0,
            failed_page: None,
        }
    }

    /// Whether any page is in flight.
    pub fn loading(&self) -> bool {
        matches!(self.phase, Phase::LoadingInitial | Phase::LoadingMore)
    }

    /// Whether page 0 is in flight.
    pub fn initial_loading(&self) -> bool {
        self.phase == Phase::LoadingInitial
    }

    /// Whether a load-more request would be honored.
    pub fn can_load_more(&self) -> bool {
        self.phase == Phase::Ready && self.has_more
    }

    /// The request this state is waiting on, if any.
    pub fn pending_request(&self) -> Option<PageRequest> {
        let page_index = match self.phase {
            Phase::LoadingInitial => 0,
            Phase::LoadingMore => self.current_page + 1,
            _ => return None,
        };

        Some(PageRequest {
            generation: self.generation,
            query: PageQuery::new(
                self.search_term.clone(),
                self.type_filter.clone(),
                page_index,
                self.page_size,
            ),
        })
    }

    fn issue(mut self, phase: Phase) -> Self {
        self.generation += 1;
        self.phase = phase;
        self.error = None;
        self.failed_page = None;
        self
    }

    fn is_current(&self, generation: u64) -> bool {
        self.loading() && generation == self.generation
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// A page request tagged with the generation it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Generation to echo back in the completion event.
    pub generation: u64,
    /// The page to assemble.
    pub query: PageQuery,
}

// ============================================================================
// Events
// ============================================================================

/// Inputs to [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The search term or type filter settled on new values.
    FilterChanged {
        /// New raw search term.
        search_term: String,
        /// New raw type filter.
        type_filter: String,
    },
    /// The user asked for the next page.
    LoadMoreRequested,
    /// A page request succeeded.
    PageLoaded {
        /// Generation the request was issued under.
        generation: u64,
        /// Page index that was requested.
        page: usize,
        /// The assembled page.
        result: PageResult,
    },
    /// A page request failed.
    PageFailed {
        /// Generation the request was issued under.
        generation: u64,
        /// Page index that was requested.
        page: usize,
        /// User-visible failure message.
        message: String,
    },
    /// Re-issue the request that failed.
    Retry,
}

impl SearchEvent {
    /// Builds a [`SearchEvent::FilterChanged`].
    pub fn filter_changed(search_term: impl Into<String>, type_filter: impl Into<String>) -> Self {
        Self::FilterChanged {
            search_term: search_term.into(),
            type_filter: type_filter.into(),
        }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Computes the state that follows `event`.
///
/// | Event                | Honored when                       | Result                         |
/// |----------------------|------------------------------------|--------------------------------|
/// | `FilterChanged`      | filters differ, or state is idle   | reset, `LoadingInitial`        |
/// | `LoadMoreRequested`  | `Ready` with more pages            | `LoadingMore`                  |
/// | `PageLoaded`         | generation is current              | entries merged, `Ready`        |
/// | `PageFailed`         | generation is current              | `Error`, entries kept          |
/// | `Retry`              | `Error`                            | failed page re-issued          |
///
/// Anything else returns the state unchanged.
pub fn reduce(state: SearchState, event: SearchEvent) -> SearchState {
    match event {
        SearchEvent::FilterChanged {
            search_term,
            type_filter,
        } => {
            let unchanged = same_term(&state.search_term, &search_term)
                && same_type(&state.type_filter, &type_filter);
            if unchanged && state.phase != Phase::Idle {
                return state;
            }

            let mut next = state.issue(Phase::LoadingInitial);
            next.search_term = search_term;
            next.type_filter = type_filter;
            next.entries.clear();
            next.current_page = 0;
            next.has_more = false;
            next.total_count = 0;
            next
        }

        SearchEvent::LoadMoreRequested => {
            if state.can_load_more() {
                state.issue(Phase::LoadingMore)
            } else {
                state
            }
        }

        SearchEvent::PageLoaded {
            generation,
            page,
            result,
        } => {
            if !state.is_current(generation) {
                return state;
            }

            let mut next = state;
            if page == 0 {
                next.entries = result.entries;
            } else {
                next.entries.extend(result.entries);
            }
            next.current_page = page;
            next.total_count = result.total_count;
            next.has_more = result.has_more;
            next.phase = Phase::Ready;
            next.error = None;
            next
        }

        SearchEvent::PageFailed {
            generation,
            page,
            message,
        } => {
            if !state.is_current(generation) {
                return state;
            }

            let mut next = state;
            next.phase = Phase::Error;
            next.error = Some(message);
            next.failed_page = Some(page);
            next
        }

        SearchEvent::Retry => match (state.phase, state.failed_page) {
            (Phase::Error, Some(0)) => state.issue(Phase::LoadingInitial),
            (Phase::Error, Some(_)) => state.issue(Phase::LoadingMore),
            _ => state,
        },
    }
}

/// Terms compare the way the page assembler matches them: case-insensitive,
/// whitespace significant.
fn same_term(current: &str, incoming: &str) -> bool {
    current.to_lowercase() == incoming.to_lowercase()
}

fn same_type(current: &str, incoming: &str) -> bool {
    current.trim().to_lowercase() == incoming.trim().to_lowercase()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pokedex_catalog::fixture::entry;

    fn page(names: &[&str], total_count: usize, has_more: bool) -> PageResult {
        PageResult {
            entries: names
                .iter()
                .enumerate()
                .map(|(i, name)| entry(u32::try_from(i).unwrap() + 1, name, &["normal"]))
                .collect(),
            total_count,
            has_more,
        }
    }

    fn loaded(state: SearchState, page_index: usize, result: PageResult) -> SearchState {
        let generation = state.generation;
        reduce(
            state,
            SearchEvent::PageLoaded {
                generation,
                page: page_index,
                result,
            },
        )
    }

    fn failed(state: SearchState, page_index: usize) -> SearchState {
        let generation = state.generation;
        reduce(
            state,
            SearchEvent::PageFailed {
                generation,
                page: page_index,
                message: "Failed to assemble page".to_string(),
            },
        )
    }

    fn names(state: &SearchState) -> Vec<&str> {
        state.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_initial_state_is_idle() {
        let state = SearchState::new(10);
        assert_eq!(state.phase, Phase::Idle);
        assert!(!state.loading());
        assert_eq!(state.pending_request(), None);
    }

    #[test]
    fn test_filter_change_requests_page_zero() {
        let state = reduce(SearchState::new(10), SearchEvent::filter_changed("char", "fire"));

        assert!(state.initial_loading());
        assert!(state.loading());
        assert_eq!(state.generation, 1);

        let request = state.pending_request().unwrap();
        assert_eq!(request.generation, 1);
        assert_eq!(request.query, PageQuery::new("char", "fire", 0, 10));
    }

    #[test]
    fn test_first_page_then_load_more_appends() {
        let state = reduce(SearchState::new(2), SearchEvent::filter_changed("", ""));
        let state = loaded(state, 0, page(&["a", "b"], 5, true));

        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(names(&state), vec!["a", "b"]);

        let state = reduce(state, SearchEvent::LoadMoreRequested);
        assert_eq!(state.phase, Phase::LoadingMore);
        assert_eq!(state.pending_request().unwrap().query.page_index, 1);

        let state = loaded(state, 1, page(&["c", "d"], 5, true));
        assert_eq!(names(&state), vec!["a", "b", "c", "d"]);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_count, 5);
    }

    #[test]
    fn test_load_more_is_noop_unless_ready_with_more() {
        let loading = reduce(SearchState::new(2), SearchEvent::filter_changed("", ""));
        let again = reduce(loading.clone(), SearchEvent::LoadMoreRequested);
        assert_eq!(again, loading);

        let exhausted = loaded(loading, 0, page(&["a"], 1, false));
        let again = reduce(exhausted.clone(), SearchEvent::LoadMoreRequested);
        assert_eq!(again, exhausted);

        let idle = SearchState::new(2);
        assert_eq!(reduce(idle.clone(), SearchEvent::LoadMoreRequested), idle);
    }

    #[test]
    fn test_load_more_failure_keeps_entries() {
        let state = reduce(SearchState::new(2), SearchEvent::filter_changed("", ""));
        let state = loaded(state, 0, page(&["a", "b"], 4, true));
        let state = reduce(state, SearchEvent::LoadMoreRequested);
        let state = failed(state, 1);

        assert_eq!(state.phase, Phase::Error);
        assert_eq!(names(&state), vec!["a", "b"]);
        assert_eq!(state.failed_page, Some(1));
        assert!(state.error.is_some());
    }

    #[test]
    fn test_initial_failure_leaves_list_empty() {
        let state = reduce(SearchState::new(2), SearchEvent::filter_changed("", ""));
        let state = loaded(state, 0, page(&["a", "b"], 4, true));
        let state = reduce(state, SearchEvent::filter_changed("x", ""));
        let state = failed(state, 0);

        assert_eq!(state.phase, Phase::Error);
        assert!(state.entries.is_empty());
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let state = reduce(SearchState::new(2), SearchEvent::filter_changed("", ""));
        let stale_generation = state.generation;
        let state = reduce(state, SearchEvent::filter_changed("pika", ""));

        let after_stale = reduce(
            state.clone(),
            SearchEvent::PageLoaded {
                generation: stale_generation,
                page: 0,
                result: page(&["bulbasaur", "ivysaur"], 1302, true),
            },
        );
        assert_eq!(after_stale, state);

        let after_stale_failure = reduce(
            state.clone(),
            SearchEvent::PageFailed {
                generation: stale_generation,
                page: 0,
                message: "late".to_string(),
            },
        );
        assert_eq!(after_stale_failure, state);

        let current = loaded(state, 0, page(&["pikachu"], 1, false));
        assert_eq!(names(&current), vec!["pikachu"]);
        assert_eq!(current.search_term, "pika");
    }

    #[test]
    fn test_duplicate_completion_is_discarded() {
        let state = reduce(SearchState::new(2), SearchEvent::filter_changed("", ""));
        let generation = state.generation;
        let state = loaded(state, 0, page(&["a"], 1, false));

        let duplicate = reduce(
            state.clone(),
            SearchEvent::PageLoaded {
                generation,
                page: 0,
                result: page(&["a"], 1, false),
            },
        );
        assert_eq!(duplicate, state);
    }

    #[test]
    fn test_same_filters_do_not_reload() {
        let state = reduce(SearchState::new(2), SearchEvent::filter_changed("a", ""));
        let state = loaded(state, 0, page(&["a"], 1, false));
        let again = reduce(state.clone(), SearchEvent::filter_changed("a", ""));
        assert_eq!(again, state);
        let recased = reduce(state.clone(), SearchEvent::filter_changed("A", " "));
        assert_eq!(recased, state);

        let padded = reduce(state.clone(), SearchEvent::filter_changed("a ", ""));
        assert!(padded.initial_loading());
        assert_eq!(padded.search_term, "a ");

        let first = reduce(SearchState::new(2), SearchEvent::filter_changed("", ""));
        assert_eq!(first.phase, Phase::LoadingInitial);
    }

    #[test]
    fn test_filter_change_while_loading_more_resets() {
        let state = reduce(SearchState::new(2), SearchEvent::filter_changed("", ""));
        let state = loaded(state, 0, page(&["a", "b"], 4, true));
        let state = reduce(state, SearchEvent::LoadMoreRequested);
        let state = reduce(state, SearchEvent::filter_changed("", "fire"));

        assert!(state.initial_loading());
        assert!(state.entries.is_empty());
        assert_eq!(state.pending_request().unwrap().query.page_index, 0);
    }

    #[test]
    fn test_retry_reissues_failed_page() {
        let state = reduce(SearchState::new(2), SearchEvent::filter_changed("", ""));
        let state = loaded(state, 0, page(&["a", "b"], 4, true));
        let state = reduce(state, SearchEvent::LoadMoreRequested);
        let state = failed(state, 1);
        let before = state.generation;

        let state = reduce(state, SearchEvent::Retry);
        assert_eq!(state.phase, Phase::LoadingMore);
        assert_eq!(state.generation, before + 1);
        assert_eq!(state.error, None);
        assert_eq!(state.pending_request().unwrap().query.page_index, 1);

        let initial = reduce(SearchState::new(2), SearchEvent::filter_changed("", ""));
        let initial = reduce(failed(initial, 0), SearchEvent::Retry);
        assert_eq!(initial.phase, Phase::LoadingInitial);
    }

    #[test]
    fn test_retry_outside_error_is_noop() {
        let ready = reduce(SearchState::new(2), SearchEvent::filter_changed("", ""));
        let ready = loaded(ready, 0, page(&["a"], 1, false));
        assert_eq!(reduce(ready.clone(), SearchEvent::Retry), ready);
    }
}
