//! Live search session.
//!
//! Owns a [`SearchState`], runs the page requests it asks for on spawned
//! tasks, and publishes every new state on a watch channel.

use chrono::{DateTime, Utc};
use pokedex_catalog::PageAssembler;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::state::{PageRequest, SearchEvent, SearchState, reduce};

// ============================================================================
// Inner State
// ============================================================================

struct SessionInner {
    assembler: PageAssembler,
    state: RwLock<SearchState>,
    updates: watch::Sender<SearchState>,
    last_settled: RwLock<Option<DateTime<Utc>>>,
}

// ============================================================================
// Search Session
// ============================================================================

/// Drives a [`PageAssembler`] from filter changes and load-more requests.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct SearchSession {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("assembler", &self.inner.assembler)
            .finish_non_exhaustive()
    }
}

impl SearchSession {
    /// Creates an idle session.
    pub fn new(assembler: PageAssembler, page_size: usize) -> Self {
        let state = SearchState::new(page_size);
        let (updates, _) = watch::channel(state.clone());
        Self {
            inner: Arc::new(SessionInner {
                assembler,
                state: RwLock::new(state),
                updates,
                last_settled: RwLock::new(None),
            }),
        }
    }

    /// Switches to new filters, discarding accumulated entries.
    ///
    /// Returns the handle of the page 0 request, or `None` if the filters
    /// are unchanged.
    pub async fn set_filters(
        &self,
        search_term: impl Into<String>,
        type_filter: impl Into<String>,
    ) -> Option<JoinHandle<()>> {
        self.dispatch(SearchEvent::filter_changed(search_term, type_filter))
            .await
    }

    /// Requests the next page.
    ///
    /// Returns `None` unless the session is ready and more pages exist.
    pub async fn load_more(&self) -> Option<JoinHandle<()>> {
        self.dispatch(SearchEvent::LoadMoreRequested).await
    }

    /// Re-issues the failed request.
    ///
    /// Returns `None` unless the session is in the error phase.
    pub async fn retry(&self) -> Option<JoinHandle<()>> {
        self.dispatch(SearchEvent::Retry).await
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> SearchState {
        self.inner.state.read().await.clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.updates.subscribe()
    }

    /// When the most recent current request completed.
    pub async fn last_settled(&self) -> Option<DateTime<Utc>> {
        *self.inner.last_settled.read().await
    }

    /// Applies `event` and spawns the request it issues, if any.
    async fn dispatch(&self, event: SearchEvent) -> Option<JoinHandle<()>> {
        let request = self.apply(event).await?;

        let session = self.clone();
        Some(tokio::spawn(async move { session.run(request).await }))
    }

    /// Reduces `event` into the state and publishes the result.
    ///
    /// Returns the newly issued request when the event issued one.
    async fn apply(&self, event: SearchEvent) -> Option<PageRequest> {
        let mut state = self.inner.state.write().await;
        let previous_generation = state.generation;

        *state = reduce(std::mem::take(&mut *state), event);
        self.inner.updates.send_replace(state.clone());

        if state.generation == previous_generation {
            return None;
        }
        state.pending_request()
    }

    async fn run(&self, request: PageRequest) {
        let PageRequest { generation, query } = request;
        let page = query.page_index;
        debug!(generation, page, "Requesting page");

        let event = match self.inner.assembler.get_page(&query).await {
            Ok(result) => SearchEvent::PageLoaded {
                generation,
                page,
                result,
            },
            Err(e) => {
                warn!(generation, page, error = %e, "Page request failed");
                SearchEvent::PageFailed {
                    generation,
                    page,
                    message: e.to_string(),
                }
            }
        };

        self.apply(event).await;

        let state = self.inner.state.read().await;
        if state.generation == generation {
            *self.inner.last_settled.write().await = Some(Utc::now());
            info!(
                generation,
                page,
                phase = ?state.phase,
                entries = state.entries.len(),
                "Search settled"
            );
        } else {
            debug!(generation, current = state.generation, "Discarded stale page");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
