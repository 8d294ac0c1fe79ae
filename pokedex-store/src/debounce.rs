//! Keystroke debouncing.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::session::SearchSession;

/// Forwards raw search-term input to a [`SearchSession`] once typing pauses.
///
/// Each keystroke restarts the quiet window. When the window elapses the
/// latest term becomes a filter change, keeping the session's current type
/// filter. Dropping the debouncer (or calling [`close`](Self::close))
/// flushes any pending term.
#[derive(Debug)]
pub struct SearchDebouncer {
    input: mpsc::UnboundedSender<String>,
    worker: JoinHandle<()>,
}

impl SearchDebouncer {
    /// Spawns the debounce worker for `session`.
    pub fn spawn(session: SearchSession, quiet: Duration) -> Self {
        let (input, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(debounce_loop(session, quiet, rx));
        Self { input, worker }
    }

    /// Records the search box contents after a keystroke.
    pub fn input(&self, term: impl Into<String>) {
        // The worker only stops once every sender is gone.
        let _ = self.input.send(term.into());
    }

    /// Flushes the pending term and waits for the worker to exit.
    pub async fn close(self) {
        let Self { input, worker } = self;
        drop(input);
        if let Err(e) = worker.await {
            debug!(error = %e, "Debounce worker ended abnormally");
        }
    }
}

async fn debounce_loop(
    session: SearchSession,
    quiet: Duration,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let mut pending: Option<String> = None;

    loop {
        let Some(term) = pending.take() else {
            match rx.recv().await {
                Some(term) => pending = Some(term),
                None => break,
            }
            continue;
        };

        tokio::select! {
            next = rx.recv() => match next {
                Some(next) => pending = Some(next),
                None => {
                    settle(&session, term).await;
                    break;
                }
            },
            () = tokio::time::sleep(quiet) => settle(&session, term).await,
        }
    }
}

async fn settle(session: &SearchSession, term: String) {
    let type_filter = session.snapshot().await.type_filter;
    debug!(term = %term, "Search term settled");
    // Completion is observed through the session's watch channel.
    let _ = session.set_filters(term, type_filter).await;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Phase;
    use pokedex_catalog::PageAssembler;
    use pokedex_catalog::fixture::{FixtureCatalog, starter_catalog};
    use std::sync::Arc;

    fn session(catalog: &Arc<FixtureCatalog>) -> SearchSession {
        SearchSession::new(PageAssembler::new(catalog.clone()), 20)
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_keystrokes_settle_once() {
        let catalog = Arc::new(starter_catalog());
        let session = session(&catalog);
        let debouncer = SearchDebouncer::spawn(session.clone(), Duration::from_millis(500));

        for term in ["p", "pi", "pik", "pika"] {
            debouncer.input(term);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(session.snapshot().await.phase, Phase::Idle);

        tokio::time::sleep(Duration::from_millis(600)).await;

        let state = session.snapshot().await;
        assert_eq!(state.search_term, "pika");
        assert_eq!(state.generation, 1);
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(catalog.call_count("list:"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pauses_between_terms_settle_each() {
        let catalog = Arc::new(starter_catalog());
        let session = session(&catalog);
        let debouncer = SearchDebouncer::spawn(session.clone(), Duration::from_millis(500));

        debouncer.input("char");
        tokio::time::sleep(Duration::from_millis(700)).await;
        debouncer.input("saur");
        tokio::time::sleep(Duration::from_millis(700)).await;

        let state = session.snapshot().await;
        assert_eq!(state.search_term, "saur");
        assert_eq!(state.generation, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keeps_current_type_filter() {
        let catalog = Arc::new(starter_catalog());
        let session = session(&catalog);
        session.set_filters("", "fire").await.unwrap().await.unwrap();

        let debouncer = SearchDebouncer::spawn(session.clone(), Duration::from_millis(500));
        debouncer.input("char");
        tokio::time::sleep(Duration::from_millis(600)).await;

        let state = session.snapshot().await;
        assert_eq!(state.type_filter, "fire");
        assert_eq!(state.total_count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_flushes_pending_term() {
        let catalog = Arc::new(starter_catalog());
        let session = session(&catalog);
        let debouncer = SearchDebouncer::spawn(session.clone(), Duration::from_secs(30));

        debouncer.input("pika");
        debouncer.close().await;

        assert_eq!(session.snapshot().await.search_term, "pika");
    }
}
