use crate::lock;
use popcorn_models::SearchResultItem;
use popcorn_sources::{MovieSource, SourceError};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const SEARCH_ERROR_MESSAGE: &str = "Something went wrong with fetching the movies.";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    pub error: String,
    pub is_loading: bool,
    pub results: Vec<SearchResultItem>,
}

struct Inner {
    state: SearchState,
    current: Option<CancellationToken>,
    next_request: u64,
}

impl Inner {
    fn publish(&self, tx: &watch::Sender<SearchState>) {
        tx.send_replace(self.state.clone());
    }
}

/// Query-driven search with last-query-wins semantics.
///
/// Every call to [`SearchController::set_query`] cancels the request started
/// by the previous call. Cancelling and applying a response both happen under
/// the same lock, so once a request has been superseded its completion can no
/// longer touch the shared [`SearchState`].
pub struct SearchController {
    source: Arc<dyn MovieSource>,
    min_query_len: usize,
    inner: Arc<Mutex<Inner>>,
    tx: Arc<watch::Sender<SearchState>>,
}

/// Returned by [`SearchController::set_query`]; await it to wait for the
/// request to conclude (or be cancelled).
#[must_use = "dropping the handle detaches the request; it still runs"]
pub struct SearchHandle {
    request: Option<u64>,
    task: Option<JoinHandle<()>>,
}

impl SearchHandle {
    fn skipped() -> Self {
        Self {
            request: None,
            task: None,
        }
    }

    /// Request number, or `None` when the query was too short to fetch.
    pub fn request(&self) -> Option<u64> {
        self.request
    }

    pub fn was_skipped(&self) -> bool {
        self.request.is_none()
    }

    pub async fn finished(self) {
        if let Some(task) = self.task {
            if let Err(e) = task.await {
                warn!(error = %e, "Search task did not complete");
            }
        }
    }
}

impl SearchController {
    pub fn new(source: Arc<dyn MovieSource>, min_query_len: usize) -> Self {
        let (tx, _) = watch::channel(SearchState::default());
        Self {
            source,
            min_query_len,
            inner: Arc::new(Mutex::new(Inner {
                state: SearchState::default(),
                current: None,
                next_request: 0,
            })),
            tx: Arc::new(tx),
        }
    }

    pub fn min_query_len(&self) -> usize {
        self.min_query_len
    }

    /// Whether `query` is long enough to hit the network.
    pub fn is_searchable(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.min_query_len
    }

    pub fn snapshot(&self) -> SearchState {
        lock(&self.inner).state.clone()
    }

    /// Receives every state change, including the loading transitions.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.tx.subscribe()
    }

    /// Replace the current query. Must be called from within a tokio runtime.
    pub fn set_query(&self, query: &str) -> SearchHandle {
        let mut inner = lock(&self.inner);

        if let Some(previous) = inner.current.take() {
            previous.cancel();
        }
        inner.state.query = query.to_string();

        if !self.is_searchable(query) {
            inner.state.error.clear();
            inner.state.results.clear();
            inner.state.is_loading = false;
            inner.publish(&self.tx);
            debug!(query, "Query below minimum length, skipping fetch");
            return SearchHandle::skipped();
        }

        let token = CancellationToken::new();
        inner.current = Some(token.clone());
        inner.next_request += 1;
        let request = inner.next_request;
        inner.state.error.clear();
        inner.state.is_loading = true;
        inner.publish(&self.tx);
        drop(inner);

        let task = tokio::spawn(run_search(
            Arc::clone(&self.source),
            Arc::clone(&self.inner),
            Arc::clone(&self.tx),
            query.trim().to_string(),
            token,
            request,
        ));

        SearchHandle {
            request: Some(request),
            task: Some(task),
        }
    }

    /// Cancel any outstanding request without changing the query.
    pub fn cancel(&self) {
        let mut inner = lock(&self.inner);
        if let Some(token) = inner.current.take() {
            token.cancel();
            inner.state.is_loading = false;
            inner.publish(&self.tx);
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        if let Some(token) = lock(&self.inner).current.take() {
            token.cancel();
        }
    }
}

async fn run_search(
    source: Arc<dyn MovieSource>,
    inner: Arc<Mutex<Inner>>,
    tx: Arc<watch::Sender<SearchState>>,
    query: String,
    token: CancellationToken,
    request: u64,
) {
    debug!(request, query = %query, source = source.source_name(), "Starting search");

    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!(request, query = %query, "Search superseded before completion");
            return;
        }
        outcome = source.search(&query) => outcome,
    };

    let mut guard = lock(&inner);
    if token.is_cancelled() {
        debug!(request, query = %query, "Dropping response for superseded search");
        return;
    }
    guard.current = None;

    match outcome {
        Ok(results) => {
            info!(request, query = %query, count = results.len(), "Search complete");
            guard.state.results = results;
            guard.state.error.clear();
        }
        Err(e) => {
            guard.state.results.clear();
            guard.state.error = user_message(&e, SEARCH_ERROR_MESSAGE);
            if e.is_not_found() {
                info!(request, query = %query, error = %e, "Search found nothing");
            } else {
                warn!(request, query = %query, error = %e, "Search request failed");
            }
        }
    }
    guard.state.is_loading = false;
    guard.publish(&tx);
}

/// Logical failures carry their own message; transport failures get `generic`.
pub(crate) fn user_message(error: &SourceError, generic: &str) -> String {
    error
        .not_found_message()
        .map(str::to_string)
        .unwrap_or_else(|| generic.to_string())
}
