use crate::lock;
use crate::search::user_message;
use popcorn_models::MovieDetail;
use popcorn_sources::MovieSource;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

pub const DETAIL_ERROR_MESSAGE: &str = "Something went wrong with fetching the movie details.";

/// Heading shown when no title is open.
pub const APP_TITLE: &str = "usePopcorn";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailState {
    pub selected: Option<String>,
    pub detail: Option<MovieDetail>,
    pub is_loading: bool,
    pub error: String,
}

/// Fetches the full record for whichever id is selected.
///
/// There is no cancellation here. A response that arrives after the
/// selection moved on is dropped by comparing ids.
pub struct DetailController {
    source: Arc<dyn MovieSource>,
    state: Mutex<DetailState>,
}

impl DetailController {
    pub fn new(source: Arc<dyn MovieSource>) -> Self {
        Self {
            source,
            state: Mutex::new(DetailState::default()),
        }
    }

    pub fn snapshot(&self) -> DetailState {
        lock(&self.state).clone()
    }

    pub fn selected(&self) -> Option<String> {
        lock(&self.state).selected.clone()
    }

    pub fn is_open(&self) -> bool {
        lock(&self.state).selected.is_some()
    }

    /// Change the selection and load its record. `None` closes the view.
    pub async fn select(&self, id: Option<&str>) {
        let Some(id) = id else {
            self.close();
            return;
        };

        {
            let mut state = lock(&self.state);
            let unchanged = state.selected.as_deref() == Some(id)
                && (state.is_loading || state.detail.is_some());
            if unchanged {
                debug!(imdb_id = id, "Selection unchanged, not refetching");
                return;
            }
            state.selected = Some(id.to_string());
            state.detail = None;
            state.is_loading = true;
            state.error.clear();
        }

        let outcome = self.source.detail(id).await;

        let mut state = lock(&self.state);
        if state.selected.as_deref() != Some(id) {
            debug!(imdb_id = id, "Selection changed while loading, dropping detail");
            return;
        }

        match outcome {
            Ok(detail) => {
                info!(imdb_id = id, title = %detail.title, "Loaded movie detail");
                state.detail = Some(detail);
            }
            Err(e) => {
                if e.is_not_found() {
                    info!(imdb_id = id, error = %e, "Movie detail not found");
                } else {
                    warn!(imdb_id = id, error = %e, "Movie detail request failed");
                }
                state.detail = None;
                state.error = user_message(&e, DETAIL_ERROR_MESSAGE);
            }
        }
        state.is_loading = false;
    }

    /// Clicking the open title again closes it. Returns whether a view is open afterwards.
    pub async fn toggle(&self, id: &str) -> bool {
        if self.selected().as_deref() == Some(id) {
            self.close();
            return false;
        }
        self.select(Some(id)).await;
        true
    }

    /// `"Movie | <title>"` while a record is loaded, otherwise the app name.
    pub fn title_line(&self) -> String {
        match &lock(&self.state).detail {
            Some(detail) if !detail.title.is_empty() => format!("Movie | {}", detail.title),
            _ => APP_TITLE.to_string(),
        }
    }

    pub fn close(&self) {
        let mut state = lock(&self.state);
        if let Some(id) = state.selected.take() {
            debug!(imdb_id = %id, "Closed movie detail");
        }
        *state = DetailState::default();
    }
}
