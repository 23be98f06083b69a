use crate::detail::DetailController;
use crate::keys::{KeyBinding, KeyDispatcher, ESCAPE};
use crate::search::{SearchController, SearchHandle};
use crate::storage::StoreError;
use crate::watched::WatchedList;
use popcorn_models::{ModelError, UserRating, WatchedEntry};
use popcorn_sources::MovieSource;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no movie is open")]
    NothingSelected,

    #[error("movie details are not loaded yet")]
    DetailNotLoaded,

    #[error("you have already rated this movie {rating}")]
    AlreadyWatched { rating: UserRating },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One user's working set: the search box, the open title, the watched list,
/// and the key listeners of whatever view is active.
pub struct Session {
    search: SearchController,
    detail: Arc<DetailController>,
    watched: WatchedList,
    keys: KeyDispatcher,
    escape: Option<KeyBinding>,
}

impl Session {
    pub fn new(source: Arc<dyn MovieSource>, min_query_len: usize, watched: WatchedList) -> Self {
        Self {
            search: SearchController::new(Arc::clone(&source), min_query_len),
            detail: Arc::new(DetailController::new(source)),
            watched,
            keys: KeyDispatcher::new(),
            escape: None,
        }
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn detail(&self) -> &DetailController {
        &self.detail
    }

    pub fn watched(&self) -> &WatchedList {
        &self.watched
    }

    pub fn keys(&self) -> &KeyDispatcher {
        &self.keys
    }

    /// A query that will actually be fetched also closes the open title.
    pub fn set_query(&mut self, query: &str) -> SearchHandle {
        if self.search.is_searchable(query) && self.detail.is_open() {
            self.detail.close();
            self.sync_detail_keys();
        }
        self.search.set_query(query)
    }

    /// Open `id`, or close it if it is already open.
    pub async fn toggle_movie(&mut self, id: &str) -> bool {
        let open = self.detail.toggle(id).await;
        self.sync_detail_keys();
        open
    }

    pub fn close_movie(&mut self) {
        self.detail.close();
        self.sync_detail_keys();
    }

    /// Feed a key press to the active listeners. Returns how many ran.
    pub fn press_key(&mut self, key: &str) -> usize {
        let invoked = self.keys.dispatch(key);
        self.sync_detail_keys();
        invoked
    }

    /// Rate the open title and append it to the watched list, then close it.
    pub fn add_open_movie(&mut self, rating: UserRating) -> Result<WatchedEntry, SessionError> {
        let state = self.detail.snapshot();
        let id = state.selected.ok_or(SessionError::NothingSelected)?;
        if let Some(existing) = self.watched.find(&id) {
            return Err(SessionError::AlreadyWatched {
                rating: existing.user_rating,
            });
        }
        let detail = state.detail.ok_or(SessionError::DetailNotLoaded)?;

        let entry = WatchedEntry::from_detail(&detail, rating)?;
        self.watched.add(entry.clone())?;
        self.close_movie();
        Ok(entry)
    }

    pub fn remove_watched(&mut self, id: &str) -> Result<usize, SessionError> {
        Ok(self.watched.remove(id)?)
    }

    pub fn title_line(&self) -> String {
        self.detail.title_line()
    }

    // The Escape listener lives exactly as long as the detail view is open.
    fn sync_detail_keys(&mut self) {
        match (self.detail.is_open(), self.escape.is_some()) {
            (true, false) => {
                let detail = Arc::clone(&self.detail);
                self.escape = Some(self.keys.bind(ESCAPE, move || detail.close()));
                debug!("Detail view active, Escape bound");
            }
            (false, true) => {
                self.escape = None;
                debug!("Detail view closed, Escape unbound");
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, WatchedStore};
    use crate::test_support::{detail, results_for, ScriptedSource};

    fn session() -> (Arc<ScriptedSource>, MemoryStore, Session) {
        let source = Arc::new(ScriptedSource::new());
        source.add_detail(detail("tt1375666", "Inception", "148 min", "8.8"));
        source.add_detail(detail("tt0133093", "The Matrix", "136 min", "8.7"));
        let store = MemoryStore::new();
        let watched = WatchedList::open(Box::new(store.clone())).unwrap();
        let session = Session::new(source.clone(), 3, watched);
        (source, store, session)
    }

    #[tokio::test]
    async fn test_add_open_movie_builds_entry() {
        let (_source, store, mut session) = session();
        session.toggle_movie("tt1375666").await;

        let entry = session.add_open_movie(UserRating::new(8).unwrap()).unwrap();
        assert_eq!(entry.id, "tt1375666");
        assert_eq!(entry.runtime_minutes, Some(148));
        assert_eq!(entry.user_rating.value(), 8);

        assert!(!session.detail().is_open());
        assert_eq!(session.keys().listener_count(), 0);
        assert_eq!(store.load().unwrap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_already_watched_is_refused() {
        let (_source, _store, mut session) = session();
        session.toggle_movie("tt1375666").await;
        session.add_open_movie(UserRating::new(8).unwrap()).unwrap();

        session.toggle_movie("tt1375666").await;
        let err = session.add_open_movie(UserRating::new(3).unwrap()).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyWatched { rating } if rating.value() == 8));
        assert_eq!(err.to_string(), "you have already rated this movie 8");
        assert_eq!(session.watched().len(), 1);
    }

    #[tokio::test]
    async fn test_add_without_selection() {
        let (_source, _store, mut session) = session();
        let err = session.add_open_movie(UserRating::new(5).unwrap()).unwrap_err();
        assert!(matches!(err, SessionError::NothingSelected));
    }

    #[tokio::test]
    async fn test_add_when_detail_failed_to_load() {
        let (_source, _store, mut session) = session();
        session.toggle_movie("tt0000000").await;
        let err = session.add_open_movie(UserRating::new(5).unwrap()).unwrap_err();
        assert!(matches!(err, SessionError::DetailNotLoaded));
    }

    #[tokio::test]
    async fn test_escape_closes_detail_and_unbinds() {
        let (_source, _store, mut session) = session();
        assert_eq!(session.press_key("Escape"), 0);

        session.toggle_movie("tt0133093").await;
        assert_eq!(session.keys().listener_count(), 1);
        assert_eq!(session.title_line(), "Movie | The Matrix");

        assert_eq!(session.press_key("escape"), 1);
        assert!(!session.detail().is_open());
        assert_eq!(session.keys().listener_count(), 0);
        assert_eq!(session.press_key("Escape"), 0);
    }

    #[tokio::test]
    async fn test_switching_titles_keeps_one_listener() {
        let (_source, _store, mut session) = session();
        session.toggle_movie("tt0133093").await;
        session.toggle_movie("tt1375666").await;
        assert_eq!(session.keys().listener_count(), 1);
        session.toggle_movie("tt1375666").await;
        assert_eq!(session.keys().listener_count(), 0);
    }

    #[tokio::test]
    async fn test_new_search_closes_open_movie() {
        let (_source, _store, mut session) = session();
        session.toggle_movie("tt0133093").await;

        session.set_query("in").finished().await;
        assert!(session.detail().is_open());

        session.set_query("alien").finished().await;
        assert!(!session.detail().is_open());
        assert_eq!(session.keys().listener_count(), 0);
        assert_eq!(session.search().snapshot().results, results_for("alien"));
    }

    #[tokio::test]
    async fn test_remove_watched() {
        let (_source, _store, mut session) = session();
        session.toggle_movie("tt1375666").await;
        session.add_open_movie(UserRating::new(9).unwrap()).unwrap();

        assert_eq!(session.remove_watched("tt1375666").unwrap(), 1);
        assert_eq!(session.remove_watched("tt1375666").unwrap(), 0);
        assert!(session.watched().is_empty());
    }
}
