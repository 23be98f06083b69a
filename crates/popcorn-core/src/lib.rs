pub mod detail;
pub mod keys;
pub mod search;
pub mod session;
pub mod storage;
pub mod watched;

#[cfg(test)]
pub(crate) mod test_support;

pub use detail::{DetailController, DetailState, APP_TITLE, DETAIL_ERROR_MESSAGE};
pub use keys::{KeyBinding, KeyDispatcher, ESCAPE};
pub use search::{SearchController, SearchHandle, SearchState, SEARCH_ERROR_MESSAGE};
pub use session::{Session, SessionError};
pub use storage::{JsonFileStore, MemoryStore, StoreError, WatchedStore};
pub use watched::WatchedList;

use std::sync::{Mutex, MutexGuard};

/// State mutexes are never held across an await, so a poisoned lock still
/// guards consistent data.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
