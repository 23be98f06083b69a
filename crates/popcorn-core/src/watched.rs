use crate::storage::{StoreError, WatchedStore};
use popcorn_models::{WatchedEntry, WatchedSummary};
use tracing::{info, warn};

/// Ordered watched list mirrored to a [`WatchedStore`] after every change.
pub struct WatchedList {
    entries: Vec<WatchedEntry>,
    store: Box<dyn WatchedStore>,
}

impl WatchedList {
    /// Restore from the store, starting empty when nothing was saved.
    pub fn open(store: Box<dyn WatchedStore>) -> Result<Self, StoreError> {
        let entries = store.load()?.unwrap_or_default();
        info!(store = %store.describe(), count = entries.len(), "Opened watched list");
        Ok(Self { entries, store })
    }

    pub fn watched(&self) -> &[WatchedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// First entry with this id, used to show an existing rating.
    pub fn find(&self, id: &str) -> Option<&WatchedEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Append to the end. Duplicate ids are kept as separate entries.
    pub fn add(&mut self, entry: WatchedEntry) -> Result<(), StoreError> {
        if self.contains(&entry.id) {
            warn!(imdb_id = %entry.id, "Adding an id that is already on the watched list");
        }
        let mut next = self.entries.clone();
        next.push(entry);
        self.commit(next)?;
        if let Some(added) = self.entries.last() {
            info!(imdb_id = %added.id, title = %added.title, rating = added.user_rating.value(), "Added to watched list");
        }
        Ok(())
    }

    /// Drop every entry with this id. Returns how many were removed.
    pub fn remove(&mut self, id: &str) -> Result<usize, StoreError> {
        let next: Vec<WatchedEntry> = self.entries.iter().filter(|e| e.id != id).cloned().collect();
        let removed = self.entries.len() - next.len();
        self.commit(next)?;
        info!(imdb_id = id, removed, "Removed from watched list");
        Ok(removed)
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary::from_entries(&self.entries)
    }

    // The in-memory list only changes once the store has accepted it.
    fn commit(&mut self, next: Vec<WatchedEntry>) -> Result<(), StoreError> {
        self.store.save(&next)?;
        self.entries = next;
        Ok(())
    }
}
