use crate::lock;
use popcorn_models::WatchedEntry;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("watched list I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize watched list: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The single durable slot the watched list is mirrored into.
pub trait WatchedStore: Send {
    /// `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<WatchedEntry>>, StoreError>;

    /// Overwrites the slot with the full list.
    fn save(&self, entries: &[WatchedEntry]) -> Result<(), StoreError>;

    fn describe(&self) -> String;
}

/// JSON file on disk, rewritten atomically (temp file + rename) on every save.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    // The unreadable file is only given up once a copy of it exists.
    fn backup_unreadable(&self, reason: &serde_json::Error) -> Result<(), StoreError> {
        let backup_path = self.path.with_extension("json.bak");
        std::fs::copy(&self.path, &backup_path).map_err(|source| StoreError::Io {
            path: backup_path.clone(),
            source,
        })?;
        warn!(
            path = %self.path.display(),
            backup = %backup_path.display(),
            error = %reason,
            "Watched list unreadable, backed it up and starting empty"
        );
        Ok(())
    }
}

impl WatchedStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<WatchedEntry>>, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No watched list on disk yet");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        // The browser build could persist a literal `null`.
        match serde_json::from_str::<Option<Vec<WatchedEntry>>>(&content) {
            Ok(entries) => {
                info!(
                    path = %self.path.display(),
                    count = entries.as_ref().map_or(0, Vec::len),
                    "Loaded watched list"
                );
                Ok(entries)
            }
            Err(e) => {
                self.backup_unreadable(&e)?;
                Ok(None)
            }
        }
    }

    fn save(&self, entries: &[WatchedEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let content = serde_json::to_string_pretty(entries)?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).map_err(|e| self.io_error(e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), count = entries.len(), "Saved watched list");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps the serialized JSON in memory. Clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(json: impl Into<String>) -> Self {
        let store = Self::default();
        *lock(&store.slot) = Some(json.into());
        store
    }

    pub fn contents(&self) -> Option<String> {
        lock(&self.slot).clone()
    }

    pub fn save_count(&self) -> usize {
        *lock(&self.saves)
    }
}

impl WatchedStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<WatchedEntry>>, StoreError> {
        match lock(&self.slot).as_deref() {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(None),
        }
    }

    fn save(&self, entries: &[WatchedEntry]) -> Result<(), StoreError> {
        let json = serde_json::to_string(entries)?;
        *lock(&self.slot) = Some(json);
        *lock(&self.saves) += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
