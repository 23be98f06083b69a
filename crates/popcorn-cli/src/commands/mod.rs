pub mod browse;
pub mod config;
pub mod movies;
pub mod prompts;
pub mod watched;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_config::{Config, PathManager};
use popcorn_core::{JsonFileStore, Session, WatchedList};
use popcorn_sources::{MovieSource, OmdbClient};
use std::sync::Arc;
use tracing::debug;

/// Loaded configuration plus the directories it was resolved against.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
}

impl AppContext {
    pub fn new(paths: PathManager, config: Config) -> Self {
        Self { paths, config }
    }

    pub fn source(&self) -> Result<Arc<dyn MovieSource>> {
        self.config.validate().map_err(|e| eyre!("Invalid configuration: {}", e))?;
        let api_key = self.config.resolve_api_key().map_err(|e| eyre!("{}", e))?;
        let client = OmdbClient::from_config(&self.config.omdb, api_key)
            .map_err(|e| eyre!("Failed to create OMDb client: {}", e))?;
        debug!(base_url = %client.base_url(), "Created OMDb client");
        Ok(Arc::new(client))
    }

    pub fn open_watched(&self) -> Result<WatchedList> {
        let path = self.config.watched_file(&self.paths);
        WatchedList::open(Box::new(JsonFileStore::new(&path)))
            .map_err(|e| eyre!("Failed to open watched list at {}: {}", path.display(), e))
    }

    pub fn session(&self) -> Result<Session> {
        Ok(Session::new(
            self.source()?,
            self.config.search.min_query_len,
            self.open_watched()?,
        ))
    }
}
