pub mod config;
pub mod paths;

pub use config::{Config, LoggingConfig, OmdbConfig, SearchConfig, StorageConfig, API_KEY_ENV, DEFAULT_OMDB_BASE_URL};
pub use paths::{PathManager, base_path_override};
