use crate::paths::PathManager;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_OMDB_BASE_URL: &str = "https://www.omdbapi.com/";

/// Environment variable that takes precedence over `omdb.api_key`.
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OmdbConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Queries shorter than this (after trimming) never hit the network.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorageConfig {
    /// Defaults to `<data_dir>/watched.json`.
    #[serde(default)]
    pub watched_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LoggingConfig {
    /// Filter used when neither -v nor RUST_LOG is given.
    #[serde(default)]
    pub level: Option<String>,
    /// Write logs to a daily-rotated file instead of stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_OMDB_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_min_query_len() -> usize {
    3
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: default_min_query_len(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Missing file means defaults; a file that fails to parse is an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config from {}: {}", path.display(), e))
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.omdb.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("omdb.base_url cannot be empty"));
        }
        if !self.omdb.base_url.starts_with("http://") && !self.omdb.base_url.starts_with("https://") {
            return Err(anyhow::anyhow!("omdb.base_url must be an http(s) URL: {}", self.omdb.base_url));
        }
        if self.omdb.timeout_secs == 0 {
            return Err(anyhow::anyhow!("omdb.timeout_secs must be greater than zero"));
        }
        if self.search.min_query_len == 0 {
            return Err(anyhow::anyhow!("search.min_query_len must be at least 1"));
        }
        Ok(())
    }

    /// API key from `OMDB_API_KEY`, falling back to the config file.
    pub fn resolve_api_key(&self) -> anyhow::Result<String> {
        self.resolve_api_key_with(std::env::var(API_KEY_ENV).ok())
    }

    pub fn resolve_api_key_with(&self, env_value: Option<String>) -> anyhow::Result<String> {
        env_value
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.omdb.api_key.clone().filter(|key| !key.trim().is_empty()))
            .map(|key| key.trim().to_string())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No OMDb API key configured. Run 'popcorn config set-api-key' or set {}",
                    API_KEY_ENV
                )
            })
    }

    pub fn watched_file(&self, paths: &PathManager) -> PathBuf {
        self.storage
            .watched_file
            .clone()
            .unwrap_or_else(|| paths.watched_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let config = Config {
            omdb: OmdbConfig {
                api_key: Some("abc123".to_string()),
                ..OmdbConfig::default()
            },
            search: SearchConfig { min_query_len: 4 },
            storage: StorageConfig {
                watched_file: Some(PathBuf::from("/tmp/watched.json")),
            },
            logging: LoggingConfig::default(),
        };

        config.save_to_file(file.path()).unwrap();
        let loaded = Config::load_from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[omdb]\napi_key = \"k\"\n").unwrap();
        assert_eq!(config.omdb.base_url, DEFAULT_OMDB_BASE_URL);
        assert_eq!(config.omdb.timeout_secs, 30);
        assert_eq!(config.search.min_query_len, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.search.min_query_len = 0;
        assert!(config.validate().is_err());

        config.search.min_query_len = 3;
        config.omdb.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.omdb.base_url = DEFAULT_OMDB_BASE_URL.to_string();
        config.omdb.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_resolution() {
        let mut config = Config::default();
        assert!(config.resolve_api_key_with(None).is_err());
        assert!(config.resolve_api_key_with(Some("  ".to_string())).is_err());

        config.omdb.api_key = Some("from-file".to_string());
        assert_eq!(config.resolve_api_key_with(None).unwrap(), "from-file");
        assert_eq!(
            config.resolve_api_key_with(Some("from-env".to_string())).unwrap(),
            "from-env"
        );
    }

    #[test]
    fn test_watched_file_override() {
        let paths = PathManager::from_base("/tmp/popcorn-home");
        let mut config = Config::default();
        assert_eq!(config.watched_file(&paths), PathBuf::from("/tmp/popcorn-home/data/watched.json"));

        config.storage.watched_file = Some(PathBuf::from("/srv/list.json"));
        assert_eq!(config.watched_file(&paths), PathBuf::from("/srv/list.json"));
    }
}
