use crate::error::SourceError;
use crate::omdb::api;
use crate::traits::MovieSource;
use async_trait::async_trait;
use popcorn_config::OmdbConfig;
use popcorn_models::{MovieDetail, SearchResultItem};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("popcorn/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url,
            api_key,
        })
    }

    pub fn from_config(config: &OmdbConfig, api_key: String) -> Result<Self, SourceError> {
        Self::new(
            api_key,
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, param: &str, value: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), (param, value)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), param, value, "OMDb returned non-success status");
            return Err(SourceError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl MovieSource for OmdbClient {
    fn source_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, SourceError> {
        let body = self.get("s", query).await?;
        let results = api::parse_search_response(&body)?;
        debug!(query, count = results.len(), "OMDb search complete");
        Ok(results)
    }

    async fn detail(&self, id: &str) -> Result<MovieDetail, SourceError> {
        let body = self.get("i", id).await?;
        api::parse_detail_response(&body, id)
    }
}
