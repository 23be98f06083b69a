use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResultItem};
use crate::error::SourceError;

#[async_trait]
pub trait MovieSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// Titles matching `query`. A logical "no match" is `SourceError::NotFound`.
    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, SourceError>;

    /// Full record for one id.
    async fn detail(&self, id: &str) -> Result<MovieDetail, SourceError>;
}
