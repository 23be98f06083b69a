use serde::{Deserialize, Serialize};

/// One row of a search response. Replaced wholesale on every new query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResultItem {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
}
