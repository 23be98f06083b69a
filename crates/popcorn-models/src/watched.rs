use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use crate::detail::{parse_rating, parse_runtime_minutes, MovieDetail};
use crate::error::ModelError;
use crate::rating::UserRating;

/// A rated title on the user's watched list.
///
/// Serialized with the keys the browser build stored (`imdbID`, `poster`,
/// `runtime`, ...) so lists written by either side load in the other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedEntry {
    #[serde(rename = "imdbID")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(rename = "poster", default)]
    pub poster_url: String,
    #[serde(rename = "runtime", default, deserialize_with = "lenient_minutes")]
    pub runtime_minutes: Option<u32>,
    #[serde(rename = "imdbRating", default, deserialize_with = "lenient_rating")]
    pub imdb_rating: Option<f64>,
    #[serde(rename = "userRating")]
    pub user_rating: UserRating,
    #[serde(rename = "addedAt", default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl WatchedEntry {
    /// Build the entry produced by "add to watched" on a detail view.
    pub fn from_detail(detail: &MovieDetail, user_rating: UserRating) -> Result<Self, ModelError> {
        if detail.id.trim().is_empty() {
            return Err(ModelError::MissingId {
                title: detail.title.clone(),
            });
        }

        Ok(Self {
            id: detail.id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster_url: detail.poster_url.clone(),
            runtime_minutes: detail.runtime_minutes(),
            imdb_rating: detail.imdb_rating_value(),
            user_rating,
            added_at: Some(Utc::now()),
        })
    }
}

// Older lists stored runtime as the string "148" and ratings as whatever
// Number() produced, so accept numbers, numeric strings and null.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(f64),
    Text(String),
}

fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Lenient> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Lenient::Number(n)) if n.is_finite() && n >= 0.0 => Some(n.round() as u32),
        Some(Lenient::Text(text)) => parse_runtime_minutes(&text),
        _ => None,
    })
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Lenient> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Lenient::Number(n)) if n.is_finite() => Some(n),
        Some(Lenient::Text(text)) => parse_rating(&text),
        _ => None,
    })
}
