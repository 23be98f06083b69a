use popcorn_models::{MovieDetail, SearchResultItem};
use serde::Deserialize;
use crate::error::SourceError;

const DEFAULT_NOT_FOUND: &str = "Movie not found!";

// OMDb signals logical failures with HTTP 200 and {"Response":"False","Error":"..."}
#[derive(Debug, Deserialize)]
struct OmdbEnvelope {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Poster", default)]
    poster: String,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
}

#[derive(Debug, Deserialize)]
struct OmdbDetailResponse {
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "Released", default)]
    released: String,
    #[serde(rename = "Runtime", default)]
    runtime: String,
    #[serde(rename = "Genre", default)]
    genre: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
}

fn check_envelope(value: &serde_json::Value) -> Result<(), SourceError> {
    let envelope: OmdbEnvelope = serde_json::from_value(value.clone())?;
    if envelope.response.as_deref() == Some("False") {
        let message = envelope
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NOT_FOUND.to_string());
        return Err(SourceError::NotFound(message));
    }
    Ok(())
}

/// Parse a `?s=` response body.
pub fn parse_search_response(body: &str) -> Result<Vec<SearchResultItem>, SourceError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    check_envelope(&value)?;

    let response: OmdbSearchResponse = serde_json::from_value(value)?;
    Ok(response
        .search
        .into_iter()
        .map(|item| SearchResultItem {
            id: item.imdb_id,
            title: item.title,
            year: item.year,
            poster_url: item.poster,
        })
        .collect())
}

/// Parse an `?i=` response body. `requested_id` fills in a missing `imdbID`.
pub fn parse_detail_response(body: &str, requested_id: &str) -> Result<MovieDetail, SourceError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    check_envelope(&value)?;

    let detail: OmdbDetailResponse = serde_json::from_value(value)?;
    let id = if detail.imdb_id.is_empty() {
        requested_id.to_string()
    } else {
        detail.imdb_id
    };

    Ok(MovieDetail {
        id,
        title: detail.title,
        year: detail.year,
        poster_url: detail.poster,
        plot: detail.plot,
        released: detail.released,
        runtime: detail.runtime,
        genre: detail.genre,
        director: detail.director,
        actors: detail.actors,
        imdb_rating: detail.imdb_rating,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_BODY: &str = r#"{
        "Search": [
            {"Title": "Inception", "Year": "2010", "imdbID": "tt1375666", "Type": "movie", "Poster": "https://m.media-amazon.com/images/inception.jpg"},
            {"Title": "Inception: The Cobol Job", "Year": "2010", "imdbID": "tt5295894", "Type": "movie", "Poster": "N/A"}
        ],
        "totalResults": "2",
        "Response": "True"
    }"#;

    const DETAIL_BODY: &str = r#"{
        "Title": "Inception",
        "Year": "2010",
        "Rated": "PG-13",
        "Released": "16 Jul 2010",
        "Runtime": "148 min",
        "Genre": "Action, Adventure, Sci-Fi",
        "Director": "Christopher Nolan",
        "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt, Elliot Page",
        "Plot": "A thief who steals corporate secrets through the use of dream-sharing technology...",
        "Poster": "https://m.media-amazon.com/images/inception.jpg",
        "imdbRating": "8.8",
        "imdbID": "tt1375666",
        "Response": "True"
    }"#;

    #[test]
    fn test_parse_search_response() {
        let results = parse_search_response(SEARCH_BODY).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "tt1375666");
        assert_eq!(results[0].title, "Inception");
        assert_eq!(results[1].poster_url, "N/A");
    }

    #[test]
    fn test_parse_search_not_found() {
        let body = r#"{"Response":"False","Error":"Movie not found!"}"#;
        let err = parse_search_response(body).unwrap_err();
        assert_eq!(err.not_found_message(), Some("Movie not found!"));
    }

    #[test]
    fn test_parse_search_too_many_results() {
        let body = r#"{"Response":"False","Error":"Too many results."}"#;
        let err = parse_search_response(body).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Too many results.");
    }

    #[test]
    fn test_parse_search_garbage_is_decode_error() {
        let err = parse_search_response("<html>oops</html>").unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_parse_detail_response() {
        let detail = parse_detail_response(DETAIL_BODY, "tt1375666").unwrap();
        assert_eq!(detail.id, "tt1375666");
        assert_eq!(detail.director, "Christopher Nolan");
        assert_eq!(detail.runtime_minutes(), Some(148));
        assert_eq!(detail.imdb_rating_value(), Some(8.8));
    }

    #[test]
    fn test_parse_detail_not_found() {
        let body = r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#;
        let err = parse_detail_response(body, "tt0").unwrap_err();
        assert_eq!(err.not_found_message(), Some("Incorrect IMDb ID."));
    }

    #[test]
    fn test_parse_detail_fills_missing_id() {
        let detail = parse_detail_response(r#"{"Title":"X","Response":"True"}"#, "tt42").unwrap();
        assert_eq!(detail.id, "tt42");
        assert_eq!(detail.runtime_minutes(), None);
    }
}
