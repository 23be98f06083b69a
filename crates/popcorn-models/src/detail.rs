use serde::{Deserialize, Serialize};

/// Full record for a single title.
///
/// `runtime` and `imdb_rating` keep the raw strings the movie database
/// returns (`"148 min"`, `"8.8"`, `"N/A"`); use the accessors to get numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub plot: String,
    pub released: String,
    pub runtime: String,
    pub genre: String,
    pub director: String,
    pub actors: String,
    pub imdb_rating: String,
}

impl MovieDetail {
    /// Leading integer of the runtime field, e.g. `148` for `"148 min"`.
    pub fn runtime_minutes(&self) -> Option<u32> {
        parse_runtime_minutes(&self.runtime)
    }

    pub fn imdb_rating_value(&self) -> Option<f64> {
        parse_rating(&self.imdb_rating)
    }
}

pub fn parse_runtime_minutes(raw: &str) -> Option<u32> {
    raw.split_whitespace().next()?.parse().ok()
}

pub fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_minutes() {
        assert_eq!(parse_runtime_minutes("148 min"), Some(148));
        assert_eq!(parse_runtime_minutes("90"), Some(90));
        assert_eq!(parse_runtime_minutes("N/A"), None);
        assert_eq!(parse_runtime_minutes(""), None);
    }

    #[test]
    fn test_imdb_rating_value() {
        let detail = MovieDetail {
            imdb_rating: "8.8".to_string(),
            ..MovieDetail::default()
        };
        assert_eq!(detail.imdb_rating_value(), Some(8.8));

        let missing = MovieDetail {
            imdb_rating: "N/A".to_string(),
            ..MovieDetail::default()
        };
        assert_eq!(missing.imdb_rating_value(), None);
        assert_eq!(parse_rating("NaN"), None);
    }
}
