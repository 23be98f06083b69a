use serde::Serialize;
use crate::watched::WatchedEntry;

/// Running totals shown above the watched list.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    pub avg_runtime: f64,
}

impl WatchedSummary {
    /// Averages skip entries whose runtime or IMDb rating is not numeric.
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        Self {
            count: entries.len(),
            avg_imdb_rating: average(entries.iter().filter_map(|e| e.imdb_rating)),
            avg_user_rating: average(entries.iter().map(|e| f64::from(e.user_rating.value()))),
            avg_runtime: average(entries.iter().filter_map(|e| e.runtime_minutes.map(f64::from))),
        }
    }

    pub fn imdb_rating_display(&self) -> String {
        format!("{:.2}", self.avg_imdb_rating)
    }

    pub fn user_rating_display(&self) -> String {
        format!("{:.2}", self.avg_user_rating)
    }

    pub fn runtime_display(&self) -> String {
        format!("{} min", self.avg_runtime.round() as u64)
    }
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::UserRating;

    fn entry(id: &str, user_rating: i64, runtime: Option<u32>, imdb: Option<f64>) -> WatchedEntry {
        WatchedEntry {
            id: id.to_string(),
            title: id.to_string(),
            year: "2000".to_string(),
            poster_url: String::new(),
            runtime_minutes: runtime,
            imdb_rating: imdb,
            user_rating: UserRating::new(user_rating).unwrap(),
            added_at: None,
        }
    }

    #[test]
    fn test_average_user_rating() {
        let entries = vec![
            entry("tt1", 8, Some(100), Some(7.0)),
            entry("tt2", 10, Some(120), Some(8.0)),
        ];
        let summary = WatchedSummary::from_entries(&entries);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.user_rating_display(), "9.00");
        assert_eq!(summary.imdb_rating_display(), "7.50");
        assert_eq!(summary.runtime_display(), "110 min");
    }

    #[test]
    fn test_skips_missing_values() {
        let entries = vec![
            entry("tt1", 6, None, Some(9.0)),
            entry("tt2", 4, Some(95), None),
        ];
        let summary = WatchedSummary::from_entries(&entries);
        assert_eq!(summary.avg_imdb_rating, 9.0);
        assert_eq!(summary.avg_runtime, 95.0);
        assert_eq!(summary.avg_user_rating, 5.0);
    }

    #[test]
    fn test_empty_list() {
        let summary = WatchedSummary::from_entries(&[]);
        assert_eq!(summary, WatchedSummary::default());
        assert_eq!(summary.user_rating_display(), "0.00");
        assert_eq!(summary.runtime_display(), "0 min");
    }
}
