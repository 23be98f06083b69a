pub mod detail;
pub mod error;
pub mod rating;
pub mod search;
pub mod summary;
pub mod watched;

pub use detail::MovieDetail;
pub use error::ModelError;
pub use rating::UserRating;
pub use search::SearchResultItem;
pub use summary::WatchedSummary;
pub use watched::WatchedEntry;
