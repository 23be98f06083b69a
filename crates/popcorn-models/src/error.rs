use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("user rating must be between {min} and {max}, got {value}")]
    RatingOutOfRange { value: i64, min: u8, max: u8 },

    #[error("movie detail '{title}' has no id")]
    MissingId { title: String },
}
