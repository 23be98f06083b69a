use thiserror::Error;

/// Failures from a movie database call.
///
/// `NotFound` is the logical "no match" answer carried in a successful
/// response; everything else is a transport-level failure.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound(_))
    }

    /// The payload message for logical failures, `None` for transport failures.
    pub fn not_found_message(&self) -> Option<&str> {
        match self {
            SourceError::NotFound(message) => Some(message),
            _ => None,
        }
    }
}
