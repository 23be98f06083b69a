use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Personal rating on the 1-10 star scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct UserRating(u8);

impl UserRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: i64) -> Result<Self, ModelError> {
        if value < Self::MIN as i64 || value > Self::MAX as i64 {
            return Err(ModelError::RatingOutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for UserRating {
    type Error = ModelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserRating> for u8 {
    fn from(rating: UserRating) -> Self {
        rating.0
    }
}

impl fmt::Display for UserRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(UserRating::new(0).is_err());
        assert!(UserRating::new(11).is_err());
        assert!(UserRating::new(-3).is_err());
        assert_eq!(UserRating::new(1).unwrap().value(), 1);
        assert_eq!(UserRating::new(10).unwrap().value(), 10);
    }

    #[test]
    fn test_rating_rejects_out_of_range_json() {
        let parsed: Result<UserRating, _> = serde_json::from_str("12");
        assert!(parsed.is_err());

        let parsed: UserRating = serde_json::from_str("7").unwrap();
        assert_eq!(parsed.value(), 7);
    }
}
