//! Bucket ratings into the appreciation levels used by comment records.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coarse verdict attached to a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Appreciation {
    /// Rating below 2, missing or not a number.
    Bad,
    /// Rating in `[2, 4)`.
    Good,
    /// Rating of 4 or more.
    Perfect,
}

impl Appreciation {
    /// Classify an optional rating.
    ///
    /// # Examples
    /// ```
    /// use hitchspot_core::Appreciation;
    ///
    /// assert_eq!(Appreciation::from_rating(Some(4.0)), Appreciation::Perfect);
    /// assert_eq!(Appreciation::from_rating(Some(2.0)), Appreciation::Good);
    /// assert_eq!(Appreciation::from_rating(None), Appreciation::Bad);
    /// ```
    #[must_use]
    pub fn from_rating(rating: Option<f64>) -> Self {
        match rating {
            Some(value) if value >= 4.0 => Self::Perfect,
            Some(value) if value >= 2.0 => Self::Good,
            _ => Self::Bad,
        }
    }

    /// Lowercase label, as stored in exported records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bad => "bad",
            Self::Good => "good",
            Self::Perfect => "perfect",
        }
    }
}

impl fmt::Display for Appreciation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
