//! Error types raised while configuring composite scorers.
#![forbid(unsafe_code)]

use hitchspot_core::SubScore;
use thiserror::Error;

/// Errors raised while building a [`crate::CompositeScorer`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScorerError {
    /// A weight was negative or not finite.
    #[error("weight {value} for {sub_score} must be finite and non-negative")]
    InvalidWeight {
        /// Sub-score the weight applies to.
        sub_score: SubScore,
        /// Rejected weight.
        value: f64,
    },
    /// A strategy name was not recognised.
    #[error("unknown scoring strategy `{name}`; expected `quality` or `isolation`")]
    UnknownStrategy {
        /// Name supplied by the caller.
        name: String,
    },
}
