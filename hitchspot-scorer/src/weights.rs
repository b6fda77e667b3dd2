//! Sub-score weights and the named strategies built from them.
#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use hitchspot_core::SubScore;
use serde::{Deserialize, Serialize};

use crate::ScorerError;

/// Validated, non-negative weight per sub-score.
///
/// Weights need not sum to one. Sub-scores without an entry weigh zero.
///
/// # Examples
/// ```
/// use hitchspot_core::SubScore;
/// use hitchspot_scorer::SubScoreWeights;
///
/// # fn main() -> Result<(), hitchspot_scorer::ScorerError> {
/// let weights = SubScoreWeights::new([(SubScore::Rating, 2.0), (SubScore::Recency, 0.5)])?;
/// assert_eq!(weights.get(SubScore::Rating), 2.0);
/// assert_eq!(weights.get(SubScore::Isolation), 0.0);
/// assert!(SubScoreWeights::new([(SubScore::Rating, -1.0)]).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubScoreWeights {
    weights: BTreeMap<SubScore, f64>,
}

impl SubScoreWeights {
    /// Validate and collect weights.
    ///
    /// Later entries for the same sub-score replace earlier ones.
    ///
    /// # Errors
    /// Returns [`ScorerError::InvalidWeight`] for negative or non-finite
    /// weights.
    pub fn new<I>(weights: I) -> Result<Self, ScorerError>
    where
        I: IntoIterator<Item = (SubScore, f64)>,
    {
        let mut validated = BTreeMap::new();
        for (sub_score, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ScorerError::InvalidWeight { sub_score, value });
            }
            validated.insert(sub_score, value);
        }
        Ok(Self { weights: validated })
    }

    /// Weight applied to `sub_score`; zero when unset.
    #[must_use]
    pub fn get(&self, sub_score: SubScore) -> f64 {
        self.weights.get(&sub_score).copied().unwrap_or(0.0)
    }

    /// Iterate over the configured weights in sub-score order.
    pub fn iter(&self) -> impl Iterator<Item = (SubScore, f64)> + '_ {
        self.weights.iter().map(|(sub_score, value)| (*sub_score, *value))
    }
}

/// Named, selectable scoring behaviour.
///
/// `Quality` prefers detailed, recent reports with objective data; it is the
/// default. `Isolation` prefers points from small clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStrategy {
    /// Comment 0.4, recency 0.3, objective data 0.2, rating 0.1.
    #[default]
    Quality,
    /// Isolation 1.0.
    Isolation,
}

impl ScoringStrategy {
    /// Every strategy, in declaration order.
    pub const ALL: [Self; 2] = [Self::Quality, Self::Isolation];

    /// Weights that define this strategy.
    #[must_use]
    pub fn weights(self) -> SubScoreWeights {
        let entries: &[(SubScore, f64)] = match self {
            Self::Quality => &[
                (SubScore::CommentRichness, 0.4),
                (SubScore::Recency, 0.3),
                (SubScore::ObjectiveData, 0.2),
                (SubScore::Rating, 0.1),
            ],
            Self::Isolation => &[(SubScore::Isolation, 1.0)],
        };
        SubScoreWeights {
            weights: entries.iter().copied().collect(),
        }
    }

    /// Lowercase name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Isolation => "isolation",
        }
    }
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringStrategy {
    type Err = ScorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScorerError::UnknownStrategy { name: s.to_owned() })
    }
}
