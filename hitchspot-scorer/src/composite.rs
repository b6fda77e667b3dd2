//! Weighted sum of sub-scores implementing the core `Scorer` trait.
#![forbid(unsafe_code)]

use hitchspot_core::{ClusterLabel, Scorer, ScoringContext, Spot};

use crate::{ScoringStrategy, SubScoreWeights, SubScores};

/// Scores a spot as `Σ weight × sub-score`.
///
/// Swapping the weights changes which spot represents a cluster; clustering
/// and selection are unaffected.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use hitchspot_core::{ClusterLabel, Clustering, Scorer, ScoringContext, SpotRow};
/// use hitchspot_scorer::{CompositeScorer, ScoringStrategy};
///
/// let spot = SpotRow::at(48.85, 2.35).into_spot().expect("valid spot");
/// let ctx = ScoringContext::from_batch(&[], &Clustering::default(), Utc::now());
/// let scorer = CompositeScorer::for_strategy(ScoringStrategy::Isolation);
/// assert_eq!(scorer.score(&spot, ClusterLabel::NOISE, &ctx), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompositeScorer {
    weights: SubScoreWeights,
}

impl CompositeScorer {
    /// Create a scorer from validated weights.
    #[must_use]
    pub const fn new(weights: SubScoreWeights) -> Self {
        Self { weights }
    }

    /// Create a scorer for a named strategy.
    #[must_use]
    pub fn for_strategy(strategy: ScoringStrategy) -> Self {
        log::debug!("Using {strategy} scoring strategy");
        Self::new(strategy.weights())
    }

    /// Weights in use.
    #[must_use]
    pub const fn weights(&self) -> &SubScoreWeights {
        &self.weights
    }

    /// Individual sub-scores behind [`Scorer::score`].
    #[must_use]
    pub fn breakdown(&self, spot: &Spot, label: ClusterLabel, ctx: &ScoringContext) -> SubScores {
        SubScores::compute(spot, label, ctx)
    }
}

impl Scorer for CompositeScorer {
    #[expect(
        clippy::float_arithmetic,
        reason = "composite score is a weighted sum"
    )]
    fn score(&self, spot: &Spot, label: ClusterLabel, ctx: &ScoringContext) -> f64 {
        let parts = self.breakdown(spot, label, ctx);
        let total = self
            .weights
            .iter()
            .map(|(sub_score, weight)| weight * parts.get(sub_score))
            .sum();
        Self::sanitise(total)
    }
}
