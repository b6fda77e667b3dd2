//! Score spots for representative selection.
//!
//! The [`Scorer`] trait assigns a quality score to a [`Spot`] given its
//! cluster label and the batch-wide [`ScoringContext`]. Named strategies
//! live in the `hitchspot-scorer` crate; the clustering and selection stages
//! only see this trait.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ClusterLabel, Clustering, Spot};

/// Rating divisor used when no positive rating exists in the batch.
pub const DEFAULT_RATING_CEILING: f64 = 5.0;

/// Named components of a composite score.
///
/// Each sub-score is normalised to `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SubScore {
    /// Rating relative to the highest rating in the batch.
    Rating,
    /// Exponential decay with the age of the report.
    Recency,
    /// Length of the comment, capped.
    CommentRichness,
    /// Presence of a measured waiting time.
    ObjectiveData,
    /// Inverse of the cluster size.
    Isolation,
}

impl SubScore {
    /// Every sub-score, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Rating,
        Self::Recency,
        Self::CommentRichness,
        Self::ObjectiveData,
        Self::Isolation,
    ];

    /// Stable snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::Recency => "recency",
            Self::CommentRichness => "comment_richness",
            Self::ObjectiveData => "objective_data",
            Self::Isolation => "isolation",
        }
    }
}

impl fmt::Display for SubScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Batch-wide inputs shared by every score in one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringContext {
    rating_ceiling: f64,
    cluster_sizes: BTreeMap<ClusterLabel, usize>,
    now: DateTime<Utc>,
}

impl ScoringContext {
    /// Capture the rating ceiling and cluster sizes of a batch.
    ///
    /// The rating ceiling is the maximum finite rating observed, or
    /// [`DEFAULT_RATING_CEILING`] when that maximum is missing or not
    /// positive.
    #[must_use]
    pub fn from_batch(spots: &[Spot], clustering: &Clustering, now: DateTime<Utc>) -> Self {
        let max_rating = spots
            .iter()
            .filter_map(Spot::rating)
            .fold(None, |max: Option<f64>, rating| {
                Some(max.map_or(rating, |current| current.max(rating)))
            });
        let rating_ceiling = match max_rating {
            Some(value) if value > 0.0 => value,
            _ => DEFAULT_RATING_CEILING,
        };
        Self {
            rating_ceiling,
            cluster_sizes: clustering.cluster_sizes(),
            now,
        }
    }

    /// Build a context from explicit values.
    #[must_use]
    pub fn new(
        rating_ceiling: f64,
        cluster_sizes: BTreeMap<ClusterLabel, usize>,
        now: DateTime<Utc>,
    ) -> Self {
        let rating_ceiling = if rating_ceiling.is_finite() && rating_ceiling > 0.0 {
            rating_ceiling
        } else {
            DEFAULT_RATING_CEILING
        };
        Self {
            rating_ceiling,
            cluster_sizes,
            now,
        }
    }

    /// Divisor for the rating sub-score; always positive.
    #[must_use]
    pub const fn rating_ceiling(&self) -> f64 {
        self.rating_ceiling
    }

    /// Member count of `label`; noise and unknown labels count as one.
    #[must_use]
    pub fn cluster_size(&self, label: ClusterLabel) -> usize {
        if label.is_noise() {
            return 1;
        }
        self.cluster_sizes.get(&label).copied().unwrap_or(1).max(1)
    }

    /// Reference time for recency.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Calculate a quality score for a spot.
///
/// Higher scores mark better representatives. Implementations must be
/// thread-safe and infallible, returning `0.0` when no information is
/// available. Totals are non-negative and finite but need not be bounded by
/// one, since strategy weights need not sum to one.
///
/// # Examples
///
/// ```rust
/// use chrono::Utc;
/// use hitchspot_core::{ClusterLabel, Clustering, Scorer, ScoringContext, Spot, SpotRow};
///
/// struct RatingOnly;
///
/// impl Scorer for RatingOnly {
///     fn score(&self, spot: &Spot, _label: ClusterLabel, _ctx: &ScoringContext) -> f64 {
///         Self::sanitise(spot.rating().unwrap_or(0.0))
///     }
/// }
///
/// let spot = SpotRow::at(1.0, 1.0).with_rating(3.0).into_spot().unwrap();
/// let ctx = ScoringContext::from_batch(&[], &Clustering::default(), Utc::now());
/// assert_eq!(RatingOnly.score(&spot, ClusterLabel::NOISE, &ctx), 3.0);
/// ```
pub trait Scorer: Send + Sync {
    /// Return a score for `spot` carrying `label`.
    fn score(&self, spot: &Spot, label: ClusterLabel, ctx: &ScoringContext) -> f64;

    /// Map non-finite and negative values to `0.0`.
    fn sanitise(score: f64) -> f64
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.max(0.0)
    }
}

impl<S: Scorer + ?Sized> Scorer for &S {
    fn score(&self, spot: &Spot, label: ClusterLabel, ctx: &ScoringContext) -> f64 {
        (**self).score(spot, label, ctx)
    }
}

impl<S: Scorer + ?Sized> Scorer for Box<S> {
    fn score(&self, spot: &Spot, label: ClusterLabel, ctx: &ScoringContext) -> f64 {
        (**self).score(spot, label, ctx)
    }
}

/// Score every spot in a batch.
///
/// `clustering` must label `spots` in the same order; a spot without a label
/// is scored as noise.
#[must_use]
pub fn score_spots(
    spots: &[Spot],
    clustering: &Clustering,
    scorer: &dyn Scorer,
    now: DateTime<Utc>,
) -> Vec<f64> {
    let ctx = ScoringContext::from_batch(spots, clustering, now);
    spots
        .iter()
        .enumerate()
        .map(|(index, spot)| {
            let label = clustering.label(index).unwrap_or(ClusterLabel::NOISE);
            scorer.score(spot, label, &ctx)
        })
        .collect()
}
