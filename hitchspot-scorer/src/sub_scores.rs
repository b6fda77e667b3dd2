//! Individual sub-score functions.
//!
//! Every function returns a value in `0.0..=1.0` for any input, including
//! missing ratings, timestamps and comments.
#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use hitchspot_core::{ClusterLabel, ScoringContext, Spot, SubScore, parse_timestamp};

/// Comment length, in characters, that earns the full richness score.
pub const COMMENT_RICHNESS_CAP: usize = 200;

/// Days over which recency decays by a factor of `e`.
pub const RECENCY_DECAY_DAYS: f64 = 365.0;

/// Seconds since the Unix epoch of `2010-01-01T00:00:00Z`.
const RECENCY_FALLBACK_SECONDS: i64 = 1_262_304_000;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Date assumed for reports whose timestamp is missing or unparsable.
#[must_use]
pub fn recency_fallback() -> DateTime<Utc> {
    DateTime::from_timestamp(RECENCY_FALLBACK_SECONDS, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

fn unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Rating divided by the batch ceiling; missing ratings score zero.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "rating is normalised by the batch ceiling"
)]
pub fn rating_score(rating: Option<f64>, ceiling: f64) -> f64 {
    rating.map_or(0.0, |value| unit(value / ceiling))
}

/// `exp(-age_days / 365)`, with future reports clamped to one.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "recency is an exponential decay over days"
)]
#[expect(
    clippy::cast_precision_loss,
    reason = "sub-second precision is irrelevant for ages measured in days"
)]
pub fn recency_score(timestamp: Option<&str>, now: DateTime<Utc>) -> f64 {
    let reported = timestamp
        .and_then(parse_timestamp)
        .unwrap_or_else(recency_fallback);
    let age_days = (now - reported).num_seconds() as f64 / SECONDS_PER_DAY;
    unit((-age_days.max(0.0) / RECENCY_DECAY_DAYS).exp())
}

/// Character count capped at [`COMMENT_RICHNESS_CAP`], scaled to one.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "richness is a ratio of character counts"
)]
pub fn comment_richness_score(comment: Option<&str>) -> f64 {
    let length = comment
        .map_or(0, |text| text.chars().count())
        .min(COMMENT_RICHNESS_CAP);
    unit(f64::from(small(length)) / f64::from(small(COMMENT_RICHNESS_CAP)))
}

/// One when a waiting time was recorded, else zero.
#[must_use]
pub fn objective_data_score(has_wait: bool) -> f64 {
    if has_wait { 1.0 } else { 0.0 }
}

/// Inverse cluster size; noise points score one.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "isolation is the reciprocal of the cluster size"
)]
pub fn isolation_score(cluster_size: usize) -> f64 {
    unit(1.0 / f64::from(small(cluster_size.max(1))))
}

fn small(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Every sub-score for one spot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SubScores {
    /// [`rating_score`].
    pub rating: f64,
    /// [`recency_score`].
    pub recency: f64,
    /// [`comment_richness_score`].
    pub comment_richness: f64,
    /// [`objective_data_score`].
    pub objective_data: f64,
    /// [`isolation_score`].
    pub isolation: f64,
}

impl SubScores {
    /// Compute all sub-scores for `spot`.
    #[must_use]
    pub fn compute(spot: &Spot, label: ClusterLabel, ctx: &ScoringContext) -> Self {
        Self {
            rating: rating_score(spot.rating(), ctx.rating_ceiling()),
            recency: recency_score(spot.timestamp(), ctx.now()),
            comment_richness: comment_richness_score(spot.comment()),
            objective_data: objective_data_score(spot.has_wait()),
            isolation: isolation_score(ctx.cluster_size(label)),
        }
    }

    /// Value of one named sub-score.
    #[must_use]
    pub const fn get(&self, sub_score: SubScore) -> f64 {
        match sub_score {
            SubScore::Rating => self.rating,
            SubScore::Recency => self.recency,
            SubScore::CommentRichness => self.comment_richness,
            SubScore::ObjectiveData => self.objective_data,
            SubScore::Isolation => self.isolation,
        }
    }
}
