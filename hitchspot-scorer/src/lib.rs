//! Named scoring strategies for hitchspot deduplication.
//!
//! Each spot receives a composite score: the weighted sum of sub-scores that
//! are each normalised to `0.0..=1.0`.
//!
//! | Sub-score | Definition |
//! |---|---|
//! | rating | rating ÷ highest rating in the batch |
//! | recency | `exp(-age_days / 365)`, undated reports assumed from 2010 |
//! | comment richness | `min(chars, 200) / 200` |
//! | objective data | 1 when a waiting time was recorded |
//! | isolation | 1 ÷ cluster size, 1 for noise |
//!
//! [`ScoringStrategy`] names the weight sets in use: `quality` (the default)
//! and `isolation`. [`CompositeScorer`] implements
//! [`Scorer`](hitchspot_core::Scorer), so any strategy plugs into
//! [`deduplicate`](hitchspot_core::deduplicate).
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use hitchspot_core::{DedupConfig, SpotRow, deduplicate};
//! use hitchspot_scorer::{CompositeScorer, ScoringStrategy};
//!
//! let rows = vec![SpotRow::at(48.85, 2.35).with_rating(4.0)];
//! let scorer = CompositeScorer::for_strategy(ScoringStrategy::default());
//! let outcome = deduplicate(rows, &DedupConfig::default(), &scorer, Utc::now())
//!     .expect("stages stay aligned");
//! assert_eq!(outcome.summary.raw, 1);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod composite;
mod error;
mod sub_scores;
mod weights;

pub use composite::CompositeScorer;
pub use error::ScorerError;
pub use sub_scores::{
    COMMENT_RICHNESS_CAP, RECENCY_DECAY_DAYS, SubScores, comment_richness_score,
    isolation_score, objective_data_score, rating_score, recency_fallback, recency_score,
};
pub use weights::{ScoringStrategy, SubScoreWeights};
