//! Pick one representative per cluster and keep every noise point.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::{ClusterLabel, Clustering, Spot};

/// A spot chosen to stand for its cluster, or a noise point passed through.
#[derive(Debug, Clone, PartialEq)]
pub struct Representative {
    /// The chosen spot.
    pub spot: Spot,
    /// Its cluster label.
    pub label: ClusterLabel,
    /// Its total score.
    pub score: f64,
}

/// Errors returned by [`select_representatives`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Spots, labels and scores were not the same length.
    #[error("length mismatch: {spots} spots, {labels} labels, {scores} scores")]
    LengthMismatch {
        /// Number of spots supplied.
        spots: usize,
        /// Number of labels supplied.
        labels: usize,
        /// Number of scores supplied.
        scores: usize,
    },
}

fn beats(candidate: f64, incumbent: f64) -> bool {
    !candidate.is_nan() && (incumbent.is_nan() || candidate > incumbent)
}

/// Reduce a scored, labelled batch to its representative set.
///
/// Noise points come first in input order, then one best-scoring point per
/// cluster in label order. Ties go to the earlier point, and a NaN score
/// never displaces a comparable one.
///
/// # Errors
/// Returns [`SelectionError::LengthMismatch`] when the three inputs differ
/// in length.
///
/// # Examples
/// ```
/// use hitchspot_core::{ClusterLabel, Clustering, SpotRow, select_representatives};
///
/// # fn main() -> Result<(), hitchspot_core::SelectionError> {
/// let spots: Vec<_> = [SpotRow::at(1.0, 1.0), SpotRow::at(1.0, 1.001), SpotRow::at(9.0, 9.0)]
///     .into_iter()
///     .filter_map(SpotRow::into_spot)
///     .collect();
/// let cluster = ClusterLabel::cluster(0);
/// let clustering = Clustering::from_labels(vec![cluster, cluster, ClusterLabel::NOISE]);
/// let reps = select_representatives(&spots, &clustering, &[0.2, 0.9, 0.1])?;
/// assert_eq!(reps.len(), 2);
/// assert!(reps[0].label.is_noise());
/// assert_eq!(reps[1].score, 0.9);
/// # Ok(())
/// # }
/// ```
pub fn select_representatives(
    spots: &[Spot],
    clustering: &Clustering,
    scores: &[f64],
) -> Result<Vec<Representative>, SelectionError> {
    let labels = clustering.labels();
    if spots.len() != labels.len() || spots.len() != scores.len() {
        return Err(SelectionError::LengthMismatch {
            spots: spots.len(),
            labels: labels.len(),
            scores: scores.len(),
        });
    }

    let mut noise = Vec::new();
    let mut best: BTreeMap<ClusterLabel, usize> = BTreeMap::new();
    for (index, (label, score)) in labels.iter().zip(scores).enumerate() {
        if label.is_noise() {
            noise.push(index);
            continue;
        }
        best.entry(*label)
            .and_modify(|incumbent| {
                let current = scores.get(*incumbent).copied().unwrap_or(f64::NAN);
                if beats(*score, current) {
                    *incumbent = index;
                }
            })
            .or_insert(index);
    }

    let chosen = noise.into_iter().chain(best.into_values());
    Ok(chosen
        .filter_map(|index| {
            Some(Representative {
                spot: spots.get(index)?.clone(),
                label: *labels.get(index)?,
                score: *scores.get(index)?,
            })
        })
        .collect())
}
