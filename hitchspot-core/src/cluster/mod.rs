//! Density-based clustering over the haversine metric.
//!
//! A point is *core* when at least `min_samples` points, itself included,
//! lie within `epsilon_km` of it. Clusters grow from core points in input
//! order; any point within epsilon of a core point joins the first cluster
//! that reaches it. Points no cluster reaches are [`ClusterLabel::NOISE`].

mod index;

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::distance::km_to_radians;
use index::NeighbourIndex;

/// Cluster membership of one point.
///
/// Non-negative labels identify a cluster within a single run and carry no
/// meaning across runs.
///
/// # Examples
/// ```
/// use hitchspot_core::ClusterLabel;
///
/// assert!(ClusterLabel::NOISE.is_noise());
/// assert_eq!(ClusterLabel::cluster(3).get(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ClusterLabel(i64);

impl ClusterLabel {
    /// Label of a point that met no density requirement.
    pub const NOISE: Self = Self(-1);

    /// Label for the cluster with the given zero-based ordinal.
    #[must_use]
    pub fn cluster(ordinal: usize) -> Self {
        Self(i64::try_from(ordinal).unwrap_or(i64::MAX))
    }

    /// Raw integer value; `-1` for noise.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Report whether this label marks noise.
    #[must_use]
    pub const fn is_noise(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors returned by [`ClusterParams::new`].
#[derive(Debug, Error, PartialEq)]
pub enum ClusterParamsError {
    /// The radius was zero, negative or not finite.
    #[error("epsilon must be a positive number of kilometres, got {value}")]
    InvalidEpsilon {
        /// Rejected radius.
        value: f64,
    },
    /// `min_samples` was zero.
    #[error("min_samples must be at least 1")]
    ZeroMinSamples,
}

/// Density parameters for [`cluster_spots`].
///
/// # Examples
/// ```
/// use hitchspot_core::ClusterParams;
///
/// # fn main() -> Result<(), hitchspot_core::ClusterParamsError> {
/// let params = ClusterParams::new(0.5, 3)?;
/// assert_eq!(params.min_samples(), 3);
/// assert!(ClusterParams::new(0.0, 3).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    epsilon_km: f64,
    min_samples: usize,
}

impl ClusterParams {
    /// Default neighbourhood radius in kilometres.
    pub const DEFAULT_EPSILON_KM: f64 = 0.3;
    /// Default neighbourhood size, the point itself included.
    pub const DEFAULT_MIN_SAMPLES: usize = 2;

    /// Validate and construct parameters.
    pub fn new(epsilon_km: f64, min_samples: usize) -> Result<Self, ClusterParamsError> {
        if !epsilon_km.is_finite() || epsilon_km <= 0.0 {
            return Err(ClusterParamsError::InvalidEpsilon { value: epsilon_km });
        }
        if min_samples == 0 {
            return Err(ClusterParamsError::ZeroMinSamples);
        }
        Ok(Self {
            epsilon_km,
            min_samples,
        })
    }

    /// Neighbourhood radius in kilometres.
    #[must_use]
    pub const fn epsilon_km(&self) -> f64 {
        self.epsilon_km
    }

    /// Minimum neighbourhood size for a core point.
    #[must_use]
    pub const fn min_samples(&self) -> usize {
        self.min_samples
    }
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            epsilon_km: Self::DEFAULT_EPSILON_KM,
            min_samples: Self::DEFAULT_MIN_SAMPLES,
        }
    }
}

/// Labels produced by one clustering run, aligned with the input slice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Clustering {
    labels: Vec<ClusterLabel>,
    cluster_count: usize,
}

impl Clustering {
    /// Build a clustering from precomputed labels.
    ///
    /// Useful when labels come from elsewhere, such as a fixture.
    #[must_use]
    pub fn from_labels(labels: Vec<ClusterLabel>) -> Self {
        let cluster_count = labels
            .iter()
            .filter(|label| !label.is_noise())
            .map(|label| label.get())
            .collect::<std::collections::BTreeSet<_>>()
            .len();
        Self {
            labels,
            cluster_count,
        }
    }

    /// One label per input point, in input order.
    #[must_use]
    pub fn labels(&self) -> &[ClusterLabel] {
        &self.labels
    }

    /// Label of the point at `index`.
    #[must_use]
    pub fn label(&self, index: usize) -> Option<ClusterLabel> {
        self.labels.get(index).copied()
    }

    /// Number of points labelled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Report whether no points were labelled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of distinct non-noise clusters.
    #[must_use]
    pub const fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Number of points labelled as noise.
    #[must_use]
    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|label| label.is_noise()).count()
    }

    /// Member count per non-noise cluster.
    #[must_use]
    pub fn cluster_sizes(&self) -> BTreeMap<ClusterLabel, usize> {
        let mut sizes = BTreeMap::new();
        for label in self.labels.iter().filter(|label| !label.is_noise()) {
            *sizes.entry(*label).or_insert(0) += 1;
        }
        sizes
    }

    /// Member count of `label`; noise points are singletons.
    #[must_use]
    pub fn size_of(&self, label: ClusterLabel) -> usize {
        if label.is_noise() {
            return 1;
        }
        self.labels.iter().filter(|other| **other == label).count()
    }
}

/// Partition `locations` into density clusters.
///
/// Identical input order and parameters always produce identical labels.
/// Labels are zero-based and contiguous, numbered by the position of each
/// cluster's first core point.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use hitchspot_core::{ClusterLabel, ClusterParams, cluster_spots};
///
/// let locations = [
///     Coord { x: 2.35, y: 48.85 },
///     Coord { x: 2.351, y: 48.851 },
///     Coord { x: 3.0, y: 49.5 },
/// ];
/// let clustering = cluster_spots(&locations, &ClusterParams::default());
/// assert_eq!(
///     clustering.labels(),
///     &[ClusterLabel::cluster(0), ClusterLabel::cluster(0), ClusterLabel::NOISE]
/// );
/// ```
#[must_use]
pub fn cluster_spots(locations: &[Coord<f64>], params: &ClusterParams) -> Clustering {
    if locations.is_empty() {
        return Clustering::default();
    }
    let radius = km_to_radians(params.epsilon_km());
    let index = NeighbourIndex::build(locations);
    let neighbourhoods: Vec<Vec<usize>> = locations
        .iter()
        .map(|location| index.within(*location, radius))
        .collect();
    let is_core = |point: usize| {
        neighbourhoods
            .get(point)
            .is_some_and(|neighbours| neighbours.len() >= params.min_samples())
    };

    let mut assigned: Vec<Option<ClusterLabel>> = vec![None; locations.len()];
    let mut cluster_count = 0;
    for seed in 0..locations.len() {
        if assigned.get(seed).copied().flatten().is_some() || !is_core(seed) {
            continue;
        }
        let label = ClusterLabel::cluster(cluster_count);
        cluster_count += 1;
        let mut frontier = VecDeque::from([seed]);
        while let Some(point) = frontier.pop_front() {
            let Some(slot) = assigned.get_mut(point) else {
                continue;
            };
            if slot.is_some() {
                continue;
            }
            *slot = Some(label);
            if is_core(point)
                && let Some(neighbours) = neighbourhoods.get(point)
            {
                frontier.extend(
                    neighbours
                        .iter()
                        .copied()
                        .filter(|neighbour| assigned.get(*neighbour).is_some_and(Option::is_none)),
                );
            }
        }
    }

    let labels: Vec<ClusterLabel> = assigned
        .into_iter()
        .map(|label| label.unwrap_or(ClusterLabel::NOISE))
        .collect();
    log::debug!(
        "Clustered {} points into {} clusters (epsilon {} km, min_samples {})",
        labels.len(),
        cluster_count,
        params.epsilon_km(),
        params.min_samples()
    );
    Clustering {
        labels,
        cluster_count,
    }
}
