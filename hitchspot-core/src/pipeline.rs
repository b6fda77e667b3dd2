//! Filter, cluster, score and select in one call.

use chrono::{DateTime, Utc};

use crate::{
    ClusterParams, FilterConfig, Representative, Scorer, SelectionError, Spot, SpotRow,
    cluster_spots, filter_rows, score_spots, select_representatives,
};

/// Parameters for [`deduplicate`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DedupConfig {
    /// Record filter predicates.
    pub filter: FilterConfig,
    /// Density parameters.
    pub cluster: ClusterParams,
}

/// Counts describing one deduplication run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DedupSummary {
    /// Rows supplied.
    pub raw: usize,
    /// Rows with usable coordinates, before the policy predicates.
    pub located: usize,
    /// Rows that passed the filter.
    pub filtered: usize,
    /// Distinct clusters found.
    pub clusters: usize,
    /// Points labelled as noise.
    pub noise: usize,
    /// Entries in the representative set.
    pub representatives: usize,
}

/// Representatives and run counts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DedupOutcome {
    /// Noise points in input order, then one spot per cluster in label order.
    pub representatives: Vec<Representative>,
    /// Counts per stage.
    pub summary: DedupSummary,
}

/// Reduce raw rows to their representative set.
///
/// # Errors
/// Returns [`SelectionError`] if the stages disagree on batch length.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use hitchspot_core::{
///     ClusterLabel, DedupConfig, FilterConfig, Scorer, ScoringContext, Spot, SpotRow,
///     deduplicate,
/// };
///
/// struct RatingScorer;
///
/// impl Scorer for RatingScorer {
///     fn score(&self, spot: &Spot, _label: ClusterLabel, _ctx: &ScoringContext) -> f64 {
///         spot.rating().unwrap_or(0.0)
///     }
/// }
///
/// # fn main() -> Result<(), hitchspot_core::SelectionError> {
/// let rows = vec![
///     SpotRow::at(48.85, 2.35).with_rating(2.0),
///     SpotRow::at(48.851, 2.351).with_rating(5.0),
/// ];
/// let config = DedupConfig {
///     filter: FilterConfig::permissive(),
///     ..DedupConfig::default()
/// };
/// let outcome = deduplicate(rows, &config, &RatingScorer, Utc::now())?;
/// assert_eq!(outcome.summary.clusters, 1);
/// assert_eq!(outcome.representatives[0].spot.rating(), Some(5.0));
/// # Ok(())
/// # }
/// ```
pub fn deduplicate(
    rows: Vec<SpotRow>,
    config: &DedupConfig,
    scorer: &dyn Scorer,
    now: DateTime<Utc>,
) -> Result<DedupOutcome, SelectionError> {
    let raw = rows.len();
    log::info!("Loaded {raw} raw points");

    let (spots, report) = filter_rows(rows, &config.filter);

    let locations: Vec<_> = spots.iter().map(Spot::location).collect();
    let clustering = cluster_spots(&locations, &config.cluster);
    log::info!(
        "Found {} clusters and {} noise points",
        clustering.cluster_count(),
        clustering.noise_count()
    );

    let scores = score_spots(&spots, &clustering, scorer, now);
    let representatives = select_representatives(&spots, &clustering, &scores)?;
    log::info!(
        "Selected {} representatives from {} points",
        representatives.len(),
        spots.len()
    );

    let summary = DedupSummary {
        raw,
        located: report.with_coordinates,
        filtered: spots.len(),
        clusters: clustering.cluster_count(),
        noise: clustering.noise_count(),
        representatives: representatives.len(),
    };
    Ok(DedupOutcome {
        representatives,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RatingScorer;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid time")
    }

    #[fixture]
    fn config() -> DedupConfig {
        DedupConfig {
            filter: FilterConfig::permissive(),
            cluster: ClusterParams::default(),
        }
    }

    #[rstest]
    fn summarises_each_stage(config: DedupConfig, now: DateTime<Utc>) {
        let rows = vec![
            SpotRow::at(48.85, 2.35).with_rating(3.0),
            SpotRow::at(48.851, 2.351).with_rating(4.0),
            SpotRow::at(48.852, 2.352).with_rating(1.0),
            SpotRow::at(49.3, 2.35).with_rating(1.0),
            SpotRow::default(),
        ];
        let outcome = deduplicate(rows, &config, &RatingScorer, now).expect("aligned stages");
        assert_eq!(
            outcome.summary,
            DedupSummary {
                raw: 5,
                located: 4,
                filtered: 4,
                clusters: 1,
                noise: 1,
                representatives: 2,
            }
        );
        let ratings: Vec<_> = outcome
            .representatives
            .iter()
            .map(|rep| rep.spot.rating())
            .collect();
        assert_eq!(ratings, vec![Some(1.0), Some(4.0)]);
    }

    #[rstest]
    fn empty_input_is_not_an_error(config: DedupConfig, now: DateTime<Utc>) {
        let outcome = deduplicate(Vec::new(), &config, &RatingScorer, now).expect("empty run");
        assert!(outcome.representatives.is_empty());
        assert_eq!(outcome.summary, DedupSummary::default());
    }

    #[rstest]
    fn filter_runs_before_clustering(now: DateTime<Utc>) {
        let config = DedupConfig::default();
        let rows = vec![
            SpotRow::at(48.85, 2.35).with_rating(3.0).banned(),
            SpotRow::at(48.851, 2.351)
                .with_rating(4.0)
                .with_destination(45.0, 5.0),
        ];
        let outcome = deduplicate(rows, &config, &RatingScorer, now).expect("aligned stages");
        assert_eq!(outcome.summary.located, 2);
        assert_eq!(outcome.summary.filtered, 1);
        assert_eq!(outcome.summary.noise, 1);
        assert_eq!(outcome.summary.clusters, 0);
    }

    #[rstest]
    fn separates_unusable_coordinates_from_policy_drops(now: DateTime<Utc>) {
        let config = DedupConfig::default();
        let rows = vec![
            SpotRow::at(95.0, 2.35).with_rating(4.0),
            SpotRow::at(f64::NAN, 2.35).with_rating(4.0),
            SpotRow::at(48.85, 2.35).with_rating(4.0).banned(),
            SpotRow::at(48.851, 2.351)
                .with_rating(4.0)
                .with_destination(45.0, 5.0),
        ];
        let outcome = deduplicate(rows, &config, &RatingScorer, now).expect("aligned stages");
        assert_eq!(outcome.summary.raw, 4);
        assert_eq!(outcome.summary.located, 2);
        assert_eq!(outcome.summary.filtered, 1);
    }
}
