//! Narrow the raw table to rows worth clustering.
//!
//! The coordinate check always runs first; the remaining predicates are
//! independently toggled through [`FilterConfig`] and combined
//! conjunctively.

use chrono::NaiveDate;

use crate::timestamp::{parse_timestamp, start_of_day};
use crate::{Spot, SpotRow};

/// Toggles and thresholds for [`filter_rows`].
///
/// # Examples
/// ```
/// use hitchspot_core::FilterConfig;
///
/// let config = FilterConfig {
///     country: Some("FR".into()),
///     ..FilterConfig::default()
/// };
/// assert!(config.exclude_banned);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Drop rows flagged as banned.
    pub exclude_banned: bool,
    /// Keep only rows flagged as reviewed.
    pub only_reviewed: bool,
    /// Drop rows whose rating is missing or below this value.
    pub min_rating: Option<f64>,
    /// Keep only rows from this country code.
    pub country: Option<String>,
    /// Keep only rows dated on or after this day.
    pub min_date: Option<NaiveDate>,
    /// Keep only rows with a complete destination coordinate.
    pub require_destination: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude_banned: true,
            only_reviewed: false,
            min_rating: Some(1.0),
            country: None,
            min_date: None,
            require_destination: true,
        }
    }
}

impl FilterConfig {
    /// A configuration that only enforces the coordinate check.
    #[must_use]
    pub const fn permissive() -> Self {
        Self {
            exclude_banned: false,
            only_reviewed: false,
            min_rating: None,
            country: None,
            min_date: None,
            require_destination: false,
        }
    }

    fn accepts(&self, spot: &Spot) -> bool {
        let row = spot.row();
        if self.exclude_banned && row.banned {
            return false;
        }
        if self.only_reviewed && !row.reviewed {
            return false;
        }
        if let Some(min) = self.min_rating
            && !spot.rating().is_some_and(|rating| rating >= min)
        {
            return false;
        }
        if let Some(country) = &self.country
            && !matches_country(row.country.as_deref(), country)
        {
            return false;
        }
        if let Some(min_date) = self.min_date
            && !dated_on_or_after(spot.timestamp(), min_date)
        {
            return false;
        }
        !(self.require_destination && spot.destination().is_none())
    }
}

fn matches_country(value: Option<&str>, wanted: &str) -> bool {
    value.is_some_and(|code| code.trim().eq_ignore_ascii_case(wanted.trim()))
}

fn dated_on_or_after(raw: Option<&str>, min_date: NaiveDate) -> bool {
    let cutoff = start_of_day(min_date);
    raw.and_then(parse_timestamp)
        .is_some_and(|timestamp| timestamp >= cutoff)
}

/// Row counts before and after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterReport {
    /// Rows supplied to the filter.
    pub input: usize,
    /// Rows with usable coordinates.
    pub with_coordinates: usize,
    /// Rows that passed every predicate.
    pub retained: usize,
}

/// Apply the coordinate check and every enabled predicate.
///
/// Input order is preserved. An empty result is not an error.
///
/// # Examples
/// ```
/// use hitchspot_core::{FilterConfig, SpotRow, filter_rows};
///
/// let rows = vec![
///     SpotRow::at(48.85, 2.35),
///     SpotRow::at(95.0, 2.35),
///     SpotRow::at(48.85, 2.35).banned(),
/// ];
/// let config = FilterConfig {
///     exclude_banned: true,
///     ..FilterConfig::permissive()
/// };
/// let (spots, report) = filter_rows(rows, &config);
/// assert_eq!(spots.len(), 1);
/// assert_eq!(report.with_coordinates, 2);
/// ```
#[must_use]
pub fn filter_rows(rows: Vec<SpotRow>, config: &FilterConfig) -> (Vec<Spot>, FilterReport) {
    let input = rows.len();
    let located: Vec<Spot> = rows.into_iter().filter_map(Spot::from_row).collect();
    let with_coordinates = located.len();
    let spots: Vec<Spot> = located
        .into_iter()
        .filter(|spot| config.accepts(spot))
        .collect();
    let report = FilterReport {
        input,
        with_coordinates,
        retained: spots.len(),
    };
    log::info!("Filtered: {} -> {} points", report.input, report.retained);
    (spots, report)
}
