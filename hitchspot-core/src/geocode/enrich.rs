//! Rate-limited road-name enrichment over a mapped batch.

use std::thread;
use std::time::{Duration, Instant};

use geo::Coord;

use super::{GeocodeError, ReverseGeocoder};
use crate::SpotRecord;

/// Road name written when a lookup fails or names no road.
pub const UNKNOWN_ROAD: &str = "Unknown road";

/// Pacing and retry policy for [`enrich_road_names`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichConfig {
    /// Minimum spacing between consecutive requests.
    pub delay: Duration,
    /// Attempts per spot, the first included.
    pub max_attempts: u32,
}

impl EnrichConfig {
    /// Spacing that keeps under one request per second.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1100);
    /// Attempts per spot by default.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            delay: Self::DEFAULT_DELAY,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Counts from one enrichment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnrichReport {
    /// Spots looked up.
    pub requested: usize,
    /// Spots that received a road name.
    pub resolved: usize,
    /// Spots that fell back to [`UNKNOWN_ROAD`].
    pub unresolved: usize,
    /// Requests repeated after a retryable failure.
    pub retries: usize,
}

/// Spaces consecutive calls at least `interval` apart.
///
/// The first call never waits.
///
/// # Examples
/// ```
/// use std::time::{Duration, Instant};
/// use hitchspot_core::RateLimiter;
///
/// let mut limiter = RateLimiter::new(Duration::from_millis(5));
/// let started = Instant::now();
/// limiter.wait();
/// limiter.wait();
/// assert!(started.elapsed() >= Duration::from_millis(5));
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    /// Create a limiter with the given spacing.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Block until `interval` has passed since the previous call.
    pub fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if let Some(remaining) = self.interval.checked_sub(elapsed)
                && !remaining.is_zero()
            {
                thread::sleep(remaining);
            }
        }
        self.last = Some(Instant::now());
    }
}

/// Replace placeholder road names with geocoded ones.
///
/// Every record is looked up once per attempt, with requests spaced by
/// `config.delay`. Retryable failures are repeated up to
/// `config.max_attempts`; other failures, exhausted retries and empty
/// answers write [`UNKNOWN_ROAD`] and log a warning.
pub fn enrich_road_names(
    records: &mut [SpotRecord],
    geocoder: &dyn ReverseGeocoder,
    config: &EnrichConfig,
) -> EnrichReport {
    let mut limiter = RateLimiter::new(config.delay);
    let mut report = EnrichReport::default();
    let attempts = config.max_attempts.max(1);

    for record in records.iter_mut() {
        report.requested += 1;
        match lookup(geocoder, record.location(), &mut limiter, attempts, &mut report) {
            Ok(Some(road)) if !road.trim().is_empty() => {
                record.road_name = road.trim().to_owned();
                report.resolved += 1;
            }
            Ok(_) => {
                log::warn!(
                    "No road name found at {:.5}, {:.5}",
                    record.latitude,
                    record.longitude
                );
                record.road_name = UNKNOWN_ROAD.to_owned();
                report.unresolved += 1;
            }
            Err(err) => {
                log::warn!(
                    "Geocoding error at {:.5}, {:.5}: {err}",
                    record.latitude,
                    record.longitude
                );
                record.road_name = UNKNOWN_ROAD.to_owned();
                report.unresolved += 1;
            }
        }
    }

    log::info!(
        "Geocoded {} spots: {} resolved, {} unknown",
        report.requested,
        report.resolved,
        report.unresolved
    );
    report
}

fn lookup(
    geocoder: &dyn ReverseGeocoder,
    location: Coord<f64>,
    limiter: &mut RateLimiter,
    attempts: u32,
    report: &mut EnrichReport,
) -> Result<Option<String>, GeocodeError> {
    let mut attempt = 1;
    loop {
        limiter.wait();
        match geocoder.reverse(location) {
            Err(err) if err.is_retryable() && attempt < attempts => {
                log::debug!("Retrying geocoding request after attempt {attempt}: {err}");
                report.retries += 1;
                attempt += 1;
            }
            outcome => return outcome,
        }
    }
}
