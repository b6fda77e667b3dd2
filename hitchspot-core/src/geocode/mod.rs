//! Resolve road names for mapped spots.
//!
//! The `ReverseGeocoder` trait abstracts a lookup from a coordinate to the
//! name of the nearest road. [`enrich_road_names`] runs it over a mapped
//! batch at a bounded request rate, retrying transient failures and
//! falling back to [`UNKNOWN_ROAD`] so a bad answer never aborts the batch.

mod enrich;
mod error;

use geo::Coord;

pub use enrich::{EnrichConfig, EnrichReport, RateLimiter, UNKNOWN_ROAD, enrich_road_names};
pub use error::GeocodeError;

/// Look up the road nearest to a coordinate.
///
/// `Ok(None)` means the service answered but named no road.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use hitchspot_core::{GeocodeError, ReverseGeocoder};
///
/// struct Motorway;
///
/// impl ReverseGeocoder for Motorway {
///     fn reverse(&self, _location: Coord<f64>) -> Result<Option<String>, GeocodeError> {
///         Ok(Some("A6".to_owned()))
///     }
/// }
///
/// let road = Motorway.reverse(Coord { x: 2.35, y: 48.85 })?;
/// assert_eq!(road.as_deref(), Some("A6"));
/// # Ok::<(), GeocodeError>(())
/// ```
pub trait ReverseGeocoder {
    /// Return the road name at `location` (`x = longitude`, `y = latitude`).
    fn reverse(&self, location: Coord<f64>) -> Result<Option<String>, GeocodeError>;
}

impl<G: ReverseGeocoder + ?Sized> ReverseGeocoder for &G {
    fn reverse(&self, location: Coord<f64>) -> Result<Option<String>, GeocodeError> {
        (**self).reverse(location)
    }
}
