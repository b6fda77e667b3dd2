//! Test utilities for geocoders.
//!
//! [`StubGeocoder`] is a deterministic stand-in for [`NominatimGeocoder`]
//! that answers every lookup the same way without touching the network.
//!
//! [`NominatimGeocoder`]: super::NominatimGeocoder

use std::cell::Cell;

use geo::Coord;
use hitchspot_core::{GeocodeError, ReverseGeocoder};

/// Stub `ReverseGeocoder` for testing.
///
/// # Example
///
/// ```
/// use geo::Coord;
/// use hitchspot_core::{GeocodeError, ReverseGeocoder};
/// use hitchspot_data::geocode::test_support::StubGeocoder;
///
/// let geocoder = StubGeocoder::with_road("N7");
/// assert_eq!(geocoder.reverse(Coord { x: 4.8, y: 45.7 }), Ok(Some("N7".to_owned())));
///
/// let failing = StubGeocoder::with_error(GeocodeError::Timeout);
/// assert!(failing.reverse(Coord { x: 4.8, y: 45.7 }).is_err());
/// assert_eq!(failing.calls(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct StubGeocoder {
    response: StubResponse,
    calls: Cell<usize>,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Road(String),
    NoRoad,
    Error(GeocodeError),
}

impl StubGeocoder {
    /// Geocoder naming `road` for every coordinate.
    #[must_use]
    pub fn with_road(road: impl Into<String>) -> Self {
        Self::answering(StubResponse::Road(road.into()))
    }

    /// Geocoder that resolves nothing.
    #[must_use]
    pub const fn without_road() -> Self {
        Self::answering(StubResponse::NoRoad)
    }

    /// Geocoder failing every lookup with `error`.
    #[must_use]
    pub const fn with_error(error: GeocodeError) -> Self {
        Self::answering(StubResponse::Error(error))
    }

    const fn answering(response: StubResponse) -> Self {
        Self {
            response,
            calls: Cell::new(0),
        }
    }

    /// Lookups performed so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ReverseGeocoder for StubGeocoder {
    fn reverse(&self, _location: Coord<f64>) -> Result<Option<String>, GeocodeError> {
        self.calls.set(self.calls.get().saturating_add(1));
        match &self.response {
            StubResponse::Road(road) => Ok(Some(road.clone())),
            StubResponse::NoRoad => Ok(None),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn without_road_answers_none() {
        let geocoder = StubGeocoder::without_road();
        assert_eq!(geocoder.reverse(Coord { x: 0.0, y: 0.0 }), Ok(None));
    }

    #[rstest]
    fn counts_every_lookup() {
        let geocoder = StubGeocoder::with_road("A7");
        for _ in 0..3 {
            assert!(geocoder.reverse(Coord { x: 0.0, y: 0.0 }).is_ok());
        }
        assert_eq!(geocoder.calls(), 3);
    }
}
