//! Reverse geocoding through a Nominatim-compatible HTTP service.
//!
//! [`NominatimGeocoder`] implements the synchronous
//! [`hitchspot_core::ReverseGeocoder`] trait by blocking on an async
//! `reqwest` call, keeping the enrichment stage in `hitchspot-core` free of
//! any runtime. Pacing and retries are the enrichment stage's concern; the
//! geocoder performs exactly one request per call.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use hitchspot_core::ReverseGeocoder;
//! use hitchspot_data::geocode::{NominatimConfig, NominatimGeocoder};
//!
//! let geocoder = NominatimGeocoder::with_config(NominatimConfig::default())?;
//! let road = geocoder.reverse(Coord { x: 2.35, y: 48.85 })?;
//! println!("{road:?}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod nominatim;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, GeocoderBuildError, NominatimConfig, NominatimGeocoder,
};
