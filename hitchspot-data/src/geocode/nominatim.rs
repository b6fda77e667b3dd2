//! Response types for the Nominatim reverse endpoint.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Reverse/>

use serde::Deserialize;

/// Body returned by `GET /reverse?format=json`.
///
/// Nominatim answers coordinates it cannot resolve with HTTP 200 and an
/// `error` member instead of an address.
#[derive(Debug, Deserialize)]
pub struct ReverseResponse {
    /// Structured address of the matched object.
    #[serde(default)]
    pub address: Option<Address>,
    /// Failure description, e.g. `"Unable to geocode"`.
    #[serde(default)]
    pub error: Option<String>,
}

/// The address members used to name a road.
#[derive(Debug, Default, Deserialize)]
pub struct Address {
    /// Named road.
    pub road: Option<String>,
    /// Pedestrian way.
    pub pedestrian: Option<String>,
    /// Highway reference.
    pub highway: Option<String>,
}

impl ReverseResponse {
    /// First non-blank of `road`, `pedestrian` and `highway`.
    #[must_use]
    pub fn road_name(&self) -> Option<String> {
        let address = self.address.as_ref()?;
        [&address.road, &address.pedestrian, &address.highway]
            .into_iter()
            .flatten()
            .map(|name| name.trim())
            .find(|name| !name.is_empty())
            .map(str::to_owned)
    }
}
