//! Blocking `ReverseGeocoder` over Nominatim's reverse endpoint.

use std::time::Duration;

use geo::Coord;
use hitchspot_core::{GeocodeError, ReverseGeocoder};
use reqwest::Client;
use thiserror::Error;
use url::Url;

use super::nominatim::ReverseResponse;
use crate::blocking::BlockingRuntime;

/// Public OpenStreetMap Nominatim instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// User agent sent with every request, as the usage policy requires.
pub const DEFAULT_USER_AGENT: &str = "hitchspot-importer/0.1";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Road-level detail.
const DEFAULT_ZOOM: u8 = 16;

/// Errors raised while constructing a [`NominatimGeocoder`].
#[derive(Debug, Error)]
pub enum GeocoderBuildError {
    /// The base URL does not parse.
    #[error("invalid geocoder base URL {url:?}")]
    BaseUrl {
        /// Rejected URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`NominatimGeocoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimConfig {
    /// Service root, e.g. `"https://nominatim.openstreetmap.org"`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Nominatim zoom level; 16 resolves to roads.
    pub zoom: u8,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl NominatimConfig {
    /// Configuration for a self-hosted instance.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Reverse geocoder backed by a Nominatim-compatible service.
///
/// The client is async; each call blocks on an owned current-thread Tokio
/// runtime, or on the caller's runtime when invoked inside a multi-threaded
/// one.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: Url,
    zoom: u8,
    runtime: BlockingRuntime,
}

impl std::fmt::Debug for NominatimGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimGeocoder")
            .field("endpoint", &self.endpoint.as_str())
            .field("zoom", &self.zoom)
            .field("runtime", &self.runtime)
            .finish_non_exhaustive()
    }
}

impl NominatimGeocoder {
    /// Geocoder for the public instance with default settings.
    ///
    /// # Errors
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new() -> Result<Self, GeocoderBuildError> {
        Self::with_config(NominatimConfig::default())
    }

    /// Geocoder with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: NominatimConfig) -> Result<Self, GeocoderBuildError> {
        let endpoint = reverse_endpoint(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(GeocoderBuildError::HttpClient)?;
        let runtime = BlockingRuntime::new().map_err(GeocoderBuildError::Runtime)?;
        Ok(Self {
            client,
            endpoint,
            zoom: config.zoom,
            runtime,
        })
    }

    /// URL requested for `location`.
    #[must_use]
    pub fn request_url(&self, location: Coord<f64>) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("lat", &location.y.to_string())
            .append_pair("lon", &location.x.to_string())
            .append_pair("format", "json")
            .append_pair("zoom", &self.zoom.to_string());
        url
    }

    async fn fetch(&self, location: Coord<f64>) -> Result<Option<String>, GeocodeError> {
        let url = self.request_url(location);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err))?;

        let body: ReverseResponse =
            response
                .json()
                .await
                .map_err(|err| GeocodeError::Parse {
                    message: err.to_string(),
                })?;
        if let Some(message) = &body.error {
            log::debug!(
                "Nominatim could not resolve {},{}: {message}",
                location.y,
                location.x
            );
        }
        Ok(body.road_name())
    }
}

fn reverse_endpoint(base_url: &str) -> Result<Url, GeocoderBuildError> {
    let invalid = |source| GeocoderBuildError::BaseUrl {
        url: base_url.to_owned(),
        source,
    };
    let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/'))).map_err(invalid)?;
    base.join("reverse").map_err(invalid)
}

fn convert_reqwest_error(error: &reqwest::Error) -> GeocodeError {
    if error.is_timeout() {
        return GeocodeError::Timeout;
    }
    if let Some(status) = error.status() {
        return GeocodeError::Http {
            status: status.as_u16(),
        };
    }
    if error.is_decode() {
        return GeocodeError::Parse {
            message: error.to_string(),
        };
    }
    GeocodeError::Network {
        message: error.to_string(),
    }
}

impl ReverseGeocoder for NominatimGeocoder {
    fn reverse(&self, location: Coord<f64>) -> Result<Option<String>, GeocodeError> {
        self.runtime
            .block_on(self.fetch(location))
            .map_err(|err| GeocodeError::Network {
                message: err.to_string(),
            })?
    }
}
