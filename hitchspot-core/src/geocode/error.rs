use thiserror::Error;

/// Errors from [`crate::geocode::ReverseGeocoder::reverse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The request could not be sent or the connection dropped.
    #[error("geocoding request failed: {message}")]
    Network {
        /// Transport error description.
        message: String,
    },
    /// The service did not answer in time.
    #[error("geocoding request timed out")]
    Timeout,
    /// The service answered with a non-success status.
    #[error("geocoding service returned HTTP {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },
    /// The response body was not understood.
    #[error("failed to parse geocoding response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
}

impl GeocodeError {
    /// Report whether repeating the request may succeed.
    ///
    /// Transport failures, timeouts, server errors and rate limiting are
    /// retryable; client errors and malformed bodies are not.
    ///
    /// # Examples
    /// ```
    /// use hitchspot_core::GeocodeError;
    ///
    /// assert!(GeocodeError::Timeout.is_retryable());
    /// assert!(GeocodeError::Http { status: 429 }.is_retryable());
    /// assert!(!GeocodeError::Http { status: 404 }.is_retryable());
    /// ```
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout => true,
            Self::Http { status } => *status == 429 || *status >= 500,
            Self::Parse { .. } => false,
        }
    }
}
