//! Places error types

use thiserror::Error;

use crate::models::VendorStatus;

/// A geocode request the vendor answered with a non-OK status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({code})")]
pub struct GeocodingError {
    /// Wire status string, e.g. `ZERO_RESULTS`
    pub code: String,
    /// Human-readable explanation
    pub message: String,
    pub status: VendorStatus,
}

impl From<VendorStatus> for GeocodingError {
    fn from(status: VendorStatus) -> Self {
        Self {
            code: status.as_str().to_string(),
            message: status.message().to_string(),
            status,
        }
    }
}

/// Errors that can occur during places operations
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Geocoding returned a non-OK vendor status
    #[error("Geocoding failed: {0}")]
    Geocoding(#[from] GeocodingError),

    /// Autocomplete returned a non-OK vendor status
    #[error("Autocomplete request failed: {status}")]
    Autocomplete {
        /// Vendor status
        status: VendorStatus,
    },

    /// Place details returned a non-OK vendor status
    #[error("Place details request failed: {status}")]
    PlaceDetails {
        /// Vendor status
        status: VendorStatus,
    },

    /// Connection to the places service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the places service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse a response from the places service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// HTTP-level rate limit (429) from the service
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// The request itself is unusable (e.g. empty place id)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The request queue worker is no longer running
    #[error("Request queue closed")]
    QueueClosed,
}

impl PlacesError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Geocoding(GeocodingError { status, .. })
            | Self::Autocomplete { status }
            | Self::PlaceDetails { status } => {
                matches!(status, VendorStatus::OverQueryLimit | VendorStatus::UnknownError)
            },
            Self::ConnectionFailed(_)
            | Self::RequestFailed(_)
            | Self::Timeout { .. }
            | Self::RateLimitExceeded { .. } => true,
            Self::ParseError(_)
            | Self::InvalidRequest(_)
            | Self::ConfigurationError(_)
            | Self::QueueClosed => false,
        }
    }

    /// Vendor status behind this error, if the vendor produced one
    #[must_use]
    pub const fn vendor_status(&self) -> Option<VendorStatus> {
        match self {
            Self::Geocoding(GeocodingError { status, .. })
            | Self::Autocomplete { status }
            | Self::PlaceDetails { status } => Some(*status),
            _ => None,
        }
    }
}
