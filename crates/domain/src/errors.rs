//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Latitude or longitude outside the valid range (or NaN)
    #[error("Invalid coordinates: {lat}, {lng} (latitude must be -90 to 90, longitude -180 to 180)")]
    InvalidCoordinates { lat: f64, lng: f64 },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
