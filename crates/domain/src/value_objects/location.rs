//! Geographic location value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A point on the map, optionally annotated with address information
///
/// Coordinates are always within range: latitude in [-90, 90] and
/// longitude in [-180, 180]. The only ways to obtain a `Location` are the
/// validating constructor and deserialization (which is also validated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawLocation")]
pub struct Location {
    /// Latitude in degrees (-90 to 90)
    lat: f64,
    /// Longitude in degrees (-180 to 180)
    lng: f64,
    /// Short address or label
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    /// Vendor place identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    place_id: Option<String>,
    /// Full, vendor-formatted address
    #[serde(skip_serializing_if = "Option::is_none")]
    formatted_address: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocation {
    lat: f64,
    lng: f64,
    address: Option<String>,
    place_id: Option<String>,
    formatted_address: Option<String>,
}

impl TryFrom<RawLocation> for Location {
    type Error = DomainError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        let mut location = Self::new(raw.lat, raw.lng)?;
        location.address = raw.address;
        location.place_id = raw.place_id;
        location.formatted_address = raw.formatted_address;
        Ok(location)
    }
}

/// Check that a coordinate pair is a usable map position
///
/// Range check plus NaN rejection; NaN fails both range comparisons.
#[must_use]
pub fn is_valid_coordinate(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

impl Location {
    /// Create a new location with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if latitude is not in
    /// [-90, 90], longitude is not in [-180, 180], or either is NaN.
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        if !is_valid_coordinate(lat, lng) {
            return Err(DomainError::InvalidCoordinates { lat, lng });
        }
        Ok(Self {
            lat,
            lng,
            address: None,
            place_id: None,
            formatted_address: None,
        })
    }

    /// Attach a short address
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Attach the vendor place identifier
    #[must_use]
    pub fn with_place_id(mut self, place_id: impl Into<String>) -> Self {
        self.place_id = Some(place_id.into());
        self
    }

    /// Attach the vendor-formatted address
    #[must_use]
    pub fn with_formatted_address(mut self, formatted_address: impl Into<String>) -> Self {
        self.formatted_address = Some(formatted_address.into());
        self
    }

    /// Get the latitude
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Get the longitude
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    #[must_use]
    pub fn place_id(&self) -> Option<&str> {
        self.place_id.as_deref()
    }

    #[must_use]
    pub fn formatted_address(&self) -> Option<&str> {
        self.formatted_address.as_deref()
    }

}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}
