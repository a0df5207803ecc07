//! Places data models
//!
//! Normalized request and result types handed to callers. These types are
//! vendor-neutral; the mapping from the Maps Platform wire format lives in
//! the `google` adapter module.

use std::fmt;

use domain::Location;
use serde::{Deserialize, Serialize};

/// Status code reported by the vendor for a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VendorStatus {
    Ok,
    ZeroResults,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    UnknownError,
    NotFound,
    /// Any status string this crate does not know about
    #[serde(other)]
    Unrecognized,
}

impl VendorStatus {
    /// Wire representation of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::ZeroResults => "ZERO_RESULTS",
            Self::OverQueryLimit => "OVER_QUERY_LIMIT",
            Self::RequestDenied => "REQUEST_DENIED",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Unrecognized => "UNRECOGNIZED",
        }
    }

    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Human-readable explanation suitable for showing to a user
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Ok => "Request succeeded",
            Self::ZeroResults => "No results found for this search",
            Self::OverQueryLimit => "Query limit exceeded, please try again later",
            Self::RequestDenied => "The request was denied by the geocoding service",
            Self::InvalidRequest => "The request was invalid, check the search parameters",
            Self::NotFound => "The requested place could not be found",
            Self::UnknownError | Self::Unrecognized => {
                "Unknown error from the geocoding service, please try again"
            },
        }
    }
}

impl fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Requests
// ============================================================================

/// What a geocode request resolves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeocodeTarget {
    /// Forward geocoding of a free-text address
    Address(String),
    /// Reverse geocoding of a point
    Location(Location),
    /// Lookup by vendor place identifier
    PlaceId(String),
}

impl GeocodeTarget {
    /// Short tag used in cache keys and logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::Location(_) => "location",
            Self::PlaceId(_) => "placeId",
        }
    }

    /// Value normalized so equivalent requests compare equal
    ///
    /// Addresses are trimmed and lowercased, points are rendered with six
    /// decimals (~0.1m), place ids are kept verbatim.
    #[must_use]
    pub fn normalized_value(&self) -> String {
        match self {
            Self::Address(address) => address.trim().to_lowercase(),
            Self::Location(location) => format!("{:.6},{:.6}", location.lat(), location.lng()),
            Self::PlaceId(place_id) => place_id.clone(),
        }
    }
}

/// A geocode request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeRequest {
    pub target: GeocodeTarget,
    /// Region bias; falls back to the configured default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Response language; falls back to the configured default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl GeocodeRequest {
    #[must_use]
    pub fn address(address: impl Into<String>) -> Self {
        Self::new(GeocodeTarget::Address(address.into()))
    }

    #[must_use]
    pub fn location(location: Location) -> Self {
        Self::new(GeocodeTarget::Location(location))
    }

    #[must_use]
    pub fn place_id(place_id: impl Into<String>) -> Self {
        Self::new(GeocodeTarget::PlaceId(place_id.into()))
    }

    const fn new(target: GeocodeTarget) -> Self {
        Self {
            target,
            region: None,
            language: None,
        }
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// An autocomplete (type-ahead) request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteRequest {
    /// Text typed so far
    pub input: String,
    /// Bias results towards this point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Bias radius around `location`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<u32>,
    /// Point from which `distance_meters` is measured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Location>,
    /// Restrict to these place types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    /// Restrict to a country (ISO 3166-1 alpha-2)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Billing session token grouping keystrokes of one search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl AutocompleteRequest {
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_location_bias(mut self, location: Location, radius_meters: u32) -> Self {
        self.location = Some(location);
        self.radius_meters = Some(radius_meters);
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Location) -> Self {
        self.origin = Some(origin);
        self
    }

    #[must_use]
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

// ============================================================================
// Results
// ============================================================================

/// One component of a structured address (street number, locality, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    pub types: Vec<String>,
}

/// Recommended bounding box for displaying a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub northeast: Location,
    pub southwest: Location,
}

impl Viewport {
    /// Check whether a point falls inside the box
    ///
    /// Handles boxes that cross the antimeridian (southwest lng > northeast lng).
    #[must_use]
    pub fn contains(&self, location: &Location) -> bool {
        let lat_ok = (self.southwest.lat()..=self.northeast.lat()).contains(&location.lat());
        let (west, east) = (self.southwest.lng(), self.northeast.lng());
        let lng_ok = if west <= east {
            (west..=east).contains(&location.lng())
        } else {
            location.lng() >= west || location.lng() <= east
        };
        lat_ok && lng_ok
    }
}

/// A geocoding result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodingResult {
    pub location: Location,
    pub formatted_address: String,
    pub address_components: Vec<AddressComponent>,
    pub place_id: String,
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

impl GeocodingResult {
    /// Find the first address component carrying the given type
    #[must_use]
    pub fn component(&self, component_type: &str) -> Option<&AddressComponent> {
        self.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == component_type))
    }
}

/// A matched substring of a prediction's description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionTerm {
    pub offset: usize,
    pub value: String,
}

/// An autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompletePrediction {
    pub place_id: String,
    pub description: String,
    pub main_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
    pub terms: Vec<PredictionTerm>,
    pub types: Vec<String>,
    /// Straight-line distance from the request origin, when one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<u32>,
}

/// A photo reference attached to a place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePhoto {
    pub reference: String,
    pub width: u32,
    pub height: u32,
    pub attributions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    pub weekday_text: Vec<String>,
}

/// Full details for a single place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ratings_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<PlacePhoto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<OpeningHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vicinity: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lat: f64, lng: f64) -> Location {
        Location::new(lat, lng).unwrap()
    }

    #[test]
    fn test_vendor_status_parsing() {
        let status: VendorStatus = serde_json::from_str(r#""ZERO_RESULTS""#).unwrap();
        assert_eq!(status, VendorStatus::ZeroResults);

        let status: VendorStatus = serde_json::from_str(r#""OVER_DAILY_LIMIT""#).unwrap();
        assert_eq!(status, VendorStatus::Unrecognized);

        assert!(VendorStatus::Ok.is_ok());
        assert!(!VendorStatus::NotFound.is_ok());
    }

    #[test]
    fn test_vendor_status_display() {
        assert_eq!(VendorStatus::OverQueryLimit.to_string(), "OVER_QUERY_LIMIT");
        assert!(VendorStatus::ZeroResults.message().contains("No results"));
    }

    #[test]
    fn test_geocode_target_normalization() {
        let target = GeocodeTarget::Address("  Parque Lleras, Medellín ".to_string());
        assert_eq!(target.kind(), "address");
        assert_eq!(target.normalized_value(), "parque lleras, medellín");

        let target = GeocodeTarget::Location(loc(6.2442, -75.5812));
        assert_eq!(target.kind(), "location");
        assert_eq!(target.normalized_value(), "6.244200,-75.581200");

        let target = GeocodeTarget::PlaceId("ChIJAbC".to_string());
        assert_eq!(target.normalized_value(), "ChIJAbC");
    }

    #[test]
    fn test_geocode_request_builders() {
        let req = GeocodeRequest::address("Bogotá")
            .with_region("CO")
            .with_language("es");
        assert_eq!(req.region.as_deref(), Some("CO"));
        assert_eq!(req.language.as_deref(), Some("es"));
        assert!(matches!(req.target, GeocodeTarget::Address(_)));
    }

    #[test]
    fn test_autocomplete_request_serialization_skips_empty() {
        let req = AutocompleteRequest::new("parque");
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"input":"parque"}"#);

        let req = req.with_types(["restaurant"]).with_country("co");
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"types\":[\"restaurant\"]"));
        assert!(json.contains("\"country\":\"co\""));
    }

    #[test]
    fn test_viewport_contains() {
        let viewport = Viewport {
            northeast: loc(6.4, -75.4),
            southwest: loc(6.1, -75.7),
        };
        assert!(viewport.contains(&loc(6.2442, -75.5812)));
        assert!(!viewport.contains(&loc(4.711, -74.0721)));
    }

    #[test]
    fn test_viewport_across_antimeridian() {
        let viewport = Viewport {
            northeast: loc(-15.0, -178.0),
            southwest: loc(-20.0, 177.0),
        };
        assert!(viewport.contains(&loc(-17.7, 179.0)));
        assert!(viewport.contains(&loc(-17.7, -179.5)));
        assert!(!viewport.contains(&loc(-17.7, 170.0)));
    }

    #[test]
    fn test_result_component_lookup() {
        let result = GeocodingResult {
            location: loc(6.2442, -75.5812),
            formatted_address: "Medellín, Antioquia, Colombia".to_string(),
            address_components: vec![AddressComponent {
                long_name: "Colombia".to_string(),
                short_name: "CO".to_string(),
                types: vec!["country".to_string(), "political".to_string()],
            }],
            place_id: "ChIJ".to_string(),
            types: vec!["locality".to_string()],
            viewport: None,
        };
        assert_eq!(
            result.component("country").map(|c| c.short_name.as_str()),
            Some("CO")
        );
        assert!(result.component("route").is_none());
    }
}
