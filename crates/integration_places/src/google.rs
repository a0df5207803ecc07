//! Google Maps Platform web-service backend
//!
//! Talks to the Geocoding, Places Autocomplete and Place Details JSON
//! endpoints. All wire field names (`place_id`, `structured_formatting`,
//! `geometry`, ...) are confined to this module; callers only see the
//! normalized models.

use std::time::Duration;

use async_trait::async_trait;
use domain::Location;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::backend::{PlacesBackend, VendorReply};
use crate::config::PlacesConfig;
use crate::error::PlacesError;
use crate::models::{
    AddressComponent, AutocompletePrediction, AutocompleteRequest, GeocodeRequest, GeocodeTarget,
    GeocodingResult, OpeningHours, PlaceDetails, PlacePhoto, PredictionTerm, VendorStatus,
    Viewport,
};

const GEOCODE_PATH: &str = "maps/api/geocode/json";
const AUTOCOMPLETE_PATH: &str = "maps/api/place/autocomplete/json";
const DETAILS_PATH: &str = "maps/api/place/details/json";

/// Fields requested from Place Details when the caller asks for none
pub const DEFAULT_DETAIL_FIELDS: &[&str] = &[
    "place_id",
    "name",
    "formatted_address",
    "geometry",
    "formatted_phone_number",
    "website",
    "rating",
    "user_ratings_total",
    "photos",
    "opening_hours",
    "price_level",
    "types",
    "vicinity",
];

/// Backend for the Google Maps Platform web services
///
/// Each service endpoint is resolved on first use and reused afterwards.
#[derive(Debug)]
pub struct GoogleMapsBackend {
    client: Client,
    config: PlacesConfig,
    geocoder: OnceCell<Url>,
    autocomplete: OnceCell<Url>,
    details: OnceCell<Url>,
}

impl GoogleMapsBackend {
    /// Create a new backend
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &PlacesConfig) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("maps-places/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlacesError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            geocoder: OnceCell::new(),
            autocomplete: OnceCell::new(),
            details: OnceCell::new(),
        })
    }

    /// Resolve (once) the endpoint URL of a service
    async fn endpoint<'a>(
        &self,
        cell: &'a OnceCell<Url>,
        service: &'static str,
        path: &'static str,
    ) -> Result<&'a Url, PlacesError> {
        cell.get_or_try_init(|| async move {
            let mut base = self.config.base_url.clone();
            if !base.ends_with('/') {
                base.push('/');
            }
            let url = Url::parse(&base)
                .and_then(|base| base.join(path))
                .map_err(|e| {
                    PlacesError::ConfigurationError(format!("invalid base_url '{base}': {e}"))
                })?;
            debug!(service, url = %url, "Initialized places service");
            Ok(url)
        })
        .await
    }

    /// Issue a GET and decode the JSON body
    async fn fetch<R: DeserializeOwned>(
        &self,
        url: &Url,
        params: &[(&str, String)],
    ) -> Result<R, PlacesError> {
        let response = self
            .client
            .get(url.clone())
            .query(params)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PlacesError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    PlacesError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(PlacesError::RateLimitExceeded { retry_after_secs });
        }

        if !status.is_success() {
            return Err(PlacesError::RequestFailed(format!("HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| PlacesError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl PlacesBackend for GoogleMapsBackend {
    #[instrument(skip(self, request), fields(kind = request.target.kind()))]
    async fn geocode(
        &self,
        request: &GeocodeRequest,
    ) -> Result<VendorReply<Vec<GeocodingResult>>, PlacesError> {
        let url = self.endpoint(&self.geocoder, "geocoder", GEOCODE_PATH).await?;

        let mut params = vec![match &request.target {
            GeocodeTarget::Address(address) => ("address", address.trim().to_string()),
            GeocodeTarget::Location(location) => ("latlng", lat_lng(location)),
            GeocodeTarget::PlaceId(place_id) => ("place_id", place_id.clone()),
        }];
        if let Some(region) = &request.region {
            params.push(("region", region.to_lowercase()));
        }
        if let Some(language) = &request.language {
            params.push(("language", language.clone()));
        }

        let raw: RawGeocodeResponse = self.fetch(url, &params).await?;
        Ok(map_geocode_response(raw))
    }

    #[instrument(skip(self, request), fields(input = %request.input))]
    async fn autocomplete(
        &self,
        request: &AutocompleteRequest,
    ) -> Result<VendorReply<Vec<AutocompletePrediction>>, PlacesError> {
        let url = self
            .endpoint(&self.autocomplete, "autocomplete", AUTOCOMPLETE_PATH)
            .await?;

        let raw: RawAutocompleteResponse = self.fetch(url, &autocomplete_params(request)).await?;
        Ok(map_autocomplete_response(raw))
    }

    #[instrument(skip(self, fields))]
    async fn place_details(
        &self,
        place_id: &str,
        fields: &[String],
        language: &str,
    ) -> Result<VendorReply<Option<PlaceDetails>>, PlacesError> {
        let url = self.endpoint(&self.details, "details", DETAILS_PATH).await?;

        let fields = if fields.is_empty() {
            DEFAULT_DETAIL_FIELDS.join(",")
        } else {
            fields.join(",")
        };
        let params = [
            ("place_id", place_id.to_string()),
            ("fields", fields),
            ("language", language.to_string()),
        ];

        let raw: RawDetailsResponse = self.fetch(url, &params).await?;
        map_details_response(raw)
    }
}

fn lat_lng(location: &Location) -> String {
    format!("{},{}", location.lat(), location.lng())
}

fn autocomplete_params(request: &AutocompleteRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![("input", request.input.clone())];

    if let Some(location) = &request.location {
        params.push(("location", lat_lng(location)));
        if let Some(radius) = request.radius_meters {
            params.push(("radius", radius.to_string()));
        }
    }
    if let Some(origin) = &request.origin {
        params.push(("origin", lat_lng(origin)));
    }
    if !request.types.is_empty() {
        params.push(("types", request.types.join("|")));
    }
    if let Some(country) = &request.country {
        params.push(("components", format!("country:{}", country.to_lowercase())));
    }
    if let Some(language) = &request.language {
        params.push(("language", language.clone()));
    }
    if let Some(token) = &request.session_token {
        params.push(("sessiontoken", token.clone()));
    }

    params
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

impl RawLatLng {
    fn to_location(&self) -> Option<Location> {
        Location::new(self.lat, self.lng).ok()
    }
}

#[derive(Debug, Deserialize)]
struct RawViewport {
    northeast: RawLatLng,
    southwest: RawLatLng,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    location: RawLatLng,
    viewport: Option<RawViewport>,
}

#[derive(Debug, Deserialize)]
struct RawAddressComponent {
    long_name: String,
    short_name: String,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawGeocodeResult {
    formatted_address: String,
    place_id: String,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    address_components: Vec<RawAddressComponent>,
    geometry: RawGeometry,
}

#[derive(Debug, Deserialize)]
struct RawGeocodeResponse {
    status: VendorStatus,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<RawGeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct RawStructuredFormatting {
    main_text: String,
    secondary_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTerm {
    offset: usize,
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawPrediction {
    description: String,
    place_id: String,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    terms: Vec<RawTerm>,
    structured_formatting: Option<RawStructuredFormatting>,
    distance_meters: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawAutocompleteResponse {
    status: VendorStatus,
    error_message: Option<String>,
    #[serde(default)]
    predictions: Vec<RawPrediction>,
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    photo_reference: String,
    width: u32,
    height: u32,
    #[serde(default)]
    html_attributions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawOpeningHours {
    open_now: Option<bool>,
    #[serde(default)]
    weekday_text: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    place_id: Option<String>,
    name: Option<String>,
    formatted_address: Option<String>,
    vicinity: Option<String>,
    geometry: Option<RawGeometry>,
    formatted_phone_number: Option<String>,
    international_phone_number: Option<String>,
    website: Option<String>,
    rating: Option<f32>,
    user_ratings_total: Option<u32>,
    #[serde(default)]
    photos: Vec<RawPhoto>,
    opening_hours: Option<RawOpeningHours>,
    price_level: Option<u8>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawDetailsResponse {
    status: VendorStatus,
    error_message: Option<String>,
    result: Option<RawPlace>,
}

// ============================================================================
// Mapping
// ============================================================================

fn map_geocode_response(raw: RawGeocodeResponse) -> VendorReply<Vec<GeocodingResult>> {
    let results = raw
        .results
        .into_iter()
        .filter_map(|result| {
            let mapped = map_geocode_result(result);
            if mapped.is_none() {
                warn!("Skipping geocoding result with out-of-range coordinates");
            }
            mapped
        })
        .collect();

    VendorReply {
        status: raw.status,
        error_message: raw.error_message,
        payload: results,
    }
}

fn map_geocode_result(raw: RawGeocodeResult) -> Option<GeocodingResult> {
    let location = raw
        .geometry
        .location
        .to_location()?
        .with_place_id(raw.place_id.clone())
        .with_formatted_address(raw.formatted_address.clone());

    let viewport = raw.geometry.viewport.and_then(|v| {
        Some(Viewport {
            northeast: v.northeast.to_location()?,
            southwest: v.southwest.to_location()?,
        })
    });

    Some(GeocodingResult {
        location,
        formatted_address: raw.formatted_address,
        address_components: raw
            .address_components
            .into_iter()
            .map(|c| AddressComponent {
                long_name: c.long_name,
                short_name: c.short_name,
                types: c.types,
            })
            .collect(),
        place_id: raw.place_id,
        types: raw.types,
        viewport,
    })
}

fn map_autocomplete_response(
    raw: RawAutocompleteResponse,
) -> VendorReply<Vec<AutocompletePrediction>> {
    VendorReply {
        status: raw.status,
        error_message: raw.error_message,
        payload: raw.predictions.into_iter().map(map_prediction).collect(),
    }
}

fn map_prediction(raw: RawPrediction) -> AutocompletePrediction {
    // Without structured formatting the first term is the best main text
    let (main_text, secondary_text) = match raw.structured_formatting {
        Some(sf) => (sf.main_text, sf.secondary_text),
        None => {
            let main = raw
                .terms
                .first()
                .map_or_else(|| raw.description.clone(), |t| t.value.clone());
            (main, None)
        },
    };

    AutocompletePrediction {
        place_id: raw.place_id,
        description: raw.description,
        main_text,
        secondary_text,
        terms: raw
            .terms
            .into_iter()
            .map(|t| PredictionTerm {
                offset: t.offset,
                value: t.value,
            })
            .collect(),
        types: raw.types,
        distance_meters: raw.distance_meters,
    }
}

fn map_details_response(
    raw: RawDetailsResponse,
) -> Result<VendorReply<Option<PlaceDetails>>, PlacesError> {
    let details = match raw.result {
        Some(place) if raw.status.is_ok() => Some(map_place(place)?),
        _ => None,
    };

    Ok(VendorReply {
        status: raw.status,
        error_message: raw.error_message,
        payload: details,
    })
}

fn map_place(raw: RawPlace) -> Result<PlaceDetails, PlacesError> {
    let place_id = raw
        .place_id
        .ok_or_else(|| PlacesError::ParseError("place details without place_id".to_string()))?;

    let location = raw
        .geometry
        .as_ref()
        .and_then(|g| g.location.to_location())
        .ok_or_else(|| {
            PlacesError::ParseError(format!("place {place_id} has no valid geometry"))
        })?;

    let address = raw
        .formatted_address
        .clone()
        .or_else(|| raw.vicinity.clone())
        .unwrap_or_default();
    let name = raw.name.unwrap_or_else(|| address.clone());

    let location = location
        .with_place_id(place_id.clone())
        .with_address(name.clone())
        .with_formatted_address(address.clone());

    Ok(PlaceDetails {
        place_id,
        name,
        address,
        location,
        phone_number: raw.formatted_phone_number.or(raw.international_phone_number),
        website: raw.website,
        rating: raw.rating,
        user_ratings_total: raw.user_ratings_total,
        photos: raw
            .photos
            .into_iter()
            .map(|p| PlacePhoto {
                reference: p.photo_reference,
                width: p.width,
                height: p.height,
                attributions: p.html_attributions,
            })
            .collect(),
        opening_hours: raw.opening_hours.map(|h| OpeningHours {
            open_now: h.open_now,
            weekday_text: h.weekday_text,
        }),
        price_level: raw.price_level,
        types: raw.types,
        vicinity: raw.vicinity,
    })
}
