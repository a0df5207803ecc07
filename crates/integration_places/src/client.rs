//! Places client
//!
//! [`CachedPlacesClient`] is the single entry point for geocoding,
//! autocomplete and place details. Every call checks its cache first; only
//! misses reach the vendor, and those are funneled through the rate-limited
//! [`RequestQueue`].

use std::sync::Arc;

use async_trait::async_trait;
use domain::Location;
use tracing::{debug, instrument, warn};

use crate::backend::PlacesBackend;
use crate::cache::{CacheStats, PlacesCache, autocomplete_key, details_key, geocode_key};
use crate::config::PlacesConfig;
use crate::error::{GeocodingError, PlacesError};
use crate::google::GoogleMapsBackend;
use crate::models::{
    AutocompletePrediction, AutocompleteRequest, GeocodeRequest, GeocodeTarget, GeocodingResult,
    PlaceDetails, VendorStatus,
};
use crate::queue::RequestQueue;

/// Trait for geocoding / places clients
#[async_trait]
pub trait PlacesClient: Send + Sync {
    /// Resolve an address, place id or point into geocoding results
    async fn geocode(&self, request: GeocodeRequest) -> Result<Vec<GeocodingResult>, PlacesError>;

    /// Resolve a point into addresses
    async fn reverse_geocode(&self, location: Location)
    -> Result<Vec<GeocodingResult>, PlacesError>;

    /// Type-ahead suggestions for partial input
    async fn autocomplete_predictions(
        &self,
        request: AutocompleteRequest,
    ) -> Result<Vec<AutocompletePrediction>, PlacesError>;

    /// Full details for a place, optionally restricted to `fields`
    async fn place_details(
        &self,
        place_id: &str,
        fields: &[String],
    ) -> Result<PlaceDetails, PlacesError>;

    /// Drop every cached result
    fn clear_cache(&self);
}

/// Cache-first places client over a vendor backend
#[derive(Debug)]
pub struct CachedPlacesClient<B> {
    backend: Arc<B>,
    queue: RequestQueue,
    cache: PlacesCache,
    region: String,
    language: String,
}

impl CachedPlacesClient<GoogleMapsBackend> {
    /// Create a client backed by the Google Maps Platform web services
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &PlacesConfig) -> Result<Self, PlacesError> {
        config.validate().map_err(PlacesError::ConfigurationError)?;
        let backend = GoogleMapsBackend::new(config)?;
        Ok(Self::with_backend(backend, config))
    }
}

impl<B: PlacesBackend> CachedPlacesClient<B> {
    /// Create a client over an arbitrary backend
    #[must_use]
    pub fn with_backend(backend: B, config: &PlacesConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            queue: RequestQueue::new(config.max_requests_per_second),
            cache: PlacesCache::new(config),
            region: config.region.clone(),
            language: config.language.clone(),
        }
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Vendor calls waiting in the queue
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.queue.pending()
    }
}

#[async_trait]
impl<B: PlacesBackend> PlacesClient for CachedPlacesClient<B> {
    #[instrument(skip(self, request), fields(kind = request.target.kind()))]
    async fn geocode(&self, request: GeocodeRequest) -> Result<Vec<GeocodingResult>, PlacesError> {
        match &request.target {
            GeocodeTarget::Address(address) if address.trim().is_empty() => {
                return Err(PlacesError::InvalidRequest("address is empty".to_string()));
            },
            GeocodeTarget::PlaceId(place_id) if place_id.trim().is_empty() => {
                return Err(PlacesError::InvalidRequest("place id is empty".to_string()));
            },
            _ => {},
        }

        let region = request.region.clone().unwrap_or_else(|| self.region.clone());
        let language = request
            .language
            .clone()
            .unwrap_or_else(|| self.language.clone());
        let key = geocode_key(&request.target, &region, &language);

        if let Some(cached) = self.cache.get_geocode(&key).await {
            return Ok(vec![cached]);
        }

        let request = GeocodeRequest {
            region: Some(region),
            language: Some(language),
            ..request
        };
        let backend = Arc::clone(&self.backend);
        let results = self
            .queue
            .schedule("geocode", move || async move {
                let reply = backend.geocode(&request).await?;
                log_vendor_message("geocode", reply.status, reply.error_message.as_deref());
                if reply.status.is_ok() {
                    Ok(reply.payload)
                } else {
                    Err(GeocodingError::from(reply.status).into())
                }
            })
            .await?;

        if let Some(first) = results.first() {
            self.cache.insert_geocode(key, first.clone()).await;
        }
        debug!(count = results.len(), "Geocoded");
        Ok(results)
    }

    #[instrument(skip(self, location), fields(location = %location))]
    async fn reverse_geocode(
        &self,
        location: Location,
    ) -> Result<Vec<GeocodingResult>, PlacesError> {
        self.geocode(GeocodeRequest::location(location)).await
    }

    #[instrument(skip(self, request), fields(input = %request.input))]
    async fn autocomplete_predictions(
        &self,
        request: AutocompleteRequest,
    ) -> Result<Vec<AutocompletePrediction>, PlacesError> {
        if request.input.trim().is_empty() {
            return Ok(Vec::new());
        }

        let request = AutocompleteRequest {
            language: request.language.or_else(|| Some(self.language.clone())),
            ..request
        };
        let key = autocomplete_key(&request);

        if let Some(cached) = self.cache.get_predictions(&key).await {
            return Ok(cached);
        }

        let backend = Arc::clone(&self.backend);
        let predictions = self
            .queue
            .schedule("autocomplete", move || async move {
                let reply = backend.autocomplete(&request).await?;
                log_vendor_message("autocomplete", reply.status, reply.error_message.as_deref());
                match reply.status {
                    VendorStatus::Ok => Ok(reply.payload),
                    status => Err(PlacesError::Autocomplete { status }),
                }
            })
            .await?;

        self.cache.insert_predictions(key, predictions.clone()).await;
        debug!(count = predictions.len(), "Fetched predictions");
        Ok(predictions)
    }

    #[instrument(skip(self, fields))]
    async fn place_details(
        &self,
        place_id: &str,
        fields: &[String],
    ) -> Result<PlaceDetails, PlacesError> {
        if place_id.trim().is_empty() {
            return Err(PlacesError::InvalidRequest("place id is empty".to_string()));
        }

        let key = details_key(place_id, fields);
        if let Some(cached) = self.cache.get_details(&key).await {
            return Ok(cached);
        }

        let backend = Arc::clone(&self.backend);
        let place_id = place_id.to_string();
        let fields = fields.to_vec();
        let language = self.language.clone();
        let details = self
            .queue
            .schedule("place_details", move || async move {
                let reply = backend.place_details(&place_id, &fields, &language).await?;
                log_vendor_message("place_details", reply.status, reply.error_message.as_deref());
                match (reply.status, reply.payload) {
                    (VendorStatus::Ok, Some(details)) => Ok(details),
                    (VendorStatus::Ok, None) => Err(PlacesError::ParseError(format!(
                        "no details returned for {place_id}"
                    ))),
                    (status, _) => Err(PlacesError::PlaceDetails { status }),
                }
            })
            .await?;

        self.cache.insert_details(key, details.clone()).await;
        Ok(details)
    }

    fn clear_cache(&self) {
        self.cache.clear();
    }
}

fn log_vendor_message(request: &'static str, status: VendorStatus, message: Option<&str>) {
    if let Some(message) = message {
        warn!(request, %status, vendor_message = message, "Vendor reported a problem");
    }
}
