//! Geocoding and places integration
//!
//! Forward/reverse geocoding, type-ahead place predictions and place details
//! against the [Google Maps Platform](https://developers.google.com/maps/documentation/places/web-service)
//! web services, with result caching and client-side rate limiting.
//!
//! # Architecture
//!
//! [`PlacesClient`] is the caller-facing interface, implemented by
//! [`CachedPlacesClient`]. The client consults a [`PlacesCache`] first and
//! sends misses through a [`RequestQueue`] that serializes vendor calls under
//! a per-second budget. Vendor calls go through the [`PlacesBackend`] trait;
//! [`GoogleMapsBackend`] maps the Google JSON shapes into the normalized
//! models. The [`ranking`] module orders and filters predictions for display.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_places::{CachedPlacesClient, GeocodeRequest, PlacesClient, PlacesConfig};
//!
//! let config = PlacesConfig {
//!     api_key: std::env::var("MAPS_API_KEY")?,
//!     ..PlacesConfig::default()
//! };
//! let client = CachedPlacesClient::new(&config)?;
//!
//! let results = client
//!     .geocode(GeocodeRequest::address("Parque Lleras, Medellín").with_region("CO"))
//!     .await?;
//! ```

mod backend;
mod cache;
mod client;
mod config;
mod error;
mod google;
mod models;
mod queue;
pub mod ranking;

pub use backend::{PlacesBackend, VendorReply};
pub use cache::{CacheStats, PlacesCache, TableStats};
pub use client::{CachedPlacesClient, PlacesClient};
pub use config::PlacesConfig;
pub use error::{GeocodingError, PlacesError};
pub use google::{DEFAULT_DETAIL_FIELDS, GoogleMapsBackend};
pub use models::{
    AddressComponent, AutocompletePrediction, AutocompleteRequest, GeocodeRequest, GeocodeTarget,
    GeocodingResult, OpeningHours, PlaceDetails, PlacePhoto, PredictionTerm, VendorStatus,
    Viewport,
};
pub use queue::RequestQueue;
pub use ranking::{
    PlaceCategory, PredictionFilters, categorize, filter_predictions, group_by_category,
    sort_results_by_relevance,
};
