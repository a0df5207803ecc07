//! Vendor backend seam
//!
//! A [`PlacesBackend`] performs the raw vendor calls and maps the wire
//! format into the normalized models. It reports the vendor status as data;
//! turning a non-OK status into an error is the client's job.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::PlacesError;
use crate::models::{
    AutocompletePrediction, AutocompleteRequest, GeocodeRequest, GeocodingResult, PlaceDetails,
    VendorStatus,
};

/// A vendor response: status plus whatever payload came with it
#[derive(Debug, Clone, PartialEq)]
pub struct VendorReply<T> {
    pub status: VendorStatus,
    /// Free-form diagnostic text some vendors attach to failures
    pub error_message: Option<String>,
    pub payload: T,
}

impl<T> VendorReply<T> {
    #[must_use]
    pub const fn ok(payload: T) -> Self {
        Self {
            status: VendorStatus::Ok,
            error_message: None,
            payload,
        }
    }
}

impl<T: Default> VendorReply<T> {
    /// A reply carrying only a failure status
    #[must_use]
    pub fn failed(status: VendorStatus) -> Self {
        Self {
            status,
            error_message: None,
            payload: T::default(),
        }
    }
}

/// Raw geocoding/places vendor operations
///
/// Requests arrive with region and language already resolved.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlacesBackend: Send + Sync + 'static {
    /// Geocode an address, point or place id
    async fn geocode(
        &self,
        request: &GeocodeRequest,
    ) -> Result<VendorReply<Vec<GeocodingResult>>, PlacesError>;

    /// Fetch type-ahead predictions
    async fn autocomplete(
        &self,
        request: &AutocompleteRequest,
    ) -> Result<VendorReply<Vec<AutocompletePrediction>>, PlacesError>;

    /// Fetch details for one place, limited to `fields` when non-empty
    async fn place_details(
        &self,
        place_id: &str,
        fields: &[String],
        language: &str,
    ) -> Result<VendorReply<Option<PlaceDetails>>, PlacesError>;
}
