//! Places service configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the geocoding / places services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// Base URL of the Maps Platform web services
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Default region bias (ccTLD, e.g. "US", "CO")
    #[serde(default = "default_region")]
    pub region: String,

    /// Default response language (e.g. "en", "es")
    #[serde(default = "default_language")]
    pub language: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum vendor calls issued per one-second window
    #[serde(default = "default_max_requests_per_second")]
    pub max_requests_per_second: u32,

    /// Geocoding cache TTL in hours (0 to disable)
    #[serde(default = "default_geocode_cache_ttl_hours")]
    pub geocode_cache_ttl_hours: u64,

    /// Autocomplete cache TTL in minutes (0 to disable)
    #[serde(default = "default_autocomplete_cache_ttl_minutes")]
    pub autocomplete_cache_ttl_minutes: u64,

    /// Place details cache TTL in hours (0 to disable)
    #[serde(default = "default_details_cache_ttl_hours")]
    pub details_cache_ttl_hours: u64,

    /// Upper bound on entries held by each cache table
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: u64,
}

fn default_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

fn default_region() -> String {
    "US".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_max_requests_per_second() -> u32 {
    50
}

const fn default_geocode_cache_ttl_hours() -> u64 {
    24
}

const fn default_autocomplete_cache_ttl_minutes() -> u64 {
    60
}

const fn default_details_cache_ttl_hours() -> u64 {
    24
}

const fn default_cache_max_entries() -> u64 {
    10_000
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            region: default_region(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
            max_requests_per_second: default_max_requests_per_second(),
            geocode_cache_ttl_hours: default_geocode_cache_ttl_hours(),
            autocomplete_cache_ttl_minutes: default_autocomplete_cache_ttl_minutes(),
            details_cache_ttl_hours: default_details_cache_ttl_hours(),
            cache_max_entries: default_cache_max_entries(),
        }
    }
}

impl PlacesConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            geocode_cache_ttl_hours: 0,
            autocomplete_cache_ttl_minutes: 0,
            details_cache_ttl_hours: 0,
            ..Default::default()
        }
    }

    /// Geocoding cache TTL, `None` when disabled
    #[must_use]
    pub const fn geocode_ttl(&self) -> Option<Duration> {
        ttl_from_secs(self.geocode_cache_ttl_hours.saturating_mul(3600))
    }

    /// Autocomplete cache TTL, `None` when disabled
    #[must_use]
    pub const fn autocomplete_ttl(&self) -> Option<Duration> {
        ttl_from_secs(self.autocomplete_cache_ttl_minutes.saturating_mul(60))
    }

    /// Place details cache TTL, `None` when disabled
    #[must_use]
    pub const fn details_ttl(&self) -> Option<Duration> {
        ttl_from_secs(self.details_cache_ttl_hours.saturating_mul(3600))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.api_key.trim().is_empty() {
            return Err("api_key must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.max_requests_per_second == 0 {
            return Err("max_requests_per_second must be greater than 0".to_string());
        }

        if self.cache_max_entries == 0 {
            return Err("cache_max_entries must be greater than 0".to_string());
        }

        Ok(())
    }
}

const fn ttl_from_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}
