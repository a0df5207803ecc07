//! Result caches
//!
//! Three independent moka tables (geocoding, autocomplete, place details),
//! each bounded in size and expiring entries by TTL on read. A table whose
//! TTL is zero is disabled and misses on every lookup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use tracing::debug;

use crate::config::PlacesConfig;
use crate::models::{AutocompletePrediction, AutocompleteRequest, GeocodeTarget, GeocodingResult, PlaceDetails};

/// Counters for one cache table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
    /// Approximate number of live entries
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
}

/// Counters for all three tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub geocoding: TableStats,
    pub autocomplete: TableStats,
    pub details: TableStats,
}

/// A single TTL-bounded table with hit/miss accounting
struct TtlTable<V> {
    name: &'static str,
    cache: Option<Cache<String, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> std::fmt::Debug for TtlTable<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlTable")
            .field("name", &self.name)
            .field("enabled", &self.cache.is_some())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl<V> TtlTable<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn new(name: &'static str, ttl: Option<Duration>, max_entries: u64) -> Self {
        let cache = ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build()
        });

        Self {
            name,
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    async fn get(&self, key: &str) -> Option<V> {
        let found = match &self.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        };

        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(table = self.name, key = %key, "Cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(table = self.name, key = %key, "Cache miss");
        }
        found
    }

    async fn insert(&self, key: String, value: V) {
        if let Some(cache) = &self.cache {
            cache.insert(key, value).await;
        }
    }

    fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }

    fn stats(&self) -> TableStats {
        TableStats {
            entries: self.cache.as_ref().map_or(0, |cache| cache.entry_count()),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    #[cfg(test)]
    async fn sync(&self) {
        if let Some(cache) = &self.cache {
            cache.run_pending_tasks().await;
        }
    }
}

/// The geocoding, autocomplete and place-details caches
#[derive(Debug)]
pub struct PlacesCache {
    geocoding: TtlTable<GeocodingResult>,
    autocomplete: TtlTable<Vec<AutocompletePrediction>>,
    details: TtlTable<PlaceDetails>,
}

impl PlacesCache {
    /// Build the three tables from configured TTLs and capacity
    #[must_use]
    pub fn new(config: &PlacesConfig) -> Self {
        let max_entries = config.cache_max_entries;
        Self {
            geocoding: TtlTable::new("geocoding", config.geocode_ttl(), max_entries),
            autocomplete: TtlTable::new("autocomplete", config.autocomplete_ttl(), max_entries),
            details: TtlTable::new("details", config.details_ttl(), max_entries),
        }
    }

    pub async fn get_geocode(&self, key: &str) -> Option<GeocodingResult> {
        self.geocoding.get(key).await
    }

    pub async fn insert_geocode(&self, key: String, result: GeocodingResult) {
        self.geocoding.insert(key, result).await;
    }

    pub async fn get_predictions(&self, key: &str) -> Option<Vec<AutocompletePrediction>> {
        self.autocomplete.get(key).await
    }

    pub async fn insert_predictions(&self, key: String, predictions: Vec<AutocompletePrediction>) {
        self.autocomplete.insert(key, predictions).await;
    }

    pub async fn get_details(&self, key: &str) -> Option<PlaceDetails> {
        self.details.get(key).await
    }

    pub async fn insert_details(&self, key: String, details: PlaceDetails) {
        self.details.insert(key, details).await;
    }

    /// Drop every entry from all three tables
    pub fn clear(&self) {
        self.geocoding.clear();
        self.autocomplete.clear();
        self.details.clear();
        debug!("Cleared places caches");
    }

    /// Snapshot of the hit/miss counters (entry counts are approximate)
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            geocoding: self.geocoding.stats(),
            autocomplete: self.autocomplete.stats(),
            details: self.details.stats(),
        }
    }
}

/// Cache key for a geocode request: kind, normalized value, region, language
#[must_use]
pub fn geocode_key(target: &GeocodeTarget, region: &str, language: &str) -> String {
    format!(
        "{}:{}:{}:{}",
        target.kind(),
        target.normalized_value(),
        region.to_lowercase(),
        language.to_lowercase()
    )
}

/// Cache key for an autocomplete request: the serialized request
#[must_use]
pub fn autocomplete_key(request: &AutocompleteRequest) -> String {
    serde_json::to_string(request).unwrap_or_else(|_| format!("{request:?}"))
}

/// Cache key for place details: the place id plus the requested field mask
#[must_use]
pub fn details_key(place_id: &str, fields: &[String]) -> String {
    if fields.is_empty() {
        return place_id.to_string();
    }
    let mut sorted: Vec<&str> = fields.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();
    format!("{place_id}|{}", sorted.join(","))
}
