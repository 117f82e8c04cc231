use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::models::GeoCity;
use crate::cache::{normalize_cache_key, TtlCache};
use crate::retry::{send_with_retry, RetryPolicy};

const DIRECT_GEOCODING_PATH: &str = "/geo/1.0/direct";
const REVERSE_GEOCODING_PATH: &str = "/geo/1.0/reverse";

/// How many matches a city search asks for.
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;

const SEARCH_CACHE_TTL_SECS: u64 = 10 * 60;
const REVERSE_CACHE_TTL_SECS: u64 = 60 * 60;

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Failed to fetch geocoding data: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Resolves free-text city searches and coordinate lookups against the
/// OpenWeatherMap geocoding API.
///
/// Search results age out after ten minutes; reverse lookups are effectively
/// immutable, so they live for an hour.
pub struct GeoService {
    client: Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
    search_cache: TtlCache<String, Vec<GeoCity>>,
    reverse_cache: TtlCache<String, Vec<GeoCity>>,
}

impl GeoService {
    pub fn new(client: Client, api_key: &str, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
            search_cache: TtlCache::new(Duration::from_secs(SEARCH_CACHE_TTL_SECS)),
            reverse_cache: TtlCache::new(Duration::from_secs(REVERSE_CACHE_TTL_SECS)),
        }
    }

    /// Search cities by free-text name. An unknown name yields an empty list,
    /// not an error.
    pub async fn search_cities(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<GeoCity>, GeoError> {
        let cache_key = format!("{}:{}", normalize_cache_key(query), limit);

        if let Some(cached) = self.search_cache.get(&cache_key) {
            tracing::debug!(query = %query, "City search cache hit");
            return Ok(cached);
        }

        tracing::debug!(query = %query, limit, "Searching cities");

        let params = vec![
            ("q".to_string(), query.to_string()),
            ("limit".to_string(), limit.to_string()),
            ("appid".to_string(), self.api_key.clone()),
        ];
        let cities = self.fetch_cities(DIRECT_GEOCODING_PATH, &params).await?;

        self.search_cache.insert(cache_key, cities.clone());
        Ok(cities)
    }

    /// Resolve coordinates to the nearest known place. May be empty for
    /// open water or unnamed territory.
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Vec<GeoCity>, GeoError> {
        let cache_key = format!("{lat:.4},{lon:.4}");

        if let Some(cached) = self.reverse_cache.get(&cache_key) {
            tracing::debug!(lat, lon, "Reverse geocoding cache hit");
            return Ok(cached);
        }

        tracing::debug!(lat, lon, "Reverse geocoding");

        let params = vec![
            ("lat".to_string(), lat.to_string()),
            ("lon".to_string(), lon.to_string()),
            ("limit".to_string(), "1".to_string()),
            ("appid".to_string(), self.api_key.clone()),
        ];
        let cities = self.fetch_cities(REVERSE_GEOCODING_PATH, &params).await?;

        self.reverse_cache.insert(cache_key, cities.clone());
        Ok(cities)
    }

    async fn fetch_cities(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Vec<GeoCity>, GeoError> {
        let url = format!("{}{}", self.base_url, path);

        let response = send_with_retry(&self.retry, || {
            self.client.get(&url).query(params).send()
        })
        .await?;

        let status = response.status();
        tracing::debug!(status = %status, "Received geocoding response");

        if !status.is_success() {
            let error: OpenWeatherMapError = response.json().await.unwrap_or(OpenWeatherMapError {
                message: format!("HTTP {}", status),
            });
            return Err(GeoError::ApiError(error.message));
        }

        response
            .json()
            .await
            .map_err(|e| GeoError::InvalidResponse(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct OpenWeatherMapError {
    message: String,
}
