use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::models::AirPollutionData;
use crate::cache::TtlCache;
use crate::retry::{send_with_retry, RetryPolicy};

const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";
const CACHE_TTL_SECS: u64 = 5 * 60;

#[derive(Error, Debug)]
pub enum AirQualityError {
    #[error("Failed to fetch air quality data: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct OpenWeatherMapError {
    message: String,
}

/// Fetches the air quality index from `/data/2.5/air_pollution`.
pub struct AirQualityService {
    client: Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
    cache: TtlCache<String, AirPollutionData>,
}

impl AirQualityService {
    pub fn new(client: Client, api_key: &str, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
            cache: TtlCache::new(Duration::from_secs(CACHE_TTL_SECS)),
        }
    }

    /// Current air quality at a coordinate pair.
    pub async fn air_pollution(&self, lat: f64, lon: f64) -> Result<AirPollutionData, AirQualityError> {
        let cache_key = format!("{lat:.4},{lon:.4}");

        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!(lat, lon, "Air quality cache hit");
            return Ok(cached);
        }

        tracing::debug!(lat, lon, "Fetching air quality");

        let url = format!("{}{}", self.base_url, AIR_POLLUTION_PATH);
        let params = vec![
            ("lat".to_string(), lat.to_string()),
            ("lon".to_string(), lon.to_string()),
            ("appid".to_string(), self.api_key.clone()),
        ];

        let response = send_with_retry(&self.retry, || {
            self.client.get(&url).query(&params).send()
        })
        .await?;

        let status = response.status();
        tracing::debug!(status = %status, "Received air quality response");

        if !status.is_success() {
            let error: OpenWeatherMapError = response.json().await.unwrap_or(OpenWeatherMapError {
                message: format!("HTTP {}", status),
            });
            return Err(AirQualityError::ApiError(error.message));
        }

        let data: AirPollutionData = response
            .json()
            .await
            .map_err(|e| AirQualityError::InvalidResponse(e.to_string()))?;

        self.cache.insert(cache_key, data.clone());
        Ok(data)
    }

    /// Bypass the cache and fetch a fresh measurement.
    pub async fn refresh_air_pollution(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<AirPollutionData, AirQualityError> {
        self.cache.remove(&format!("{lat:.4},{lon:.4}"));
        self.air_pollution(lat, lon).await
    }
}
