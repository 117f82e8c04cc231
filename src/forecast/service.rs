use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::models::ForecastData;
use crate::cache::{coord_cache_key, TtlCache};
use crate::retry::{send_with_retry, RetryPolicy};

const FORECAST_PATH: &str = "/data/2.5/forecast";
const METRIC_UNITS: &str = "metric";
const CACHE_TTL_SECS: u64 = 15 * 60;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Failed to fetch forecast data: {0}")]
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

/// Fetches the 5-day / 3-hour forecast from `/data/2.5/forecast`.
///
/// Forecast data moves slowly, so responses are cached for fifteen minutes
/// per (coordinates, language) pair.
pub struct ForecastService {
    client: Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
    cache: TtlCache<String, ForecastData>,
}

impl ForecastService {
    pub fn new(client: Client, api_key: &str, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
            cache: TtlCache::new(Duration::from_secs(CACHE_TTL_SECS)),
        }
    }

    /// 3-hourly forecast samples for a coordinate pair.
    pub async fn forecast(
        &self,
        lat: f64,
        lon: f64,
        lang: &str,
    ) -> Result<ForecastData, ForecastError> {
        let cache_key = coord_cache_key(lat, lon, lang);

        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!(lat, lon, "Forecast cache hit");
            return Ok(cached);
        }

        tracing::debug!(lat, lon, lang = %lang, "Fetching forecast");

        let url = format!("{}{}", self.base_url, FORECAST_PATH);
        let params = vec![
            ("lat".to_string(), lat.to_string()),
            ("lon".to_string(), lon.to_string()),
            ("appid".to_string(), self.api_key.clone()),
            ("units".to_string(), METRIC_UNITS.to_string()),
            ("lang".to_string(), lang.to_string()),
        ];

        let response = send_with_retry(&self.retry, || {
            self.client.get(&url).query(&params).send()
        })
        .await?;

        let status = response.status();
        tracing::debug!(status = %status, "Received forecast response");

        if !status.is_success() {
            let error: OpenWeatherMapError = response.json().await.unwrap_or(OpenWeatherMapError {
                message: format!("HTTP {}", status),
            });
            return Err(ForecastError::ApiError(error.message));
        }

        let data: ForecastData = response
            .json()
            .await
            .map_err(|e| ForecastError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            city = %data.city.name,
            samples = data.list.len(),
            "Forecast fetched"
        );

        self.cache.insert(cache_key, data.clone());
        Ok(data)
    }

    /// Bypass the cache and fetch a fresh forecast.
    pub async fn refresh_forecast(
        &self,
        lat: f64,
        lon: f64,
        lang: &str,
    ) -> Result<ForecastData, ForecastError> {
        self.cache.remove(&coord_cache_key(lat, lon, lang));
        self.forecast(lat, lon, lang).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn forecast_body() -> serde_json::Value {
        serde_json::json!({
            "list": [
                {
                    "dt": 1710486000,
                    "main": {
                        "temp": 24.2, "feels_like": 24.6, "temp_min": 23.0,
                        "temp_max": 24.2, "pressure": 1013, "humidity": 58
                    },
                    "weather": [
                        {"id": 802, "main": "Clouds", "description": "nubes dispersas", "icon": "03d"}
                    ],
                    "clouds": {"all": 40},
                    "wind": {"speed": 4.1, "deg": 95},
                    "visibility": 10000,
                    "pop": 0.2,
                    "dt_txt": "2024-03-15 09:00:00"
                },
                {
                    "dt": 1710496800,
                    "main": {
                        "temp": 27.8, "feels_like": 28.9, "temp_min": 27.8,
                        "temp_max": 28.4, "pressure": 1011, "humidity": 52
                    },
                    "weather": [
                        {"id": 500, "main": "Rain", "description": "lluvia ligera", "icon": "10d"}
                    ],
                    "clouds": {"all": 60},
                    "wind": {"speed": 3.4, "deg": 110},
                    "visibility": 10000,
                    "pop": 0.6,
                    "rain": {"3h": 0.4},
                    "dt_txt": "2024-03-15 12:00:00"
                }
            ],
            "city": {
                "id": 3646738,
                "name": "Caracas",
                "coord": {"lat": 10.4806, "lon": -66.9036},
                "country": "VE",
                "population": 3000000,
                "timezone": -14400,
                "sunrise": 1710498000,
                "sunset": 1710541500
            }
        })
    }

    #[tokio::test]
    async fn test_forecast_fetch() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .and(query_param("lat", "10.4806"))
            .and(query_param("lon", "-66.9036"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&mock_server)
            .await;

        let service = ForecastService::new(Client::new(), "test_key", &mock_server.uri());
        let data = service.forecast(10.4806, -66.9036, "es").await.unwrap();

        assert_eq!(data.city.name, "Caracas");
        assert_eq!(data.list.len(), 2);
        assert_eq!(data.list[1].pop, 0.6);
        assert_eq!(
            data.list[1].rain.as_ref().unwrap().three_hours,
            Some(0.4)
        );
    }

    #[tokio::test]
    async fn test_forecast_cache_hit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let service = ForecastService::new(Client::new(), "test_key", &mock_server.uri());
        service.forecast(10.4806, -66.9036, "es").await.unwrap();
        let cached = service.forecast(10.4806, -66.9036, "es").await.unwrap();

        assert_eq!(cached.city.name, "Caracas");
    }

    #[tokio::test]
    async fn test_forecast_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "cod": "400", "message": "wrong latitude"
            })))
            .mount(&mock_server)
            .await;

        let service = ForecastService::new(Client::new(), "test_key", &mock_server.uri());
        let result = service.forecast(123.0, -66.9036, "es").await;

        assert!(matches!(result, Err(ForecastError::ApiError(msg)) if msg == "wrong latitude"));
    }
}
