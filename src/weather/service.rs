use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::models::WeatherData;
use crate::cache::{coord_cache_key, normalize_cache_key, TtlCache};
use crate::retry::{send_with_retry, RetryPolicy};

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
const METRIC_UNITS: &str = "metric";
const CACHE_TTL_SECS: u64 = 5 * 60;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Failed to fetch weather data: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct OpenWeatherMapError {
    message: String,
}

/// Fetches current conditions from `/data/2.5/weather`.
///
/// Requests are always metric; responses are cached for five minutes per
/// (location, language) pair.
pub struct WeatherService {
    client: Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
    cache: TtlCache<String, WeatherData>,
}

impl WeatherService {
    pub fn new(client: Client, api_key: &str, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
            cache: TtlCache::new(Duration::from_secs(CACHE_TTL_SECS)),
        }
    }

    /// Current weather at a coordinate pair.
    pub async fn current_weather(
        &self,
        lat: f64,
        lon: f64,
        lang: &str,
    ) -> Result<WeatherData, WeatherError> {
        let cache_key = coord_cache_key(lat, lon, lang);

        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!(lat, lon, "Current weather cache hit");
            return Ok(cached);
        }

        tracing::debug!(lat, lon, lang = %lang, "Fetching current weather");

        let params = vec![
            ("lat".to_string(), lat.to_string()),
            ("lon".to_string(), lon.to_string()),
            ("appid".to_string(), self.api_key.clone()),
            ("units".to_string(), METRIC_UNITS.to_string()),
            ("lang".to_string(), lang.to_string()),
        ];
        let data = self
            .fetch_current(&params, format!("{lat},{lon}"))
            .await?;

        self.cache.insert(cache_key, data.clone());
        Ok(data)
    }

    /// Current weather by free-text city name.
    pub async fn current_weather_by_city(
        &self,
        city: &str,
        lang: &str,
    ) -> Result<WeatherData, WeatherError> {
        let cache_key = format!("{}:{}", normalize_cache_key(city), lang);

        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!(city = %city, "Current weather cache hit");
            return Ok(cached);
        }

        tracing::debug!(city = %city, lang = %lang, "Fetching current weather by city");

        let params = vec![
            ("q".to_string(), city.to_string()),
            ("appid".to_string(), self.api_key.clone()),
            ("units".to_string(), METRIC_UNITS.to_string()),
            ("lang".to_string(), lang.to_string()),
        ];
        let data = self.fetch_current(&params, city.to_string()).await?;

        self.cache.insert(cache_key, data.clone());
        Ok(data)
    }

    /// Bypass the cache and fetch fresh data for a coordinate pair.
    pub async fn refresh_current_weather(
        &self,
        lat: f64,
        lon: f64,
        lang: &str,
    ) -> Result<WeatherData, WeatherError> {
        self.cache.remove(&coord_cache_key(lat, lon, lang));
        self.current_weather(lat, lon, lang).await
    }

    async fn fetch_current(
        &self,
        params: &[(String, String)],
        location: String,
    ) -> Result<WeatherData, WeatherError> {
        let url = format!("{}{}", self.base_url, CURRENT_WEATHER_PATH);

        let response = send_with_retry(&self.retry, || {
            self.client.get(&url).query(params).send()
        })
        .await?;

        let status = response.status();
        tracing::debug!(status = %status, "Received current weather response");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(WeatherError::CityNotFound(location));
        }

        if !status.is_success() {
            let error: OpenWeatherMapError = response.json().await.unwrap_or(OpenWeatherMapError {
                message: format!("HTTP {}", status),
            });
            return Err(WeatherError::ApiError(error.message));
        }

        let data: WeatherData = response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            city = %data.name,
            temp = data.main.temp,
            "Current weather fetched"
        );

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn caracas_body() -> serde_json::Value {
        serde_json::json!({
            "coord": {"lon": -66.9036, "lat": 10.4806},
            "weather": [
                {"id": 803, "main": "Clouds", "description": "muy nuboso", "icon": "04d"}
            ],
            "main": {
                "temp": 27.4, "feels_like": 29.8, "temp_min": 26.1, "temp_max": 28.3,
                "pressure": 1012, "humidity": 66
            },
            "visibility": 10000,
            "wind": {"speed": 3.6, "deg": 80},
            "clouds": {"all": 75},
            "dt": 1700000000,
            "sys": {"country": "VE", "sunrise": 1699957560, "sunset": 1700000160},
            "timezone": -14400,
            "id": 3646738,
            "name": "Caracas"
        })
    }

    #[tokio::test]
    async fn test_current_weather_by_coordinates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "10.4806"))
            .and(query_param("lon", "-66.9036"))
            .and(query_param("units", "metric"))
            .and(query_param("lang", "es"))
            .respond_with(ResponseTemplate::new(200).set_body_json(caracas_body()))
            .mount(&mock_server)
            .await;

        let service = WeatherService::new(Client::new(), "test_key", &mock_server.uri());
        let data = service.current_weather(10.4806, -66.9036, "es").await.unwrap();

        assert_eq!(data.name, "Caracas");
        assert_eq!(data.sys.country.as_deref(), Some("VE"));
        assert_eq!(data.main.temp, 27.4);
        assert_eq!(data.condition().unwrap().icon, "04d");
    }

    #[tokio::test]
    async fn test_current_weather_by_city() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Caracas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(caracas_body()))
            .mount(&mock_server)
            .await;

        let service = WeatherService::new(Client::new(), "test_key", &mock_server.uri());
        let data = service.current_weather_by_city("Caracas", "es").await.unwrap();

        assert_eq!(data.name, "Caracas");
        assert_eq!(data.wind.speed, 3.6);
    }

    #[tokio::test]
    async fn test_unknown_city_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "cod": "404", "message": "city not found"
            })))
            .mount(&mock_server)
            .await;

        let service = WeatherService::new(Client::new(), "test_key", &mock_server.uri());
        let result = service.current_weather_by_city("Atlantis", "es").await;

        assert!(matches!(result, Err(WeatherError::CityNotFound(city)) if city == "Atlantis"));
    }

    #[tokio::test]
    async fn test_api_error_carries_provider_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401, "message": "Invalid API key"
            })))
            .mount(&mock_server)
            .await;

        let service = WeatherService::new(Client::new(), "bad_key", &mock_server.uri());
        let result = service.current_weather(10.0, -66.0, "es").await;

        assert!(matches!(result, Err(WeatherError::ApiError(msg)) if msg == "Invalid API key"));
    }

    #[tokio::test]
    async fn test_transient_server_error_is_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(caracas_body()))
            .mount(&mock_server)
            .await;

        let service = WeatherService::new(Client::new(), "test_key", &mock_server.uri());
        let data = service.current_weather(10.4806, -66.9036, "es").await.unwrap();

        assert_eq!(data.name, "Caracas");
    }

    #[tokio::test]
    async fn test_second_lookup_hits_cache() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(caracas_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let service = WeatherService::new(Client::new(), "test_key", &mock_server.uri());
        service.current_weather(10.4806, -66.9036, "es").await.unwrap();
        let cached = service.current_weather(10.4806, -66.9036, "es").await.unwrap();

        assert_eq!(cached.name, "Caracas");
    }

    #[tokio::test]
    async fn test_refresh_bypasses_cache() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(caracas_body()))
            .expect(2)
            .mount(&mock_server)
            .await;

        let service = WeatherService::new(Client::new(), "test_key", &mock_server.uri());
        service.current_weather(10.4806, -66.9036, "es").await.unwrap();
        service
            .refresh_current_weather(10.4806, -66.9036, "es")
            .await
            .unwrap();
    }
}
