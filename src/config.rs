use std::time::Duration;

use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Shared HTTP client configuration
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Deserialize, Clone)]
pub struct ClimaConfig {
    /// OpenWeatherMap API key
    pub openweathermap_api_key: String,

    /// Base URL for all OpenWeatherMap endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Response language for localized description fields
    #[serde(default = "default_language")]
    pub language: String,

    /// Directory holding the persisted preferences snapshot
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// How long to wait for a geolocation fix before falling back
    #[serde(default = "default_geolocation_timeout_secs")]
    pub geolocation_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_language() -> String {
    "es".to_string()
}

fn default_storage_dir() -> String {
    "data".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_geolocation_timeout_secs() -> u64 {
    3
}

impl ClimaConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Start with default values
            .set_default("base_url", default_base_url())?
            .set_default("language", default_language())?
            .set_default("storage_dir", default_storage_dir())?
            // Load from config file if present
            .add_source(File::with_name("clima").required(false))
            .add_source(File::with_name("clima.local").required(false))
            // Override with environment variables (prefixed with CLIMA_)
            // Convert SCREAMING_SNAKE_CASE env vars to snake_case config keys
            .add_source(
                Environment::with_prefix("CLIMA")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_secs(self.geolocation_timeout_secs)
    }
}

/// Create shared HTTP client with connection pooling
pub fn create_http_client(config: &ClimaConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(config.http_timeout())
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(10)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> ClimaConfig {
        let built = Config::builder()
            .set_default("openweathermap_api_key", "test-key")
            .unwrap()
            .build()
            .unwrap();
        built.try_deserialize().unwrap()
    }

    #[test]
    fn test_defaults_apply() {
        let config = minimal_config();
        assert_eq!(config.base_url, "https://api.openweathermap.org");
        assert_eq!(config.language, "es");
        assert_eq!(config.storage_dir, "data");
        assert_eq!(config.http_timeout(), Duration::from_secs(10));
        assert_eq!(config.geolocation_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("CLIMA_OPENWEATHERMAP_API_KEY", "env-key");
        std::env::set_var("CLIMA_LANGUAGE", "en");
        std::env::set_var("CLIMA_GEOLOCATION_TIMEOUT_SECS", "7");

        let config = ClimaConfig::load().unwrap();
        assert_eq!(config.openweathermap_api_key, "env-key");
        assert_eq!(config.language, "en");
        assert_eq!(config.geolocation_timeout(), Duration::from_secs(7));

        std::env::remove_var("CLIMA_OPENWEATHERMAP_API_KEY");
        std::env::remove_var("CLIMA_LANGUAGE");
        std::env::remove_var("CLIMA_GEOLOCATION_TIMEOUT_SECS");
    }
}
