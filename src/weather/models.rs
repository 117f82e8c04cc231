use serde::{Deserialize, Serialize};

// ============================================================================
// Shared OpenWeatherMap payload fragments
// These shapes recur across the current-weather and forecast endpoints
// ============================================================================

/// One entry of a payload's `weather` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// The `main` block: temperatures in degrees Celsius, pressure in hPa,
/// humidity in percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainMetrics {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: u32,
    pub humidity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wind {
    /// Meters per second (metric payloads).
    pub speed: f64,
    pub deg: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clouds {
    /// Cloudiness in percent.
    pub all: u32,
}

/// Rain or snow volume in millimeters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Precipitation {
    #[serde(rename = "1h", skip_serializing_if = "Option::is_none")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h", skip_serializing_if = "Option::is_none")]
    pub three_hours: Option<f64>,
}

// ============================================================================
// Current Weather API Response (/data/2.5/weather)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherData {
    pub coord: Coord,
    pub weather: Vec<WeatherCondition>,
    pub main: MainMetrics,
    /// Meters; omitted by the API for some stations.
    pub visibility: Option<u32>,
    pub wind: Wind,
    pub clouds: Clouds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain: Option<Precipitation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow: Option<Precipitation>,
    /// Observation time, Unix seconds UTC.
    pub dt: i64,
    pub sys: SysInfo,
    /// Shift from UTC in seconds.
    pub timezone: i32,
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SysInfo {
    pub country: Option<String>,
    pub sunrise: i64,
    pub sunset: i64,
}

impl WeatherData {
    /// First (primary) condition entry, if the API supplied one.
    pub fn condition(&self) -> Option<&WeatherCondition> {
        self.weather.first()
    }
}
