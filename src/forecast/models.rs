use serde::{Deserialize, Serialize};

use crate::weather::models::{Clouds, Coord, MainMetrics, Precipitation, WeatherCondition, Wind};

// ============================================================================
// 5-day / 3-hour Forecast API Response (/data/2.5/forecast)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastData {
    /// 3-hourly samples in chronological order, about 40 entries.
    pub list: Vec<ForecastSample>,
    pub city: ForecastCity,
}

/// One 3-hourly forecast step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Forecast time, Unix seconds UTC.
    pub dt: i64,
    pub main: MainMetrics,
    pub weather: Vec<WeatherCondition>,
    pub clouds: Clouds,
    pub wind: Wind,
    pub visibility: Option<u32>,
    /// Probability of precipitation, 0.0 to 1.0.
    pub pop: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain: Option<Precipitation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow: Option<Precipitation>,
    /// Same instant as `dt`, rendered `YYYY-MM-DD HH:MM:SS` UTC.
    pub dt_txt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastCity {
    pub id: i64,
    pub name: String,
    pub coord: Coord,
    pub country: String,
    pub population: Option<i64>,
    /// Shift from UTC in seconds.
    pub timezone: i32,
    pub sunrise: i64,
    pub sunset: i64,
}
