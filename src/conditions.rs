//! Classification of raw weather payloads into display-ready categories:
//! condition kinds, visual themes, UV bands, compass points and unit
//! conversion.

use crate::store::{Language, TemperatureUnit};

/// Simplified condition derived from the payload's `weather.main` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Haze,
    Dust,
    Smoke,
}

impl ConditionKind {
    /// Unknown strings classify as [`ConditionKind::Clear`].
    pub fn from_main(main: &str) -> Self {
        match main.to_lowercase().as_str() {
            "clouds" => ConditionKind::Clouds,
            "rain" => ConditionKind::Rain,
            "drizzle" => ConditionKind::Drizzle,
            "thunderstorm" => ConditionKind::Thunderstorm,
            "snow" => ConditionKind::Snow,
            "mist" => ConditionKind::Mist,
            "fog" => ConditionKind::Fog,
            "haze" => ConditionKind::Haze,
            "dust" | "sand" | "ash" => ConditionKind::Dust,
            "smoke" => ConditionKind::Smoke,
            _ => ConditionKind::Clear,
        }
    }
}

/// Visual theme keyed off the OpenWeatherMap condition id ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    ClearDay,
    ClearNight,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
    Foggy,
}

impl Theme {
    pub fn from_id(id: u32, night: bool) -> Self {
        match id {
            200..=299 => Theme::Stormy,
            300..=399 | 500..=599 => Theme::Rainy,
            600..=699 => Theme::Snowy,
            700..=799 => Theme::Foggy,
            800 => {
                if night {
                    Theme::ClearNight
                } else {
                    Theme::ClearDay
                }
            }
            _ => Theme::Cloudy,
        }
    }
}

/// Whether a timestamp falls outside the sunrise..sunset window.
pub fn is_night(dt: i64, sunrise: i64, sunset: i64) -> bool {
    dt < sunrise || dt > sunset
}

/// UV index severity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UvLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvLevel {
    pub fn from_index(uvi: f64) -> Self {
        if uvi < 3.0 {
            UvLevel::Low
        } else if uvi < 6.0 {
            UvLevel::Moderate
        } else if uvi < 8.0 {
            UvLevel::High
        } else if uvi < 11.0 {
            UvLevel::VeryHigh
        } else {
            UvLevel::Extreme
        }
    }

    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (UvLevel::Low, Language::Es) => "Bajo",
            (UvLevel::Low, Language::En) => "Low",
            (UvLevel::Moderate, Language::Es) => "Moderado",
            (UvLevel::Moderate, Language::En) => "Moderate",
            (UvLevel::High, Language::Es) => "Alto",
            (UvLevel::High, Language::En) => "High",
            (UvLevel::VeryHigh, Language::Es) => "Muy Alto",
            (UvLevel::VeryHigh, Language::En) => "Very High",
            (UvLevel::Extreme, Language::Es) => "Extremo",
            (UvLevel::Extreme, Language::En) => "Extreme",
        }
    }
}

const COMPASS_ES: [&str; 8] = ["N", "NE", "E", "SE", "S", "SO", "O", "NO"];
const COMPASS_EN: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Nearest of the eight compass points for a wind bearing in degrees.
pub fn compass_point(deg: u32, language: Language) -> &'static str {
    let index = ((deg as f64 / 45.0).round() as usize) % 8;
    match language {
        Language::Es => COMPASS_ES[index],
        Language::En => COMPASS_EN[index],
    }
}

/// Convert a metric temperature to the display unit, rounded to a whole
/// degree. API payloads are always Celsius.
pub fn convert_temperature(celsius: f64, unit: TemperatureUnit) -> i64 {
    match unit {
        TemperatureUnit::Celsius => celsius.round() as i64,
        TemperatureUnit::Fahrenheit => (celsius * 9.0 / 5.0 + 32.0).round() as i64,
    }
}
