use serde::{Deserialize, Serialize};

/// A place the dashboard can show weather for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl City {
    pub fn new(name: &str, country: &str, lat: f64, lon: f64) -> Self {
        Self {
            name: name.to_string(),
            country: country.to_string(),
            lat,
            lon,
            state: None,
        }
    }

    /// City identity: name compared case-insensitively, country exactly.
    pub fn is_same_place(&self, name: &str, country: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase() && self.country == country
    }
}

/// A favorited city. The `id` is unique within the collection; the same
/// place may be favorited more than once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteCity {
    pub id: String,
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    /// When the favorite was added, Unix milliseconds.
    pub added_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    /// Two-letter code used as the API `lang` parameter.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }
}

/// User preferences. Always fully populated; partial updates merge into an
/// existing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub temperature_unit: TemperatureUnit,
    pub language: Language,
    pub auto_refresh: bool,
    pub sound_effects: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            temperature_unit: TemperatureUnit::Celsius,
            language: Language::Es,
            auto_refresh: true,
            sound_effects: false,
        }
    }
}

/// Partial settings change. Fields left as `None` keep their prior values.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub temperature_unit: Option<TemperatureUnit>,
    pub language: Option<Language>,
    pub auto_refresh: Option<bool>,
    pub sound_effects: Option<bool>,
}

/// The subset of store state that survives restarts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub favorites: Vec<FavoriteCity>,
    pub settings: Settings,
    pub search_history: Vec<String>,
    pub current_city: Option<City>,
}

/// Fallback city when no location fix is available.
pub fn default_city() -> City {
    City::new("Caracas", "VE", 10.4806, -66.9036)
}

/// Preset cities offered before the user has searched for anything.
pub fn quick_cities() -> Vec<City> {
    vec![
        City::new("Caracas", "VE", 10.4806, -66.9036),
        City::new("Maracaibo", "VE", 10.6666, -71.6124),
        City::new("Valencia", "VE", 10.1620, -67.9963),
        City::new("Barquisimeto", "VE", 10.0678, -69.3467),
        City::new("Maracay", "VE", 10.2469, -67.5958),
        City::new("Mérida", "VE", 8.5897, -71.1561),
        City::new("San Cristóbal", "VE", 7.7669, -72.2250),
        City::new("Puerto La Cruz", "VE", 10.2165, -64.6320),
        City::new("Ciudad Guayana", "VE", 8.3620, -62.6508),
        City::new("Barinas", "VE", 8.6226, -70.2070),
        City::new("Maturín", "VE", 9.7457, -63.1830),
        City::new("Cumaná", "VE", 10.4636, -64.1676),
    ]
}
