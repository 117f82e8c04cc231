//! Core library for a client-side weather dashboard backed by OpenWeatherMap.
//!
//! This crate defines:
//! - Typed payload models and fetch services for current weather, 5-day/3-hour
//!   forecasts, geocoding and air quality
//! - A preference/favorites store with pluggable durable persistence
//! - A pure aggregator that folds 3-hourly forecast samples into daily summaries
//! - A session layer that resolves a starting city (geolocation with a default
//!   fallback) and refreshes dashboard data without stale-response races
//!
//! Presentation is out of scope: the crate is consumed by a UI event loop and
//! owns no CLI or server surface.

pub mod air;
pub mod cache;
pub mod conditions;
pub mod config;
pub mod forecast;
pub mod geo;
pub mod location;
pub mod retry;
pub mod session;
pub mod store;
pub mod weather;

pub use air::{AirQualityService, AirSample, AqiLevel};
pub use config::{create_http_client, ClimaConfig};
pub use forecast::{summarize_daily, DailySummary, ForecastData, ForecastSample, ForecastService};
pub use geo::{GeoCity, GeoService};
pub use location::{Coordinates, LocationError, LocationProvider};
pub use session::{DashboardData, DashboardSession, RefreshOutcome, SessionError};
pub use store::{
    City, FavoriteCity, FileStorage, Language, MemoryStorage, Settings, SettingsUpdate,
    StorageBackend, StorageError, TemperatureUnit, WeatherStore,
};
pub use weather::{WeatherData, WeatherService};
