//! Persistent user state: favorites, settings, search history and the
//! active city, mirrored to a pluggable storage backend.

pub mod models;
mod service;
mod storage;

pub use models::{
    default_city, quick_cities, City, FavoriteCity, Language, Settings, SettingsUpdate,
    StoreSnapshot, TemperatureUnit,
};
pub use service::{WeatherStore, HISTORY_LIMIT, STORAGE_KEY};
pub use storage::{FileStorage, MemoryStorage, StorageBackend, StorageError};
