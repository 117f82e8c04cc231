use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use super::models::{City, FavoriteCity, Language, Settings, SettingsUpdate, StoreSnapshot, TemperatureUnit};
use super::storage::{StorageBackend, StorageError};

/// Key the snapshot is persisted under, shared by every backend.
pub const STORAGE_KEY: &str = "weather-app-storage";

/// Maximum number of remembered search queries.
pub const HISTORY_LIMIT: usize = 10;

/// Preferences, favorites and the active city.
///
/// The in-memory state is the source of truth. Every mutation schedules a
/// snapshot write on the current runtime and returns immediately; the file
/// may briefly lag the memory state, and write failures are logged and
/// swallowed. Call [`flush`](WeatherStore::flush) to await a full write.
pub struct WeatherStore {
    backend: Arc<dyn StorageBackend>,
    current_city: Option<City>,
    favorites: Vec<FavoriteCity>,
    settings: Settings,
    search_history: Vec<String>,
}

impl WeatherStore {
    /// Open a store hydrated from the backend's snapshot. A missing or
    /// unreadable snapshot yields defaults rather than an error.
    pub async fn open(backend: Arc<dyn StorageBackend>) -> Self {
        let snapshot = match backend.load(STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<StoreSnapshot>(&raw) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    tracing::warn!(error = %e, "Stored snapshot is unreadable, starting with defaults");
                    StoreSnapshot::default()
                }
            },
            Ok(None) => StoreSnapshot::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load snapshot, starting with defaults");
                StoreSnapshot::default()
            }
        };

        tracing::info!(
            favorites = snapshot.favorites.len(),
            history = snapshot.search_history.len(),
            "Preferences hydrated from storage"
        );

        Self {
            backend,
            current_city: snapshot.current_city,
            favorites: snapshot.favorites,
            settings: snapshot.settings,
            search_history: snapshot.search_history,
        }
    }

    /// Replace the active city. No validation is applied.
    pub fn set_current_city(&mut self, city: City) {
        self.current_city = Some(city);
        self.persist();
    }

    /// Append a favorite with a fresh unique id and the current timestamp.
    /// The same place may be favorited more than once; only ids are unique.
    pub fn add_favorite(&mut self, city: &City) -> FavoriteCity {
        let (id, added_at) = self.fresh_favorite_id(&city.name, &city.country);
        let favorite = FavoriteCity {
            id,
            name: city.name.clone(),
            country: city.country.clone(),
            lat: city.lat,
            lon: city.lon,
            added_at,
        };

        self.favorites.push(favorite.clone());
        self.persist();

        tracing::debug!(id = %favorite.id, "Favorite added");
        favorite
    }

    /// Remove the favorite with the given id. Returns whether it existed.
    pub fn remove_favorite(&mut self, id: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|f| f.id != id);
        let removed = self.favorites.len() != before;

        if removed {
            self.persist();
        }

        removed
    }

    /// Whether the place is favorited. Name matching is case-insensitive,
    /// country matching is exact.
    pub fn is_favorite(&self, name: &str, country: &str) -> bool {
        self.favorites
            .iter()
            .any(|f| f.name.to_lowercase() == name.to_lowercase() && f.country == country)
    }

    /// Merge a partial settings change; unspecified fields keep their values.
    pub fn update_settings(&mut self, update: SettingsUpdate) {
        if let Some(unit) = update.temperature_unit {
            self.settings.temperature_unit = unit;
        }
        if let Some(language) = update.language {
            self.settings.language = language;
        }
        if let Some(auto_refresh) = update.auto_refresh {
            self.settings.auto_refresh = auto_refresh;
        }
        if let Some(sound_effects) = update.sound_effects {
            self.settings.sound_effects = sound_effects;
        }
        self.persist();
    }

    pub fn set_temperature_unit(&mut self, unit: TemperatureUnit) {
        self.settings.temperature_unit = unit;
        self.persist();
    }

    pub fn set_language(&mut self, language: Language) {
        self.settings.language = language;
        self.persist();
    }

    /// Record a search query: moved to the front, deduplicated, capped at
    /// [`HISTORY_LIMIT`] entries.
    pub fn add_to_history(&mut self, query: &str) {
        self.search_history.retain(|q| q != query);
        self.search_history.insert(0, query.to_string());
        self.search_history.truncate(HISTORY_LIMIT);
        self.persist();
    }

    pub fn clear_history(&mut self) {
        self.search_history.clear();
        self.persist();
    }

    pub fn current_city(&self) -> Option<&City> {
        self.current_city.as_ref()
    }

    pub fn favorites(&self) -> &[FavoriteCity] {
        &self.favorites
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn search_history(&self) -> &[String] {
        &self.search_history
    }

    /// The persisted subset of the current state.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            favorites: self.favorites.clone(),
            settings: self.settings.clone(),
            search_history: self.search_history.clone(),
            current_city: self.current_city.clone(),
        }
    }

    /// Write the current snapshot and wait for it to land. Used at shutdown;
    /// routine mutations persist in the background instead.
    pub async fn flush(&self) -> Result<(), StorageError> {
        let payload = self.encode_snapshot()?;
        self.backend.save(STORAGE_KEY, &payload).await
    }

    fn encode_snapshot(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Fire-and-forget persistence. The snapshot is serialized now so the
    /// write captures this mutation even if later ones overtake it.
    fn persist(&self) {
        let payload = match self.encode_snapshot() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize snapshot");
                return;
            }
        };

        let backend = Arc::clone(&self.backend);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = backend.save(STORAGE_KEY, &payload).await {
                        tracing::warn!(error = %e, "Failed to persist snapshot");
                    }
                });
            }
            Err(_) => {
                tracing::warn!("No async runtime available, snapshot not persisted");
            }
        }
    }

    /// Millisecond id of the form `{name}-{country}-{timestamp}`, nudged
    /// forward until it collides with no existing favorite.
    fn fresh_favorite_id(&self, name: &str, country: &str) -> (String, i64) {
        let mut added_at = now_millis();
        let mut id = format!("{name}-{country}-{added_at}");
        while self.favorites.iter().any(|f| f.id == id) {
            added_at += 1;
            id = format!("{name}-{country}-{added_at}");
        }
        (id, added_at)
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
