//! Dashboard session: owns the preference store, composes the fetch
//! services and guards refreshes against city switches.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::air::{AirQualityService, AirSample};
use crate::config::{create_http_client, ClimaConfig};
use crate::forecast::{summarize_daily, DailySummary, ForecastError, ForecastSample, ForecastService};
use crate::geo::GeoService;
use crate::location::{Coordinates, LocationProvider};
use crate::store::{default_city, City, FileStorage, Language, WeatherStore};
use crate::weather::{WeatherData, WeatherError, WeatherService};

/// How long to wait for a position fix before falling back to the
/// default city.
pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(3);

/// Suggested interval between automatic refreshes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No city selected")]
    NoActiveCity,

    #[error("Weather fetch failed: {0}")]
    Weather(#[from] WeatherError),

    #[error("Forecast fetch failed: {0}")]
    Forecast(#[from] ForecastError),

    #[error("Failed to create HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Everything the dashboard renders for one city, from one refresh.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub city: City,
    pub weather: WeatherData,
    pub daily: Vec<DailySummary>,
    pub hourly: Vec<ForecastSample>,
    pub air: Option<AirSample>,
    pub fetched_at: DateTime<Utc>,
}

/// What a completed refresh did with its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fresh data applied; visible via [`DashboardSession::latest`].
    Updated,
    /// The selected city changed while the fetch was in flight; the
    /// results were discarded.
    Stale,
}

/// Single owner of the dashboard state. Share it behind an `Arc`; all
/// methods take `&self`.
pub struct DashboardSession {
    store: RwLock<WeatherStore>,
    weather: WeatherService,
    forecast: ForecastService,
    geo: GeoService,
    air: AirQualityService,
    generation: AtomicU64,
    latest: RwLock<Option<DashboardData>>,
    geolocation_timeout: Duration,
}

impl DashboardSession {
    pub fn new(
        store: WeatherStore,
        weather: WeatherService,
        forecast: ForecastService,
        geo: GeoService,
        air: AirQualityService,
    ) -> Self {
        Self {
            store: RwLock::new(store),
            weather,
            forecast,
            geo,
            air,
            generation: AtomicU64::new(0),
            latest: RwLock::new(None),
            geolocation_timeout: GEOLOCATION_TIMEOUT,
        }
    }

    /// Build a session from configuration: pooled HTTP client, one service
    /// per endpoint, file-backed preference store.
    pub async fn from_config(config: &ClimaConfig) -> Result<Self, SessionError> {
        let client = create_http_client(config)?;
        let api_key = config.openweathermap_api_key.as_str();

        let store = WeatherStore::open(Arc::new(FileStorage::new(&config.storage_dir))).await;

        Ok(Self::new(
            store,
            WeatherService::new(client.clone(), api_key, &config.base_url),
            ForecastService::new(client.clone(), api_key, &config.base_url),
            GeoService::new(client.clone(), api_key, &config.base_url),
            AirQualityService::new(client, api_key, &config.base_url),
        )
        .with_geolocation_timeout(config.geolocation_timeout()))
    }

    pub fn with_geolocation_timeout(mut self, timeout: Duration) -> Self {
        self.geolocation_timeout = timeout;
        self
    }

    /// Preference store. Switch cities through
    /// [`select_city`](DashboardSession::select_city) rather than writing
    /// `current_city` here, so in-flight refreshes get invalidated.
    pub fn store(&self) -> &RwLock<WeatherStore> {
        &self.store
    }

    /// Geocoding service, for driving a city search box.
    pub fn geo(&self) -> &GeoService {
        &self.geo
    }

    /// Pick the starting city. Tries the location provider with a bounded
    /// timeout and reverse-geocodes the fix; any failure falls back to the
    /// default city, so bootstrap always yields a usable city. Does nothing
    /// when a current city was already hydrated from storage.
    pub async fn bootstrap(&self, provider: &dyn LocationProvider) -> City {
        if let Some(city) = self.store.read().await.current_city().cloned() {
            tracing::debug!(city = %city.name, "Current city already set, skipping geolocation");
            return city;
        }

        let city = match tokio::time::timeout(self.geolocation_timeout, provider.current_position())
            .await
        {
            Ok(Ok(position)) => self.located_city(position).await,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Geolocation failed, using default city");
                default_city()
            }
            Err(_) => {
                tracing::warn!("Geolocation timed out, using default city");
                default_city()
            }
        };

        self.select_city(city.clone()).await;
        city
    }

    /// Make a city the active one and invalidate in-flight refreshes.
    pub async fn select_city(&self, city: City) {
        tracing::info!(city = %city.name, country = %city.country, "City selected");
        self.store.write().await.set_current_city(city);
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    /// Fetch dashboard data for the active city, serving cached payloads
    /// where they are still fresh.
    pub async fn refresh(&self) -> Result<RefreshOutcome, SessionError> {
        self.run_refresh(false).await
    }

    /// Fetch dashboard data for the active city, bypassing the payload
    /// caches. This is the user-initiated refresh button.
    pub async fn force_refresh(&self) -> Result<RefreshOutcome, SessionError> {
        self.run_refresh(true).await
    }

    async fn run_refresh(&self, force: bool) -> Result<RefreshOutcome, SessionError> {
        let (city, language) = {
            let store = self.store.read().await;
            match store.current_city().cloned() {
                Some(city) => (city, store.settings().language),
                None => return Err(SessionError::NoActiveCity),
            }
        };
        let generation = self.generation.load(Ordering::Relaxed);
        let lang = language.code();

        tracing::debug!(city = %city.name, force, "Refreshing dashboard");

        let (weather, forecast, air) = if force {
            tokio::join!(
                self.weather.refresh_current_weather(city.lat, city.lon, lang),
                self.forecast.refresh_forecast(city.lat, city.lon, lang),
                self.air.refresh_air_pollution(city.lat, city.lon),
            )
        } else {
            tokio::join!(
                self.weather.current_weather(city.lat, city.lon, lang),
                self.forecast.forecast(city.lat, city.lon, lang),
                self.air.air_pollution(city.lat, city.lon),
            )
        };

        let weather = weather?;
        let forecast = forecast?;
        // Air quality is an auxiliary panel; its outage degrades the
        // dashboard instead of failing the refresh.
        let air = match air {
            Ok(data) => data.list.into_iter().next(),
            Err(e) => {
                tracing::warn!(error = %e, "Air quality fetch failed, continuing without it");
                None
            }
        };

        let data = DashboardData {
            city,
            weather,
            daily: summarize_daily(&forecast.list),
            hourly: forecast.list,
            air,
            fetched_at: Utc::now(),
        };

        if self.generation.load(Ordering::Relaxed) != generation {
            tracing::debug!(city = %data.city.name, "City changed during refresh, discarding results");
            return Ok(RefreshOutcome::Stale);
        }

        tracing::info!(city = %data.city.name, "Dashboard refreshed");
        *self.latest.write().await = Some(data);
        Ok(RefreshOutcome::Updated)
    }

    /// Most recent successfully applied dashboard data. May lag the
    /// selected city until the next refresh completes.
    pub async fn latest(&self) -> Option<DashboardData> {
        self.latest.read().await.clone()
    }

    /// Interval for the embedding event loop's refresh timer, or `None`
    /// when the user disabled automatic refresh.
    pub async fn auto_refresh_interval(&self) -> Option<Duration> {
        if self.store.read().await.settings().auto_refresh {
            Some(REFRESH_INTERVAL)
        } else {
            None
        }
    }

    async fn located_city(&self, position: Coordinates) -> City {
        match self.geo.reverse_geocode(position.lat, position.lon).await {
            Ok(results) => match results.into_iter().next() {
                Some(found) => City {
                    name: found.name,
                    country: found.country,
                    lat: found.lat,
                    lon: found.lon,
                    state: found.state,
                },
                None => {
                    tracing::debug!("Reverse geocoding found no place, keeping coordinates");
                    let name = match self.store.read().await.settings().language {
                        Language::Es => "Tu ubicación",
                        Language::En => "Your location",
                    };
                    City {
                        name: name.to_string(),
                        country: String::new(),
                        lat: position.lat,
                        lon: position.lon,
                        state: None,
                    }
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Reverse geocoding failed, using default city");
                default_city()
            }
        }
    }
}
