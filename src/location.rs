//! Device location abstraction. The crate never talks to positioning
//! hardware itself; callers plug in whatever source they have.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::Language;

/// A position fix in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location unavailable")]
    Unavailable,
    #[error("location request timed out")]
    Timeout,
}

impl LocationError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self, language: Language) -> &'static str {
        match (self, language) {
            (LocationError::PermissionDenied, Language::Es) => "Permiso de ubicación denegado",
            (LocationError::PermissionDenied, Language::En) => "Location permission denied",
            (LocationError::Unavailable, Language::Es) => "Ubicación no disponible",
            (LocationError::Unavailable, Language::En) => "Location unavailable",
            (LocationError::Timeout, Language::Es) => "Tiempo de espera agotado",
            (LocationError::Timeout, Language::En) => "Location request timed out",
        }
    }
}

/// Source of the device's current position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Provider that always reports the same position. Useful for kiosks and
/// deployments with a known fixed location.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_localized() {
        assert_eq!(
            LocationError::PermissionDenied.user_message(Language::Es),
            "Permiso de ubicación denegado"
        );
        assert_eq!(
            LocationError::Timeout.user_message(Language::En),
            "Location request timed out"
        );
    }

    #[tokio::test]
    async fn test_fixed_location_reports_its_position() {
        let provider = FixedLocation(Coordinates { lat: 10.4806, lon: -66.9036 });

        let position = provider.current_position().await.unwrap();

        assert_eq!(position.lat, 10.4806);
        assert_eq!(position.lon, -66.9036);
    }
}
