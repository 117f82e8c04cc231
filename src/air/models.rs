use serde::{Deserialize, Serialize};

use crate::store::Language;

// ============================================================================
// Air Pollution API Response (/data/2.5/air_pollution)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirPollutionData {
    pub list: Vec<AirSample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirSample {
    /// Measurement time, Unix seconds UTC.
    pub dt: i64,
    pub main: AqiMain,
    pub components: PollutantConcentrations,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AqiMain {
    /// Air quality index, 1 (good) to 5 (very poor).
    pub aqi: u8,
}

/// Pollutant concentrations in μg/m³.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollutantConcentrations {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}

impl AirSample {
    pub fn level(&self) -> AqiLevel {
        AqiLevel::from_index(self.main.aqi)
    }
}

/// The five bands of the OpenWeatherMap air quality index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl AqiLevel {
    /// Band for an index value. Out-of-range values fall back to `Good`,
    /// mirroring how the index is documented as always 1 to 5.
    pub fn from_index(aqi: u8) -> Self {
        match aqi {
            2 => AqiLevel::Fair,
            3 => AqiLevel::Moderate,
            4 => AqiLevel::Poor,
            5 => AqiLevel::VeryPoor,
            _ => AqiLevel::Good,
        }
    }

    pub fn label(&self, lang: Language) -> &'static str {
        match (self, lang) {
            (AqiLevel::Good, Language::Es) => "Bueno",
            (AqiLevel::Good, Language::En) => "Good",
            (AqiLevel::Fair, Language::Es) => "Aceptable",
            (AqiLevel::Fair, Language::En) => "Fair",
            (AqiLevel::Moderate, Language::Es) => "Moderado",
            (AqiLevel::Moderate, Language::En) => "Moderate",
            (AqiLevel::Poor, Language::Es) => "Malo",
            (AqiLevel::Poor, Language::En) => "Poor",
            (AqiLevel::VeryPoor, Language::Es) => "Muy Malo",
            (AqiLevel::VeryPoor, Language::En) => "Very Poor",
        }
    }

    pub fn description(&self, lang: Language) -> &'static str {
        match (self, lang) {
            (AqiLevel::Good, Language::Es) => "Calidad del aire satisfactoria",
            (AqiLevel::Good, Language::En) => "Air quality is satisfactory",
            (AqiLevel::Fair, Language::Es) => "Calidad aceptable para la mayoría",
            (AqiLevel::Fair, Language::En) => "Acceptable quality for most people",
            (AqiLevel::Moderate, Language::Es) => "Grupos sensibles deben limitar exposición",
            (AqiLevel::Moderate, Language::En) => "Sensitive groups should limit exposure",
            (AqiLevel::Poor, Language::Es) => "Efectos adversos posibles en la salud",
            (AqiLevel::Poor, Language::En) => "Adverse health effects possible",
            (AqiLevel::VeryPoor, Language::Es) => "Condiciones de emergencia de salud",
            (AqiLevel::VeryPoor, Language::En) => "Health emergency conditions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aqi_bands() {
        assert_eq!(AqiLevel::from_index(1), AqiLevel::Good);
        assert_eq!(AqiLevel::from_index(2), AqiLevel::Fair);
        assert_eq!(AqiLevel::from_index(3), AqiLevel::Moderate);
        assert_eq!(AqiLevel::from_index(4), AqiLevel::Poor);
        assert_eq!(AqiLevel::from_index(5), AqiLevel::VeryPoor);
    }

    #[test]
    fn test_out_of_range_index_falls_back_to_good() {
        assert_eq!(AqiLevel::from_index(0), AqiLevel::Good);
        assert_eq!(AqiLevel::from_index(9), AqiLevel::Good);
    }

    #[test]
    fn test_labels_are_bilingual() {
        assert_eq!(AqiLevel::Moderate.label(Language::Es), "Moderado");
        assert_eq!(AqiLevel::Moderate.label(Language::En), "Moderate");
        assert_eq!(
            AqiLevel::VeryPoor.description(Language::Es),
            "Condiciones de emergencia de salud"
        );
    }
}
