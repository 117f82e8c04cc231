use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Geocoding API Response (/geo/1.0/direct and /geo/1.0/reverse)
// ============================================================================

/// One match returned by the geocoding endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoCity {
    pub name: String,
    /// Localized spellings keyed by two-letter language code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_names: Option<HashMap<String, String>>,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl GeoCity {
    /// Localized name for `lang`, falling back to the canonical name.
    pub fn localized_name(&self, lang: &str) -> &str {
        self.local_names
            .as_ref()
            .and_then(|names| names.get(lang))
            .map(String::as_str)
            .unwrap_or(&self.name)
    }
}
