//! Tool settings passed in from the JS side as JSON.
//!
//! Every field has a default, so `{}` (or an empty string) is a complete
//! config and the page only needs to send what it overrides.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

pub const DEFAULT_OVERPASS_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolConfig {
    /// Building lookup radius around a search hit, in metres.
    pub search_radius_m: f64,
    /// Server-side timeout written into the Overpass query, in seconds.
    pub overpass_timeout_s: u32,
    pub overpass_endpoint: String,
    /// ISO country filter for forward geocoding.
    pub geocode_country: String,
    pub geocode_limit: u32,
    /// Camera zoom after flying to a search hit.
    pub search_zoom: f64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            search_radius_m: 100.0,
            overpass_timeout_s: 25,
            overpass_endpoint: DEFAULT_OVERPASS_ENDPOINT.to_string(),
            geocode_country: "GB".to_string(),
            geocode_limit: 1,
            search_zoom: 18.0,
        }
    }
}

impl ToolConfig {
    /// Parses a config, falling back to defaults for absent fields.
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ToolConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), InputError> {
        if !self.search_radius_m.is_finite() || self.search_radius_m <= 0.0 {
            return Err(InputError::InvalidConfig {
                field: "searchRadiusM",
                value: self.search_radius_m,
            });
        }
        if !self.search_zoom.is_finite() || self.search_zoom < 0.0 {
            return Err(InputError::InvalidConfig {
                field: "searchZoom",
                value: self.search_zoom,
            });
        }
        Ok(())
    }
}
