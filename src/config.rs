use std::path::Path;

use serde::{Deserialize, Serialize};

/// Looked up in the working directory at start-up.
pub const CONFIG_FILE_NAME: &str = "sensor-dashboard.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Display and export settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Export file names are `<prefix>_<valueColumn>_<YYYYMMDD>.csv`.
    pub export_prefix: String,
    /// Rows shown in the cleaned-data preview.
    pub preview_rows: usize,
    /// Decimals for headline metrics and slider labels.
    pub display_decimals: usize,
    /// Decimals for the statistics table.
    pub stats_decimals: u32,
    pub site: SiteInfo,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            export_prefix: "datos_filtrados".to_string(),
            preview_rows: 10,
            display_decimals: 2,
            stats_decimals: 3,
            site: SiteInfo::default(),
        }
    }
}

/// Measurement site shown on the info tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f64,
    pub sensor: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Universidad EAFIT".to_string(),
            latitude: 6.2006,
            longitude: -75.5783,
            altitude_m: 1495.0,
            sensor: "ESP32".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Load from `path`, falling back to defaults when the file is absent or
    /// unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Cannot read {}: {e}; using defaults", path.display());
                return Self::default();
            }
        };
        match Self::from_json(&text) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }
}
