use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{info, warn};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub map: MapConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,     // Root of the geolocation API
    pub timeout_seconds: u64, // Per-request timeout
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MapConfig {
    pub fallback_lat: f64, // Map center before any location is known
    pub fallback_lon: f64,
    pub single_span_deg: f64, // Viewport half-width when only one marker exists
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig {
                base_url: "https://briefbuletin-api.onrender.com".to_string(),
                timeout_seconds: 10,
            },
            map: MapConfig {
                fallback_lat: 23.8103,
                fallback_lon: 90.4125,
                single_span_deg: 20.0,
            },
        }
    }
}

impl Config {
    /// Loads config.toml from the root directory.
    /// If it doesn't exist, creates a default one.
    pub fn load() -> Self {
        let config_path = "config.toml";

        if let Ok(content) = fs::read_to_string(config_path) {
            match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => warn!("Failed to parse config.toml: {}. Using defaults.", e),
            }
        }

        let default_config = Config::default();

        // Save default config to disk for the user to edit later
        let toml_string = toml::to_string_pretty(&default_config).unwrap();
        if fs::write(config_path, toml_string).is_err() {
            warn!("Could not write default config.toml to disk.");
        }

        info!("Loaded default configuration.");
        default_config
    }
}
