//! Configuration file support for Mapty.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/mapty/config.toml`.

use crate::{Coordinates, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Highest zoom level accepted by the map view
pub const MAX_ZOOM: u8 = 20;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub map: MapConfig,
}

/// Persistence configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Key the workout blob is stored under
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key: default_key(),
        }
    }
}

/// Map view configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_zoom_level")]
    pub zoom_level: u8,

    /// Starting position used in place of device geolocation
    #[serde(default)]
    pub home: Option<Coordinates>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom_level: default_zoom_level(),
            home: None,
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("mapty")
}

fn default_key() -> String {
    "workouts".into()
}

fn default_zoom_level() -> u8 {
    13
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("mapty").join("config.toml")
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.map.zoom_level > MAX_ZOOM {
            return Err(Error::Config(format!(
                "map.zoom_level must be at most {}, got {}",
                MAX_ZOOM, self.map.zoom_level
            )));
        }
        if let Some(home) = self.map.home {
            if !home.is_finite() {
                return Err(Error::Config("map.home must be finite".into()));
            }
        }
        if self.storage.key.trim().is_empty() {
            return Err(Error::Config("storage.key must not be empty".into()));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
