//! Engine configuration.
//!
//! Wraps the terrain settings together with tick rate and the scripted
//! observer path. Configuration can be loaded from and saved to a TOML file.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use strata_common::{ConfigError, ConfigResult};
use strata_world::TerrainConfig;
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "strata.toml";

/// Scripted observer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Height the observer starts at (ignored by chunk math)
    pub start_height: f32,
    /// Travel speed in world units per second
    pub speed: f32,
    /// XZ waypoints visited in order after the spawn point
    pub path: Vec<Vec2>,
    /// Return to the first waypoint after the last
    pub looped: bool,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            start_height: 10.0,
            speed: 24.0,
            path: vec![
                Vec2::new(160.0, 16.0),
                Vec2::new(160.0, 160.0),
                Vec2::new(-96.0, 160.0),
                Vec2::new(16.0, 16.0),
            ],
            looped: true,
        }
    }
}

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Streaming evaluations per second
    pub tick_rate: u32,
    /// Ticks to run before exiting (0 = run forever)
    pub max_ticks: u64,
    /// Pace ticks in wall-clock time instead of running flat out
    pub realtime: bool,
    /// Scripted observer
    pub observer: ObserverConfig,
    /// Terrain generation and streaming
    pub terrain: TerrainConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            max_ticks: 1200,
            realtime: false,
            observer: ObserverConfig::default(),
            terrain: TerrainConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match Self::from_path(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config file {}: {e}", path.display());
                Self::default()
            },
        }
    }

    /// Load configuration from a path the caller requires to exist.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let mut contents = String::new();
        fs::File::open(path)?.read_to_string(&mut contents)?;

        let config = Self::from_toml_str(&contents)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialization(e.to_string()))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Check that the configuration can drive a session.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tick_rate == 0 || self.tick_rate > 1000 {
            return Err(ConfigError::InvalidSetting {
                name: "tick_rate",
                reason: format!("{} is outside 1..=1000", self.tick_rate),
            });
        }
        if !self.observer.speed.is_finite() || self.observer.speed < 0.0 {
            return Err(ConfigError::InvalidSetting {
                name: "observer.speed",
                reason: format!("{} is not a non-negative number", self.observer.speed),
            });
        }
        if self.observer.path.iter().any(|p| !p.is_finite()) {
            return Err(ConfigError::InvalidSetting {
                name: "observer.path",
                reason: "waypoints must be finite".to_string(),
            });
        }
        self.terrain.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_world::Retention;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.terrain.resolution, 32);
        assert_eq!(config.observer.start_height, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();
        config.tick_rate = 0;
        assert!(config.validate().is_err());

        config.tick_rate = 30;
        config.observer.speed = f32::INFINITY;
        assert!(config.validate().is_err());

        config.observer.speed = 5.0;
        config.terrain.resolution = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidResolution(0))));
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("strata.toml");

        let mut config = EngineConfig::default();
        config.tick_rate = 30;
        config.terrain.resolution = 16;
        config.terrain.retention = Retention::MaxChunks { limit: 40 };
        config.observer.path = vec![Vec2::new(1.0, 2.0)];

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/strata.toml");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_config_load_invalid_file_falls_back() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "tick_rate = \"fast\"").expect("write");

        let config = EngineConfig::load_from(&config_path);
        assert_eq!(config.tick_rate, 60);
    }

    #[test]
    fn test_from_path_reports_errors() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("missing.toml");
        assert!(matches!(EngineConfig::from_path(&missing), Err(ConfigError::Io(_))));

        let broken = temp_dir.path().join("broken.toml");
        fs::write(&broken, "tick_rate = \"fast\"").expect("write");
        assert!(matches!(EngineConfig::from_path(&broken), Err(ConfigError::Parse(_))));

        let good = temp_dir.path().join("good.toml");
        fs::write(&good, "max_ticks = 3").expect("write");
        let config = EngineConfig::from_path(&good).expect("load");
        assert_eq!(config.max_ticks, 3);
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            max_ticks = 10

            [observer]
            path = [[0.0, 0.0], [64.0, 0.0]]

            [terrain]
            resolution = 8
            "#,
        )
        .expect("parse");

        assert_eq!(config.max_ticks, 10);
        assert_eq!(config.observer.path.len(), 2);
        assert_eq!(config.observer.speed, 24.0);
        assert_eq!(config.terrain.resolution, 8);
        assert_eq!(config.terrain.water.depth_factor, 0.359);
    }
}
