//! Terrain configuration.
//!
//! Set once at startup; nothing here is hot-reloaded.

use serde::{Deserialize, Serialize};
use strata_common::{ConfigError, ConfigResult, Rgba, MAX_RESOLUTION};

use crate::gradient::Gradient;
use crate::height::{NoiseOctave, DEFAULT_OCTAVES};
use crate::store::Retention;

/// Default chunk side length in cells.
pub const DEFAULT_RESOLUTION: u32 = 32;

/// Default water height as a fraction of a chunk's height span.
///
/// Tuned by eye; an earlier revision of the terrain used 0.356.
pub const DEFAULT_WATER_DEPTH_FACTOR: f32 = 0.359;

/// Water surface parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterSettings {
    /// Water height as a fraction of the terrain chunk's height span
    pub depth_factor: f32,
    /// Vertex colour of the water quad
    pub color: Rgba,
}

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            depth_factor: DEFAULT_WATER_DEPTH_FACTOR,
            color: Rgba::new(0.15, 0.35, 0.65, 0.8),
        }
    }
}

/// Terrain generation and streaming parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Chunk side length in cells, also the noise normalization divisor
    pub resolution: u32,
    /// Perlin seed
    pub seed: u32,
    /// Noise-space pan on X
    pub x_offset: i32,
    /// Noise-space pan on Z
    pub z_offset: i32,
    /// Noise layers
    pub octaves: [NoiseOctave; 3],
    /// Water surface parameters
    pub water: WaterSettings,
    /// Vertex colour ramp over normalized height
    pub gradient: Gradient,
    /// Which hidden chunks the store may drop
    pub retention: Retention,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            seed: 0,
            x_offset: 0,
            z_offset: 0,
            octaves: DEFAULT_OCTAVES,
            water: WaterSettings::default(),
            gradient: Gradient::default(),
            retention: Retention::default(),
        }
    }
}

impl TerrainConfig {
    /// Checks that the configuration can drive a streaming session.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.resolution == 0 || self.resolution > MAX_RESOLUTION {
            return Err(ConfigError::InvalidResolution(self.resolution));
        }

        for (index, octave) in self.octaves.iter().enumerate() {
            if !octave.scale.is_finite() {
                return Err(ConfigError::InvalidOctave {
                    index,
                    reason: format!("scale {} is not finite", octave.scale),
                });
            }
            if !octave.amplitude.is_finite() {
                return Err(ConfigError::InvalidOctave {
                    index,
                    reason: format!("amplitude {} is not finite", octave.amplitude),
                });
            }
        }

        let depth = self.water.depth_factor;
        if !depth.is_finite() || depth < 0.0 {
            return Err(ConfigError::InvalidWaterDepth(depth));
        }

        self.retention.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TerrainConfig::default();
        assert_eq!(config.resolution, 32);
        assert_eq!(config.octaves[1], NoiseOctave::new(2.0, 0.5));
        assert_eq!(config.water.depth_factor, 0.359);
        assert_eq!(config.retention, Retention::RetainAll);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = TerrainConfig {
            resolution: 0,
            ..TerrainConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidResolution(0))));

        config.resolution = MAX_RESOLUTION + 1;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidResolution(_))));

        config.resolution = 16;
        config.octaves[2].amplitude = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOctave { index: 2, .. })
        ));

        config.octaves = DEFAULT_OCTAVES;
        config.water.depth_factor = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWaterDepth(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TerrainConfig = toml::from_str(
            r#"
            resolution = 16
            x_offset = 100

            [water]
            depth_factor = 0.356

            [retention]
            policy = "max_chunks"
            limit = 64
            "#,
        )
        .expect("parse terrain config");

        assert_eq!(config.resolution, 16);
        assert_eq!(config.x_offset, 100);
        assert_eq!(config.z_offset, 0);
        assert_eq!(config.octaves, DEFAULT_OCTAVES);
        assert_eq!(config.water.depth_factor, 0.356);
        assert_eq!(config.retention, Retention::MaxChunks { limit: 64 });
        assert_eq!(config.gradient, Gradient::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = TerrainConfig {
            seed: 7,
            ..TerrainConfig::default()
        };
        let text = toml::to_string_pretty(&config).expect("serialize");
        let loaded: TerrainConfig = toml::from_str(&text).expect("parse");
        assert_eq!(loaded, config);
    }
}
