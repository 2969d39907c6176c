//! Layered Perlin height field.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::config::TerrainConfig;

/// One noise layer: frequency multiplier and amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseOctave {
    /// Frequency multiplier applied to normalized coordinates
    pub scale: f32,
    /// Weight of this layer in the summed height
    pub amplitude: f32,
}

impl NoiseOctave {
    /// Creates an octave.
    #[must_use]
    pub const fn new(scale: f32, amplitude: f32) -> Self {
        Self { scale, amplitude }
    }
}

/// Default octaves: each doubles frequency and halves amplitude.
pub const DEFAULT_OCTAVES: [NoiseOctave; 3] = [
    NoiseOctave::new(1.0, 1.0),
    NoiseOctave::new(2.0, 0.5),
    NoiseOctave::new(4.0, 0.25),
];

/// Deterministic elevation function over the XZ plane.
///
/// Octave `i` contributes
/// `amplitude_i * noise(x / resolution * scale_i + x_offset, z / resolution * scale_i + z_offset)`
/// and the height is the plain sum of the three contributions. Noise samples
/// are remapped and clamped into [0, 1]. Nothing is cached.
#[derive(Debug, Clone)]
pub struct HeightField {
    /// Coherent noise source
    noise: Perlin,
    /// Normalization divisor (chunk resolution)
    resolution: f64,
    /// Octave layers
    octaves: [NoiseOctave; 3],
    /// Noise-space pan on X
    x_offset: f64,
    /// Noise-space pan on Z
    z_offset: f64,
}

impl HeightField {
    /// Creates a height field from terrain configuration.
    #[must_use]
    pub fn new(config: &TerrainConfig) -> Self {
        Self {
            noise: Perlin::new(config.seed),
            resolution: f64::from(config.resolution.max(1)),
            octaves: config.octaves,
            x_offset: f64::from(config.x_offset),
            z_offset: f64::from(config.z_offset),
        }
    }

    /// Creates a height field with default octaves and no offset.
    #[must_use]
    pub fn with_resolution(resolution: u32) -> Self {
        Self::new(&TerrainConfig {
            resolution,
            ..TerrainConfig::default()
        })
    }

    /// Elevation at world position `(x, z)`.
    #[must_use]
    pub fn height(&self, x: f32, z: f32) -> f32 {
        let nx = f64::from(x) / self.resolution;
        let nz = f64::from(z) / self.resolution;

        let total: f64 = self
            .octaves
            .iter()
            .map(|octave| {
                let scale = f64::from(octave.scale);
                let sample = self.sample(nx * scale + self.x_offset, nz * scale + self.z_offset);
                f64::from(octave.amplitude) * sample
            })
            .sum();

        total as f32
    }

    /// Returns the octave layers.
    #[must_use]
    pub const fn octaves(&self) -> &[NoiseOctave; 3] {
        &self.octaves
    }

    /// Perlin noise remapped from [-1, 1] to [0, 1].
    fn sample(&self, x: f64, z: f64) -> f64 {
        ((self.noise.get([x, z]) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn flat_config(resolution: u32) -> TerrainConfig {
        TerrainConfig {
            resolution,
            octaves: [NoiseOctave::new(1.0, 0.0); 3],
            ..TerrainConfig::default()
        }
    }

    #[test]
    fn test_zero_amplitude_is_flat() {
        let field = HeightField::new(&flat_config(4));
        for x in -8..8 {
            for z in -8..8 {
                assert_eq!(field.height(x as f32, z as f32), 0.0);
            }
        }
    }

    #[test]
    fn test_height_bounded_by_amplitudes() {
        let field = HeightField::with_resolution(32);
        assert_eq!(field.octaves(), &DEFAULT_OCTAVES);
        let max: f32 = field.octaves().iter().map(|o| o.amplitude).sum();
        for i in 0..200 {
            let h = field.height(i as f32 * 3.7, i as f32 * -1.3);
            assert!((0.0..=max).contains(&h), "height {h} out of range");
        }
    }

    #[test]
    fn test_offset_pans_field() {
        let base = HeightField::with_resolution(16);
        let panned = HeightField::new(&TerrainConfig {
            resolution: 16,
            x_offset: 7,
            ..TerrainConfig::default()
        });
        let differs = (0..32).any(|i| {
            let x = i as f32 * 2.5 + 0.3;
            base.height(x, 5.1) != panned.height(x, 5.1)
        });
        assert!(differs);
    }

    #[test]
    fn test_different_seeds_different_terrain() {
        let a = HeightField::new(&TerrainConfig {
            seed: 42,
            ..TerrainConfig::default()
        });
        let b = HeightField::new(&TerrainConfig {
            seed: 999,
            ..TerrainConfig::default()
        });
        let differs = (0..64).any(|i| {
            let x = i as f32 * 1.7 + 0.5;
            a.height(x, x * 0.5) != b.height(x, x * 0.5)
        });
        assert!(differs);
    }

    proptest! {
        #[test]
        fn height_is_deterministic(x in -1.0e5f32..1.0e5, z in -1.0e5f32..1.0e5) {
            let a = HeightField::with_resolution(32);
            let b = HeightField::with_resolution(32);
            prop_assert_eq!(a.height(x, z).to_bits(), b.height(x, z).to_bits());
            prop_assert_eq!(a.height(x, z).to_bits(), a.height(x, z).to_bits());
        }
    }
}
