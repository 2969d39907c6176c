//! Colour ramp keyed by normalized height.

use serde::{Deserialize, Serialize};
use strata_common::{ConfigError, ConfigResult, Rgba};

/// A colour stop on the ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientKey {
    /// Position in [0, 1]
    pub position: f32,
    /// Colour at that position
    pub color: Rgba,
}

impl GradientKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(position: f32, color: Rgba) -> Self {
        Self { position, color }
    }
}

/// Ordered colour ramp over [0, 1], blended linearly between keys.
///
/// Always holds at least one key, sorted by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GradientKey>", into = "Vec<GradientKey>")]
pub struct Gradient {
    keys: Vec<GradientKey>,
}

impl Gradient {
    /// Builds a gradient, sorting keys by position.
    pub fn new(mut keys: Vec<GradientKey>) -> ConfigResult<Self> {
        if keys.is_empty() {
            return Err(ConfigError::EmptyGradient);
        }
        if let Some(bad) = keys.iter().find(|k| !(0.0..=1.0).contains(&k.position)) {
            return Err(ConfigError::GradientKeyOutOfRange(bad.position));
        }
        keys.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(Self { keys })
    }

    /// A single-colour gradient.
    #[must_use]
    pub fn solid(color: Rgba) -> Self {
        Self {
            keys: vec![GradientKey::new(0.0, color)],
        }
    }

    /// Colour at `t`. Values outside [0, 1] are clamped to the end keys.
    #[must_use]
    pub fn evaluate(&self, t: f32) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let upper = self.keys.partition_point(|k| k.position <= t);
        if upper == 0 {
            return self.keys[0].color;
        }
        if upper == self.keys.len() {
            return self.keys[upper - 1].color;
        }

        let lo = self.keys[upper - 1];
        let hi = self.keys[upper];
        let span = hi.position - lo.position;
        if span <= f32::EPSILON {
            return hi.color;
        }
        lo.color.lerp(hi.color, (t - lo.position) / span)
    }

    /// Returns the keys in position order.
    #[must_use]
    pub fn keys(&self) -> &[GradientKey] {
        &self.keys
    }
}

impl Default for Gradient {
    /// Water blue through sand, grass and rock up to snow.
    fn default() -> Self {
        Self {
            keys: vec![
                GradientKey::new(0.0, Rgba::rgb(0.10, 0.22, 0.45)),
                GradientKey::new(0.30, Rgba::rgb(0.84, 0.78, 0.55)),
                GradientKey::new(0.45, Rgba::rgb(0.30, 0.55, 0.20)),
                GradientKey::new(0.75, Rgba::rgb(0.45, 0.40, 0.35)),
                GradientKey::new(1.0, Rgba::WHITE),
            ],
        }
    }
}

impl TryFrom<Vec<GradientKey>> for Gradient {
    type Error = ConfigError;

    fn try_from(keys: Vec<GradientKey>) -> Result<Self, Self::Error> {
        Self::new(keys)
    }
}

impl From<Gradient> for Vec<GradientKey> {
    fn from(gradient: Gradient) -> Self {
        gradient.keys
    }
}
