//! Error types for Strata.

use thiserror::Error;

/// Configuration errors.
///
/// Streaming and meshing have no failure path of their own; everything that
/// can go wrong is caught when configuration is loaded and validated.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Chunk resolution must be between one cell and `MAX_RESOLUTION`
    #[error("Invalid resolution {0}: must be in 1..=65536")]
    InvalidResolution(u32),

    /// Noise octave parameter is NaN or infinite
    #[error("Invalid noise octave {index}: {reason}")]
    InvalidOctave {
        /// Octave index (0-based)
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// Gradient has no keys
    #[error("Gradient must have at least one key")]
    EmptyGradient,

    /// Gradient key outside [0, 1]
    #[error("Gradient key {0} outside [0, 1]")]
    GradientKeyOutOfRange(f32),

    /// Water depth factor is negative or not finite
    #[error("Invalid water depth factor {0}")]
    InvalidWaterDepth(f32),

    /// Engine setting out of range
    #[error("Invalid setting `{name}`: {reason}")]
    InvalidSetting {
        /// Setting name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Config text could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Config could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
