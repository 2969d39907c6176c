//! # Strata Common
//!
//! Shared types for the Strata terrain streaming workspace:
//! - Chunk coordinate key and neighbourhood enumeration
//! - Vertex colour type
//! - Configuration error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod color;
pub mod coords;
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::*;
    pub use crate::coords::*;
    pub use crate::error::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_usable_as_map_key() {
        let mut map = std::collections::HashMap::new();
        map.insert(ChunkCoord::new(32, -64), "a");
        assert_eq!(map.get(&ChunkCoord::new(32, -64)), Some(&"a"));
        assert_eq!(map.get(&ChunkCoord::new(-64, 32)), None);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidResolution(0);
        assert_eq!(err.to_string(), "Invalid resolution 0: must be in 1..=65536");
    }
}
