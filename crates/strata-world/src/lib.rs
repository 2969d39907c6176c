//! # Strata World
//!
//! Infinite terrain streaming for Strata.
//!
//! This crate handles:
//! - Layered Perlin height field
//! - Terrain and water chunk meshing with gradient vertex colours
//! - Chunk storage with show/hide retention
//! - 3×3 neighbourhood streaming around an observer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod chunk;
pub mod config;
pub mod gradient;
pub mod height;
pub mod mesh;
pub mod store;
pub mod streaming;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::chunk::*;
    pub use crate::config::*;
    pub use crate::gradient::*;
    pub use crate::height::*;
    pub use crate::mesh::*;
    pub use crate::store::*;
    pub use crate::streaming::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use strata_common::ChunkCoord;

    #[test]
    fn test_walk_across_chunks() {
        let mut streaming = StreamingController::new(TerrainConfig {
            resolution: 8,
            ..TerrainConfig::default()
        })
        .expect("valid config");

        // (4, 4) -> (4, 4) -> (12, 4): 9 builds, none, then the new column.
        let built: Vec<usize> = [4.0, 4.0, 12.0]
            .into_iter()
            .map(|x| streaming.tick(Vec3::new(x, 0.0, 4.0)).created.len())
            .collect();
        assert_eq!(built, vec![9, 0, 3]);
        assert_eq!(streaming.last_chunk(), Some(ChunkCoord::new(8, 0)));
    }

    #[test]
    fn test_host_can_read_buffers() {
        let mut streaming =
            StreamingController::new(TerrainConfig::default()).expect("valid config");
        streaming.tick(Vec3::new(16.0, 10.0, 16.0));

        let store = streaming.store();
        let visible: Vec<_> = store.terrain_chunks().filter(|c| c.is_active()).collect();
        assert_eq!(visible.len(), 9);
        for chunk in visible {
            let vertices = chunk.mesh().vertices();
            assert_eq!(vertices.len(), 34 * 34);
            let water = store.water(chunk.coord()).expect("paired water");
            assert_eq!(water.mesh().vertex_count(), 4);
        }
    }
}
