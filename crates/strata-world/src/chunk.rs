//! Terrain and water chunk records.
//!
//! Both kinds are plain owned data: buffers, the coordinate they belong to and
//! a visibility flag. The store owns them; hosts only borrow.

use glam::Vec3;
use strata_common::{ChunkCoord, Rgba};

use crate::config::WaterSettings;
use crate::mesh::{ChunkMesh, TerrainBuild};

/// Elevation mesh for one chunk.
#[derive(Debug, Clone)]
pub struct TerrainChunk {
    /// Chunk origin
    coord: ChunkCoord,
    /// Mesh buffers (empty until populated)
    mesh: ChunkMesh,
    /// Lowest elevation of the build
    min_height: f32,
    /// Highest elevation of the build
    max_height: f32,
    /// Whether the host should display this chunk
    active: bool,
}

impl TerrainChunk {
    /// Creates an empty, hidden chunk.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            mesh: ChunkMesh::default(),
            min_height: 0.0,
            max_height: 0.0,
            active: false,
        }
    }

    /// Stores the result of a mesh build.
    pub fn apply(&mut self, build: TerrainBuild) {
        self.min_height = build.min_height;
        self.max_height = build.max_height;
        self.mesh = build.mesh;
    }

    /// Returns the chunk coordinate.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Returns the mesh buffers.
    #[must_use]
    pub const fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    /// Lowest elevation of the build.
    #[must_use]
    pub const fn min_height(&self) -> f32 {
        self.min_height
    }

    /// Highest elevation of the build.
    #[must_use]
    pub const fn max_height(&self) -> f32 {
        self.max_height
    }

    /// Whether the chunk has geometry.
    #[must_use]
    pub fn is_built(&self) -> bool {
        !self.mesh.is_empty()
    }

    /// Whether the chunk is shown.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Shows or hides the chunk.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

/// Flat water quad paired with a terrain chunk.
#[derive(Debug, Clone)]
pub struct WaterChunk {
    /// Chunk origin
    coord: ChunkCoord,
    /// Quad buffers (empty until populated)
    mesh: ChunkMesh,
    /// Surface height
    level: f32,
    /// Whether the host should display this chunk
    active: bool,
}

impl WaterChunk {
    /// Creates an empty, hidden water chunk.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            mesh: ChunkMesh::default(),
            level: 0.0,
            active: false,
        }
    }

    /// Lays the water surface for the given terrain height bounds.
    pub fn apply(
        &mut self,
        min_height: f32,
        max_height: f32,
        resolution: u32,
        settings: &WaterSettings,
    ) {
        self.level = water_level(min_height, max_height, settings.depth_factor);
        self.mesh = water_quad(self.coord, resolution, self.level, settings.color);
    }

    /// Returns the chunk coordinate.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Returns the quad buffers.
    #[must_use]
    pub const fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    /// Surface height above the terrain origin.
    #[must_use]
    pub const fn level(&self) -> f32 {
        self.level
    }

    /// Whether the chunk is shown.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Shows or hides the chunk.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

/// Water surface height for a terrain build's bounds.
#[must_use]
pub fn water_level(min_height: f32, max_height: f32, depth_factor: f32) -> f32 {
    (min_height - max_height).abs() * depth_factor
}

/// Flat quad over the chunk footprint at height `level`.
///
/// Corners are laid out as a 2×2 grid, wound like the terrain so the face
/// normal points up.
#[must_use]
pub fn water_quad(origin: ChunkCoord, resolution: u32, level: f32, color: Rgba) -> ChunkMesh {
    let x0 = origin.x as f32;
    let z0 = origin.z as f32;
    let x1 = x0 + resolution as f32;
    let z1 = z0 + resolution as f32;

    let positions = vec![
        Vec3::new(x0, level, z0),
        Vec3::new(x1, level, z0),
        Vec3::new(x0, level, z1),
        Vec3::new(x1, level, z1),
    ];
    let indices = vec![0, 2, 1, 1, 2, 3];
    let colors = vec![color; positions.len()];

    ChunkMesh::new(positions, indices, colors)
}
