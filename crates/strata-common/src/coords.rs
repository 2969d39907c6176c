//! Chunk coordinate key.
//!
//! Chunk coordinates are expressed in world units: a chunk's key is the world
//! position of its origin corner, so both components are always multiples of
//! the configured resolution.
//!
//! Chunk origins are clamped to [`WORLD_LIMIT`] on each axis. Observers past
//! the limit keep seeing the last chunk before it, and every neighbour and
//! mesh sample of a clamped chunk still fits in `i32`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Origin corner of a chunk on the XZ plane.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChunkCoord {
    /// X of the origin corner in world units
    pub x: i32,
    /// Z of the origin corner in world units
    pub z: i32,
}

/// Largest chunk origin magnitude on either axis, in world units.
pub const WORLD_LIMIT: i32 = 1 << 30;

/// Largest supported chunk resolution.
pub const MAX_RESOLUTION: u32 = 1 << 16;

/// Neighbour offsets in chunk cells: center, E, NE, N, NW, W, SW, S, SE.
pub const NEIGHBORHOOD_OFFSETS: [(i32, i32); 9] = [
    (0, 0),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the chunk containing the world point `(x, z)`.
    ///
    /// Uses floor division so negative positions land in the chunk below them.
    /// The result is clamped to the aligned origins within [`WORLD_LIMIT`].
    #[must_use]
    pub fn containing(x: f32, z: f32, resolution: u32) -> Self {
        Self {
            x: containing_origin(x, resolution),
            z: containing_origin(z, resolution),
        }
    }

    /// Returns the chunk containing a 3D position. `y` is ignored.
    #[must_use]
    pub fn from_position(position: Vec3, resolution: u32) -> Self {
        Self::containing(position.x, position.z, resolution)
    }

    /// Offsets this coordinate by whole chunks.
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32, resolution: u32) -> Self {
        let res = resolution as i32;
        Self {
            x: self.x.saturating_add(dx.saturating_mul(res)),
            z: self.z.saturating_add(dz.saturating_mul(res)),
        }
    }

    /// The 3×3 neighbourhood around this chunk, center first.
    #[must_use]
    pub fn neighborhood(self, resolution: u32) -> [Self; 9] {
        NEIGHBORHOOD_OFFSETS.map(|(dx, dz)| self.offset(dx, dz, resolution))
    }

    /// Distance to `other` in whole chunks (Chebyshev metric).
    #[must_use]
    pub fn chunk_distance(self, other: Self, resolution: u32) -> u32 {
        let res = i64::from(resolution.max(1));
        let dx = (i64::from(self.x) - i64::from(other.x)).abs() / res;
        let dz = (i64::from(self.z) - i64::from(other.z)).abs() / res;
        dx.max(dz) as u32
    }

    /// Whether both components are multiples of `resolution`.
    #[must_use]
    pub const fn is_aligned(self, resolution: u32) -> bool {
        let res = resolution as i32;
        res > 0 && self.x % res == 0 && self.z % res == 0
    }
}

/// Aligned origin of the chunk cell containing `v` on one axis.
fn containing_origin(v: f32, resolution: u32) -> i32 {
    let res = i64::from(resolution.max(1));
    let max_cell = i64::from(WORLD_LIMIT) / res;
    // Float-to-int casts saturate and send NaN to 0.
    let cell = (f64::from(v) / res as f64).floor() as i64;
    (cell.clamp(-max_cell, max_cell) * res) as i32
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}
