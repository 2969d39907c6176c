//! Chunk mesh buffers and terrain mesh construction.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use strata_common::{ChunkCoord, Rgba};

use crate::gradient::Gradient;
use crate::height::HeightField;

/// Interleaved vertex for GPU upload.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct MeshVertex {
    /// World-space position
    pub position: [f32; 3],
    /// Unit normal
    pub normal: [f32; 3],
    /// Linear RGBA colour
    pub color: [f32; 4],
}

/// Vertex, index, colour and normal buffers for one chunk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Triangle list, three indices per triangle
    pub indices: Vec<u32>,
    /// One colour per vertex
    pub colors: Vec<Rgba>,
    /// One normal per vertex
    pub normals: Vec<Vec3>,
}

impl ChunkMesh {
    /// Assembles a mesh and derives its vertex normals.
    #[must_use]
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, colors: Vec<Rgba>) -> Self {
        let normals = compute_normals(&positions, &indices);
        Self {
            positions,
            indices,
            colors,
            normals,
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has no geometry yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Interleaves the buffers into upload-ready vertices.
    #[must_use]
    pub fn vertices(&self) -> Vec<MeshVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.colors)
            .map(|((p, n), c)| MeshVertex {
                position: p.to_array(),
                normal: n.to_array(),
                color: c.to_array(),
            })
            .collect()
    }
}

/// Per-vertex normals from triangle geometry.
///
/// Face normals are accumulated unnormalized, so larger faces weigh more.
/// Vertices with no usable incident face get +Y.
#[must_use]
pub fn compute_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (Some(&pa), Some(&pb), Some(&pc)) =
            (positions.get(a), positions.get(b), positions.get(c))
        else {
            continue;
        };
        let face = (pb - pa).cross(pc - pa);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    for n in &mut normals {
        *n = n.try_normalize().unwrap_or(Vec3::Y);
    }
    normals
}

/// Position of `value` between `a` and `b`, clamped to [0, 1].
///
/// Returns 0 when `a == b`.
#[must_use]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Triangle list for a `(resolution + 1)²` quad grid.
///
/// Vertex stride is `resolution + 2`. Quad with top-left vertex `v` becomes
/// `(v, v + stride, v + 1)` and `(v + 1, v + stride, v + stride + 1)`.
#[must_use]
pub fn grid_indices(resolution: u32) -> Vec<u32> {
    let quads = resolution + 1;
    let stride = resolution + 2;
    let mut indices = Vec::with_capacity((quads * quads * 6) as usize);

    for row in 0..quads {
        for col in 0..quads {
            let v = row * stride + col;
            indices.extend_from_slice(&[v, v + stride, v + 1, v + 1, v + stride, v + stride + 1]);
        }
    }
    indices
}

/// Output of one terrain build.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainBuild {
    /// Terrain mesh
    pub mesh: ChunkMesh,
    /// Lowest elevation seen, never above 0
    pub min_height: f32,
    /// Highest elevation seen, never below 0
    pub max_height: f32,
}

impl TerrainBuild {
    /// Absolute height span of this build.
    #[must_use]
    pub fn height_range(&self) -> f32 {
        (self.min_height - self.max_height).abs()
    }
}

/// Turns chunk coordinates into terrain meshes.
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    /// Elevation source
    height_field: HeightField,
    /// Vertex colour ramp
    gradient: Gradient,
    /// Chunk side length in cells
    resolution: u32,
}

impl MeshBuilder {
    /// Creates a builder.
    #[must_use]
    pub fn new(height_field: HeightField, gradient: Gradient, resolution: u32) -> Self {
        Self {
            height_field,
            gradient,
            resolution,
        }
    }

    /// Builds the terrain mesh for the chunk whose origin is `origin`.
    ///
    /// The grid runs one row and column past the chunk so that neighbouring
    /// chunks share their edge vertices exactly.
    #[must_use]
    pub fn build(&self, origin: ChunkCoord) -> TerrainBuild {
        let side = i64::from(self.resolution) + 2;
        let mut positions = Vec::with_capacity((side * side) as usize);

        // Bounds start at 0, not at the first sample, so every chunk's colour
        // range includes sea level.
        let mut min_height = 0.0_f32;
        let mut max_height = 0.0_f32;

        let (x0, z0) = (i64::from(origin.x), i64::from(origin.z));
        for z in z0..z0 + side {
            for x in x0..x0 + side {
                let (fx, fz) = (x as f32, z as f32);
                let y = self.height_field.height(fx, fz);
                if y > max_height {
                    max_height = y;
                }
                if y < min_height {
                    min_height = y;
                }
                positions.push(Vec3::new(fx, y, fz));
            }
        }

        let indices = grid_indices(self.resolution);
        let colors = positions
            .iter()
            .map(|p| self.gradient.evaluate(inverse_lerp(min_height, max_height, p.y)))
            .collect();

        TerrainBuild {
            mesh: ChunkMesh::new(positions, indices, colors),
            min_height,
            max_height,
        }
    }

    /// Returns the chunk resolution.
    #[must_use]
    pub const fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Returns the height field.
    #[must_use]
    pub const fn height_field(&self) -> &HeightField {
        &self.height_field
    }

    /// Returns the gradient.
    #[must_use]
    pub const fn gradient(&self) -> &Gradient {
        &self.gradient
    }
}
