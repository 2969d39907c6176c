//! Chunk storage with create-on-miss / show-on-hit semantics.
//!
//! Terrain and water chunks live in two maps keyed by the same coordinate and
//! are always inserted and removed together. Chunks that leave the
//! neighbourhood are hidden, not freed; whether hidden chunks are ever
//! dropped is decided by an [`EvictionPolicy`].

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use strata_common::{ChunkCoord, ConfigError, ConfigResult};
use tracing::debug;

use crate::chunk::{TerrainChunk, WaterChunk};
use crate::config::WaterSettings;
use crate::mesh::TerrainBuild;

/// Chunks in one neighbourhood; the smallest sensible retention limit.
pub const NEIGHBORHOOD_SIZE: usize = 9;

/// Result of [`ChunkStore::lookup_or_create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Both chunks existed and are now active
    Found,
    /// Both chunks were allocated and must be populated by the caller
    Created,
}

impl Lookup {
    /// Whether the chunks were allocated by this lookup.
    #[must_use]
    pub const fn was_created(self) -> bool {
        matches!(self, Self::Created)
    }
}

/// What an eviction policy gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct EvictionContext<'a> {
    /// Chunk the observer currently occupies
    pub center: ChunkCoord,
    /// Chunk side length
    pub resolution: u32,
    /// Chunk pairs currently resident
    pub resident: usize,
    /// Resident chunks that are hidden, in coordinate order
    pub inactive: &'a [ChunkCoord],
}

/// Chooses which hidden chunks the store drops.
pub trait EvictionPolicy: std::fmt::Debug + Send {
    /// Coordinates to evict. Anything not in `ctx.inactive` is ignored.
    fn select(&self, ctx: &EvictionContext<'_>) -> Vec<ChunkCoord>;
}

/// Keeps every chunk for the lifetime of the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetainAll;

impl EvictionPolicy for RetainAll {
    fn select(&self, _ctx: &EvictionContext<'_>) -> Vec<ChunkCoord> {
        Vec::new()
    }
}

/// Caps resident chunk pairs, dropping hidden chunks farthest from the
/// observer first.
#[derive(Debug, Clone, Copy)]
pub struct MaxChunks {
    /// Maximum resident chunk pairs
    pub limit: usize,
}

impl EvictionPolicy for MaxChunks {
    fn select(&self, ctx: &EvictionContext<'_>) -> Vec<ChunkCoord> {
        if ctx.resident <= self.limit {
            return Vec::new();
        }
        let excess = ctx.resident - self.limit;

        let mut candidates = ctx.inactive.to_vec();
        // Farthest first; coordinate order breaks ties deterministically.
        candidates.sort_by(|a, b| {
            let da = a.chunk_distance(ctx.center, ctx.resolution);
            let db = b.chunk_distance(ctx.center, ctx.resolution);
            db.cmp(&da).then_with(|| a.cmp(b))
        });
        candidates.truncate(excess);
        candidates
    }
}

/// Serializable choice of eviction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Retention {
    /// Never evict
    #[default]
    RetainAll,
    /// Keep at most `limit` chunk pairs
    MaxChunks {
        /// Maximum resident chunk pairs
        limit: usize,
    },
}

impl Retention {
    /// Checks the policy parameters.
    pub fn validate(&self) -> ConfigResult<()> {
        match *self {
            Self::RetainAll => Ok(()),
            Self::MaxChunks { limit } if limit < NEIGHBORHOOD_SIZE => {
                Err(ConfigError::InvalidSetting {
                    name: "retention.limit",
                    reason: format!("{limit} is below the neighbourhood size {NEIGHBORHOOD_SIZE}"),
                })
            },
            Self::MaxChunks { .. } => Ok(()),
        }
    }

    /// Instantiates the policy.
    #[must_use]
    pub fn into_policy(self) -> Box<dyn EvictionPolicy> {
        match self {
            Self::RetainAll => Box::new(RetainAll),
            Self::MaxChunks { limit } => Box::new(MaxChunks { limit }),
        }
    }
}

/// Owns every terrain and water chunk.
#[derive(Debug)]
pub struct ChunkStore {
    /// Terrain chunks by origin
    terrain: AHashMap<ChunkCoord, TerrainChunk>,
    /// Water chunks by origin
    water: AHashMap<ChunkCoord, WaterChunk>,
    /// Retention rule for hidden chunks
    policy: Box<dyn EvictionPolicy>,
}

impl Default for ChunkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkStore {
    /// Creates a store that never evicts.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(Box::new(RetainAll))
    }

    /// Creates a store with a custom eviction policy.
    #[must_use]
    pub fn with_policy(policy: Box<dyn EvictionPolicy>) -> Self {
        Self {
            terrain: AHashMap::new(),
            water: AHashMap::new(),
            policy,
        }
    }

    /// Shows the chunks at `coord`, allocating them if they do not exist.
    ///
    /// Newly allocated chunks are empty and hidden until [`Self::populate`].
    pub fn lookup_or_create(&mut self, coord: ChunkCoord) -> Lookup {
        if let (Some(terrain), Some(water)) =
            (self.terrain.get_mut(&coord), self.water.get_mut(&coord))
        {
            terrain.set_active(true);
            water.set_active(true);
            return Lookup::Found;
        }

        self.terrain.insert(coord, TerrainChunk::new(coord));
        self.water.insert(coord, WaterChunk::new(coord));
        Lookup::Created
    }

    /// Writes a terrain build into the chunks at `coord` and shows them.
    ///
    /// The water surface is derived from the same build's height bounds.
    /// Returns `false` if `coord` is unknown.
    pub fn populate(
        &mut self,
        coord: ChunkCoord,
        build: TerrainBuild,
        resolution: u32,
        water_settings: &WaterSettings,
    ) -> bool {
        let (Some(terrain), Some(water)) =
            (self.terrain.get_mut(&coord), self.water.get_mut(&coord))
        else {
            return false;
        };

        water.apply(build.min_height, build.max_height, resolution, water_settings);
        terrain.apply(build);
        terrain.set_active(true);
        water.set_active(true);
        true
    }

    /// Hides the chunks at `coord`. Unknown coordinates are ignored.
    pub fn set_inactive(&mut self, coord: ChunkCoord) {
        if let Some(terrain) = self.terrain.get_mut(&coord) {
            terrain.set_active(false);
        }
        if let Some(water) = self.water.get_mut(&coord) {
            water.set_active(false);
        }
    }

    /// Hides every chunk.
    pub fn set_all_inactive(&mut self) {
        for terrain in self.terrain.values_mut() {
            terrain.set_active(false);
        }
        for water in self.water.values_mut() {
            water.set_active(false);
        }
    }

    /// Drops hidden chunks chosen by the eviction policy.
    ///
    /// Returns the evicted coordinates. Active chunks are never dropped.
    pub fn evict(&mut self, center: ChunkCoord, resolution: u32) -> Vec<ChunkCoord> {
        let mut inactive: Vec<ChunkCoord> = self
            .terrain
            .values()
            .filter(|c| !c.is_active())
            .map(TerrainChunk::coord)
            .collect();
        if inactive.is_empty() {
            return Vec::new();
        }
        inactive.sort_unstable();

        let ctx = EvictionContext {
            center,
            resolution,
            resident: self.terrain.len(),
            inactive: &inactive,
        };
        let mut evicted = self.policy.select(&ctx);
        evicted.retain(|coord| inactive.binary_search(coord).is_ok());

        for coord in &evicted {
            self.terrain.remove(coord);
            self.water.remove(coord);
            debug!("Evicted chunk {coord}");
        }
        evicted
    }

    /// Borrows the terrain chunk at `coord`.
    #[must_use]
    pub fn terrain(&self, coord: ChunkCoord) -> Option<&TerrainChunk> {
        self.terrain.get(&coord)
    }

    /// Borrows the water chunk at `coord`.
    #[must_use]
    pub fn water(&self, coord: ChunkCoord) -> Option<&WaterChunk> {
        self.water.get(&coord)
    }

    /// Whether chunks exist at `coord`.
    #[must_use]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.terrain.contains_key(&coord) && self.water.contains_key(&coord)
    }

    /// Number of resident chunk pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terrain.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terrain.is_empty()
    }

    /// Coordinates of shown chunks, sorted.
    #[must_use]
    pub fn active_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self
            .terrain
            .values()
            .filter(|c| c.is_active())
            .map(TerrainChunk::coord)
            .collect();
        coords.sort_unstable();
        coords
    }

    /// Iterates over all terrain chunks.
    pub fn terrain_chunks(&self) -> impl Iterator<Item = &TerrainChunk> {
        self.terrain.values()
    }

    /// Iterates over all water chunks.
    pub fn water_chunks(&self) -> impl Iterator<Item = &WaterChunk> {
        self.water.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::ChunkMesh;
    use glam::Vec3;
    use strata_common::Rgba;

    fn dummy_build(min_height: f32, max_height: f32) -> TerrainBuild {
        TerrainBuild {
            mesh: ChunkMesh::new(
                vec![Vec3::ZERO, Vec3::Z, Vec3::X],
                vec![0, 1, 2],
                vec![Rgba::WHITE; 3],
            ),
            min_height,
            max_height,
        }
    }

    #[test]
    fn test_create_then_find() {
        let mut store = ChunkStore::new();
        let coord = ChunkCoord::new(4, 8);

        assert_eq!(store.lookup_or_create(coord), Lookup::Created);
        assert!(store.contains(coord));
        assert!(!store.terrain(coord).map_or(true, TerrainChunk::is_active));

        assert_eq!(store.lookup_or_create(coord), Lookup::Found);
        assert!(store.terrain(coord).is_some_and(TerrainChunk::is_active));
        assert!(store.water(coord).is_some_and(WaterChunk::is_active));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_populate_sets_water_from_same_bounds() {
        let mut store = ChunkStore::new();
        let coord = ChunkCoord::new(0, 0);
        let settings = WaterSettings::default();
        store.lookup_or_create(coord);

        assert!(store.populate(coord, dummy_build(-0.5, 1.5), 4, &settings));

        let terrain = store.terrain(coord).expect("terrain");
        let water = store.water(coord).expect("water");
        assert!(terrain.is_built() && terrain.is_active());
        assert_eq!(terrain.min_height(), -0.5);
        assert!((water.level() - 2.0 * settings.depth_factor).abs() < 1e-6);
        assert!(water.is_active());
    }

    #[test]
    fn test_unknown_coord_is_noop() {
        let mut store = ChunkStore::new();
        let coord = ChunkCoord::new(12, 12);
        store.set_inactive(coord);
        assert!(!store.populate(coord, dummy_build(0.0, 1.0), 4, &WaterSettings::default()));
        assert!(store.terrain(coord).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_inactive_keeps_chunks() {
        let mut store = ChunkStore::new();
        let a = ChunkCoord::new(0, 0);
        let b = ChunkCoord::new(4, 0);
        store.lookup_or_create(a);
        store.lookup_or_create(b);
        store.lookup_or_create(a);
        store.lookup_or_create(b);
        assert_eq!(store.active_coords(), vec![a, b]);

        store.set_inactive(a);
        assert_eq!(store.active_coords(), vec![b]);
        assert!(store.water(a).is_some_and(|w| !w.is_active()));

        store.set_all_inactive();
        assert!(store.active_coords().is_empty());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_retain_all_never_evicts() {
        let mut store = ChunkStore::new();
        for i in 0..20 {
            store.lookup_or_create(ChunkCoord::new(i * 4, 0));
        }
        assert!(store.evict(ChunkCoord::new(0, 0), 4).is_empty());
        assert_eq!(store.len(), 20);
    }

    #[test]
    fn test_max_chunks_evicts_farthest_inactive() {
        let mut store = ChunkStore::with_policy(Box::new(MaxChunks { limit: 3 }));
        for i in 0..5 {
            store.lookup_or_create(ChunkCoord::new(i * 4, 0));
        }
        // Show the farthest one so it is protected.
        store.lookup_or_create(ChunkCoord::new(16, 0));

        let evicted = store.evict(ChunkCoord::new(0, 0), 4);
        assert_eq!(evicted, vec![ChunkCoord::new(12, 0), ChunkCoord::new(8, 0)]);
        assert_eq!(store.len(), 3);
        assert!(store.contains(ChunkCoord::new(16, 0)));
        assert!(store.water(ChunkCoord::new(12, 0)).is_none());
    }

    #[test]
    fn test_retention_validation() {
        assert!(Retention::RetainAll.validate().is_ok());
        assert!(Retention::MaxChunks { limit: 9 }.validate().is_ok());
        assert!(Retention::MaxChunks { limit: 4 }.validate().is_err());
    }
}
