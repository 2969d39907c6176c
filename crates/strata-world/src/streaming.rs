//! Neighbourhood streaming around a moving observer.
//!
//! Each tick the observer's position is mapped to the chunk containing it.
//! Nothing happens while that chunk stays the same. When it changes, every
//! chunk is hidden and the 3×3 neighbourhood around the new chunk is shown,
//! building any chunk that has never been seen before.
//!
//! All work is synchronous inside [`StreamingController::tick`]; the store has
//! a single writer, enforced by `&mut self`.

use glam::Vec3;
use strata_common::{ChunkCoord, ConfigResult};
use tracing::{debug, info};

use crate::config::TerrainConfig;
use crate::height::HeightField;
use crate::mesh::MeshBuilder;
use crate::store::{ChunkStore, Lookup};

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Chunk the observer occupies
    pub center: ChunkCoord,
    /// Whether the neighbourhood was recomputed
    pub rebuilt: bool,
    /// Chunks built this tick
    pub created: Vec<ChunkCoord>,
    /// Chunks that already existed and were shown again
    pub revisited: Vec<ChunkCoord>,
    /// Hidden chunks dropped by the retention policy
    pub evicted: Vec<ChunkCoord>,
}

/// Running totals over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamingStats {
    /// Ticks evaluated
    pub ticks: u64,
    /// Ticks that recomputed the neighbourhood
    pub rebuilds: u64,
    /// Store lookups performed
    pub lookups: u64,
    /// Chunk meshes built
    pub builds: u64,
    /// Chunk pairs evicted
    pub evictions: u64,
}

/// Keeps the neighbourhood around the observer live.
#[derive(Debug)]
pub struct StreamingController {
    /// Terrain parameters
    config: TerrainConfig,
    /// Mesh construction
    builder: MeshBuilder,
    /// All chunks
    store: ChunkStore,
    /// Chunk occupied at the last tick, `None` before the first
    last_chunk: Option<ChunkCoord>,
    /// Session totals
    stats: StreamingStats,
}

impl StreamingController {
    /// Creates a controller, validating the configuration.
    pub fn new(config: TerrainConfig) -> ConfigResult<Self> {
        let store = ChunkStore::with_policy(config.retention.into_policy());
        Self::with_store(config, store)
    }

    /// Creates a controller around an existing store.
    pub fn with_store(config: TerrainConfig, store: ChunkStore) -> ConfigResult<Self> {
        config.validate()?;
        let builder = MeshBuilder::new(
            HeightField::new(&config),
            config.gradient.clone(),
            config.resolution,
        );
        info!(
            "Terrain streaming ready: resolution {}, seed {}, offset ({}, {})",
            config.resolution, config.seed, config.x_offset, config.z_offset
        );
        Ok(Self {
            config,
            builder,
            store,
            last_chunk: None,
            stats: StreamingStats::default(),
        })
    }

    /// Re-evaluates streaming for the observer's current position.
    pub fn tick(&mut self, observer: Vec3) -> TickReport {
        self.stats.ticks += 1;
        let resolution = self.config.resolution;
        let center = ChunkCoord::from_position(observer, resolution);

        if self.last_chunk == Some(center) {
            return TickReport {
                center,
                ..TickReport::default()
            };
        }

        info!("Observer entered chunk {center}");
        self.last_chunk = Some(center);
        self.stats.rebuilds += 1;
        self.store.set_all_inactive();

        let mut report = TickReport {
            center,
            rebuilt: true,
            ..TickReport::default()
        };

        for coord in center.neighborhood(resolution) {
            self.stats.lookups += 1;
            match self.store.lookup_or_create(coord) {
                Lookup::Found => report.revisited.push(coord),
                Lookup::Created => {
                    let build = self.builder.build(coord);
                    debug!(
                        "Built chunk {coord}: heights [{:.3}, {:.3}]",
                        build.min_height, build.max_height
                    );
                    self.store.populate(coord, build, resolution, &self.config.water);
                    self.stats.builds += 1;
                    report.created.push(coord);
                },
            }
        }

        report.evicted = self.store.evict(center, resolution);
        self.stats.evictions += report.evicted.len() as u64;

        report
    }

    /// Borrows the chunk store.
    #[must_use]
    pub const fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Chunk the observer occupied at the last tick.
    #[must_use]
    pub const fn last_chunk(&self) -> Option<ChunkCoord> {
        self.last_chunk
    }

    /// Returns the terrain configuration.
    #[must_use]
    pub const fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Returns the mesh builder.
    #[must_use]
    pub const fn builder(&self) -> &MeshBuilder {
        &self.builder
    }

    /// Returns session totals.
    #[must_use]
    pub const fn stats(&self) -> StreamingStats {
        self.stats
    }
}
