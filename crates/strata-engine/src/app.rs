//! Session loop.
//!
//! Stands in for the host: once per tick it moves the scripted observer and
//! asks the streaming controller to re-evaluate.

use anyhow::{Context, Result};
use std::time::Duration;
use strata_world::StreamingController;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::observer::ScriptedObserver;
use crate::timing::TickClock;

/// End-of-session totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Ticks run
    pub ticks: u64,
    /// Neighbourhood changes
    pub rebuilds: u64,
    /// Chunk meshes built
    pub builds: u64,
    /// Chunk pairs evicted
    pub evictions: u64,
    /// Chunk pairs resident at exit
    pub resident: usize,
    /// Chunk pairs shown at exit
    pub active: usize,
    /// Slowest tick
    pub slowest_tick: Duration,
}

/// Runs a streaming session until `max_ticks` or the end of a non-looping path.
pub fn run(config: &EngineConfig) -> Result<SessionSummary> {
    config.validate().context("invalid configuration")?;

    let mut streaming = StreamingController::new(config.terrain.clone())
        .context("failed to start terrain streaming")?;
    let mut observer = ScriptedObserver::new(&config.observer, config.terrain.resolution);
    let mut clock = TickClock::new(config.tick_rate, config.realtime);

    info!(
        "Session starting at {:?}, {} ticks/s",
        observer.position(),
        config.tick_rate
    );

    // The first tick evaluates the spawn point before any movement.
    let mut position = observer.position();
    loop {
        let report = streaming.tick(position);
        if report.rebuilt {
            debug!(
                "Tick {}: center {}, built {}, revisited {}, evicted {}",
                clock.ticks(),
                report.center,
                report.created.len(),
                report.revisited.len(),
                report.evicted.len()
            );
        }
        clock.end_tick();

        if config.max_ticks != 0 && clock.ticks() >= config.max_ticks {
            break;
        }
        if observer.finished() {
            info!("Observer reached the end of its path");
            break;
        }
        position = observer.advance(clock.fixed_dt());
    }

    let stats = streaming.stats();
    let store = streaming.store();
    let summary = SessionSummary {
        ticks: clock.ticks(),
        rebuilds: stats.rebuilds,
        builds: stats.builds,
        evictions: stats.evictions,
        resident: store.len(),
        active: store.active_coords().len(),
        slowest_tick: clock.slowest_tick(),
    };

    info!(
        "Session complete: {} ticks, {} neighbourhood changes, {} built, {} resident, {} active",
        summary.ticks, summary.rebuilds, summary.builds, summary.resident, summary.active
    );
    Ok(summary)
}
