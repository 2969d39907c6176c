//! # Strata
//!
//! Headless driver for terrain streaming. Walks a scripted observer across
//! the world and reports what the streaming controller did.
//!
//! Usage: `strata [config.toml]`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::{Context, Result};
use strata_engine::{app, config::EngineConfig};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("strata=info".parse()?))
        .init();

    info!("Strata starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // A path named on the command line must load; the implicit file may be absent.
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_path(&path)
            .with_context(|| format!("failed to load config {path}"))?,
        None => EngineConfig::load(),
    };

    let summary = app::run(&config)?;
    info!(
        "Evicted {} chunk pairs, slowest tick {:?}",
        summary.evictions, summary.slowest_tick
    );

    info!("Strata shutdown complete");
    Ok(())
}
