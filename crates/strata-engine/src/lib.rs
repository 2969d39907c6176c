//! Strata Engine - headless driver for Strata terrain streaming.
//!
//! This crate provides the session loop that stands in for a host
//! application: configuration loading, fixed-step tick pacing and a
//! scripted observer that walks the world.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

/// Session loop driving the streaming controller
pub mod app;
/// Engine configuration and TOML persistence
pub mod config;
/// Scripted observer movement
pub mod observer;
/// Fixed-step tick pacing
pub mod timing;
