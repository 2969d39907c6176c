//! Fixed-step tick pacing.

use std::time::{Duration, Instant};

/// Paces streaming ticks at a fixed rate.
///
/// Headless runs skip the wait entirely and advance simulated time only.
#[derive(Debug)]
pub struct TickClock {
    /// Simulated seconds per tick
    fixed_dt: f32,
    /// Wall-clock budget per tick
    tick_budget: Duration,
    /// Start of the current tick
    tick_start: Instant,
    /// Whether to sleep out the remainder of each tick
    realtime: bool,
    /// Ticks completed
    ticks: u64,
    /// Slowest tick seen, in wall-clock time
    slowest: Duration,
}

impl TickClock {
    /// Create a clock for `tick_rate` ticks per second.
    #[must_use]
    pub fn new(tick_rate: u32, realtime: bool) -> Self {
        let tick_rate = tick_rate.max(1);
        Self {
            fixed_dt: 1.0 / tick_rate as f32,
            tick_budget: Duration::from_secs_f64(1.0 / f64::from(tick_rate)),
            tick_start: Instant::now(),
            realtime,
            ticks: 0,
            slowest: Duration::ZERO,
        }
    }

    /// Simulated seconds per tick.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Ticks completed so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Slowest tick seen so far.
    #[must_use]
    pub fn slowest_tick(&self) -> Duration {
        self.slowest
    }

    /// Finish the current tick, sleeping out the remaining budget if realtime.
    ///
    /// Returns how long the tick's work took.
    pub fn end_tick(&mut self) -> Duration {
        let work = self.tick_start.elapsed();
        self.slowest = self.slowest.max(work);
        self.ticks += 1;

        if self.realtime && work < self.tick_budget {
            std::thread::sleep(self.tick_budget - work);
        }

        self.tick_start = Instant::now();
        work
    }
}
