//! Scripted observer that walks a waypoint path.

use glam::{Vec2, Vec3};

use crate::config::ObserverConfig;

/// Moves along waypoints at constant speed, supplying a position per tick.
#[derive(Debug, Clone)]
pub struct ScriptedObserver {
    /// Current position; `y` is carried but never changes
    position: Vec3,
    /// XZ waypoints
    waypoints: Vec<Vec2>,
    /// Index of the waypoint being approached
    next: usize,
    /// World units per second
    speed: f32,
    /// Wrap around after the last waypoint
    looped: bool,
}

impl ScriptedObserver {
    /// Creates an observer spawned at the center of the origin chunk.
    #[must_use]
    pub fn new(config: &ObserverConfig, resolution: u32) -> Self {
        let half = (resolution / 2) as f32;
        Self {
            position: Vec3::new(half, config.start_height, half),
            waypoints: config.path.clone(),
            next: 0,
            speed: config.speed,
            looped: config.looped,
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Whether a non-looping path has been walked to its end.
    #[must_use]
    pub fn finished(&self) -> bool {
        !self.looped && self.next >= self.waypoints.len()
    }

    /// Moves for `dt` seconds and returns the new position.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        let mut budget = self.speed * dt;
        // Waypoints reached without moving; a full lap of them means we are stuck.
        let mut idle_hops = 0;

        while budget > 0.0 && !self.waypoints.is_empty() && !self.finished() {
            let target = self.waypoints[self.next % self.waypoints.len()];
            let here = Vec2::new(self.position.x, self.position.z);
            let to_target = target - here;
            let distance = to_target.length();

            if distance <= budget {
                self.position.x = target.x;
                self.position.z = target.y;
                budget -= distance;
                self.next += 1;
                if self.looped {
                    self.next %= self.waypoints.len();
                }
                idle_hops = if distance == 0.0 { idle_hops + 1 } else { 0 };
                if idle_hops >= self.waypoints.len() {
                    break;
                }
            } else {
                let step = to_target / distance * budget;
                self.position.x += step.x;
                self.position.z += step.y;
                budget = 0.0;
            }
        }

        self.position
    }
}
