//! Sandbox run settings

use serde::{Deserialize, Serialize};
use spatial_collision::config::{CollisionConfig, Config};

/// Settings for one headless run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Ticks to simulate
    pub ticks: u32,
    /// Seconds per tick
    pub dt: f32,
    /// Drifting bodies spawned at start
    pub body_count: usize,
    /// Projectiles spawned at start
    pub projectile_count: usize,
    /// Body radius range
    pub min_radius: f32,
    /// Upper bound of the body radius range
    pub max_radius: f32,
    /// Top speed in units per second
    pub max_speed: f32,
    /// Scene seed
    pub seed: u64,
    /// Grid settings
    pub collision: CollisionConfig,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            dt: 1.0 / 60.0,
            body_count: 64,
            projectile_count: 8,
            min_radius: 8.0,
            max_radius: 24.0,
            max_speed: 120.0,
            seed: 7,
            collision: CollisionConfig::default(),
        }
    }
}

impl Config for SandboxConfig {}

impl SandboxConfig {
    /// Reject settings the scene generator cannot use
    pub fn validate(&self) -> Result<(), String> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(format!("dt must be positive, got {}", self.dt));
        }
        if !(self.min_radius > 0.0 && self.min_radius <= self.max_radius) {
            return Err(format!(
                "radius range {}..{} is empty",
                self.min_radius, self.max_radius
            ));
        }
        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return Err(format!("max_speed must be non-negative, got {}", self.max_speed));
        }
        Ok(())
    }
}
