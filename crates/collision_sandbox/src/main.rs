//! Headless collision sandbox
//!
//! Spawns a seeded field of drifting circles and projectiles, runs the
//! resolver for a fixed number of ticks and logs what happened.
//!
//! Usage: `collision_sandbox [settings.toml|settings.ron]`

mod config;
mod scene;

use config::SandboxConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scene::Tally;
use spatial_collision::foundation::logging::{self, debug, error, info, LevelFilter};
use spatial_collision::prelude::*;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "sandbox.toml";

/// Sandbox failures
#[derive(Error, Debug)]
enum SandboxError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Collision error: {0}")]
    Collision(#[from] CollisionError),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

fn load_config() -> Result<SandboxConfig, SandboxError> {
    if let Some(path) = std::env::args().nth(1) {
        info!("Loading settings from {}", path);
        return Ok(SandboxConfig::load_from_file(path)?);
    }
    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        info!("Loading settings from {}", DEFAULT_CONFIG_PATH);
        return Ok(SandboxConfig::load_from_file(DEFAULT_CONFIG_PATH)?);
    }
    info!("No settings file, using defaults");
    Ok(SandboxConfig::default())
}

fn run() -> Result<(), SandboxError> {
    let config = load_config()?;
    config.validate().map_err(SandboxError::InvalidSettings)?;

    let mut system = CollisionSystem::from_config(&config.collision)?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let tally = Rc::new(Tally::default());
    scene::spawn(&mut system, &config, &mut rng, &tally);

    let mut totals = TickReport::default();
    for _ in 0..config.ticks {
        let report = system.update(config.dt);
        scene::bounce(&mut system);

        totals.candidates += report.candidates;
        totals.began += report.began;
        totals.ended += report.ended;
        totals.removed += report.removed;
        if report.began + report.ended > 0 {
            debug!(
                "Tick {}: {} began, {} persisted, {} ended, {} candidates",
                report.tick,
                report.began,
                report.persisted,
                report.ended,
                report.candidates
            );
        }
    }

    info!(
        "Ran {} ticks: {} began, {} ended, {} candidate pairs, {} removed",
        system.tick(),
        totals.began,
        totals.ended,
        totals.candidates,
        totals.removed
    );
    info!(
        "Handlers saw {} contacts, {} separations, {} destroyed; {} collidables left",
        tally.contacts(),
        tally.separations(),
        tally.destroyed(),
        system.len()
    );

    system.close();
    Ok(())
}

fn main() {
    logging::init_with_level(LevelFilter::Info);

    info!("Starting collision sandbox");
    if let Err(e) = run() {
        error!("Sandbox failed: {}", e);
        std::process::exit(1);
    }
}
