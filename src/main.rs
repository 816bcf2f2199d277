//! Splashdown entry point
//!
//! Headless runner: advances the simulation for the configured number of
//! frames and prints the final snapshot as JSON for an external renderer.
//!
//! Usage: `splashdown [settings.json]`

use splashdown::SimSettings;
use splashdown::sim::{ParticleKind, SimulationState, step};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = match std::env::args().nth(1) {
        Some(path) => SimSettings::load(path)?,
        None => {
            log::info!("Using default settings");
            SimSettings::default()
        }
    };

    let seed = if settings.seed == 0 {
        rand::random()
    } else {
        settings.seed
    };
    let mut state = SimulationState::from_settings(&settings, seed)?;
    log::info!("Splashdown starting: {} frames at dt = {}", settings.frames, settings.dt);

    for _ in 0..settings.frames {
        state = step(state, settings.dt);

        let report = state.last_report;
        if report.splashes > 0 || report.merges > 0 {
            log::info!(
                "Frame {}: {} splash(es) -> {} fragments, {} merge(s)",
                state.frame,
                report.splashes,
                report.spawned,
                report.merges
            );
        }
    }

    let snapshot = state.snapshot();
    log::info!(
        "Finished after {} frames: {} airborne, {} puddles",
        snapshot.frame,
        snapshot.count(ParticleKind::Airborne),
        snapshot.count(ParticleKind::Puddle)
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
