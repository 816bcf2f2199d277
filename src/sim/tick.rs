//! Fixed timestep simulation tick
//!
//! Advances the whole particle system by one frame. Each frame reads the
//! previous frame's collection and builds the next one, so fragments spawned
//! this frame are not processed until the following frame and a consumed drop
//! never appears twice.

use super::merge::resolve_merges;
use super::slide::slide_particle;
use super::splash::{Sampler, spawn_splash};
use super::state::{SimulationState, StepReport};
use crate::ConfigError;
use crate::consts::*;

/// Default platform and drops, seeded from system entropy
pub fn initialize() -> SimulationState {
    let seed: u64 = rand::random();
    log::info!("Simulation initialized with seed: {}", seed);
    SimulationState::new(seed)
}

/// Advance one frame using the state's own seeded RNG
pub fn step(mut state: SimulationState, dt: f32) -> SimulationState {
    let mut rng = state.rng.clone();
    state = step_with(state, dt, &mut rng);
    state.rng = rng;
    state
}

/// Advance one frame drawing splash randomness from `sampler`
pub fn step_with<S: Sampler + ?Sized>(
    mut state: SimulationState,
    dt: f32,
    sampler: &mut S,
) -> SimulationState {
    let previous = std::mem::take(&mut state.particles);
    let mut survivors = Vec::with_capacity(previous.len());
    let mut spawned = Vec::new();
    let mut report = StepReport::default();

    let platform = state.platform;
    let physics = state.physics;

    for mut p in previous {
        if !p.is_splash() && state.splashed.contains(&p.id) {
            continue;
        }

        if p.resting {
            survivors.push(p);
            continue;
        }

        if p.sliding {
            if platform.contains_x(p.pos.x) {
                slide_particle(&mut p, &platform, physics.friction, dt);
                report.slid += 1;
                survivors.push(p);
                continue;
            }
            // Slid off the end: plain free fall from here, no launch impulse
            p.sliding = false;
        }

        let impact = p.advance(dt);

        let falling_onto_ground = impact.is_some_and(|v| v.y < 0.0)
            || (p.pos.y <= p.radius + physics.ground_epsilon && p.vel.y < 0.0);
        if falling_onto_ground {
            p.come_to_rest();
            report.came_to_rest += 1;
            survivors.push(p);
            continue;
        }

        let hits_platform = p.vel.y < 0.0 && platform.check_collision(&p);

        if hits_platform && p.is_splash() && !p.sliding {
            slide_particle(&mut p, &platform, physics.friction, dt);
            report.slid += 1;
            survivors.push(p);
            continue;
        }

        if hits_platform && !p.is_splash() && !state.splashed.contains(&p.id) {
            let impact_speed = p.vel.length();
            let fragments = spawn_splash(
                p.pos,
                impact_speed,
                p.radius,
                &physics.splash,
                sampler,
                &mut state.ids,
            );
            log::debug!(
                "Drop #{} splashed at ({:.3}, {:.3}), speed {:.2}: {} fragments",
                p.id,
                p.pos.x,
                p.pos.y,
                impact_speed,
                fragments.len()
            );
            report.splashes += 1;
            report.spawned += fragments.len() as u32;
            spawned.extend(fragments);
            state.splashed.insert(p.id);
            continue;
        }

        survivors.push(p);
    }

    let (mut particles, merges) =
        resolve_merges(survivors, physics.merge_distance_factor, &mut state.ids);
    report.merges = merges;
    particles.extend(spawned);

    state.particles = particles;
    state.frame += 1;
    state.last_report = report;

    log::trace!(
        "Frame {}: {} particles, {:?}",
        state.frame,
        state.particles.len(),
        report
    );
    state
}

/// Advance a fixed number of frames
pub fn run(mut state: SimulationState, dt: f32, frames: u32) -> SimulationState {
    for _ in 0..frames {
        state = step(state, dt);
    }
    state
}

/// Fixed-timestep accumulator for a real-time driver.
///
/// Converts variable wall-clock deltas into whole `step` calls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    dt: f32,
    accumulator: f32,
}

impl FrameClock {
    pub fn new(dt: f32) -> Result<Self, ConfigError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ConfigError::InvalidTimestep(dt));
        }
        Ok(Self {
            dt,
            accumulator: 0.0,
        })
    }

    /// Time carried over to the next advance
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Feed `elapsed` seconds and run as many steps as fit (at most
    /// `MAX_SUBSTEPS`). Returns the new state and the number of steps taken.
    pub fn advance(&mut self, mut state: SimulationState, elapsed: f32) -> (SimulationState, u32) {
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_DELTA);

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < MAX_SUBSTEPS {
            state = step(state, self.dt);
            self.accumulator -= self.dt;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= self.dt {
            log::warn!(
                "Frame clock fell behind, dropping {:.3}s",
                self.accumulator
            );
            self.accumulator %= self.dt;
        }
        (state, substeps)
    }
}
