//! Simulation state and core particle types
//!
//! Everything the driver owns between frames lives here, together with the
//! read-only snapshot handed to a renderer.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::platform::Platform;
use crate::consts::*;
use crate::settings::{DropSettings, PhysicsSettings, SimSettings};
use crate::{ConfigError, clamp_world_x};

/// A ballistic droplet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Motion is constrained to the platform surface
    pub sliding: bool,
    /// Permanently stopped; only a merge can move it again
    pub resting: bool,
    /// Spawned by a splash or a merge (fixed at creation)
    is_splash: bool,
}

impl Particle {
    /// Create a particle, rejecting non-positive radii and non-finite state
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32, is_splash: bool) -> Result<Self, ConfigError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::InvalidRadius(radius));
        }
        if !(pos.is_finite() && vel.is_finite()) {
            return Err(ConfigError::NonFiniteState);
        }
        Ok(Self::from_parts(id, pos, vel, radius, is_splash))
    }

    /// Splash fragment or merge product; callers guarantee a positive radius
    pub(crate) fn splash(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self::from_parts(id, pos, vel, radius, true)
    }

    fn from_parts(id: u32, pos: Vec2, vel: Vec2, radius: f32, is_splash: bool) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            sliding: false,
            resting: false,
            is_splash,
        }
    }

    #[inline]
    pub fn is_splash(&self) -> bool {
        self.is_splash
    }

    /// Free-fall integration for one step.
    ///
    /// Reaching the ground plane is a full inelastic stop: y is clamped to the
    /// radius and velocity zeroed. Returns the velocity the particle carried
    /// into the ground when that happens. x is always clamped to the world.
    pub fn advance(&mut self, dt: f32) -> Option<Vec2> {
        let next_vel = self.vel + GRAVITY * dt;
        let next_pos = self.pos + next_vel * dt;

        let impact = if next_pos.y <= self.radius {
            self.pos.y = self.radius;
            self.vel = Vec2::ZERO;
            Some(next_vel)
        } else {
            self.vel = next_vel;
            self.pos = next_pos;
            None
        };

        self.pos.x = clamp_world_x(self.pos.x);
        impact
    }

    /// Snap to the ground plane and stop permanently
    pub fn come_to_rest(&mut self) {
        self.pos.y = self.radius;
        self.vel = Vec2::ZERO;
        self.sliding = false;
        self.resting = true;
    }

    pub fn view(&self) -> ParticleView {
        ParticleView {
            id: self.id,
            position: self.pos,
            radius: self.radius,
            is_splash: self.is_splash,
            resting: self.resting,
        }
    }
}

/// How a renderer should draw a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Falling, flying or sliding droplet
    Airborne,
    /// Settled splash water
    Puddle,
}

/// Read-only per-particle data exposed to a renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub id: u32,
    pub position: Vec2,
    pub radius: f32,
    pub is_splash: bool,
    pub resting: bool,
}

impl ParticleView {
    pub fn kind(&self) -> ParticleKind {
        if self.is_splash && self.resting {
            ParticleKind::Puddle
        } else {
            ParticleKind::Airborne
        }
    }

    /// Ellipse extents (width, height) for drawing a puddle
    pub fn footprint(&self) -> Vec2 {
        Vec2::new(self.radius * 3.0, self.radius * 0.5)
    }
}

/// Frame snapshot consumed by a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub frame: u64,
    pub particles: Vec<ParticleView>,
}

impl Snapshot {
    pub fn count(&self, kind: ParticleKind) -> usize {
        self.particles.iter().filter(|p| p.kind() == kind).count()
    }
}

/// What happened during the most recent step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Drops that shattered
    pub splashes: u32,
    /// Fragments spawned by those splashes
    pub spawned: u32,
    /// Particles moved along the platform
    pub slid: u32,
    /// Particles that stopped on the ground
    pub came_to_rest: u32,
    /// Pairs coalesced
    pub merges: u32,
}

/// Monotonic particle ID source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// RNG seed record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    #[serde(default)]
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn with_stream(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    /// Stream 0 is the seed's default sequence; other streams select an
    /// independent PCG increment.
    pub fn to_rng(&self) -> Pcg32 {
        match self.stream {
            0 => Pcg32::seed_from_u64(self.seed),
            stream => Pcg32::new(self.seed, stream),
        }
    }
}

/// Complete simulation state, owned by the driver
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Shared read-only geometry
    pub platform: Platform,
    /// Live particles (order only matters for merge pairing)
    pub particles: Vec<Particle>,
    /// IDs of original drops already consumed by a splash
    pub splashed: BTreeSet<u32>,
    pub physics: PhysicsSettings,
    /// Frames advanced so far
    pub frame: u64,
    pub rng_state: RngState,
    pub last_report: StepReport,
    pub(crate) rng: Pcg32,
    pub(crate) ids: EntityIds,
}

impl SimulationState {
    /// Default platform and the three default drops
    pub fn new(seed: u64) -> Self {
        let mut state = Self::empty(Platform::default(), PhysicsSettings::default(), seed);
        for drop in SimSettings::default().drops {
            let id = state.ids.next_id();
            state
                .particles
                .push(Particle::from_parts(id, drop.position, drop.velocity, drop.radius, false));
        }
        state
    }

    /// Build from validated settings
    pub fn from_settings(settings: &SimSettings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        let platform = Platform::from_settings(&settings.platform)?;
        let mut state = Self::empty(platform, settings.physics, seed);
        for drop in &settings.drops {
            state.add_drop(drop)?;
        }
        log::info!(
            "Simulation built: {} drops, seed {}, platform {:?} -> {:?}",
            state.particles.len(),
            seed,
            platform.start(),
            platform.end()
        );
        Ok(state)
    }

    fn empty(platform: Platform, physics: PhysicsSettings, seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            platform,
            particles: Vec::new(),
            splashed: BTreeSet::new(),
            physics,
            frame: 0,
            rng: rng_state.to_rng(),
            rng_state,
            last_report: StepReport::default(),
            ids: EntityIds::default(),
        }
    }

    /// Add an original falling drop
    pub fn add_drop(&mut self, drop: &DropSettings) -> Result<u32, ConfigError> {
        self.add_particle(drop.position, drop.velocity, drop.radius, false)
    }

    /// Add a particle with a freshly allocated ID
    pub fn add_particle(
        &mut self,
        pos: Vec2,
        vel: Vec2,
        radius: f32,
        is_splash: bool,
    ) -> Result<u32, ConfigError> {
        let id = self.ids.next_id();
        let mut particle = Particle::new(id, pos, vel, radius, is_splash)?;
        particle.pos.x = clamp_world_x(particle.pos.x);
        particle.pos.y = particle.pos.y.max(radius);
        self.particles.push(particle);
        Ok(id)
    }

    pub fn particle(&self, id: u32) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    pub fn particle_mut(&mut self, id: u32) -> Option<&mut Particle> {
        self.particles.iter_mut().find(|p| p.id == id)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            frame: self.frame,
            particles: self.particles.iter().map(Particle::view).collect(),
        }
    }
}
