//! Deterministic simulation module
//!
//! All particle physics lives here. This module must stay pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded or injected randomness only
//! - No rendering or platform dependencies

pub mod merge;
pub mod platform;
pub mod slide;
pub mod splash;
pub mod state;
pub mod tick;

pub use merge::{is_merge_candidate, merge_particles, resolve_merges, within_merge_range};
pub use platform::Platform;
pub use slide::slide_particle;
pub use splash::{Sampler, spawn_splash, splash_count};
pub use state::{
    EntityIds, Particle, ParticleKind, ParticleView, RngState, SimulationState, Snapshot,
    StepReport,
};
pub use tick::{FrameClock, initialize, run, step, step_with};
