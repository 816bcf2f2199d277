//! Splashdown - droplets falling onto an inclined platform
//!
//! Core modules:
//! - `sim`: Deterministic particle simulation (integration, collision, splash, slide, merge)
//! - `settings`: Data-driven simulation parameters
//! - `error`: Configuration errors raised at construction time

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{DropSettings, PhysicsSettings, PlatformSettings, SimSettings, SplashSettings};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (seconds)
    pub const SIM_DT: f32 = 0.01;
    /// Default run length in frames
    pub const SIM_FRAMES: u32 = 200;
    /// Maximum substeps per clock advance to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Wall-clock deltas above this are clamped (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Gravitational acceleration
    pub const GRAVITY: Vec2 = Vec2::new(0.0, -9.8);

    /// Horizontal world bounds (particles are clamped, never bounced)
    pub const WORLD_MIN_X: f32 = 0.0;
    pub const WORLD_MAX_X: f32 = 1.0;

    /// Radius of an original falling drop
    pub const DROP_RADIUS: f32 = 0.02;
    /// Height above the ground plane still counted as touching it
    pub const GROUND_EPSILON: f32 = 1e-3;

    /// Platform defaults
    pub const PLATFORM_CENTER: Vec2 = Vec2::new(0.5, 0.25);
    pub const PLATFORM_WIDTH: f32 = 0.4;
    pub const PLATFORM_ANGLE: f32 = -std::f32::consts::FRAC_PI_6;

    /// Per-step multiplicative damping of along-slope speed
    pub const SLIDE_FRICTION: f32 = 0.05;
    /// Resting splash particles closer than this many summed radii coalesce
    pub const MERGE_DISTANCE_FACTOR: f32 = 1.5;
}

/// Clamp an x coordinate into the world bounds
#[inline]
pub fn clamp_world_x(x: f32) -> f32 {
    x.clamp(consts::WORLD_MIN_X, consts::WORLD_MAX_X)
}

/// Unit vector pointing at angle theta (radians, counter-clockwise from +x)
#[inline]
pub fn direction(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Volume of a sphere of radius `r`.
///
/// Particles move in 2D but are weighted as spheres when coalescing.
#[inline]
pub fn sphere_volume(r: f32) -> f32 {
    4.0 / 3.0 * std::f32::consts::PI * r * r * r
}

/// Radius of the sphere holding `volume`
#[inline]
pub fn sphere_radius(volume: f32) -> f32 {
    (volume * 3.0 / (4.0 * std::f32::consts::PI)).cbrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_direction_unit_length() {
        for theta in [0.0, FRAC_PI_2, PI, 1.234] {
            assert!((direction(theta).length() - 1.0).abs() < 1e-6);
        }
        assert!((direction(FRAC_PI_2) - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn test_sphere_volume_radius_inverse() {
        for r in [0.002, 0.01, 0.02, 0.5] {
            assert!((sphere_radius(sphere_volume(r)) - r).abs() < r * 1e-5);
        }
    }

    #[test]
    fn test_clamp_world_x() {
        assert_eq!(clamp_world_x(-0.5), 0.0);
        assert_eq!(clamp_world_x(1.5), 1.0);
        assert_eq!(clamp_world_x(0.3), 0.3);
    }
}
