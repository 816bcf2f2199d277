//! Surface-constrained motion along the platform

use super::platform::Platform;
use super::state::Particle;
use crate::clamp_world_x;
use crate::consts::GRAVITY;

/// Move a particle one step along the platform surface.
///
/// Only gravity projected onto the incline accelerates it; any normal
/// component of velocity is discarded and the along-slope speed is damped by
/// `(1 - friction)` each step. The particle ends the step exactly on the
/// surface (`y == height_at(x) + radius`).
pub fn slide_particle(p: &mut Particle, platform: &Platform, friction: f32, dt: f32) {
    let tangent = platform.tangent();
    let accel = GRAVITY.dot(tangent) * tangent;

    p.vel += accel * dt;
    p.vel = p.vel.dot(tangent) * (1.0 - friction) * tangent;

    p.pos += p.vel * dt;
    p.pos.x = clamp_world_x(p.pos.x);
    p.pos.y = platform.height_at(p.pos.x) + p.radius;
    p.sliding = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn on_surface(platform: &Platform, x: f32, vel: Vec2) -> Particle {
        let radius = 0.005;
        Particle::new(1, Vec2::new(x, platform.height_at(x) + radius), vel, radius, true).unwrap()
    }

    #[test]
    fn test_slide_snaps_to_surface() {
        let platform = Platform::default();
        let mut p = on_surface(&platform, 0.5, Vec2::new(0.3, -2.0));
        slide_particle(&mut p, &platform, 0.05, 0.01);
        assert!(p.sliding);
        assert!((p.pos.y - (platform.height_at(p.pos.x) + p.radius)).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_is_tangential() {
        let platform = Platform::default();
        let mut p = on_surface(&platform, 0.4, Vec2::new(-0.5, -3.0));
        slide_particle(&mut p, &platform, 0.05, 0.01);
        let tangent = platform.tangent();
        let normal = Vec2::new(-tangent.y, tangent.x);
        assert!(p.vel.dot(normal).abs() < 1e-5);
    }

    #[test]
    fn test_slides_downhill_from_rest() {
        let platform = Platform::default();
        let mut p = on_surface(&platform, 0.4, Vec2::ZERO);
        let x0 = p.pos.x;
        for _ in 0..10 {
            slide_particle(&mut p, &platform, 0.05, 0.01);
        }
        // Default incline descends to the right
        assert!(p.pos.x > x0);
        assert!(p.vel.x > 0.0 && p.vel.y < 0.0);
    }

    #[test]
    fn test_friction_damps_speed() {
        let platform = Platform::default();
        let tangent = platform.tangent();
        let g = GRAVITY.dot(tangent);
        let dt = 0.01;

        let mut p = on_surface(&platform, 0.4, Vec2::ZERO);
        slide_particle(&mut p, &platform, 0.05, dt);
        assert!((p.vel.length() - g * dt * 0.95).abs() < 1e-6);

        let mut frictionless = on_surface(&platform, 0.4, Vec2::ZERO);
        slide_particle(&mut frictionless, &platform, 0.0, dt);
        assert!(frictionless.vel.length() > p.vel.length());
    }
}
