//! Impact fragmentation
//!
//! A drop striking the platform shatters into a burst of smaller splash
//! particles. Count, launch angle, speed and size are all sampled, so the
//! random source is injected through [`Sampler`].

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use rand::Rng;
use rand_distr::{Distribution, LogNormal, Normal};

use super::state::{EntityIds, Particle};
use crate::direction;
use crate::settings::SplashSettings;

/// Random source for splash sampling
pub trait Sampler {
    /// Draw from N(mean, std_dev²)
    fn sample_normal(&mut self, mean: f32, std_dev: f32) -> f32;
    /// Draw from a log-normal whose underlying normal is N(log_mean, log_std_dev²)
    fn sample_lognormal(&mut self, log_mean: f32, log_std_dev: f32) -> f32;
}

impl<R: Rng + ?Sized> Sampler for R {
    fn sample_normal(&mut self, mean: f32, std_dev: f32) -> f32 {
        if !(std_dev.is_finite() && std_dev >= 0.0) {
            return mean;
        }
        match Normal::new(mean, std_dev) {
            Ok(dist) => dist.sample(self),
            Err(_) => mean,
        }
    }

    fn sample_lognormal(&mut self, log_mean: f32, log_std_dev: f32) -> f32 {
        if !(log_std_dev.is_finite() && log_std_dev >= 0.0) {
            return log_mean.exp();
        }
        match LogNormal::new(log_mean, log_std_dev) {
            Ok(dist) => dist.sample(self),
            Err(_) => log_mean.exp(),
        }
    }
}

/// Number of fragments for an impact: faster impacts make more, bounded both ways
pub fn splash_count(impact_speed: f32, settings: &SplashSettings) -> u32 {
    let raw = (impact_speed * impact_speed * settings.count_per_speed_sq).round();
    // NaN and overflow both saturate in the cast
    (raw as u32).clamp(settings.min_count, settings.max_count)
}

/// Shatter a drop of `parent_radius` hitting at `center` with `impact_speed`.
///
/// Fragments start at `center`, launch within [0°, 180°] (never into the
/// platform) and are strictly smaller than the parent. The caller adds them
/// to the live set and retires the parent.
pub fn spawn_splash<S: Sampler + ?Sized>(
    center: Vec2,
    impact_speed: f32,
    parent_radius: f32,
    settings: &SplashSettings,
    sampler: &mut S,
    ids: &mut EntityIds,
) -> Vec<Particle> {
    let count = splash_count(impact_speed, settings);

    let angle_std_dev = settings.angle_std_dev_deg.to_radians();
    let mean_speed = impact_speed * settings.speed_factor;
    let log_mean = (parent_radius * 0.5).ln();
    let max_radius = parent_radius * settings.max_radius_fraction;
    let min_radius = settings.min_radius.min(max_radius);

    (0..count)
        .map(|_| {
            let theta = sampler
                .sample_normal(FRAC_PI_2, angle_std_dev)
                .clamp(0.0, PI);
            let speed = sampler
                .sample_normal(mean_speed, settings.speed_std_dev)
                .max(0.0);
            let radius = sampler
                .sample_lognormal(log_mean, settings.radius_log_std_dev)
                .clamp(min_radius, max_radius);

            Particle::splash(ids.next_id(), center, direction(theta) * speed, radius)
        })
        .collect()
}
