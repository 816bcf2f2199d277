//! Simulation settings
//!
//! Loaded from a JSON file by the runner; any field left out falls back to
//! its default. Validation happens once, before a simulation is built.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::consts::*;
use crate::sim::Platform;

/// Inclined platform geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    pub center: Vec2,
    pub width: f32,
    /// Incline in radians (negative = descending left to right)
    pub angle: f32,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            center: PLATFORM_CENTER,
            width: PLATFORM_WIDTH,
            angle: PLATFORM_ANGLE,
        }
    }
}

/// An original falling drop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropSettings {
    pub position: Vec2,
    #[serde(default)]
    pub velocity: Vec2,
    #[serde(default = "default_drop_radius")]
    pub radius: f32,
}

fn default_drop_radius() -> f32 {
    DROP_RADIUS
}

impl DropSettings {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            radius: DROP_RADIUS,
        }
    }
}

/// Splash fragmentation tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashSettings {
    pub min_count: u32,
    pub max_count: u32,
    /// Fragment count per unit of squared impact speed (before clamping)
    pub count_per_speed_sq: f32,
    /// Launch angle spread around straight up (degrees)
    pub angle_std_dev_deg: f32,
    /// Mean fragment speed as a fraction of impact speed
    pub speed_factor: f32,
    pub speed_std_dev: f32,
    /// Log-scale spread of fragment radii
    pub radius_log_std_dev: f32,
    pub min_radius: f32,
    /// Fragments never exceed this fraction of the parent radius
    pub max_radius_fraction: f32,
}

impl Default for SplashSettings {
    fn default() -> Self {
        Self {
            min_count: 10,
            max_count: 30,
            count_per_speed_sq: 3.0,
            angle_std_dev_deg: 30.0,
            speed_factor: 0.7,
            speed_std_dev: 0.7,
            radius_log_std_dev: 0.4,
            min_radius: 0.002,
            max_radius_fraction: 0.9,
        }
    }
}

/// Per-step physics parameters carried by a running simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub friction: f32,
    pub merge_distance_factor: f32,
    pub ground_epsilon: f32,
    pub splash: SplashSettings,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            friction: SLIDE_FRICTION,
            merge_distance_factor: MERGE_DISTANCE_FACTOR,
            ground_epsilon: GROUND_EPSILON,
            splash: SplashSettings::default(),
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Fixed timestep (seconds)
    pub dt: f32,
    /// Number of frames the runner advances
    pub frames: u32,
    /// RNG seed (0 = pick one from system entropy)
    pub seed: u64,
    pub physics: PhysicsSettings,
    pub platform: PlatformSettings,
    pub drops: Vec<DropSettings>,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            dt: SIM_DT,
            frames: SIM_FRAMES,
            seed: 0,
            physics: PhysicsSettings::default(),
            platform: PlatformSettings::default(),
            drops: vec![
                DropSettings::at(0.45, 1.0),
                DropSettings::at(0.50, 1.0),
                DropSettings::at(0.55, 1.0),
            ],
        }
    }
}

impl SimSettings {
    /// Load settings from a JSON file and validate them
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would put invalid state into the step loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidTimestep(self.dt));
        }
        self.physics.validate()?;
        Platform::from_settings(&self.platform)?;

        let splash = &self.physics.splash;
        for drop in &self.drops {
            if !(drop.radius.is_finite() && drop.radius > 0.0) {
                return Err(ConfigError::InvalidRadius(drop.radius));
            }
            // Largest fragment must still reach the minimum fragment size
            if drop.radius * splash.max_radius_fraction < splash.min_radius {
                return Err(ConfigError::DropTooSmall {
                    radius: drop.radius,
                    min_radius: splash.min_radius,
                });
            }
        }
        Ok(())
    }
}

impl PhysicsSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.friction.is_finite() && (0.0..1.0).contains(&self.friction)) {
            return Err(ConfigError::InvalidFriction(self.friction));
        }
        if !(self.merge_distance_factor.is_finite() && self.merge_distance_factor > 0.0) {
            return Err(ConfigError::InvalidMergeFactor(self.merge_distance_factor));
        }
        if !(self.ground_epsilon.is_finite() && self.ground_epsilon >= 0.0) {
            return Err(ConfigError::InvalidSpread {
                name: "ground_epsilon",
                value: self.ground_epsilon,
            });
        }
        self.splash.validate()
    }
}

impl SplashSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_count == 0 || self.min_count > self.max_count {
            return Err(ConfigError::InvalidSplashCount {
                min: self.min_count,
                max: self.max_count,
            });
        }
        if !(self.min_radius.is_finite()
            && self.min_radius > 0.0
            && self.max_radius_fraction > 0.0
            && self.max_radius_fraction < 1.0)
        {
            return Err(ConfigError::InvalidSplashRadius {
                min_radius: self.min_radius,
                max_fraction: self.max_radius_fraction,
            });
        }
        let spreads = [
            ("count_per_speed_sq", self.count_per_speed_sq),
            ("angle_std_dev_deg", self.angle_std_dev_deg),
            ("speed_factor", self.speed_factor),
            ("speed_std_dev", self.speed_std_dev),
            ("radius_log_std_dev", self.radius_log_std_dev),
        ];
        for (name, value) in spreads {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidSpread { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = SimSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.drops.len(), 3);
        assert_eq!(settings.frames, 200);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = SimSettings::from_json(r#"{ "frames": 50, "physics": { "friction": 0.1 } }"#)
            .unwrap();
        assert_eq!(settings.frames, 50);
        assert_eq!(settings.physics.friction, 0.1);
        assert_eq!(settings.physics.splash.max_count, 30);
        assert_eq!(settings.platform, PlatformSettings::default());
    }

    #[test]
    fn test_drop_radius_defaults() {
        let settings =
            SimSettings::from_json(r#"{ "drops": [ { "position": [0.4, 0.9] } ] }"#).unwrap();
        assert_eq!(settings.drops.len(), 1);
        assert_eq!(settings.drops[0].radius, DROP_RADIUS);
        assert_eq!(settings.drops[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut settings = SimSettings::default();
        settings.dt = 0.0;
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidTimestep(_))));

        let mut settings = SimSettings::default();
        settings.physics.friction = 1.0;
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidFriction(_))));

        let mut settings = SimSettings::default();
        settings.physics.splash.min_count = 40;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidSplashCount { .. })
        ));

        let mut settings = SimSettings::default();
        settings.drops[1].radius = -0.01;
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidRadius(_))));
    }

    #[test]
    fn test_rejects_fragment_not_smaller_than_parent() {
        for fraction in [1.0, 3.0, 0.0, f32::NAN] {
            let mut settings = SimSettings::default();
            settings.physics.splash.max_radius_fraction = fraction;
            assert!(matches!(
                settings.validate(),
                Err(ConfigError::InvalidSplashRadius { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_drop_too_small_to_splash() {
        // 0.002 * 0.9 falls below the 0.002 minimum fragment radius
        let mut settings = SimSettings::default();
        settings.drops[0].radius = 0.002;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::DropTooSmall { .. })
        ));

        // Just large enough
        settings.drops[0].radius = 0.0025;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_degenerate_platform() {
        let mut settings = SimSettings::default();
        settings.platform.width = 0.0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::DegeneratePlatform { .. })
        ));

        let mut settings = SimSettings::default();
        settings.platform.center = Vec2::new(0.5, 0.0);
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::PlatformBelowGround { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            SimSettings::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        assert!(matches!(
            SimSettings::load("/nonexistent/splashdown.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
