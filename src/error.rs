//! Error types for Splashdown.
//!
//! The step loop itself cannot fail. Everything here is raised while loading
//! settings or constructing the platform and particles, so invalid values are
//! rejected before the first frame runs.

use std::fmt;

/// Errors that can occur while building a simulation.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read a settings file.
    Io(std::io::Error),
    /// Settings file is not valid JSON for [`crate::SimSettings`].
    Parse(serde_json::Error),
    /// Platform has zero/non-finite width or an angle with no finite slope.
    DegeneratePlatform { width: f32, angle: f32 },
    /// Platform dips below the ground plane.
    PlatformBelowGround { start_y: f32, end_y: f32 },
    /// Particle radius must be finite and positive.
    InvalidRadius(f32),
    /// Particle position or velocity is not finite.
    NonFiniteState,
    /// Timestep must be finite and positive.
    InvalidTimestep(f32),
    /// Friction must lie in [0, 1).
    InvalidFriction(f32),
    /// Merge distance factor must be finite and positive.
    InvalidMergeFactor(f32),
    /// Splash count bounds are inverted or empty.
    InvalidSplashCount { min: u32, max: u32 },
    /// Splash fragment size limits cannot be satisfied.
    InvalidSplashRadius { min_radius: f32, max_fraction: f32 },
    /// Drop is too small to produce a fragment of at least the minimum radius.
    DropTooSmall { radius: f32, min_radius: f32 },
    /// A spread parameter is negative or non-finite.
    InvalidSpread { name: &'static str, value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read settings: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse settings: {}", e),
            ConfigError::DegeneratePlatform { width, angle } => write!(
                f,
                "Degenerate platform (width {}, angle {} rad): width must be positive and the incline not vertical",
                width, angle
            ),
            ConfigError::PlatformBelowGround { start_y, end_y } => write!(
                f,
                "Platform endpoints must be above the ground (start y {}, end y {})",
                start_y, end_y
            ),
            ConfigError::InvalidRadius(r) => write!(f, "Particle radius must be positive, got {}", r),
            ConfigError::NonFiniteState => write!(f, "Particle position and velocity must be finite"),
            ConfigError::InvalidTimestep(dt) => write!(f, "Timestep must be positive, got {}", dt),
            ConfigError::InvalidFriction(v) => write!(f, "Friction must be in [0, 1), got {}", v),
            ConfigError::InvalidMergeFactor(v) => {
                write!(f, "Merge distance factor must be positive, got {}", v)
            }
            ConfigError::InvalidSplashCount { min, max } => {
                write!(f, "Splash count bounds invalid: min {} max {}", min, max)
            }
            ConfigError::InvalidSplashRadius {
                min_radius,
                max_fraction,
            } => write!(
                f,
                "Splash radius limits invalid: min radius {} max fraction {}",
                min_radius, max_fraction
            ),
            ConfigError::DropTooSmall { radius, min_radius } => write!(
                f,
                "Drop radius {} cannot splash into fragments of at least {}",
                radius, min_radius
            ),
            ConfigError::InvalidSpread { name, value } => {
                write!(f, "{} must be finite and non-negative, got {}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
