//! Inclined platform geometry
//!
//! The platform is a straight segment defined by:
//! - center: midpoint of the segment
//! - width: horizontal extent (start.x = center.x - width/2, end.x = center.x + width/2)
//! - angle: incline in radians (negative descends from left to right)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Particle;
use crate::ConfigError;
use crate::consts::*;
use crate::settings::PlatformSettings;

/// An immutable inclined segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    center: Vec2,
    width: f32,
    angle: f32,
    start: Vec2,
    end: Vec2,
    slope: f32,
}

impl Default for Platform {
    fn default() -> Self {
        Self::from_parts(PLATFORM_CENTER, PLATFORM_WIDTH, PLATFORM_ANGLE)
    }
}

impl Platform {
    /// Build a platform, rejecting degenerate geometry
    pub fn new(center: Vec2, width: f32, angle: f32) -> Result<Self, ConfigError> {
        let flat_enough = angle.is_finite() && angle.cos().abs() > 1e-6;
        if !(width.is_finite() && width > 0.0 && flat_enough && center.is_finite()) {
            return Err(ConfigError::DegeneratePlatform { width, angle });
        }
        let platform = Self::from_parts(center, width, angle);
        if platform.start.y < 0.0 || platform.end.y < 0.0 {
            return Err(ConfigError::PlatformBelowGround {
                start_y: platform.start.y,
                end_y: platform.end.y,
            });
        }
        Ok(platform)
    }

    pub fn from_settings(settings: &PlatformSettings) -> Result<Self, ConfigError> {
        Self::new(settings.center, settings.width, settings.angle)
    }

    fn from_parts(center: Vec2, width: f32, angle: f32) -> Self {
        let dx = width / 2.0;
        let dy = angle.tan() * dx;
        let start = center - Vec2::new(dx, dy);
        let end = center + Vec2::new(dx, dy);
        let slope = (end.y - start.y) / (end.x - start.x);
        Self {
            center,
            width,
            angle,
            start,
            end,
            slope,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Left endpoint
    #[inline]
    pub fn start(&self) -> Vec2 {
        self.start
    }

    /// Right endpoint
    #[inline]
    pub fn end(&self) -> Vec2 {
        self.end
    }

    #[inline]
    pub fn slope(&self) -> f32 {
        self.slope
    }

    /// Surface height at x.
    ///
    /// Extrapolates linearly outside [start.x, end.x]; only trust it inside.
    #[inline]
    pub fn height_at(&self, x: f32) -> f32 {
        self.start.y + self.slope * (x - self.start.x)
    }

    /// Whether x lies within the segment's horizontal extent
    #[inline]
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.start.x && x <= self.end.x
    }

    /// Unit tangent from start to end
    pub fn tangent(&self) -> Vec2 {
        (self.end - self.start).normalize()
    }

    /// Segment-bounded half-plane test: the circle's lowest point is at or
    /// below the surface and its center is over the segment.
    pub fn collides(&self, pos: Vec2, radius: f32) -> bool {
        self.contains_x(pos.x) && pos.y - radius <= self.height_at(pos.x)
    }

    pub fn check_collision(&self, particle: &Particle) -> bool {
        self.collides(particle.pos, particle.radius)
    }

    /// Sample points along the surface (for rendering or debugging)
    pub fn sample_surface(&self, num_points: usize) -> Vec<Vec2> {
        (0..num_points)
            .map(|i| {
                let t = i as f32 / (num_points - 1).max(1) as f32;
                self.start.lerp(self.end, t)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_endpoints() {
        let platform = Platform::default();
        assert!((platform.start() - Vec2::new(0.3, 0.25 + 0.2 * (PI_6_TAN))).length() < 1e-5);
        assert!((platform.end() - Vec2::new(0.7, 0.25 - 0.2 * (PI_6_TAN))).length() < 1e-5);
        assert!(platform.slope() < 0.0);
        assert!((platform.height_at(0.5) - 0.25).abs() < 1e-6);
    }

    const PI_6_TAN: f32 = 0.577_350_3;

    #[test]
    fn test_height_at_endpoints() {
        let platform = Platform::new(Vec2::new(0.5, 0.5), 0.4, 0.3).unwrap();
        assert!((platform.height_at(platform.start().x) - platform.start().y).abs() < 1e-6);
        assert!((platform.height_at(platform.end().x) - platform.end().y).abs() < 1e-6);
    }

    #[test]
    fn test_collision_inside_segment() {
        let platform = Platform::default();
        // Just touching the surface at the center
        assert!(platform.collides(Vec2::new(0.5, 0.25 + 0.02), 0.02));
        // Clearly above
        assert!(!platform.collides(Vec2::new(0.5, 0.4), 0.02));
        // Below the surface still counts
        assert!(platform.collides(Vec2::new(0.5, 0.2), 0.02));
    }

    #[test]
    fn test_no_collision_outside_segment() {
        let platform = Platform::default();
        // Right of the segment and below the extended line
        assert!(!platform.collides(Vec2::new(0.75, 0.05), 0.02));
        // Left of the segment, overlapping the extended line
        assert!(!platform.collides(Vec2::new(0.29, platform.height_at(0.29)), 0.02));
    }

    #[test]
    fn test_rejects_degenerate() {
        assert!(matches!(
            Platform::new(Vec2::new(0.5, 0.25), 0.0, 0.0),
            Err(ConfigError::DegeneratePlatform { .. })
        ));
        assert!(matches!(
            Platform::new(Vec2::new(0.5, 0.25), 0.4, std::f32::consts::FRAC_PI_2),
            Err(ConfigError::DegeneratePlatform { .. })
        ));
        assert!(matches!(
            Platform::new(Vec2::new(0.5, 0.01), 0.4, -0.5),
            Err(ConfigError::PlatformBelowGround { .. })
        ));
    }

    #[test]
    fn test_tangent_points_downhill() {
        let tangent = Platform::default().tangent();
        assert!((tangent.length() - 1.0).abs() < 1e-6);
        assert!(tangent.x > 0.0 && tangent.y < 0.0);
    }

    #[test]
    fn test_sample_surface() {
        let platform = Platform::default();
        let points = platform.sample_surface(5);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], platform.start());
        assert!((points[4] - platform.end()).length() < 1e-6);
        for p in points {
            assert!((platform.height_at(p.x) - p.y).abs() < 1e-5);
        }
    }

    proptest! {
        #[test]
        fn prop_collision_requires_segment_range(x in 0.0f32..1.0, y in 0.0f32..1.0) {
            let platform = Platform::default();
            if platform.collides(Vec2::new(x, y), 0.02) {
                prop_assert!(platform.contains_x(x));
            }
        }

        #[test]
        fn prop_height_is_affine(a in 0.3f32..0.7, b in 0.3f32..0.7) {
            let platform = Platform::default();
            let mid = platform.height_at((a + b) / 2.0);
            let avg = (platform.height_at(a) + platform.height_at(b)) / 2.0;
            prop_assert!((mid - avg).abs() < 1e-5);
        }
    }
}
