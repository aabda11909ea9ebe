//! Rectangular playfield bounds
//!
//! Origin is the top-left corner; x grows right, y grows down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Playfield rectangle `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Largest x a circle of `radius` may have its centre at
    #[inline]
    pub fn max_x(&self, radius: f32) -> f32 {
        (self.width - radius).max(radius)
    }

    /// Largest y a circle of `radius` may have its centre at
    #[inline]
    pub fn max_y(&self, radius: f32) -> f32 {
        (self.height - radius).max(radius)
    }

    /// Clamp a circle centre so the circle stays inside the playfield.
    ///
    /// A playfield narrower than the circle pins the centre at `radius`.
    pub fn clamp_center(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            pos.x.clamp(radius, self.max_x(radius)),
            pos.y.clamp(radius, self.max_y(radius)),
        )
    }

    /// Whether a circle centre lies in `[radius, bound - radius]` on both axes
    pub fn contains(&self, pos: Vec2, radius: f32) -> bool {
        const EPS: f32 = 1e-3;
        pos.x >= radius - EPS
            && pos.x <= self.max_x(radius) + EPS
            && pos.y >= radius - EPS
            && pos.y <= self.max_y(radius) + EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_center() {
        let bounds = Bounds::new(100.0, 50.0);
        assert_eq!(bounds.clamp_center(Vec2::new(-5.0, 60.0), 10.0), Vec2::new(10.0, 40.0));
        assert_eq!(bounds.clamp_center(Vec2::new(50.0, 25.0), 10.0), Vec2::new(50.0, 25.0));
    }

    #[test]
    fn test_degenerate_bounds_pin_to_radius() {
        let bounds = Bounds::new(10.0, 10.0);
        let clamped = bounds.clamp_center(Vec2::new(100.0, -100.0), 20.0);
        assert_eq!(clamped, Vec2::new(20.0, 20.0));
        assert!(bounds.contains(clamped, 20.0));
    }
}
