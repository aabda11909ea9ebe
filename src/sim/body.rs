//! Circular bodies simulated by the bubble world

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable body identifier (unique within one world)
pub type BodyId = u32;

/// Scripted destination for a body in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightTarget {
    pub dest: Vec2,
    /// Slot the body is headed for (reported back on arrival)
    pub slot: usize,
}

/// A simulated circle (letter bubble)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Letter shown on the bubble
    pub label: char,
    /// Being dragged by a pointer; exempt from physics
    pub held: bool,
    /// Present only while flying to a slot
    pub flight: Option<FlightTarget>,
}

impl Body {
    pub fn new(id: BodyId, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            label: ' ',
            held: false,
            flight: None,
        }
    }

    pub fn with_label(mut self, label: char) -> Self {
        self.label = label;
        self
    }

    /// Subject to integration and collisions
    #[inline]
    pub fn is_free(&self) -> bool {
        !self.held && self.flight.is_none()
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Scale velocity down so its magnitude does not exceed `max`
    pub fn clamp_speed(&mut self, max: f32) {
        let speed = self.speed();
        if speed > max && speed > 0.0 {
            self.vel *= max / speed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_speed_keeps_direction() {
        let mut body = Body::new(1, Vec2::ZERO, Vec2::new(3.0, 4.0), 10.0);
        body.clamp_speed(1.0);
        assert!((body.speed() - 1.0).abs() < 1e-5);
        assert!((body.vel.x - 0.6).abs() < 1e-5);
        assert!((body.vel.y - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_free_flags() {
        let mut body = Body::new(1, Vec2::ZERO, Vec2::ZERO, 10.0);
        assert!(body.is_free());
        body.held = true;
        assert!(!body.is_free());
        body.held = false;
        body.flight = Some(FlightTarget {
            dest: Vec2::ONE,
            slot: 0,
        });
        assert!(!body.is_free());
        assert!(body.is_flying());
    }
}
