//! Directed flight: scripted movement of a body to a fixed point
//!
//! A flying body ignores velocity and collisions. Each tick it moves a fixed
//! step toward its destination; once within one step it snaps onto the
//! destination and the flight ends.

use crate::consts::FLIGHT_EPSILON;

use super::body::Body;

/// Advance a flying body by one tick.
///
/// Returns the slot index on the tick the body arrives, and `None` on every
/// other tick (including for bodies that are not flying). The flight is
/// cleared on arrival, so a slot is reported exactly once.
pub fn step_flight(body: &mut Body, step: f32) -> Option<usize> {
    let target = body.flight?;
    let to_dest = target.dest - body.pos;
    let dist = to_dest.length();

    if dist <= step.max(FLIGHT_EPSILON) {
        body.pos = target.dest;
        body.vel = glam::Vec2::ZERO;
        body.flight = None;
        return Some(target.slot);
    }

    body.pos += to_dest / dist * step;
    None
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::body::FlightTarget;

    #[test]
    fn test_flight_arrives_once() {
        let mut body = Body::new(1, Vec2::ZERO, Vec2::new(5.0, 5.0), 10.0);
        body.flight = Some(FlightTarget {
            dest: Vec2::new(50.0, 0.0),
            slot: 2,
        });

        let mut arrivals = Vec::new();
        for tick in 0..20 {
            if let Some(slot) = step_flight(&mut body, 10.0) {
                arrivals.push((tick, slot));
            }
        }

        // 50 px at 10 px/tick: moves on ticks 0..4, snaps on tick 4
        assert_eq!(arrivals, vec![(4, 2)]);
        assert_eq!(body.pos, Vec2::new(50.0, 0.0));
        assert!(body.flight.is_none());
        assert_eq!(body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_not_flying_is_noop() {
        let mut body = Body::new(1, Vec2::ONE, Vec2::ZERO, 10.0);
        assert_eq!(step_flight(&mut body, 10.0), None);
        assert_eq!(body.pos, Vec2::ONE);
    }

    #[test]
    fn test_no_arrival_before_reaching_target() {
        let mut body = Body::new(1, Vec2::ZERO, Vec2::ZERO, 10.0);
        body.flight = Some(FlightTarget {
            dest: Vec2::new(100.0, 0.0),
            slot: 0,
        });
        for _ in 0..9 {
            assert_eq!(step_flight(&mut body, 10.0), None);
            assert!((body.pos - Vec2::new(100.0, 0.0)).length() > FLIGHT_EPSILON);
        }
        assert_eq!(step_flight(&mut body, 10.0), Some(0));
    }
}
