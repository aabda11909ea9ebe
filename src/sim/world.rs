//! Bubble world: the per-round simulation context
//!
//! Owns every body of a round plus the seeded RNG used for drift. One call
//! to [`BubbleWorld::step`] is one display frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::SimError;
use super::body::{Body, BodyId, FlightTarget};
use super::bounds::Bounds;
use super::collision::{reflect_walls, resolve_pairs_within};
use super::flight::step_flight;
use crate::consts::MAX_BODIES;
use crate::settings::BubbleTuning;

/// Something that happened during a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// A body bounced off a wall
    WallHit { body: BodyId },
    /// Two bodies bounced off each other
    Collision { a: BodyId, b: BodyId },
    /// A flying body reached its slot (emitted once per flight)
    Arrived { body: BodyId, slot: usize },
}

/// All bodies of one round
#[derive(Debug, Clone)]
pub struct BubbleWorld {
    pub bounds: Bounds,
    pub tuning: BubbleTuning,
    /// Bodies sorted by id for deterministic iteration
    bodies: Vec<Body>,
    events: Vec<WorldEvent>,
    rng: Pcg32,
    next_id: BodyId,
    /// Simulation tick counter
    pub ticks: u64,
}

impl BubbleWorld {
    pub fn new(bounds: Bounds, tuning: BubbleTuning, seed: u64) -> Self {
        Self {
            bounds,
            tuning,
            bodies: Vec::with_capacity(MAX_BODIES),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            ticks: 0,
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    fn body_mut(&mut self, id: BodyId) -> Result<&mut Body, SimError> {
        self.bodies
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(SimError::UnknownBody(id))
    }

    /// Events produced by the most recent step
    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Add a bubble; the position is clamped into the playfield
    pub fn spawn(&mut self, pos: Vec2, vel: Vec2, label: char) -> Result<BodyId, SimError> {
        if self.bodies.len() >= MAX_BODIES {
            return Err(SimError::WorldFull(MAX_BODIES));
        }
        let id = self.next_id;
        self.next_id += 1;

        let radius = self.tuning.radius;
        let pos = self.bounds.clamp_center(pos, radius);
        self.bodies.push(Body::new(id, pos, vel, radius).with_label(label));
        Ok(id)
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let index = self.bodies.iter().position(|b| b.id == id)?;
        Some(self.bodies.remove(index))
    }

    /// Drop every body (round reset)
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.events.clear();
    }

    /// Random position where a bubble does not overlap any other free body.
    ///
    /// Falls back to a plain random position after a bounded number of tries.
    pub fn random_free_position(&mut self) -> Vec2 {
        let r = self.tuning.radius;
        let (max_x, max_y) = (self.bounds.max_x(r), self.bounds.max_y(r));
        let mut candidate = self.bounds.center();

        for _ in 0..64 {
            candidate = Vec2::new(
                self.rng.random_range(r..=max_x),
                self.rng.random_range(r..=max_y),
            );
            let clear = self
                .bodies
                .iter()
                .filter(|b| !b.is_flying())
                .all(|b| (b.pos - candidate).length() >= b.radius + r);
            if clear {
                break;
            }
        }

        candidate
    }

    /// Random initial drift velocity
    pub fn random_velocity(&mut self) -> Vec2 {
        let max = self.tuning.max_speed;
        if max <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            self.rng.random_range(-max..=max),
            self.rng.random_range(-max..=max),
        ) * 0.5
    }

    /// Start dragging a body
    pub fn grab(&mut self, id: BodyId) -> Result<(), SimError> {
        let body = self.body_mut(id)?;
        if body.is_flying() {
            return Err(SimError::AlreadyFlying(id));
        }
        body.held = true;
        body.vel = Vec2::ZERO;
        Ok(())
    }

    /// Move a held body to follow the pointer
    pub fn drag_to(&mut self, id: BodyId, pos: Vec2) -> Result<(), SimError> {
        let bounds = self.bounds;
        let body = self.body_mut(id)?;
        if body.held {
            body.pos = bounds.clamp_center(pos, body.radius);
        }
        Ok(())
    }

    /// Let go of a held body, handing it a velocity
    pub fn release(&mut self, id: BodyId, vel: Vec2) -> Result<(), SimError> {
        let max_speed = self.tuning.max_speed;
        let body = self.body_mut(id)?;
        body.held = false;
        body.vel = vel;
        body.clamp_speed(max_speed);
        Ok(())
    }

    /// Send a body flying to `dest`; it will report `slot` on arrival.
    ///
    /// At most one body may be in flight to a given slot. `dest` is
    /// clamped so the body never leaves the playfield.
    pub fn send_to_slot(&mut self, id: BodyId, dest: Vec2, slot: usize) -> Result<(), SimError> {
        let bounds = self.bounds;
        if self
            .bodies
            .iter()
            .any(|b| b.flight.is_some_and(|f| f.slot == slot))
        {
            return Err(SimError::SlotOccupied(slot));
        }
        let body = self.body_mut(id)?;
        if body.is_flying() {
            return Err(SimError::AlreadyFlying(id));
        }
        body.held = false;
        body.vel = Vec2::ZERO;
        let dest = bounds.clamp_center(dest, body.radius);
        body.flight = Some(FlightTarget { dest, slot });
        log::debug!("Body {} flying to slot {}", id, slot);
        Ok(())
    }

    /// Advance the world by one tick and return what happened.
    ///
    /// Order: integrate free bodies (with wall bounces), separate
    /// overlapping pairs, confine everything to the playfield, advance
    /// flights.
    pub fn step(&mut self) -> &[WorldEvent] {
        self.events.clear();
        self.ticks += 1;

        let tuning = self.tuning;
        let bounds = self.bounds;

        // 1. Integrate
        for body in self.bodies.iter_mut().filter(|b| b.is_free()) {
            body.pos += body.vel;
            if tuning.jitter > 0.0 {
                body.vel += Vec2::new(
                    self.rng.random_range(-tuning.jitter..=tuning.jitter),
                    self.rng.random_range(-tuning.jitter..=tuning.jitter),
                );
            }
            body.clamp_speed(tuning.max_speed);
            if reflect_walls(body, &bounds, tuning.wall_damping) {
                self.events.push(WorldEvent::WallHit { body: body.id });
            }
        }

        // 2. Pairwise separation
        for (a, b) in resolve_pairs_within(&mut self.bodies, &bounds, tuning.restitution) {
            self.events.push(WorldEvent::Collision { a, b });
        }

        // 3. Separation may have pushed bodies past a wall
        for body in self.bodies.iter_mut().filter(|b| !b.is_flying()) {
            body.pos = bounds.clamp_center(body.pos, body.radius);
        }

        // 4. Flights
        for body in self.bodies.iter_mut() {
            if let Some(slot) = step_flight(body, tuning.flight_step) {
                self.events.push(WorldEvent::Arrived { body: body.id, slot });
            }
        }

        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> BubbleWorld {
        BubbleWorld::new(Bounds::new(400.0, 300.0), BubbleTuning::default(), 42)
    }

    #[test]
    fn test_spawn_clamps_into_bounds() {
        let mut world = world();
        let id = world.spawn(Vec2::new(-100.0, 1000.0), Vec2::ZERO, 'a').unwrap();
        let body = world.body(id).unwrap();
        assert!(world.bounds.contains(body.pos, body.radius));
        assert_eq!(body.label, 'a');
    }

    #[test]
    fn test_world_full() {
        let mut world = world();
        for _ in 0..MAX_BODIES {
            world.spawn(Vec2::ZERO, Vec2::ZERO, 'x').unwrap();
        }
        assert!(matches!(
            world.spawn(Vec2::ZERO, Vec2::ZERO, 'x'),
            Err(SimError::WorldFull(_))
        ));
    }

    #[test]
    fn test_step_moves_free_bodies_only() {
        let mut world = world();
        world.tuning.jitter = 0.0;
        let free = world.spawn(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 'a').unwrap();
        let held = world.spawn(Vec2::new(250.0, 200.0), Vec2::new(1.0, 0.0), 'b').unwrap();
        world.grab(held).unwrap();

        world.step();
        assert_eq!(world.body(free).unwrap().pos, Vec2::new(101.0, 100.0));
        assert_eq!(world.body(held).unwrap().pos, Vec2::new(250.0, 200.0));
    }

    #[test]
    fn test_slot_exclusive() {
        let mut world = world();
        let a = world.spawn(Vec2::new(50.0, 50.0), Vec2::ZERO, 'a').unwrap();
        let b = world.spawn(Vec2::new(200.0, 50.0), Vec2::ZERO, 'b').unwrap();
        world.send_to_slot(a, Vec2::new(300.0, 250.0), 0).unwrap();
        assert!(matches!(
            world.send_to_slot(b, Vec2::new(300.0, 250.0), 0),
            Err(SimError::SlotOccupied(0))
        ));
        assert!(matches!(
            world.send_to_slot(a, Vec2::new(100.0, 250.0), 1),
            Err(SimError::AlreadyFlying(_))
        ));
        assert!(matches!(
            world.send_to_slot(99, Vec2::ZERO, 2),
            Err(SimError::UnknownBody(99))
        ));
    }

    #[test]
    fn test_flight_emits_single_arrival() {
        let mut world = world();
        let id = world.spawn(Vec2::new(50.0, 50.0), Vec2::new(1.0, 1.0), 'a').unwrap();
        let dest = Vec2::new(300.0, 250.0);
        world.send_to_slot(id, dest, 3).unwrap();

        let mut arrivals = 0;
        for _ in 0..200 {
            let events = world.step().to_vec();
            for event in events {
                if let WorldEvent::Arrived { body, slot } = event {
                    assert_eq!((body, slot), (id, 3));
                    assert_eq!(world.body(id).unwrap().pos, dest);
                    arrivals += 1;
                }
            }
        }
        assert_eq!(arrivals, 1);
        // The slot is free again once the flight has landed
        let other = world.spawn(Vec2::new(60.0, 60.0), Vec2::ZERO, 'b').unwrap();
        assert!(world.send_to_slot(other, dest, 3).is_ok());
    }

    #[test]
    fn test_overlapping_pair_separates() {
        let mut world = world();
        world.tuning.jitter = 0.0;
        let a = world.spawn(Vec2::new(190.0, 150.0), Vec2::ZERO, 'a').unwrap();
        let b = world.spawn(Vec2::new(210.0, 150.0), Vec2::ZERO, 'b').unwrap();
        let events = world.step().to_vec();
        assert!(events.contains(&WorldEvent::Collision { a, b }));

        let pa = world.body(a).unwrap().pos;
        let pb = world.body(b).unwrap().pos;
        assert!((pb - pa).length() >= 2.0 * world.tuning.radius - 1e-3);
    }

    #[test]
    fn test_wall_pinned_pair_fully_separates() {
        let mut world = world();
        world.tuning.jitter = 0.0;
        let r = world.tuning.radius;
        let a = world.spawn(Vec2::new(r, 150.0), Vec2::ZERO, 'a').unwrap();
        let b = world.spawn(Vec2::new(r + 10.0, 150.0), Vec2::ZERO, 'b').unwrap();

        world.step();
        let pa = world.body(a).unwrap().pos;
        let pb = world.body(b).unwrap().pos;
        assert!(pa.distance(pb) >= 2.0 * r - 1e-3, "dist {}", pa.distance(pb));
        assert!(world.bounds.contains(pa, r));
        assert!(world.bounds.contains(pb, r));
    }

    #[test]
    fn test_flight_destination_clamped() {
        let mut world = world();
        let r = world.tuning.radius;
        let id = world.spawn(Vec2::new(200.0, 150.0), Vec2::ZERO, 'a').unwrap();
        world.send_to_slot(id, Vec2::new(-100.0, 1000.0), 0).unwrap();
        let expected = world.bounds.clamp_center(Vec2::new(-100.0, 1000.0), r);
        assert_eq!(world.body(id).unwrap().flight.unwrap().dest, expected);

        let mut landed = None;
        for _ in 0..100 {
            world.step();
            let body = world.body(id).unwrap();
            assert!(world.bounds.contains(body.pos, r));
            if landed.is_none() && !body.is_flying() {
                landed = Some(body.pos);
            }
        }
        assert_eq!(landed, Some(expected));
    }

    #[test]
    fn test_drag_and_release() {
        let mut world = world();
        let id = world.spawn(Vec2::new(100.0, 100.0), Vec2::ZERO, 'a').unwrap();
        world.grab(id).unwrap();
        world.drag_to(id, Vec2::new(-50.0, 120.0)).unwrap();
        assert_eq!(world.body(id).unwrap().pos.x, world.tuning.radius);

        world.release(id, Vec2::new(100.0, 0.0)).unwrap();
        let body = world.body(id).unwrap();
        assert!(body.is_free());
        assert!(body.speed() <= world.tuning.max_speed + 1e-5);
    }

    #[test]
    fn test_random_free_position_avoids_overlap() {
        let mut world = world();
        world.spawn(Vec2::new(200.0, 150.0), Vec2::ZERO, 'a').unwrap();
        let pos = world.random_free_position();
        assert!(world.bounds.contains(pos, world.tuning.radius));
        assert!((pos - Vec2::new(200.0, 150.0)).length() >= 2.0 * world.tuning.radius);
    }

    #[test]
    fn test_determinism() {
        let mut w1 = world();
        let mut w2 = world();
        for w in [&mut w1, &mut w2] {
            for c in ['c', 'a', 't'] {
                let pos = w.random_free_position();
                let vel = w.random_velocity();
                w.spawn(pos, vel, c).unwrap();
            }
        }
        for _ in 0..100 {
            w1.step();
            w2.step();
        }
        for (a, b) in w1.bodies().iter().zip(w2.bodies()) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.vel, b.vel);
        }
    }
}
