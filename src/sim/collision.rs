//! Collision detection and response for bubbles
//!
//! Two kinds of contact: a body against the playfield walls, and a body
//! against another body. Both are resolved by position correction plus a
//! damped velocity change. Pairwise checks are O(n²), fine for a handful of
//! bubbles.

use glam::Vec2;

use super::body::Body;
use super::bounds::Bounds;

/// Result of a pair contact check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the circles overlap
    pub hit: bool,
    /// Unit normal from the first body toward the second
    pub normal: Vec2,
    /// Overlap depth (sum of radii minus centre distance)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check overlap between two circles
pub fn circle_circle(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let delta = b_pos - a_pos;
    let dist = delta.length();
    let min_dist = a_radius + b_radius;

    if dist >= min_dist {
        return CollisionResult::miss();
    }

    // Coincident centres have no direction; pick +x
    let normal = if dist > 1e-6 { delta / dist } else { Vec2::X };

    CollisionResult {
        hit: true,
        normal,
        penetration: min_dist - dist,
    }
}

/// Reflect a body off any wall it has crossed.
///
/// The velocity component normal to the wall is turned inward and scaled by
/// `damping`, and the position is clamped back inside. Returns true if any
/// wall was touched.
pub fn reflect_walls(body: &mut Body, bounds: &Bounds, damping: f32) -> bool {
    let r = body.radius;
    let mut hit = false;

    if body.pos.x < r {
        body.pos.x = r;
        body.vel.x = body.vel.x.abs() * damping;
        hit = true;
    } else if body.pos.x > bounds.max_x(r) {
        body.pos.x = bounds.max_x(r);
        body.vel.x = -body.vel.x.abs() * damping;
        hit = true;
    }

    if body.pos.y < r {
        body.pos.y = r;
        body.vel.y = body.vel.y.abs() * damping;
        hit = true;
    } else if body.pos.y > bounds.max_y(r) {
        body.pos.y = bounds.max_y(r);
        body.vel.y = -body.vel.y.abs() * damping;
        hit = true;
    }

    hit
}

/// Push two overlapping bodies apart and exchange their velocities.
///
/// Each body moves half the overlap along the centre line; each then takes
/// `restitution` times the other's prior velocity.
pub fn separate_pair(a: &mut Body, b: &mut Body, restitution: f32) -> bool {
    let result = circle_circle(a.pos, a.radius, b.pos, b.radius);
    if !result.hit {
        return false;
    }

    let push = result.normal * (result.penetration / 2.0);
    a.pos -= push;
    b.pos += push;

    let (va, vb) = (a.vel, b.vel);
    a.vel = vb * restitution;
    b.vel = va * restitution;

    true
}

/// [`separate_pair`] for bodies confined to `bounds`.
///
/// A body pinned against a wall cannot take its half of the push, so the
/// partner takes whatever the wall refused. Both end up inside `bounds`.
pub fn separate_pair_within(a: &mut Body, b: &mut Body, bounds: &Bounds, restitution: f32) -> bool {
    if !separate_pair(a, b, restitution) {
        return false;
    }

    let (a_pushed, b_pushed) = (a.pos, b.pos);
    let a_kept = bounds.clamp_center(a_pushed, a.radius);
    let b_kept = bounds.clamp_center(b_pushed, b.radius);
    a.pos = bounds.clamp_center(a_kept + (b_kept - b_pushed), a.radius);
    b.pos = bounds.clamp_center(b_kept + (a_kept - a_pushed), b.radius);
    true
}

/// Resolve every overlapping pair of free bodies.
///
/// Returns the ids of each pair that touched, in iteration order.
pub fn resolve_pairs(bodies: &mut [Body], restitution: f32) -> Vec<(u32, u32)> {
    sweep_pairs(bodies, |a, b| separate_pair(a, b, restitution))
}

/// [`resolve_pairs`] with every push kept inside `bounds`
pub fn resolve_pairs_within(bodies: &mut [Body], bounds: &Bounds, restitution: f32) -> Vec<(u32, u32)> {
    sweep_pairs(bodies, |a, b| separate_pair_within(a, b, bounds, restitution))
}

fn sweep_pairs(bodies: &mut [Body], mut separate: impl FnMut(&mut Body, &mut Body) -> bool) -> Vec<(u32, u32)> {
    let mut contacts = Vec::new();

    for i in 0..bodies.len() {
        if !bodies[i].is_free() {
            continue;
        }
        // split_at_mut so we can hold both bodies mutably
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if !b.is_free() {
                continue;
            }
            if separate(a, b) {
                contacts.push((a.id, b.id));
            }
        }
    }

    contacts
}
