//! AI opponent controller
//!
//! The AI does not track the ball every tick. It re-plans once per reaction
//! delay: project the ball's straight-line path to the paddle's contact
//! line, folding it back off the side walls, then either trust that
//! prediction (with probability `accuracy`) or aim somewhere near it. Between
//! re-plans the paddle slides toward the current target at a capped speed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::LevelParams;
use super::state::{Ball, Paddle};
use crate::consts::AI_MISS_RANGE;

/// Where a ball travelling in a straight line will cross `line_y`.
///
/// Side walls sit at `radius` and `width - radius` (the reachable range of
/// the ball centre); each wall crossing mirrors the path. Returns `None` if
/// the ball is not heading toward the line.
pub fn predict_intercept_x(pos: Vec2, vel: Vec2, line_y: f32, width: f32, radius: f32) -> Option<f32> {
    if vel.y.abs() < f32::EPSILON {
        return None;
    }
    let t = (line_y - pos.y) / vel.y;
    if t < 0.0 {
        return None;
    }

    let raw_x = pos.x + vel.x * t;
    let span = width - 2.0 * radius;
    if span <= 0.0 {
        return Some(width / 2.0);
    }

    // Unfold: the mirrored path repeats every two spans
    let period = 2.0 * span;
    let mut u = (raw_x - radius).rem_euclid(period);
    if u > span {
        u = period - u;
    }
    Some(radius + u)
}

/// The AI-controlled paddle plus its decision state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpponentAgent {
    pub paddle: Paddle,
    /// Max paddle speed (pixels/s)
    pub speed: f32,
    /// Seconds between re-plans
    pub reaction_delay: f32,
    /// Where the paddle is heading
    pub target_x: f32,
    /// Probability of aiming at the exact prediction
    pub accuracy: f64,
    /// Time since the last re-plan
    elapsed: f32,
}

impl OpponentAgent {
    pub fn new(paddle: Paddle, level: &LevelParams) -> Self {
        let target_x = paddle.x;
        Self {
            paddle,
            speed: level.ai_speed,
            reaction_delay: level.reaction_delay,
            target_x,
            accuracy: level.accuracy.clamp(0.0, 1.0),
            elapsed: 0.0,
        }
    }

    /// Re-centre and pick up new level parameters
    pub fn reset(&mut self, center_x: f32, level: &LevelParams) {
        self.paddle.x = center_x;
        self.paddle.vel_x = 0.0;
        self.target_x = center_x;
        self.speed = level.ai_speed;
        self.reaction_delay = level.reaction_delay;
        self.accuracy = level.accuracy.clamp(0.0, 1.0);
        self.elapsed = 0.0;
    }

    /// The y at which the ball centre touches this paddle's face
    pub fn contact_line(&self, ball: &Ball) -> f32 {
        self.paddle.y + self.paddle.height / 2.0 + ball.radius
    }

    /// Recompute the target from the ball's current trajectory
    pub fn replan<R: Rng>(&mut self, ball: &Ball, width: f32, rng: &mut R) {
        let line_y = self.contact_line(ball);
        let target = match predict_intercept_x(ball.pos, ball.vel, line_y, width, ball.radius) {
            Some(x) if rng.random_bool(self.accuracy) => x,
            Some(x) => {
                let miss = rng.random_range(-AI_MISS_RANGE..=AI_MISS_RANGE);
                log::debug!("AI misjudges ball by {:.1}px", miss);
                x + miss
            }
            // Ball heading away: drift back to the middle
            None => width / 2.0,
        };
        self.target_x = self.paddle.clamp_x(target, width);
    }

    /// One controller tick
    pub fn update<R: Rng>(&mut self, ball: &Ball, dt: f32, width: f32, rng: &mut R) {
        self.elapsed += dt;
        if self.elapsed >= self.reaction_delay {
            self.elapsed = 0.0;
            self.replan(ball, width, rng);
        }
        self.paddle.move_toward(self.target_x, dt, self.speed, width);
    }
}
