//! Pong simulation tick
//!
//! Advances the table by one frame: input, AI, ball, contacts, scoring.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{PongPhase, PongState, Side};
use crate::consts::*;

/// Seconds before the AI serves on its own
pub const AI_SERVE_DELAY: f32 = 1.0;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Device tilt, -1 (full left) to 1 (full right)
    pub tilt: f32,
    /// Serve (tap)
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PongEvent {
    WallHit,
    PaddleHit { side: Side },
    Point { scorer: Side },
    LevelUp { level: u32 },
    GameOver,
}

/// Effective tilt after sensitivity, clamping and dead zone
pub fn effective_tilt(raw: f32, sensitivity: f32) -> f32 {
    let tilt = (raw * sensitivity).clamp(-1.0, 1.0);
    if tilt.abs() < TILT_DEAD_ZONE || !tilt.is_finite() {
        0.0
    } else {
        tilt
    }
}

/// Advance the game state by one frame, returning what happened
pub fn tick(state: &mut PongState, input: &TickInput, dt: f32) -> Vec<PongEvent> {
    let mut events = Vec::new();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            PongPhase::Playing | PongPhase::Serve => {
                state.phase = PongPhase::Paused;
                return events;
            }
            PongPhase::Paused => {
                // A parked ball means we paused during a serve
                state.phase = if state.ball.vel == Vec2::ZERO {
                    PongPhase::Serve
                } else {
                    PongPhase::Playing
                };
            }
            PongPhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if matches!(state.phase, PongPhase::Paused | PongPhase::GameOver) {
        return events;
    }

    state.time_ticks += 1;

    // Player paddle follows tilt
    let tilt = effective_tilt(input.tilt, state.tilt_sensitivity);
    let width = state.bounds.width;
    let player_target = state.player.x + tilt * PLAYER_SPEED * dt;
    state.player.move_toward(player_target, dt, PLAYER_SPEED, width);

    // AI always runs so it can reposition between points
    state.opponent.update(&state.ball, dt, width, &mut state.rng);

    match state.phase {
        PongPhase::Serve => {
            // Parked ball follows the serving paddle
            state.park_ball();
            state.serve_timer += dt;
            let ai_ready = state.server == Side::Opponent && state.serve_timer >= AI_SERVE_DELAY;
            if input.launch || ai_ready {
                state.launch();
            }
        }
        PongPhase::Playing => step_ball(state, dt, &mut events),
        PongPhase::Paused | PongPhase::GameOver => {}
    }

    events
}

fn step_ball(state: &mut PongState, dt: f32, events: &mut Vec<PongEvent>) {
    let width = state.bounds.width;
    let ball = &mut state.ball;
    ball.pos += ball.vel * dt;

    // Side walls
    let r = ball.radius;
    if ball.pos.x < r {
        ball.pos.x = r;
        ball.vel.x = ball.vel.x.abs();
        events.push(PongEvent::WallHit);
    } else if ball.pos.x > width - r {
        ball.pos.x = width - r;
        ball.vel.x = -ball.vel.x.abs();
        events.push(PongEvent::WallHit);
    }

    // Paddles: only count a hit when the ball moves toward the paddle
    if state.ball.vel.y > 0.0 && state.player.touches(&state.ball) {
        bounce_off_paddle(state, Side::Player);
        events.push(PongEvent::PaddleHit { side: Side::Player });
    } else if state.ball.vel.y < 0.0 && state.opponent.paddle.touches(&state.ball) {
        bounce_off_paddle(state, Side::Opponent);
        events.push(PongEvent::PaddleHit { side: Side::Opponent });
    }

    // End lines
    let r = state.ball.radius;
    if state.ball.pos.y - r > state.bounds.height {
        score_point(state, Side::Opponent, events);
    } else if state.ball.pos.y + r < 0.0 {
        score_point(state, Side::Player, events);
    }
}

/// Reflect the ball off a paddle face with english from the hit offset
fn bounce_off_paddle(state: &mut PongState, side: Side) {
    let paddle = state.paddle(side).clone();
    let ball = &mut state.ball;

    let reach = paddle.half_width() + ball.radius;
    let offset = ((ball.pos.x - paddle.x) / reach).clamp(-1.0, 1.0);
    let speed = (ball.speed() * PADDLE_BOOST).min(BALL_MAX_SPEED);

    let vx = speed * offset * ENGLISH_FACTOR;
    let vy = (speed * speed - vx * vx).max(0.0).sqrt();
    let face = paddle.height / 2.0 + ball.radius;
    match side {
        Side::Player => {
            ball.vel = Vec2::new(vx, -vy);
            ball.pos.y = paddle.y - face;
        }
        Side::Opponent => {
            ball.vel = Vec2::new(vx, vy);
            ball.pos.y = paddle.y + face;
        }
    }
}

fn score_point(state: &mut PongState, scorer: Side, events: &mut Vec<PongEvent>) {
    events.push(PongEvent::Point { scorer });
    match scorer {
        Side::Player => state.player_points += 1,
        Side::Opponent => state.opponent_points += 1,
    }
    log::debug!(
        "Point to {:?} ({}-{})",
        scorer,
        state.player_points,
        state.opponent_points
    );

    if state.player_points >= POINTS_PER_LEVEL {
        state.levels_cleared += 1;
        let next = state.level.level + 1;
        state.start_level(next);
        events.push(PongEvent::LevelUp { level: next });
    } else if state.opponent_points >= POINTS_PER_LEVEL {
        state.phase = PongPhase::GameOver;
        state.ball.vel = Vec2::ZERO;
        log::info!(
            "Pong game over at level {} ({} levels cleared)",
            state.level.level,
            state.levels_cleared
        );
        events.push(PongEvent::GameOver);
    } else {
        // The side that conceded serves next
        state.server = scorer.other();
        state.phase = PongPhase::Serve;
        state.serve_timer = 0.0;
        state.park_ball();
    }
}
