//! Pong game state and core types
//!
//! The player defends the bottom end line, the AI the top one.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::LevelParams;
use super::opponent::OpponentAgent;
use crate::consts::*;
use crate::sim::Bounds;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PongPhase {
    /// Ball parked in front of the serving paddle
    Serve,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Opponent won a level
    GameOver,
}

/// Which end of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Human player, bottom
    Player,
    /// AI, top
    Opponent,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// A horizontal paddle; `x`/`y` is its centre
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal velocity from the last move (for english)
    pub vel_x: f32,
}

impl Paddle {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            vel_x: 0.0,
        }
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    /// Clamp an x so the paddle stays on the table
    pub fn clamp_x(&self, x: f32, table_width: f32) -> f32 {
        let half = self.half_width();
        x.clamp(half, (table_width - half).max(half))
    }

    /// Move toward a target x at no more than `max_speed`
    pub fn move_toward(&mut self, target_x: f32, dt: f32, max_speed: f32, table_width: f32) {
        let target = self.clamp_x(target_x, table_width);
        let max_delta = max_speed * dt;
        let delta = (target - self.x).clamp(-max_delta, max_delta);
        self.vel_x = if dt > 0.0 { delta / dt } else { 0.0 };
        self.x = self.clamp_x(self.x + delta, table_width);
    }

    /// Whether a ball overlaps the paddle rectangle
    pub fn touches(&self, ball: &Ball) -> bool {
        let half_h = self.height / 2.0;
        (ball.pos.x - self.x).abs() <= self.half_width() + ball.radius
            && (ball.pos.y - self.y).abs() <= half_h + ball.radius
    }
}

/// Complete pong game state
#[derive(Debug, Clone)]
pub struct PongState {
    pub seed: u64,
    pub rng: Pcg32,
    pub bounds: Bounds,
    pub phase: PongPhase,
    pub level: LevelParams,
    pub ball: Ball,
    pub player: Paddle,
    pub opponent: OpponentAgent,
    pub player_points: u32,
    pub opponent_points: u32,
    /// Levels won this game
    pub levels_cleared: u32,
    pub server: Side,
    /// Seconds spent in the current serve (AI serves automatically)
    pub serve_timer: f32,
    /// Multiplier applied to raw tilt input
    pub tilt_sensitivity: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl PongState {
    pub fn new(seed: u64, bounds: Bounds, start_level: u32) -> Self {
        let level = LevelParams::for_level(start_level);
        let center_x = bounds.width / 2.0;

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            bounds,
            phase: PongPhase::Serve,
            level,
            ball: Ball::new(bounds.center()),
            player: Paddle::new(center_x, bounds.height - PADDLE_INSET),
            opponent: OpponentAgent::new(Paddle::new(center_x, PADDLE_INSET), &level),
            player_points: 0,
            opponent_points: 0,
            levels_cleared: 0,
            server: Side::Player,
            serve_timer: 0.0,
            tilt_sensitivity: 1.0,
            time_ticks: 0,
        };
        state.park_ball();
        state
    }

    /// Standard table from the crate constants
    pub fn with_defaults(seed: u64) -> Self {
        Self::new(seed, Bounds::new(PONG_WIDTH, PONG_HEIGHT), 1)
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent.paddle,
        }
    }

    /// Put the ball in front of the serving paddle
    pub fn park_ball(&mut self) {
        let (x, y, height) = {
            let paddle = self.paddle(self.server);
            (paddle.x, paddle.y, paddle.height)
        };
        let offset = height / 2.0 + self.ball.radius + 2.0;
        let y = match self.server {
            Side::Player => y - offset,
            Side::Opponent => y + offset,
        };
        self.ball.pos = Vec2::new(x, y);
        self.ball.vel = Vec2::ZERO;
    }

    /// Launch the parked ball toward the non-serving side
    pub fn launch(&mut self) {
        let angle: f32 = self.rng.random_range(-0.4..=0.4);
        let speed = self.level.ball_speed;
        let dir_y = match self.server {
            Side::Player => -1.0,
            Side::Opponent => 1.0,
        };
        self.ball.vel = Vec2::new(angle.sin(), dir_y * angle.cos()) * speed;
        self.phase = PongPhase::Playing;
        self.serve_timer = 0.0;
    }

    /// Begin the given level: new parameters, fresh score, reset AI
    pub fn start_level(&mut self, level: u32) {
        self.level = LevelParams::for_level(level);
        self.player_points = 0;
        self.opponent_points = 0;
        let center_x = self.bounds.width / 2.0;
        self.player.x = center_x;
        self.opponent.reset(center_x, &self.level);
        self.server = Side::Player;
        self.phase = PongPhase::Serve;
        self.park_ball();
        log::info!(
            "Pong level {}: ball {:.0}px/s, ai {:.0}px/s, delay {:.2}s, accuracy {:.2}",
            self.level.level,
            self.level.ball_speed,
            self.level.ai_speed,
            self.level.reaction_delay,
            self.level.accuracy
        );
    }

    /// Start over from the given level after a game over
    pub fn restart(&mut self, level: u32) {
        self.levels_cleared = 0;
        self.start_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_serves_from_player() {
        let state = PongState::with_defaults(7);
        assert_eq!(state.phase, PongPhase::Serve);
        assert!(state.ball.pos.y < state.player.y);
        assert_eq!(state.ball.pos.x, state.player.x);
        assert_eq!(state.ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_launch_heads_away_from_server() {
        let mut state = PongState::with_defaults(7);
        state.launch();
        assert!(state.ball.vel.y < 0.0);
        assert!((state.ball.speed() - state.level.ball_speed).abs() < 1e-2);

        state.server = Side::Opponent;
        state.park_ball();
        assert!(state.ball.pos.y > state.opponent.paddle.y);
        state.launch();
        assert!(state.ball.vel.y > 0.0);
    }

    #[test]
    fn test_paddle_move_capped_and_clamped() {
        let mut paddle = Paddle::new(100.0, 600.0);
        paddle.move_toward(300.0, 0.1, 200.0, PONG_WIDTH);
        assert!((paddle.x - 120.0).abs() < 1e-4);
        assert!((paddle.vel_x - 200.0).abs() < 1e-2);

        paddle.move_toward(-1000.0, 10.0, 1000.0, PONG_WIDTH);
        assert_eq!(paddle.x, paddle.half_width());
    }

    #[test]
    fn test_start_level_resets_points() {
        let mut state = PongState::with_defaults(7);
        state.player_points = 3;
        state.opponent_points = 2;
        state.start_level(3);
        assert_eq!(state.level.level, 3);
        assert_eq!((state.player_points, state.opponent_points), (0, 0));
        assert_eq!(state.opponent.speed, state.level.ai_speed);
    }
}
