//! Tilt pong
//!
//! The player's paddle is steered by device tilt; the AI opponent re-plans
//! on a reaction timer and gets sharper every level.

pub mod difficulty;
pub mod opponent;
pub mod state;
pub mod tick;

pub use difficulty::LevelParams;
pub use opponent::{OpponentAgent, predict_intercept_x};
pub use state::{Ball, Paddle, PongPhase, PongState, Side};
pub use tick::{PongEvent, TickInput, effective_tilt, tick};
