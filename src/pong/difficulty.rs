//! Level-based difficulty curve
//!
//! Every level makes the ball and the AI faster, the AI quicker to react
//! and less likely to misjudge the ball.

use serde::{Deserialize, Serialize};

use crate::consts::{AI_BASE_SPEED, BALL_BASE_SPEED, BALL_MAX_SPEED};

/// Tuning derived from the level number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    pub level: u32,
    /// Serve speed (pixels/s)
    pub ball_speed: f32,
    /// AI paddle max speed (pixels/s)
    pub ai_speed: f32,
    /// Seconds between AI re-targeting
    pub reaction_delay: f32,
    /// Probability (0..1) the AI aims at the exact intercept
    pub accuracy: f64,
}

impl LevelParams {
    /// Parameters for a 1-based level (0 is treated as 1)
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        let step = (level - 1) as f32;

        Self {
            level,
            ball_speed: (BALL_BASE_SPEED * (1.0 + 0.1 * step)).min(BALL_MAX_SPEED),
            ai_speed: AI_BASE_SPEED * (1.0 + 0.08 * step),
            reaction_delay: (0.35 - 0.03 * step).max(0.05),
            accuracy: (0.55 + 0.05 * step as f64).min(0.95),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_one() {
        let params = LevelParams::for_level(1);
        assert_eq!(params.ball_speed, BALL_BASE_SPEED);
        assert_eq!(params.ai_speed, AI_BASE_SPEED);
        assert!((params.reaction_delay - 0.35).abs() < 1e-6);
        assert!((params.accuracy - 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_level_zero_is_level_one() {
        assert_eq!(LevelParams::for_level(0), LevelParams::for_level(1));
    }

    #[test]
    fn test_monotone_and_capped() {
        let mut prev = LevelParams::for_level(1);
        for level in 2..50 {
            let params = LevelParams::for_level(level);
            assert!(params.ball_speed >= prev.ball_speed);
            assert!(params.ai_speed > prev.ai_speed);
            assert!(params.reaction_delay <= prev.reaction_delay);
            assert!(params.accuracy >= prev.accuracy);
            prev = params;
        }
        assert_eq!(prev.ball_speed, BALL_MAX_SPEED);
        assert!((prev.reaction_delay - 0.05).abs() < 1e-6);
        assert!((prev.accuracy - 0.95).abs() < 1e-9);
    }
}
