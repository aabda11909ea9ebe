//! Playroom - simulation core for small children's games
//!
//! Core modules:
//! - `sim`: Bubble physics (integration, wall/pair collisions, directed flight)
//! - `pong`: Tilt pong with an AI opponent
//! - `spelling`: Letter-spelling rounds, progress tracking, practice selection
//! - `catalog`: Card/word catalog loaded from static JSON
//! - `persistence`: Key-value JSON stores, progress endpoint, local+remote sync
//! - `platform`: Frame loop, visibility and wake lock handling
//! - `settings`: Persisted tunables

pub mod catalog;
pub mod persistence;
pub mod platform;
pub mod pong;
pub mod settings;
pub mod sim;
pub mod spelling;

pub use catalog::{Catalog, CatalogItem, CardKind};
pub use settings::{BubbleTuning, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Bubble defaults (velocities are in pixels per tick)
    pub const BUBBLE_RADIUS: f32 = 36.0;
    pub const BUBBLE_MAX_SPEED: f32 = 1.6;
    pub const BUBBLE_JITTER: f32 = 0.05;
    /// Fraction of speed kept after bouncing off a wall
    pub const WALL_DAMPING: f32 = 0.8;
    /// Fraction of the partner's velocity taken in a bubble-bubble bounce
    pub const RESTITUTION: f32 = 0.9;
    /// Pixels per tick while flying to a slot
    pub const FLIGHT_STEP: f32 = 14.0;
    /// Arrival tolerance for flights
    pub const FLIGHT_EPSILON: f32 = 0.5;
    /// Upper bound on simultaneous bubbles
    pub const MAX_BODIES: usize = 15;

    /// Wrong letter: shake duration, then reinsertion delay (seconds)
    pub const WRONG_SHAKE_SECS: f32 = 0.5;
    pub const WRONG_REINSERT_SECS: f32 = 1.0;

    /// Pong playfield
    pub const PONG_WIDTH: f32 = 360.0;
    pub const PONG_HEIGHT: f32 = 640.0;
    pub const PADDLE_WIDTH: f32 = 80.0;
    pub const PADDLE_HEIGHT: f32 = 14.0;
    /// Distance from the end line to the paddle centre
    pub const PADDLE_INSET: f32 = 40.0;
    pub const BALL_RADIUS: f32 = 10.0;
    /// Ball speed at level 1 (pixels/s)
    pub const BALL_BASE_SPEED: f32 = 260.0;
    pub const BALL_MAX_SPEED: f32 = 620.0;
    /// Speed boost when ball hits paddle (multiplicative)
    pub const PADDLE_BOOST: f32 = 1.04;
    /// Max horizontal deflection from an off-centre hit (fraction of speed)
    pub const ENGLISH_FACTOR: f32 = 0.75;
    /// Player paddle speed at full tilt (pixels/s)
    pub const PLAYER_SPEED: f32 = 420.0;
    /// Tilt values smaller than this are ignored
    pub const TILT_DEAD_ZONE: f32 = 0.05;
    /// AI paddle speed at level 1 (pixels/s)
    pub const AI_BASE_SPEED: f32 = 220.0;
    /// Max error the AI adds when it misjudges the ball
    pub const AI_MISS_RANGE: f32 = 70.0;
    /// Points needed to finish a level
    pub const POINTS_PER_LEVEL: u32 = 5;
}

/// Current wall-clock time in unix milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Current wall-clock time in unix milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
