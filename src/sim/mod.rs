//! Bubble simulation module
//!
//! All bubble physics lives here. This module must stay pure:
//! - One tick per call, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod bounds;
pub mod collision;
pub mod flight;
pub mod world;

pub use body::{Body, BodyId, FlightTarget};
pub use bounds::Bounds;
pub use collision::{
    CollisionResult, circle_circle, reflect_walls, resolve_pairs, resolve_pairs_within, separate_pair, separate_pair_within,
};
pub use flight::step_flight;
pub use world::{BubbleWorld, WorldEvent};

/// Rejected world commands
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("no body with id {0}")]
    UnknownBody(BodyId),
    #[error("slot {0} already has a body in flight")]
    SlotOccupied(usize),
    #[error("body {0} is already flying")]
    AlreadyFlying(BodyId),
    #[error("world is full ({0} bodies)")]
    WorldFull(usize),
    #[error("word has no letters to spell")]
    EmptyWord,
}
