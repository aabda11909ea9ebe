//! Letter-spelling game
//!
//! A session picks words weighted by practice progress; each word is a
//! round of letter bubbles the child taps in order.

pub mod progress;
pub mod round;
pub mod selection;
pub mod session;

pub use progress::{ProgressBook, ProgressRecord};
pub use round::{RoundEvent, Slot, SpellingRound, TapOutcome};
pub use selection::{select_session, shuffle};
pub use session::{RoundResult, SpellingSession};
