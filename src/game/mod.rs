//! The Game State Machine and the session around it.
//!
//! - [`MemoryGame`]: deck, flips, matching, scoring, status transitions
//! - [`GameSession`]: drives the machine from host intents and virtual
//!   time, plays cues, commits progress
//! - [`scoring`]: per-match points

mod machine;
pub mod scoring;
mod session;

pub use machine::{FlipOutcome, FlipRejection, MemoryGame};
pub use scoring::match_score;
pub use session::{DeferredAction, GameSession};
