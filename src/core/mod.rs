//! Core types: cards and decks, session state, RNG, configuration.
//!
//! These are the building blocks the state machine mutates and the
//! presentation layer renders.

pub mod card;
pub mod config;
pub mod rng;
pub mod state;

pub use card::{Card, CardId, Deck, PairId};
pub use config::{EngineConfig, DEFAULT_AUDIO_SETTINGS_KEY, DEFAULT_PROGRESS_KEY};
pub use rng::{GameRng, RngCheckpoint};
pub use state::{GameState, GameStatus, Selection};
