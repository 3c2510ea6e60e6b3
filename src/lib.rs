//! # memory-match
//!
//! Core of a card-matching memory game: deck dealing, flip and match logic,
//! scoring, timer, level progression, sound cues and persisted progress.
//!
//! ## Design Principles
//!
//! 1. **Presentation-Agnostic**: The crate renders nothing. A UI forwards
//!    intents (tap a card, pause, start level N) and re-renders from the
//!    returned `GameState` snapshot.
//!
//! 2. **Nothing Is Fatal**: Unknown levels, stale taps, storage failures and
//!    audio failures are normalized, logged or skipped. The game always
//!    stays playable.
//!
//! 3. **Host-Driven Time**: No threads, no wall clock. The host advances a
//!    virtual clock; ticks and delayed work fire in order.
//!
//! ## Architecture
//!
//! - **Session Generations**: Every level start (and every trip back to the
//!   menu) bumps a generation counter. Delayed work carries the generation
//!   it was scheduled under and becomes inert once superseded.
//!
//! - **Persistent Data Structures**: The deck and matched set live in
//!   `im-rs` collections so snapshots clone in O(1).
//!
//! - **Injected Collaborators**: Storage and the audio backend are passed
//!   in, so tests run against in-memory stores and a headless backend.
//!
//! ## Modules
//!
//! - `core`: Card and pair ids, decks, session state, RNG, configuration
//! - `levels`: Level catalog
//! - `game`: State machine, scoring, presentation-facing session
//! - `timing`: Virtual clock, ticker, generation-tagged delayed tasks
//! - `storage`: Key-value stores, JSON adapter, player progress
//! - `audio`: Sound cues, volume and mute, background-music playlist
//! - `error`: Error types of the fallible seams and of loaded configuration

pub mod audio;
pub mod core;
pub mod error;
pub mod game;
pub mod levels;
pub mod storage;
pub mod timing;

// Re-export commonly used types
pub use crate::core::{
    Card, CardId, Deck, PairId,
    EngineConfig, GameRng, RngCheckpoint,
    GameState, GameStatus, Selection,
};

pub use crate::levels::{LevelCatalog, LevelDefinition};

pub use crate::game::{
    DeferredAction, FlipOutcome, FlipRejection, GameSession, MemoryGame, match_score,
};

pub use crate::timing::{Deferred, DeferredQueue, Ticker, VirtualClock};

pub use crate::storage::{
    CompletedGame, FileStore, KeyValueStore, MemoryStore, PlayerProgress, Storage,
};

pub use crate::audio::{
    AudioBackend, AudioConfig, AudioManager, AudioSettings, Clip, HeadlessBackend,
    MusicState, SoundId, TrackInfo,
};

pub use crate::error::{AudioError, ConfigError, StorageError};
