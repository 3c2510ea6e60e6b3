//! Persistence: key-value stores, the JSON adapter, player progress.
//!
//! ## Key Types
//!
//! - `KeyValueStore`: raw string storage (`MemoryStore`, `FileStore`)
//! - `Storage`: typed JSON read/write that never fails
//! - `PlayerProgress`: the durable cross-session summary
//!
//! Two records live in the store, each under its own stable key: the
//! progress record and the audio settings record.

pub mod adapter;
pub mod progress;
pub mod store;

pub use adapter::Storage;
pub use progress::{CompletedGame, PlayerProgress};
pub use store::{FileStore, KeyValueStore, MemoryStore};
