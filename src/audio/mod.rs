//! Sound cues and background music.
//!
//! ## Architecture
//!
//! - [`SoundId`] names every cue; [`AudioConfig`] maps cues to [`Clip`]s
//!   and lists the background-music rotation
//! - [`AudioManager`] owns volume, mute and the music playlist and persists
//!   [`AudioSettings`] through [`Storage`](crate::storage::Storage)
//! - [`AudioBackend`] is the output seam: [`HeadlessBackend`] records state
//!   in memory, `RodioBackend` (feature `playback`) plays for real
//!
//! Audio problems never reach the game: every failure is logged and
//! swallowed by the manager.

mod backend;
mod manager;
mod playlist;
mod settings;
mod sound;

#[cfg(feature = "playback")]
mod rodio_backend;

pub use backend::{AudioBackend, ClipState, HeadlessBackend};
pub use manager::{AudioManager, MusicState};
pub use playlist::{Playlist, TrackInfo};
pub use settings::{AudioSettings, DEFAULT_MASTER_VOLUME};
pub use sound::{AudioConfig, Clip, SoundId};

#[cfg(feature = "playback")]
pub use rodio_backend::RodioBackend;
