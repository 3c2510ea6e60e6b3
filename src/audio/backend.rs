//! Audio backend abstraction.
//!
//! The [`AudioManager`](super::AudioManager) decides *what* plays and at
//! which volume; a backend only knows how to load, start, pause and stop
//! named clips. [`HeadlessBackend`] keeps playback state in memory and is
//! what tests and audio-less hosts use. With the `playback` feature,
//! `RodioBackend` plays through the default output device.

use rustc_hash::{FxHashMap, FxHashSet};

use super::sound::Clip;
use crate::error::AudioError;

/// Pluggable audio output.
///
/// Clips are addressed by [`Clip::name`]. Operations on clips that were
/// never loaded are no-ops (or `UnknownClip` for the fallible ones).
pub trait AudioBackend {
    /// Prepare a clip for playback.
    fn load(&mut self, clip: &Clip) -> Result<(), AudioError>;

    /// Start a loaded clip from the beginning.
    fn play(&mut self, name: &str, volume: f32, looping: bool) -> Result<(), AudioError>;

    /// Stop a clip and rewind it.
    fn stop(&mut self, name: &str);

    /// Pause a clip, keeping its position.
    fn pause(&mut self, name: &str);

    /// Continue a paused clip.
    fn resume(&mut self, name: &str) -> Result<(), AudioError>;

    /// Change the output volume of a clip, playing or not.
    fn set_volume(&mut self, name: &str, volume: f32);

    /// Is the clip currently audible (started, not paused, not ended)?
    fn is_playing(&self, name: &str) -> bool;

    /// Did a non-looping clip run to its natural end?
    fn has_ended(&self, name: &str) -> bool;

    /// Release a clip's resources.
    fn unload(&mut self, name: &str);
}

/// Playback state of one clip in a [`HeadlessBackend`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClipState {
    #[default]
    Stopped,
    Playing,
    Paused,
    Ended,
}

#[derive(Clone, Debug, Default)]
struct HeadlessClip {
    state: ClipState,
    volume: f32,
    looping: bool,
    plays: u32,
}

/// In-memory backend that tracks state without producing sound.
///
/// Failures can be injected per clip, and clips can be driven to their
/// natural end, which is how the playlist rotation is exercised in tests.
#[derive(Clone, Debug, Default)]
pub struct HeadlessBackend {
    clips: FxHashMap<String, HeadlessClip>,
    failing: FxHashSet<String>,
}

impl HeadlessBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loading and playing `name` fail from now on.
    pub fn fail_clip(&mut self, name: impl Into<String>) {
        self.failing.insert(name.into());
    }

    /// Let `name` load and play again.
    pub fn heal_clip(&mut self, name: &str) {
        self.failing.remove(name);
    }

    /// Simulate a non-looping clip reaching its end.
    pub fn finish_clip(&mut self, name: &str) {
        if let Some(clip) = self.clips.get_mut(name) {
            if clip.state == ClipState::Playing && !clip.looping {
                clip.state = ClipState::Ended;
            }
        }
    }

    /// Is the clip loaded?
    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    /// Current state of a loaded clip.
    #[must_use]
    pub fn clip_state(&self, name: &str) -> Option<ClipState> {
        self.clips.get(name).map(|c| c.state)
    }

    /// Current output volume of a loaded clip.
    #[must_use]
    pub fn volume(&self, name: &str) -> Option<f32> {
        self.clips.get(name).map(|c| c.volume)
    }

    /// How many times `play` started the clip.
    #[must_use]
    pub fn play_count(&self, name: &str) -> u32 {
        self.clips.get(name).map_or(0, |c| c.plays)
    }

    fn clip_mut(&mut self, name: &str) -> Result<&mut HeadlessClip, AudioError> {
        self.clips
            .get_mut(name)
            .ok_or_else(|| AudioError::UnknownClip(name.to_string()))
    }
}

impl AudioBackend for HeadlessBackend {
    fn load(&mut self, clip: &Clip) -> Result<(), AudioError> {
        if self.failing.contains(&clip.name) || clip.sources.is_empty() {
            return Err(AudioError::Load {
                clip: clip.name.clone(),
                reason: "no decodable source".to_string(),
            });
        }
        self.clips.entry(clip.name.clone()).or_default();
        Ok(())
    }

    fn play(&mut self, name: &str, volume: f32, looping: bool) -> Result<(), AudioError> {
        if self.failing.contains(name) {
            return Err(AudioError::Play {
                clip: name.to_string(),
                reason: "playback refused".to_string(),
            });
        }
        let clip = self.clip_mut(name)?;
        clip.state = ClipState::Playing;
        clip.volume = volume;
        clip.looping = looping;
        clip.plays += 1;
        Ok(())
    }

    fn stop(&mut self, name: &str) {
        if let Some(clip) = self.clips.get_mut(name) {
            clip.state = ClipState::Stopped;
        }
    }

    fn pause(&mut self, name: &str) {
        if let Some(clip) = self.clips.get_mut(name) {
            if clip.state == ClipState::Playing {
                clip.state = ClipState::Paused;
            }
        }
    }

    fn resume(&mut self, name: &str) -> Result<(), AudioError> {
        if self.failing.contains(name) {
            return Err(AudioError::Play {
                clip: name.to_string(),
                reason: "playback refused".to_string(),
            });
        }
        let clip = self.clip_mut(name)?;
        if clip.state == ClipState::Paused {
            clip.state = ClipState::Playing;
        }
        Ok(())
    }

    fn set_volume(&mut self, name: &str, volume: f32) {
        if let Some(clip) = self.clips.get_mut(name) {
            clip.volume = volume;
        }
    }

    fn is_playing(&self, name: &str) -> bool {
        self.clip_state(name) == Some(ClipState::Playing)
    }

    fn has_ended(&self, name: &str) -> bool {
        self.clip_state(name) == Some(ClipState::Ended)
    }

    fn unload(&mut self, name: &str) {
        self.clips.remove(name);
    }
}
