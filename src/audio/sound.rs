//! Sound identifiers and the clip table.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Symbolic sound cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundId {
    CardFlip,
    MatchSuccess,
    MatchFail,
    LevelComplete,
    ButtonClick,
    /// The current background-music track.
    BackgroundMusic,
}

impl SoundId {
    /// Every one-shot cue (everything except background music).
    pub const CUES: [SoundId; 5] = [
        SoundId::CardFlip,
        SoundId::MatchSuccess,
        SoundId::MatchFail,
        SoundId::LevelComplete,
        SoundId::ButtonClick,
    ];

    /// Stable clip name used to address the backend.
    #[must_use]
    pub const fn clip_name(self) -> &'static str {
        match self {
            SoundId::CardFlip => "card-flip",
            SoundId::MatchSuccess => "match-success",
            SoundId::MatchFail => "match-fail",
            SoundId::LevelComplete => "level-complete",
            SoundId::ButtonClick => "button-click",
            SoundId::BackgroundMusic => "background-music",
        }
    }

    /// Volume the cue plays at with master volume 1.0.
    #[must_use]
    pub const fn base_volume(self) -> f32 {
        match self {
            SoundId::CardFlip => 0.3,
            SoundId::MatchSuccess => 0.5,
            SoundId::MatchFail => 0.4,
            SoundId::LevelComplete => 0.8,
            SoundId::ButtonClick => 0.3,
            SoundId::BackgroundMusic => 0.2,
        }
    }

    /// Is this the background-music channel?
    #[must_use]
    pub const fn is_music(self) -> bool {
        matches!(self, SoundId::BackgroundMusic)
    }
}

impl std::fmt::Display for SoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.clip_name())
    }
}

/// A playable clip: a name for the backend plus candidate sources.
///
/// Sources are tried in order; the first one the backend can decode wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub name: String,
    pub sources: Vec<String>,
    pub base_volume: f32,
}

impl Clip {
    /// Create a clip.
    pub fn new(name: impl Into<String>, sources: Vec<String>, base_volume: f32) -> Self {
        Self {
            name: name.into(),
            sources,
            base_volume: base_volume.clamp(0.0, 1.0),
        }
    }

    /// The shipped clip for a sound: `<dir>/<name>.mp3` with a `.webm` fallback.
    #[must_use]
    pub fn standard(sound: SoundId, dir: &str) -> Self {
        let name = sound.clip_name();
        Self::new(
            name,
            vec![format!("{dir}/{name}.mp3"), format!("{dir}/{name}.webm")],
            sound.base_volume(),
        )
    }
}

/// Clip table for the audio subsystem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    /// One clip per one-shot cue.
    pub cues: FxHashMap<SoundId, Clip>,
    /// Background-music rotation, played in order with wraparound.
    pub music_tracks: Vec<Clip>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self::with_sound_dir("/sounds")
    }
}

impl AudioConfig {
    /// Standard clips looked up under `dir`, one background track.
    #[must_use]
    pub fn with_sound_dir(dir: &str) -> Self {
        let cues = SoundId::CUES
            .iter()
            .map(|&sound| (sound, Clip::standard(sound, dir)))
            .collect();
        Self {
            cues,
            music_tracks: vec![Clip::standard(SoundId::BackgroundMusic, dir)],
        }
    }

    /// Replace the background-music rotation.
    #[must_use]
    pub fn with_music_tracks(mut self, tracks: Vec<Clip>) -> Self {
        self.music_tracks = tracks;
        self
    }

    /// Replace the clip used for a cue.
    #[must_use]
    pub fn with_cue(mut self, sound: SoundId, clip: Clip) -> Self {
        if !sound.is_music() {
            self.cues.insert(sound, clip);
        }
        self
    }
}
