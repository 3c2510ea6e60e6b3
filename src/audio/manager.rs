//! Audio manager: cues, master volume, mute, background music.
//!
//! ## Volume model
//!
//! Every sound has a base volume. What the backend receives is
//! `muted ? 0 : base * master`. Muting only zeroes volumes; nothing is
//! stopped or unloaded, so unmuting restores what was playing.
//!
//! ## Cues vs. music
//!
//! Playing a cue stops any instance of the same cue first, so a cue never
//! overlaps itself. Background music is exempt: it keeps playing and
//! rotates through the configured tracks, skipping tracks that fail to load
//! or play.
//!
//! ## Passivity
//!
//! The manager installs no listeners. Hosts call [`AudioManager::update`]
//! regularly so natural track ends are noticed, and apply their own
//! foreground/background policy through the pause/resume entry points.

use rustc_hash::FxHashMap;

use super::backend::{AudioBackend, HeadlessBackend};
use super::playlist::{Playlist, TrackInfo};
use super::settings::{clamp_volume, AudioSettings};
use super::sound::{AudioConfig, Clip, SoundId};
use crate::storage::Storage;

/// State of the background-music channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MusicState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Clone, Debug)]
struct Cue {
    clip: Clip,
    base_volume: f32,
    loaded: bool,
}

fn effective_volume(settings: &AudioSettings, base: f32) -> f32 {
    if settings.muted {
        0.0
    } else {
        (base * settings.master_volume).clamp(0.0, 1.0)
    }
}

/// Plays cues and background music through a backend, with persisted
/// settings.
pub struct AudioManager<B: AudioBackend = HeadlessBackend> {
    backend: B,
    storage: Storage,
    settings_key: String,
    settings: AudioSettings,
    cues: FxHashMap<SoundId, Cue>,
    playlist: Playlist,
    music: MusicState,
}

impl<B: AudioBackend> std::fmt::Debug for AudioManager<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("settings", &self.settings)
            .field("music", &self.music)
            .field("track", &self.playlist.current_index())
            .finish_non_exhaustive()
    }
}

impl<B: AudioBackend> AudioManager<B> {
    /// Create a manager, loading settings from `storage` and preloading cues.
    ///
    /// Cues that fail to load are logged and retried on first play. Music
    /// tracks load on demand.
    pub fn new(
        backend: B,
        storage: Storage,
        settings_key: impl Into<String>,
        config: AudioConfig,
    ) -> Self {
        let settings_key = settings_key.into();
        let settings = AudioSettings::load(&storage, &settings_key);

        let cues = config
            .cues
            .into_iter()
            .map(|(sound, clip)| {
                let base_volume = clip.base_volume;
                (
                    sound,
                    Cue {
                        clip,
                        base_volume,
                        loaded: false,
                    },
                )
            })
            .collect();

        let mut manager = Self {
            backend,
            storage,
            settings_key,
            settings,
            cues,
            playlist: Playlist::new(config.music_tracks),
            music: MusicState::Stopped,
        };

        for sound in SoundId::CUES {
            manager.ensure_cue_loaded(sound);
        }
        manager
    }

    // === Settings ===

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> AudioSettings {
        self.settings
    }

    /// Is output muted?
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.settings.muted
    }

    /// Master volume in `[0, 1]`.
    #[must_use]
    pub fn master_volume(&self) -> f32 {
        self.settings.master_volume
    }

    /// Set the master volume, clamped to `[0, 1]`, and persist it.
    ///
    /// NaN is ignored.
    pub fn set_master_volume(&mut self, volume: f32) {
        let Some(volume) = clamp_volume(volume) else {
            tracing::debug!("ignoring NaN master volume");
            return;
        };
        self.settings.master_volume = volume;
        self.apply_volumes();
        self.persist();
    }

    /// Silence all output without stopping anything.
    pub fn mute(&mut self) {
        self.settings.muted = true;
        self.apply_volumes();
        self.persist();
    }

    /// Restore output volumes. Starts background music if it is enabled but
    /// was never started while muted.
    pub fn unmute(&mut self) {
        self.settings.muted = false;
        self.apply_volumes();
        self.persist();

        if self.settings.background_music_enabled && self.music == MusicState::Stopped {
            self.start_music();
        }
    }

    /// Flip the mute state.
    pub fn toggle_mute(&mut self) {
        if self.settings.muted {
            self.unmute();
        } else {
            self.mute();
        }
    }

    /// Volume the backend currently gets for `sound`.
    #[must_use]
    pub fn effective_volume(&self, sound: SoundId) -> f32 {
        let base = if sound.is_music() {
            self.playlist.current().map_or(0.0, |clip| clip.base_volume)
        } else {
            self.cues.get(&sound).map_or(0.0, |cue| cue.base_volume)
        };
        effective_volume(&self.settings, base)
    }

    // === Cues ===

    /// Play a sound. Cues restart rather than overlap; muted output skips
    /// cues entirely. `BackgroundMusic` starts the music.
    pub fn play(&mut self, sound: SoundId) {
        if sound.is_music() {
            self.play_background_music();
            return;
        }
        if self.settings.muted {
            tracing::debug!(%sound, "muted, skipping cue");
            return;
        }
        if !self.ensure_cue_loaded(sound) {
            return;
        }
        let Some(cue) = self.cues.get(&sound) else {
            return;
        };

        let volume = effective_volume(&self.settings, cue.base_volume);
        self.backend.stop(&cue.clip.name);
        if let Err(error) = self.backend.play(&cue.clip.name, volume, false) {
            tracing::warn!(%sound, %error, "failed to play cue");
        }
    }

    /// Stop a sound. `BackgroundMusic` behaves like
    /// [`stop_background_music`](Self::stop_background_music).
    pub fn stop(&mut self, sound: SoundId) {
        if sound.is_music() {
            self.stop_background_music();
        } else if let Some(cue) = self.cues.get(&sound) {
            self.backend.stop(&cue.clip.name);
        }
    }

    /// Pause a sound.
    pub fn pause(&mut self, sound: SoundId) {
        if sound.is_music() {
            self.pause_background_music();
        } else if let Some(cue) = self.cues.get(&sound) {
            self.backend.pause(&cue.clip.name);
        }
    }

    /// Resume a paused sound. Does nothing while muted.
    pub fn resume(&mut self, sound: SoundId) {
        if sound.is_music() {
            self.resume_background_music();
            return;
        }
        if self.settings.muted {
            return;
        }
        if let Some(cue) = self.cues.get(&sound) {
            if let Err(error) = self.backend.resume(&cue.clip.name) {
                tracing::warn!(%sound, %error, "failed to resume cue");
            }
        }
    }

    /// Replace a sound's base volume (clamped) for the rest of the session.
    ///
    /// For `BackgroundMusic` this applies to every track.
    pub fn set_volume(&mut self, sound: SoundId, volume: f32) {
        let Some(volume) = clamp_volume(volume) else {
            return;
        };
        if sound.is_music() {
            for track in self.playlist.tracks_mut() {
                track.clip.base_volume = volume;
            }
        } else if let Some(cue) = self.cues.get_mut(&sound) {
            cue.base_volume = volume;
        }
        self.apply_volumes();
    }

    // === Background music ===

    /// Enable background music and start it unless muted.
    ///
    /// Tracks that fail are skipped. Returns the track now playing, if any.
    pub fn play_background_music(&mut self) -> Option<TrackInfo> {
        if !self.settings.background_music_enabled {
            self.settings.background_music_enabled = true;
            self.persist();
        }
        if self.music == MusicState::Playing {
            return self.playlist.info();
        }
        if self.settings.muted {
            tracing::debug!("muted, deferring background music");
            return None;
        }
        match self.music {
            MusicState::Playing => self.playlist.info(),
            MusicState::Paused => {
                self.resume_background_music();
                self.current_track_info().filter(|_| self.music == MusicState::Playing)
            }
            MusicState::Stopped => self.start_music(),
        }
    }

    /// Stop background music and disable it.
    pub fn stop_background_music(&mut self) {
        self.halt_music();
        if self.settings.background_music_enabled {
            self.settings.background_music_enabled = false;
            self.persist();
        }
    }

    /// Pause background music if it is playing.
    pub fn pause_background_music(&mut self) {
        if self.music != MusicState::Playing {
            return;
        }
        if let Some(clip) = self.playlist.current() {
            self.backend.pause(&clip.name);
        }
        self.music = MusicState::Paused;
    }

    /// Resume paused background music. Does nothing while muted.
    ///
    /// A track that refuses to resume is skipped.
    pub fn resume_background_music(&mut self) {
        if self.music != MusicState::Paused || self.settings.muted {
            return;
        }
        let Some(name) = self.playlist.current().map(|clip| clip.name.clone()) else {
            return;
        };
        match self.backend.resume(&name) {
            Ok(()) => self.music = MusicState::Playing,
            Err(error) => {
                tracing::warn!(track = %name, %error, "failed to resume track, skipping");
                self.backend.stop(&name);
                self.music = MusicState::Stopped;
                self.playlist.advance();
                self.start_music();
            }
        }
    }

    /// Is background music audible (started and not paused)?
    #[must_use]
    pub fn is_background_music_playing(&self) -> bool {
        self.music == MusicState::Playing
    }

    /// State of the music channel.
    #[must_use]
    pub fn music_state(&self) -> MusicState {
        self.music
    }

    /// Skip to the next track when more than one is configured.
    ///
    /// Playback continues on the new track if music was playing or paused.
    pub fn skip_to_next_track(&mut self) -> Option<TrackInfo> {
        if !self.playlist.rotates() {
            return None;
        }
        let was_active = self.music != MusicState::Stopped;
        self.halt_music();
        self.playlist.advance();

        if was_active && !self.settings.muted {
            self.start_music()
        } else {
            self.playlist.info()
        }
    }

    /// Describe the current track.
    #[must_use]
    pub fn current_track_info(&self) -> Option<TrackInfo> {
        self.playlist.info()
    }

    /// Advance the rotation when the current track ended naturally.
    pub fn update(&mut self) {
        if self.music != MusicState::Playing {
            return;
        }
        let Some(name) = self.playlist.current().map(|clip| clip.name.clone()) else {
            return;
        };
        if self.backend.has_ended(&name) {
            tracing::debug!(track = %name, "track ended, advancing");
            self.backend.stop(&name);
            self.music = MusicState::Stopped;
            self.playlist.advance();
            self.start_music();
        }
    }

    /// Stop everything and release every clip.
    pub fn unload(&mut self) {
        self.halt_music();
        for cue in self.cues.values_mut() {
            if cue.loaded {
                self.backend.stop(&cue.clip.name);
                self.backend.unload(&cue.clip.name);
                cue.loaded = false;
            }
        }
        for track in self.playlist.tracks_mut() {
            if track.loaded {
                self.backend.unload(&track.clip.name);
                track.loaded = false;
            }
        }
    }

    // === Backend access ===

    /// The backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably (e.g. to inject failures in tests).
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // === Internals ===

    fn ensure_cue_loaded(&mut self, sound: SoundId) -> bool {
        let Some(cue) = self.cues.get_mut(&sound) else {
            tracing::debug!(%sound, "no clip configured");
            return false;
        };
        if cue.loaded {
            return true;
        }
        match self.backend.load(&cue.clip) {
            Ok(()) => {
                cue.loaded = true;
                true
            }
            Err(error) => {
                tracing::warn!(%sound, %error, "failed to load cue");
                false
            }
        }
    }

    /// Start the current track, skipping tracks that fail.
    fn start_music(&mut self) -> Option<TrackInfo> {
        let looping = !self.playlist.rotates();
        let settings = self.settings;

        for _ in 0..self.playlist.len() {
            let Some(track) = self.playlist.current_track_mut() else {
                break;
            };
            if !track.loaded {
                if let Err(error) = self.backend.load(&track.clip) {
                    tracing::warn!(track = %track.clip.name, %error, "failed to load track, skipping");
                    self.playlist.advance();
                    continue;
                }
                track.loaded = true;
            }

            let volume = effective_volume(&settings, track.clip.base_volume);
            match self.backend.play(&track.clip.name, volume, looping) {
                Ok(()) => {
                    self.music = MusicState::Playing;
                    tracing::debug!(track = %track.clip.name, "background music started");
                    return self.playlist.info();
                }
                Err(error) => {
                    tracing::warn!(track = %track.clip.name, %error, "failed to play track, skipping");
                    self.playlist.advance();
                }
            }
        }

        tracing::warn!("no playable background track");
        self.music = MusicState::Stopped;
        None
    }

    fn halt_music(&mut self) {
        if self.music != MusicState::Stopped {
            if let Some(clip) = self.playlist.current() {
                self.backend.stop(&clip.name);
            }
            self.music = MusicState::Stopped;
        }
    }

    fn apply_volumes(&mut self) {
        for cue in self.cues.values() {
            if cue.loaded {
                let volume = effective_volume(&self.settings, cue.base_volume);
                self.backend.set_volume(&cue.clip.name, volume);
            }
        }
        if self.music != MusicState::Stopped {
            if let Some(clip) = self.playlist.current() {
                let volume = effective_volume(&self.settings, clip.base_volume);
                self.backend.set_volume(&clip.name, volume);
            }
        }
    }

    fn persist(&self) {
        self.settings.save(&self.storage, &self.settings_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::ClipState;

    const KEY: &str = "audio";

    fn manager() -> AudioManager {
        AudioManager::new(HeadlessBackend::new(), Storage::in_memory(), KEY, AudioConfig::default())
    }

    #[test]
    fn test_preloads_cues_not_music() {
        let audio = manager();
        assert!(audio.backend().is_loaded("match-success"));
        assert!(!audio.backend().is_loaded("background-music"));
    }

    #[test]
    fn test_effective_volume() {
        let mut audio = manager();
        let expected = 0.5 * 0.7;
        assert!((audio.effective_volume(SoundId::MatchSuccess) - expected).abs() < 1e-6);

        audio.set_master_volume(1.0);
        assert_eq!(audio.effective_volume(SoundId::LevelComplete), 0.8);
    }

    #[test]
    fn test_cue_restarts_instead_of_overlapping() {
        let mut audio = manager();
        audio.play(SoundId::MatchFail);
        audio.play(SoundId::MatchFail);

        assert_eq!(audio.backend().play_count("match-fail"), 2);
        assert_eq!(audio.backend().clip_state("match-fail"), Some(ClipState::Playing));
    }

    #[test]
    fn test_muted_skips_cues() {
        let mut audio = manager();
        audio.mute();
        audio.play(SoundId::ButtonClick);
        assert_eq!(audio.backend().play_count("button-click"), 0);
    }

    #[test]
    fn test_set_volume_replaces_base() {
        let mut audio = manager();
        audio.set_master_volume(0.5);
        audio.set_volume(SoundId::CardFlip, 2.0);
        assert_eq!(audio.effective_volume(SoundId::CardFlip), 0.5);
    }

    #[test]
    fn test_unmute_starts_deferred_music() {
        let mut audio = manager();
        audio.mute();
        assert_eq!(audio.play_background_music(), None);
        assert!(!audio.is_background_music_playing());

        audio.unmute();
        assert!(audio.is_background_music_playing());
    }

    #[test]
    fn test_failing_cue_is_logged_not_fatal() {
        let mut backend = HeadlessBackend::new();
        backend.fail_clip("level-complete");
        let mut audio = AudioManager::new(backend, Storage::in_memory(), KEY, AudioConfig::default());

        audio.play(SoundId::LevelComplete);
        assert_eq!(audio.backend().play_count("level-complete"), 0);

        audio.backend_mut().heal_clip("level-complete");
        audio.play(SoundId::LevelComplete);
        assert_eq!(audio.backend().play_count("level-complete"), 1);
    }
}
