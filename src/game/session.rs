//! Presentation-facing session.
//!
//! [`GameSession`] is what a UI holds. It owns the [`MemoryGame`], the
//! virtual clock with its ticker and delayed tasks, the [`AudioManager`]
//! and the persisted [`PlayerProgress`]. Every mutating call returns a
//! [`GameState`] snapshot for re-rendering.
//!
//! ## Time
//!
//! The host reports elapsed time through [`GameSession::advance`]. Ticks and
//! delayed tasks due within the advanced span fire in chronological order;
//! at equal instants the tick fires first.
//!
//! ## Supersession
//!
//! Delayed tasks remember the generation they were scheduled under and are
//! dropped unfired if the attempt has since been replaced or abandoned.

use std::time::Duration;

use tracing::{debug, info};

use super::machine::{FlipOutcome, MemoryGame};
use crate::audio::{AudioBackend, AudioConfig, AudioManager, HeadlessBackend, SoundId};
use crate::core::{CardId, EngineConfig, GameState, GameStatus};
use crate::levels::{LevelCatalog, LevelDefinition};
use crate::storage::{CompletedGame, PlayerProgress, Storage};
use crate::timing::{DeferredQueue, Ticker, VirtualClock};

/// Work scheduled to run after a fixed delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredAction {
    /// Turn a mismatched pair back over.
    FlipBack([CardId; 2]),
    /// Play a cue.
    PlayCue(SoundId),
}

/// A running game plus everything around it.
pub struct GameSession<B: AudioBackend = HeadlessBackend> {
    config: EngineConfig,
    game: MemoryGame,
    clock: VirtualClock,
    ticker: Ticker,
    deferred: DeferredQueue<DeferredAction>,
    audio: AudioManager<B>,
    storage: Storage,
    progress: PlayerProgress,
    /// Generation whose completion has been written to progress.
    committed_generation: Option<u64>,
    /// Music was playing when the app was last hidden.
    music_before_hidden: bool,
}

impl<B: AudioBackend> std::fmt::Debug for GameSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("now", &self.clock.now())
            .field("state", self.game.state())
            .field("pending", &self.deferred.len())
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

impl GameSession<HeadlessBackend> {
    /// A session with in-memory storage and silent audio.
    pub fn headless(config: EngineConfig) -> Self {
        let storage = Storage::in_memory();
        let audio = AudioManager::new(
            HeadlessBackend::new(),
            storage.clone(),
            config.audio_settings_key.clone(),
            AudioConfig::default(),
        );
        Self::new(config, storage, audio)
    }
}

impl<B: AudioBackend> GameSession<B> {
    /// Create a session with the standard level catalog.
    ///
    /// Progress is loaded from `storage` under the configured key.
    pub fn new(config: EngineConfig, storage: Storage, audio: AudioManager<B>) -> Self {
        let progress = PlayerProgress::load(&storage, &config.progress_key);
        let game = MemoryGame::from_config(&config, LevelCatalog::standard());

        Self {
            ticker: Ticker::new(config.tick_interval),
            config,
            game,
            clock: VirtualClock::new(),
            deferred: DeferredQueue::new(),
            audio,
            storage,
            progress,
            committed_generation: None,
            music_before_hidden: false,
        }
    }

    /// Replace the level catalog. The current attempt is abandoned.
    #[must_use]
    pub fn with_catalog(mut self, catalog: LevelCatalog) -> Self {
        self.game.replace_catalog(catalog);
        self.ticker.stop();
        self.drop_stale_tasks();
        self
    }

    // === Queries ===

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        self.game.state()
    }

    /// Owned copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        self.game.state().clone()
    }

    /// Stored player progress.
    #[must_use]
    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    /// Configuration for `level`, falling back to the nearest defined level.
    #[must_use]
    pub fn level_config(&self, level: u32) -> &LevelDefinition {
        self.game.level_config(level)
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Virtual time since the session was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Is the elapsed-time ticker armed?
    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// Number of delayed tasks waiting, stale ones included.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.deferred.len()
    }

    /// The audio manager.
    #[must_use]
    pub fn audio(&self) -> &AudioManager<B> {
        &self.audio
    }

    /// The audio manager, mutably (volume, mute, music controls).
    pub fn audio_mut(&mut self) -> &mut AudioManager<B> {
        &mut self.audio
    }

    // === Game intents ===

    /// Start a fresh attempt at `level`.
    pub fn start_level(&mut self, level: u32) -> GameState {
        self.game.start_level(level);
        self.drop_stale_tasks();
        self.ticker.stop();
        self.ticker.start(self.clock.now());
        self.snapshot()
    }

    /// Turn over a card, scheduling sounds and the mismatch flip-back.
    pub fn flip_card(&mut self, id: CardId) -> GameState {
        let outcome = self.game.flip_card(id);
        if outcome.is_accepted() && self.config.flip_cue {
            self.audio.play(SoundId::CardFlip);
        }

        match outcome {
            FlipOutcome::Ignored(_) | FlipOutcome::Revealed(_) => {}
            FlipOutcome::Matched { completed, .. } => {
                self.audio.play(SoundId::MatchSuccess);
                if completed {
                    self.ticker.stop();
                    self.schedule(
                        self.config.completion_cue_delay,
                        DeferredAction::PlayCue(SoundId::LevelComplete),
                    );
                    self.complete_game();
                }
            }
            FlipOutcome::Mismatched { cards } => {
                self.schedule(
                    self.config.mismatch_cue_delay,
                    DeferredAction::PlayCue(SoundId::MatchFail),
                );
                self.schedule(self.config.flip_back_delay, DeferredAction::FlipBack(cards));
            }
        }
        self.snapshot()
    }

    /// Pause the game and its timer.
    pub fn pause(&mut self) -> GameState {
        if self.game.pause() {
            self.ticker.stop();
        }
        self.snapshot()
    }

    /// Resume a paused game. The timer restarts with a full interval.
    pub fn resume(&mut self) -> GameState {
        if self.game.resume() {
            self.ticker.start(self.clock.now());
        }
        self.snapshot()
    }

    /// Let `elapsed` virtual time pass, firing due ticks and tasks.
    pub fn advance(&mut self, elapsed: Duration) -> GameState {
        let target = self.clock.now() + elapsed;

        loop {
            let tick = self.ticker.next_due().filter(|&due| due <= target);
            let task = self.deferred.next_due().filter(|&due| due <= target);

            match (tick, task) {
                (Some(t), Some(d)) if t <= d => self.fire_tick(t),
                (Some(t), None) => self.fire_tick(t),
                (_, Some(d)) => self.fire_task(d),
                (None, None) => break,
            }
        }

        self.clock.advance_to(target);
        self.audio.update();
        self.snapshot()
    }

    /// Commit the current completion to player progress.
    ///
    /// Runs automatically when the last pair is matched; calling it again
    /// for the same attempt does nothing. Returns whether progress changed.
    pub fn complete_game(&mut self) -> bool {
        let state = self.game.state();
        if state.status != GameStatus::Completed
            || self.committed_generation == Some(state.generation)
        {
            return false;
        }

        self.progress = self.progress.record_game(CompletedGame {
            level: state.current_level,
            score: state.score,
            time_elapsed_seconds: state.time_elapsed_seconds,
        });
        self.committed_generation = Some(state.generation);
        self.progress.save(&self.storage, &self.config.progress_key);

        info!(
            games = self.progress.total_games_played,
            best = self.progress.best_score,
            "progress committed"
        );
        true
    }

    // === Navigation ===

    /// Start over at level 1.
    pub fn start_new_game(&mut self) -> GameState {
        self.start_level(1)
    }

    /// Resume at the highest level reached so far.
    pub fn continue_game(&mut self) -> GameState {
        self.start_level(self.progress.highest_level_reached)
    }

    /// Start the level after the current one.
    pub fn next_level(&mut self) -> GameState {
        let level = self.game.state().current_level.saturating_add(1);
        self.start_level(level)
    }

    /// Restart the current level.
    pub fn play_again(&mut self) -> GameState {
        self.start_level(self.game.state().current_level)
    }

    /// Leave the game for the menu, discarding the attempt's pending tasks.
    pub fn go_home(&mut self) -> GameState {
        self.game.abandon();
        self.drop_stale_tasks();
        self.ticker.stop();
        self.snapshot()
    }

    // === Presentation hooks ===

    /// Apply the foreground/background policy to background music.
    ///
    /// Hiding pauses music; showing resumes it only if it was playing when
    /// hidden.
    pub fn set_app_visible(&mut self, visible: bool) {
        if visible {
            if std::mem::take(&mut self.music_before_hidden) {
                self.audio.resume_background_music();
            }
        } else if self.audio.is_background_music_playing() {
            self.music_before_hidden = true;
            self.audio.pause_background_music();
        }
    }

    /// Play the button-click cue.
    pub fn click_button(&mut self) {
        self.audio.play(SoundId::ButtonClick);
    }

    // === Internals ===

    fn schedule(&mut self, delay: Duration, action: DeferredAction) {
        let due = self.clock.now() + delay;
        self.deferred.schedule(due, self.game.generation(), action);
    }

    fn drop_stale_tasks(&mut self) {
        let dropped = self.deferred.retain_generation(self.game.generation());
        if dropped > 0 {
            debug!(dropped, generation = self.game.generation(), "pending tasks discarded");
        }
    }

    fn fire_tick(&mut self, due: Duration) {
        self.clock.advance_to(due);
        if self.ticker.fire(due) && !self.game.tick() {
            self.ticker.stop();
        }
    }

    fn fire_task(&mut self, due: Duration) {
        self.clock.advance_to(due);
        let Some(task) = self.deferred.pop_due(due) else {
            return;
        };

        let generation = self.game.generation();
        if !task.is_current(generation) {
            debug!(
                task = ?task.task,
                scheduled = task.generation,
                current = generation,
                "stale task dropped"
            );
            return;
        }

        match task.task {
            DeferredAction::FlipBack(cards) => {
                self.game.flip_back(task.generation, cards);
            }
            DeferredAction::PlayCue(sound) => self.audio.play(sound),
        }
    }
}
