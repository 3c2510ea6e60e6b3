//! The card-matching state machine.
//!
//! ## Transitions
//!
//! ```text
//! idle ──start──▶ playing ◀──resume── paused
//!                    │ └──pause──────────▲
//!                    ▼
//!                completed
//! ```
//!
//! `start_level` moves to `playing` from any status with a fresh deck and a
//! new generation. `abandon` returns to `idle`, also under a new generation.
//!
//! The machine has no notion of time or sound. It reports what happened via
//! [`FlipOutcome`] and exposes [`MemoryGame::tick`] and
//! [`MemoryGame::flip_back`] for whoever drives the clock; see
//! [`GameSession`](super::GameSession).

use tracing::{debug, info};

use super::scoring::match_score;
use crate::core::{CardId, Deck, EngineConfig, GameRng, GameState, GameStatus, PairId};
use crate::levels::{LevelCatalog, LevelDefinition};

/// Why a flip was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlipRejection {
    /// The game is not in `playing` status.
    NotPlaying,
    /// No card has that id.
    UnknownCard,
    /// The card is already face-up or matched.
    NotSelectable,
    /// Two unresolved cards are already showing.
    SelectionFull,
}

/// Result of a flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Nothing changed.
    Ignored(FlipRejection),
    /// First card of a pair attempt turned over.
    Revealed(CardId),
    /// Second card matched the first.
    Matched {
        pair: PairId,
        points: u64,
        /// This match resolved the last pair.
        completed: bool,
    },
    /// Second card did not match; both stay up until flipped back.
    Mismatched { cards: [CardId; 2] },
}

impl FlipOutcome {
    /// Was the flip accepted?
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, FlipOutcome::Ignored(_))
    }
}

/// Owns the deck and session state of the current attempt.
#[derive(Clone, Debug)]
pub struct MemoryGame {
    catalog: LevelCatalog,
    rng: GameRng,
    state: GameState,
}

impl MemoryGame {
    /// Create an idle game.
    pub fn new(catalog: LevelCatalog, rng: GameRng) -> Self {
        Self {
            catalog,
            rng,
            state: GameState::idle(0),
        }
    }

    /// Create an idle game seeded from `config`.
    pub fn from_config(config: &EngineConfig, catalog: LevelCatalog) -> Self {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        Self::new(catalog, rng)
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Generation of the current attempt.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    /// The level catalog.
    #[must_use]
    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    /// Swap the level catalog, abandoning the current attempt.
    pub fn replace_catalog(&mut self, catalog: LevelCatalog) {
        self.catalog = catalog;
        self.abandon();
    }

    /// Configuration for `level`. Out-of-range numbers resolve to the
    /// nearest defined level.
    #[must_use]
    pub fn level_config(&self, level: u32) -> &LevelDefinition {
        self.catalog.get(level)
    }

    /// Begin a fresh attempt at `level`, superseding whatever came before.
    pub fn start_level(&mut self, level: u32) -> &GameState {
        let level = level.max(1);
        let generation = self.state.generation + 1;
        let deck = Deck::deal(self.catalog.get(level), &mut self.rng);

        info!(level, generation, cards = deck.len(), "level started");
        self.state = GameState::playing(generation, level, deck);
        &self.state
    }

    /// Turn over a card.
    pub fn flip_card(&mut self, id: CardId) -> FlipOutcome {
        if let Err(reason) = self.check_flip(id) {
            debug!(card = %id, ?reason, "flip ignored");
            return FlipOutcome::Ignored(reason);
        }

        let state = &mut self.state;
        if let Some(card) = state.deck.get_mut(id) {
            card.face_up = true;
        }
        state.face_up_selection.push(id);
        state.moves += 1;

        let selection = &state.face_up_selection;
        let full = (selection.len() == 2).then(|| (selection[0], selection[1]));

        let outcome = match full {
            Some((first, second)) => self.resolve_pair(first, second),
            None => FlipOutcome::Revealed(id),
        };
        debug_assert!(self.state.invariants_hold());
        outcome
    }

    /// Halt the game. Only meaningful while playing.
    pub fn pause(&mut self) -> bool {
        self.transition(GameStatus::Playing, GameStatus::Paused)
    }

    /// Continue a paused game.
    pub fn resume(&mut self) -> bool {
        self.transition(GameStatus::Paused, GameStatus::Playing)
    }

    /// Count one elapsed second. Ignored unless playing.
    pub fn tick(&mut self) -> bool {
        if !self.state.status.is_running() {
            return false;
        }
        self.state.time_elapsed_seconds = self.state.time_elapsed_seconds.saturating_add(1);
        true
    }

    /// Turn a mismatched pair face-down again.
    ///
    /// Only acts if `generation` is still current and the selection is
    /// exactly `cards`; anything else means the pair was already dealt with
    /// or belongs to a superseded attempt.
    pub fn flip_back(&mut self, generation: u64, cards: [CardId; 2]) -> bool {
        if generation != self.state.generation {
            debug!(generation, current = self.state.generation, "stale flip-back dropped");
            return false;
        }
        if self.state.face_up_selection.as_slice() != cards.as_slice() {
            return false;
        }

        for id in cards {
            if let Some(card) = self.state.deck.get_mut(id) {
                if !card.matched {
                    card.face_up = false;
                }
            }
        }
        self.state.face_up_selection.clear();
        debug_assert!(self.state.invariants_hold());
        true
    }

    /// Leave the current attempt. The state goes idle under a new
    /// generation, so anything scheduled for the old attempt is stale.
    pub fn abandon(&mut self) -> &GameState {
        let generation = self.state.generation + 1;
        let level = self.state.current_level;
        debug!(generation, "attempt abandoned");

        self.state = GameState {
            current_level: level,
            ..GameState::idle(generation)
        };
        &self.state
    }

    fn check_flip(&self, id: CardId) -> Result<(), FlipRejection> {
        if self.state.status != GameStatus::Playing {
            return Err(FlipRejection::NotPlaying);
        }
        let card = self.state.card(id).ok_or(FlipRejection::UnknownCard)?;
        if !card.is_selectable() {
            return Err(FlipRejection::NotSelectable);
        }
        if self.state.face_up_selection.len() >= 2 {
            return Err(FlipRejection::SelectionFull);
        }
        Ok(())
    }

    fn resolve_pair(&mut self, first: CardId, second: CardId) -> FlipOutcome {
        let state = &mut self.state;
        let pair_of = |id| state.deck.get(id).map(|c| c.pair_id);

        let pair = match (pair_of(first), pair_of(second)) {
            (Some(a), Some(b)) if a == b => a,
            _ => {
                debug!(%first, %second, "mismatch");
                return FlipOutcome::Mismatched {
                    cards: [first, second],
                };
            }
        };

        for id in [first, second] {
            if let Some(card) = state.deck.get_mut(id) {
                card.matched = true;
            }
        }
        state.matched_pair_ids.insert(pair);
        state.face_up_selection.clear();

        let points = match_score(state.time_elapsed_seconds, state.moves, state.current_level);
        state.score += points;

        let completed = state.all_pairs_matched();
        if completed {
            state.status = GameStatus::Completed;
            info!(
                level = state.current_level,
                score = state.score,
                moves = state.moves,
                seconds = state.time_elapsed_seconds,
                "level completed"
            );
        } else {
            debug!(%pair, points, "match");
        }

        FlipOutcome::Matched {
            pair,
            points,
            completed,
        }
    }

    fn transition(&mut self, from: GameStatus, to: GameStatus) -> bool {
        if self.state.status != from {
            return false;
        }
        debug!(?from, ?to, "status change");
        self.state.status = to;
        true
    }
}
