//! Session state for one level attempt.
//!
//! ## GameState
//!
//! The mutable record the state machine works on:
//! - Level, score, moves, elapsed seconds
//! - The dealt deck
//! - The face-up selection (at most two unresolved cards)
//! - The matched pair set
//! - Status and session generation
//!
//! ## Invariants
//!
//! - `face_up_selection.len() <= 2`
//! - a card is face-up iff it is in the selection or matched
//! - `status == Completed` iff every pair of the deck is matched
//!
//! Cloning is O(1) thanks to `im` collections, so the machine can hand out
//! snapshots after every call.

use im::HashSet as ImHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, CardId, Deck, PairId};

/// Lifecycle status of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// No level started yet, or the player left the game.
    #[default]
    Idle,
    /// Accepting flips; the timer is running.
    Playing,
    /// Timer halted; flips ignored.
    Paused,
    /// Every pair matched. Terminal until the next level start.
    Completed,
}

impl GameStatus {
    /// Is the timer supposed to be ticking?
    #[must_use]
    pub fn is_running(self) -> bool {
        self == GameStatus::Playing
    }
}

/// Up to two revealed, unresolved cards.
pub type Selection = SmallVec<[CardId; 2]>;

/// Mutable session record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Session generation. Bumped whenever an attempt is superseded.
    pub generation: u64,

    /// Current level (starts at 1).
    pub current_level: u32,

    pub score: u64,
    pub moves: u32,
    pub time_elapsed_seconds: u32,

    pub deck: Deck,

    /// Revealed, unresolved cards in reveal order.
    pub face_up_selection: Selection,

    /// Pairs resolved this session.
    pub matched_pair_ids: ImHashSet<PairId>,

    pub status: GameStatus,
}

impl Default for GameState {
    fn default() -> Self {
        Self::idle(0)
    }
}

impl GameState {
    /// An idle state with no deck.
    #[must_use]
    pub fn idle(generation: u64) -> Self {
        Self {
            generation,
            current_level: 1,
            score: 0,
            moves: 0,
            time_elapsed_seconds: 0,
            deck: Deck::default(),
            face_up_selection: Selection::new(),
            matched_pair_ids: ImHashSet::new(),
            status: GameStatus::Idle,
        }
    }

    /// A fresh attempt at `level` with the given deck, already playing.
    #[must_use]
    pub fn playing(generation: u64, level: u32, deck: Deck) -> Self {
        Self {
            current_level: level,
            deck,
            status: GameStatus::Playing,
            ..Self::idle(generation)
        }
    }

    /// Get a card by id.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.deck.get(id)
    }

    /// Number of pairs in the current deck.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.deck.pair_count()
    }

    /// Number of pairs matched so far.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matched_pair_ids.len()
    }

    /// Have all pairs been matched?
    #[must_use]
    pub fn all_pairs_matched(&self) -> bool {
        !self.deck.is_empty() && self.matched_count() == self.pair_count()
    }

    /// Is this pair resolved?
    #[must_use]
    pub fn is_pair_matched(&self, pair_id: PairId) -> bool {
        self.matched_pair_ids.contains(&pair_id)
    }

    /// Check the face-up/selection/completion invariants.
    ///
    /// Used by tests and debug assertions.
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        if self.face_up_selection.len() > 2 {
            return false;
        }
        let faces_consistent = self.deck.iter().all(|card| {
            let expected = card.matched || self.face_up_selection.contains(&card.id);
            card.face_up == expected
        });
        let completion_consistent =
            (self.status == GameStatus::Completed) == self.all_pairs_matched();
        faces_consistent && completion_consistent
    }
}
