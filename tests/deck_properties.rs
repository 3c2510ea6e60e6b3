//! Property tests for decks and state invariants.
//!
//! Random seeds, levels and tap sequences must never break:
//! - Exactly two cards per pair, ids equal to positions
//! - At most two cards in the selection
//! - Face-up iff selected or matched
//! - Completed iff every pair is matched

use std::time::Duration;

use proptest::prelude::*;
use rustc_hash::FxHashMap;

use memory_match::{CardId, Deck, EngineConfig, GameRng, GameSession, LevelCatalog, PairId};

proptest! {
    #[test]
    fn deck_has_two_cards_per_pair(seed in any::<u64>(), level in 0u32..8) {
        let catalog = LevelCatalog::standard();
        let definition = catalog.get(level);
        let deck = Deck::deal(definition, &mut GameRng::new(seed));

        prop_assert_eq!(deck.len(), definition.card_count());

        let mut counts: FxHashMap<PairId, usize> = FxHashMap::default();
        for (index, card) in deck.iter().enumerate() {
            prop_assert_eq!(card.id.index(), index);
            *counts.entry(card.pair_id).or_default() += 1;
        }
        prop_assert_eq!(counts.len(), definition.pair_count);
        prop_assert!(counts.values().all(|&n| n == 2));
    }

    #[test]
    fn random_taps_keep_invariants(
        seed in any::<u64>(),
        level in 1u32..5,
        taps in prop::collection::vec((0u32..32, 0u64..1500), 0..120),
    ) {
        let mut session = GameSession::headless(EngineConfig::default().with_seed(seed));
        session.start_level(level);

        let mut last_moves = 0;
        for (card, wait) in taps {
            let state = session.flip_card(CardId::new(card));
            prop_assert!(state.invariants_hold());
            prop_assert!(state.moves >= last_moves);
            last_moves = state.moves;

            let state = session.advance(Duration::from_millis(wait));
            prop_assert!(state.invariants_hold());
            prop_assert!(state.face_up_selection.len() <= 2);
        }

        prop_assert!(session.progress().total_games_played <= 1);
    }
}
