//! Cards and decks.
//!
//! A deck is dealt fresh for every level attempt: `pair_count` pairs, each
//! pair sharing a [`PairId`] and a symbol, shuffled once and then addressed
//! by position. After the shuffle a card's [`CardId`] is its index in the
//! deck, so the presentation layer can use ids as stable grid slots.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::rng::GameRng;
use crate::levels::LevelDefinition;

/// Positional card identifier, unique within the current deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Position of the card in its deck.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Groups exactly two cards of a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairId(pub u32);

impl PairId {
    /// Create a new pair ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PairId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pair({})", self.0)
    }
}

/// One face of a matchable pair.
///
/// `symbol` is an opaque identifier; turning it into a glyph is up to the
/// presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub symbol: String,
    pub face_up: bool,
    pub matched: bool,
    pub pair_id: PairId,
}

impl Card {
    fn face_down(id: CardId, symbol: String, pair_id: PairId) -> Self {
        Self {
            id,
            symbol,
            face_up: false,
            matched: false,
            pair_id,
        }
    }

    /// Can this card still be turned over by the player?
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self.face_up && !self.matched
    }
}

/// Ordered, shuffled sequence of cards for one level attempt.
///
/// Backed by an `im::Vector` so cloning a deck (and with it a whole
/// `GameState` snapshot) is O(1).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<Card>,
}

impl Deck {
    /// Deal a shuffled deck for a level.
    ///
    /// Pair `i` gets symbol `symbols[i % symbols.len()]`, so symbol lists
    /// shorter than the pair count are cycled.
    #[must_use]
    pub fn deal(level: &LevelDefinition, rng: &mut GameRng) -> Self {
        let mut cards = Vec::with_capacity(level.pair_count * 2);

        for pair in 0..level.pair_count {
            let symbol = level.symbol_for_pair(pair);
            let pair_id = PairId::new(pair as u32);
            cards.push(Card::face_down(CardId::new(0), symbol.to_string(), pair_id));
            cards.push(Card::face_down(CardId::new(0), symbol.to_string(), pair_id));
        }

        rng.shuffle(&mut cards);

        // Ids are positions after the shuffle
        for (index, card) in cards.iter_mut().enumerate() {
            card.id = CardId::new(index as u32);
        }

        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Number of cards in the deck.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Is the deck empty? (Only before the first level start.)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of pairs dealt.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    /// Get a card by id. Unknown ids yield `None`.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(id.index())
    }

    /// Iterate over the cards in grid order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Ids of both cards carrying `pair_id`.
    #[must_use]
    pub fn cards_of_pair(&self, pair_id: PairId) -> Vec<CardId> {
        self.cards
            .iter()
            .filter(|c| c.pair_id == pair_id)
            .map(|c| c.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn level(pairs: usize, symbols: &[&str]) -> LevelDefinition {
        LevelDefinition::new(1, 1, pairs * 2, pairs, symbols.iter().copied())
    }

    #[test]
    fn test_deal_pairs_twice_each() {
        let mut rng = GameRng::new(42);
        let deck = Deck::deal(&level(6, &["a", "b", "c", "d", "e", "f"]), &mut rng);

        assert_eq!(deck.len(), 12);
        assert_eq!(deck.pair_count(), 6);

        let mut counts: FxHashMap<PairId, usize> = FxHashMap::default();
        for card in deck.iter() {
            *counts.entry(card.pair_id).or_default() += 1;
        }
        assert_eq!(counts.len(), 6);
        assert!(counts.values().all(|&n| n == 2));
    }

    #[test]
    fn test_ids_are_positions() {
        let mut rng = GameRng::new(3);
        let deck = Deck::deal(&level(4, &["a", "b", "c", "d"]), &mut rng);

        for (index, card) in deck.iter().enumerate() {
            assert_eq!(card.id.index(), index);
            assert!(card.is_selectable());
        }
    }

    #[test]
    fn test_symbols_cycle() {
        let mut rng = GameRng::new(9);
        let deck = Deck::deal(&level(5, &["x", "y"]), &mut rng);

        for card in deck.iter() {
            let expected = if card.pair_id.0 % 2 == 0 { "x" } else { "y" };
            assert_eq!(card.symbol, expected);
        }
    }

    #[test]
    fn test_cards_of_pair() {
        let mut rng = GameRng::new(1);
        let deck = Deck::deal(&level(3, &["a", "b", "c"]), &mut rng);

        let ids = deck.cards_of_pair(PairId::new(2));
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(ids.iter().all(|&id| deck.get(id).unwrap().pair_id == PairId::new(2)));
    }

    #[test]
    fn test_get_unknown_id() {
        let mut rng = GameRng::new(1);
        let deck = Deck::deal(&level(2, &["a", "b"]), &mut rng);
        assert!(deck.get(CardId::new(4)).is_none());
        assert!(Deck::default().is_empty());
    }

    #[test]
    fn test_same_seed_same_deck() {
        let def = level(6, &["a", "b", "c", "d", "e", "f"]);
        let a = Deck::deal(&def, &mut GameRng::new(77));
        let b = Deck::deal(&def, &mut GameRng::new(77));
        assert_eq!(a, b);
    }
}
