//! Seeded shuffling for deck deals.
//!
//! A session owns one `GameRng` and deals every deck from it, so a fixed
//! seed reproduces a whole sequence of levels. Hosts that want to resume a
//! sequence later save a [`RngCheckpoint`].
//!
//! ```
//! use memory_match::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//!
//! let mut left: Vec<u32> = (0..12).collect();
//! let mut right = left.clone();
//! a.shuffle(&mut left);
//! b.shuffle(&mut right);
//!
//! assert_eq!(left, right);
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// ChaCha8 stream that records the seed it started from.
#[derive(Clone, Debug)]
pub struct GameRng {
    stream: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Start a stream at `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            stream: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Start a stream from an operating-system seed.
    ///
    /// The seed is kept, so a surprising deal can still be replayed.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed the stream started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniformly permute `items` (Fisher-Yates).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.stream);
    }

    /// Position of the stream, for saving.
    #[must_use]
    pub fn checkpoint(&self) -> RngCheckpoint {
        RngCheckpoint {
            seed: self.seed,
            word_pos: self.stream.get_word_pos(),
        }
    }

    /// Continue a saved stream where it left off.
    #[must_use]
    pub fn restore(checkpoint: &RngCheckpoint) -> Self {
        let mut rng = Self::new(checkpoint.seed);
        rng.stream.set_word_pos(checkpoint.word_pos);
        rng
    }
}

/// Saved position of a [`GameRng`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RngCheckpoint {
    pub seed: u64,
    /// ChaCha8 word position.
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dealt(rng: &mut GameRng) -> Vec<u32> {
        let mut cards: Vec<u32> = (0..24).collect();
        rng.shuffle(&mut cards);
        cards
    }

    #[test]
    fn test_same_seed_same_deals() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);

        for _ in 0..5 {
            assert_eq!(dealt(&mut a), dealt(&mut b));
        }
    }

    #[test]
    fn test_consecutive_deals_differ() {
        let mut rng = GameRng::new(42);
        assert_ne!(dealt(&mut rng), dealt(&mut rng));
    }

    #[test]
    fn test_shuffle_keeps_every_item() {
        let mut cards = dealt(&mut GameRng::new(3));
        cards.sort_unstable();
        assert_eq!(cards, (0..24).collect::<Vec<_>>());
    }

    #[test]
    fn test_entropy_seed_replays() {
        let rng = GameRng::from_entropy();
        let mut original = rng.clone();
        let mut replay = GameRng::new(rng.seed());

        assert_eq!(dealt(&mut original), dealt(&mut replay));
    }

    #[test]
    fn test_checkpoint_resumes_stream() {
        let mut rng = GameRng::new(8);
        dealt(&mut rng);
        dealt(&mut rng);

        let checkpoint = rng.checkpoint();
        let next = dealt(&mut rng);

        let mut resumed = GameRng::restore(&checkpoint);
        assert_eq!(dealt(&mut resumed), next);
    }

    #[test]
    fn test_checkpoint_json() {
        let checkpoint = GameRng::new(5).checkpoint();
        let json = serde_json::to_value(checkpoint).unwrap();
        assert_eq!(json["seed"], 5);
        assert!(json.get("wordPos").is_some());
    }
}
