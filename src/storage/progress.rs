//! Player progress across sessions.

use serde::{Deserialize, Serialize};

use super::adapter::Storage;

/// Durable summary of every completed game.
///
/// Stored as one JSON record; missing fields take their default
/// individually, a malformed record falls back to the whole default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerProgress {
    pub highest_level_reached: u32,
    pub best_score: u64,
    pub total_games_played: u32,
    /// Running mean of completion times, rounded to whole seconds.
    pub average_time_seconds: u32,
    pub has_played_before: bool,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self {
            highest_level_reached: 1,
            best_score: 0,
            total_games_played: 0,
            average_time_seconds: 0,
            has_played_before: false,
        }
    }
}

/// Outcome of one completed level attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletedGame {
    pub level: u32,
    pub score: u64,
    pub time_elapsed_seconds: u32,
}

impl PlayerProgress {
    /// Load progress, defaulting on absence or corruption.
    pub fn load(storage: &Storage, key: &str) -> Self {
        storage.read(key, Self::default())
    }

    /// Persist the whole record. Returns whether it was written.
    pub fn save(&self, storage: &Storage, key: &str) -> bool {
        storage.write(key, self)
    }

    /// Progress after folding in one completed game.
    #[must_use]
    pub fn record_game(&self, game: CompletedGame) -> Self {
        let previous = u64::from(self.total_games_played);
        let games = previous + 1;

        // Weighted running mean, rounded half up
        let total_time = u64::from(self.average_time_seconds) * previous
            + u64::from(game.time_elapsed_seconds);
        let average = (2 * total_time + games) / (2 * games);

        Self {
            highest_level_reached: self.highest_level_reached.max(game.level),
            best_score: self.best_score.max(game.score),
            total_games_played: self.total_games_played.saturating_add(1),
            average_time_seconds: u32::try_from(average).unwrap_or(u32::MAX),
            has_played_before: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::storage::KeyValueStore;
    use std::sync::Arc;

    fn game(level: u32, score: u64, time: u32) -> CompletedGame {
        CompletedGame {
            level,
            score,
            time_elapsed_seconds: time,
        }
    }

    #[test]
    fn test_first_game() {
        let progress = PlayerProgress::default().record_game(game(1, 1200, 45));

        assert!(progress.has_played_before);
        assert_eq!(progress.total_games_played, 1);
        assert_eq!(progress.best_score, 1200);
        assert_eq!(progress.highest_level_reached, 1);
        assert_eq!(progress.average_time_seconds, 45);
    }

    #[test]
    fn test_running_average_rounds() {
        let progress = PlayerProgress::default()
            .record_game(game(1, 100, 10))
            .record_game(game(2, 50, 15));

        // (10 + 15) / 2 = 12.5 -> 13
        assert_eq!(progress.average_time_seconds, 13);
        assert_eq!(progress.best_score, 100);
        assert_eq!(progress.highest_level_reached, 2);

        let progress = progress.record_game(game(1, 10, 13));
        // (13 * 2 + 13) / 3 = 13
        assert_eq!(progress.average_time_seconds, 13);
        assert_eq!(progress.total_games_played, 3);
    }

    #[test]
    fn test_highest_level_never_decreases() {
        let progress = PlayerProgress::default()
            .record_game(game(3, 1, 1))
            .record_game(game(1, 1, 1));
        assert_eq!(progress.highest_level_reached, 3);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(PlayerProgress::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "highestLevelReached": 1,
                "bestScore": 0,
                "totalGamesPlayed": 0,
                "averageTimeSeconds": 0,
                "hasPlayedBefore": false
            })
        );
    }

    #[test]
    fn test_corrupt_record_loads_default() {
        let store = Arc::new(MemoryStore::new());
        store.set("progress", "{\"bestScore\": tru").unwrap();
        let storage = Storage::from_shared(store);

        assert_eq!(PlayerProgress::load(&storage, "progress"), PlayerProgress::default());
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let store = Arc::new(MemoryStore::new());
        store.set("progress", "{\"bestScore\": 900}").unwrap();
        let storage = Storage::from_shared(store);

        let progress = PlayerProgress::load(&storage, "progress");
        assert_eq!(progress.best_score, 900);
        assert_eq!(progress.highest_level_reached, 1);
    }

    #[test]
    fn test_save_and_load() {
        let storage = Storage::in_memory();
        let progress = PlayerProgress::default().record_game(game(2, 700, 30));

        assert!(progress.save(&storage, "progress"));
        assert_eq!(PlayerProgress::load(&storage, "progress"), progress);
    }
}
