//! Persistence tests.
//!
//! These tests verify how sessions read and write their records:
//! - Progress is committed exactly once per completion
//! - Corrupt or missing records fall back to defaults
//! - Write failures never interrupt play
//! - File-backed stores survive a restart

use std::sync::Arc;

use memory_match::core::{DEFAULT_AUDIO_SETTINGS_KEY, DEFAULT_PROGRESS_KEY};
use memory_match::{
    AudioConfig, AudioManager, EngineConfig, FileStore, GameSession, GameState, GameStatus,
    HeadlessBackend, KeyValueStore, MemoryStore, PairId, PlayerProgress, Storage,
};

fn session_on(storage: Storage, seed: u64) -> GameSession {
    let config = EngineConfig::default().with_seed(seed);
    let audio = AudioManager::new(
        HeadlessBackend::new(),
        storage.clone(),
        config.audio_settings_key.clone(),
        AudioConfig::default(),
    );
    GameSession::new(config, storage, audio)
}

fn solve(session: &mut GameSession) -> GameState {
    let state = session.snapshot();
    for pair in 0..state.pair_count() as u32 {
        for id in state.deck.cards_of_pair(PairId::new(pair)) {
            session.flip_card(id);
        }
    }
    session.snapshot()
}

// =============================================================================
// Progress commit
// =============================================================================

/// One completion, one increment, however often the commit is requested.
#[test]
fn test_commit_exactly_once() {
    let store = Arc::new(MemoryStore::new());
    let mut session = session_on(Storage::from_shared(store.clone()), 5);

    session.start_level(2);
    let state = solve(&mut session);
    assert_eq!(state.status, GameStatus::Completed);

    for _ in 0..5 {
        assert!(!session.complete_game());
    }
    assert_eq!(session.progress().total_games_played, 1);

    let stored: PlayerProgress =
        serde_json::from_str(&store.get(DEFAULT_PROGRESS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.total_games_played, 1);
    assert_eq!(stored.best_score, state.score);
    assert_eq!(stored.highest_level_reached, 2);
    assert!(stored.has_played_before);
}

/// Nothing is committed before the level is complete.
#[test]
fn test_no_commit_while_playing() {
    let mut session = session_on(Storage::in_memory(), 5);
    session.start_level(1);

    assert!(!session.complete_game());
    assert_eq!(session.progress(), &PlayerProgress::default());
}

/// Each completed attempt is counted, and the average time tracks them.
#[test]
fn test_commit_per_attempt() {
    let mut session = session_on(Storage::in_memory(), 5);

    session.start_level(1);
    session.advance(std::time::Duration::from_secs(10));
    solve(&mut session);

    session.play_again();
    session.advance(std::time::Duration::from_secs(21));
    solve(&mut session);

    let progress = session.progress();
    assert_eq!(progress.total_games_played, 2);
    // (10 + 21) / 2 = 15.5 -> 16
    assert_eq!(progress.average_time_seconds, 16);
}

// =============================================================================
// Reading
// =============================================================================

/// Corrupt progress JSON reads as the default record.
#[test]
fn test_corrupt_progress_reads_default() {
    let store = Arc::new(MemoryStore::new());
    store.set(DEFAULT_PROGRESS_KEY, "not json at all").unwrap();

    let session = session_on(Storage::from_shared(store), 1);
    let progress = session.progress();

    assert_eq!(progress, &PlayerProgress::default());
    assert_eq!(progress.highest_level_reached, 1);
    assert!(!progress.has_played_before);
}

/// A typed read surfaces the error the lenient read swallows.
#[test]
fn test_try_read_reports_malformed_value() {
    let store = Arc::new(MemoryStore::new());
    store.set("k", "[1, 2").unwrap();
    let storage = Storage::from_shared(store);

    assert!(storage.try_read::<Vec<u32>>("k").is_err());
    assert_eq!(storage.read("k", vec![7u32]), vec![7]);
}

// =============================================================================
// Write failures
// =============================================================================

/// A full store keeps the game playable and progress in memory.
#[test]
fn test_rejected_write_keeps_memory_copy() {
    let store = Arc::new(MemoryStore::new());
    store.reject_writes(true);
    let mut session = session_on(Storage::from_shared(store.clone()), 8);

    session.start_level(1);
    solve(&mut session);
    session.audio_mut().set_master_volume(0.3);

    assert_eq!(session.progress().total_games_played, 1);
    assert_eq!(session.audio().master_volume(), 0.3);
    assert!(store.is_empty());

    // The next level still plays
    assert_eq!(session.next_level().status, GameStatus::Playing);
}

// =============================================================================
// File store
// =============================================================================

/// Progress and audio settings survive a restart on disk.
#[test]
fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut session = session_on(Storage::new(FileStore::new(dir.path())), 3);
        session.start_level(1);
        solve(&mut session);
        session.audio_mut().mute();
    }

    assert!(dir.path().join(format!("{DEFAULT_PROGRESS_KEY}.json")).exists());
    assert!(dir.path().join(format!("{DEFAULT_AUDIO_SETTINGS_KEY}.json")).exists());

    let session = session_on(Storage::new(FileStore::new(dir.path())), 3);
    assert_eq!(session.progress().total_games_played, 1);
    assert!(session.audio().is_muted());
}

/// A missing directory reads as empty.
#[test]
fn test_file_store_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("nested").join("saves"));

    assert_eq!(store.get("anything").unwrap(), None);
    store.set("anything", "1").unwrap();
    assert_eq!(store.get("anything").unwrap().as_deref(), Some("1"));
}
