//! Feed selection and sessions over the bundled pipe games

use serde_json::json;
use std::path::PathBuf;

use puzzlefeed::contract::{GameResult, GameStatus, InteractionOutcome, Phase};
use puzzlefeed::feed::{
    FeedAlgorithm, FeedConfig, FeedHistory, FeedSession, HistoryEntry, MemoryStateStore, StateStore,
};
use puzzlefeed::plugin::{builtin, scan, Difficulty, Registry};

fn registry() -> Registry {
    let games_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("games");
    let mut registry = Registry::new();
    let diagnostics = registry.register_all(scan(games_dir, builtin::builtin_components()).unwrap());
    assert!(diagnostics.is_empty());
    registry
}

fn seeded(seed: u64) -> FeedConfig {
    FeedConfig { seed: Some(seed), ..FeedConfig::default() }
}

#[test]
fn test_recently_served_game_is_avoided() {
    let registry = registry();
    let history = FeedHistory::from_entries(vec![
        HistoryEntry::served("pipes", Difficulty::Easy, 1),
        HistoryEntry::served("pipes", Difficulty::Easy, 1),
    ]);
    let store = MemoryStateStore::new();

    for seed in 0..32 {
        let mut algorithm = FeedAlgorithm::new(seeded(seed));
        let item = algorithm.next(&history, &registry, &store).unwrap();
        assert_eq!(item.game_id, "aqueduct", "seed {} repeated the last game", seed);
        assert_eq!(item.level.difficulty, Difficulty::Medium);
    }
}

#[test]
fn test_same_seed_plans_same_feed() {
    let registry = registry();
    let plan = |seed| {
        let mut feed = FeedSession::new(&registry, FeedAlgorithm::new(seeded(seed)), MemoryStateStore::new());
        (0..6).map(|_| feed.advance().unwrap().id.clone()).collect::<Vec<_>>()
    };

    assert_eq!(plan(21), plan(21));
}

#[test]
fn test_solving_a_level_persists_and_records_the_win() {
    let registry = registry();
    let history = FeedHistory::from_entries(vec![HistoryEntry::served("aqueduct", Difficulty::Medium, 1)]);
    let mut feed = FeedSession::new(&registry, FeedAlgorithm::new(seeded(4)), MemoryStateStore::new())
        .with_history(history);

    // aqueduct was served last, so the window leaves pipes easy/1: a single straight pipe
    let item_id = feed.advance().unwrap().id.clone();
    assert_eq!(item_id, "pipes/easy/1");

    let game = feed.mount_current(true).unwrap();
    assert_eq!(game.phase(), Phase::Playing);

    let mut outcome = InteractionOutcome::Accepted;
    for _ in 0..4 {
        outcome = feed.interact(json!({"row": 0, "col": 0})).unwrap();
        feed.end_frame();
        if outcome != InteractionOutcome::Accepted {
            break;
        }
    }
    assert_eq!(outcome, InteractionOutcome::Completed(GameResult::Won));
    assert_eq!(feed.last_result(), Some(GameResult::Won));

    let stored = feed.store().load(&item_id).unwrap();
    assert_eq!(stored.status, GameStatus::Completed);
    assert_eq!(stored.game_data["isWon"], json!(true));
    assert_eq!(feed.history().wins("pipes", Difficulty::Easy), 1);

    // A remount shows the solved grid and ignores further taps
    feed.mount_current(true).unwrap();
    assert!(matches!(feed.interact(json!({"row": 0, "col": 0})).unwrap(), InteractionOutcome::Rejected(_)));
    assert!(feed.end_frame().is_empty());
}

#[test]
fn test_progress_survives_a_remount() {
    let registry = registry();
    let history = FeedHistory::from_entries(vec![HistoryEntry::served("pipes", Difficulty::Easy, 1)]);
    let mut feed = FeedSession::new(&registry, FeedAlgorithm::new(seeded(8)), MemoryStateStore::new())
        .with_history(history);

    let item_id = feed.advance().unwrap().id.clone();
    assert_eq!(item_id, "aqueduct/medium/1");

    feed.mount_current(true).unwrap();
    // Turning the source corner cuts off the first column, so this cannot win
    let outcome = feed.interact(json!({"row": 0, "col": 0})).unwrap();
    assert_eq!(outcome, InteractionOutcome::Accepted);
    feed.end_frame();

    let saved = feed.store().load(&item_id).unwrap();
    assert_eq!(saved.status, GameStatus::Playing);
    assert_eq!(saved.game_data["moves"], json!(1));

    let remounted = feed.mount_current(false).unwrap();
    assert_eq!(remounted.snapshot().game_data, saved.game_data);
}
