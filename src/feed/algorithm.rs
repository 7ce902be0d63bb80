//! Feed Algorithm
//!
//! Picks the next item of the content stream from the registry and the
//! consumption history:
//!
//! 1. games without a playable level are never candidates;
//! 2. games served within the repeat window are avoided, relaxing to "not the
//!    last one" and then to "anything" when that empties the set;
//! 3. each game serves the first declared difficulty the player has not won
//!    often enough yet;
//! 4. the final pick among candidates is uniform random.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::error::{FeedError, FeedResult};
use super::history::FeedHistory;
use super::store::StateStore;
use crate::contract::{GameState, MountProps};
use crate::plugin::{Difficulty, GameDescriptor, LevelPayload, Registry};

/// Game with the level it would serve
type Candidate<'a> = (&'a GameDescriptor, Difficulty, u32);

/// Tuning of the feed algorithm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FeedConfig {
    /// History entries whose game ids are avoided
    pub repeat_window: usize,
    /// Wins at a difficulty before the next one is served
    pub promotion_threshold: usize,
    /// Fixed RNG seed for reproducible feeds
    pub seed: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { repeat_window: 2, promotion_threshold: 3, seed: None }
    }
}

/// Level chosen for a feed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDescriptor {
    pub difficulty: Difficulty,
    pub level_number: u32,
    pub payload: LevelPayload,
}

/// One entry of the content stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: String,
    pub game_id: String,
    pub level: LevelDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_state: Option<GameState>,
}

impl FeedItem {
    /// Stable item id of a level
    pub fn item_id(game_id: &str, difficulty: Difficulty, level_number: u32) -> String {
        format!("{}/{}/{}", game_id, difficulty, level_number)
    }

    /// Props to mount this item with
    pub fn mount_props(&self, interactive: bool) -> MountProps {
        let props = MountProps::new(&self.game_id, self.level.difficulty, self.level.level_number)
            .with_interactive(interactive)
            .with_level(self.level.payload.clone());
        match &self.game_state {
            Some(state) => props.with_restored_state(state.clone()),
            None => props,
        }
    }
}

/// Feed selection with its own RNG
#[derive(Debug)]
pub struct FeedAlgorithm {
    config: FeedConfig,
    rng: StdRng,
}

impl FeedAlgorithm {
    pub fn new(config: FeedConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        Self { rng: StdRng::seed_from_u64(seed), config }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Select the next feed item
    pub fn next(&mut self, history: &FeedHistory, registry: &Registry, store: &dyn StateStore) -> FeedResult<FeedItem> {
        if registry.is_empty() {
            return Err(FeedError::NoGamesRegistered);
        }

        let playable: Vec<Candidate<'_>> = registry
            .list()
            .iter()
            .filter_map(|descriptor| {
                self.plan_level(descriptor, history)
                    .map(|(difficulty, level_number)| (descriptor, difficulty, level_number))
            })
            .collect();
        if playable.is_empty() {
            return Err(FeedError::NoPlayableLevels);
        }

        let candidates = self.avoid_repeats(playable, history);
        let (descriptor, difficulty, level_number) = candidates[self.rng.random_range(0..candidates.len())];

        let payload = descriptor.level_loader.load(difficulty, level_number)?;
        let id = FeedItem::item_id(&descriptor.id, difficulty, level_number);
        let game_state = store.load(&id).filter(|state| !state.is_completed());

        log::debug!(
            "Feed picked {} from {} candidates{}",
            id,
            candidates.len(),
            if game_state.is_some() { " (restored)" } else { "" }
        );

        Ok(FeedItem {
            id,
            game_id: descriptor.id.clone(),
            level: LevelDescriptor { difficulty, level_number, payload },
            game_state,
        })
    }

    /// Difficulty the player is working on for a game, if any is playable
    pub fn current_tier(&self, descriptor: &GameDescriptor, history: &FeedHistory) -> Option<Difficulty> {
        let playable = descriptor.playable_difficulties();
        playable
            .iter()
            .copied()
            .find(|difficulty| history.wins(&descriptor.id, *difficulty) < self.config.promotion_threshold)
            .or_else(|| playable.last().copied())
    }

    /// Difficulty and level number to serve for a game
    pub fn plan_level(&self, descriptor: &GameDescriptor, history: &FeedHistory) -> Option<(Difficulty, u32)> {
        let difficulty = self.current_tier(descriptor, history)?;
        let levels = descriptor.level_loader.level_numbers(difficulty);
        if levels.is_empty() {
            return None;
        }
        let completed = history.wins(&descriptor.id, difficulty);
        Some((difficulty, levels[completed % levels.len()]))
    }

    fn avoid_repeats<'a>(&self, candidates: Vec<Candidate<'a>>, history: &FeedHistory) -> Vec<Candidate<'a>> {
        let recent = history.recent_ids(self.config.repeat_window);
        let fresh: Vec<_> = candidates
            .iter()
            .copied()
            .filter(|(descriptor, _, _)| !recent.contains(&descriptor.id.as_str()))
            .collect();
        if !fresh.is_empty() {
            return fresh;
        }

        let Some(last) = history.last() else { return candidates };
        let not_last: Vec<_> = candidates
            .iter()
            .copied()
            .filter(|(descriptor, _, _)| descriptor.id != last.game_id)
            .collect();
        if !not_last.is_empty() {
            return not_last;
        }

        candidates
    }
}

impl Default for FeedAlgorithm {
    fn default() -> Self {
        Self::new(FeedConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{CompletionData, GameResult};
    use crate::feed::history::HistoryEntry;
    use crate::feed::store::MemoryStateStore;
    use crate::plugin::tests::mock_components::mock_descriptor;
    use serde_json::json;

    fn registry_of(ids: &[&str]) -> Registry {
        let mut registry = Registry::new();
        for id in ids {
            registry
                .register(id, mock_descriptor(id, &[Difficulty::Easy, Difficulty::Medium], 2))
                .unwrap();
        }
        registry
    }

    fn seeded(seed: u64) -> FeedAlgorithm {
        FeedAlgorithm::new(FeedConfig { seed: Some(seed), ..FeedConfig::default() })
    }

    fn history_of(ids: &[&str]) -> FeedHistory {
        FeedHistory::from_entries(ids.iter().map(|id| HistoryEntry::served(*id, Difficulty::Easy, 1)).collect())
    }

    #[test]
    fn test_empty_registry() {
        let err = FeedAlgorithm::default()
            .next(&FeedHistory::new(), &Registry::new(), &MemoryStateStore::new())
            .unwrap_err();
        assert_eq!(err, FeedError::NoGamesRegistered);
    }

    #[test]
    fn test_registry_without_levels() {
        let mut registry = Registry::new();
        registry.register("bare", mock_descriptor("bare", &[Difficulty::Easy], 0)).unwrap();
        let err = FeedAlgorithm::default()
            .next(&FeedHistory::new(), &registry, &MemoryStateStore::new())
            .unwrap_err();
        assert_eq!(err, FeedError::NoPlayableLevels);
    }

    #[test]
    fn test_two_recent_items_of_a_are_not_followed_by_a() {
        let registry = registry_of(&["a", "b"]);
        let history = history_of(&["b", "a", "a"]);
        for seed in 0..50 {
            let item = seeded(seed).next(&history, &registry, &MemoryStateStore::new()).unwrap();
            assert_eq!(item.game_id, "b", "seed {} served a repeat", seed);
        }
    }

    #[test]
    fn test_window_prefers_unseen_games() {
        let registry = registry_of(&["a", "b", "c"]);
        let history = history_of(&["c", "a", "b"]);
        for seed in 0..20 {
            let item = seeded(seed).next(&history, &registry, &MemoryStateStore::new()).unwrap();
            assert_eq!(item.game_id, "c");
        }
    }

    #[test]
    fn test_fallback_excludes_only_last() {
        let registry = registry_of(&["a", "b"]);
        let history = history_of(&["a", "b"]);
        for seed in 0..20 {
            let item = seeded(seed).next(&history, &registry, &MemoryStateStore::new()).unwrap();
            assert_eq!(item.game_id, "a");
        }
    }

    #[test]
    fn test_single_game_is_still_served() {
        let registry = registry_of(&["solo"]);
        let history = history_of(&["solo", "solo"]);
        let item = seeded(1).next(&history, &registry, &MemoryStateStore::new()).unwrap();
        assert_eq!(item.game_id, "solo");
    }

    #[test]
    fn test_promotion_through_tiers() {
        let registry = registry_of(&["a"]);
        let algorithm = seeded(7);
        let descriptor = registry.get("a").unwrap();
        let mut history = FeedHistory::new();

        assert_eq!(algorithm.plan_level(descriptor, &history), Some((Difficulty::Easy, 1)));

        history.push(HistoryEntry::served("a", Difficulty::Easy, 1).with_result(GameResult::Won));
        assert_eq!(algorithm.plan_level(descriptor, &history), Some((Difficulty::Easy, 2)));

        // Losses never promote
        history.push(HistoryEntry::served("a", Difficulty::Easy, 2).with_result(GameResult::Lost));
        assert_eq!(algorithm.plan_level(descriptor, &history), Some((Difficulty::Easy, 2)));

        history.push(HistoryEntry::served("a", Difficulty::Easy, 2).with_result(GameResult::Won));
        history.push(HistoryEntry::served("a", Difficulty::Easy, 1).with_result(GameResult::Won));
        assert_eq!(algorithm.current_tier(descriptor, &history), Some(Difficulty::Medium));
        assert_eq!(algorithm.plan_level(descriptor, &history), Some((Difficulty::Medium, 1)));

        for level in [1, 2, 1] {
            history.push(HistoryEntry::served("a", Difficulty::Medium, level).with_result(GameResult::Won));
        }
        // Last tier keeps serving, cycling through its levels
        assert_eq!(algorithm.plan_level(descriptor, &history), Some((Difficulty::Medium, 2)));
    }

    #[test]
    fn test_tiers_without_levels_are_skipped() {
        let mut registry = Registry::new();
        let descriptor = mock_descriptor("a", &[Difficulty::Medium], 1);
        let mut manifest = descriptor.manifest.clone();
        manifest.difficulty_levels = vec![Difficulty::Easy, Difficulty::Medium];
        let descriptor = GameDescriptor::new(manifest, descriptor.component, descriptor.level_loader);
        registry.register("a", descriptor).unwrap();

        let item = seeded(3).next(&FeedHistory::new(), &registry, &MemoryStateStore::new()).unwrap();
        assert_eq!(item.level.difficulty, Difficulty::Medium);
        assert_eq!(item.id, "a/medium/1");
    }

    #[test]
    fn test_item_restores_in_progress_state() {
        let registry = registry_of(&["a"]);
        let mut store = MemoryStateStore::new();
        store.save("a/easy/1", GameState::playing(json!({"count": 1, "target": 1})));

        let item = seeded(0).next(&FeedHistory::new(), &registry, &store).unwrap();
        assert_eq!(item.id, "a/easy/1");
        assert_eq!(item.level.payload.layout, "1");
        assert!(item.game_state.is_some());

        let props = item.mount_props(false);
        assert!(!props.interactive);
        assert_eq!(props.initial_game_data, Some(json!({"count": 1, "target": 1})));
    }

    #[test]
    fn test_item_ignores_completed_state() {
        let registry = registry_of(&["a"]);
        let mut store = MemoryStateStore::new();
        let completion = CompletionData {
            completion_time: 1200,
            result: GameResult::Won,
            moves: 1,
            completed_at: chrono::Utc::now(),
        };
        store.save("a/easy/1", GameState::completed(json!({"count": 1, "target": 1}), completion));

        let item = seeded(0).next(&FeedHistory::new(), &registry, &store).unwrap();
        assert!(item.game_state.is_none());
    }

    #[test]
    fn test_seeded_feed_is_reproducible() {
        let registry = registry_of(&["a", "b", "c", "d"]);
        let store = MemoryStateStore::new();
        let picks = |seed| {
            let mut algorithm = seeded(seed);
            let mut history = FeedHistory::new();
            let mut ids = Vec::new();
            for _ in 0..10 {
                let item = algorithm.next(&history, &registry, &store).unwrap();
                history.push(HistoryEntry::served(&item.game_id, item.level.difficulty, item.level.level_number));
                ids.push(item.id);
            }
            ids
        };
        assert_eq!(picks(42), picks(42));
    }
}
