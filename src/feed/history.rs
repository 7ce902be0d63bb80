//! Consumption History
//!
//! What the feed has served so far and how each item ended. The algorithm
//! reads it for repetition avoidance and difficulty promotion.

use serde::{Deserialize, Serialize};

use crate::contract::GameResult;
use crate::plugin::Difficulty;

/// One served feed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub game_id: String,
    pub difficulty: Difficulty,
    pub level_number: u32,
    /// Set once the item's game ended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<GameResult>,
}

impl HistoryEntry {
    pub fn served<S: Into<String>>(game_id: S, difficulty: Difficulty, level_number: u32) -> Self {
        Self { game_id: game_id.into(), difficulty, level_number, result: None }
    }

    pub fn with_result(mut self, result: GameResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn is_win(&self) -> bool {
        self.result == Some(GameResult::Won)
    }
}

/// Ordered feed history, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedHistory {
    entries: Vec<HistoryEntry>,
}

impl FeedHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Record the result of the most recent open entry for a level.
    ///
    /// Returns false if no entry is waiting for a result; the result is then
    /// appended as a new entry.
    pub fn record_result(&mut self, game_id: &str, difficulty: Difficulty, level_number: u32, result: GameResult) -> bool {
        let open = self.entries.iter_mut().rev().find(|entry| {
            entry.result.is_none()
                && entry.game_id == game_id
                && entry.difficulty == difficulty
                && entry.level_number == level_number
        });
        match open {
            Some(entry) => {
                entry.result = Some(result);
                true
            }
            None => {
                self.entries.push(HistoryEntry::served(game_id, difficulty, level_number).with_result(result));
                false
            }
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Game ids of the last `window` entries, most recent first
    pub fn recent_ids(&self, window: usize) -> Vec<&str> {
        self.entries.iter().rev().take(window).map(|entry| entry.game_id.as_str()).collect()
    }

    /// Won items of a game at one difficulty
    pub fn wins(&self, game_id: &str, difficulty: Difficulty) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.game_id == game_id && entry.difficulty == difficulty && entry.is_win())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_ids_most_recent_first() {
        let mut history = FeedHistory::new();
        history.push(HistoryEntry::served("a", Difficulty::Easy, 1));
        history.push(HistoryEntry::served("b", Difficulty::Easy, 1));
        history.push(HistoryEntry::served("c", Difficulty::Easy, 1));

        assert_eq!(history.recent_ids(2), vec!["c", "b"]);
        assert_eq!(history.recent_ids(10).len(), 3);
        assert!(FeedHistory::new().recent_ids(2).is_empty());
    }

    #[test]
    fn test_only_wins_count() {
        let mut history = FeedHistory::new();
        history.push(HistoryEntry::served("a", Difficulty::Easy, 1).with_result(GameResult::Won));
        history.push(HistoryEntry::served("a", Difficulty::Easy, 2).with_result(GameResult::Lost));
        history.push(HistoryEntry::served("a", Difficulty::Easy, 2));
        history.push(HistoryEntry::served("a", Difficulty::Medium, 1).with_result(GameResult::Won));

        assert_eq!(history.wins("a", Difficulty::Easy), 1);
        assert_eq!(history.wins("a", Difficulty::Medium), 1);
        assert_eq!(history.wins("b", Difficulty::Easy), 0);
    }

    #[test]
    fn test_record_result_closes_open_entry() {
        let mut history = FeedHistory::new();
        history.push(HistoryEntry::served("a", Difficulty::Easy, 1));
        history.push(HistoryEntry::served("b", Difficulty::Easy, 1));

        assert!(history.record_result("a", Difficulty::Easy, 1, GameResult::Won));
        assert_eq!(history.len(), 2);
        assert!(history.entries()[0].is_win());

        assert!(!history.record_result("a", Difficulty::Easy, 1, GameResult::Won));
        assert_eq!(history.len(), 3);
        assert_eq!(history.wins("a", Difficulty::Easy), 2);
    }

    #[test]
    fn test_history_serialization() {
        let mut history = FeedHistory::new();
        history.push(HistoryEntry::served("pipes", Difficulty::Hard, 3).with_result(GameResult::Won));
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json["entries"][0]["gameId"], "pipes");
        assert_eq!(json["entries"][0]["levelNumber"], 3);
        assert_eq!(json["entries"][0]["result"], "won");
    }
}
