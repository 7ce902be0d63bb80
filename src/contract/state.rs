//! Game State
//!
//! The host-owned, serializable view of a feed item's progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Durable status of a feed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Completed,
}

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Won,
    Lost,
}

/// Details recorded once when a game reaches its terminal state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionData {
    /// Milliseconds between mount and completion
    pub completion_time: u64,
    pub result: GameResult,
    pub moves: u32,
    pub completed_at: DateTime<Utc>,
}

/// Progress of one feed item as the host persists it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub status: GameStatus,
    pub game_data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_data: Option<CompletionData>,
}

impl GameState {
    /// State of a game still in progress
    pub fn playing(game_data: Value) -> Self {
        Self { status: GameStatus::Playing, game_data, completion_data: None }
    }

    /// State of a finished game
    pub fn completed(game_data: Value, completion_data: CompletionData) -> Self {
        Self { status: GameStatus::Completed, game_data, completion_data: Some(completion_data) }
    }

    pub fn is_completed(&self) -> bool {
        self.status == GameStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_game_state_wire_format() {
        let state = GameState::playing(json!({"moves": 2}));
        let encoded = serde_json::to_value(&state).unwrap();
        assert_eq!(encoded, json!({"status": "playing", "gameData": {"moves": 2}}));
    }

    #[test]
    fn test_completed_state_carries_completion_data() {
        let completion = CompletionData {
            completion_time: 1500,
            result: GameResult::Won,
            moves: 7,
            completed_at: Utc::now(),
        };
        let state = GameState::completed(json!({}), completion.clone());
        assert!(state.is_completed());

        let encoded = serde_json::to_string(&state).unwrap();
        assert!(encoded.contains(r#""status":"completed""#));
        assert!(encoded.contains(r#""completionTime":1500"#));
        assert!(encoded.contains(r#""result":"won""#));

        let decoded: GameState = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.completion_data, Some(completion));
    }
}
