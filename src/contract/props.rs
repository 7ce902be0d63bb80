//! Mount Props
//!
//! Input side of the black-box contract. An instance sees exactly these
//! values plus the `HostSink` callbacks; nothing else may influence it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::state::{CompletionData, GameState, GameStatus};
use crate::plugin::levels::LevelPayload;
use crate::plugin::manifest::Difficulty;

/// Values handed to a game instance once, at mount time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountProps {
    /// Passive previews render but never mutate their game data
    pub interactive: bool,
    pub game_id: String,
    pub initial_status: GameStatus,
    /// Restored progress; takes precedence over `level_data`
    pub initial_game_data: Option<Value>,
    pub initial_completion_data: Option<CompletionData>,
    pub level_data: Option<LevelPayload>,
    pub difficulty: Difficulty,
    pub level_number: u32,
    /// Interaction from a passive instance to replay once on mount
    pub pending_interaction: Option<Value>,
}

impl MountProps {
    /// Props for a fresh interactive mount
    pub fn new<S: Into<String>>(game_id: S, difficulty: Difficulty, level_number: u32) -> Self {
        Self {
            interactive: true,
            game_id: game_id.into(),
            initial_status: GameStatus::Playing,
            initial_game_data: None,
            initial_completion_data: None,
            level_data: None,
            difficulty,
            level_number,
            pending_interaction: None,
        }
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_level(mut self, level: LevelPayload) -> Self {
        self.level_data = Some(level);
        self
    }

    /// Restore a previously persisted state
    pub fn with_restored_state(mut self, state: GameState) -> Self {
        self.initial_status = state.status;
        self.initial_game_data = Some(state.game_data);
        self.initial_completion_data = state.completion_data;
        self
    }

    pub fn with_pending_interaction(mut self, interaction: Value) -> Self {
        self.pending_interaction = Some(interaction);
        self
    }
}
