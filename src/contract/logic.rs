//! Game Logic Seam
//!
//! What a cartridge supplies so the generic instance can run it: how to
//! build game data from a level, how to restore it and how one interaction
//! changes it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::state::GameResult;
use super::theme::ThemeTokens;
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::levels::LevelPayload;
use crate::plugin::manifest::Difficulty;

/// Identifies the level an instance is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelContext<'a> {
    pub game_id: &'a str,
    pub difficulty: Difficulty,
    pub level_number: u32,
}

impl<'a> LevelContext<'a> {
    pub fn new(game_id: &'a str, difficulty: Difficulty, level_number: u32) -> Self {
        Self { game_id, difficulty, level_number }
    }
}

impl fmt::Display for LevelContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.game_id, self.difficulty, self.level_number)
    }
}

/// Result of applying one interaction to game data
#[derive(Debug, Clone, PartialEq)]
pub enum Reduction<D> {
    /// Interaction had no effect; the reason is logged
    Rejected(String),
    /// New data, game continues
    Continue(D),
    /// New data, game reached a terminal state
    Finished(D, GameResult),
}

/// Game-specific logic behind the black-box contract.
///
/// Implementations must be deterministic: the same data and interaction
/// always reduce to the same result.
pub trait GameLogic: Send + Sync + 'static {
    /// Serializable game data the host persists
    type Data: Serialize + DeserializeOwned + Clone + Send;

    /// Interaction payload decoded from the host's JSON
    type Interaction: DeserializeOwned;

    /// Build fresh game data for a level
    fn from_level(&self, context: &LevelContext<'_>, level: &LevelPayload) -> PluginResult<Self::Data>;

    /// Data shown when neither restored nor level data is available
    fn placeholder(&self) -> Self::Data;

    /// Decode persisted game data
    fn restore(&self, game_data: &Value) -> PluginResult<Self::Data> {
        serde_json::from_value(game_data.clone())
            .map_err(|e| PluginError::invalid_game_data(format!("Failed to decode game data: {}", e)))
    }

    /// Apply one interaction
    fn reduce(&self, data: &Self::Data, interaction: &Self::Interaction) -> Reduction<Self::Data>;

    /// Terminal result already reached by this data, if any.
    ///
    /// A mount that lands on terminal data while playing completes at once.
    fn outcome(&self, _data: &Self::Data) -> Option<GameResult> {
        None
    }

    /// Moves recorded in the data itself, if the game tracks them
    fn move_count(&self, _data: &Self::Data) -> Option<u32> {
        None
    }

    /// Plain-text rendering for terminals and logs
    fn render_text(&self, data: &Self::Data, theme: &ThemeTokens) -> String;
}
