//! Host Events
//!
//! Output side of the black-box contract: everything a mounted instance tells
//! its host travels as a `HostEvent` through a `HostSink`.

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::state::{CompletionData, GameResult};

/// Message from a mounted game instance to its host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum HostEvent {
    /// Latest committed game data, at most once per frame
    #[serde(rename_all = "camelCase")]
    StateChange { game_data: Value },

    /// Low-frequency activity signal used by feed previews
    #[serde(rename_all = "camelCase")]
    Interaction { interaction: Value, interactive: bool },

    /// Terminal event, emitted exactly once per mount
    #[serde(rename_all = "camelCase")]
    GameEnd {
        result: GameResult,
        completion_data: CompletionData,
        final_game_data: Value,
    },
}

impl HostEvent {
    pub fn is_state_change(&self) -> bool {
        matches!(self, HostEvent::StateChange { .. })
    }

    pub fn is_game_end(&self) -> bool {
        matches!(self, HostEvent::GameEnd { .. })
    }
}

/// Host callbacks handed to an instance at mount time
pub trait HostSink: Send {
    /// Receive one event from the instance
    fn deliver(&mut self, event: HostEvent);

    fn on_state_change(&mut self, game_data: Value) {
        self.deliver(HostEvent::StateChange { game_data });
    }

    fn on_interaction(&mut self, interaction: Value, interactive: bool) {
        self.deliver(HostEvent::Interaction { interaction, interactive });
    }

    fn on_game_end(&mut self, result: GameResult, completion_data: CompletionData, final_game_data: Value) {
        self.deliver(HostEvent::GameEnd { result, completion_data, final_game_data });
    }
}

/// Recording sink, handy for hosts that poll
impl HostSink for Vec<HostEvent> {
    fn deliver(&mut self, event: HostEvent) {
        self.push(event);
    }
}

/// Channel sink for hosts that consume events from a queue
impl HostSink for Sender<HostEvent> {
    fn deliver(&mut self, event: HostEvent) {
        if let Err(e) = self.send(event) {
            log::warn!("Host event dropped, receiver is gone: {:?}", e.0);
        }
    }
}
