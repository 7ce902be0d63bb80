//! Mounted Game Instance
//!
//! Generic state machine every cartridge runs inside:
//! `Uninitialized -> Playing -> Completed`. It resolves initial data at
//! mount, applies interactions through a single reduce step, coalesces
//! state emissions per frame and fires the terminal event exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use super::events::HostSink;
use super::logic::{GameLogic, LevelContext, Reduction};
use super::props::MountProps;
use super::state::{CompletionData, GameResult, GameState, GameStatus};
use super::theme::ThemeTokens;

/// Lifecycle phase of a mounted instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Uninitialized,
    Playing,
    Completed,
}

/// What happened to an interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Game data changed, game continues
    Accepted,
    /// Game data changed and the game ended
    Completed(GameResult),
    /// Passive instance handed the interaction to the host
    Forwarded,
    /// Nothing changed
    Rejected(String),
}

impl InteractionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, InteractionOutcome::Accepted | InteractionOutcome::Completed(_))
    }
}

/// Object-safe view of a mounted instance, as the host drives it
pub trait GameSession: Send {
    fn mount_id(&self) -> Uuid;

    fn game_id(&self) -> &str;

    fn phase(&self) -> Phase;

    fn is_interactive(&self) -> bool;

    /// Offer one user interaction
    fn interact(&mut self, interaction: Value) -> InteractionOutcome;

    /// Close the current rendering frame, flushing at most one state update
    fn end_frame(&mut self);

    /// Current state as the host would persist it
    fn snapshot(&self) -> GameState;

    fn render_text(&self, theme: &ThemeTokens) -> String;
}

/// Generic instance running a `GameLogic`
pub struct MountedGame<L: GameLogic> {
    mount_id: Uuid,
    game_id: String,
    logic: Arc<L>,
    interactive: bool,
    phase: Phase,
    data: Option<L::Data>,
    completion: Option<CompletionData>,
    sink: Box<dyn HostSink>,
    dirty: bool,
    interaction_signalled: bool,
    accepted: u32,
    started_at: DateTime<Utc>,
}

impl<L: GameLogic> MountedGame<L> {
    /// Mount an instance. Initialization happens synchronously, and a pending
    /// interaction is consumed here exactly once.
    pub fn mount(logic: Arc<L>, mut props: MountProps, sink: Box<dyn HostSink>) -> Self {
        let pending = props.pending_interaction.take();
        let mut game = Self {
            mount_id: Uuid::new_v4(),
            game_id: props.game_id.clone(),
            logic,
            interactive: props.interactive,
            phase: Phase::Uninitialized,
            data: None,
            completion: None,
            sink,
            dirty: false,
            interaction_signalled: false,
            accepted: 0,
            started_at: Utc::now(),
        };
        game.initialize(&props);

        let reached = game.data.as_ref().and_then(|data| game.logic.outcome(data));
        if let (Phase::Playing, Some(result)) = (game.phase, reached) {
            log::warn!("[{}] {} mounted on finished game data", game.mount_id, game.game_id);
            game.complete(result);
        }

        if let Some(interaction) = pending {
            if game.interactive {
                log::debug!("[{}] Replaying pending interaction for {}", game.mount_id, game.game_id);
                let outcome = game.interact(interaction);
                log::debug!("[{}] Pending interaction outcome: {:?}", game.mount_id, outcome);
            } else {
                log::debug!("[{}] Passive mount drops pending interaction", game.mount_id);
            }
        }

        game
    }

    fn initialize(&mut self, props: &MountProps) {
        debug_assert_eq!(self.phase, Phase::Uninitialized);
        let context = LevelContext::new(&props.game_id, props.difficulty, props.level_number);

        let restored = props.initial_game_data.as_ref().and_then(|value| match self.logic.restore(value) {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("[{}] Ignoring unusable restored data for {}: {}", self.mount_id, context, e);
                None
            }
        });

        let data = match restored {
            Some(data) => {
                log::debug!("[{}] Mounting {} from restored data", self.mount_id, context);
                data
            }
            None => match props.level_data.as_ref().map(|level| self.logic.from_level(&context, level)) {
                Some(Ok(data)) => {
                    log::debug!("[{}] Mounting {} from level data", self.mount_id, context);
                    data
                }
                Some(Err(e)) => {
                    log::warn!("[{}] Level data for {} is unusable: {}", self.mount_id, context, e);
                    self.logic.placeholder()
                }
                None => self.logic.placeholder(),
            },
        };

        self.data = Some(data);
        self.phase = match props.initial_status {
            GameStatus::Completed => {
                self.completion = props.initial_completion_data.clone();
                Phase::Completed
            }
            GameStatus::Playing => Phase::Playing,
        };
    }

    /// Transition function: the reduction an interaction causes in the current phase
    fn reduce(&self, interaction: &L::Interaction) -> Reduction<L::Data> {
        match (self.phase, self.data.as_ref()) {
            (Phase::Playing, Some(data)) => self.logic.reduce(data, interaction),
            (Phase::Completed, _) => Reduction::Rejected("game already completed".to_string()),
            _ => Reduction::Rejected("game not initialized".to_string()),
        }
    }

    fn encode(&self) -> Value {
        match self.data.as_ref().map(serde_json::to_value) {
            Some(Ok(value)) => value,
            Some(Err(e)) => {
                log::error!("[{}] Failed to serialize game data: {}", self.mount_id, e);
                Value::Null
            }
            None => Value::Null,
        }
    }

    fn signal_interaction(&mut self, interaction: Value) {
        if !self.interaction_signalled {
            self.interaction_signalled = true;
            self.sink.on_interaction(interaction, self.interactive);
        }
    }

    fn complete(&mut self, result: GameResult) {
        self.phase = Phase::Completed;
        let now = Utc::now();
        let moves = self
            .data
            .as_ref()
            .and_then(|data| self.logic.move_count(data))
            .unwrap_or(self.accepted);
        let completion = CompletionData {
            completion_time: (now - self.started_at).num_milliseconds().max(0) as u64,
            result,
            moves,
            completed_at: now,
        };

        let final_game_data = self.encode();
        if self.dirty {
            self.sink.on_state_change(final_game_data.clone());
            self.dirty = false;
        }
        log::info!("[{}] {} completed: {:?} in {} moves", self.mount_id, self.game_id, result, moves);
        self.sink.on_game_end(result, completion.clone(), final_game_data);
        self.completion = Some(completion);
    }
}

impl<L: GameLogic> GameSession for MountedGame<L> {
    fn mount_id(&self) -> Uuid {
        self.mount_id
    }

    fn game_id(&self) -> &str {
        &self.game_id
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn interact(&mut self, interaction: Value) -> InteractionOutcome {
        if self.phase == Phase::Completed {
            log::warn!("[{}] Interaction after completion ignored", self.mount_id);
            return InteractionOutcome::Rejected("game already completed".to_string());
        }

        if !self.interactive {
            self.signal_interaction(interaction);
            return InteractionOutcome::Forwarded;
        }

        let decoded: L::Interaction = match serde_json::from_value(interaction.clone()) {
            Ok(decoded) => decoded,
            Err(e) => {
                log::warn!("[{}] Malformed interaction {}: {}", self.mount_id, interaction, e);
                return InteractionOutcome::Rejected(format!("malformed interaction: {}", e));
            }
        };

        let (data, finished) = match self.reduce(&decoded) {
            Reduction::Rejected(reason) => {
                log::debug!("[{}] Interaction rejected: {}", self.mount_id, reason);
                return InteractionOutcome::Rejected(reason);
            }
            Reduction::Continue(data) => (data, None),
            Reduction::Finished(data, result) => (data, Some(result)),
        };

        self.data = Some(data);
        self.dirty = true;
        self.accepted += 1;
        self.signal_interaction(interaction);

        match finished {
            Some(result) => {
                self.complete(result);
                InteractionOutcome::Completed(result)
            }
            None => InteractionOutcome::Accepted,
        }
    }

    fn end_frame(&mut self) {
        self.interaction_signalled = false;
        if self.phase == Phase::Playing && self.dirty {
            let game_data = self.encode();
            self.sink.on_state_change(game_data);
            self.dirty = false;
        }
    }

    fn snapshot(&self) -> GameState {
        let game_data = self.encode();
        match (self.phase, self.completion.clone()) {
            (Phase::Completed, Some(completion)) => GameState::completed(game_data, completion),
            (Phase::Completed, None) => GameState {
                status: GameStatus::Completed,
                game_data,
                completion_data: None,
            },
            _ => GameState::playing(game_data),
        }
    }

    fn render_text(&self, theme: &ThemeTokens) -> String {
        match self.data.as_ref() {
            Some(data) => self.logic.render_text(data, theme),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::events::HostEvent;
    use crate::plugin::error::PluginResult;
    use crate::plugin::levels::LevelPayload;
    use crate::plugin::manifest::Difficulty;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Mutex;

    /// Counter game: reach the target by adding steps
    struct CounterLogic;

    #[derive(Deserialize)]
    struct Step {
        add: i64,
    }

    #[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
    struct Counter {
        value: i64,
        target: i64,
    }

    impl GameLogic for CounterLogic {
        type Data = Counter;
        type Interaction = Step;

        fn from_level(&self, _context: &LevelContext<'_>, level: &LevelPayload) -> PluginResult<Counter> {
            let target = level.layout.trim().parse().map_err(|_| {
                crate::plugin::error::PluginError::invalid_game_data("target is not a number")
            })?;
            Ok(Counter { value: 0, target })
        }

        fn placeholder(&self) -> Counter {
            Counter { value: 0, target: 0 }
        }

        fn reduce(&self, data: &Counter, step: &Step) -> Reduction<Counter> {
            if step.add == 0 {
                return Reduction::Rejected("no-op step".into());
            }
            let next = Counter { value: data.value + step.add, target: data.target };
            if next.value == next.target {
                Reduction::Finished(next, GameResult::Won)
            } else if next.value > next.target {
                Reduction::Finished(next, GameResult::Lost)
            } else {
                Reduction::Continue(next)
            }
        }

        fn outcome(&self, data: &Counter) -> Option<GameResult> {
            (data.target > 0 && data.value == data.target).then_some(GameResult::Won)
        }

        fn render_text(&self, data: &Counter, _theme: &ThemeTokens) -> String {
            format!("{}/{}", data.value, data.target)
        }
    }

    /// Sink sharing its log with the test
    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<HostEvent>>>);

    impl HostSink for SharedSink {
        fn deliver(&mut self, event: HostEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    impl SharedSink {
        fn events(&self) -> Vec<HostEvent> {
            self.0.lock().unwrap().clone()
        }
    }

    fn mount(props: MountProps) -> (MountedGame<CounterLogic>, SharedSink) {
        let sink = SharedSink::default();
        let game = MountedGame::mount(Arc::new(CounterLogic), props, Box::new(sink.clone()));
        (game, sink)
    }

    fn counter_props(target: i64) -> MountProps {
        MountProps::new("counter", Difficulty::Easy, 1).with_level(LevelPayload::new(target.to_string()))
    }

    #[test]
    fn test_mount_precedence() {
        let (game, _) = mount(counter_props(5));
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.snapshot().game_data, json!({"value": 0, "target": 5}));

        let restored = counter_props(5).with_restored_state(GameState::playing(json!({"value": 3, "target": 9})));
        let (game, _) = mount(restored);
        assert_eq!(game.snapshot().game_data, json!({"value": 3, "target": 9}));

        let (game, _) = mount(MountProps::new("counter", Difficulty::Easy, 1));
        assert_eq!(game.snapshot().game_data, json!({"value": 0, "target": 0}));
    }

    #[test]
    fn test_playing_state_already_won_completes_at_mount() {
        let props = counter_props(3).with_restored_state(GameState::playing(json!({"value": 3, "target": 3})));
        let (mut game, sink) = mount(props);

        assert_eq!(game.phase(), Phase::Completed);
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_game_end());
        assert!(game.snapshot().is_completed());

        assert!(matches!(game.interact(json!({"add": 1})), InteractionOutcome::Rejected(_)));
        game.end_frame();
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn test_unusable_restored_data_falls_back_to_level() {
        let props = counter_props(4).with_restored_state(GameState::playing(json!("garbage")));
        let (game, _) = mount(props);
        assert_eq!(game.snapshot().game_data, json!({"value": 0, "target": 4}));
    }

    #[test]
    fn test_updates_coalesce_per_frame() {
        let (mut game, sink) = mount(counter_props(10));
        assert_eq!(game.interact(json!({"add": 1})), InteractionOutcome::Accepted);
        assert_eq!(game.interact(json!({"add": 2})), InteractionOutcome::Accepted);
        game.end_frame();
        game.end_frame();

        let updates: Vec<_> = sink.events().into_iter().filter(HostEvent::is_state_change).collect();
        assert_eq!(updates, vec![HostEvent::StateChange { game_data: json!({"value": 3, "target": 10}) }]);
    }

    #[test]
    fn test_interaction_signal_once_per_frame() {
        let (mut game, sink) = mount(counter_props(10));
        game.interact(json!({"add": 1}));
        game.interact(json!({"add": 1}));
        game.end_frame();
        game.interact(json!({"add": 1}));

        let signals = sink
            .events()
            .into_iter()
            .filter(|event| matches!(event, HostEvent::Interaction { .. }))
            .count();
        assert_eq!(signals, 2);
    }

    #[test]
    fn test_game_end_fires_once_and_silences_updates() {
        let (mut game, sink) = mount(counter_props(2));
        game.interact(json!({"add": 1}));
        assert_eq!(game.interact(json!({"add": 1})), InteractionOutcome::Completed(GameResult::Won));
        assert_eq!(game.phase(), Phase::Completed);

        for _ in 0..5 {
            assert!(!game.interact(json!({"add": 1})).is_accepted());
            game.end_frame();
        }

        let events = sink.events();
        assert_eq!(events.iter().filter(|e| e.is_game_end()).count(), 1);
        // The pending update is flushed right before the terminal event
        let end_index = events.iter().position(HostEvent::is_game_end).unwrap();
        assert_eq!(end_index, events.len() - 1);
        assert!(events[end_index - 1].is_state_change());
        match &events[end_index] {
            HostEvent::GameEnd { result, completion_data, final_game_data } => {
                assert_eq!(*result, GameResult::Won);
                assert_eq!(completion_data.moves, 2);
                assert_eq!(*final_game_data, json!({"value": 2, "target": 2}));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(game.snapshot().is_completed());
    }

    #[test]
    fn test_losing_terminal_state() {
        let (mut game, sink) = mount(counter_props(1));
        assert_eq!(game.interact(json!({"add": 5})), InteractionOutcome::Completed(GameResult::Lost));
        assert!(matches!(sink.events().last(), Some(HostEvent::GameEnd { result: GameResult::Lost, .. })));
    }

    #[test]
    fn test_rejected_interactions_change_nothing() {
        let (mut game, sink) = mount(counter_props(3));
        assert!(matches!(game.interact(json!({"add": 0})), InteractionOutcome::Rejected(_)));
        assert!(matches!(game.interact(json!({"subtract": 1})), InteractionOutcome::Rejected(_)));
        game.end_frame();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_passive_instance_forwards_without_mutating() {
        let (mut game, sink) = mount(counter_props(3).with_interactive(false));
        assert_eq!(game.interact(json!({"add": 1})), InteractionOutcome::Forwarded);
        game.end_frame();
        assert_eq!(game.snapshot().game_data, json!({"value": 0, "target": 3}));
        assert_eq!(
            sink.events(),
            vec![HostEvent::Interaction { interaction: json!({"add": 1}), interactive: false }]
        );
    }

    #[test]
    fn test_pending_interaction_replayed_once_on_mount() {
        let props = counter_props(3).with_pending_interaction(json!({"add": 1}));
        let (mut game, sink) = mount(props);
        assert_eq!(game.snapshot().game_data, json!({"value": 1, "target": 3}));
        game.end_frame();
        game.end_frame();
        let updates = sink.events().into_iter().filter(HostEvent::is_state_change).count();
        assert_eq!(updates, 1);
    }

    #[test]
    fn test_restored_completed_state_is_absorbing() {
        let completion = CompletionData {
            completion_time: 10,
            result: GameResult::Won,
            moves: 1,
            completed_at: Utc::now(),
        };
        let state = GameState::completed(json!({"value": 3, "target": 3}), completion.clone());
        let (mut game, sink) = mount(counter_props(3).with_restored_state(state));
        assert_eq!(game.phase(), Phase::Completed);
        assert!(!game.interact(json!({"add": 1})).is_accepted());
        game.end_frame();
        assert!(sink.events().is_empty());
        assert_eq!(game.snapshot().completion_data, Some(completion));
    }

    #[test]
    fn test_render_text_uses_logic() {
        let (game, _) = mount(counter_props(7));
        assert_eq!(game.render_text(&ThemeTokens::default()), "0/7");
    }
}
