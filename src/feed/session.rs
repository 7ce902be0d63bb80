//! Feed Session
//!
//! Host side of the control flow. The session asks the algorithm for the
//! next item, mounts it through the item's component, drains the instance's
//! events into the state store and records results in the history.

use crossbeam_channel::{unbounded, Receiver};
use serde_json::Value;
use std::collections::HashMap;

use super::algorithm::{FeedAlgorithm, FeedItem};
use super::error::{FeedError, FeedResult};
use super::history::{FeedHistory, HistoryEntry};
use super::store::StateStore;
use crate::contract::{GameResult, GameSession, GameState, HostEvent, InteractionOutcome, MountProps, ThemeTokens};
use crate::plugin::Registry;

/// Mounted instance with the receiving end of its event channel
struct Mount {
    session: Box<dyn GameSession>,
    events: Receiver<HostEvent>,
}

/// Drives a feed over a registry and a state store
pub struct FeedSession<'r, S: StateStore> {
    registry: &'r Registry,
    algorithm: FeedAlgorithm,
    history: FeedHistory,
    store: S,
    current: Option<FeedItem>,
    mount: Option<Mount>,
    /// Interactions captured by passive previews, keyed by item id
    pending: HashMap<String, Value>,
    last_result: Option<GameResult>,
}

impl<'r, S: StateStore> FeedSession<'r, S> {
    pub fn new(registry: &'r Registry, algorithm: FeedAlgorithm, store: S) -> Self {
        Self {
            registry,
            algorithm,
            history: FeedHistory::new(),
            store,
            current: None,
            mount: None,
            pending: HashMap::new(),
            last_result: None,
        }
    }

    pub fn with_history(mut self, history: FeedHistory) -> Self {
        self.history = history;
        self
    }

    /// Unmount the current item and move to the next one
    pub fn advance(&mut self) -> FeedResult<&FeedItem> {
        self.unmount();
        let item = self.algorithm.next(&self.history, self.registry, &self.store)?;
        log::info!("Serving {}", item.id);
        // A replayed level starts over instead of reopening the finished board
        if self.store.load(&item.id).is_some_and(|state| state.is_completed()) {
            log::debug!("Dropping completed state of {}", item.id);
            self.store.remove(&item.id);
        }
        self.history
            .push(HistoryEntry::served(&item.game_id, item.level.difficulty, item.level.level_number));
        self.last_result = None;
        Ok(self.current.insert(item))
    }

    /// Mount the current item, replacing any mounted instance.
    ///
    /// Interactive mounts restore the latest stored state and consume an
    /// interaction a passive preview captured for the same item.
    pub fn mount_current(&mut self, interactive: bool) -> FeedResult<&mut dyn GameSession> {
        self.unmount();
        let item = self.current.as_ref().ok_or(FeedError::NoCurrentItem)?;
        let descriptor = self.registry.get(&item.game_id)?;

        let mut props = MountProps::new(&item.game_id, item.level.difficulty, item.level.level_number)
            .with_interactive(interactive)
            .with_level(item.level.payload.clone());
        if let Some(state) = self.store.load(&item.id).or_else(|| item.game_state.clone()) {
            props = props.with_restored_state(state);
        }
        if interactive {
            if let Some(interaction) = self.pending.remove(&item.id) {
                props = props.with_pending_interaction(interaction);
            }
        }

        let (sender, events) = unbounded();
        let session = descriptor.component.mount(props, Box::new(sender));
        log::debug!(
            "[{}] Mounted {} ({})",
            session.mount_id(),
            item.id,
            if interactive { "interactive" } else { "passive" }
        );

        let mount = self.mount.insert(Mount { session, events });
        Ok(mount.session.as_mut())
    }

    /// Offer an interaction to the mounted instance
    pub fn interact(&mut self, interaction: Value) -> FeedResult<InteractionOutcome> {
        let mount = self.mount.as_mut().ok_or(FeedError::NoCurrentItem)?;
        Ok(mount.session.interact(interaction))
    }

    /// Close a rendering frame and absorb everything the instance emitted
    pub fn end_frame(&mut self) -> Vec<HostEvent> {
        if let Some(mount) = self.mount.as_mut() {
            mount.session.end_frame();
        }
        self.pump()
    }

    /// Drain pending host events into the store and history
    pub fn pump(&mut self) -> Vec<HostEvent> {
        let (Some(mount), Some(item)) = (self.mount.as_ref(), self.current.as_ref()) else {
            return Vec::new();
        };

        let events: Vec<HostEvent> = mount.events.try_iter().collect();
        for event in &events {
            match event {
                HostEvent::StateChange { game_data } => {
                    self.store.save(&item.id, GameState::playing(game_data.clone()));
                }
                HostEvent::Interaction { interaction, interactive: false } => {
                    log::debug!("Passive preview of {} captured an interaction", item.id);
                    self.pending.insert(item.id.clone(), interaction.clone());
                }
                HostEvent::Interaction { .. } => {}
                HostEvent::GameEnd { result, completion_data, final_game_data } => {
                    self.store
                        .save(&item.id, GameState::completed(final_game_data.clone(), completion_data.clone()));
                    self.history.record_result(&item.game_id, item.level.difficulty, item.level.level_number, *result);
                    self.last_result = Some(*result);
                    log::info!("{} ended: {:?} in {} moves", item.id, result, completion_data.moves);
                }
            }
        }
        events
    }

    fn unmount(&mut self) {
        if self.mount.is_some() {
            self.pump();
        }
        self.mount = None;
    }

    pub fn current(&self) -> Option<&FeedItem> {
        self.current.as_ref()
    }

    pub fn session(&self) -> Option<&dyn GameSession> {
        self.mount.as_ref().map(|mount| mount.session.as_ref())
    }

    /// Result of the current item, once its game ended
    pub fn last_result(&self) -> Option<GameResult> {
        self.last_result
    }

    pub fn pending_interaction(&self, item_id: &str) -> Option<&Value> {
        self.pending.get(item_id)
    }

    pub fn render_text(&self, theme: &ThemeTokens) -> Option<String> {
        self.session().map(|session| session.render_text(theme))
    }

    pub fn history(&self) -> &FeedHistory {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
