//! Game State Store
//!
//! Durable home of emitted game states, keyed by feed item id. Only the
//! in-memory store ships with the crate; real hosts plug their own storage
//! in behind the trait.

use std::collections::HashMap;

use crate::contract::GameState;

/// Persistence for game states
pub trait StateStore: Send {
    fn load(&self, item_id: &str) -> Option<GameState>;

    fn save(&mut self, item_id: &str, state: GameState);

    fn remove(&mut self, item_id: &str) -> Option<GameState>;
}

/// State store held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    states: HashMap<String, GameState>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, item_id: &str) -> Option<GameState> {
        self.states.get(item_id).cloned()
    }

    fn save(&mut self, item_id: &str, state: GameState) {
        self.states.insert(item_id.to_string(), state);
    }

    fn remove(&mut self, item_id: &str) -> Option<GameState> {
        self.states.remove(item_id)
    }
}
