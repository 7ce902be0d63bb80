//! Logic-backed component handle

use std::sync::Arc;

use super::events::HostSink;
use super::instance::{GameSession, MountedGame};
use super::logic::{GameLogic, LevelContext};
use super::props::MountProps;
use crate::plugin::error::PluginResult;
use crate::plugin::levels::LevelPayload;
use crate::plugin::traits::GameComponent;

/// Component handle that mounts `MountedGame` instances for a `GameLogic`
pub struct LogicComponent<L: GameLogic> {
    entry: String,
    logic: Arc<L>,
}

impl<L: GameLogic> LogicComponent<L> {
    pub fn new<S: Into<String>>(entry: S, logic: L) -> Self {
        Self { entry: entry.into(), logic: Arc::new(logic) }
    }

    pub fn logic(&self) -> &L {
        &self.logic
    }
}

impl<L: GameLogic> GameComponent for LogicComponent<L> {
    fn entry(&self) -> &str {
        &self.entry
    }

    fn validate_level(&self, context: &LevelContext<'_>, level: &LevelPayload) -> PluginResult<()> {
        self.logic.from_level(context, level).map(|_| ())
    }

    fn mount(&self, props: MountProps, sink: Box<dyn HostSink>) -> Box<dyn GameSession> {
        Box::new(MountedGame::mount(Arc::clone(&self.logic), props, sink))
    }
}
