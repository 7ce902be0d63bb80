//! Core Plugin Traits
//!
//! The closed capability set a cartridge offers the host: a component handle
//! that mounts instances, a manifest and a level loader.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::error::{PluginError, PluginResult};
use super::levels::{LevelLoader, LevelPayload};
use super::manifest::{Difficulty, Manifest};
use crate::contract::{GameSession, HostSink, LevelContext, MountProps};

/// Component handle a plugin exports
pub trait GameComponent: Send + Sync {
    /// Entry point name manifests refer to
    fn entry(&self) -> &str;

    /// Check that a level can be played; called at scan time
    fn validate_level(&self, context: &LevelContext<'_>, level: &LevelPayload) -> PluginResult<()>;

    /// Mount a new instance with its props and host callbacks
    fn mount(&self, props: MountProps, sink: Box<dyn HostSink>) -> Box<dyn GameSession>;
}

/// Compiled-in components available to the scanner, keyed by entry point
#[derive(Clone, Default)]
pub struct ComponentCatalog {
    components: HashMap<String, Arc<dyn GameComponent>>,
}

impl ComponentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Export a component under its entry name
    pub fn with_component<C: GameComponent + 'static>(mut self, component: C) -> Self {
        self.components.insert(component.entry().to_string(), Arc::new(component));
        self
    }

    /// Resolve the component for a manifest entry point
    pub fn resolve(&self, entry: &str) -> PluginResult<Arc<dyn GameComponent>> {
        self.components
            .get(entry)
            .cloned()
            .ok_or_else(|| PluginError::component_missing(entry))
    }

    pub fn entries(&self) -> Vec<&str> {
        let mut entries: Vec<&str> = self.components.keys().map(String::as_str).collect();
        entries.sort_unstable();
        entries
    }
}

impl fmt::Debug for ComponentCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentCatalog").field("entries", &self.entries()).finish()
    }
}

/// Everything the host knows about one registered game
#[derive(Clone)]
pub struct GameDescriptor {
    pub id: String,
    pub component: Arc<dyn GameComponent>,
    pub manifest: Manifest,
    pub level_loader: Arc<dyn LevelLoader>,
    /// Folder the plugin was scanned from, if any
    pub folder: Option<PathBuf>,
}

impl GameDescriptor {
    pub fn new(manifest: Manifest, component: Arc<dyn GameComponent>, level_loader: Arc<dyn LevelLoader>) -> Self {
        Self { id: manifest.id.clone(), component, manifest, level_loader, folder: None }
    }

    pub fn with_folder(mut self, folder: PathBuf) -> Self {
        self.folder = Some(folder);
        self
    }

    /// Declared difficulties that have at least one playable level
    pub fn playable_difficulties(&self) -> Vec<Difficulty> {
        self.manifest
            .difficulty_levels
            .iter()
            .copied()
            .filter(|difficulty| self.level_loader.level_count(*difficulty) > 0)
            .collect()
    }

    pub fn total_levels(&self) -> usize {
        self.manifest
            .difficulty_levels
            .iter()
            .map(|difficulty| self.level_loader.level_count(*difficulty))
            .sum()
    }
}

impl fmt::Debug for GameDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameDescriptor")
            .field("id", &self.id)
            .field("entry", &self.component.entry())
            .field("manifest", &self.manifest)
            .field("folder", &self.folder)
            .finish()
    }
}
