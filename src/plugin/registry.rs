//! Game Registry
//!
//! Catalog of registered games in registration order. The process-wide
//! instance is installed once at startup, after the scan and before any
//! feed query.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::discovery::{DiagnosticLevel, ScanDiagnostic, ScanReport};
use super::error::{PluginError, PluginResult};
use super::traits::GameDescriptor;

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Registry of game descriptors
#[derive(Debug, Default)]
pub struct Registry {
    /// Descriptors in registration order
    descriptors: Vec<GameDescriptor>,

    /// Index into `descriptors` by id
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under an id
    pub fn register(&mut self, id: &str, descriptor: GameDescriptor) -> PluginResult<()> {
        if self.index.contains_key(id) {
            return Err(PluginError::duplicate_id(id));
        }
        if descriptor.id != id {
            return Err(PluginError::manifest_invalid(format!(
                "Descriptor id '{}' does not match registration id '{}'",
                descriptor.id, id
            )));
        }

        self.index.insert(id.to_string(), self.descriptors.len());
        self.descriptors.push(descriptor);
        log::debug!("Registered game '{}'", id);
        Ok(())
    }

    /// Register every game of a scan report.
    ///
    /// Duplicates are reported as diagnostics rather than aborting the batch.
    pub fn register_all(&mut self, report: ScanReport) -> Vec<ScanDiagnostic> {
        let mut diagnostics = Vec::new();
        for game in report.games {
            let id = game.id().to_string();
            let folder = game.folder.clone();
            if let Err(error) = self.register(&id, game.into_descriptor()) {
                log::warn!("Skipping game from {}: {}", folder.display(), error);
                diagnostics.push(ScanDiagnostic { level: DiagnosticLevel::Excluded, path: folder, error });
            }
        }
        diagnostics
    }

    /// Get a descriptor by id
    pub fn get(&self, id: &str) -> PluginResult<&GameDescriptor> {
        self.index
            .get(id)
            .map(|&position| &self.descriptors[position])
            .ok_or_else(|| PluginError::not_found(id))
    }

    /// All descriptors in registration order
    pub fn list(&self) -> &[GameDescriptor] {
        &self.descriptors
    }

    pub fn ids(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.id.as_str()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Install this registry as the process-wide catalog.
    ///
    /// Fails if a registry was already installed.
    pub fn install(self) -> PluginResult<&'static Registry> {
        let mut pending = Some(self);
        let installed = GLOBAL_REGISTRY.get_or_init(|| pending.take().unwrap_or_default());
        match pending {
            None => Ok(installed),
            Some(_) => Err(PluginError::AlreadyInstalled),
        }
    }

    /// Whether the process-wide catalog is installed
    pub fn is_installed() -> bool {
        GLOBAL_REGISTRY.get().is_some()
    }
}

/// The process-wide registry.
///
/// # Panics
///
/// Panics if called before [`Registry::install`]; querying the catalog
/// before startup finished is a programming error.
pub fn global() -> &'static Registry {
    GLOBAL_REGISTRY
        .get()
        .expect("game registry queried before startup installed it")
}
