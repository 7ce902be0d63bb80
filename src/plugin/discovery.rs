//! Cartridge Discovery
//!
//! One-shot scan of a games directory holding one subfolder per plugin.
//! Each folder must carry a manifest naming a compiled-in component; its
//! level files are indexed and validated on the way. A broken folder is
//! reported and skipped, the rest of the catalog still loads.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::compatibility::VersionCompatibilityChecker;
use super::error::{PluginError, PluginResult};
use super::levels::{index_levels, LevelLoader, StaticLevelLoader};
use super::manifest::{load_manifest, Manifest};
use super::traits::{ComponentCatalog, GameComponent, GameDescriptor};

/// How much of a plugin a diagnostic cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// The whole plugin was left out of the catalog
    Excluded,
    /// The plugin loaded but something inside it was dropped
    Warning,
}

/// Problem found during a scan
#[derive(Debug, Clone)]
pub struct ScanDiagnostic {
    pub level: DiagnosticLevel,
    pub path: PathBuf,
    pub error: PluginError,
}

/// A plugin that passed the scan
#[derive(Clone)]
pub struct DiscoveredGame {
    pub manifest: Manifest,
    pub component: Arc<dyn GameComponent>,
    pub level_loader: Arc<StaticLevelLoader>,
    pub folder: PathBuf,
}

impl DiscoveredGame {
    pub fn id(&self) -> &str {
        &self.manifest.id
    }

    /// Turn the scan result into a registry descriptor
    pub fn into_descriptor(self) -> GameDescriptor {
        let loader: Arc<dyn LevelLoader> = self.level_loader;
        GameDescriptor::new(self.manifest, self.component, loader).with_folder(self.folder)
    }
}

impl std::fmt::Debug for DiscoveredGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveredGame")
            .field("id", &self.manifest.id)
            .field("entry", &self.component.entry())
            .field("levels", &self.level_loader.total_levels())
            .field("folder", &self.folder)
            .finish()
    }
}

/// Ordered scan result
#[derive(Debug, Default)]
pub struct ScanReport {
    pub games: Vec<DiscoveredGame>,
    pub diagnostics: Vec<ScanDiagnostic>,
}

impl ScanReport {
    pub fn excluded(&self) -> impl Iterator<Item = &ScanDiagnostic> {
        self.diagnostics.iter().filter(|d| d.level == DiagnosticLevel::Excluded)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ScanDiagnostic> {
        self.diagnostics.iter().filter(|d| d.level == DiagnosticLevel::Warning)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.games.iter().map(DiscoveredGame::id).collect()
    }
}

/// Discovery mechanism producing a scan report
pub trait GameDiscovery {
    /// Scan every plugin once
    fn discover(&self) -> PluginResult<ScanReport>;

    /// Directory being scanned
    fn games_directory(&self) -> &Path;
}

/// Scans a directory of plugin folders
#[derive(Debug)]
pub struct FolderScanner {
    games_directory: PathBuf,
    components: ComponentCatalog,
    checker: VersionCompatibilityChecker,
}

impl FolderScanner {
    /// Create a scanner over an existing directory
    pub fn new<P: AsRef<Path>>(games_directory: P, components: ComponentCatalog) -> PluginResult<Self> {
        let path = games_directory.as_ref().to_path_buf();

        if !path.exists() {
            return Err(PluginError::io(format!("Games directory does not exist: {}", path.display())));
        }

        if !path.is_dir() {
            return Err(PluginError::io(format!("Games path is not a directory: {}", path.display())));
        }

        Ok(Self { games_directory: path, components, checker: VersionCompatibilityChecker::for_host() })
    }

    pub fn with_checker(mut self, checker: VersionCompatibilityChecker) -> Self {
        self.checker = checker;
        self
    }

    /// Load one plugin folder
    pub fn scan_folder(&self, folder: &Path) -> PluginResult<(DiscoveredGame, Vec<ScanDiagnostic>)> {
        let manifest = load_manifest(folder)?;
        self.checker.check_manifest(&manifest)?;
        let component = self.components.resolve(manifest.entry_point())?;

        let index = index_levels(folder, &manifest, component.as_ref());
        let warnings = index
            .rejected
            .into_iter()
            .map(|(path, error)| ScanDiagnostic { level: DiagnosticLevel::Warning, path, error })
            .collect();

        let game = DiscoveredGame {
            manifest,
            component,
            level_loader: Arc::new(index.loader),
            folder: folder.to_path_buf(),
        };
        Ok((game, warnings))
    }

    fn plugin_folders(&self) -> PluginResult<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.games_directory).map_err(|e| {
            PluginError::io(format!("Failed to read directory {}: {}", self.games_directory.display(), e))
        })?;

        let mut folders: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter(|path| {
                !path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with('.'))
            })
            .collect();
        folders.sort();
        Ok(folders)
    }
}

impl GameDiscovery for FolderScanner {
    fn discover(&self) -> PluginResult<ScanReport> {
        let mut report = ScanReport::default();

        for folder in self.plugin_folders()? {
            match self.scan_folder(&folder) {
                Ok((game, warnings)) => {
                    log::debug!("Discovered game '{}' in {}", game.id(), folder.display());
                    report.games.push(game);
                    report.diagnostics.extend(warnings);
                }
                Err(error) => {
                    log::warn!("Excluding plugin folder {}: {}", folder.display(), error);
                    report.diagnostics.push(ScanDiagnostic { level: DiagnosticLevel::Excluded, path: folder, error });
                }
            }
        }

        log::info!(
            "Scanned {}: {} games, {} diagnostics",
            self.games_directory.display(),
            report.games.len(),
            report.diagnostics.len()
        );
        Ok(report)
    }

    fn games_directory(&self) -> &Path {
        &self.games_directory
    }
}

/// Scan a games directory with the given component catalog
pub fn scan<P: AsRef<Path>>(games_directory: P, components: ComponentCatalog) -> PluginResult<ScanReport> {
    FolderScanner::new(games_directory, components)?.discover()
}
