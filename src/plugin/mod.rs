//! Game Plugin System
//!
//! Turns a folder of self-describing game cartridges into a queryable
//! catalog. The scanner reads each cartridge once at startup and the
//! registry holds the resulting descriptors for the rest of the process.
//!
//! # Example Usage
//!
//! ```no_run
//! use puzzlefeed::plugin::{builtin, scan, Registry};
//!
//! let report = scan("games", builtin::builtin_components())?;
//! let mut registry = Registry::new();
//! let duplicates = registry.register_all(report);
//! assert!(duplicates.is_empty());
//! let registry = registry.install()?;
//! println!("{} games", registry.len());
//! # Ok::<(), puzzlefeed::plugin::PluginError>(())
//! ```

pub mod builtin;
pub mod compatibility;
pub mod discovery;
pub mod error;
pub mod levels;
pub mod manifest;
pub mod registry;
pub mod traits;

#[cfg(test)]
pub mod tests;

// Re-export core types for easier access
pub use error::{PluginError, PluginResult};
pub use traits::{ComponentCatalog, GameComponent, GameDescriptor};

// Manifest and levels
pub use manifest::{Difficulty, Manifest, ManifestParser};
pub use levels::{LevelLoader, LevelPayload, StaticLevelLoader};

// Discovery and registration
pub use compatibility::VersionCompatibilityChecker;
pub use discovery::{scan, DiagnosticLevel, DiscoveredGame, FolderScanner, GameDiscovery, ScanDiagnostic, ScanReport};
pub use registry::Registry;
