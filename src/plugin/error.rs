//! Plugin Error Types
//!
//! Errors raised while scanning cartridge folders and querying the catalog.

use thiserror::Error;

use crate::flow::FlowError;

/// Result type for plugin operations
pub type PluginResult<T> = Result<T, PluginError>;

/// Error types for cartridge discovery and registration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// Plugin folder has no manifest file
    #[error("Manifest missing in {folder}")]
    ManifestMissing { folder: String },

    /// Manifest is unreadable or fails validation
    #[error("Manifest invalid: {message}")]
    ManifestInvalid { message: String },

    /// Manifest names an entry point no compiled-in component exports
    #[error("Component missing: no component exports entry '{entry}'")]
    ComponentMissing { entry: String },

    /// Level file fails the component's validation
    #[error("Malformed level {level}: {message}")]
    MalformedLevel { level: String, message: String },

    /// Plugin API version does not match the host
    #[error("Version compatibility error: {message}")]
    VersionIncompatible { message: String },

    /// A game with this id is already registered
    #[error("Duplicate game id: {id}")]
    DuplicateId { id: String },

    /// No game registered under this id
    #[error("Game not found: {id}")]
    NotFound { id: String },

    /// Registered game has no such level
    #[error("Level not found: {game_id} {difficulty} #{level_number}")]
    LevelNotFound { game_id: String, difficulty: String, level_number: u32 },

    /// Persisted or supplied game data cannot be used
    #[error("Invalid game data: {message}")]
    InvalidGameData { message: String },

    /// The process-wide registry was installed twice
    #[error("Game registry is already installed")]
    AlreadyInstalled,

    /// Filesystem error while scanning
    #[error("IO error: {message}")]
    Io { message: String },
}

impl PluginError {
    /// Create a manifest missing error
    pub fn manifest_missing<S: Into<String>>(folder: S) -> Self {
        Self::ManifestMissing { folder: folder.into() }
    }

    /// Create a manifest invalid error
    pub fn manifest_invalid<S: Into<String>>(message: S) -> Self {
        Self::ManifestInvalid { message: message.into() }
    }

    /// Create a component missing error
    pub fn component_missing<S: Into<String>>(entry: S) -> Self {
        Self::ComponentMissing { entry: entry.into() }
    }

    /// Create a malformed level error
    pub fn malformed_level<L: Into<String>, S: Into<String>>(level: L, message: S) -> Self {
        Self::MalformedLevel { level: level.into(), message: message.into() }
    }

    /// Create a version incompatible error
    pub fn version_incompatible<S: Into<String>>(message: S) -> Self {
        Self::VersionIncompatible { message: message.into() }
    }

    /// Create a duplicate id error
    pub fn duplicate_id<S: Into<String>>(id: S) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a level not found error
    pub fn level_not_found<S: Into<String>, D: ToString>(game_id: S, difficulty: D, level_number: u32) -> Self {
        Self::LevelNotFound { game_id: game_id.into(), difficulty: difficulty.to_string(), level_number }
    }

    /// Create an invalid game data error
    pub fn invalid_game_data<S: Into<String>>(message: S) -> Self {
        Self::InvalidGameData { message: message.into() }
    }

    /// Create an IO error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    /// Errors that exclude a plugin or level during the scan
    pub fn is_scan_error(&self) -> bool {
        matches!(self,
            PluginError::ManifestMissing { .. } |
            PluginError::ManifestInvalid { .. } |
            PluginError::ComponentMissing { .. } |
            PluginError::MalformedLevel { .. } |
            PluginError::VersionIncompatible { .. } |
            PluginError::Io { .. }
        )
    }

    /// Errors raised by catalog queries and registration
    pub fn is_registry_error(&self) -> bool {
        matches!(self,
            PluginError::DuplicateId { .. } |
            PluginError::NotFound { .. } |
            PluginError::LevelNotFound { .. } |
            PluginError::AlreadyInstalled
        )
    }
}

impl From<std::io::Error> for PluginError {
    fn from(err: std::io::Error) -> Self {
        PluginError::io(err.to_string())
    }
}

impl From<FlowError> for PluginError {
    fn from(err: FlowError) -> Self {
        PluginError::invalid_game_data(err.to_string())
    }
}
