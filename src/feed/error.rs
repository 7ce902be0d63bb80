//! Feed Error Types

use thiserror::Error;

use crate::plugin::PluginError;

/// Result type for feed operations
pub type FeedResult<T> = Result<T, FeedError>;

/// Error types for feed selection and sessions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The catalog is empty; there is nothing to serve
    #[error("No games registered")]
    NoGamesRegistered,

    /// Games are registered but none has a playable level
    #[error("No registered game has a playable level")]
    NoPlayableLevels,

    /// Session was asked about an item it does not hold
    #[error("No current feed item")]
    NoCurrentItem,

    /// Catalog lookup failed
    #[error(transparent)]
    Plugin(#[from] PluginError),
}

impl FeedError {
    /// Whether the host should show its "nothing to serve" state
    pub fn is_empty_feed(&self) -> bool {
        matches!(self, FeedError::NoGamesRegistered | FeedError::NoPlayableLevels)
    }
}
