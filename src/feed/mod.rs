//! Content Feed
//!
//! Chooses what the player sees next and runs the chosen game on the host
//! side of the contract.
//!
//! ```no_run
//! use puzzlefeed::feed::{FeedAlgorithm, FeedConfig, FeedSession, MemoryStateStore};
//! use puzzlefeed::plugin::{builtin, scan, Registry};
//!
//! let mut registry = Registry::new();
//! registry.register_all(scan("games", builtin::builtin_components())?);
//!
//! let mut feed = FeedSession::new(&registry, FeedAlgorithm::new(FeedConfig::default()), MemoryStateStore::new());
//! let item = feed.advance()?;
//! println!("next up: {}", item.id);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod algorithm;
pub mod error;
pub mod history;
pub mod session;
pub mod store;

pub use algorithm::{FeedAlgorithm, FeedConfig, FeedItem, LevelDescriptor};
pub use error::{FeedError, FeedResult};
pub use history::{FeedHistory, HistoryEntry};
pub use session::FeedSession;
pub use store::{MemoryStateStore, StateStore};
