//! Black-Box State Contract
//!
//! The closed message interface between a feed host and a mounted game:
//! mount-time props in, `HostEvent`s out. A host can drive any cartridge
//! through it without knowing what its game data means.
//!
//! ```no_run
//! use puzzlefeed::contract::{HostEvent, MountProps};
//! use puzzlefeed::flow::flow_component;
//! use puzzlefeed::plugin::{Difficulty, GameComponent, LevelPayload};
//!
//! let component = flow_component();
//! let props = MountProps::new("pipes", Difficulty::Easy, 1)
//!     .with_level(LevelPayload::new("S\nP"));
//! let mut game = component.mount(props, Box::new(Vec::<HostEvent>::new()));
//! game.interact(serde_json::json!({"row": 0, "col": 0}));
//! game.end_frame();
//! ```

pub mod component;
pub mod events;
pub mod instance;
pub mod logic;
pub mod props;
pub mod state;
pub mod theme;

pub use component::LogicComponent;
pub use events::{HostEvent, HostSink};
pub use instance::{GameSession, InteractionOutcome, MountedGame, Phase};
pub use logic::{GameLogic, LevelContext, Reduction};
pub use props::MountProps;
pub use state::{CompletionData, GameResult, GameState, GameStatus};
pub use theme::ThemeTokens;
