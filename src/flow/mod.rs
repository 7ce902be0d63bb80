//! Pipe Flow Engine
//!
//! Deterministic simulation behind the pipe puzzle: a grid of rotatable
//! pieces, a source and one or more pools. Water reaches a pool through
//! chains of mutually aligned openings; the level is won when every pool is
//! filled.
//!
//! ```
//! use puzzlefeed::flow::{flow, rotate, CellPos, PipeGrid};
//!
//! let grid = PipeGrid::parse_solved("S\nP")?;
//! assert!(flow(&grid).is_won);
//!
//! let turned = rotate(&grid, CellPos::new(0, 0))?;
//! assert!(!turned.is_won);
//! # Ok::<(), puzzlefeed::flow::FlowError>(())
//! ```

pub mod engine;
pub mod error;
pub mod game;
pub mod grid;
pub mod piece;

pub use engine::{compute_flow, flow, rotate, FlowOutcome};
pub use error::{FlowError, FlowResult};
pub use game::{flow_component, render_grid, FlowInteraction, FlowLogic, FlowState, FLOW_ENTRY};
pub use grid::{seed_for_game, CellPos, PipeCell, PipeGrid};
pub use piece::{Direction, Openings, PieceType};
