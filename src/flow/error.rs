//! Flow Engine Error Types

use thiserror::Error;

/// Result type for flow engine operations
pub type FlowResult<T> = Result<T, FlowError>;

/// Errors raised while parsing layouts or applying moves
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Layout text does not describe a playable rectangular grid
    #[error("Malformed layout: {message}")]
    MalformedLayout { message: String },

    /// A move addressed a cell outside the grid
    #[error("Cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    CellOutOfBounds { row: usize, col: usize, rows: usize, cols: usize },
}

impl FlowError {
    /// Create a malformed layout error
    pub fn malformed_layout<S: Into<String>>(message: S) -> Self {
        Self::MalformedLayout { message: message.into() }
    }

    /// Create an out of bounds error
    pub fn cell_out_of_bounds(row: usize, col: usize, rows: usize, cols: usize) -> Self {
        Self::CellOutOfBounds { row, col, rows, cols }
    }
}
