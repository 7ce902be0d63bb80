//! Pipe Grid
//!
//! Layout parsing and the grid data model. Layouts are authored in their
//! solved orientation; a seed scrambles rotations deterministically so the
//! same identifier regenerates the same starting grid everywhere.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::engine::compute_flow;
use super::error::{FlowError, FlowResult};
use super::piece::{Direction, Openings, PieceType};

/// Re-rolls allowed when a scramble lands on an already solved grid
const MAX_SCRAMBLE_ATTEMPTS: u64 = 16;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Stable 64-bit FNV-1a hash used to derive scramble seeds
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Scramble seed derived from a game identifier
pub fn seed_for_game(game_id: &str) -> u64 {
    fnv1a(game_id.as_bytes())
}

/// Position of a cell in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A single pipe cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipeCell {
    pub row: usize,
    pub col: usize,
    pub piece_type: PieceType,
    pub rotation: u8,
    pub is_watered: bool,
}

impl PipeCell {
    fn new(row: usize, col: usize, piece_type: PieceType) -> Self {
        Self { row, col, piece_type, rotation: 0, is_watered: false }
    }

    /// Openings at the cell's current rotation
    pub fn openings(&self) -> Openings {
        self.piece_type.openings(self.rotation)
    }

    pub fn pos(&self) -> CellPos {
        CellPos::new(self.row, self.col)
    }
}

/// Rectangular pipe grid with its source and pool count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipeGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<PipeCell>>,
    source: CellPos,
    pool_count: usize,
}

impl PipeGrid {
    /// Parse a layout and scramble it.
    ///
    /// Without an explicit seed the seed is derived from the layout text.
    /// Layouts whose pipes cannot be turned away from the solution are
    /// rejected.
    pub fn parse(layout: &str, seed: Option<u64>) -> FlowResult<Self> {
        let solved = Self::parse_solved(layout)?;
        let seed = seed.unwrap_or_else(|| fnv1a(layout.as_bytes()));

        for attempt in 0..MAX_SCRAMBLE_ATTEMPTS {
            let mut candidate = solved.clone();
            candidate.scramble(seed.wrapping_add(attempt));
            let outcome = compute_flow(&candidate, candidate.source, candidate.pool_count);
            if !outcome.is_won {
                return Ok(outcome.grid);
            }
        }

        // Unlucky seeds: turn one piece away from the solution
        let positions = (0..solved.rows).flat_map(|row| (0..solved.cols).map(move |col| (row, col)));
        for (row, col) in positions {
            if !solved.cells[row][col].piece_type.is_scrambled() {
                continue;
            }
            for turns in 1..4 {
                let mut candidate = solved.clone();
                candidate.cells[row][col].rotation = turns;
                let outcome = compute_flow(&candidate, candidate.source, candidate.pool_count);
                if !outcome.is_won {
                    return Ok(outcome.grid);
                }
            }
        }

        Err(FlowError::malformed_layout(
            "layout stays solved under every scramble, no move is left to play",
        ))
    }

    /// Parse a layout keeping every piece in its authored orientation
    pub fn parse_solved(layout: &str) -> FlowResult<Self> {
        let token_rows: Vec<Vec<&str>> = layout
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>())
            .filter(|tokens| !tokens.is_empty())
            .collect();

        if token_rows.is_empty() {
            return Err(FlowError::malformed_layout("layout is empty"));
        }

        let cols = token_rows[0].len();
        let mut cells = Vec::with_capacity(token_rows.len());
        let mut source = None;
        let mut pool_count = 0;

        for (row, tokens) in token_rows.iter().enumerate() {
            if tokens.len() != cols {
                return Err(FlowError::malformed_layout(format!(
                    "row {} has {} tokens, expected {}",
                    row + 1,
                    tokens.len(),
                    cols
                )));
            }

            let mut row_cells = Vec::with_capacity(cols);
            for (col, token) in tokens.iter().enumerate() {
                let piece_type: PieceType = token.parse()?;
                if piece_type.is_pool() {
                    pool_count += 1;
                } else if source.is_none() {
                    source = Some(CellPos::new(row, col));
                }
                row_cells.push(PipeCell::new(row, col, piece_type));
            }
            cells.push(row_cells);
        }

        let source = source.ok_or_else(|| FlowError::malformed_layout("layout has no pipe to act as source"))?;
        if pool_count == 0 {
            return Err(FlowError::malformed_layout("layout has no pool"));
        }

        let grid = Self { rows: cells.len(), cols, cells, source, pool_count };
        Ok(compute_flow(&grid, grid.source, grid.pool_count).grid)
    }

    /// An empty grid standing in before any level is known
    pub fn empty() -> Self {
        Self { rows: 0, cols: 0, cells: Vec::new(), source: CellPos::new(0, 0), pool_count: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn source(&self) -> CellPos {
        self.source
    }

    pub fn pool_count(&self) -> usize {
        self.pool_count
    }

    pub fn cell(&self, pos: CellPos) -> Option<&PipeCell> {
        self.cells.get(pos.row).and_then(|row| row.get(pos.col))
    }

    pub(crate) fn cell_mut(&mut self, pos: CellPos) -> Option<&mut PipeCell> {
        self.cells.get_mut(pos.row).and_then(|row| row.get_mut(pos.col))
    }

    /// Rows of cells in row-major order
    pub fn cell_rows(&self) -> &[Vec<PipeCell>] {
        &self.cells
    }

    pub fn cells(&self) -> impl Iterator<Item = &PipeCell> {
        self.cells.iter().flatten()
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut PipeCell> {
        self.cells.iter_mut().flatten()
    }

    /// Neighbouring position in a direction, if it lies inside the grid
    pub fn neighbour(&self, pos: CellPos, direction: Direction) -> Option<CellPos> {
        let (dr, dc) = direction.offset();
        let row = pos.row.checked_add_signed(dr)?;
        let col = pos.col.checked_add_signed(dc)?;
        (row < self.rows && col < self.cols).then(|| CellPos::new(row, col))
    }

    /// Check structural consistency, used when restoring serialized grids
    pub fn validate(&self) -> FlowResult<()> {
        if self.cells.len() != self.rows {
            return Err(FlowError::malformed_layout("row count does not match grid dimensions"));
        }
        for (row, row_cells) in self.cells.iter().enumerate() {
            if row_cells.len() != self.cols {
                return Err(FlowError::malformed_layout(format!("row {} is not {} cells wide", row + 1, self.cols)));
            }
            for (col, cell) in row_cells.iter().enumerate() {
                if cell.row != row || cell.col != col {
                    return Err(FlowError::malformed_layout(format!(
                        "cell at ({}, {}) claims position ({}, {})",
                        row, col, cell.row, cell.col
                    )));
                }
                if cell.rotation > 3 {
                    return Err(FlowError::malformed_layout(format!("rotation {} out of range", cell.rotation)));
                }
            }
        }
        let pools = self.cells().filter(|cell| cell.piece_type.is_pool()).count();
        if pools != self.pool_count {
            return Err(FlowError::malformed_layout("pool count does not match grid contents"));
        }
        if !self.is_empty() {
            match self.cell(self.source) {
                Some(cell) if !cell.piece_type.is_pool() => {}
                _ => return Err(FlowError::malformed_layout("source does not point at a pipe")),
            }
        }
        Ok(())
    }

    /// Layout text in the authored token format, rotations dropped
    pub fn layout(&self) -> String {
        self.cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.piece_type.token()).collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn scramble(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        for cell in self.cells_mut() {
            // Draw for every cell so each position keeps its slot in the stream
            let turns: u8 = rng.random_range(0..4);
            if cell.piece_type.is_scrambled() {
                cell.rotation = turns;
            }
        }
    }
}
