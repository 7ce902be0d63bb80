//! Flow Computation
//!
//! Water spreads from the source through mutually aligned openings. Every
//! pass starts from a dry grid, so the result only depends on the current
//! rotations and never on earlier passes.

use std::collections::VecDeque;

use super::error::{FlowError, FlowResult};
use super::grid::{CellPos, PipeGrid};
use super::piece::Direction;

/// Result of a flow pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowOutcome {
    pub grid: PipeGrid,
    pub pools_filled: usize,
    pub is_won: bool,
}

/// Recompute which cells carry water.
pub fn compute_flow(grid: &PipeGrid, source: CellPos, pool_count: usize) -> FlowOutcome {
    let mut next = grid.clone();
    for cell in next.cells_mut() {
        cell.is_watered = false;
    }

    let mut pools_filled = 0;
    let mut visited = vec![vec![false; grid.cols()]; grid.rows()];
    let mut frontier = VecDeque::new();

    if grid.cell(source).is_some() {
        visited[source.row][source.col] = true;
        frontier.push_back(source);
    }

    while let Some(pos) = frontier.pop_front() {
        let Some(cell) = next.cell_mut(pos) else { continue };
        cell.is_watered = true;
        let piece = cell.piece_type;
        let openings = cell.openings();

        if piece.is_pool() {
            pools_filled += 1;
            if pos != source {
                continue;
            }
        }

        for direction in Direction::ALL {
            if !openings.contains(direction.opening()) {
                continue;
            }
            let Some(neighbour) = grid.neighbour(pos, direction) else { continue };
            if visited[neighbour.row][neighbour.col] {
                continue;
            }
            let accepts = grid
                .cell(neighbour)
                .map(|other| other.openings().contains(direction.opposite().opening()))
                .unwrap_or(false);
            if accepts {
                visited[neighbour.row][neighbour.col] = true;
                frontier.push_back(neighbour);
            }
        }
    }

    FlowOutcome { grid: next, pools_filled, is_won: pools_filled == pool_count }
}

/// Flow pass over a grid using its own source and pool count
pub fn flow(grid: &PipeGrid) -> FlowOutcome {
    compute_flow(grid, grid.source(), grid.pool_count())
}

/// Turn one cell a quarter clockwise and recompute the whole flow
pub fn rotate(grid: &PipeGrid, pos: CellPos) -> FlowResult<FlowOutcome> {
    let mut next = grid.clone();
    let (rows, cols) = (grid.rows(), grid.cols());
    let cell = next
        .cell_mut(pos)
        .ok_or_else(|| FlowError::cell_out_of_bounds(pos.row, pos.col, rows, cols))?;
    cell.rotation = (cell.rotation + 1) % 4;
    Ok(flow(&next))
}
