//! Pipe Flow Cartridge
//!
//! Binds the flow engine to the game contract. Game data is the grid plus a
//! move counter; an interaction rotates one cell.

use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::engine::{flow, rotate};
use super::grid::{seed_for_game, CellPos, PipeCell, PipeGrid};
use super::piece::Openings;
use crate::contract::{GameLogic, GameResult, LevelContext, LogicComponent, Reduction, ThemeTokens};
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::levels::LevelPayload;

/// Entry point manifests use to select the flow component
pub const FLOW_ENTRY: &str = "flow";

/// Serializable flow game data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowState {
    pub grid: PipeGrid,
    #[serde(default)]
    pub pools_filled: usize,
    #[serde(default)]
    pub is_won: bool,
    #[serde(default)]
    pub moves: u32,
}

impl FlowState {
    /// State for a grid with its flow freshly computed
    pub fn new(grid: PipeGrid, moves: u32) -> Self {
        let playable = !grid.is_empty();
        let outcome = flow(&grid);
        Self { grid: outcome.grid, pools_filled: outcome.pools_filled, is_won: playable && outcome.is_won, moves }
    }
}

/// Tap on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowInteraction {
    pub row: usize,
    pub col: usize,
}

impl From<FlowInteraction> for CellPos {
    fn from(interaction: FlowInteraction) -> Self {
        CellPos::new(interaction.row, interaction.col)
    }
}

/// Game logic of the pipe flow puzzle
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowLogic;

impl GameLogic for FlowLogic {
    type Data = FlowState;
    type Interaction = FlowInteraction;

    fn from_level(&self, context: &LevelContext<'_>, level: &LevelPayload) -> PluginResult<FlowState> {
        let seed = seed_for_game(&context.to_string());
        let grid = PipeGrid::parse(&level.layout, Some(seed))?;
        Ok(FlowState::new(grid, 0))
    }

    fn placeholder(&self) -> FlowState {
        FlowState::new(PipeGrid::empty(), 0)
    }

    fn restore(&self, game_data: &Value) -> PluginResult<FlowState> {
        let stored: FlowState = serde_json::from_value(game_data.clone())
            .map_err(|e| PluginError::invalid_game_data(format!("Failed to decode flow state: {}", e)))?;
        stored.grid.validate()?;
        // Watered flags and win status are derived, never trusted
        Ok(FlowState::new(stored.grid, stored.moves))
    }

    fn reduce(&self, state: &FlowState, interaction: &FlowInteraction) -> Reduction<FlowState> {
        if state.grid.is_empty() {
            return Reduction::Rejected("no grid loaded".to_string());
        }
        if state.is_won {
            return Reduction::Rejected("grid already solved".to_string());
        }

        match rotate(&state.grid, CellPos::from(*interaction)) {
            Ok(outcome) => {
                let next = FlowState {
                    grid: outcome.grid,
                    pools_filled: outcome.pools_filled,
                    is_won: outcome.is_won,
                    moves: state.moves.saturating_add(1),
                };
                if next.is_won {
                    Reduction::Finished(next, GameResult::Won)
                } else {
                    Reduction::Continue(next)
                }
            }
            Err(e) => Reduction::Rejected(e.to_string()),
        }
    }

    fn outcome(&self, state: &FlowState) -> Option<GameResult> {
        state.is_won.then_some(GameResult::Won)
    }

    fn move_count(&self, state: &FlowState) -> Option<u32> {
        Some(state.moves)
    }

    fn render_text(&self, state: &FlowState, theme: &ThemeTokens) -> String {
        let colorize = theme.get("render.color") != Some("off");
        render_grid(&state.grid, theme, colorize)
    }
}

/// The flow component handle
pub fn flow_component() -> LogicComponent<FlowLogic> {
    LogicComponent::new(FLOW_ENTRY, FlowLogic)
}

/// Draw a grid with box glyphs, one text line per row
pub fn render_grid(grid: &PipeGrid, theme: &ThemeTokens, colorize: bool) -> String {
    if grid.is_empty() {
        return String::from("(no grid)");
    }

    grid.cell_rows()
        .iter()
        .map(|row| row.iter().map(|cell| render_cell(cell, theme, colorize)).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_cell(cell: &PipeCell, theme: &ThemeTokens, colorize: bool) -> String {
    let (glyph, colour_key, fallback) = if cell.piece_type.is_pool() {
        (theme.get_or("glyph.pool", "O").to_string(), "color.pool", "blue")
    } else if cell.is_watered {
        (pipe_glyph(cell.openings()).to_string(), "color.watered", "cyan")
    } else {
        (pipe_glyph(cell.openings()).to_string(), "color.dry", "white")
    };

    if !colorize {
        return glyph;
    }
    let mut painted = glyph.color(theme.get_or(colour_key, fallback));
    if cell.piece_type.is_pool() && cell.is_watered {
        painted = painted.bold();
    }
    painted.to_string()
}

fn pipe_glyph(openings: Openings) -> char {
    match openings.bits() {
        0b0001 => '╵',
        0b0010 => '╶',
        0b0011 => '└',
        0b0100 => '╷',
        0b0101 => '│',
        0b0110 => '┌',
        0b0111 => '├',
        0b1000 => '╴',
        0b1001 => '┘',
        0b1010 => '─',
        0b1011 => '┴',
        0b1100 => '┐',
        0b1101 => '┤',
        0b1110 => '┬',
        0b1111 => '┼',
        _ => ' ',
    }
}
