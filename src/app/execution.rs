//! Command execution against a loaded catalog

use anyhow::{Context, Result};
use crossbeam_channel::unbounded;
use log::{debug, info};
use serde_json::json;

use crate::cli::Command;
use crate::contract::{GameResult, HostEvent, InteractionOutcome, MountProps, Phase, ThemeTokens};
use crate::feed::{FeedAlgorithm, FeedConfig, FeedItem, FeedSession, MemoryStateStore};
use crate::output;
use crate::plugin::{Difficulty, Registry, ScanDiagnostic};

/// Outcome of playing a level from a move script
#[derive(Debug, Clone, PartialEq)]
pub struct PlayReport {
    pub rendered: String,
    pub moves_applied: usize,
    pub rejected: Vec<String>,
    pub result: Option<GameResult>,
    pub events: Vec<HostEvent>,
}

/// Dispatch one resolved command, returning the text to print
pub fn run_command(
    command: &Command,
    registry: &Registry,
    diagnostics: &[ScanDiagnostic],
    feed_config: FeedConfig,
    theme: &ThemeTokens,
) -> Result<String> {
    match command {
        Command::ListGames => Ok(list_games(registry, diagnostics)),
        Command::GameInfo(game_id) => show_game_info(registry, game_id),
        Command::Feed(count) => {
            let items = plan_feed(registry, feed_config, *count)?;
            Ok(output::format_feed_plan(&items))
        }
        Command::Play { game_id, difficulty, level, moves } => {
            let report = play_level(registry, game_id, *difficulty, *level, moves, theme)?;
            Ok(format_play_report(&report))
        }
    }
}

pub fn list_games(registry: &Registry, diagnostics: &[ScanDiagnostic]) -> String {
    let mut out = if registry.is_empty() {
        String::from("No games registered.\n")
    } else {
        format!("Registered games:\n{}", output::format_catalog(registry))
    };

    if !diagnostics.is_empty() {
        out.push_str("\nScan diagnostics:\n");
        out.push_str(&output::format_diagnostics(diagnostics));
    }
    out
}

pub fn show_game_info(registry: &Registry, game_id: &str) -> Result<String> {
    let descriptor = registry.get(game_id)?;
    Ok(output::format_game_info(descriptor))
}

/// Serve `count` items in a row, as a player skipping through the feed would
pub fn plan_feed(registry: &Registry, feed_config: FeedConfig, count: usize) -> Result<Vec<FeedItem>> {
    let mut session = FeedSession::new(registry, FeedAlgorithm::new(feed_config), MemoryStateStore::new());
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(session.advance().context("Failed to plan feed")?.clone());
    }
    info!("Planned {} feed item(s)", items.len());
    Ok(items)
}

/// Mount a level interactively and apply a move script to it.
///
/// Each move is offered as a `{"row", "col"}` interaction and closes a frame;
/// moves after the game ended are ignored.
pub fn play_level(
    registry: &Registry,
    game_id: &str,
    difficulty: Difficulty,
    level_number: u32,
    moves: &[(usize, usize)],
    theme: &ThemeTokens,
) -> Result<PlayReport> {
    let descriptor = registry.get(game_id)?;
    let level = descriptor.level_loader.load(difficulty, level_number)?;
    let props = MountProps::new(game_id, difficulty, level_number).with_level(level);

    let (sender, receiver) = unbounded();
    let mut game = descriptor.component.mount(props, Box::new(sender));
    debug!("[{}] Playing {}/{}/{}", game.mount_id(), game_id, difficulty, level_number);

    let mut moves_applied = 0;
    let mut rejected = Vec::new();
    let mut result = None;
    for &(row, col) in moves {
        if game.phase() == Phase::Completed {
            debug!("Game over, ignoring remaining moves");
            break;
        }
        match game.interact(json!({ "row": row, "col": col })) {
            InteractionOutcome::Accepted => moves_applied += 1,
            InteractionOutcome::Completed(game_result) => {
                moves_applied += 1;
                result = Some(game_result);
            }
            InteractionOutcome::Rejected(reason) => rejected.push(format!("{},{}: {}", row, col, reason)),
            InteractionOutcome::Forwarded => {}
        }
        game.end_frame();
    }
    game.end_frame();

    Ok(PlayReport {
        rendered: game.render_text(theme),
        moves_applied,
        rejected,
        result,
        events: receiver.try_iter().collect(),
    })
}

pub fn format_play_report(report: &PlayReport) -> String {
    let mut out = format!("{}\n\n", report.rendered);
    out.push_str(&format!("Moves applied: {}\n", report.moves_applied));
    for reason in &report.rejected {
        out.push_str(&format!("Rejected {}\n", reason));
    }
    match report.result {
        Some(GameResult::Won) => out.push_str("Result: won\n"),
        Some(GameResult::Lost) => out.push_str("Result: lost\n"),
        None => out.push_str("Result: in progress\n"),
    }
    out
}
