use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

use crate::plugin::Difficulty;

/// Puzzle feed host
#[derive(Parser, Debug, Clone)]
#[command(name = "puzzlefeed")]
#[command(about = "Scans a folder of puzzle game cartridges, plans a feed over them and plays levels from a move script")]
#[command(version)]
pub struct Args {
    /// Directory holding one folder per game cartridge
    #[arg(short = 'g', long = "games-dir", value_name = "PATH")]
    pub games_dir: Option<PathBuf>,

    /// List registered games
    #[arg(short = 'l', long = "list-games")]
    pub list_games: bool,

    /// Show manifest and levels of one game
    #[arg(long = "game-info", value_name = "ID")]
    pub game_info: Option<String>,

    /// Plan the next N feed items
    #[arg(long = "feed", value_name = "N")]
    pub feed: Option<usize>,

    /// Play a level of a game
    #[arg(long = "play", value_name = "ID")]
    pub play: Option<String>,

    /// Difficulty of the level to play
    #[arg(long, value_name = "DIFFICULTY")]
    pub difficulty: Option<Difficulty>,

    /// Level number to play
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub level: u32,

    /// Moves to apply, as space-separated "row,col" cells
    #[arg(long, value_name = "MOVES", allow_hyphen_values = true)]
    pub moves: Option<String>,

    /// RNG seed for the feed
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Disable coloured grid output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Verbose output (debug level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long)]
    pub debug: bool,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log file path for file output
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for file output (independent of console level)
    #[arg(long, value_name = "LEVEL")]
    pub log_file_level: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Configuration section name
    #[arg(long, value_name = "SECTION")]
    pub config_name: Option<String>,
}

/// What the invocation asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListGames,
    GameInfo(String),
    Feed(usize),
    Play { game_id: String, difficulty: Difficulty, level: u32, moves: Vec<(usize, usize)> },
}

impl Args {
    /// Resolve the requested command; listing is the default
    pub fn command(&self) -> Result<Command> {
        if let Some(game_id) = &self.play {
            let difficulty = self
                .difficulty
                .ok_or_else(|| anyhow::anyhow!("--play requires --difficulty"))?;
            let moves = match &self.moves {
                Some(script) => parse_move_script(script)?,
                None => Vec::new(),
            };
            return Ok(Command::Play { game_id: game_id.clone(), difficulty, level: self.level, moves });
        }
        if let Some(game_id) = &self.game_info {
            return Ok(Command::GameInfo(game_id.clone()));
        }
        if let Some(count) = self.feed {
            return Ok(Command::Feed(count));
        }
        Ok(Command::ListGames)
    }
}

/// Parse a move script such as `"0,1 2,0"` into cell coordinates
pub fn parse_move_script(script: &str) -> Result<Vec<(usize, usize)>> {
    script
        .split_whitespace()
        .map(|token| {
            let (row, col) = token
                .split_once(',')
                .ok_or_else(|| anyhow::anyhow!("Invalid move '{}': expected row,col", token))?;
            let row = row
                .trim()
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("Invalid row in move '{}'", token))?;
            let col = col
                .trim()
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("Invalid column in move '{}'", token))?;
            Ok((row, col))
        })
        .collect()
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    let args = Args::parse();
    debug!("Parsed CLI arguments: {:?}", args);
    args
}

/// Validate CLI argument combinations
pub fn validate_args(args: &Args) -> Result<()> {
    debug!("Validating CLI argument combinations");

    let log_flags_count = [args.verbose, args.quiet, args.debug].iter().filter(|&&flag| flag).count();
    if log_flags_count > 1 {
        return Err(anyhow::anyhow!(
            "Conflicting log level flags: only one of --verbose, --quiet, or --debug may be specified"
        ));
    }

    match args.log_format.to_lowercase().as_str() {
        "text" | "json" => {}
        _ => return Err(anyhow::anyhow!("Invalid log format '{}'. Valid options: text, json", args.log_format)),
    }

    if let Some(ref level) = args.log_file_level {
        match level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Invalid log file level '{}'. Valid levels: error, warn, info, debug, trace",
                    level
                ))
            }
        }
    }

    if args.log_file_level.is_some() && args.log_file.is_none() {
        return Err(anyhow::anyhow!("--log-file-level requires --log-file to be specified"));
    }

    let commands = [args.list_games, args.game_info.is_some(), args.feed.is_some(), args.play.is_some()]
        .iter()
        .filter(|&&selected| selected)
        .count();
    if commands > 1 {
        return Err(anyhow::anyhow!(
            "Only one of --list-games, --game-info, --feed, or --play may be specified"
        ));
    }

    if args.play.is_none() && (args.moves.is_some() || args.difficulty.is_some()) {
        return Err(anyhow::anyhow!("--difficulty and --moves are only valid with --play"));
    }

    if args.level == 0 {
        return Err(anyhow::anyhow!("--level must be at least 1"));
    }

    info!("CLI arguments validated successfully");
    Ok(())
}
