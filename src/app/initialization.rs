//! Application initialization and configuration

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::str::FromStr;

use crate::feed::FeedConfig;
use crate::plugin::{builtin, scan, Registry, ScanDiagnostic};
use crate::{cli, config, logging};

pub fn load_configuration(args: &cli::Args) -> Result<config::ConfigManager> {
    let mut manager = if let Some(config_file) = &args.config_file {
        debug!("Loading configuration from explicit file: {}", config_file.display());
        config::ConfigManager::load_from_file(config_file.clone())?
    } else {
        config::ConfigManager::load()?
    };

    if let Some(section_name) = &args.config_name {
        manager.select_section(section_name.clone());
    }

    Ok(manager)
}

pub fn configure_logging(args: &cli::Args, config: &config::ConfigManager) -> Result<logging::LogConfig> {
    use log::LevelFilter;

    let console_level = if args.debug {
        LevelFilter::Trace
    } else if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Error
    } else {
        match config.get_log_level("base", "console-level") {
            Ok(Some(level)) => {
                debug!("Using console log level from config: {:?}", level);
                level
            }
            Ok(None) => LevelFilter::Info,
            Err(e) => {
                debug!("Invalid console-level in config, using default: {}", e);
                LevelFilter::Info
            }
        }
    };

    let format = if !args.log_format.is_empty() && args.log_format != "text" {
        logging::LogFormat::from_str(&args.log_format).map_err(|e| anyhow::anyhow!(e))?
    } else {
        match config.get_value("base", "log-format") {
            Some(format_str) => {
                debug!("Using log format from config: {}", format_str);
                logging::LogFormat::from_str(format_str).unwrap_or(logging::LogFormat::Text)
            }
            None => logging::LogFormat::Text,
        }
    };

    let log_file_path = args.log_file.clone().or_else(|| config.get_path("base", "log-file"));

    let file_log_level = match &args.log_file_level {
        Some(level_str) => Some(logging::parse_log_level(level_str)?),
        None => match config.get_log_level("base", "file-log-level") {
            Ok(level) => level,
            Err(e) => {
                debug!("Invalid file-log-level in config, using None: {}", e);
                None
            }
        },
    };

    let (destination, file_level) = match (log_file_path, file_log_level) {
        (Some(file_path), Some(level)) => (logging::LogDestination::Both(file_path), Some(level)),
        (Some(file_path), None) => (logging::LogDestination::Both(file_path), Some(console_level)),
        (None, None) => (logging::LogDestination::Console, None),
        (None, Some(_)) => {
            error!("Log file level specified without log file");
            return Err(anyhow::anyhow!("Log file level specified without log file"));
        }
    };

    Ok(logging::LogConfig { console_level, file_level, format, destination })
}

/// Games directory: CLI first, then config, then the default
pub fn resolve_games_dir(args: &cli::Args, config: &config::ConfigManager) -> PathBuf {
    args.games_dir.clone().unwrap_or_else(|| config.get_games_dir())
}

/// Feed tuning from config, with the CLI seed taking precedence
pub fn resolve_feed_config(args: &cli::Args, config: &config::ConfigManager) -> Result<FeedConfig> {
    let mut feed_config = config.get_feed_config()?;
    if args.seed.is_some() {
        feed_config.seed = args.seed;
    }
    debug!("Feed configuration: {:?}", feed_config);
    Ok(feed_config)
}

/// Scan the games directory against the builtin components and register
/// every game that survived
pub fn build_registry(games_dir: &std::path::Path) -> Result<(Registry, Vec<ScanDiagnostic>)> {
    info!("Scanning games directory: {}", games_dir.display());
    let report = scan(games_dir, builtin::builtin_components())
        .with_context(|| format!("Failed to scan games directory: {}", games_dir.display()))?;

    let mut diagnostics = report.diagnostics.clone();
    let mut registry = Registry::new();
    diagnostics.extend(registry.register_all(report));

    if !diagnostics.is_empty() {
        warn!("Scan produced {} diagnostic(s)", diagnostics.len());
    }
    info!("Registered {} game(s)", registry.len());

    Ok((registry, diagnostics))
}
