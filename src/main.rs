use anyhow::Result;
use log::error;
use std::process;

use puzzlefeed::contract::ThemeTokens;
use puzzlefeed::{app, cli, logging, plugin};

fn main() {
    if let Err(e) = run() {
        let is_user_error = e.downcast_ref::<plugin::PluginError>().is_some_and(|err| err.is_registry_error());

        if is_user_error {
            eprintln!("{}", e);
        } else {
            error!("Application error: {:#}", e);
            eprintln!("Error: {:#}", e);
        }

        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::parse_args();

    cli::validate_args(&args)?;

    let config_manager = app::load_configuration(&args)?;

    let log_config = app::configure_logging(&args, &config_manager)?;
    logging::init_logger(log_config)?;

    let command = args.command()?;
    let games_dir = app::resolve_games_dir(&args, &config_manager);
    let feed_config = app::resolve_feed_config(&args, &config_manager)?;

    let (registry, diagnostics) = app::build_registry(&games_dir)?;
    let registry = registry.install()?;

    let theme = if args.no_color {
        ThemeTokens::default().overridden([("render.color", "off")])
    } else {
        ThemeTokens::default()
    };

    let output = app::run_command(&command, registry, &diagnostics, feed_config, &theme)?;
    print!("{}", output);
    Ok(())
}
