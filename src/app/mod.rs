//! Application orchestration module

pub mod execution;
pub mod initialization;

pub use execution::{list_games, plan_feed, play_level, run_command, show_game_info, PlayReport};
pub use initialization::{
    build_registry,
    configure_logging,
    load_configuration,
    resolve_feed_config,
    resolve_games_dir,
};
