//! Output formatting and display module

pub mod reports;

pub use reports::{format_catalog, format_compact_table, format_diagnostics, format_feed_plan, format_game_info};
