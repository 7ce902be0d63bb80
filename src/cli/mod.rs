//! CLI module containing argument parsing and related functionality

pub mod args;

pub use args::{parse_args, parse_move_script, validate_args, Args, Command};
