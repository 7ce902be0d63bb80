pub mod app;
pub mod cli;
pub mod config;
pub mod contract;
pub mod feed;
pub mod flow;
pub mod logging;
pub mod output;
pub mod plugin;
