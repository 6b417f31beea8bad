//! Character indexer library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Settings, logging, index build and search

pub mod cli;
pub mod commands;

pub use cli::Cli;
pub use commands::{build_index, init_logging, load_settings, run, search_index};
