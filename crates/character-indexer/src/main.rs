//! Character Indexer
//!
//! Indexes crawled character pages into a full-text index and runs a search.
//!
//! # Usage
//!
//! ```bash
//! character-indexer --search_query "Spider-Man" [--max_workers 4]
//! character-indexer --search_query "weather" --fields powers.powers --search-only
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/character-index/config.toml)
//! 3. Environment variables (CHARACTER_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use character_indexer::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
