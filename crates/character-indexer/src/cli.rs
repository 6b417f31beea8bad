//! CLI argument parsing for the character indexer.
//!
//! CLI flags override all other config sources.

use clap::Parser;

/// Character Indexer
///
/// Builds a full-text index from crawled character pages, then runs one
/// search against it and prints the formatted hits.
#[derive(Parser, Debug)]
#[command(name = "character-indexer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Search query for the index
    #[arg(long = "search_query", visible_alias = "search-query")]
    pub search_query: String,

    /// Number of threads for indexing
    #[arg(long = "max_workers", visible_alias = "max-workers")]
    pub max_workers: Option<usize>,

    /// Path to config file (overrides default ~/.config/character-index/config.toml)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Override index directory
    #[arg(long)]
    pub index_dir: Option<String>,

    /// Override the directory input files are read from
    #[arg(long)]
    pub input_dir: Option<String>,

    /// Override records per commit batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Fields to search, comma separated (default: content)
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Maximum results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Search the existing index without rebuilding it
    #[arg(long)]
    pub search_only: bool,
}
