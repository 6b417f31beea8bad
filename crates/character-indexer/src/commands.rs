//! Command implementations for the character indexer.
//!
//! One invocation rebuilds the index from the configured input files, then
//! runs a single search and prints the formatted hits.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use character_indexing::{
    discover_sources, IndexingSession, RecordSource, RunStatsSnapshot, SessionConfig,
    TantivyIndexUpdater,
};
use character_search::{render_hits, CharacterSearcher, SearchHit, SearchIndexConfig, SearchOptions};
use character_types::Settings;

use crate::cli::Cli;

/// Load settings and apply CLI overrides (highest precedence).
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(level) = &cli.log_level {
        settings.log_level = level.clone();
    }
    if let Some(dir) = &cli.index_dir {
        settings.index_dir = dir.clone();
    }
    if let Some(dir) = &cli.input_dir {
        settings.input_dir = dir.clone();
    }
    if let Some(size) = cli.batch_size {
        settings.batch_size = size;
    }
    if let Some(workers) = cli.max_workers {
        settings.max_workers = workers;
    }
    if !cli.fields.is_empty() {
        settings.search_fields = cli.fields.clone();
    }
    if let Some(limit) = cli.limit {
        settings.search_limit = limit;
    }

    settings.validate().context("Invalid configuration")?;
    Ok(settings)
}

/// Install the console and run-log subscribers.
///
/// `RUST_LOG` wins over the configured level.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    let file_layer = match settings.log_path() {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to set tracing subscriber")?;

    Ok(())
}

/// Rebuild the index from every input file that exists.
pub async fn build_index(settings: &Settings) -> Result<RunStatsSnapshot> {
    let sources: Vec<Box<dyn RecordSource>> = discover_sources(&settings.input_paths())
        .context("No input files to index")?
        .into_iter()
        .map(|source| Box::new(source) as Box<dyn RecordSource>)
        .collect();

    let index_config =
        SearchIndexConfig::new(settings.index_path()).with_memory_mb(settings.ram_buffer_size_mb);

    let snapshot = IndexingSession::new(SessionConfig::from(settings))
        .run(|| TantivyIndexUpdater::create(index_config), &sources)
        .await
        .context("Indexing failed")?;

    Ok(snapshot)
}

/// Run one query against the index on disk.
pub fn search_index(settings: &Settings, query: &str) -> Result<Vec<SearchHit>> {
    let searcher = CharacterSearcher::open(settings.index_path())
        .with_context(|| format!("Failed to open index at {}", settings.index_dir))?;

    let options = SearchOptions::new()
        .with_limit(settings.search_limit)
        .with_fields(settings.search_fields.iter().cloned());

    searcher
        .search(query, &options)
        .with_context(|| format!("Search failed for query {:?}", query))
}

/// Entry point: index (unless `--search-only`), search, print.
pub async fn run(cli: Cli) -> Result<()> {
    if cli.search_query.trim().is_empty() {
        bail!("Search query must not be empty");
    }

    let settings = load_settings(&cli)?;
    init_logging(&settings)?;

    info!("Character indexer starting...");
    info!("Configuration:");
    info!("  Index directory: {}", settings.index_dir);
    info!("  Input directory: {}", settings.input_dir);
    info!("  Batch size: {}", settings.batch_size);
    info!("  Max workers: {}", settings.max_workers);

    if !cli.search_only {
        let stats = build_index(&settings).await?;
        if stats.total == 0 {
            info!("Input files contained no records");
        }
    }

    let hits = search_index(&settings, &cli.search_query)?;
    print!("{}", render_hits(&hits));
    Ok(())
}
