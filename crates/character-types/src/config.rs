//! Configuration loading for the character indexer.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at `<config dir>/character-index/config.toml`.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CharacterError;

/// Smallest writer memory budget the index engine accepts, in MB.
pub const MIN_RAM_BUFFER_MB: usize = 15;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the full-text index
    #[serde(default = "default_index_dir")]
    pub index_dir: String,

    /// Directory the input files are resolved against
    #[serde(default = "default_input_dir")]
    pub input_dir: String,

    /// Crawler output files to index, in order
    #[serde(default = "default_input_files")]
    pub input_files: Vec<String>,

    /// Records per commit batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Document-building worker threads
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Index writer memory budget in MB
    #[serde(default = "default_ram_buffer_size_mb")]
    pub ram_buffer_size_mb: usize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Run log file; empty disables file logging
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Maximum hits returned per query
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Fields searched by default; empty means the `content` field
    #[serde(default)]
    pub search_fields: Vec<String>,
}

fn default_index_dir() -> String {
    "marvel_index".to_string()
}

fn default_input_dir() -> String {
    ".".to_string()
}

fn default_input_files() -> Vec<String> {
    let mut files: Vec<String> = (1..=16).map(|i| format!("marvel_aarav{}.json", i)).collect();
    files.push("marvel_aarav.json".to_string());
    files
}

fn default_batch_size() -> usize {
    1000
}

fn default_max_workers() -> usize {
    4
}

fn default_ram_buffer_size_mb() -> usize {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "character_indexer.log".to_string()
}

fn default_search_limit() -> usize {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
            input_dir: default_input_dir(),
            input_files: default_input_files(),
            batch_size: default_batch_size(),
            max_workers: default_max_workers(),
            ram_buffer_size_mb: default_ram_buffer_size_mb(),
            log_level: default_log_level(),
            log_file: default_log_file(),
            search_limit: default_search_limit(),
            search_fields: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (`<config dir>/character-index/config.toml`)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (CHARACTER_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, CharacterError> {
        let config_dir = ProjectDirs::from("", "", "character-index")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("index_dir", default_index_dir())
            .map_err(|e| CharacterError::Config(e.to_string()))?
            .set_default("input_dir", default_input_dir())
            .map_err(|e| CharacterError::Config(e.to_string()))?
            .set_default("input_files", default_input_files())
            .map_err(|e| CharacterError::Config(e.to_string()))?
            .set_default("batch_size", default_batch_size() as i64)
            .map_err(|e| CharacterError::Config(e.to_string()))?
            .set_default("max_workers", default_max_workers() as i64)
            .map_err(|e| CharacterError::Config(e.to_string()))?
            .set_default("ram_buffer_size_mb", default_ram_buffer_size_mb() as i64)
            .map_err(|e| CharacterError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| CharacterError::Config(e.to_string()))?
            .set_default("log_file", default_log_file())
            .map_err(|e| CharacterError::Config(e.to_string()))?
            .set_default("search_limit", default_search_limit() as i64)
            .map_err(|e| CharacterError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: CHARACTER_INDEX_DIR, CHARACTER_MAX_WORKERS, ...
        // Keys contain underscores, so nesting is disabled with a double separator.
        builder = builder.add_source(
            Environment::with_prefix("CHARACTER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| CharacterError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CharacterError::Config(e.to_string()))
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), CharacterError> {
        if self.batch_size == 0 {
            return Err(CharacterError::Config("batch_size must be > 0".to_string()));
        }
        if self.max_workers == 0 {
            return Err(CharacterError::Config("max_workers must be > 0".to_string()));
        }
        if self.search_limit == 0 {
            return Err(CharacterError::Config("search_limit must be > 0".to_string()));
        }
        if self.ram_buffer_size_mb < MIN_RAM_BUFFER_MB {
            return Err(CharacterError::Config(format!(
                "ram_buffer_size_mb must be >= {}, got {}",
                MIN_RAM_BUFFER_MB, self.ram_buffer_size_mb
            )));
        }
        Ok(())
    }

    /// Input file paths resolved against `input_dir`.
    pub fn input_paths(&self) -> Vec<PathBuf> {
        let base = PathBuf::from(&self.input_dir);
        self.input_files.iter().map(|name| base.join(name)).collect()
    }

    pub fn index_path(&self) -> PathBuf {
        PathBuf::from(&self.index_dir)
    }

    /// Run log path, if file logging is enabled.
    pub fn log_path(&self) -> Option<PathBuf> {
        if self.log_file.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.log_file))
        }
    }
}
