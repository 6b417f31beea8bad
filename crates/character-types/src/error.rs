//! Error types shared by the character index crates.

use thiserror::Error;

/// Unified error type for configuration and record handling.
#[derive(Debug, Error)]
pub enum CharacterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input value outside the known vocabulary
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
