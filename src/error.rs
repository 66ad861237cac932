// src/error.rs

use thiserror::Error;

/// Every failure the autocomplete pipeline can surface to its caller.
#[derive(Debug, Error)]
pub enum AutocompleteError {
    /// The generation config is unusable; raised before any input is read.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The generation service could not produce the requested candidates.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The audit log could not be opened or written.
    #[error("Request log unavailable: {0}")]
    Logging(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AutocompleteError>;
