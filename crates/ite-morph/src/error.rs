//! Error types for ite-morph

use thiserror::Error;

/// Errors that can occur during morphological operations
#[derive(Debug, Error)]
pub enum MorphError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] ite_core::CoreError),

    /// Morphology requires a single-channel input
    #[error("wrong channel count: expected 1, got {0}")]
    WrongChannelCount(u32),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for morphology operations
pub type MorphResult<T> = Result<T, MorphError>;
