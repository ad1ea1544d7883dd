//! Error types for ite-binarize

use thiserror::Error;

/// Errors that can occur during binarization
#[derive(Debug, Error)]
pub enum BinarizeError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] ite_core::CoreError),

    /// Binarization requires a single-channel input
    #[error("wrong channel count: expected 1, got {0}")]
    WrongChannelCount(u32),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for binarization operations
pub type BinarizeResult<T> = Result<T, BinarizeError>;
