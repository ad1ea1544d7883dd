//! Error types for ite-color

use thiserror::Error;

/// Errors that can occur during colour operations
#[derive(Debug, Error)]
pub enum ColorError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] ite_core::CoreError),

    /// Operation required a specific channel count
    #[error("wrong channel count: expected {expected}, got {actual}")]
    WrongChannelCount { expected: &'static str, actual: u32 },

    /// Mask and colour raster disagree on size
    #[error("dimension mismatch: {0}x{1} vs {2}x{3}")]
    DimensionMismatch(u32, u32, u32, u32),
}

/// Result type for colour operations
pub type ColorResult<T> = Result<T, ColorError>;
