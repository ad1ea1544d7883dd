//! Error types for ite-core
//!
//! Provides the shared error type for raster construction and the
//! precondition failures common to all pipeline stages.

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid raster dimensions
    #[error("invalid raster dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Invalid channel count
    #[error("invalid channel count: {0} (expected 1, 3 or 4)")]
    InvalidChannelCount(u32),

    /// Operation required a specific channel count
    #[error("wrong channel count: expected {expected}, got {actual}")]
    WrongChannelCount { expected: &'static str, actual: u32 },

    /// Two rasters disagree on size
    #[error("dimension mismatch: {0}x{1} vs {2}x{3}")]
    DimensionMismatch(u32, u32, u32, u32),

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Input smaller than the minimum the operation supports
    #[error("input too small: {width}x{height} (minimum {min}x{min})")]
    InputTooSmall { width: u32, height: u32, min: u32 },
}

/// Result type alias for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;
