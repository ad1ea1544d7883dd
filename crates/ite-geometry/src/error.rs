//! Error types for ite-geometry

use thiserror::Error;

/// Errors that can occur during geometric operations
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] ite_core::CoreError),

    /// Colour conversion error
    #[error("color error: {0}")]
    Color(#[from] ite_color::ColorError),

    /// Binarization error (skew detection binarizes its working copy)
    #[error("binarize error: {0}")]
    Binarize(#[from] ite_binarize::BinarizeError),
}

/// Result type for geometry operations
pub type GeometryResult<T> = Result<T, GeometryError>;
