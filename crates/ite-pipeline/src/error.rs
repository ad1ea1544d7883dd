//! Error types for ite-pipeline
//!
//! Stage failures abort the run; the pipeline error names the offending
//! stage so callers can report where the input was rejected.

use thiserror::Error;

/// Failure of a single pipeline stage.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Core(#[from] ite_core::CoreError),

    #[error(transparent)]
    Color(#[from] ite_color::ColorError),

    #[error(transparent)]
    Filter(#[from] ite_filter::FilterError),

    #[error(transparent)]
    Binarize(#[from] ite_binarize::BinarizeError),

    #[error(transparent)]
    Morph(#[from] ite_morph::MorphError),

    #[error(transparent)]
    Geometry(#[from] ite_geometry::GeometryError),
}

/// Pipeline error: a stage failure tagged with the stage name.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("stage '{stage}' failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: StageError,
    },
}

impl PipelineError {
    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Stage { stage, .. } => stage,
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
