//! ite-pipeline - the ITE enhancement driver
//!
//! Composes the colour, filter, binarization, morphology and geometry
//! crates into the fixed-order document enhancement pipeline behind a
//! single entry point:
//!
//! ```no_run
//! use ite_core::Raster;
//! use ite_pipeline::{enhance, EnhanceOptions};
//!
//! let scan = Raster::new(2480, 3508, 3).unwrap();
//! let clean = enhance(&scan, &EnhanceOptions::default()).unwrap();
//! assert!(clean.is_binary());
//! ```

mod driver;
mod error;
mod options;
mod timing;

pub use driver::{enhance, enhance_with_log};
pub use error::{PipelineError, PipelineResult, StageError};
pub use options::{BinarizeMethod, EnhanceOptions};
pub use timing::{StageTiming, TimingLog};

pub use ite_color::to_luma;
pub use ite_core::{Boundary, Raster};
pub use ite_filter::{adaptive_median_max_window, AdaptiveGaussianParams};
