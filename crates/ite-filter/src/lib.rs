//! ite-filter - denoising filters for the ITE pipeline
//!
//! - Simple separable Gaussian blur (`gaussian`)
//! - Edge-aware adaptive Gaussian blend (`adaptive_gaussian`)
//! - Exact square-window median (`median`)
//! - Adaptive median with window expansion (`adaptive_median`)
//! - Heuristic noise/edge parameter picker (`params`)

mod adaptive_gaussian;
mod adaptive_median;
mod error;
mod gaussian;
mod median;
mod params;

pub use adaptive_gaussian::adaptive_gaussian_blur;
pub use adaptive_median::adaptive_median;
pub use error::{FilterError, FilterResult};
pub use gaussian::gaussian_blur;
pub use median::median_blur;
pub use params::{
    adaptive_median_max_window, gradient_percentile, noise_sigma_mad, AdaptiveGaussianParams,
};
