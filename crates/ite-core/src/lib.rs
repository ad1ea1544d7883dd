//! ite-core - raster container and integral-image engine
//!
//! The foundation crate of the ITE workspace:
//!
//! - [`Raster`]: planar W x H x C image, 8-bit samples held in `u16`
//! - [`Boundary`]: shared Zero/Replicate boundary policy
//! - [`IntegralImage`]: (W+1) x (H+1) summed-area tables with O(1)
//!   rectangle sums
//! - [`CoreError`]: precondition failures shared by the pipeline stages

mod error;
mod integral;
mod raster;

pub use error::{CoreError, CoreResult};
pub use integral::{rect_mean_stddev, IntegralImage};
pub use raster::{clamp_to_u8, Boundary, Raster};
