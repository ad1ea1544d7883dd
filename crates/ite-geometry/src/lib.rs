//! ite-geometry - geometric operations for the ITE pipeline
//!
//! - Bilinear resize (`resize`)
//! - Same-size bilinear rotation with configurable boundary (`rotate`)
//! - Radon point-projection skew detection and correction (`skew`)

mod error;
mod resize;
mod rotate;
mod skew;

pub use error::{GeometryError, GeometryResult};
pub use resize::{resize_bilinear, resize_to_max_side};
pub use rotate::rotate_bilinear;
pub use skew::{deskew, detect_skew, SkewDetection};
