//! ite-color - colour operations for the ITE pipeline
//!
//! - Rec. 601 grayscale conversion (`grayscale`)
//! - Robust 1%/99% linear contrast stretch (`contrast`)
//! - Binary-mask colour composition (`colorpass`)

mod colorpass;
mod contrast;
mod error;
mod grayscale;

pub use colorpass::colour_pass;
pub use contrast::contrast_stretch;
pub use error::{ColorError, ColorResult};
pub use grayscale::{to_luma, WEIGHT_B, WEIGHT_G, WEIGHT_R};
