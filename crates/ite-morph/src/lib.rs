//! ite-morph - morphology for the ITE pipeline
//!
//! - Separable square dilation and erosion via monotonic-deque sliding
//!   windows (`separable`)
//! - Connected-component despeckle with two-pass union-find labelling
//!   (`despeckle`)

mod despeckle;
mod error;
mod separable;

pub use despeckle::{despeckle, label_components, Connectivity};
pub use error::{MorphError, MorphResult};
pub use separable::{dilate, erode};
