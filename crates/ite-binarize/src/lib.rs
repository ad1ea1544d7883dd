//! ite-binarize - adaptive binarization for the ITE pipeline
//!
//! Three methods, all producing strict 0/255 output on a luma raster:
//!
//! - Otsu's global threshold with border-polarity detection (`otsu`)
//! - Sauvola's local threshold over integral images (`sauvola`)
//! - Bataineh's adaptive-window local threshold (`bataineh`)

mod bataineh;
mod error;
mod otsu;
mod sauvola;

pub use bataineh::binarize_bataineh;
pub use error::{BinarizeError, BinarizeResult};
pub use otsu::{binarize_otsu, border_mean, otsu_threshold};
pub use sauvola::binarize_sauvola;
