//! Sauvola local binarization
//!
//! Threshold per pixel from the mean and standard deviation of an odd
//! square window clamped to the image:
//!
//! ```text
//! T = mean * (1 + k * (stddev / R - 1)) - delta      R = 128
//! ```
//!
//! Both window statistics come from sum / sum-of-squares integral images,
//! so the per-pixel cost is independent of the window size.

use crate::{BinarizeError, BinarizeResult};
use ite_core::{rect_mean_stddev, IntegralImage, Raster};
use rayon::prelude::*;

/// Normalisation constant for the window standard deviation.
const R_NORM: f64 = 128.0;

/// Binarize `raster` in place with Sauvola's method.
///
/// The fresh output replaces the input on success, never on failure.
///
/// # Errors
///
/// - [`BinarizeError::WrongChannelCount`] for non-luma input
/// - [`BinarizeError::InvalidParameters`] for an even or < 3 window, or
///   `k <= 0`
pub fn binarize_sauvola(
    raster: &mut Raster,
    window_size: u32,
    k: f32,
    delta: f32,
) -> BinarizeResult<()> {
    if raster.channels() != 1 {
        return Err(BinarizeError::WrongChannelCount(raster.channels()));
    }
    if window_size < 3 || window_size % 2 == 0 {
        return Err(BinarizeError::InvalidParameters(format!(
            "sauvola window must be odd and >= 3, got {window_size}"
        )));
    }
    if k <= 0.0 {
        return Err(BinarizeError::InvalidParameters(format!(
            "sauvola k must be > 0, got {k}"
        )));
    }

    let w = raster.width();
    let h = raster.height();
    let half = (window_size / 2) as i64;
    let (sum, sum_sq) = IntegralImage::build_with_squares(raster.plane(0), w, h);

    let src = raster.plane(0);
    let mut out = vec![0u16; src.len()];

    out.par_chunks_mut(w as usize)
        .enumerate()
        .for_each(|(y, out_row)| {
            let y = y as i64;
            let y1 = (y - half).max(0) as u32;
            let y2 = (y + half).min(h as i64 - 1) as u32;

            for (x, out_px) in out_row.iter_mut().enumerate() {
                let x = x as i64;
                let x1 = (x - half).max(0) as u32;
                let x2 = (x + half).min(w as i64 - 1) as u32;

                let (mean, stddev) = rect_mean_stddev(&sum, &sum_sq, x1, y1, x2, y2);
                let threshold =
                    mean * (1.0 + f64::from(k) * (stddev / R_NORM - 1.0)) - f64::from(delta);

                let sample = src[y as usize * w as usize + x as usize];
                *out_px = if f64::from(sample) > threshold { 255 } else { 0 };
            }
        });

    raster.plane_mut(0).copy_from_slice(&out);
    Ok(())
}
