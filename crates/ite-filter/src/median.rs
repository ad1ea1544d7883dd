//! Simple median filter
//!
//! Exact median over an odd square window with replicated boundaries.
//! Each output row keeps a sliding 256-bin histogram of the current
//! window: stepping one pixel right removes one column multiset and adds
//! another, so the window is never rebuilt from scratch.

use crate::{FilterError, FilterResult};
use ite_core::Raster;
use rayon::prelude::*;

/// Median-filter `raster` in place.
///
/// `kernel_size` must be odd; 1 is an identity transform. With
/// `threshold > 0` the median only replaces samples deviating from it by
/// more than the threshold, leaving everything else untouched (impulse
/// suppression without general smoothing).
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameters`] for an even or zero kernel
/// size.
pub fn median_blur(raster: &mut Raster, kernel_size: u32, threshold: u16) -> FilterResult<()> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(FilterError::InvalidParameters(format!(
            "median kernel size must be odd and positive, got {kernel_size}"
        )));
    }
    if kernel_size == 1 {
        return Ok(());
    }

    let w = raster.width() as usize;
    let h = raster.height() as usize;
    let r = (kernel_size / 2) as i64;
    let window = kernel_size as usize * kernel_size as usize;
    let target = (window + 1) / 2;

    for c in 0..raster.channels() {
        let src = raster.plane(c).to_vec();

        raster
            .plane_mut(c)
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, out_row)| {
                let mut hist = [0u32; 256];

                // Seed the histogram with the window centred on x = 0.
                for dx in -r..=r {
                    add_column(&mut hist, &src, w, h, y as i64, dx, r);
                }

                for (x, out_px) in out_row.iter_mut().enumerate() {
                    let med = histogram_median(&hist, target);
                    let sample = src[y * w + x];
                    *out_px = if threshold == 0 {
                        med
                    } else if sample.abs_diff(med) > threshold {
                        med
                    } else {
                        sample
                    };

                    // Slide right: the window multiset loses column x - r
                    // and gains column x + 1 + r (both edge-clamped).
                    remove_column(&mut hist, &src, w, h, y as i64, x as i64 - r, r);
                    add_column(&mut hist, &src, w, h, y as i64, x as i64 + 1 + r, r);
                }
            });
    }

    Ok(())
}

#[inline]
fn add_column(hist: &mut [u32; 256], src: &[u16], w: usize, h: usize, y: i64, x: i64, r: i64) {
    let xc = x.clamp(0, w as i64 - 1) as usize;
    for dy in -r..=r {
        let yc = (y + dy).clamp(0, h as i64 - 1) as usize;
        hist[src[yc * w + xc] as usize & 0xff] += 1;
    }
}

#[inline]
fn remove_column(hist: &mut [u32; 256], src: &[u16], w: usize, h: usize, y: i64, x: i64, r: i64) {
    let xc = x.clamp(0, w as i64 - 1) as usize;
    for dy in -r..=r {
        let yc = (y + dy).clamp(0, h as i64 - 1) as usize;
        hist[src[yc * w + xc] as usize & 0xff] -= 1;
    }
}

#[inline]
fn histogram_median(hist: &[u32; 256], target: usize) -> u16 {
    let mut cum = 0usize;
    for (v, &count) in hist.iter().enumerate() {
        cum += count as usize;
        if cum >= target {
            return v as u16;
        }
    }
    255
}
