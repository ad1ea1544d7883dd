//! Bataineh adaptive-window binarization
//!
//! Bataineh et al., "An adaptive local binarization method for document
//! images based on a novel thresholding method and dynamic windows", 2011.
//!
//! The window size is chosen from image statistics: a confusion threshold
//! splits samples into black / red (uncertain) / white classes, the
//! black-to-red ratio picks one of three primary window sizes, and each
//! pixel falls back to a half-size sub-window when red pixels outnumber
//! black ones in its neighbourhood. Window class counts are read from
//! black/red count integral images, so the per-pixel cost stays O(1);
//! all four integrals (sum, sum-of-squares, black count, red count) are
//! built exactly once.

use crate::{BinarizeError, BinarizeResult};
use ite_core::{rect_mean_stddev, IntegralImage, Raster};
use rayon::prelude::*;

/// Binarize `raster` in place with the Bataineh method.
///
/// The fresh output replaces the input on success.
///
/// # Errors
///
/// Returns [`BinarizeError::WrongChannelCount`] for non-luma input.
pub fn binarize_bataineh(raster: &mut Raster) -> BinarizeResult<()> {
    if raster.channels() != 1 {
        return Err(BinarizeError::WrongChannelCount(raster.channels()));
    }

    let w = raster.width();
    let h = raster.height();
    let n = raster.plane_len() as f64;
    let src = raster.plane(0);

    let (sum, sum_sq) = IntegralImage::build_with_squares(src, w, h);

    let mean_global = sum.total() / n;
    let var_global = (sum_sq.total() / n - mean_global * mean_global).max(0.0);
    let stddev_global = var_global.sqrt();
    let max_intensity = f64::from(*src.iter().max().unwrap_or(&0));

    // Confusion threshold: samples within +/- offset of it are "red"
    // (ambiguous), darker are black, brighter are white.
    let t_con = mean_global
        - (mean_global * mean_global * stddev_global)
            / ((mean_global + stddev_global) * (0.5 * max_intensity + stddev_global));
    let offset = stddev_global / 2.0;

    let black = IntegralImage::build_mask(src, w, h, |v| f64::from(v) <= t_con - offset);
    let red = IntegralImage::build_mask(src, w, h, |v| {
        let v = f64::from(v);
        v > t_con - offset && v < t_con + offset
    });

    let n_black = black.total();
    let n_red = red.total();
    let p = if n_red == 0.0 { 10.0 } else { n_black / n_red };

    // Primary window from the black/red ratio and global contrast.
    let (mut pw_x, mut pw_y) = if p >= 2.5 || stddev_global < 0.1 * max_intensity {
        (w / 6, h / 4)
    } else if p > 1.0 || w + h < 400 {
        (w / 30, h / 20)
    } else {
        (w / 40, h / 30)
    };
    if pw_x % 2 == 0 {
        pw_x += 1;
    }
    if pw_y % 2 == 0 {
        pw_y += 1;
    }

    let half_x = (pw_x / 2) as i64;
    let half_y = (pw_y / 2) as i64;

    // Pass 1: global min/max of the primary-window stddev, for the
    // per-pixel normalisation in pass 2.
    let (stddev_min, stddev_max) = (0..h as usize)
        .into_par_iter()
        .fold(
            || (f64::MAX, f64::MIN),
            |(mut lo, mut hi), y| {
                let (y1, y2) = clamp_span(y as i64, half_y, h);
                for x in 0..w as usize {
                    let (x1, x2) = clamp_span(x as i64, half_x, w);
                    let (_, dev) = rect_mean_stddev(&sum, &sum_sq, x1, y1, x2, y2);
                    lo = lo.min(dev);
                    hi = hi.max(dev);
                }
                (lo, hi)
            },
        )
        .reduce(
            || (f64::MAX, f64::MIN),
            |a, b| (a.0.min(b.0), a.1.max(b.1)),
        );

    let stddev_range = (stddev_max - stddev_min).max(1e-5);

    // Pass 2: adaptive window choice and thresholding.
    let mut out = vec![0u16; src.len()];
    out.par_chunks_mut(w as usize)
        .enumerate()
        .for_each(|(y, out_row)| {
            let y = y as i64;
            let (py1, py2) = clamp_span(y, half_y, h);

            for (x, out_px) in out_row.iter_mut().enumerate() {
                let x = x as i64;
                let (px1, px2) = clamp_span(x, half_x, w);

                // Sub-window when ambiguity dominates the neighbourhood.
                let n_w_black = black.rect_sum(px1, py1, px2, py2);
                let n_w_red = red.rect_sum(px1, py1, px2, py2);
                let (fx, fy) = if n_w_red > n_w_black {
                    (half_x / 2, half_y / 2)
                } else {
                    (half_x, half_y)
                };

                let (x1, x2) = clamp_span(x, fx, w);
                let (y1, y2) = clamp_span(y, fy, h);
                let (mean_w, stddev_w) = rect_mean_stddev(&sum, &sum_sq, x1, y1, x2, y2);

                let k_w = if stddev_w < 5.0 {
                    1.4
                } else if stddev_w > 30.0 {
                    0.8
                } else {
                    1.0
                };

                // A fully uniform window gives threshold -inf (stays
                // white); an all-zero window gives NaN (stays black).
                let stddev_adaptive = (stddev_w - stddev_min) / stddev_range;
                let threshold = mean_w
                    - k_w
                        * ((mean_w * mean_w - stddev_w)
                            / ((mean_global + stddev_w) * (stddev_adaptive + stddev_w)));

                let sample = src[y as usize * w as usize + x as usize];
                *out_px = if f64::from(sample) > threshold { 255 } else { 0 };
            }
        });

    raster.plane_mut(0).copy_from_slice(&out);
    Ok(())
}

/// Inclusive window span centred on `c` with half-width `half`, clamped
/// to `0..len`.
#[inline]
fn clamp_span(c: i64, half: i64, len: u32) -> (u32, u32) {
    let lo = (c - half).max(0) as u32;
    let hi = ((c + half).min(len as i64 - 1)) as u32;
    (lo, hi)
}
