//! Otsu global binarization with border polarity
//!
//! The classic between-class-variance threshold plus a polarity decision:
//! the mean intensity of a 5% border strip tells whether the page
//! background is bright or dark, so foreground always comes out black (0)
//! regardless of scan polarity.

use crate::{BinarizeError, BinarizeResult};
use ite_core::Raster;
use rayon::prelude::*;

/// Binarize `raster` in place with Otsu's threshold.
///
/// Foreground maps to 0, background to 255.
///
/// # Errors
///
/// Returns [`BinarizeError::WrongChannelCount`] for non-luma input.
pub fn binarize_otsu(raster: &mut Raster) -> BinarizeResult<()> {
    if raster.channels() != 1 {
        return Err(BinarizeError::WrongChannelCount(raster.channels()));
    }

    let threshold = otsu_threshold(raster.plane(0));
    let border = border_mean(raster);
    let light_background = border > f64::from(threshold);

    raster
        .plane_mut(0)
        .par_chunks_mut(1 << 14)
        .for_each(|chunk| {
            for v in chunk.iter_mut() {
                let foreground = if light_background {
                    *v <= threshold
                } else {
                    *v > threshold
                };
                *v = if foreground { 0 } else { 255 };
            }
        });

    Ok(())
}

/// Otsu's threshold over a 256-bin histogram.
///
/// Maximises the between-class variance `w_b * w_f * (m_b - m_f)^2`;
/// ties resolve to the lowest candidate.
pub fn otsu_threshold(plane: &[u16]) -> u16 {
    let n = plane.len();
    if n == 0 {
        return 128;
    }

    let hist = histogram(plane);

    let mut sum_all = 0.0f64;
    for (t, &c) in hist.iter().enumerate() {
        sum_all += t as f64 * c as f64;
    }

    let mut sum_b = 0.0f64;
    let mut w_b = 0u64;
    let mut max_between = -1.0f64;
    let mut best_t = 128u16;

    for (t, &c) in hist.iter().enumerate() {
        w_b += c;
        if w_b == 0 {
            continue;
        }
        let w_f = n as u64 - w_b;
        if w_f == 0 {
            break;
        }

        sum_b += t as f64 * c as f64;

        let m_b = sum_b / w_b as f64;
        let m_f = (sum_all - sum_b) / w_f as f64;
        let between = w_b as f64 * w_f as f64 * (m_b - m_f) * (m_b - m_f);
        if between > max_between {
            max_between = between;
            best_t = t as u16;
        }
    }

    best_t
}

/// Mean intensity of a border strip covering 5% of the short side,
/// subsampled with stride 2.
pub fn border_mean(raster: &Raster) -> f64 {
    let w = raster.width() as usize;
    let h = raster.height() as usize;
    let plane = raster.plane(0);

    let b = ((0.05 * w.min(h) as f64).floor() as usize).max(1);
    let step = 2usize;

    let mut sum = 0u64;
    let mut count = 0u64;
    let mut add = |x: usize, y: usize| {
        sum += u64::from(plane[y * w + x]);
        count += 1;
    };

    // Top and bottom strips
    for y in (0..b.min(h)).step_by(step) {
        for x in (0..w).step_by(step) {
            add(x, y);
        }
    }
    for y in (h.saturating_sub(b)..h).step_by(step) {
        for x in (0..w).step_by(step) {
            add(x, y);
        }
    }
    // Left and right strips, between the horizontal ones
    for y in (b..h.saturating_sub(b)).step_by(step) {
        for x in (0..b.min(w)).step_by(step) {
            add(x, y);
        }
        for x in (w.saturating_sub(b)..w).step_by(step) {
            add(x, y);
        }
    }

    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

fn histogram(plane: &[u16]) -> [u64; 256] {
    plane
        .par_chunks(1 << 14)
        .fold(
            || [0u64; 256],
            |mut local, chunk| {
                for &v in chunk {
                    local[v as usize & 0xff] += 1;
                }
                local
            },
        )
        .reduce(
            || [0u64; 256],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b.iter()) {
                    *x += y;
                }
                a
            },
        )
}
