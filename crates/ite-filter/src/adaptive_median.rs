//! Adaptive median filter (AMF)
//!
//! Removes impulse noise aggressively in flat regions while leaving
//! locally structured pixels untouched. Each pixel starts with a 3x3
//! window; when the window median is uninformative (pinned to the window
//! min or max, the signature of impulse contamination) the window grows
//! one ring at a time, feeding the new ring into a 256-bin histogram so
//! expansion costs O(r) rather than O(r^2) per step.
//!
//! Boundary handling is replicate-by-clamp; no other policy is supported.

use crate::{FilterError, FilterResult};
use ite_core::Raster;
use rayon::prelude::*;

/// Per-worker histogram with a touched-bin list so reset is O(touched).
struct WindowHistogram {
    bins: [u32; 256],
    touched: [u8; 256],
    n_touched: usize,
}

impl WindowHistogram {
    fn new() -> Self {
        WindowHistogram {
            bins: [0; 256],
            touched: [0; 256],
            n_touched: 0,
        }
    }

    #[inline]
    fn add(&mut self, v: u16) {
        let b = (v & 0xff) as usize;
        if self.bins[b] == 0 {
            self.touched[self.n_touched] = b as u8;
            self.n_touched += 1;
        }
        self.bins[b] += 1;
    }

    #[inline]
    fn reset(&mut self) {
        for i in 0..self.n_touched {
            self.bins[self.touched[i] as usize] = 0;
        }
        self.n_touched = 0;
    }

    /// Min, median and max of the `total` samples currently binned.
    fn min_med_max(&self, total: usize) -> (u16, u16, u16) {
        let mut zmin = 0u16;
        for v in 0..256 {
            if self.bins[v] > 0 {
                zmin = v as u16;
                break;
            }
        }
        let mut zmax = 255u16;
        for v in (0..256).rev() {
            if self.bins[v] > 0 {
                zmax = v as u16;
                break;
            }
        }

        let target = (total + 1) / 2;
        let mut cum = 0usize;
        for v in 0..256 {
            cum += self.bins[v] as usize;
            if cum >= target {
                return (zmin, v as u16, zmax);
            }
        }
        (zmin, zmax, zmax)
    }
}

/// Adaptive-median filter `raster` in place.
///
/// `max_window` is the largest window side, odd and at least 3.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameters`] for an even or < 3 maximum
/// window.
pub fn adaptive_median(raster: &mut Raster, max_window: u32) -> FilterResult<()> {
    if max_window < 3 {
        return Err(FilterError::InvalidParameters(format!(
            "adaptive median max window must be >= 3, got {max_window}"
        )));
    }
    if max_window % 2 == 0 {
        return Err(FilterError::InvalidParameters(format!(
            "adaptive median max window must be odd, got {max_window}"
        )));
    }

    let w = raster.width() as usize;
    let h = raster.height() as usize;
    if w < 2 || h < 2 {
        return Ok(());
    }

    let max_r = ((max_window - 1) / 2) as i64;

    for c in 0..raster.channels() {
        let src = raster.plane(c).to_vec();

        raster
            .plane_mut(c)
            .par_chunks_mut(w)
            .enumerate()
            .for_each_init(WindowHistogram::new, |hist, (y, out_row)| {
                let y = y as i64;
                for (x, out_px) in out_row.iter_mut().enumerate() {
                    *out_px = filter_pixel(&src, w, h, x as i64, y, max_r, hist);
                }
            });
    }

    Ok(())
}

#[inline]
fn sample(src: &[u16], w: usize, h: usize, x: i64, y: i64) -> u16 {
    let xc = x.clamp(0, w as i64 - 1) as usize;
    let yc = y.clamp(0, h as i64 - 1) as usize;
    src[yc * w + xc]
}

fn filter_pixel(
    src: &[u16],
    w: usize,
    h: usize,
    x: i64,
    y: i64,
    max_r: i64,
    hist: &mut WindowHistogram,
) -> u16 {
    let centre = sample(src, w, h, x, y);

    // r = 1 fast path: gather the 3x3 and run the sorting network.
    let mut n = [0u16; 9];
    let mut i = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            n[i] = sample(src, w, h, x + dx, y + dy);
            i += 1;
        }
    }
    let zmed = median9(n);
    let zmin = *n.iter().min().unwrap();
    let zmax = *n.iter().max().unwrap();

    if zmin < zmed && zmed < zmax {
        return stage_b(centre, zmin, zmed, zmax);
    }
    if max_r == 1 {
        return zmed;
    }

    // Expand: the histogram starts from the 3x3 and only ever receives
    // the newly added ring.
    hist.reset();
    for &v in &n {
        hist.add(v);
    }

    let mut last_med = zmed;
    for r in 2..=max_r {
        for dy in -r..=r {
            hist.add(sample(src, w, h, x - r, y + dy));
            hist.add(sample(src, w, h, x + r, y + dy));
        }
        for dx in -(r - 1)..=(r - 1) {
            hist.add(sample(src, w, h, x + dx, y - r));
            hist.add(sample(src, w, h, x + dx, y + r));
        }

        let total = ((2 * r + 1) * (2 * r + 1)) as usize;
        let (zmin, zmed, zmax) = hist.min_med_max(total);
        if zmin < zmed && zmed < zmax {
            return stage_b(centre, zmin, zmed, zmax);
        }
        last_med = zmed;
    }

    last_med
}

/// Stage B: keep the centre sample when it is not itself pinned to the
/// window extremes, otherwise output the median.
#[inline]
fn stage_b(centre: u16, zmin: u16, zmed: u16, zmax: u16) -> u16 {
    if zmin < centre && centre < zmax {
        centre
    } else {
        zmed
    }
}

/// Exact median of 9 via a fixed comparison network.
#[inline]
fn median9(mut p: [u16; 9]) -> u16 {
    #[inline]
    fn sort2(p: &mut [u16; 9], a: usize, b: usize) {
        if p[a] > p[b] {
            p.swap(a, b);
        }
    }

    sort2(&mut p, 1, 2);
    sort2(&mut p, 4, 5);
    sort2(&mut p, 7, 8);
    sort2(&mut p, 0, 1);
    sort2(&mut p, 3, 4);
    sort2(&mut p, 6, 7);
    sort2(&mut p, 1, 2);
    sort2(&mut p, 4, 5);
    sort2(&mut p, 7, 8);
    sort2(&mut p, 0, 3);
    sort2(&mut p, 5, 8);
    sort2(&mut p, 4, 7);
    sort2(&mut p, 3, 6);
    sort2(&mut p, 1, 4);
    sort2(&mut p, 2, 5);
    sort2(&mut p, 4, 7);
    sort2(&mut p, 4, 2);
    sort2(&mut p, 6, 4);
    sort2(&mut p, 4, 2);
    p[4]
}
