//! Separable dilation and erosion
//!
//! A square structuring element of side `k = 2r + 1` decomposes into a
//! horizontal then a vertical 1-D sliding-window max (dilation) or min
//! (erosion). Each 1-D pass runs a monotonic deque of sample indices, so
//! every element enters and leaves the deque at most once: amortised O(1)
//! per output sample, independent of the kernel size.
//!
//! The vertical pass runs over a transposed copy of the horizontal
//! result, which keeps both passes on contiguous rows and lets workers
//! own disjoint row chunks.

use crate::{MorphError, MorphResult};
use ite_core::Raster;
use rayon::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq)]
enum WindowOp {
    Max,
    Min,
}

/// Dilate `raster` in place with a k x k square structuring element.
///
/// Dilation propagates the local maximum, thickening bright regions.
/// `kernel_size <= 1` is an identity transform.
///
/// # Errors
///
/// Returns [`MorphError::WrongChannelCount`] for multi-channel input.
pub fn dilate(raster: &mut Raster, kernel_size: u32) -> MorphResult<()> {
    separable_pass(raster, kernel_size, WindowOp::Max)
}

/// Erode `raster` in place with a k x k square structuring element.
///
/// Erosion propagates the local minimum, thickening dark regions.
/// `kernel_size <= 1` is an identity transform.
///
/// # Errors
///
/// Returns [`MorphError::WrongChannelCount`] for multi-channel input.
pub fn erode(raster: &mut Raster, kernel_size: u32) -> MorphResult<()> {
    separable_pass(raster, kernel_size, WindowOp::Min)
}

fn separable_pass(raster: &mut Raster, kernel_size: u32, op: WindowOp) -> MorphResult<()> {
    if raster.channels() != 1 {
        return Err(MorphError::WrongChannelCount(raster.channels()));
    }
    if kernel_size <= 1 {
        return Ok(());
    }

    let w = raster.width() as usize;
    let h = raster.height() as usize;
    let r = (kernel_size / 2) as usize;

    // Horizontal pass: raster rows -> tmp.
    let src = raster.plane(0);
    let mut tmp = vec![0u16; w * h];
    tmp.par_chunks_mut(w)
        .enumerate()
        .for_each_init(Vec::new, |deque, (y, dst_row)| {
            sliding_window(&src[y * w..(y + 1) * w], dst_row, r, op, deque);
        });

    // Vertical pass: transpose, slide along the (now contiguous)
    // columns, transpose back.
    let tmp_t = transpose(&tmp, w, h);
    let mut out_t = vec![0u16; w * h];
    out_t
        .par_chunks_mut(h)
        .enumerate()
        .for_each_init(Vec::new, |deque, (x, dst_col)| {
            sliding_window(&tmp_t[x * h..(x + 1) * h], dst_col, r, op, deque);
        });

    let out = transpose(&out_t, h, w);
    raster.plane_mut(0).copy_from_slice(&out);
    Ok(())
}

/// 1-D sliding-window min/max over `src` into `dst` with radius `r`.
///
/// `deque` holds indices whose sample values are strictly decreasing
/// (max) or strictly increasing (min) in input order; the front is
/// always the current window extremum. Outside samples do not exist:
/// windows shrink at the edges rather than read a padding value.
fn sliding_window(src: &[u16], dst: &mut [u16], r: usize, op: WindowOp, deque: &mut Vec<usize>) {
    let len = src.len();
    deque.clear();
    let mut head = 0usize;

    for i in 0..len + r {
        // Drop the front index once it leaves the window of the centre
        // sample i - r.
        if head < deque.len() && deque[head] + 2 * r + 1 <= i {
            head += 1;
        }

        if i < len {
            let v = src[i];
            while head < deque.len() {
                let tail = src[deque[deque.len() - 1]];
                let dominated = match op {
                    WindowOp::Max => tail <= v,
                    WindowOp::Min => tail >= v,
                };
                if dominated {
                    deque.pop();
                } else {
                    break;
                }
            }
            deque.push(i);
        }

        if i >= r {
            let centre = i - r;
            if centre < len && head < deque.len() {
                dst[centre] = src[deque[head]];
            }
        }
    }
}

/// Row-major transpose of a `w x h` plane into an `h x w` plane.
fn transpose(src: &[u16], w: usize, h: usize) -> Vec<u16> {
    let mut out = vec![0u16; w * h];
    out.par_chunks_mut(h).enumerate().for_each(|(x, out_row)| {
        for (y, out_px) in out_row.iter_mut().enumerate() {
            *out_px = src[y * w + x];
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse_5x5() -> Raster {
        let mut r = Raster::new(5, 5, 1).unwrap();
        r.set(2, 2, 0, 255);
        r
    }

    #[test]
    fn test_dilation_grows_impulse() {
        let mut r = impulse_5x5();
        dilate(&mut r, 3).unwrap();

        for y in 0..5 {
            for x in 0..5 {
                let inside = (1..=3).contains(&x) && (1..=3).contains(&y);
                assert_eq!(r.get(x, y, 0), if inside { 255 } else { 0 }, "({x},{y})");
            }
        }
    }

    #[test]
    fn test_erosion_removes_impulse() {
        let mut r = impulse_5x5();
        erode(&mut r, 3).unwrap();
        assert!(r.samples().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_erosion_then_dilation_of_block() {
        // A 3x3 block survives an open with k=3: eroded to its centre,
        // dilated back to the block.
        let mut r = Raster::new(7, 7, 1).unwrap();
        for y in 2..5 {
            for x in 2..5 {
                r.set(x, y, 0, 255);
            }
        }
        let block = r.clone();

        erode(&mut r, 3).unwrap();
        assert_eq!(r.get(3, 3, 0), 255);
        assert_eq!(r.plane(0).iter().filter(|&&v| v == 255).count(), 1);

        dilate(&mut r, 3).unwrap();
        assert_eq!(r, block);
    }

    #[test]
    fn test_kernel_one_is_identity() {
        let mut r = impulse_5x5();
        let before = r.clone();
        dilate(&mut r, 1).unwrap();
        erode(&mut r, 1).unwrap();
        assert_eq!(r, before);
    }

    #[test]
    fn test_binary_preserved() {
        let mut r = Raster::new(16, 16, 1).unwrap();
        for i in 0..16 {
            r.set(i, i, 0, 255);
        }
        dilate(&mut r, 5).unwrap();
        assert!(r.is_binary());
        erode(&mut r, 5).unwrap();
        assert!(r.is_binary());
    }

    #[test]
    fn test_grayscale_sliding_extrema() {
        // Non-binary samples: dilation is a true running max.
        let data: Vec<u16> = vec![10, 50, 20, 90, 30];
        let mut r = Raster::from_vec(5, 1, 1, data).unwrap();
        dilate(&mut r, 3).unwrap();
        assert_eq!(r.plane(0), &[50, 50, 90, 90, 90]);

        let data: Vec<u16> = vec![10, 50, 20, 90, 30];
        let mut r = Raster::from_vec(5, 1, 1, data).unwrap();
        erode(&mut r, 3).unwrap();
        assert_eq!(r.plane(0), &[10, 10, 20, 20, 30]);
    }

    #[test]
    fn test_rejects_colour() {
        let mut r = Raster::new(4, 4, 3).unwrap();
        assert!(dilate(&mut r, 3).is_err());
        assert!(erode(&mut r, 3).is_err());
    }
}
