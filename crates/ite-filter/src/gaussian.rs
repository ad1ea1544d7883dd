//! Separable Gaussian blur
//!
//! Isotropic 2-D Gaussian implemented as a horizontal then a vertical 1-D
//! pass. Kernel radius is ceil(3 sigma); taps are normalised to sum to 1.
//! Each pass rounds back into the 8-bit sample range, and the passes write
//! into a scratch buffer so no worker ever reads a sample another worker
//! has written.

use ite_core::{clamp_to_u8, Boundary, Raster};
use rayon::prelude::*;

/// Blur `raster` in place with standard deviation `sigma`.
///
/// `sigma <= 0` is an identity transform.
pub fn gaussian_blur(raster: &mut Raster, sigma: f32, boundary: Boundary) {
    if sigma <= 0.0 {
        return;
    }
    if raster.width() <= 1 && raster.height() <= 1 {
        return;
    }

    let kernel = gaussian_kernel(sigma);
    let w = raster.width() as usize;
    let h = raster.height() as usize;

    for c in 0..raster.channels() {
        let plane = raster.plane_mut(c);
        let tmp = horizontal_pass(plane, w, h, &kernel, boundary);
        vertical_pass(&tmp, plane, w, h, &kernel, boundary);
    }
}

/// Normalised 1-D Gaussian taps; radius ceil(3 sigma), at least 1.
pub(crate) fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let r = (3.0 * sigma).ceil().max(1.0) as i32;
    let inv_2s2 = 1.0 / (2.0 * sigma * sigma);

    let mut taps: Vec<f32> = (-r..=r)
        .map(|i| (-((i * i) as f32) * inv_2s2).exp())
        .collect();
    let sum: f32 = taps.iter().sum();
    for t in taps.iter_mut() {
        *t /= sum;
    }
    taps
}

fn horizontal_pass(src: &[u16], w: usize, h: usize, kernel: &[f32], boundary: Boundary) -> Vec<u16> {
    let r = (kernel.len() / 2) as i64;
    let mut out = vec![0u16; w * h];

    out.par_chunks_mut(w).enumerate().for_each(|(y, out_row)| {
        let src_row = &src[y * w..(y + 1) * w];
        for (x, out_px) in out_row.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in kernel.iter().enumerate() {
                let xx = x as i64 + k as i64 - r;
                match boundary {
                    Boundary::Replicate => {
                        let xx = xx.clamp(0, w as i64 - 1) as usize;
                        acc += tap * f32::from(src_row[xx]);
                    }
                    Boundary::Zero => {
                        if (0..w as i64).contains(&xx) {
                            acc += tap * f32::from(src_row[xx as usize]);
                        }
                    }
                }
            }
            *out_px = clamp_to_u8(acc);
        }
    });

    out
}

fn vertical_pass(
    src: &[u16],
    out: &mut [u16],
    w: usize,
    h: usize,
    kernel: &[f32],
    boundary: Boundary,
) {
    let r = (kernel.len() / 2) as i64;

    out.par_chunks_mut(w).enumerate().for_each(|(y, out_row)| {
        for (x, out_px) in out_row.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in kernel.iter().enumerate() {
                let yy = y as i64 + k as i64 - r;
                match boundary {
                    Boundary::Replicate => {
                        let yy = yy.clamp(0, h as i64 - 1) as usize;
                        acc += tap * f32::from(src[yy * w + x]);
                    }
                    Boundary::Zero => {
                        if (0..h as i64).contains(&yy) {
                            acc += tap * f32::from(src[yy as usize * w + x]);
                        }
                    }
                }
            }
            *out_px = clamp_to_u8(acc);
        }
    });
}
