//! Bilinear resize
//!
//! Centre-aligned bilinear sampling, used by skew detection to bring a
//! working copy down to detection size.

use crate::GeometryResult;
use ite_core::{clamp_to_u8, Raster};
use rayon::prelude::*;

/// Resize `raster` to `new_w` x `new_h` with bilinear interpolation.
pub fn resize_bilinear(raster: &Raster, new_w: u32, new_h: u32) -> GeometryResult<Raster> {
    if new_w == raster.width() && new_h == raster.height() {
        return Ok(raster.clone());
    }
    let mut out = Raster::new(new_w, new_h, raster.channels())?;

    let w = raster.width() as usize;
    let h = raster.height() as usize;
    let scale_x = w as f32 / new_w as f32;
    let scale_y = h as f32 / new_h as f32;

    for c in 0..raster.channels() {
        let src = raster.plane(c);
        out.plane_mut(c)
            .par_chunks_mut(new_w as usize)
            .enumerate()
            .for_each(|(y, out_row)| {
                let sy = ((y as f32 + 0.5) * scale_y - 0.5).max(0.0);
                let y0 = (sy as usize).min(h - 1);
                let y1 = (y0 + 1).min(h - 1);
                let fy = sy - y0 as f32;

                for (x, out_px) in out_row.iter_mut().enumerate() {
                    let sx = ((x as f32 + 0.5) * scale_x - 0.5).max(0.0);
                    let x0 = (sx as usize).min(w - 1);
                    let x1 = (x0 + 1).min(w - 1);
                    let fx = sx - x0 as f32;

                    let p00 = f32::from(src[y0 * w + x0]);
                    let p10 = f32::from(src[y0 * w + x1]);
                    let p01 = f32::from(src[y1 * w + x0]);
                    let p11 = f32::from(src[y1 * w + x1]);

                    let top = p00 + fx * (p10 - p00);
                    let bottom = p01 + fx * (p11 - p01);
                    *out_px = clamp_to_u8(top + fy * (bottom - top));
                }
            });
    }

    Ok(out)
}

/// Resize so that the long side does not exceed `max_side`, preserving
/// aspect ratio. Returns a copy when the raster is already small enough.
pub fn resize_to_max_side(raster: &Raster, max_side: u32) -> GeometryResult<Raster> {
    let long_side = raster.width().max(raster.height());
    if long_side <= max_side {
        return Ok(raster.clone());
    }

    let scale = f64::from(max_side) / f64::from(long_side);
    let new_w = ((f64::from(raster.width()) * scale).round() as u32).max(1);
    let new_h = ((f64::from(raster.height()) * scale).round() as u32).max(1);
    resize_bilinear(raster, new_w, new_h)
}
