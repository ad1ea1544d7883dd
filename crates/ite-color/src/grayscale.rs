//! Grayscale conversion
//!
//! Rec. 601 luma from RGB; the alpha plane of RGBA input is ignored.

use crate::ColorResult;
use ite_core::Raster;
use rayon::prelude::*;

/// Rec. 601 red weight
pub const WEIGHT_R: f32 = 0.299;
/// Rec. 601 green weight
pub const WEIGHT_G: f32 = 0.587;
/// Rec. 601 blue weight
pub const WEIGHT_B: f32 = 0.114;

/// Convert a raster to single-channel luma.
///
/// Weighted Rec. 601 sum, rounded to nearest and saturated to 0..=255.
/// A single-channel input is returned as a copy.
pub fn to_luma(raster: &Raster) -> ColorResult<Raster> {
    if raster.channels() == 1 {
        return Ok(raster.clone());
    }

    let w = raster.width();
    let h = raster.height();
    let mut out = Raster::new(w, h, 1)?;

    let r_plane = raster.plane(0);
    let g_plane = raster.plane(1);
    let b_plane = raster.plane(2);

    out.plane_mut(0)
        .par_chunks_mut(w as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let start = y * w as usize;
            for (x, out_px) in row.iter_mut().enumerate() {
                let i = start + x;
                let luma = WEIGHT_R * f32::from(r_plane[i])
                    + WEIGHT_G * f32::from(g_plane[i])
                    + WEIGHT_B * f32::from(b_plane[i]);
                *out_px = ite_core::clamp_to_u8(luma);
            }
        });

    Ok(out)
}
