//! Colour pass
//!
//! Composes a binary text mask onto the original colour image: background
//! pixels (mask = 255) are forced to white, foreground pixels keep their
//! original colour. Background is hard-coded white; this is not a general
//! alpha compositor.

use crate::{ColorError, ColorResult};
use ite_core::Raster;
use rayon::prelude::*;

/// Apply the binary `mask` onto `colour` in place.
///
/// # Errors
///
/// - [`ColorError::WrongChannelCount`] when the mask is not single-channel
///   or the colour raster has fewer than 3 channels
/// - [`ColorError::DimensionMismatch`] when the two rasters disagree on
///   size
pub fn colour_pass(mask: &Raster, colour: &mut Raster) -> ColorResult<()> {
    if mask.channels() != 1 {
        return Err(ColorError::WrongChannelCount {
            expected: "1",
            actual: mask.channels(),
        });
    }
    if colour.channels() < 3 {
        return Err(ColorError::WrongChannelCount {
            expected: "3 or 4",
            actual: colour.channels(),
        });
    }
    if mask.width() != colour.width() || mask.height() != colour.height() {
        return Err(ColorError::DimensionMismatch(
            mask.width(),
            mask.height(),
            colour.width(),
            colour.height(),
        ));
    }

    let w = colour.width() as usize;
    let mask_plane = mask.plane(0);

    for c in 0..3 {
        colour
            .plane_mut(c)
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| {
                let mask_row = &mask_plane[y * w..(y + 1) * w];
                for (px, &m) in row.iter_mut().zip(mask_row.iter()) {
                    if m == 255 {
                        *px = 255;
                    }
                }
            });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn green_raster(w: u32, h: u32) -> Raster {
        let mut r = Raster::new(w, h, 3).unwrap();
        r.plane_mut(1).fill(200);
        r
    }

    #[test]
    fn test_all_background_turns_white() {
        let mask = Raster::filled(5, 5, 1, 255).unwrap();
        let mut colour = green_raster(5, 5);
        colour_pass(&mask, &mut colour).unwrap();
        for c in 0..3 {
            assert!(colour.plane(c).iter().all(|&v| v == 255));
        }
    }

    #[test]
    fn test_all_foreground_is_identity() {
        let mask = Raster::filled(5, 5, 1, 0).unwrap();
        let mut colour = green_raster(5, 5);
        let before = colour.clone();
        colour_pass(&mask, &mut colour).unwrap();
        assert_eq!(colour, before);
    }

    #[test]
    fn test_plus_mask_keeps_arms() {
        // White mask with a black "+" through the centre of a 5x5.
        let mut mask = Raster::filled(5, 5, 1, 255).unwrap();
        for i in 0..5 {
            mask.set(i, 2, 0, 0);
            mask.set(2, i, 0, 0);
        }
        let mut colour = green_raster(5, 5);
        colour_pass(&mask, &mut colour).unwrap();

        // Arms keep the original green, background is white.
        assert_eq!(colour.get(0, 2, 1), 200);
        assert_eq!(colour.get(2, 4, 1), 200);
        assert_eq!(colour.get(0, 2, 0), 0);
        assert_eq!(colour.get(0, 0, 0), 255);
        assert_eq!(colour.get(0, 0, 1), 255);
        assert_eq!(colour.get(4, 0, 2), 255);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let mask3 = Raster::new(4, 4, 3).unwrap();
        let mut colour = green_raster(4, 4);
        assert!(colour_pass(&mask3, &mut colour).is_err());

        let mask = Raster::new(4, 4, 1).unwrap();
        let mut gray = Raster::new(4, 4, 1).unwrap();
        assert!(colour_pass(&mask, &mut gray).is_err());

        let mask_small = Raster::new(3, 4, 1).unwrap();
        assert!(colour_pass(&mask_small, &mut colour).is_err());
    }
}
