//! Robust linear contrast stretch
//!
//! Clips the darkest and brightest 1% of samples so isolated outliers
//! cannot pin the range, then stretches the remaining interval to 0..=255
//! through a 256-entry lookup table.

use ite_core::Raster;
use rayon::prelude::*;

/// Fraction of samples ignored at each end of the histogram.
const CLIP_FRACTION: u64 = 100; // 1/100 = 1%

/// Stretch the sample range of `raster` in place.
///
/// The lower cutoff p1 is the lowest intensity whose cumulative histogram
/// count exceeds 1% of the samples; p99 is the analogue from the top. When
/// p99 <= p1 (solid-colour image) the call is a no-op.
pub fn contrast_stretch(raster: &mut Raster) {
    let hist = histogram(raster.samples());
    let total: u64 = raster.samples().len() as u64;
    let cutoff = total / CLIP_FRACTION;

    let mut p1 = 0u16;
    let mut count = 0u64;
    for (i, &c) in hist.iter().enumerate() {
        count += c;
        if count > cutoff {
            p1 = i as u16;
            break;
        }
    }

    let mut p99 = 255u16;
    count = 0;
    for (i, &c) in hist.iter().enumerate().rev() {
        count += c;
        if count > cutoff {
            p99 = i as u16;
            break;
        }
    }

    if p99 <= p1 {
        return;
    }

    let scale = 255.0 / f32::from(p99 - p1);
    let mut lut = [0u16; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        let i = i as u16;
        *entry = if i <= p1 {
            0
        } else if i >= p99 {
            255
        } else {
            (f32::from(i - p1) * scale).round() as u16
        };
    }

    raster
        .samples_mut()
        .par_chunks_mut(1 << 14)
        .for_each(|chunk| {
            for v in chunk.iter_mut() {
                *v = lut[*v as usize & 0xff];
            }
        });
}

/// 256-bin histogram of all samples, accumulated through per-worker local
/// bins merged once at the end.
fn histogram(samples: &[u16]) -> [u64; 256] {
    samples
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_image_is_noop() {
        let mut r = Raster::filled(10, 10, 1, 128).unwrap();
        let before = r.clone();
        contrast_stretch(&mut r);
        assert_eq!(r, before);
    }

    #[test]
    fn test_outliers_are_clipped() {
        // 10x10 = 100 samples: bulk in [100, 150], one 0 and one 255
        // outlier (2% total). The bulk must still stretch.
        let mut r = Raster::new(10, 10, 1).unwrap();
        for y in 0..10 {
            for x in 0..10 {
                r.set(x, y, 0, 100 + ((x + 10 * y) % 51) as u16);
            }
        }
        r.set(0, 0, 0, 0);
        r.set(9, 9, 0, 255);

        contrast_stretch(&mut r);

        let low = r.get(1, 0, 0); // was 101
        let high = r.get(8, 9, 0); // was 148
        assert!(low < 50, "bulk low end must map near 0, got {low}");
        assert!(high > 200, "bulk high end must map near 255, got {high}");
    }

    #[test]
    fn test_idempotent_within_rounding() {
        let mut r = Raster::new(16, 16, 1).unwrap();
        for y in 0..16 {
            for x in 0..16 {
                r.set(x, y, 0, (x * 16 + y) as u16);
            }
        }
        contrast_stretch(&mut r);
        let once = r.clone();
        contrast_stretch(&mut r);

        for (a, b) in once.samples().iter().zip(r.samples().iter()) {
            assert!((i32::from(*a) - i32::from(*b)).abs() <= 2);
        }
    }

    #[test]
    fn test_output_stays_in_range() {
        let mut r = Raster::new(8, 8, 1).unwrap();
        for (i, v) in r.plane_mut(0).iter_mut().enumerate() {
            *v = (40 + i * 2) as u16;
        }
        contrast_stretch(&mut r);
        assert!(r.samples().iter().all(|&v| v <= 255));
    }
}
