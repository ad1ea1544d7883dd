//! Colour-operation regressions: luma weights, stretch robustness,
//! colour-pass identities.

use ite_color::{colour_pass, contrast_stretch, to_luma};
use ite_core::Raster;

#[test]
fn test_rec601_primaries() {
    let mut r = Raster::new(2, 1, 3).unwrap();
    r.set(0, 0, 0, 255); // red
    r.set(1, 0, 1, 255); // green

    let luma = to_luma(&r).unwrap();
    assert_eq!(luma.get(0, 0, 0), 76);
    assert_eq!(luma.get(1, 0, 0), 150);
}

#[test]
fn test_stretch_ignores_outliers() {
    // Bulk in [100, 150] with single 0 and 255 outliers (2% of the
    // pixels): the bulk still stretches towards the full range.
    let mut r = Raster::new(10, 10, 1).unwrap();
    for y in 0..10 {
        for x in 0..10 {
            r.set(x, y, 0, 100 + ((x * 7 + y * 13) % 51) as u16);
        }
    }
    r.set(0, 0, 0, 0);
    r.set(9, 9, 0, 255);

    let orig = r.clone();
    contrast_stretch(&mut r);

    for y in 0..10 {
        for x in 0..10 {
            match orig.get(x, y, 0) {
                100 => assert!(r.get(x, y, 0) < 50),
                150 => assert!(r.get(x, y, 0) > 200),
                _ => {}
            }
        }
    }
}

#[test]
fn test_colour_pass_identities() {
    let mut green = Raster::new(6, 6, 3).unwrap();
    green.plane_mut(1).fill(180);

    // All-background mask whitens everything.
    let white_mask = Raster::filled(6, 6, 1, 255).unwrap();
    let mut a = green.clone();
    colour_pass(&white_mask, &mut a).unwrap();
    assert!(a.samples().iter().all(|&v| v == 255));

    // All-foreground mask changes nothing.
    let black_mask = Raster::filled(6, 6, 1, 0).unwrap();
    let mut b = green.clone();
    colour_pass(&black_mask, &mut b).unwrap();
    assert_eq!(b, green);
}

#[test]
fn test_worker_count_invariance() {
    let mut src = Raster::new(64, 64, 3).unwrap();
    let mut state = 0x1234_5678u32;
    for c in 0..3 {
        for v in src.plane_mut(c).iter_mut() {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            *v = (state >> 24) as u16;
        }
    }

    let run = |threads: usize| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
            .install(|| {
                let mut luma = to_luma(&src).unwrap();
                contrast_stretch(&mut luma);
                luma
            })
    };

    assert_eq!(run(1), run(8));
}
