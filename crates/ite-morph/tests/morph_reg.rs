//! Morphology regressions: impulse scenarios, despeckle filtering,
//! binary preservation through operation chains.

use ite_core::Raster;
use ite_morph::{despeckle, dilate, erode, Connectivity};

fn impulse(side: u32) -> Raster {
    let mut r = Raster::new(side, side, 1).unwrap();
    r.set(side / 2, side / 2, 0, 255);
    r
}

#[test]
fn test_dilation_makes_centre_block() {
    let mut r = impulse(5);
    dilate(&mut r, 3).unwrap();

    let white: Vec<(u32, u32)> = (0..5)
        .flat_map(|y| (0..5).map(move |x| (x, y)))
        .filter(|&(x, y)| r.get(x, y, 0) == 255)
        .collect();
    assert_eq!(white.len(), 9);
    assert!(white.iter().all(|&(x, y)| (1..=3).contains(&x) && (1..=3).contains(&y)));
}

#[test]
fn test_erosion_removes_impulse() {
    let mut r = impulse(5);
    erode(&mut r, 3).unwrap();
    assert!(r.samples().iter().all(|&v| v == 0));
}

#[test]
fn test_despeckle_size_threshold() {
    // Three dark blobs of 5, 4 and 3 pixels on a white page; threshold
    // 5 with 8-connectivity keeps only the largest.
    let mut r = Raster::filled(20, 20, 1, 255).unwrap();
    for (x, y) in [(3u32, 3u32), (4, 3), (5, 3), (3, 4), (3, 5)] {
        r.set(x, y, 0, 0);
    }
    for (x, y) in [(12u32, 4u32), (13, 4), (12, 5), (13, 5)] {
        r.set(x, y, 0, 0);
    }
    for (x, y) in [(6u32, 14u32), (7, 15), (8, 16)] {
        r.set(x, y, 0, 0);
    }

    despeckle(&mut r, 5, Connectivity::Eight).unwrap();

    assert_eq!(r.get(3, 3, 0), 0, "5-pixel blob survives");
    assert_eq!(r.get(12, 4, 0), 255, "4-pixel blob erased");
    assert_eq!(r.get(7, 15, 0), 255, "3-pixel blob erased");
    assert!(r.is_binary());
}

#[test]
fn test_chain_preserves_binary_invariant() {
    // 4-row dark stroke: thick enough to survive a k=3 dilation (which
    // grows the bright background) and grow back under erosion.
    let mut r = Raster::filled(32, 32, 1, 255).unwrap();
    for y in 15..19 {
        for x in 4..28 {
            r.set(x, y, 0, 0);
        }
    }
    r.set(2, 2, 0, 0);

    despeckle(&mut r, 3, Connectivity::Four).unwrap();
    dilate(&mut r, 3).unwrap();
    erode(&mut r, 3).unwrap();

    assert!(r.is_binary());
    assert_eq!(r.get(2, 2, 0), 255, "isolated speck removed");
    assert_eq!(r.get(16, 16, 0), 0, "stroke survives");
}

#[test]
fn test_worker_count_invariance() {
    let mut src = Raster::new(61, 45, 1).unwrap();
    let mut state = 0xdead_beefu32;
    for v in src.plane_mut(0).iter_mut() {
        state = state.wrapping_mul(1664525).wrapping_add(1013904223);
        *v = if state & 0x8000_0000 != 0 { 255 } else { 0 };
    }

    let run = |threads: usize| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
            .install(|| {
                let mut r = src.clone();
                dilate(&mut r, 5).unwrap();
                erode(&mut r, 3).unwrap();
                despeckle(&mut r, 4, Connectivity::Eight).unwrap();
                r
            })
    };

    assert_eq!(run(1), run(8));
}
