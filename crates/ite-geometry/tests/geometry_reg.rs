//! Geometry regressions: skew detection precision and rotation
//! round-trips.

use ite_core::{Boundary, Raster};
use ite_geometry::{deskew, detect_skew, rotate_bilinear};

/// White page with a 3-pixel-thick centre line tilted counter-clockwise
/// by `angle_deg`.
fn line_page(side: u32, angle_deg: f64) -> Raster {
    let mut r = Raster::filled(side, side, 1, 255).unwrap();
    let c = f64::from(side - 1) / 2.0;
    let slope = angle_deg.to_radians().tan();
    for x in (side / 10)..(side - side / 10) {
        let yc = c - slope * (f64::from(x) - c);
        for dy in -1..=1 {
            let y = yc.round() as i64 + dy;
            if (0..i64::from(side)).contains(&y) {
                r.set(x, y as u32, 0, 0);
            }
        }
    }
    r
}

/// Variance of the horizontal projection profile of dark pixels.
fn projection_variance(r: &Raster) -> f64 {
    let h = r.height();
    let counts: Vec<f64> = (0..h)
        .map(|y| (0..r.width()).filter(|&x| r.get(x, y, 0) < 128).count() as f64)
        .collect();
    let mean = counts.iter().sum::<f64>() / f64::from(h);
    counts.iter().map(|c| (c - mean) * (c - mean)).sum::<f64>() / f64::from(h)
}

#[test]
fn test_detection_precision_across_angles() {
    for constructed in [4.0f64, 10.0, -7.0] {
        let page = line_page(100, constructed);
        let det = detect_skew(&page).unwrap();
        assert!(
            (det.angle + constructed).abs() <= 0.1,
            "constructed {constructed}, detected {}",
            det.angle
        );
        assert!(det.should_rotate());
    }
}

#[test]
fn test_deskew_beats_skewed_projection() {
    let skewed = line_page(100, 10.0);
    let skewed_variance = projection_variance(&skewed);

    let mut corrected = skewed.clone();
    let applied = deskew(&mut corrected).unwrap();
    assert!(applied.is_some());

    let corrected_variance = projection_variance(&corrected);
    assert!(
        corrected_variance >= skewed_variance * 1.005,
        "corrected {corrected_variance} vs skewed {skewed_variance}"
    );
}

#[test]
fn test_deskew_leaves_level_page_alone() {
    let mut page = line_page(100, 0.0);
    let before = page.clone();
    let applied = deskew(&mut page).unwrap();
    assert!(applied.is_none());
    assert_eq!(page, before);
}

#[test]
fn test_rotation_zero_is_bit_exact() {
    let page = line_page(64, 3.0);
    let same = rotate_bilinear(&page, 0.0, Boundary::Replicate).unwrap();
    assert_eq!(same, page);
}

#[test]
fn test_worker_count_invariance_of_detection() {
    let page = line_page(120, 6.0);

    let run = |threads: usize| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
            .install(|| detect_skew(&page).unwrap().angle)
    };

    assert_eq!(run(1), run(8));
}
