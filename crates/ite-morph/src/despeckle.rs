//! Connected-component despeckle
//!
//! Removes foreground blobs smaller than a pixel-count threshold from a
//! binary raster. Foreground is the dark (0) class; labelling runs the
//! classical two-pass scheme with a union-find over provisional labels,
//! then a dense relabel so component sizes index a flat vector.

use crate::{MorphError, MorphResult};
use ite_core::Raster;
use rayon::prelude::*;

/// Connectivity for component labelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// 4-way: horizontal and vertical neighbours only.
    Four,
    /// 8-way: diagonal neighbours connect as well.
    #[default]
    Eight,
}

impl Connectivity {
    /// Map the option record's `diagonal_connections` flag.
    pub fn from_diagonal_flag(diagonal: bool) -> Self {
        if diagonal {
            Connectivity::Eight
        } else {
            Connectivity::Four
        }
    }
}

/// Union-find over provisional labels with path halving.
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        // Index 0 is the background pseudo-label.
        UnionFind { parent: vec![0] }
    }

    fn make_label(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grand = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grand;
            x = grand;
        }
        x
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // Smaller root wins so the final ids follow scan order.
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}

/// Remove foreground components smaller than `threshold` pixels.
///
/// `threshold == 0` is a no-op. The binary invariant is preserved:
/// erased components become background (255).
///
/// # Errors
///
/// Returns [`MorphError::WrongChannelCount`] for multi-channel input.
pub fn despeckle(raster: &mut Raster, threshold: u32, connectivity: Connectivity) -> MorphResult<()> {
    if raster.channels() != 1 {
        return Err(MorphError::WrongChannelCount(raster.channels()));
    }
    if threshold == 0 {
        return Ok(());
    }

    let w = raster.width() as usize;
    let h = raster.height() as usize;

    let (labels, sizes) = label_components(raster.plane(0), w, h, connectivity);
    if sizes.len() <= 1 {
        return Ok(());
    }

    raster
        .plane_mut(0)
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            let label_row = &labels[y * w..(y + 1) * w];
            for (px, &label) in row.iter_mut().zip(label_row.iter()) {
                if label > 0 && sizes[label as usize] < threshold {
                    *px = 255;
                }
            }
        });

    Ok(())
}

/// Label the dark (0) pixels of a binary plane.
///
/// Returns the dense label map (0 = background, 1..=K components in scan
/// order) and the per-component pixel counts indexed by label.
pub fn label_components(
    plane: &[u16],
    w: usize,
    h: usize,
    connectivity: Connectivity,
) -> (Vec<u32>, Vec<u32>) {
    let mut labels = vec![0u32; w * h];
    let mut uf = UnionFind::new();

    // Pass 1: provisional labels from the already-visited neighbours
    // (left, top row), recording equivalences.
    for y in 0..h {
        for x in 0..w {
            if plane[y * w + x] != 0 {
                continue;
            }
            let idx = y * w + x;

            let mut neighbours = [0u32; 4];
            let mut n = 0;
            if x > 0 && labels[idx - 1] > 0 {
                neighbours[n] = labels[idx - 1];
                n += 1;
            }
            if y > 0 {
                let up = idx - w;
                if labels[up] > 0 {
                    neighbours[n] = labels[up];
                    n += 1;
                }
                if connectivity == Connectivity::Eight {
                    if x > 0 && labels[up - 1] > 0 {
                        neighbours[n] = labels[up - 1];
                        n += 1;
                    }
                    if x + 1 < w && labels[up + 1] > 0 {
                        neighbours[n] = labels[up + 1];
                        n += 1;
                    }
                }
            }

            if n == 0 {
                labels[idx] = uf.make_label();
            } else {
                let min = *neighbours[..n].iter().min().unwrap();
                labels[idx] = min;
                for &other in &neighbours[..n] {
                    uf.union(min, other);
                }
            }
        }
    }

    // Pass 2: resolve to roots, assign dense ids in scan order, tally
    // component sizes.
    let mut dense = vec![0u32; uf.parent.len()];
    let mut sizes = vec![0u32; 1];
    let mut next = 1u32;

    for label in labels.iter_mut() {
        if *label == 0 {
            continue;
        }
        let root = uf.find(*label);
        if dense[root as usize] == 0 {
            dense[root as usize] = next;
            sizes.push(0);
            next += 1;
        }
        *label = dense[root as usize];
        sizes[*label as usize] += 1;
    }

    (labels, sizes)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// White page with dark blobs stamped on.
    fn page_with_blobs() -> Raster {
        let mut r = Raster::filled(20, 20, 1, 255).unwrap();
        // 5-pixel plus shape
        for (x, y) in [(3, 3), (2, 3), (4, 3), (3, 2), (3, 4)] {
            r.set(x, y, 0, 0);
        }
        // 4-pixel square
        for (x, y) in [(10, 10), (11, 10), (10, 11), (11, 11)] {
            r.set(x, y, 0, 0);
        }
        // 3-pixel diagonal
        for (x, y) in [(15, 3), (16, 4), (17, 5)] {
            r.set(x, y, 0, 0);
        }
        r
    }

    #[test]
    fn test_threshold_filters_small_blobs() {
        let mut r = page_with_blobs();
        despeckle(&mut r, 5, Connectivity::Eight).unwrap();

        // The 5-pixel blob survives; 4- and 3-pixel blobs are erased.
        assert_eq!(r.get(3, 3, 0), 0);
        assert_eq!(r.get(2, 3, 0), 0);
        assert_eq!(r.get(10, 10, 0), 255);
        assert_eq!(r.get(11, 11, 0), 255);
        assert_eq!(r.get(15, 3, 0), 255);
        assert_eq!(r.get(16, 4, 0), 255);
        assert!(r.is_binary());
    }

    #[test]
    fn test_threshold_zero_is_noop() {
        let mut r = page_with_blobs();
        let before = r.clone();
        despeckle(&mut r, 0, Connectivity::Eight).unwrap();
        assert_eq!(r, before);
    }

    #[test]
    fn test_connectivity_splits_diagonal_chain() {
        // The 3-pixel diagonal is one 8-connected component but three
        // 4-connected singletons.
        let r = page_with_blobs();
        let (_, sizes8) = label_components(r.plane(0), 20, 20, Connectivity::Eight);
        let (_, sizes4) = label_components(r.plane(0), 20, 20, Connectivity::Four);
        assert_eq!(sizes8.len() - 1, 3);
        assert_eq!(sizes4.len() - 1, 5);
    }

    #[test]
    fn test_label_sizes() {
        let r = page_with_blobs();
        let (labels, sizes) = label_components(r.plane(0), 20, 20, Connectivity::Eight);

        let mut counts = sizes[1..].to_vec();
        counts.sort_unstable();
        assert_eq!(counts, vec![3, 4, 5]);

        // Every labelled pixel is dark, every dark pixel labelled.
        for (i, &v) in r.plane(0).iter().enumerate() {
            assert_eq!(labels[i] > 0, v == 0);
        }
    }

    #[test]
    fn test_u_shape_merges_across_equivalence() {
        // A U shape forces two provisional labels that must merge.
        let mut r = Raster::filled(7, 5, 1, 255).unwrap();
        for y in 0..4 {
            r.set(1, y, 0, 0);
            r.set(5, y, 0, 0);
        }
        for x in 1..=5 {
            r.set(x, 4, 0, 0);
        }
        let (_, sizes) = label_components(r.plane(0), 7, 5, Connectivity::Four);
        assert_eq!(sizes.len() - 1, 1, "single merged component");
        assert_eq!(sizes[1], 13);
    }

    #[test]
    fn test_all_white_and_all_black() {
        let mut white = Raster::filled(8, 8, 1, 255).unwrap();
        despeckle(&mut white, 10, Connectivity::Eight).unwrap();
        assert!(white.samples().iter().all(|&v| v == 255));

        let mut black = Raster::filled(8, 8, 1, 0).unwrap();
        despeckle(&mut black, 10, Connectivity::Eight).unwrap();
        // 64-pixel component is above threshold and survives.
        assert!(black.samples().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_rejects_colour() {
        let mut r = Raster::new(4, 4, 3).unwrap();
        assert!(despeckle(&mut r, 5, Connectivity::Eight).is_err());
    }
}
