// Ordered-dither threshold matrices (Bayer construction).
// Visual expectation: the matrix decides the crosshatch pattern you see in the
// dithered output; a 4x4 matrix gives the classic fine checkerboard texture.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::{Error, Result};

/// Square table of ranks 0..size²-1, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThresholdMatrix {
    size: usize,
    ranks: Vec<u32>,
}

impl ThresholdMatrix {
    /// Build a `size`x`size` Bayer matrix. `size` must be a power of two >= 2.
    pub fn generate(size: usize) -> Result<Self> {
        if size < 2 || !size.is_power_of_two() {
            return Err(Error::MatrixSize(size));
        }
        Ok(Self { size, ranks: bayer_ranks(size) })
    }

    /// Side length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Integer rank at (x, y), tiled: coordinates wrap every N pixels.
    #[inline]
    pub fn rank(&self, x: usize, y: usize) -> u32 {
        self.ranks[(y % self.size) * self.size + (x % self.size)]
    }

    /// Normalized threshold in [0, 1): rank / N².
    #[inline]
    pub fn threshold(&self, x: usize, y: usize) -> f32 {
        self.rank(x, y) as f32 / (self.size * self.size) as f32
    }

    /// The raw ranks, row-major.
    pub fn ranks(&self) -> &[u32] {
        &self.ranks
    }
}

/// Recursive Bayer recurrence: each quadrant is 4*M(n/2) + {0, 2, 3, 1}.
fn bayer_ranks(size: usize) -> Vec<u32> {
    if size == 2 {
        return vec![0, 2, 3, 1];
    }
    let half = size / 2;
    let smaller = bayer_ranks(half);
    let mut out = vec![0u32; size * size];
    for y in 0..half {
        for x in 0..half {
            let v = 4 * smaller[y * half + x];
            out[y * size + x] = v;                       // top-left
            out[y * size + x + half] = v + 2;            // top-right
            out[(y + half) * size + x] = v + 3;          // bottom-left
            out[(y + half) * size + x + half] = v + 1;   // bottom-right
        }
    }
    out
}

/// Memo of generated matrices keyed by size.
/// Visual: none; switching sizes at runtime doesn't recompute old ones.
#[derive(Default)]
pub struct MatrixCache {
    matrices: HashMap<usize, ThresholdMatrix>,
}

impl MatrixCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, size: usize) -> Result<&ThresholdMatrix> {
        match self.matrices.entry(size) {
            Entry::Occupied(e) => Ok(&*e.into_mut()),
            Entry::Vacant(e) => Ok(&*e.insert(ThresholdMatrix::generate(size)?)),
        }
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_case_2x2() {
        let m = ThresholdMatrix::generate(2).unwrap();
        assert_eq!(m.ranks(), &[0, 2, 3, 1]);
    }

    #[test]
    fn test_4x4_matches_classic_bayer() {
        let m = ThresholdMatrix::generate(4).unwrap();
        assert_eq!(
            m.ranks(),
            &[
                0, 8, 2, 10, //
                12, 4, 14, 6, //
                3, 11, 1, 9, //
                15, 7, 13, 5,
            ]
        );
    }

    #[test]
    fn test_ranks_are_a_permutation() {
        for size in [2usize, 4, 8, 16] {
            let m = ThresholdMatrix::generate(size).unwrap();
            let mut sorted = m.ranks().to_vec();
            sorted.sort_unstable();
            let expected: Vec<u32> = (0..(size * size) as u32).collect();
            assert_eq!(sorted, expected, "size {size}");
        }
    }

    #[test]
    fn test_thresholds_normalized() {
        let m = ThresholdMatrix::generate(8).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                assert!((0.0..1.0).contains(&m.threshold(x, y)));
            }
        }
        assert_eq!(m.threshold(1, 0), 32.0 / 64.0);
    }

    #[test]
    fn test_rank_tiles() {
        let m = ThresholdMatrix::generate(4).unwrap();
        assert_eq!(m.rank(5, 6), m.rank(1, 2));
    }

    #[test]
    fn test_rejects_bad_sizes() {
        for size in [0usize, 1, 3, 6, 12] {
            assert!(matches!(
                ThresholdMatrix::generate(size),
                Err(Error::MatrixSize(s)) if s == size
            ));
        }
    }

    #[test]
    fn test_cache_memoizes() {
        let mut cache = MatrixCache::new();
        let a = cache.get(4).unwrap().clone();
        let b = cache.get(4).unwrap().clone();
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(5).is_err());
        assert_eq!(cache.len(), 1);
    }
}
