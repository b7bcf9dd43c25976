//! Numeric kernels for probability-row computations.
//!
//! Scalar reference implementations only; the tables this engine touches
//! are small enough that nothing fancier has earned its keep.

/// Convex combination of a block of rows: `out[c] = Σ_j weights[j] * block[j][c]`.
///
/// This is the 1×k vector by k×n matrix product at the heart of the
/// marginalizer's table contraction. Callers guarantee that `weights` has
/// one entry per block row and that all block rows share a width.
pub fn convex_combination(weights: &[f64], block: &[Vec<f64>]) -> Vec<f64> {
    debug_assert_eq!(weights.len(), block.len());
    let cols = block.first().map_or(0, |row| row.len());
    let mut out = vec![0.0; cols];
    for (weight, row) in weights.iter().zip(block) {
        debug_assert_eq!(row.len(), cols);
        for (acc, value) in out.iter_mut().zip(row) {
            *acc += weight * value;
        }
    }
    out
}

/// Total probability mass of a row.
pub fn row_mass(row: &[f64]) -> f64 {
    row.iter().sum()
}
