//! # Determinizer
//!
//! Rewrites every endogenous variable's CPT rows into one-hot rows, turning
//! each observable mechanism into a deterministic function of its parents
//! (including its exogenous noise parent). Exogenous tables and all other
//! document content pass through untouched.
//!
//! ## Reproducibility
//!
//! The generator is an explicit value threaded through the call, never a
//! process-wide singleton: [`determinize`] seeds a fresh `StdRng` from the
//! given seed, and [`determinize_with`] accepts any `Rng` for callers that
//! manage generator state themselves. One draw is consumed per endogenous
//! row, in document order, so identical seed and identical input always
//! produce an identical result; the marginalizer and repeated search
//! trials rely on re-deriving the same document from the same seed.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::engine::errors::ExecError;
use margraf_frontend::{is_exogenous_name, NetworkAst};

/// Determinizes a document with a fresh generator seeded from `seed`.
///
/// Pure given `seed`: the same seed and source yield an identical document.
pub fn determinize(source: &NetworkAst, seed: u64) -> Result<NetworkAst, ExecError> {
    let mut rng = StdRng::seed_from_u64(seed);
    determinize_with(source, &mut rng)
}

/// Determinizes a document, drawing hot indices from the supplied generator.
///
/// For every row of every endogenous CPT, in document order, one index is
/// drawn uniformly from the row's columns and the row becomes one-hot at
/// that index. A single-column row has a trivial draw and is not an error.
pub fn determinize_with<R: Rng>(source: &NetworkAst, rng: &mut R) -> Result<NetworkAst, ExecError> {
    let mut out = source.clone();
    for cpt in &mut out.cpts {
        if is_exogenous_name(&cpt.variable) {
            continue;
        }
        for (row_index, row) in cpt.rows.iter_mut().enumerate() {
            if row.is_empty() {
                return Err(ExecError::schema(
                    &cpt.variable,
                    format!("row {} has no columns to choose from", row_index),
                ));
            }
            let choice = rng.gen_range(0..row.len());
            for (column, value) in row.iter_mut().enumerate() {
                *value = if column == choice { 1.0 } else { 0.0 };
            }
        }
    }
    Ok(out)
}
