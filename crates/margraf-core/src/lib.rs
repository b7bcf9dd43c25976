//! # Margraf Core
//!
//! Determinization and marginalization engine for structural causal
//! models: rewrites stochastic mechanisms into seeded deterministic ones,
//! then eliminates the latent noise variables while preserving the induced
//! distribution over observables.

pub mod engine;

// Re-export commonly used types
pub use engine::determinize::{determinize, determinize_with};
pub use engine::errors::ExecError;
pub use engine::marginalize::marginalize;
pub use engine::model::{CausalModel, Cpt, Role, Variable};
pub use engine::query::{joint_table, probability, Event};
pub use engine::search::{find_seed, find_seed_with, is_degenerate, run_trial};

use margraf_frontend::{parse_network, serialize_network, validate_network, NetworkAst};

/// Parse and validate a network document.
///
/// This is a convenience function that combines parsing and validation,
/// converting frontend errors to core errors.
pub fn parse_and_validate(source: &str) -> Result<NetworkAst, ExecError> {
    let ast = parse_network(source)?;
    validate_network(&ast)?;
    Ok(ast)
}

/// Builds a determinized + marginalized document pair for an explicit seed.
///
/// Returns the serialized complete (deterministic, all variables) and
/// partial (observables only) documents. Nothing is written anywhere on
/// error, so a failing trial can never leave partial output behind.
pub fn build_pair(source: &str, seed: u64) -> Result<(String, String), ExecError> {
    let topology = parse_and_validate(source)?;
    let complete = determinize(&topology, seed)?;
    let partial = marginalize(&topology, &complete)?;
    Ok((serialize_network(&complete), serialize_network(&partial)))
}
