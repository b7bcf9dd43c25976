//! # Query Evaluation
//!
//! Conditional and marginal probability queries over a materialized
//! [`CausalModel`], by full row-major enumeration of the joint
//! distribution. The transformation engine itself never calls this; it
//! exists so callers (and the integration tests) can check that a derived
//! model induces the same distribution over observables as its source.

use rustc_hash::FxHashMap;

use crate::engine::errors::ExecError;
use crate::engine::model::CausalModel;

/// A partial assignment of variables to domain-value indices.
#[derive(Debug, Clone, Default)]
pub struct Event {
    assignments: FxHashMap<usize, usize>,
}

impl Event {
    /// The empty event (matches every assignment).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds an event from `(variable name, domain value)` pairs.
    pub fn of(model: &CausalModel, bindings: &[(&str, &str)]) -> Result<Self, ExecError> {
        let mut event = Self::empty();
        for (name, value) in bindings {
            let var = model
                .variable_named(name)
                .ok_or_else(|| ExecError::Parse(format!("unknown variable '{}'", name)))?;
            let value_index = var
                .domain
                .iter()
                .position(|v| v == value)
                .ok_or_else(|| {
                    ExecError::Parse(format!(
                        "'{}' is not in the domain of '{}'",
                        value, var.name
                    ))
                })?;
            event.assignments.insert(var.index, value_index);
        }
        Ok(event)
    }

    /// Binds a variable index to a domain-value index.
    pub fn set(&mut self, variable: usize, value: usize) {
        self.assignments.insert(variable, value);
    }

    fn matches(&self, assignment: &[usize]) -> bool {
        self.assignments
            .iter()
            .all(|(&variable, &value)| assignment[variable] == value)
    }
}

/// Probability of one full assignment: the product of each variable's
/// table entry under its parents' configuration.
fn assignment_weight(model: &CausalModel, assignment: &[usize]) -> f64 {
    let mut weight = 1.0;
    for variable in model.variables() {
        let row = model.row_index(variable.index, assignment);
        weight *= model.cpt(variable.index).row(row)[assignment[variable.index]];
    }
    weight
}

/// Visits every full assignment in row-major order (first variable
/// slowest, last variable fastest).
fn for_each_assignment(model: &CausalModel, mut visit: impl FnMut(&[usize])) {
    let sizes: Vec<usize> = model.variables().iter().map(|v| v.domain_size()).collect();
    let mut assignment = vec![0usize; sizes.len()];
    loop {
        visit(&assignment);
        let mut position = sizes.len();
        loop {
            if position == 0 {
                return;
            }
            position -= 1;
            assignment[position] += 1;
            if assignment[position] < sizes[position] {
                break;
            }
            assignment[position] = 0;
        }
    }
}

/// The full joint table, row-major over the variable index order.
pub fn joint_table(model: &CausalModel) -> Vec<f64> {
    let mut table = Vec::new();
    for_each_assignment(model, |assignment| {
        table.push(assignment_weight(model, assignment));
    });
    table
}

/// Conditional probability `P(target | given)`.
///
/// Conditioning on an event of probability zero is a numerical error, not
/// a silent NaN.
pub fn probability(
    model: &CausalModel,
    target: &Event,
    given: &Event,
) -> Result<f64, ExecError> {
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for_each_assignment(model, |assignment| {
        if given.matches(assignment) {
            let weight = assignment_weight(model, assignment);
            denominator += weight;
            if target.matches(assignment) {
                numerator += weight;
            }
        }
    });
    if denominator <= 0.0 {
        return Err(ExecError::Numerical(
            "conditioning event has probability zero".to_string(),
        ));
    }
    Ok(numerator / denominator)
}
