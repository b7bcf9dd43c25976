//! # Marginalizer
//!
//! Eliminates the exogenous variables from a determinized model, producing
//! a marginal document over the observable variables only while preserving
//! the induced joint distribution.
//!
//! ## Procedure
//!
//! 1. **Graph surgery** on the topology document: exogenous variable
//!    declarations, parent lists, and tables are dropped, and exogenous
//!    names are stripped from every remaining parent list.
//! 2. **Table contraction** per observable `v` with exogenous parent `u`:
//!    the determinized table's rows form contiguous blocks of `k` rows
//!    (`k` = domain size of `u`, one block per configuration of the other
//!    parents, `u` varying fastest), and each block collapses to the convex
//!    combination of its rows weighted by `u`'s own distribution.
//!
//! The supported graph shape is exactly one exogenous parent per
//! observable, listed fastest-varying; anything else is a typed
//! [`ExecError::StructuralAssumption`] naming the variable, never an
//! arbitrary pick. Every produced row's mass is checked against 1 before
//! the document is handed back.

use crate::engine::errors::ExecError;
use crate::engine::kernels::{convex_combination, row_mass};
use crate::engine::model::CausalModel;
use margraf_frontend::{is_exogenous_name, CptDecl, NetworkAst, ParentsDecl, MASS_TOLERANCE};

/// Marginalizes the exogenous variables out of a determinized model.
///
/// `topology` supplies the document structure (and must be the document the
/// determinized one was derived from); `determinized` supplies the numeric
/// values, loaded into a fresh [`CausalModel`]. Neither input is mutated.
pub fn marginalize(
    topology: &NetworkAst,
    determinized: &NetworkAst,
) -> Result<NetworkAst, ExecError> {
    check_same_structure(topology, determinized)?;
    let complete = CausalModel::from_network(determinized)?;

    let variables = topology
        .variables
        .iter()
        .filter(|v| !is_exogenous_name(&v.name))
        .cloned()
        .collect();

    let parents = topology
        .parents
        .iter()
        .filter(|p| !is_exogenous_name(&p.child))
        .map(|p| ParentsDecl {
            child: p.child.clone(),
            parents: p
                .parents
                .iter()
                .filter(|name| !is_exogenous_name(name))
                .cloned()
                .collect(),
        })
        .collect();

    let mut cpts = Vec::new();
    for cpt in &topology.cpts {
        if is_exogenous_name(&cpt.variable) {
            continue;
        }
        cpts.push(contract_table(&complete, &cpt.variable)?);
    }

    Ok(NetworkAst {
        name: topology.name.clone(),
        variables,
        parents,
        cpts,
    })
}

/// The determinized document must declare the same variables, in the same
/// order and with the same domains, as the topology it was derived from.
fn check_same_structure(
    topology: &NetworkAst,
    determinized: &NetworkAst,
) -> Result<(), ExecError> {
    if topology.variables.len() != determinized.variables.len() {
        return Err(ExecError::Parse(format!(
            "determinized document declares {} variables, topology declares {}",
            determinized.variables.len(),
            topology.variables.len()
        )));
    }
    for (a, b) in topology.variables.iter().zip(&determinized.variables) {
        if a.name != b.name || a.domain != b.domain {
            return Err(ExecError::schema(
                &a.name,
                "determinized document does not match the topology document",
            ));
        }
    }
    Ok(())
}

/// Contracts one observable's determinized table over its exogenous parent.
fn contract_table(complete: &CausalModel, name: &str) -> Result<CptDecl, ExecError> {
    let var = complete
        .variable_named(name)
        .ok_or_else(|| ExecError::schema(name, "missing from the determinized model"))?;
    let v = var.index;
    let cols = var.domain_size();
    let table = complete.cpt(v);
    if table.cols() != cols {
        return Err(ExecError::schema(
            name,
            format!(
                "cpt has {} columns but the domain has {} values",
                table.cols(),
                cols
            ),
        ));
    }

    let parents = complete.parents(v);
    let exogenous = complete.exogenous_parents(v);
    let u = match exogenous.as_slice() {
        [only] => *only,
        [] => {
            return Err(ExecError::structural(
                name,
                "no exogenous parent to marginalize out",
            ))
        }
        several => {
            return Err(ExecError::structural(
                name,
                format!(
                    "{} exogenous parents; exactly one is supported",
                    several.len()
                ),
            ))
        }
    };
    // The contraction consumes k consecutive rows per block, which is only
    // the u-axis when u is the fastest-varying (last-listed) parent.
    if parents.last() != Some(&u) {
        return Err(ExecError::structural(
            name,
            format!(
                "exogenous parent '{}' must be listed last (fastest-varying)",
                complete.variable(u).name
            ),
        ));
    }

    let u_var = complete.variable(u);
    let u_table = complete.cpt(u);
    if !complete.parents(u).is_empty() || u_table.num_rows() != 1 {
        return Err(ExecError::schema(
            &u_var.name,
            "exogenous distribution must be a single parentless row",
        ));
    }
    let weights = u_table.row(0);
    let k = u_var.domain_size();

    let m = table.num_rows();
    if m == 0 || m % k != 0 {
        return Err(ExecError::schema(
            name,
            format!("{} rows cannot be grouped into blocks of {}", m, k),
        ));
    }

    let block_count = m / k;
    let mut rows = Vec::with_capacity(block_count);
    for block_index in 0..block_count {
        let block = table.block(block_index * k, k);
        let row = convex_combination(weights, block);
        let mass = row_mass(&row);
        if (mass - 1.0).abs() > MASS_TOLERANCE {
            return Err(ExecError::Numerical(format!(
                "marginalized row {} of '{}' sums to {} instead of 1",
                block_index, name, mass
            )));
        }
        rows.push(row);
    }

    Ok(CptDecl {
        variable: name.to_string(),
        declared_rows: block_count,
        declared_cols: cols,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use margraf_frontend::parse_network;

    #[test]
    fn two_node_model_contracts_to_the_noise_distribution() {
        // U -> S with S = U deterministically: the marginal of S is U's own
        // distribution.
        let source = "network two {
  variables {
    var US [0, 1]
    var S [0, 1]
  }
  graph {
    parents US []
    parents S [US]
  }
  cpts {
    cpt US rows 1 cols 2 { row 0.5 0.5 }
    cpt S rows 2 cols 2 {
      row 1.0 0.0
      row 0.0 1.0
    }
  }
}
";
        let ast = parse_network(source).unwrap();
        let partial = marginalize(&ast, &ast).unwrap();
        assert_eq!(partial.variables.len(), 1);
        assert_eq!(partial.cpts.len(), 1);
        let s = &partial.cpts[0];
        assert_eq!(s.declared_rows, 1);
        assert_eq!(s.rows, vec![vec![0.5, 0.5]]);
    }

    #[test]
    fn two_exogenous_parents_violate_the_structural_assumption() {
        let source = "network bad {
  variables {
    var UA [0, 1]
    var UB [0, 1]
    var S [0, 1]
  }
  graph {
    parents UA []
    parents UB []
    parents S [UA, UB]
  }
  cpts {
    cpt UA rows 1 cols 2 { row 0.5 0.5 }
    cpt UB rows 1 cols 2 { row 0.5 0.5 }
    cpt S rows 4 cols 2 {
      row 1.0 0.0
      row 0.0 1.0
      row 1.0 0.0
      row 0.0 1.0
    }
  }
}
";
        let ast = parse_network(source).unwrap();
        let err = marginalize(&ast, &ast).expect_err("two exogenous parents must fail");
        match err {
            ExecError::StructuralAssumption { variable, .. } => assert_eq!(variable, "S"),
            other => panic!("expected StructuralAssumption, got {:?}", other),
        }
    }

    #[test]
    fn misplaced_exogenous_parent_is_rejected() {
        // US listed first would make the contraction collapse the S-axis.
        let source = "network mis {
  variables {
    var US [0, 1]
    var S [0, 1]
    var W [0, 1]
  }
  graph {
    parents US []
    parents S [US]
    parents W [US, S]
  }
  cpts {
    cpt US rows 1 cols 2 { row 0.5 0.5 }
    cpt S rows 2 cols 2 {
      row 1.0 0.0
      row 0.0 1.0
    }
    cpt W rows 4 cols 2 {
      row 1.0 0.0
      row 0.0 1.0
      row 1.0 0.0
      row 0.0 1.0
    }
  }
}
";
        let ast = parse_network(source).unwrap();
        let err = marginalize(&ast, &ast).expect_err("misplaced exogenous parent must fail");
        assert!(matches!(err, ExecError::StructuralAssumption { .. }));
    }
}
