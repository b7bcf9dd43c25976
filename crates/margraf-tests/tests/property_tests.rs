//! Property tests over randomly shaped chain models: determinism, one-hot
//! output, row-count and mass laws, and joint preservation.

use margraf_core::{determinize, marginalize, probability, CausalModel, Event};
use margraf_frontend::{
    is_exogenous_name, serialize_network, CptDecl, NetworkAst, ParentsDecl, VarDecl,
};
use proptest::prelude::*;

fn domain(size: usize) -> Vec<String> {
    (0..size).map(|i| format!("d{}", i)).collect()
}

fn uniform_rows(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    vec![vec![1.0 / cols as f64; cols]; rows]
}

/// Chain of `length` observables X1..Xn, each fed by the previous one and
/// by its own noise parent Ui (listed last, fastest-varying).
fn chain_network(length: usize, obs_size: usize, exo_size: usize) -> NetworkAst {
    let mut variables = Vec::new();
    let mut parents = Vec::new();
    let mut cpts = Vec::new();
    for i in 1..=length {
        let noise = format!("U{}", i);
        let observable = format!("X{}", i);

        variables.push(VarDecl {
            name: noise.clone(),
            domain: domain(exo_size),
        });
        parents.push(ParentsDecl {
            child: noise.clone(),
            parents: Vec::new(),
        });
        cpts.push(CptDecl {
            variable: noise.clone(),
            declared_rows: 1,
            declared_cols: exo_size,
            rows: uniform_rows(1, exo_size),
        });

        let mut parent_names = Vec::new();
        if i > 1 {
            parent_names.push(format!("X{}", i - 1));
        }
        parent_names.push(noise);
        let rows = if i > 1 { obs_size * exo_size } else { exo_size };
        variables.push(VarDecl {
            name: observable.clone(),
            domain: domain(obs_size),
        });
        parents.push(ParentsDecl {
            child: observable.clone(),
            parents: parent_names,
        });
        cpts.push(CptDecl {
            variable: observable,
            declared_rows: rows,
            declared_cols: obs_size,
            rows: uniform_rows(rows, obs_size),
        });
    }
    NetworkAst {
        name: "chain".to_string(),
        variables,
        parents,
        cpts,
    }
}

proptest! {
    #[test]
    fn determinize_is_reproducible(
        length in 1usize..=3,
        obs_size in 2usize..=3,
        exo_size in 2usize..=3,
        seed in any::<u64>(),
    ) {
        let topology = chain_network(length, obs_size, exo_size);
        let a = serialize_network(&determinize(&topology, seed).unwrap());
        let b = serialize_network(&determinize(&topology, seed).unwrap());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn determinized_rows_are_one_hot(
        length in 1usize..=3,
        obs_size in 2usize..=3,
        exo_size in 2usize..=3,
        seed in any::<u64>(),
    ) {
        let topology = chain_network(length, obs_size, exo_size);
        let det = determinize(&topology, seed).unwrap();
        for cpt in det.cpts.iter().filter(|c| !is_exogenous_name(&c.variable)) {
            for row in &cpt.rows {
                prop_assert_eq!(row.iter().filter(|&&p| p == 1.0).count(), 1);
                prop_assert!(row.iter().all(|&p| p == 0.0 || p == 1.0));
            }
        }
    }

    #[test]
    fn marginal_tables_obey_row_count_and_mass_laws(
        length in 1usize..=3,
        obs_size in 2usize..=3,
        exo_size in 2usize..=3,
        seed in any::<u64>(),
    ) {
        let topology = chain_network(length, obs_size, exo_size);
        let det = determinize(&topology, seed).unwrap();
        let partial = marginalize(&topology, &det).unwrap();
        for (i, cpt) in partial.cpts.iter().enumerate() {
            let expected_rows = if i == 0 { 1 } else { obs_size };
            prop_assert_eq!(cpt.rows.len(), expected_rows);
            prop_assert_eq!(cpt.declared_rows, expected_rows);
            for row in &cpt.rows {
                let mass: f64 = row.iter().sum();
                prop_assert!((mass - 1.0).abs() <= 1e-6);
            }
        }
    }

    #[test]
    fn marginalization_preserves_observable_probabilities(
        length in 1usize..=2,
        obs_size in 2usize..=3,
        exo_size in 2usize..=3,
        seed in any::<u64>(),
    ) {
        let topology = chain_network(length, obs_size, exo_size);
        let det = determinize(&topology, seed).unwrap();
        let complete = CausalModel::from_network(&det).unwrap();
        let partial_ast = marginalize(&topology, &det).unwrap();
        let partial = CausalModel::from_network(&partial_ast).unwrap();

        // All observables pinned to their first domain value.
        let bindings: Vec<(String, String)> = (1..=length)
            .map(|i| (format!("X{}", i), "d0".to_string()))
            .collect();
        let borrowed: Vec<(&str, &str)> = bindings
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
            .collect();
        let on_complete = probability(
            &complete,
            &Event::of(&complete, &borrowed).unwrap(),
            &Event::empty(),
        )
        .unwrap();
        let on_partial = probability(
            &partial,
            &Event::of(&partial, &borrowed).unwrap(),
            &Event::empty(),
        )
        .unwrap();
        prop_assert!((on_complete - on_partial).abs() <= 1e-9);
    }
}
