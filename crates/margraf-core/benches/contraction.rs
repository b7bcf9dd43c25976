//! Benchmark for the marginalizer's table contraction on a chain model.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use margraf_core::marginalize;
use margraf_frontend::{CptDecl, NetworkAst, ParentsDecl, VarDecl};

fn domain(size: usize) -> Vec<String> {
    (0..size).map(|i| format!("v{}", i)).collect()
}

fn one_hot_rows(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|r| {
            let mut row = vec![0.0; cols];
            row[r % cols] = 1.0;
            row
        })
        .collect()
}

/// A -> B -> Y chain where every observable also has its own noise parent,
/// already in determinized form.
fn synthetic_chain(size: usize) -> NetworkAst {
    let layout: [(&str, &[&str]); 6] = [
        ("UA", &[]),
        ("A", &["UA"]),
        ("UB", &[]),
        ("B", &["A", "UB"]),
        ("UY", &[]),
        ("Y", &["A", "B", "UY"]),
    ];
    let uniform = vec![vec![1.0 / size as f64; size]];

    let mut variables = Vec::new();
    let mut parents = Vec::new();
    let mut cpts = Vec::new();
    for (name, parent_names) in layout {
        variables.push(VarDecl {
            name: name.to_string(),
            domain: domain(size),
        });
        parents.push(ParentsDecl {
            child: name.to_string(),
            parents: parent_names.iter().map(|s| s.to_string()).collect(),
        });
        let rows = if name.starts_with('U') {
            uniform.clone()
        } else {
            one_hot_rows(size.pow(parent_names.len() as u32), size)
        };
        cpts.push(CptDecl {
            variable: name.to_string(),
            declared_rows: rows.len(),
            declared_cols: size,
            rows,
        });
    }
    NetworkAst {
        name: "bench".to_string(),
        variables,
        parents,
        cpts,
    }
}

fn bench_contraction(c: &mut Criterion) {
    let chain = synthetic_chain(6);
    c.bench_function("marginalize_chain_d6", |b| {
        b.iter(|| marginalize(black_box(&chain), black_box(&chain)).unwrap())
    });
}

criterion_group!(benches, bench_contraction);
criterion_main!(benches);
