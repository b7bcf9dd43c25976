//! Graphviz export of the causal graph, for inspection only.

use crate::ast::{is_exogenous_name, NetworkAst};

/// Renders the document's causal graph as a Graphviz digraph.
///
/// Exogenous variables are drawn dashed to set them apart from the
/// observable ones. The output is never consumed by the engine itself.
pub fn network_to_dot(ast: &NetworkAst) -> String {
    let mut out = String::new();
    out.push_str(&format!("digraph {} {{\n", ast.name));
    out.push_str("  rankdir=TB;\n");
    for var in &ast.variables {
        if is_exogenous_name(&var.name) {
            out.push_str(&format!("  {} [style=dashed];\n", var.name));
        } else {
            out.push_str(&format!("  {};\n", var.name));
        }
    }
    for decl in &ast.parents {
        for parent in &decl.parents {
            out.push_str(&format!("  {} -> {};\n", parent, decl.child));
        }
    }
    out.push_str("}\n");
    out
}
