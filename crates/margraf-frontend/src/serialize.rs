//! Canonical serialization of network documents.
//!
//! The writer emits a fixed layout with probabilities at 6 decimal digits.
//! Serialization is a pure function of the AST, so two equal ASTs always
//! produce byte-identical text; the determinism guarantee of the
//! determinizer rests on this.

use crate::ast::NetworkAst;

/// Number of decimal digits used for probability values.
pub const PROBABILITY_DIGITS: usize = 6;

/// Serializes a network document to its canonical text form.
pub fn serialize_network(ast: &NetworkAst) -> String {
    let mut out = String::new();
    out.push_str(&format!("network {} {{\n", ast.name));

    out.push_str("  variables {\n");
    for var in &ast.variables {
        out.push_str(&format!(
            "    var {} [{}]\n",
            var.name,
            var.domain.join(", ")
        ));
    }
    out.push_str("  }\n");

    out.push_str("  graph {\n");
    for decl in &ast.parents {
        out.push_str(&format!(
            "    parents {} [{}]\n",
            decl.child,
            decl.parents.join(", ")
        ));
    }
    out.push_str("  }\n");

    out.push_str("  cpts {\n");
    for cpt in &ast.cpts {
        out.push_str(&format!(
            "    cpt {} rows {} cols {} {{\n",
            cpt.variable, cpt.declared_rows, cpt.declared_cols
        ));
        for row in &cpt.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|p| format!("{:.*}", PROBABILITY_DIGITS, p))
                .collect();
            out.push_str(&format!("      row {}\n", cells.join(" ")));
        }
        out.push_str("    }\n");
    }
    out.push_str("  }\n");

    out.push_str("}\n");
    out
}
