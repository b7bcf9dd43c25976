//! # Abstract Syntax Tree
//!
//! This module defines the AST for causal network documents.
//!
//! ## Structure
//!
//! A network document consists of three ordered sections:
//! - **Variables**: named variables with ordered discrete domains
//! - **Graph**: per-child parent lists (the causal graph)
//! - **CPTs**: one conditional probability table per variable
//!
//! Declaration order in the variables section defines the global, stable
//! variable index used to align graph and table structures. Probabilities
//! are stored as parsed `f64` values (not strings).
//!
//! ## Role convention
//!
//! A variable whose name starts with [`EXOGENOUS_PREFIX`] is exogenous
//! (a latent noise variable); all other variables are endogenous
//! (observable). The prefix is part of the document format, not a styling
//! choice: graph surgery and table contraction key off it.

/// Name prefix reserved for exogenous (latent noise) variables.
pub const EXOGENOUS_PREFIX: &str = "U";

/// Returns true if the variable name denotes an exogenous variable.
pub fn is_exogenous_name(name: &str) -> bool {
    name.starts_with(EXOGENOUS_PREFIX)
}

/// The root of a parsed network document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkAst {
    /// The network name
    pub name: String,
    /// Variable declarations, in document (= index) order
    pub variables: Vec<VarDecl>,
    /// Parent lists, one per variable
    pub parents: Vec<ParentsDecl>,
    /// Conditional probability tables, one per variable
    pub cpts: Vec<CptDecl>,
}

/// A variable declaration with its ordered discrete domain.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarDecl {
    /// The variable name
    pub name: String,
    /// Ordered domain values (domain size = `domain.len()`)
    pub domain: Vec<String>,
}

/// A parent list for one variable.
///
/// The written order is load-bearing: CPT rows enumerate parent
/// configurations in row-major order over this list, first parent varying
/// slowest and last parent varying fastest.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParentsDecl {
    /// The child variable name
    pub child: String,
    /// Parent variable names, in row-major enumeration order
    pub parents: Vec<String>,
}

/// A conditional probability table declaration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CptDecl {
    /// The variable this table belongs to
    pub variable: String,
    /// Declared row count (must match `rows.len()`)
    pub declared_rows: usize,
    /// Declared column count (must match the variable's domain size)
    pub declared_cols: usize,
    /// Table rows; each row is a probability distribution over the columns
    pub rows: Vec<Vec<f64>>,
}

impl NetworkAst {
    /// Looks up a variable declaration by name.
    pub fn variable(&self, name: &str) -> Option<&VarDecl> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Looks up the parent list for a variable.
    pub fn parents_of(&self, name: &str) -> Option<&ParentsDecl> {
        self.parents.iter().find(|p| p.child == name)
    }

    /// Looks up the CPT for a variable.
    pub fn cpt_of(&self, name: &str) -> Option<&CptDecl> {
        self.cpts.iter().find(|c| c.variable == name)
    }
}
