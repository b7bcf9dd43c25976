//! # Causal Model Representation
//!
//! In-memory representation of a structural causal model: variables with
//! ordered discrete domains, the causal graph as per-child parent index
//! lists, and one conditional probability table per variable.
//!
//! ## Index alignment
//!
//! Variables are indexed by declaration order in the source document; the
//! graph and the tables are addressed by that same index. Within one
//! variable's table, rows enumerate parent configurations in row-major
//! order over the parent list as written: the first listed parent varies
//! slowest and the last varies fastest. [`CausalModel::row_index`] is the
//! single place that encodes this enumeration; the marginalizer and the
//! query evaluator both depend on it.
//!
//! Models are built once per transformation run, consumed read-only, and
//! discarded; nothing here is shared mutable state.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::engine::errors::ExecError;
use margraf_frontend::{is_exogenous_name, NetworkAst, MASS_TOLERANCE};

/// Parent index list; most nodes have only a handful of parents.
pub type ParentList = SmallVec<[usize; 4]>;

/// Whether a variable is a latent noise term or an observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Latent noise variable; a root of the causal graph.
    Exogenous,
    /// Observable variable with a mechanism over its parents.
    Endogenous,
}

impl Role {
    /// Derives the role from the document's name-prefix convention.
    pub fn of_name(name: &str) -> Role {
        if is_exogenous_name(name) {
            Role::Exogenous
        } else {
            Role::Endogenous
        }
    }
}

/// A model variable. Immutable after the model is built.
#[derive(Debug, Clone)]
pub struct Variable {
    /// The variable name
    pub name: String,
    /// Position in the global, stable variable ordering
    pub index: usize,
    /// Ordered domain values
    pub domain: Vec<String>,
    /// Exogenous or endogenous, per the name-prefix convention
    pub role: Role,
}

impl Variable {
    /// Number of values in the domain.
    pub fn domain_size(&self) -> usize {
        self.domain.len()
    }
}

/// A conditional probability table: one row per parent configuration,
/// one column per domain value of the owning variable.
#[derive(Debug, Clone)]
pub struct Cpt {
    rows: Vec<Vec<f64>>,
    cols: usize,
}

impl Cpt {
    /// Number of rows (parent configurations).
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (domain size of the owning variable).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// A single row.
    pub fn row(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }

    /// A contiguous block of rows, used by the marginalizer's contraction.
    pub fn block(&self, start: usize, len: usize) -> &[Vec<f64>] {
        &self.rows[start..start + len]
    }
}

/// Directed causal graph over variable indices.
///
/// Parents are stored per child, preserving the written order (which is the
/// row-major enumeration order of the child's table). Acyclicity is a
/// document-validation invariant.
#[derive(Debug, Clone, Default)]
pub struct CausalGraph {
    parents: Vec<ParentList>,
}

impl CausalGraph {
    /// Predecessor lookup by variable index.
    pub fn parents(&self, child: usize) -> &[usize] {
        &self.parents[child]
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// True when the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// The aggregate model: variables, graph, and one table per variable.
#[derive(Debug, Clone)]
pub struct CausalModel {
    variables: Vec<Variable>,
    name_index: FxHashMap<String, usize>,
    graph: CausalGraph,
    cpts: Vec<Cpt>,
}

impl CausalModel {
    /// Builds a model from a parsed document.
    ///
    /// The build re-checks the shape invariants it depends on rather than
    /// assuming the frontend validated the document: duplicate names,
    /// dangling references, exogenous variables with parents, table shape
    /// against domain sizes and parent enumeration, and row mass.
    pub fn from_network(ast: &NetworkAst) -> Result<CausalModel, ExecError> {
        let mut variables = Vec::with_capacity(ast.variables.len());
        let mut name_index = FxHashMap::default();
        for (index, decl) in ast.variables.iter().enumerate() {
            if name_index.insert(decl.name.clone(), index).is_some() {
                return Err(ExecError::Parse(format!(
                    "variable '{}' is declared more than once",
                    decl.name
                )));
            }
            variables.push(Variable {
                name: decl.name.clone(),
                index,
                domain: decl.domain.clone(),
                role: Role::of_name(&decl.name),
            });
        }

        let mut parents: Vec<Option<ParentList>> = vec![None; variables.len()];
        for decl in &ast.parents {
            let child = *name_index.get(&decl.child).ok_or_else(|| {
                ExecError::Parse(format!(
                    "parents declared for unknown variable '{}'",
                    decl.child
                ))
            })?;
            let mut list = ParentList::new();
            for parent in &decl.parents {
                let parent_index = *name_index.get(parent).ok_or_else(|| {
                    ExecError::Parse(format!(
                        "variable '{}' lists unknown parent '{}'",
                        decl.child, parent
                    ))
                })?;
                list.push(parent_index);
            }
            if variables[child].role == Role::Exogenous && !list.is_empty() {
                return Err(ExecError::schema(
                    &decl.child,
                    "exogenous variables are roots and must have an empty parent list",
                ));
            }
            parents[child] = Some(list);
        }
        let parents = parents
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                p.ok_or_else(|| {
                    ExecError::Parse(format!(
                        "variable '{}' has no parents declaration",
                        variables[i].name
                    ))
                })
            })
            .collect::<Result<Vec<ParentList>, _>>()?;
        let graph = CausalGraph { parents };

        let mut cpts: Vec<Option<Cpt>> = vec![None; variables.len()];
        for decl in &ast.cpts {
            let index = *name_index.get(&decl.variable).ok_or_else(|| {
                ExecError::Parse(format!(
                    "cpt declared for unknown variable '{}'",
                    decl.variable
                ))
            })?;
            let cols = variables[index].domain_size();
            if decl.declared_cols != cols {
                return Err(ExecError::schema(
                    &decl.variable,
                    format!(
                        "cpt has {} columns but the domain has {} values",
                        decl.declared_cols, cols
                    ),
                ));
            }
            let expected_rows: usize = graph
                .parents(index)
                .iter()
                .map(|&p| variables[p].domain_size())
                .product();
            if decl.rows.len() != expected_rows {
                return Err(ExecError::schema(
                    &decl.variable,
                    format!(
                        "table has {} rows but the parent domains enumerate {} configurations",
                        decl.rows.len(),
                        expected_rows
                    ),
                ));
            }
            for (row_index, row) in decl.rows.iter().enumerate() {
                if row.len() != cols {
                    return Err(ExecError::schema(
                        &decl.variable,
                        format!("row {} has {} entries, expected {}", row_index, row.len(), cols),
                    ));
                }
                let mass: f64 = row.iter().sum();
                if (mass - 1.0).abs() > MASS_TOLERANCE {
                    return Err(ExecError::schema(
                        &decl.variable,
                        format!("row {} sums to {} instead of 1", row_index, mass),
                    ));
                }
            }
            cpts[index] = Some(Cpt {
                rows: decl.rows.clone(),
                cols,
            });
        }
        let cpts = cpts
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                c.ok_or_else(|| {
                    ExecError::Parse(format!("variable '{}' has no cpt", variables[i].name))
                })
            })
            .collect::<Result<Vec<Cpt>, _>>()?;

        Ok(CausalModel {
            variables,
            name_index,
            graph,
            cpts,
        })
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// True when the model has no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Variable by index.
    pub fn variable(&self, index: usize) -> &Variable {
        &self.variables[index]
    }

    /// Variable by name.
    pub fn variable_named(&self, name: &str) -> Option<&Variable> {
        self.name_index.get(name).map(|&i| &self.variables[i])
    }

    /// All variables in index order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Parent indices of a variable, in row-major enumeration order.
    pub fn parents(&self, index: usize) -> &[usize] {
        self.graph.parents(index)
    }

    /// Table of a variable.
    pub fn cpt(&self, index: usize) -> &Cpt {
        &self.cpts[index]
    }

    /// Exogenous parents of a variable, preserving list order.
    pub fn exogenous_parents(&self, index: usize) -> ParentList {
        self.graph
            .parents(index)
            .iter()
            .copied()
            .filter(|&p| self.variables[p].role == Role::Exogenous)
            .collect()
    }

    /// Row index of a variable's table for a full assignment.
    ///
    /// `assignment[i]` is the domain-value index of variable `i`. The row
    /// index accumulates radix-style over the parent list, so the last
    /// listed parent varies fastest.
    pub fn row_index(&self, child: usize, assignment: &[usize]) -> usize {
        let mut index = 0usize;
        for &parent in self.graph.parents(child) {
            index = index * self.variables[parent].domain_size() + assignment[parent];
        }
        index
    }
}
