//! # Network Document Parser
//!
//! This module implements the parser for causal network documents using the
//! Pest parser generator.
//!
//! The parser transforms source text into a typed AST without performing
//! semantic validation; use [`crate::validate::validate_network`] on the
//! result. Probabilities and declared table dimensions are parsed at parse
//! time, so a row token that is not a number fails here with a `ParseError`
//! carrying the document location; malformed rows are never silently
//! skipped.
//!
//! The grammar is defined in `grammar.pest` using Pest's PEG syntax.

use crate::ast::*;
use crate::errors::FrontendError;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "../grammar.pest"]
pub struct NetworkParser;

/// Parses a network document into an AST.
///
/// This is a pure syntactic parser. Structural consistency between the
/// three sections (shapes, references, acyclicity, row mass) is checked by
/// [`crate::validate::validate_network`].
///
/// # Arguments
///
/// * `source` - The complete document text
///
/// # Returns
///
/// * `Ok(NetworkAst)` - Successfully parsed document
/// * `Err(FrontendError::ParseError)` - Syntax error with location information
pub fn parse_network(source: &str) -> Result<NetworkAst, FrontendError> {
    let mut pairs = NetworkParser::parse(Rule::document, source)
        .map_err(|e| FrontendError::ParseError(e.to_string()))?;

    let document = pairs
        .next()
        .ok_or_else(|| FrontendError::ParseError("empty document".to_string()))?;
    debug_assert_eq!(document.as_rule(), Rule::document);

    let mut name = String::new();
    let mut variables = Vec::new();
    let mut parents = Vec::new();
    let mut cpts = Vec::new();

    for inner in document.into_inner() {
        if inner.as_rule() != Rule::network {
            continue;
        }
        for part in inner.into_inner() {
            match part.as_rule() {
                Rule::ident => name = part.as_str().to_string(),
                Rule::variables_section => {
                    for v in part.into_inner() {
                        variables.push(build_var(v)?);
                    }
                }
                Rule::graph_section => {
                    for p in part.into_inner() {
                        parents.push(build_parents(p));
                    }
                }
                Rule::cpt_section => {
                    for c in part.into_inner() {
                        cpts.push(build_cpt(c)?);
                    }
                }
                _ => {}
            }
        }
    }

    Ok(NetworkAst {
        name,
        variables,
        parents,
        cpts,
    })
}

fn build_var(pair: pest::iterators::Pair<Rule>) -> Result<VarDecl, FrontendError> {
    let mut name = String::new();
    let mut domain = Vec::new();
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::ident => name = p.as_str().to_string(),
            Rule::domain_list => {
                for value in p.into_inner() {
                    domain.push(value.as_str().to_string());
                }
            }
            _ => {}
        }
    }
    if domain.is_empty() {
        return Err(FrontendError::ParseError(format!(
            "variable '{}' has an empty domain",
            name
        )));
    }
    Ok(VarDecl { name, domain })
}

fn build_parents(pair: pest::iterators::Pair<Rule>) -> ParentsDecl {
    let mut child = String::new();
    let mut parents = Vec::new();
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::ident => child = p.as_str().to_string(),
            Rule::parent_list => {
                for parent in p.into_inner() {
                    parents.push(parent.as_str().to_string());
                }
            }
            _ => {}
        }
    }
    ParentsDecl { child, parents }
}

fn build_cpt(pair: pest::iterators::Pair<Rule>) -> Result<CptDecl, FrontendError> {
    let mut variable = String::new();
    let mut dims = Vec::with_capacity(2);
    let mut rows = Vec::new();
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::ident => variable = p.as_str().to_string(),
            Rule::integer => dims.push(parse_usize(p)?),
            Rule::row_decl => {
                let row = p
                    .into_inner()
                    .map(parse_number)
                    .collect::<Result<Vec<f64>, _>>()?;
                rows.push(row);
            }
            _ => {}
        }
    }
    let (declared_rows, declared_cols) = match dims.as_slice() {
        [r, c] => (*r, *c),
        _ => {
            return Err(FrontendError::ParseError(format!(
                "cpt '{}' is missing its rows/cols declaration",
                variable
            )))
        }
    };
    Ok(CptDecl {
        variable,
        declared_rows,
        declared_cols,
        rows,
    })
}

fn parse_usize(pair: pest::iterators::Pair<Rule>) -> Result<usize, FrontendError> {
    let (line, col) = pair.as_span().start_pos().line_col();
    pair.as_str().parse::<usize>().map_err(|_| {
        FrontendError::ParseError(format!(
            "invalid table dimension '{}' at {}:{}",
            pair.as_str(),
            line,
            col
        ))
    })
}

fn parse_number(pair: pest::iterators::Pair<Rule>) -> Result<f64, FrontendError> {
    let (line, col) = pair.as_span().start_pos().line_col();
    pair.as_str().parse::<f64>().map_err(|_| {
        FrontendError::ParseError(format!(
            "invalid probability '{}' at {}:{}",
            pair.as_str(),
            line,
            col
        ))
    })
}
