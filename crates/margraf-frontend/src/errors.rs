//! Error types for parsing and validation.

use thiserror::Error;

/// Errors that can occur during parsing or validation of a network document.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FrontendError {
    /// Syntax error during parsing, with pest's line/column rendering.
    #[error("parse error: {0}")]
    ParseError(String),

    /// Table-shape or domain-size mismatch attached to a variable.
    #[error("schema error in '{variable}': {message}")]
    SchemaError {
        /// The offending variable
        variable: String,
        /// What did not line up
        message: String,
    },

    /// Document-level semantic error (dangling names, duplicates, cycles).
    #[error("validation error: {0}")]
    ValidationError(String),
}

impl FrontendError {
    /// Builds a schema error for a named variable.
    pub fn schema(variable: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaError {
            variable: variable.into(),
            message: message.into(),
        }
    }
}
