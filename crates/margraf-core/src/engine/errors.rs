//! Error types for the transformation engine.

use thiserror::Error;

impl From<margraf_frontend::FrontendError> for ExecError {
    fn from(err: margraf_frontend::FrontendError) -> Self {
        match err {
            margraf_frontend::FrontendError::ParseError(msg) => ExecError::Parse(msg),
            margraf_frontend::FrontendError::SchemaError { variable, message } => {
                ExecError::Schema { variable, message }
            }
            margraf_frontend::FrontendError::ValidationError(msg) => ExecError::Parse(msg),
            _ => ExecError::Internal(format!("unexpected frontend error: {:?}", err)),
        }
    }
}

/// Errors that can occur while building, determinizing, marginalizing, or
/// searching over a causal model.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error
/// variants without breaking changes. All public APIs return
/// `Result<T, ExecError>` to avoid panics in library code.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ExecError {
    /// Malformed document text or document-level inconsistency.
    #[error("parse error: {0}")]
    Parse(String),

    /// Domain-size or table-shape mismatch for a named variable.
    #[error("schema error in '{variable}': {message}")]
    Schema {
        /// The offending variable
        variable: String,
        /// What did not line up
        message: String,
    },

    /// The causal graph does not fit the supported shape (a variable must
    /// have exactly one exogenous parent, listed fastest-varying).
    #[error("structural assumption violated for '{variable}': {message}")]
    StructuralAssumption {
        /// The offending variable
        variable: String,
        /// Which assumption failed
        message: String,
    },

    /// No seed satisfied the degeneracy predicate within the trial bound.
    /// This is a reportable outcome of the search, not a crash.
    #[error("seed search exhausted after {trials} trials")]
    ExhaustedSearch {
        /// How many seeds were tried
        trials: u64,
    },

    /// Numerical invariant violation (probability mass drift, conditioning
    /// on a zero-probability event).
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Internal error (programmer error, not user error).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ExecError {
    /// Builds a schema error for a named variable.
    pub fn schema(variable: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            variable: variable.into(),
            message: message.into(),
        }
    }

    /// Builds a structural-assumption error for a named variable.
    pub fn structural(variable: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StructuralAssumption {
            variable: variable.into(),
            message: message.into(),
        }
    }
}
