//! # Margraf Frontend
//!
//! Parser, AST, validation, and canonical serialization for causal network
//! documents.

pub mod ast;
pub mod dot;
pub mod errors;
pub mod parser;
pub mod serialize;
pub mod validate;

// Re-export commonly used types
pub use ast::*;
pub use dot::network_to_dot;
pub use errors::FrontendError;
pub use parser::parse_network;
pub use serialize::serialize_network;
pub use validate::{validate_network, MASS_TOLERANCE};
