//! Error types of the codec.

use sfgeom_types::error::{MalformedGeometryError, UnsupportedGeometryError};
use thiserror::Error;

/// Input text does not follow the WKT grammar.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unexpected {found} at offset {offset}, expected {}", expected.join(" or "))]
pub struct SyntaxError {
    /// Byte offset of the offending token in the input.
    pub offset: usize,
    /// Description of the offending token.
    pub found: String,
    /// Tokens that would be valid at this position.
    pub expected: Vec<&'static str>,
}

/// Errors of reading and writing WKT.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WktError {
    /// Malformed input text.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The text is well-formed, but describes a geometry that violates the model invariants.
    #[error(transparent)]
    Malformed(#[from] MalformedGeometryError),
    /// The geometry cannot be written with the current writer settings.
    #[error(transparent)]
    Unsupported(#[from] UnsupportedGeometryError),
    /// Infinite and `NaN` ordinates have no WKT representation.
    #[error("ordinate {0} cannot be represented in WKT")]
    NonFinite(f64),
    /// Output sink failure.
    #[error("failed to write WKT: {0}")]
    Fmt(#[from] std::fmt::Error),
}
