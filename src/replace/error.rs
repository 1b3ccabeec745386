//! Error types for the replace engine.

use thiserror::Error;

/// Errors reported by `replace` and `simple_replace`.
///
/// Either variant aborts the call before any assignment happens, so a
/// failed replace never leaves a partially updated table behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplaceError {
    #[error("column not found: {name}")]
    MissingColumn { name: String },

    #[error("malformed expression '{expr}': {reason}")]
    MalformedExpression { expr: String, reason: String },
}

/// Result type for replace operations.
pub type ReplaceResult<T> = Result<T, ReplaceError>;
