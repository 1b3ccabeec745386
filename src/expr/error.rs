//! Error types for expression evaluation.

use thiserror::Error;

/// Errors that can occur while evaluating an expression against a row.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("no shifted column materialized for {column}[n{offset:+}]")]
    UnknownShift { column: String, offset: i64 },

    #[error("row {row} out of range")]
    RowOutOfRange { row: usize },

    #[error("invalid operands for {operator}: {left} and {right}")]
    InvalidOperands {
        operator: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("invalid operand for {operator}: {operand}")]
    InvalidOperand {
        operator: &'static str,
        operand: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,
}

/// Result type for expression evaluation.
pub type ExprResult<T> = Result<T, ExprError>;
