//! Table container error types.

use thiserror::Error;

/// Errors that can occur when building or mutating a table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("column '{name}' has {len} values, expected {expected}")]
    LengthMismatch {
        name: String,
        len: usize,
        expected: usize,
    },

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("row index {row} out of range for table with {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },
}

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;
