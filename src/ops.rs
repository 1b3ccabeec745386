//! Table housekeeping helpers.
//!
//! Small operations the surrounding wrangling scripts lean on: renaming
//! and repositioning columns, explicit row moves, and group-wise
//! diagnostics. None of them touch the replace engine.

pub mod columns;
pub mod groups;
pub mod rows;

pub use columns::{
    add_prefix, add_suffix, move_column, rename_columns, strip_prefix, strip_suffix,
    ColumnPosition,
};
pub use groups::{duplicate_conflicts, sequence_in_group, SequenceKind};
pub use rows::{move_row, RowPosition};
