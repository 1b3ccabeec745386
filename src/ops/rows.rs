//! Explicit row repositioning.
//!
//! The replace engine never reorders rows; when a caller really wants a
//! different physical order, this is the operation that says so.

use crate::table::{Table, TableError, TableResult};

/// Target position for `move_row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPosition {
    First,
    Last,
    Before(usize),
    After(usize),
}

/// Move one row to a new position, preserving the relative order of all
/// other rows.
pub fn move_row(table: &mut Table, row: usize, position: RowPosition) -> TableResult<()> {
    let rows = table.n_rows();
    if row >= rows {
        return Err(TableError::RowOutOfRange { row, rows });
    }

    // Index into the row sequence with the moved row removed
    let target = match position {
        RowPosition::First => 0,
        RowPosition::Last => rows,
        RowPosition::Before(reference) => {
            if reference >= rows {
                return Err(TableError::RowOutOfRange {
                    row: reference,
                    rows,
                });
            }
            if row < reference {
                reference - 1
            } else {
                reference
            }
        }
        RowPosition::After(reference) => {
            if reference >= rows {
                return Err(TableError::RowOutOfRange {
                    row: reference,
                    rows,
                });
            }
            if row < reference {
                reference
            } else {
                reference + 1
            }
        }
    };

    let values = table.take_row(row)?;
    table.insert_row(target.min(table.n_rows()), values)
}
