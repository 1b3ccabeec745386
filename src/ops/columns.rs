//! Column renaming and repositioning.

use crate::table::{Table, TableError, TableResult};

/// Target position for `move_column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPosition<'a> {
    First,
    Last,
    Before(&'a str),
    After(&'a str),
    /// Zero-based final index
    Index(usize),
}

/// Rename columns from `(old, new)` pairs, in order.
pub fn rename_columns(table: &mut Table, renames: &[(&str, &str)]) -> TableResult<()> {
    for (old, new) in renames {
        table.rename_column(old, *new)?;
    }
    Ok(())
}

/// Prepend `prefix` to every column name.
pub fn add_prefix(table: &mut Table, prefix: &str) -> TableResult<()> {
    let names: Vec<String> = table.column_names().iter().map(|s| s.to_string()).collect();
    for name in names {
        table.rename_column(&name, format!("{}{}", prefix, name))?;
    }
    Ok(())
}

/// Append `suffix` to every column name.
pub fn add_suffix(table: &mut Table, suffix: &str) -> TableResult<()> {
    let names: Vec<String> = table.column_names().iter().map(|s| s.to_string()).collect();
    for name in names {
        table.rename_column(&name, format!("{}{}", name, suffix))?;
    }
    Ok(())
}

/// Strip `prefix` from every column name that carries it. Names that do
/// not carry it, or that would become empty, are left alone.
pub fn strip_prefix(table: &mut Table, prefix: &str) -> TableResult<()> {
    let names: Vec<String> = table.column_names().iter().map(|s| s.to_string()).collect();
    for name in names {
        if let Some(stripped) = name.strip_prefix(prefix) {
            if !stripped.is_empty() {
                table.rename_column(&name, stripped)?;
            }
        }
    }
    Ok(())
}

/// Strip `suffix` from every column name that carries it.
pub fn strip_suffix(table: &mut Table, suffix: &str) -> TableResult<()> {
    let names: Vec<String> = table.column_names().iter().map(|s| s.to_string()).collect();
    for name in names {
        if let Some(stripped) = name.strip_suffix(suffix) {
            if !stripped.is_empty() {
                table.rename_column(&name, stripped)?;
            }
        }
    }
    Ok(())
}

/// Move a column to a new position, keeping every other column's order.
pub fn move_column(table: &mut Table, name: &str, position: ColumnPosition) -> TableResult<()> {
    let from = table
        .column_index(name)
        .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;

    // Index into the column list with the moved column removed
    let target = match position {
        ColumnPosition::First => 0,
        ColumnPosition::Last => table.n_cols(),
        ColumnPosition::Index(i) => i,
        ColumnPosition::Before(reference) => {
            let i = table
                .column_index(reference)
                .ok_or_else(|| TableError::UnknownColumn(reference.to_string()))?;
            if from < i {
                i - 1
            } else {
                i
            }
        }
        ColumnPosition::After(reference) => {
            let i = table
                .column_index(reference)
                .ok_or_else(|| TableError::UnknownColumn(reference.to_string()))?;
            if from < i {
                i
            } else {
                i + 1
            }
        }
    };

    table.move_column_to(name, target)
}
