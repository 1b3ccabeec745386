//! Shift alignment for relative references.
//!
//! A reference `col[n+k]` evaluated at row `i` reads `col` at physical
//! row `i + k`; `col[n-k]` reads `i - k`. Positions outside `[0, N)`
//! resolve to `Null`. The direction matters: a positive offset always
//! looks *ahead* in the table's natural row order.

use crate::expr::{Expr, ShiftedColumns};
use crate::replace::error::{ReplaceError, ReplaceResult};
use crate::table::{Table, Value};

/// Materialize one row-shifted copy of `column`, aligned to the original
/// row index.
pub fn shifted_column(table: &Table, column: &str, offset: i64) -> ReplaceResult<Vec<Value>> {
    let col = table
        .column(column)
        .ok_or_else(|| ReplaceError::MissingColumn {
            name: column.to_string(),
        })?;

    let n = col.len() as i64;
    let values = (0..n)
        .map(|i| match i.checked_add(offset) {
            Some(j) if (0..n).contains(&j) => col.values()[j as usize].clone(),
            _ => Value::Null,
        })
        .collect();
    Ok(values)
}

/// Build the shifted column set for every distinct `(column, offset)`
/// reference appearing in the given expressions.
pub fn materialize_shifts<'a, I>(table: &Table, exprs: I) -> ReplaceResult<ShiftedColumns>
where
    I: IntoIterator<Item = &'a Expr>,
{
    let mut shifted = ShiftedColumns::new();
    for expr in exprs {
        for (column, offset) in expr.relative_refs() {
            if shifted.get(column, offset).is_none() {
                let values = shifted_column(table, column, offset)?;
                shifted.insert(column, offset, values);
            }
        }
    }
    Ok(shifted)
}
