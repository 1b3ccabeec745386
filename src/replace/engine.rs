//! Conditional replace over table columns.
//!
//! `replace` mimics a statistical package's replace command: assign a new
//! value into a column for every row satisfying a condition, where both
//! the condition and the value may reference other rows through the
//! `col[n+k]` / `col[n-k]` notation. The caller's table is never touched;
//! the modified copy comes back together with the number of cells whose
//! stored value actually changed.

use crate::expr::{parse_expression, Expr, RowContext, ShiftedColumns};
use crate::replace::error::{ReplaceError, ReplaceResult};
use crate::replace::shift::materialize_shifts;
use crate::table::{Table, Value};

/// Conditionally assign `new_value` into `column`.
///
/// `new_value` is an expression string: a literal (`5`, `2.5`, `'text'`,
/// `true`, `null`), an existing column name, a relative reference
/// (`price[n-1]`), or an arithmetic combination of those. `condition`
/// selects the rows to modify; an empty condition selects every row.
///
/// Returns the modified copy and the count of rows whose value actually
/// differs afterwards. Rows outside the condition are returned untouched.
pub fn replace(
    table: &Table,
    column: &str,
    new_value: &str,
    condition: &str,
) -> ReplaceResult<(Table, usize)> {
    let value_expr = parse_text(new_value)?;
    replace_with_expr(table, column, &value_expr, new_value, condition)
}

/// Non-expression variant: broadcast a ready value to every selected row.
pub fn simple_replace(
    table: &Table,
    column: &str,
    value: Value,
    condition: &str,
) -> ReplaceResult<(Table, usize)> {
    let value_expr = Expr::Literal(value);
    replace_with_expr(table, column, &value_expr, "<literal>", condition)
}

fn replace_with_expr(
    table: &Table,
    column: &str,
    value_expr: &Expr,
    value_text: &str,
    condition: &str,
) -> ReplaceResult<(Table, usize)> {
    if !table.has_column(column) {
        return Err(ReplaceError::MissingColumn {
            name: column.to_string(),
        });
    }

    let condition_expr = if condition.trim().is_empty() {
        None
    } else {
        Some(parse_text(condition)?)
    };

    // Every referenced column must exist before anything is evaluated.
    let mut exprs = vec![value_expr];
    if let Some(expr) = condition_expr.as_ref() {
        exprs.push(expr);
    }
    for expr in &exprs {
        for name in expr.referenced_columns() {
            if !table.has_column(name) {
                return Err(ReplaceError::MissingColumn {
                    name: name.to_string(),
                });
            }
        }
    }

    let shifted = materialize_shifts(table, exprs.iter().copied())?;
    let mask = build_mask(table, &shifted, condition_expr.as_ref(), condition)?;
    let values = build_values(table, &shifted, value_expr, value_text)?;

    let mut out = table.clone();
    let mut count = 0;
    for (row, selected) in mask.iter().enumerate() {
        if !selected {
            continue;
        }
        let changed = out.value(row, column) != Some(&values[row]);
        match out.set_value(row, column, values[row].clone()) {
            Ok(()) => {}
            Err(_) => unreachable!("column and row bounds validated before assignment"),
        }
        if changed {
            count += 1;
        }
    }

    log::info!("{} real changes made", count);
    Ok((out, count))
}

fn parse_text(input: &str) -> ReplaceResult<Expr> {
    parse_expression(input).map_err(|e| ReplaceError::MalformedExpression {
        expr: input.to_string(),
        reason: e.to_string(),
    })
}

/// Evaluate the condition into a per-row mask. No condition means every
/// row; a `Null` result means the row is not selected.
fn build_mask(
    table: &Table,
    shifted: &ShiftedColumns,
    condition_expr: Option<&Expr>,
    condition_text: &str,
) -> ReplaceResult<Vec<bool>> {
    let n = table.n_rows();
    let expr = match condition_expr {
        None => return Ok(vec![true; n]),
        Some(expr) => expr,
    };

    let mut mask = Vec::with_capacity(n);
    for row in 0..n {
        let result = RowContext::new(table, shifted, row)
            .evaluate(expr)
            .map_err(|e| ReplaceError::MalformedExpression {
                expr: condition_text.to_string(),
                reason: e.to_string(),
            })?;
        match result {
            Value::Boolean(b) => mask.push(b),
            Value::Null => mask.push(false),
            other => {
                return Err(ReplaceError::MalformedExpression {
                    expr: condition_text.to_string(),
                    reason: format!("condition evaluated to {}, expected a boolean", other.type_name()),
                })
            }
        }
    }
    Ok(mask)
}

/// Resolve the replacement expression to one value per row.
fn build_values(
    table: &Table,
    shifted: &ShiftedColumns,
    value_expr: &Expr,
    value_text: &str,
) -> ReplaceResult<Vec<Value>> {
    let n = table.n_rows();
    let malformed = |e: crate::expr::ExprError| ReplaceError::MalformedExpression {
        expr: value_text.to_string(),
        reason: e.to_string(),
    };

    // A constant broadcasts without touching any row.
    if value_expr.is_constant() {
        let value = RowContext::new(table, shifted, 0)
            .evaluate(value_expr)
            .map_err(malformed)?;
        return Ok(vec![value; n]);
    }

    let mut values = Vec::with_capacity(n);
    for row in 0..n {
        let value = RowContext::new(table, shifted, row)
            .evaluate(value_expr)
            .map_err(malformed)?;
        values.push(value);
    }
    Ok(values)
}
