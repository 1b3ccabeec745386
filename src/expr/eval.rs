//! Per-row expression evaluation.

use crate::expr::ast::{BinaryOp, Expr, UnaryOp};
use crate::expr::error::{ExprError, ExprResult};
use crate::table::{Table, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Materialized shifted columns, keyed by `(column, offset)`.
///
/// Entry `i` of a shifted column holds the source column's value at row
/// `i + offset`, or `Null` where that row does not exist. One entry is
/// shared by every occurrence of the same reference in an expression.
#[derive(Debug, Default)]
pub struct ShiftedColumns {
    map: HashMap<(String, i64), Vec<Value>>,
}

impl ShiftedColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, offset: i64, values: Vec<Value>) {
        self.map.insert((column.into(), offset), values);
    }

    pub fn get(&self, column: &str, offset: i64) -> Option<&[Value]> {
        self.map
            .get(&(column.to_string(), offset))
            .map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Evaluator for one row of a table.
pub struct RowContext<'a> {
    table: &'a Table,
    shifted: &'a ShiftedColumns,
    row: usize,
}

impl<'a> RowContext<'a> {
    pub fn new(table: &'a Table, shifted: &'a ShiftedColumns, row: usize) -> Self {
        Self {
            table,
            shifted,
            row,
        }
    }

    /// Evaluate an expression and return the result
    pub fn evaluate(&self, expr: &Expr) -> ExprResult<Value> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),

            Expr::Column(name) => self.evaluate_column(name),

            Expr::RelativeRef { column, offset } => self.evaluate_relative(column, *offset),

            Expr::BinaryOp { op, left, right } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                self.evaluate_binary_op(*op, left_val, right_val)
            }

            Expr::UnaryOp { op, operand } => {
                let operand_val = self.evaluate(operand)?;
                self.evaluate_unary_op(*op, operand_val)
            }
        }
    }

    fn evaluate_column(&self, name: &str) -> ExprResult<Value> {
        let column = self
            .table
            .column(name)
            .ok_or_else(|| ExprError::UnknownColumn(name.to_string()))?;
        column
            .values()
            .get(self.row)
            .cloned()
            .ok_or(ExprError::RowOutOfRange { row: self.row })
    }

    fn evaluate_relative(&self, column: &str, offset: i64) -> ExprResult<Value> {
        let values = self
            .shifted
            .get(column, offset)
            .ok_or_else(|| ExprError::UnknownShift {
                column: column.to_string(),
                offset,
            })?;
        values
            .get(self.row)
            .cloned()
            .ok_or(ExprError::RowOutOfRange { row: self.row })
    }

    /// Evaluate a binary operation
    fn evaluate_binary_op(&self, op: BinaryOp, left: Value, right: Value) -> ExprResult<Value> {
        // Null propagation: comparisons with the missing sentinel are
        // unknown, AND/OR follow Kleene logic, arithmetic stays missing.
        if left.is_null() || right.is_null() {
            return Ok(match op {
                BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge => Value::Null,
                BinaryOp::And => match (&left, &right) {
                    (Value::Boolean(false), _) | (_, Value::Boolean(false)) => {
                        Value::Boolean(false)
                    }
                    _ => Value::Null,
                },
                BinaryOp::Or => match (&left, &right) {
                    (Value::Boolean(true), _) | (_, Value::Boolean(true)) => Value::Boolean(true),
                    _ => Value::Null,
                },
                _ => Value::Null,
            });
        }

        match op {
            BinaryOp::Add => match (&left, &right) {
                (Value::Int64(a), Value::Int64(b)) => Ok(Value::Int64(a.wrapping_add(*b))),
                (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
                _ => self.numeric_op(op, &left, &right, |a, b| a + b),
            },

            BinaryOp::Sub => match (&left, &right) {
                (Value::Int64(a), Value::Int64(b)) => Ok(Value::Int64(a.wrapping_sub(*b))),
                _ => self.numeric_op(op, &left, &right, |a, b| a - b),
            },

            BinaryOp::Mul => match (&left, &right) {
                (Value::Int64(a), Value::Int64(b)) => Ok(Value::Int64(a.wrapping_mul(*b))),
                _ => self.numeric_op(op, &left, &right, |a, b| a * b),
            },

            // Division always produces a float
            BinaryOp::Div => match (left.as_f64(), right.as_f64()) {
                (Some(_), Some(b)) if b == 0.0 => Err(ExprError::DivisionByZero),
                (Some(a), Some(b)) => Ok(Value::Float64(a / b)),
                _ => Err(self.invalid_operands(op, &left, &right)),
            },

            BinaryOp::Mod => match (&left, &right) {
                (Value::Int64(_), Value::Int64(0)) => Err(ExprError::DivisionByZero),
                (Value::Int64(a), Value::Int64(b)) => Ok(Value::Int64(a % b)),
                _ => match (left.as_f64(), right.as_f64()) {
                    (Some(_), Some(b)) if b == 0.0 => Err(ExprError::DivisionByZero),
                    (Some(a), Some(b)) => Ok(Value::Float64(a % b)),
                    _ => Err(self.invalid_operands(op, &left, &right)),
                },
            },

            BinaryOp::Eq => Ok(Value::Boolean(values_equal(&left, &right))),
            BinaryOp::Ne => Ok(Value::Boolean(!values_equal(&left, &right))),

            // Ordered comparison across incomparable types is unknown,
            // so the row simply fails the condition.
            BinaryOp::Lt => Ok(ordering_to_value(compare_values(&left, &right), |o| {
                o == Ordering::Less
            })),
            BinaryOp::Le => Ok(ordering_to_value(compare_values(&left, &right), |o| {
                o != Ordering::Greater
            })),
            BinaryOp::Gt => Ok(ordering_to_value(compare_values(&left, &right), |o| {
                o == Ordering::Greater
            })),
            BinaryOp::Ge => Ok(ordering_to_value(compare_values(&left, &right), |o| {
                o != Ordering::Less
            })),

            BinaryOp::And => match (&left, &right) {
                (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(*a && *b)),
                _ => Err(self.invalid_operands(op, &left, &right)),
            },

            BinaryOp::Or => match (&left, &right) {
                (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(*a || *b)),
                _ => Err(self.invalid_operands(op, &left, &right)),
            },
        }
    }

    /// Apply `f` to the numeric views of both operands
    fn numeric_op<F>(&self, op: BinaryOp, left: &Value, right: &Value, f: F) -> ExprResult<Value>
    where
        F: FnOnce(f64, f64) -> f64,
    {
        match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float64(f(a, b))),
            _ => Err(self.invalid_operands(op, left, right)),
        }
    }

    /// Evaluate a unary operation
    fn evaluate_unary_op(&self, op: UnaryOp, operand: Value) -> ExprResult<Value> {
        match op {
            UnaryOp::Not => match operand {
                Value::Null => Ok(Value::Null),
                Value::Boolean(b) => Ok(Value::Boolean(!b)),
                _ => Err(ExprError::InvalidOperand {
                    operator: op.as_str(),
                    operand: operand.type_name(),
                }),
            },

            UnaryOp::Neg => match operand {
                Value::Null => Ok(Value::Null),
                Value::Int64(i) => Ok(Value::Int64(i.wrapping_neg())),
                Value::Float64(f) => Ok(Value::Float64(-f)),
                _ => Err(ExprError::InvalidOperand {
                    operator: op.as_str(),
                    operand: operand.type_name(),
                }),
            },

            UnaryOp::Pos => match operand {
                Value::Null | Value::Int64(_) | Value::Float64(_) => Ok(operand),
                _ => Err(ExprError::InvalidOperand {
                    operator: op.as_str(),
                    operand: operand.type_name(),
                }),
            },
        }
    }

    fn invalid_operands(&self, op: BinaryOp, left: &Value, right: &Value) -> ExprError {
        ExprError::InvalidOperands {
            operator: op.as_str(),
            left: left.type_name(),
            right: right.type_name(),
        }
    }
}

/// Equality across types: mixed numerics compare numerically, values of
/// different non-numeric types are simply unequal.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int64(a), Value::Float64(b)) => (*a as f64) == *b,
        (Value::Float64(a), Value::Int64(b)) => *a == (*b as f64),
        _ => left == right,
    }
}

/// Ordering across types: numerics coerce, strings and booleans compare
/// within their own type, everything else is incomparable.
fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int64(a), Value::Int64(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    }
}

fn ordering_to_value<F>(ordering: Option<Ordering>, f: F) -> Value
where
    F: FnOnce(Ordering) -> bool,
{
    match ordering {
        Some(o) => Value::Boolean(f(o)),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ast::Expr;

    fn table() -> Table {
        Table::from_columns(vec![
            (
                "a",
                vec![Value::Int64(10), Value::Int64(20), Value::Int64(30)],
            ),
            (
                "s",
                vec![
                    Value::String("x".to_string()),
                    Value::String("y".to_string()),
                    Value::Null,
                ],
            ),
        ])
        .unwrap()
    }

    fn eval_at(row: usize, expr: &Expr) -> ExprResult<Value> {
        let table = table();
        let shifted = ShiftedColumns::new();
        RowContext::new(&table, &shifted, row).evaluate(expr)
    }

    #[test]
    fn test_literal_and_column() {
        assert_eq!(eval_at(0, &Expr::literal(5i64)).unwrap(), Value::Int64(5));
        assert_eq!(eval_at(1, &Expr::column("a")).unwrap(), Value::Int64(20));
        assert!(matches!(
            eval_at(0, &Expr::column("zzz")),
            Err(ExprError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_relative_lookup() {
        let table = table();
        let mut shifted = ShiftedColumns::new();
        shifted.insert(
            "a",
            1,
            vec![Value::Int64(20), Value::Int64(30), Value::Null],
        );

        let ctx = RowContext::new(&table, &shifted, 0);
        assert_eq!(
            ctx.evaluate(&Expr::relative("a", 1)).unwrap(),
            Value::Int64(20)
        );

        // A reference that was never materialized is an internal error
        assert!(matches!(
            ctx.evaluate(&Expr::relative("a", 2)),
            Err(ExprError::UnknownShift { .. })
        ));
    }

    #[test]
    fn test_arithmetic() {
        let add = Expr::binary_op(BinaryOp::Add, Expr::column("a"), Expr::literal(5i64));
        assert_eq!(eval_at(0, &add).unwrap(), Value::Int64(15));

        let mixed = Expr::binary_op(BinaryOp::Mul, Expr::column("a"), Expr::literal(0.5f64));
        assert_eq!(eval_at(1, &mixed).unwrap(), Value::Float64(10.0));

        // Division always yields a float
        let div = Expr::binary_op(BinaryOp::Div, Expr::column("a"), Expr::literal(4i64));
        assert_eq!(eval_at(0, &div).unwrap(), Value::Float64(2.5));

        let div0 = Expr::binary_op(BinaryOp::Div, Expr::column("a"), Expr::literal(0i64));
        assert_eq!(eval_at(0, &div0), Err(ExprError::DivisionByZero));

        let modulo = Expr::binary_op(BinaryOp::Mod, Expr::literal(7i64), Expr::literal(4i64));
        assert_eq!(eval_at(0, &modulo).unwrap(), Value::Int64(3));
    }

    #[test]
    fn test_string_concat() {
        let expr = Expr::binary_op(BinaryOp::Add, Expr::literal("ab"), Expr::literal("cd"));
        assert_eq!(
            eval_at(0, &expr).unwrap(),
            Value::String("abcd".to_string())
        );
    }

    #[test]
    fn test_comparisons() {
        let gt = Expr::gt(Expr::column("a"), Expr::literal(15i64));
        assert_eq!(eval_at(0, &gt).unwrap(), Value::Boolean(false));
        assert_eq!(eval_at(1, &gt).unwrap(), Value::Boolean(true));

        // Mixed numerics compare numerically
        let eq = Expr::eq(Expr::literal(10i64), Expr::literal(10.0f64));
        assert_eq!(eval_at(0, &eq).unwrap(), Value::Boolean(true));

        // Equality across unrelated types is false, not an error
        let eq = Expr::eq(Expr::column("a"), Expr::literal("ten"));
        assert_eq!(eval_at(0, &eq).unwrap(), Value::Boolean(false));
        let ne = Expr::binary_op(BinaryOp::Ne, Expr::column("a"), Expr::literal("ten"));
        assert_eq!(eval_at(0, &ne).unwrap(), Value::Boolean(true));

        // Ordering across unrelated types is unknown
        let lt = Expr::lt(Expr::column("a"), Expr::literal("ten"));
        assert_eq!(eval_at(0, &lt).unwrap(), Value::Null);
    }

    #[test]
    fn test_null_semantics() {
        // Comparing the missing sentinel with a concrete value is unknown
        let eq = Expr::eq(Expr::column("s"), Expr::literal("x"));
        assert_eq!(eval_at(2, &eq).unwrap(), Value::Null);

        // Arithmetic with the sentinel stays missing
        let add = Expr::binary_op(BinaryOp::Add, Expr::column("s"), Expr::literal(1i64));
        assert_eq!(eval_at(2, &add).unwrap(), Value::Null);

        // Kleene logic
        let false_and_null = Expr::and(Expr::literal(false), Expr::literal(Value::Null));
        assert_eq!(eval_at(0, &false_and_null).unwrap(), Value::Boolean(false));
        let true_and_null = Expr::and(Expr::literal(true), Expr::literal(Value::Null));
        assert_eq!(eval_at(0, &true_and_null).unwrap(), Value::Null);
        let true_or_null = Expr::or(Expr::literal(true), Expr::literal(Value::Null));
        assert_eq!(eval_at(0, &true_or_null).unwrap(), Value::Boolean(true));
        let false_or_null = Expr::or(Expr::literal(false), Expr::literal(Value::Null));
        assert_eq!(eval_at(0, &false_or_null).unwrap(), Value::Null);
    }

    #[test]
    fn test_logical_and_not() {
        let expr = Expr::and(Expr::literal(true), Expr::literal(false));
        assert_eq!(eval_at(0, &expr).unwrap(), Value::Boolean(false));

        let expr = Expr::not_expr(Expr::literal(false));
        assert_eq!(eval_at(0, &expr).unwrap(), Value::Boolean(true));

        let expr = Expr::and(Expr::literal(1i64), Expr::literal(true));
        assert!(matches!(
            eval_at(0, &expr),
            Err(ExprError::InvalidOperands { .. })
        ));
    }

    #[test]
    fn test_unary_arithmetic() {
        let expr = Expr::unary_op(UnaryOp::Neg, Expr::literal(42i64));
        assert_eq!(eval_at(0, &expr).unwrap(), Value::Int64(-42));

        let expr = Expr::unary_op(UnaryOp::Pos, Expr::literal(1.5f64));
        assert_eq!(eval_at(0, &expr).unwrap(), Value::Float64(1.5));

        let expr = Expr::unary_op(UnaryOp::Neg, Expr::literal("x"));
        assert!(matches!(
            eval_at(0, &expr),
            Err(ExprError::InvalidOperand { .. })
        ));
    }

    #[test]
    fn test_invalid_arithmetic_operands() {
        let expr = Expr::binary_op(BinaryOp::Sub, Expr::literal("a"), Expr::literal(1i64));
        assert_eq!(
            eval_at(0, &expr),
            Err(ExprError::InvalidOperands {
                operator: "-",
                left: "str",
                right: "int",
            })
        );
    }
}
