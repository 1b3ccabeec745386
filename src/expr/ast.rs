//! Expression AST definitions.

use crate::table::Value;
use std::collections::BTreeSet;

/// Binary operators supported in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
        }
    }
}

/// Unary operators supported in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
        }
    }
}

/// Expression tree node
///
/// A relative reference `col[n+k]` is a first-class node rather than a
/// rewritten substring, so resolution never depends on text substitution.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal constant value
    Literal(Value),

    /// Reference to the current row's value in a column
    Column(String),

    /// Reference to another row's value in a column, offset from the
    /// current row by `offset` physical positions
    RelativeRef { column: String, offset: i64 },

    /// Binary operation
    BinaryOp {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary operation
    UnaryOp { op: UnaryOp, operand: Box<Expr> },
}

impl Expr {
    /// Create a literal expression
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    /// Create a column reference expression
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    /// Create a relative reference expression
    pub fn relative(column: impl Into<String>, offset: i64) -> Self {
        Expr::RelativeRef {
            column: column.into(),
            offset,
        }
    }

    /// Create a binary operation expression
    pub fn binary_op(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a unary operation expression
    pub fn unary_op(op: UnaryOp, operand: Expr) -> Self {
        Expr::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Self::binary_op(BinaryOp::And, left, right)
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Self::binary_op(BinaryOp::Or, left, right)
    }

    pub fn not_expr(operand: Expr) -> Self {
        Self::unary_op(UnaryOp::Not, operand)
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::binary_op(BinaryOp::Eq, left, right)
    }

    pub fn gt(left: Expr, right: Expr) -> Self {
        Self::binary_op(BinaryOp::Gt, left, right)
    }

    pub fn lt(left: Expr, right: Expr) -> Self {
        Self::binary_op(BinaryOp::Lt, left, right)
    }

    /// Check if this expression is a constant (no row dependence)
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Literal(_) => true,
            Expr::Column(_) | Expr::RelativeRef { .. } => false,
            Expr::BinaryOp { left, right, .. } => left.is_constant() && right.is_constant(),
            Expr::UnaryOp { operand, .. } => operand.is_constant(),
        }
    }

    /// Every column name the expression reads, through both plain and
    /// relative references.
    pub fn referenced_columns(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Column(name) => {
                out.insert(name.as_str());
            }
            Expr::RelativeRef { column, .. } => {
                out.insert(column.as_str());
            }
            Expr::BinaryOp { left, right, .. } => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Expr::UnaryOp { operand, .. } => operand.collect_columns(out),
        }
    }

    /// All distinct `(column, offset)` pairs used by relative references.
    pub fn relative_refs(&self) -> BTreeSet<(&str, i64)> {
        let mut out = BTreeSet::new();
        self.collect_relative_refs(&mut out);
        out
    }

    fn collect_relative_refs<'a>(&'a self, out: &mut BTreeSet<(&'a str, i64)>) {
        match self {
            Expr::Literal(_) | Expr::Column(_) => {}
            Expr::RelativeRef { column, offset } => {
                out.insert((column.as_str(), *offset));
            }
            Expr::BinaryOp { left, right, .. } => {
                left.collect_relative_refs(out);
                right.collect_relative_refs(out);
            }
            Expr::UnaryOp { operand, .. } => operand.collect_relative_refs(out),
        }
    }
}
