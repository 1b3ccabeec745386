//! Expression language for conditions and value expressions.
//!
//! This module provides:
//! - Lexer and parser for the small condition/value grammar
//! - Typed AST with relative references (`col[n+k]`) as first-class nodes
//! - Per-row evaluation with Null-aware three-valued logic

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use error::{ExprError, ExprResult};
pub use eval::{RowContext, ShiftedColumns};
pub use lexer::Lexer;
pub use parser::{parse_expression, Parser};
pub use token::Token;
