// Expression parser - converts tokens to AST

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::lexer::Lexer;
use super::token::Token;
use crate::table::Value;
use anyhow::{bail, Result};

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        let tokens = Lexer::new(input).tokenize();
        Parser {
            tokens,
            position: 0,
        }
    }

    /// Parse a complete expression
    pub fn parse(&mut self) -> Result<Expr> {
        let expr = self.parse_or()?;
        if !self.match_token(&Token::Eof) {
            bail!("unexpected input after expression: {:?}", self.current_token());
        }
        Ok(expr)
    }

    /// Parse OR expression
    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;

        while self.match_token(&Token::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::BinaryOp {
                op: BinaryOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse AND expression
    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_not()?;

        while self.match_token(&Token::And) {
            self.advance();
            let right = self.parse_not()?;
            left = Expr::BinaryOp {
                op: BinaryOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse NOT expression
    fn parse_not(&mut self) -> Result<Expr> {
        if self.match_token(&Token::Not) {
            self.advance();
            let operand = self.parse_not()?;
            Ok(Expr::UnaryOp {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            })
        } else {
            self.parse_comparison()
        }
    }

    /// Parse comparison expression
    fn parse_comparison(&mut self) -> Result<Expr> {
        let left = self.parse_addition()?;

        let op = match self.current_token() {
            Token::Equal => Some(BinaryOp::Eq),
            Token::NotEqual => Some(BinaryOp::Ne),
            Token::Less => Some(BinaryOp::Lt),
            Token::LessEqual => Some(BinaryOp::Le),
            Token::Greater => Some(BinaryOp::Gt),
            Token::GreaterEqual => Some(BinaryOp::Ge),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let right = self.parse_addition()?;
            Ok(Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            })
        } else {
            Ok(left)
        }
    }

    /// Parse addition/subtraction expression
    fn parse_addition(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplication()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();

            let right = self.parse_multiplication()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse multiplication/division expression
    fn parse_multiplication(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();

            let right = self.parse_unary()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse unary expression
    fn parse_unary(&mut self) -> Result<Expr> {
        match self.current_token() {
            Token::Plus => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expr::UnaryOp {
                    op: UnaryOp::Pos,
                    operand: Box::new(operand),
                })
            }
            Token::Minus => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expr::UnaryOp {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                })
            }
            _ => self.parse_primary(),
        }
    }

    /// Parse primary expression
    fn parse_primary(&mut self) -> Result<Expr> {
        match self.current_token() {
            Token::Number(n) => {
                self.advance();
                if let Ok(i) = n.parse::<i64>() {
                    Ok(Expr::Literal(Value::Int64(i)))
                } else if let Ok(f) = n.parse::<f64>() {
                    Ok(Expr::Literal(Value::Float64(f)))
                } else {
                    bail!("invalid number: {}", n)
                }
            }
            Token::String(s) => {
                self.advance();
                Ok(Expr::Literal(Value::String(s)))
            }
            Token::True => {
                self.advance();
                Ok(Expr::Literal(Value::Boolean(true)))
            }
            Token::False => {
                self.advance();
                Ok(Expr::Literal(Value::Boolean(false)))
            }
            Token::Null => {
                self.advance();
                Ok(Expr::Literal(Value::Null))
            }
            Token::Identifier(name) => {
                self.advance();
                if self.match_token(&Token::LeftBracket) {
                    self.parse_relative_ref(name)
                } else {
                    Ok(Expr::Column(name))
                }
            }
            Token::LeftParen => {
                self.advance();
                let expr = self.parse_or()?;
                self.expect_token(Token::RightParen)?;
                Ok(expr)
            }
            other => bail!("unexpected token: {:?}", other),
        }
    }

    /// Parse the `[n±k]` tail of a relative reference.
    ///
    /// `col[n]`, `col[n+0]` and `col[n-0]` all mean the current row.
    fn parse_relative_ref(&mut self, column: String) -> Result<Expr> {
        self.expect_token(Token::LeftBracket)?;

        match self.current_token() {
            Token::Identifier(ref id) if id == "n" => self.advance(),
            other => bail!(
                "expected 'n' inside relative reference on {}, found {:?}",
                column,
                other
            ),
        }

        let offset = match self.current_token() {
            Token::RightBracket => 0,
            Token::Plus => {
                self.advance();
                self.expect_offset()?
            }
            Token::Minus => {
                self.advance();
                -self.expect_offset()?
            }
            other => bail!(
                "expected '+', '-' or ']' in relative reference on {}, found {:?}",
                column,
                other
            ),
        };

        self.expect_token(Token::RightBracket)?;
        Ok(Expr::RelativeRef { column, offset })
    }

    /// Expect an integer offset inside a relative reference
    fn expect_offset(&mut self) -> Result<i64> {
        match self.current_token() {
            Token::Number(n) => {
                let offset = n
                    .parse::<i64>()
                    .map_err(|_| anyhow::anyhow!("relative offset must be an integer, got {}", n))?;
                self.advance();
                Ok(offset)
            }
            other => bail!("expected offset digits, found {:?}", other),
        }
    }

    // Helper methods

    /// Get current token
    fn current_token(&self) -> Token {
        self.tokens
            .get(self.position)
            .cloned()
            .unwrap_or(Token::Eof)
    }

    /// Advance to next token
    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    /// Check if current token matches
    fn match_token(&self, token: &Token) -> bool {
        self.current_token() == *token
    }

    /// Expect a specific token
    fn expect_token(&mut self, token: Token) -> Result<()> {
        if self.current_token() == token {
            self.advance();
            Ok(())
        } else {
            bail!("expected {:?}, found {:?}", token, self.current_token())
        }
    }
}

/// Parse one expression string into an AST
pub fn parse_expression(input: &str) -> Result<Expr> {
    Parser::new(input).parse()
}
