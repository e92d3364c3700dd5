//! Recursive-descent parser for the scene language
//!
//! Grammar:
//!
//! ```text
//! expr := LITERAL
//!       | '(' IDENTIFIER expr* ')'
//! ```
//!
//! The parser only checks shape. Whether an operator exists and how many
//! operands it takes is decided later by the code generator.

use crate::error::{Result, SyntaxError};
use crate::expr::Expr;
use crate::token::{Token, TokenKind, tokenize};

/// Maximum nesting of forms accepted by the parser
pub const MAX_DEPTH: usize = 256;

/// Parser state: a token slice and a cursor into it
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Index of the next unconsumed token
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// The next unconsumed token, if any
    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    /// Parse one expression starting at the cursor
    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_at_depth(0)
    }

    fn next_token(&mut self) -> Result<&'a Token> {
        let token = self.tokens.get(self.pos).ok_or(SyntaxError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn parse_at_depth(&mut self, depth: usize) -> Result<Expr> {
        let token = self.next_token()?;

        match &token.kind {
            TokenKind::Literal(text) => parse_literal(text, token),
            TokenKind::OpenGroup => {
                if depth >= MAX_DEPTH {
                    return Err(SyntaxError::TooDeep {
                        limit: MAX_DEPTH,
                        line: token.line,
                        column: token.column,
                    });
                }

                let head = self.next_token()?;
                let TokenKind::Identifier(operator) = &head.kind else {
                    return Err(SyntaxError::ExpectedOperator {
                        found: head.kind.to_string(),
                        line: head.line,
                        column: head.column,
                    });
                };

                let mut operands = Vec::new();
                loop {
                    let next = self.peek().ok_or(SyntaxError::UnexpectedEnd)?;
                    if next.kind == TokenKind::CloseGroup {
                        self.pos += 1;
                        break;
                    }
                    operands.push(self.parse_at_depth(depth + 1)?);
                }

                Ok(Expr::Form {
                    operator: operator.clone(),
                    operands,
                })
            }
            TokenKind::CloseGroup | TokenKind::Identifier(_) => Err(SyntaxError::UnexpectedToken {
                found: token.kind.to_string(),
                line: token.line,
                column: token.column,
            }),
        }
    }
}

fn parse_literal(text: &str, token: &Token) -> Result<Expr> {
    match text.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(Expr::Literal(value)),
        _ => Err(SyntaxError::InvalidLiteral {
            text: text.to_string(),
            line: token.line,
            column: token.column,
        }),
    }
}

/// Parse the first expression of `tokens`.
///
/// Tokens after that expression are left unexamined.
pub fn parse_tokens(tokens: &[Token]) -> Result<Expr> {
    Parser::new(tokens).parse_expr()
}

/// Tokenize and parse a whole scene, rejecting anything after the root expression
pub fn parse_scene(source: &str) -> Result<Expr> {
    let tokens = tokenize(source);
    let mut parser = Parser::new(&tokens);
    let root = parser.parse_expr()?;

    if let Some(extra) = parser.peek() {
        return Err(SyntaxError::TrailingTokens {
            found: extra.kind.to_string(),
            line: extra.line,
            column: extra.column,
        });
    }

    tracing::debug!(tokens = tokens.len(), "parsed scene");
    Ok(root)
}
