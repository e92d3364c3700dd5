//! Error types for the scene front end

use thiserror::Error;

/// Result type alias using the front end's error type
pub type Result<T> = std::result::Result<T, SyntaxError>;

/// A scene whose token stream does not match the grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// `(` was not followed by an operator identifier
    #[error("expected an operator after '(' at line {line}, column {column}, found {found}")]
    ExpectedOperator {
        found: String,
        line: usize,
        column: usize,
    },

    /// A token that cannot start an expression
    #[error("unexpected {found} at line {line}, column {column}")]
    UnexpectedToken {
        found: String,
        line: usize,
        column: usize,
    },

    /// The scene ended in the middle of an expression
    #[error("unexpected end of scene")]
    UnexpectedEnd,

    /// A literal token that is not a finite floating-point number
    #[error("invalid numeric literal `{text}` at line {line}, column {column}")]
    InvalidLiteral {
        text: String,
        line: usize,
        column: usize,
    },

    /// Tokens left over after the root expression
    #[error("unexpected {found} after the end of the scene at line {line}, column {column}")]
    TrailingTokens {
        found: String,
        line: usize,
        column: usize,
    },

    /// Forms nested deeper than [`crate::MAX_DEPTH`]
    #[error("scene nested deeper than {limit} levels at line {line}, column {column}")]
    TooDeep {
        limit: usize,
        line: usize,
        column: usize,
    },
}
