//! Error types for scene compilation

use sdfc_syntax::SyntaxError;
use thiserror::Error;

use crate::operators::Role;

/// Result type alias using the compiler's error type
pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors that abort a compile call. No partial output is produced.
#[derive(Error, Debug)]
pub enum CompileError {
    /// The scene source does not match the grammar
    #[error("malformed scene: {0}")]
    Syntax(#[from] SyntaxError),

    /// No operator table entry for this identifier
    #[error("unknown operator `{name}`")]
    UnknownOperator { name: String },

    /// A primitive (or context reference) with the wrong number of operands
    #[error("`{operator}` takes {expected} operand(s), found {found}")]
    ArityMismatch {
        operator: String,
        expected: usize,
        found: usize,
    },

    /// A wrapper or combinator without the shape operand(s) it needs
    #[error("`{operator}` needs at least {required} operand(s), found {found}")]
    MissingOperands {
        operator: String,
        required: usize,
        found: usize,
    },

    /// A table entry whose name does not carry its role's prefix
    #[error("operator `{name}` is registered as a {role} but does not start with '{}'", .role.prefix())]
    UnreachableRole { name: String, role: Role },

    /// A shape where a literal or context reference was expected
    #[error("`{operator}` expects a literal parameter, found `{found}`")]
    ExpectedParameter { operator: String, found: String },

    /// The two lowering passes disagreed on the number of primitives
    #[error("emitted {emitted} primitive binding(s) but referenced {referenced}")]
    PassMismatch { emitted: usize, referenced: usize },

    /// Invalid configuration file
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Shader template problem
    #[error("template error: {0}")]
    Template(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
