//! sdfc Syntax - Scene language front end
//!
//! Scenes are written as whitespace-delimited S-expressions. Each form starts
//! with an operator identifier followed by its operands, which are either
//! numeric literals or nested forms:
//!
//! ```text
//! (mLamb 0.8
//!   (oUnion
//!     (pSphere 1)
//!     (tTrans 0 1 0 (pBox 1 1 1))))
//! ```
//!
//! ## Key Types
//!
//! - [`Token`] - One lexical unit produced by [`tokenize`]
//! - [`Expr`] - The scene expression tree
//! - [`Parser`] - Recursive-descent parser over a token slice
//!
//! ## Example
//!
//! ```rust
//! use sdfc_syntax::{Expr, parse_scene};
//!
//! let scene = parse_scene("(pSphere 1)").unwrap();
//! assert_eq!(scene.operator(), Some("pSphere"));
//! assert_eq!(scene.operands(), &[Expr::Literal(1.0)]);
//! ```

mod error;
mod expr;
mod parser;
mod token;

pub use error::{Result, SyntaxError};
pub use expr::Expr;
pub use parser::{MAX_DEPTH, Parser, parse_scene, parse_tokens};
pub use token::{Token, TokenKind, is_numeric, tokenize};
