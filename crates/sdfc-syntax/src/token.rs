//! Tokenizer for the scene language
//!
//! The language has no strings, comments or escapes: brackets delimit forms,
//! whitespace separates atoms, and everything else accumulates into an atom.

use std::fmt;

/// Lexical class of a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `(`
    OpenGroup,
    /// `)`
    CloseGroup,
    /// An atom recognized as a number by [`is_numeric`]
    Literal(String),
    /// Any other atom (operator names)
    Identifier(String),
}

/// A token together with the 1-based position of its first character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }

    /// Raw text of literal and identifier tokens
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Literal(text) | TokenKind::Identifier(text) => Some(text),
            TokenKind::OpenGroup | TokenKind::CloseGroup => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::OpenGroup => f.write_str("'('"),
            TokenKind::CloseGroup => f.write_str("')'"),
            TokenKind::Literal(text) => write!(f, "literal `{}`", text),
            TokenKind::Identifier(text) => write!(f, "identifier `{}`", text),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.line, self.column, self.kind)
    }
}

/// An atom is numeric if it starts with a digit, or with `-` followed by a digit
pub fn is_numeric(atom: &str) -> bool {
    let mut chars = atom.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Split scene source into tokens, in source order
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut atom = String::new();
    let mut atom_start = (1, 1);
    let mut line = 1;
    let mut column = 1;

    for c in source.chars() {
        let is_whitespace = matches!(c, ' ' | '\t' | '\n' | '\r');

        if c == '(' || c == ')' || is_whitespace {
            flush_atom(&mut atom, atom_start, &mut tokens);
            if c == '(' {
                tokens.push(Token::new(TokenKind::OpenGroup, line, column));
            } else if c == ')' {
                tokens.push(Token::new(TokenKind::CloseGroup, line, column));
            }
        } else {
            if atom.is_empty() {
                atom_start = (line, column);
            }
            atom.push(c);
        }

        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    // A scene may end right after its last atom
    flush_atom(&mut atom, atom_start, &mut tokens);

    tracing::trace!(count = tokens.len(), "tokenized scene");
    tokens
}

fn flush_atom(atom: &mut String, (line, column): (usize, usize), tokens: &mut Vec<Token>) {
    if atom.is_empty() {
        return;
    }

    let text = std::mem::take(atom);
    let kind = if is_numeric(&text) {
        TokenKind::Literal(text)
    } else {
        TokenKind::Identifier(text)
    };
    tokens.push(Token::new(kind, line, column));
}
