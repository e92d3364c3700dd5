//! Scene expression tree

use std::fmt;

/// A node of the scene tree.
///
/// Forms own their operands directly; the tree is built bottom-up by the
/// parser and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal
    Literal(f32),
    /// An operator applied to an ordered list of operands
    Form {
        operator: String,
        operands: Vec<Expr>,
    },
}

impl Expr {
    pub fn form(operator: impl Into<String>, operands: Vec<Expr>) -> Self {
        Expr::Form {
            operator: operator.into(),
            operands,
        }
    }

    /// Operator identifier of a form
    pub fn operator(&self) -> Option<&str> {
        match self {
            Expr::Form { operator, .. } => Some(operator),
            Expr::Literal(_) => None,
        }
    }

    /// Operands of a form (empty for literals)
    pub fn operands(&self) -> &[Expr] {
        match self {
            Expr::Form { operands, .. } => operands,
            Expr::Literal(_) => &[],
        }
    }

    pub fn as_literal(&self) -> Option<f32> {
        match self {
            Expr::Literal(value) => Some(*value),
            Expr::Form { .. } => None,
        }
    }

    /// Number of forms whose operator satisfies `predicate`, over the whole subtree
    pub fn count_forms(&self, predicate: &impl Fn(&str) -> bool) -> usize {
        match self {
            Expr::Literal(_) => 0,
            Expr::Form { operator, operands } => {
                let own = usize::from(predicate(operator));
                own + operands
                    .iter()
                    .map(|operand| operand.count_forms(predicate))
                    .sum::<usize>()
            }
        }
    }

    /// Indented one-node-per-line rendering, used by `sdfc tree`
    pub fn tree(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, depth: usize) {
        out.push_str(&"  ".repeat(depth));
        match self {
            Expr::Literal(value) => out.push_str(&format!("{}\n", value)),
            Expr::Form { operator, operands } => {
                out.push_str(operator);
                out.push('\n');
                for operand in operands {
                    operand.write_tree(out, depth + 1);
                }
            }
        }
    }
}

impl fmt::Display for Expr {
    /// Renders the expression back to scene source on a single line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Form { operator, operands } => {
                write!(f, "({}", operator)?;
                for operand in operands {
                    write!(f, " {}", operand)?;
                }
                f.write_str(")")
            }
        }
    }
}
