//! State and helpers shared by the two lowering passes
//!
//! Both passes walk the same tree in the same order: operands left to right,
//! depth first, skipping combinator literal parameters. The primitive pass
//! declares binding `N` for the N-th primitive visited and the concatenation
//! pass refers to binding `N` for the N-th primitive it visits, so the order
//! must match exactly. Each pass takes the next binding index as an argument
//! and returns the index after the subtree it lowered.

use sdfc_syntax::Expr;

use crate::error::{CompileError, Result};
use crate::operators::{ContextValue, Operator, OperatorTable};
use crate::target::Target;

/// Material and point expressions in effect for a subtree.
///
/// Wrappers extend the context for their trailing operand only, by building
/// a new value; siblings keep seeing the outer context.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Context<'a> {
    pub point: &'a str,
    pub material: &'a str,
}

impl<'a> Context<'a> {
    pub fn new(point: &'a str, material: &'a str) -> Self {
        Self { point, material }
    }

    pub fn with_point<'b>(self, point: &'b str) -> Context<'b>
    where
        'a: 'b,
    {
        Context {
            point,
            material: self.material,
        }
    }

    pub fn with_material<'b>(self, material: &'b str) -> Context<'b>
    where
        'a: 'b,
    {
        Context {
            point: self.point,
            material,
        }
    }
}

/// One compile call's view of the operator table and target
pub(crate) struct Lowering<'c> {
    pub table: &'c OperatorTable,
    pub target: &'c Target,
}

impl<'c> Lowering<'c> {
    pub fn new(table: &'c OperatorTable, target: &'c Target) -> Self {
        Self { table, target }
    }

    /// Text of an operand in a parameter slot: a literal or a context reference
    pub fn parameter(&self, owner: &str, node: &Expr, point: &str) -> Result<String> {
        match node {
            Expr::Literal(value) => Ok(format_literal(*value)),
            Expr::Form { operator, operands } => match self.table.lookup(operator)? {
                Operator::Context(value) => {
                    expect_arity(operator, 0, operands.len())?;
                    Ok(self.resolve(value, point))
                }
                _ => Err(CompileError::ExpectedParameter {
                    operator: owner.to_string(),
                    found: operator.clone(),
                }),
            },
        }
    }

    pub fn parameters(&self, owner: &str, nodes: &[Expr], point: &str) -> Result<Vec<String>> {
        nodes
            .iter()
            .map(|node| self.parameter(owner, node, point))
            .collect()
    }

    pub fn resolve(&self, value: &ContextValue, point: &str) -> String {
        match value {
            ContextValue::CurrentPoint => point.to_string(),
            ContextValue::WorldPoint => self.target.point.clone(),
            ContextValue::Named(name) => name.clone(),
        }
    }
}

/// Literal text as it appears in generated code (`1`, `0.5`, `-2.25`).
///
/// Magnitudes outside `[1e-5, 1e7)` use exponent notation (`1e20`), so a
/// large whole number never reaches the shader as an out-of-range int.
pub(crate) fn format_literal(value: f32) -> String {
    let magnitude = value.abs();
    if magnitude > 0.0 && !(1e-5..1e7).contains(&magnitude) {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

pub(crate) fn expect_arity(operator: &str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(CompileError::ArityMismatch {
            operator: operator.to_string(),
            expected,
            found,
        })
    }
}

/// Split a wrapper's operands into its parameters and its trailing sub-scene
pub(crate) fn split_trailing<'e>(operator: &str, operands: &'e [Expr]) -> Result<(&'e [Expr], &'e Expr)> {
    operands
        .split_last()
        .map(|(scene, params)| (params, scene))
        .ok_or_else(|| CompileError::MissingOperands {
            operator: operator.to_string(),
            required: 1,
            found: 0,
        })
}

/// Split a combinator's operands into its literal parameters, its first shape
/// and the remaining shapes
pub(crate) fn split_combinator<'e>(
    operator: &str,
    literal_params: usize,
    operands: &'e [Expr],
) -> Result<(&'e [Expr], &'e Expr, &'e [Expr])> {
    let missing = || CompileError::MissingOperands {
        operator: operator.to_string(),
        required: literal_params + 1,
        found: operands.len(),
    };

    let (params, shapes) = operands.split_at_checked(literal_params).ok_or_else(missing)?;
    let (first, rest) = shapes.split_first().ok_or_else(missing)?;
    Ok((params, first, rest))
}

/// `callee(a, b, ...)`
pub(crate) fn call(callee: &str, args: &[String]) -> String {
    format!("{}({})", callee, args.join(", "))
}

/// `callee(point, a, b, ...)`
pub(crate) fn call_with_point(callee: &str, point: &str, args: &[String]) -> String {
    if args.is_empty() {
        format!("{}({})", callee, point)
    } else {
        format!("{}({}, {})", callee, point, args.join(", "))
    }
}
