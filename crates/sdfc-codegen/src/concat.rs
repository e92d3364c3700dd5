//! Second pass: compose the bindings through the combinator tree
//!
//! ```text
//! (oSmoothUnion 0.2 (pSphere 1) (pBox 1 1 1) (pSphere 2))
//!   => smooth_union_sdf(0.2, smooth_union_sdf(0.2, p0, p1), p2)
//! ```

use sdfc_syntax::Expr;

use crate::error::Result;
use crate::lowering::{
    Lowering, call, call_with_point, expect_arity, format_literal, split_combinator,
    split_trailing,
};
use crate::operators::Operator;

impl Lowering<'_> {
    /// Build the expression for `node`, referring to primitives from index `next` on.
    ///
    /// Returns the expression and the index after the last primitive referenced.
    pub(crate) fn concat(&self, node: &Expr, point: &str, next: usize) -> Result<(String, usize)> {
        let (operator, operands) = match node {
            Expr::Literal(value) => return Ok((format_literal(*value), next)),
            Expr::Form { operator, operands } => (operator, operands),
        };

        match self.table.lookup(operator)? {
            Operator::Primitive { arity, .. } => {
                expect_arity(operator, arity, operands.len())?;
                Ok((self.target.binding_ref(next), next + 1))
            }
            Operator::Combinator {
                literal_params,
                callee,
            } => {
                let (params, first, rest) = split_combinator(operator, literal_params, operands)?;
                let params = self.parameters(operator, params, point)?;

                let (mut acc, mut index) = self.concat(first, point, next)?;
                if rest.is_empty() {
                    let mut args = params;
                    args.push(acc);
                    return Ok((call(callee, &args), index));
                }

                // Fold left to right, repeating the literal parameters at every step
                for shape in rest {
                    let (rhs, after) = self.concat(shape, point, index)?;
                    let mut args = params.clone();
                    args.push(acc);
                    args.push(rhs);
                    acc = call(callee, &args);
                    index = after;
                }
                Ok((acc, index))
            }
            Operator::Material { .. } => {
                let (_, scene) = split_trailing(operator, operands)?;
                self.concat(scene, point, next)
            }
            Operator::Transform { function } => {
                let (params, scene) = split_trailing(operator, operands)?;
                let args = self.parameters(operator, params, point)?;
                let point = call_with_point(function, point, &args);
                self.concat(scene, &point, next)
            }
            Operator::Context(value) => {
                expect_arity(operator, 0, operands.len())?;
                Ok((self.resolve(value, point), next))
            }
        }
    }
}
