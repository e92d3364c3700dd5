//! First pass: one binding per primitive
//!
//! Emits a declaration for every primitive leaf, in traversal order:
//!
//! ```text
//! sdf_result_t p0 = sdf_result_t(sphere_sdf(rrot(p, 0, 1, 0, 45), 1), MAKE_DIEL(1.5));
//! ```
//!
//! The point argument carries every enclosing transform and the material
//! argument the innermost enclosing material.

use sdfc_syntax::Expr;

use crate::error::Result;
use crate::lowering::{
    Context, Lowering, call, call_with_point, expect_arity, split_combinator, split_trailing,
};
use crate::operators::Operator;

impl Lowering<'_> {
    /// Append the declarations for every primitive under `node` to `out`.
    ///
    /// `next` is the index of the first binding to declare; the index after
    /// the last declared binding is returned.
    pub(crate) fn emit_primitives(
        &self,
        node: &Expr,
        ctx: Context<'_>,
        next: usize,
        out: &mut String,
    ) -> Result<usize> {
        // Literals in a shape slot contribute no statement
        let Expr::Form { operator, operands } = node else {
            return Ok(next);
        };

        match self.table.lookup(operator)? {
            Operator::Primitive { arity, callee } => {
                expect_arity(operator, arity, operands.len())?;
                let args = self.parameters(operator, operands, ctx.point)?;
                let distance = call_with_point(callee, ctx.point, &args);
                let result_type = &self.target.result_type;

                out.push_str(&format!(
                    "{} {} = {}({}, {});\n",
                    result_type,
                    self.target.binding_name(next),
                    result_type,
                    distance,
                    ctx.material
                ));
                tracing::trace!(index = next, operator = %operator, "emitted primitive binding");
                Ok(next + 1)
            }
            Operator::Combinator { literal_params, .. } => {
                let (_, first, rest) = split_combinator(operator, literal_params, operands)?;
                std::iter::once(first)
                    .chain(rest)
                    .try_fold(next, |index, shape| self.emit_primitives(shape, ctx, index, out))
            }
            Operator::Material { constructor } => {
                let (params, scene) = split_trailing(operator, operands)?;
                let material = call(constructor, &self.parameters(operator, params, ctx.point)?);
                self.emit_primitives(scene, ctx.with_material(&material), next, out)
            }
            Operator::Transform { function } => {
                let (params, scene) = split_trailing(operator, operands)?;
                let args = self.parameters(operator, params, ctx.point)?;
                let point = call_with_point(function, ctx.point, &args);
                self.emit_primitives(scene, ctx.with_point(&point), next, out)
            }
            Operator::Context(_) => {
                expect_arity(operator, 0, operands.len())?;
                Ok(next)
            }
        }
    }
}
