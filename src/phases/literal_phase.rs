//! Literal and conditional type propagation
//!
//! Post-order: children are typed before their parent, so a conditional sees
//! the types of both branches in the same traversal.

use super::AnalysisPass;
use crate::ast::{Expression, ExpressionKind, PrimitiveType, ResolvedType, Script, UnaryOp};
use crate::cli::diagnostics::{error_codes, Diagnostic};
use crate::core::context::AnalysisContext;
use crate::helpers::type_utilities::{common_type, literal_type, Unification};
use crate::stdlib;
use crate::visitors::{walk_expression, Folder};

pub struct LiteralTypePropagator;

impl AnalysisPass for LiteralTypePropagator {
    fn name(&self) -> &'static str {
        "literal-types"
    }

    fn apply(&self, script: Script, context: &mut AnalysisContext) -> Script {
        LiteralFolder { context }.fold_script(script)
    }
}

struct LiteralFolder<'a> {
    context: &'a mut AnalysisContext,
}

impl LiteralFolder<'_> {
    fn conditional_type(&self, expression: &Expression) -> Option<ResolvedType> {
        let ExpressionKind::Conditional {
            then_branch,
            else_branch,
            ..
        } = &expression.kind
        else {
            return None;
        };
        let (then_ty, else_ty) = (then_branch.ty.as_ref()?, else_branch.ty.as_ref()?);
        if then_ty == else_ty {
            return Some(then_ty.clone());
        }

        match common_type(self.context.type_env(), then_ty, else_ty) {
            Unification::Unified(ty) => Some(ty),
            Unification::Ambiguous(candidates) => {
                self.context.add_error(
                    Diagnostic::error_with_code(
                        expression.span,
                        error_codes::TYPE_AMBIGUOUS,
                        format!(
                            "Ambiguous type for conditional: '{}' and '{}' have no single common type",
                            then_ty, else_ty
                        ),
                    )
                    .with_candidates(candidates.iter().map(ToString::to_string).collect()),
                );
                None
            }
        }
    }
}

impl Folder for LiteralFolder<'_> {
    fn context(&mut self) -> &mut AnalysisContext {
        self.context
    }

    fn fold_expression(&mut self, expression: Expression) -> Expression {
        let mut expression = walk_expression(self, expression);
        let ty = match &expression.kind {
            ExpressionKind::Literal(literal) => Some(literal_type(literal)),
            ExpressionKind::Interpolated(_) => {
                Some(ResolvedType::class(stdlib::INTERPOLATED_STRING))
            }
            ExpressionKind::List(_) => Some(ResolvedType::class(stdlib::LIST)),
            ExpressionKind::Set(_) => Some(ResolvedType::class(stdlib::SET)),
            ExpressionKind::Map(_) => Some(ResolvedType::class(stdlib::MAP)),
            ExpressionKind::Binary { op, .. } if op.is_logical() || op.is_comparison() => {
                Some(ResolvedType::Primitive(PrimitiveType::Boolean))
            }
            ExpressionKind::Unary {
                op: UnaryOp::Not, ..
            } => Some(ResolvedType::Primitive(PrimitiveType::Boolean)),
            ExpressionKind::Conditional { .. } => self.conditional_type(&expression),
            _ => None,
        };
        if ty.is_some() {
            expression.ty = ty;
        }
        expression
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::{self, ScriptBuilder};
    use crate::ast::{BinaryOp, ScriptElement, StatementKind};
    use crate::cli::diagnostics::DiagnosticHandler;
    use crate::core::context::test_helpers::context_with;
    use crate::core::type_environment::TypeShape;

    fn typed(expression: Expression) -> (Option<ResolvedType>, usize) {
        let mut repo = stdlib::standard_repository();
        repo.register_all(vec![
            TypeShape::interface("t.Left"),
            TypeShape::interface("t.Right"),
            TypeShape::class("t.A").implements("t.Left").implements("t.Right"),
            TypeShape::class("t.B").implements("t.Left").implements("t.Right"),
        ])
        .unwrap();
        let (mut ctx, handler) = context_with(repo);
        let script = ScriptBuilder::new().expression(expression).build();
        let result = LiteralTypePropagator.apply(script, &mut ctx);
        let ty = match &result.elements[0] {
            ScriptElement::Statement(statement) => match &statement.kind {
                StatementKind::Expression(expression) => expression.ty.clone(),
                _ => None,
            },
            _ => None,
        };
        (ty, handler.error_count())
    }

    fn prim(p: PrimitiveType) -> Option<ResolvedType> {
        Some(ResolvedType::Primitive(p))
    }

    #[test]
    fn test_literal_types() {
        assert_eq!(typed(builder::int(1)).0, prim(PrimitiveType::Int));
        assert_eq!(typed(builder::long(1)).0, prim(PrimitiveType::Long));
        assert_eq!(
            typed(builder::decimal("1.5")).0,
            Some(ResolvedType::class(stdlib::BIG_DECIMAL))
        );
        assert_eq!(typed(builder::null()).0, Some(ResolvedType::Null));
        assert_eq!(
            typed(builder::string("s")).0,
            Some(ResolvedType::class(stdlib::STRING))
        );
        assert_eq!(
            typed(builder::interpolated(vec![builder::string("a")])).0,
            Some(ResolvedType::class(stdlib::INTERPOLATED_STRING))
        );
        assert_eq!(
            typed(builder::map(vec![(builder::string("k"), builder::int(1))])).0,
            Some(ResolvedType::class(stdlib::MAP))
        );
    }

    #[test]
    fn test_boolean_operators() {
        let comparison = builder::binary(BinaryOp::Less, builder::int(1), builder::int(2));
        assert_eq!(typed(comparison).0, prim(PrimitiveType::Boolean));
        assert_eq!(
            typed(builder::not(builder::boolean(false))).0,
            prim(PrimitiveType::Boolean)
        );
        // arithmetic is left to the numeric model
        let sum = builder::binary(BinaryOp::Add, builder::int(1), builder::int(2));
        assert_eq!(typed(sum).0, None);
    }

    #[test]
    fn test_conditional_unification() {
        let same = builder::conditional(builder::boolean(true), builder::int(1), builder::int(2));
        assert_eq!(typed(same).0, prim(PrimitiveType::Int));

        let widened = builder::conditional(builder::boolean(true), builder::int(1), builder::long(2));
        assert_eq!(typed(widened).0, prim(PrimitiveType::Long));

        let nullable = builder::conditional(builder::boolean(true), builder::null(), builder::string("s"));
        assert_eq!(typed(nullable).0, Some(ResolvedType::class(stdlib::STRING)));
    }

    #[test]
    fn test_ambiguous_conditional_reports() {
        let a = builder::name("a").with_type(ResolvedType::class("t.A"));
        let b = builder::name("b").with_type(ResolvedType::class("t.B"));
        let (ty, errors) = typed(builder::conditional(builder::boolean(true), a, b));
        assert_eq!(ty, None);
        assert_eq!(errors, 1);
    }
}
