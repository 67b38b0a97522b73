//! Assignment rewriting and name binding
//!
//! A simple-name assignment `x = v` is handed to the scope stack, innermost
//! first; the first scope owning `x` supplies the concrete store (a field
//! store or a local store) that replaces it. Unclaimed assignments are left
//! alone; they may be claimed once an enclosing construct exists, or go to
//! the external binding at run time.
//!
//! Field stores get an automatic boxing, unboxing or widening conversion
//! around their value once the field's declared type is known. Bare name reads
//! are bound to the local, parameter or field they denote.

use super::AnalysisPass;
use crate::ast::{
    ConversionKind, Expression, ExpressionKind, FieldStore, ResolvedType, Script, Span,
    VariableBinding,
};
use crate::core::context::AnalysisContext;
use crate::core::type_compat::{Conversion, TypeCompatibility};
use crate::core::type_environment::TypeEnvironment;
use crate::visitors::{walk_expression, Folder};
use tracing::debug;

pub struct AssignmentRewriter;

impl AnalysisPass for AssignmentRewriter {
    fn name(&self) -> &'static str {
        "assignments"
    }

    fn apply(&self, script: Script, context: &mut AnalysisContext) -> Script {
        AssignmentFolder { context }.fold_script(script)
    }
}

struct AssignmentFolder<'a> {
    context: &'a mut AnalysisContext,
}

/// Wrap `value` in the conversion that carries it into a `target` slot, if one is needed
fn convert_for_store(
    env: &TypeEnvironment,
    value: Expression,
    target: &ResolvedType,
) -> (Expression, bool) {
    let Some(source) = value.ty.clone() else {
        return (value, false);
    };
    if source == *target {
        return (value, false);
    }
    let kind = match TypeCompatibility::classify(env, &source, target) {
        Some(Conversion::Boxing) => ConversionKind::Boxing,
        Some(Conversion::Unboxing) => ConversionKind::Unboxing,
        Some(Conversion::Widening) => ConversionKind::Widening,
        _ => return (value, false),
    };
    let span = value.span;
    let wrapped = Expression::new(
        ExpressionKind::Conversion {
            kind,
            target: target.clone(),
            operand: Box::new(value),
        },
        span,
    )
    .with_type(target.clone());
    (wrapped, true)
}

impl AssignmentFolder<'_> {
    fn rewrite_field_store(&self, mut store: FieldStore, span: Span) -> Expression {
        if store.field_type.is_none() {
            if let Some(VariableBinding::Field { owner, ty, .. }) =
                self.context.resolve_variable(&store.field)
            {
                if owner == store.owner {
                    store.field_type = ty;
                }
            }
        }

        if let Some(field_type) = store.field_type.clone() {
            let (value, converted) =
                convert_for_store(self.context.type_env(), *store.value, &field_type);
            if converted {
                self.context.metrics().record_conversion();
                debug!(field = %store.field, target = %field_type, "inserted store conversion");
            }
            store.value = Box::new(value);
        }

        let ty = store.field_type.clone();
        let mut expression = Expression::new(ExpressionKind::FieldStore(store), span);
        expression.ty = ty;
        expression
    }

    fn rewrite(&self, expression: Expression) -> Expression {
        let Expression { kind, span, ty } = expression;
        match kind {
            ExpressionKind::Assignment { target, value } => {
                let claimed = target
                    .simple_name()
                    .and_then(|name| self.context.materialize_assignment(name, &value, span));
                match claimed {
                    Some(store) => {
                        self.context.metrics().record_assignment_rewrite();
                        debug!(
                            target = target.simple_name().unwrap_or_default(),
                            store = store.kind.label(),
                            "materialized assignment"
                        );
                        self.rewrite(store)
                    }
                    None => Expression {
                        kind: ExpressionKind::Assignment { target, value },
                        span,
                        ty,
                    },
                }
            }
            ExpressionKind::FieldStore(store) => self.rewrite_field_store(store, span),
            ExpressionKind::LocalStore { name, value } => {
                let ty = value.ty.clone();
                Expression {
                    kind: ExpressionKind::LocalStore { name, value },
                    span,
                    ty,
                }
            }
            ExpressionKind::Name(mut name) => {
                let mut ty = ty;
                if let Some(binding) = self.context.resolve_variable(&name.name) {
                    ty = binding.static_type().cloned();
                    name.binding = Some(binding);
                }
                Expression {
                    kind: ExpressionKind::Name(name),
                    span,
                    ty,
                }
            }
            kind => Expression { kind, span, ty },
        }
    }
}

impl Folder for AssignmentFolder<'_> {
    fn context(&mut self) -> &mut AnalysisContext {
        self.context
    }

    fn fold_expression(&mut self, expression: Expression) -> Expression {
        let expression = walk_expression(self, expression);
        self.rewrite(expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::{self, MethodBuilder, ScriptBuilder, TypeBuilder};
    use crate::ast::{
        Modifiers, NameExpression, Navigation, NavigationStep, PrimitiveType, ScriptElement,
        Statement, StatementKind, TypeRef,
    };
    use crate::core::context::test_helpers::context_with;
    use crate::stdlib;

    fn int() -> ResolvedType {
        ResolvedType::Primitive(PrimitiveType::Int)
    }

    fn method_body(script: &Script, class: &str, method: &str) -> Vec<Statement> {
        script
            .find_type(class)
            .and_then(|t| t.methods().find(|m| m.name == method))
            .map(|m| m.body.clone())
            .unwrap_or_default()
    }

    fn statement_expression(statement: &Statement) -> &Expression {
        match &statement.kind {
            StatementKind::Expression(expression) => expression,
            StatementKind::Local(local) => local.initializer.as_ref().unwrap(),
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    fn apply(script: Script) -> Script {
        let (mut ctx, _) = context_with(stdlib::standard_repository());
        AssignmentRewriter.apply(script, &mut ctx)
    }

    #[test]
    fn test_unclaimed_assignment_is_unchanged() {
        let script = ScriptBuilder::new()
            .expression(builder::assign("x", builder::int(5).with_type(int())))
            .build();
        let result = apply(script.clone());
        assert_eq!(result, script);
    }

    #[test]
    fn test_field_assignment_becomes_boxing_store() {
        let script = ScriptBuilder::new()
            .declare(
                TypeBuilder::class("Counter")
                    .field(builder::field(
                        "total",
                        TypeRef::resolved(ResolvedType::class(stdlib::INTEGER), Span::dummy()),
                        Modifiers::public(),
                    ))
                    .method(
                        MethodBuilder::new("set")
                            .statement(builder::expr_stmt(builder::assign(
                                "total",
                                builder::int(5).with_type(int()),
                            )))
                            .build(),
                    )
                    .build(),
            )
            .build();

        let result = apply(script);
        let body = method_body(&result, "Counter", "set");
        let expression = statement_expression(&body[0]);
        assert_eq!(expression.ty, Some(ResolvedType::class(stdlib::INTEGER)));
        match &expression.kind {
            ExpressionKind::FieldStore(store) => {
                assert_eq!(store.owner, "Counter");
                assert!(matches!(
                    store.value.kind,
                    ExpressionKind::Conversion {
                        kind: ConversionKind::Boxing,
                        ..
                    }
                ));
            }
            other => panic!("expected field store, got {}", other.label()),
        }
    }

    #[test]
    fn test_matching_value_is_not_wrapped() {
        let script = ScriptBuilder::new()
            .declare(
                TypeBuilder::class("Counter")
                    .field(builder::field(
                        "count",
                        builder::primitive_type(PrimitiveType::Int),
                        Modifiers::public(),
                    ))
                    .method(
                        MethodBuilder::new("set")
                            .statement(builder::expr_stmt(builder::assign(
                                "count",
                                builder::int(1).with_type(int()),
                            )))
                            .build(),
                    )
                    .build(),
            )
            .build();

        let once = apply(script);
        let body = method_body(&once, "Counter", "set");
        match &statement_expression(&body[0]).kind {
            ExpressionKind::FieldStore(store) => {
                assert!(matches!(store.value.kind, ExpressionKind::Literal(_)))
            }
            other => panic!("expected field store, got {}", other.label()),
        }
        assert_eq!(apply(once.clone()), once);
    }

    #[test]
    fn test_local_shadows_field() {
        let script = ScriptBuilder::new()
            .declare(
                TypeBuilder::class("Holder")
                    .field(builder::field(
                        "x",
                        builder::primitive_type(PrimitiveType::Int),
                        Modifiers::public(),
                    ))
                    .method(
                        MethodBuilder::new("work")
                            .statement(builder::local(
                                "x",
                                Some(builder::primitive_type(PrimitiveType::Long)),
                                None,
                            ))
                            .statement(builder::expr_stmt(builder::assign(
                                "x",
                                builder::long(2).with_type(ResolvedType::Primitive(PrimitiveType::Long)),
                            )))
                            .statement(builder::expr_stmt(builder::name("x")))
                            .build(),
                    )
                    .build(),
            )
            .build();

        let result = apply(script);
        let body = method_body(&result, "Holder", "work");
        assert!(matches!(
            statement_expression(&body[1]).kind,
            ExpressionKind::LocalStore { .. }
        ));
        let read = statement_expression(&body[2]);
        assert_eq!(read.ty, Some(ResolvedType::Primitive(PrimitiveType::Long)));
        assert!(matches!(
            read.kind,
            ExpressionKind::Name(NameExpression {
                binding: Some(VariableBinding::Local { .. }),
                ..
            })
        ));
    }

    #[test]
    fn test_navigation_assignment_is_not_simple() {
        let target = Navigation {
            steps: vec![
                NavigationStep::Name("a".to_string()),
                NavigationStep::Name("b".to_string()),
            ],
        };
        let assignment = Expression::new(
            ExpressionKind::Assignment {
                target,
                value: Box::new(builder::int(1)),
            },
            Span::dummy(),
        );
        let script = ScriptBuilder::new()
            .declare(
                TypeBuilder::class("Holder")
                    .field(builder::field("a", builder::named_type("Other"), Modifiers::public()))
                    .method(
                        MethodBuilder::new("m")
                            .statement(builder::expr_stmt(assignment))
                            .build(),
                    )
                    .build(),
            )
            .build();
        let result = apply(script.clone());
        assert_eq!(result, script);
        assert!(matches!(result.elements[0], ScriptElement::Type(_)));
    }
}
