//! Overload and constructor binding
//!
//! Binds each unbound call whose arguments are all typed. A call naming a type
//! becomes an instantiation. Failures leave the node untouched; the terminal
//! reporter turns whatever is still unbound into diagnostics.

use super::AnalysisPass;
use crate::ast::{
    CallExpression, Expression, ExpressionKind, NewExpression, ResolvedType, Script, Span,
    TypeRef,
};
use crate::core::context::AnalysisContext;
use crate::helpers::overloads::{resolve_call, resolve_new, CallResolution};
use crate::visitors::{walk_expression, Folder};
use tracing::debug;

pub struct OverloadResolver;

impl AnalysisPass for OverloadResolver {
    fn name(&self) -> &'static str {
        "overloads"
    }

    fn apply(&self, script: Script, context: &mut AnalysisContext) -> Script {
        OverloadFolder { context }.fold_script(script)
    }
}

struct OverloadFolder<'a> {
    context: &'a mut AnalysisContext,
}

impl OverloadFolder<'_> {
    fn bind_call(
        &self,
        call: CallExpression,
        span: Span,
        ty: Option<ResolvedType>,
    ) -> Expression {
        match resolve_call(self.context, &call) {
            CallResolution::Bound(binding) => {
                self.context.metrics().record_call_bound();
                debug!(method = %binding.name, owner = %binding.owner, "bound call");
                let ty = binding.return_type.clone();
                Expression::new(
                    ExpressionKind::Call(CallExpression {
                        binding: Some(binding),
                        ..call
                    }),
                    span,
                )
                .with_type(ty)
            }
            CallResolution::Construct(binding) => {
                self.context.metrics().record_constructor_bound();
                debug!(owner = %binding.owner, "call rewritten to instantiation");
                let ty = ResolvedType::class(binding.owner.clone());
                Expression::new(
                    ExpressionKind::New(NewExpression {
                        type_ref: TypeRef::resolved(ty.clone(), span),
                        arguments: call.arguments,
                        binding: Some(binding),
                    }),
                    span,
                )
                .with_type(ty)
            }
            _ => Expression {
                kind: ExpressionKind::Call(call),
                span,
                ty,
            },
        }
    }

    fn bind_new(
        &self,
        mut new: NewExpression,
        span: Span,
        mut ty: Option<ResolvedType>,
    ) -> Expression {
        if let Some(class @ ResolvedType::Class(_)) = new.type_ref.static_type() {
            ty = Some(class);
        }
        if let CallResolution::Construct(binding) = resolve_new(self.context, &new) {
            self.context.metrics().record_constructor_bound();
            debug!(owner = %binding.owner, "bound constructor");
            new.binding = Some(binding);
        }
        Expression {
            kind: ExpressionKind::New(new),
            span,
            ty,
        }
    }
}

impl Folder for OverloadFolder<'_> {
    fn context(&mut self) -> &mut AnalysisContext {
        self.context
    }

    fn fold_expression(&mut self, expression: Expression) -> Expression {
        let expression = walk_expression(self, expression);
        match expression.kind {
            ExpressionKind::Call(call) if call.binding.is_none() => {
                self.bind_call(call, expression.span, expression.ty)
            }
            ExpressionKind::New(new) if new.binding.is_none() => {
                self.bind_new(new, expression.span, expression.ty)
            }
            kind => Expression { kind, ..expression },
        }
    }
}
