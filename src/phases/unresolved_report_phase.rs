//! Terminal reporting of unresolved references
//!
//! Runs once, after the fixpoint loop has converged or hit its cap. It never
//! rewrites the tree; it repeats each lookup the resolving passes gave up on
//! and reports why it fails:
//! - type references: not found (with did-you-mean suggestions) or ambiguous
//! - `void` fields, parameters and locals
//! - calls and instantiations with no or several applicable candidates
//! - bare name reads that bind to nothing, or to a type name that several
//!   imports provide (this covers ambiguous static receivers such as `Bar` in
//!   `Bar.make()`)
//!
//! Assignment targets are never reported; an unclaimed assignment belongs to
//! the external binding.

use super::AnalysisPass;
use crate::ast::{
    Expression, ExpressionKind, FieldDeclaration, Parameter, PrimitiveType, Script, Span,
    Statement, StatementKind, TypeRef, TypeRefKind,
};
use crate::cli::diagnostics::{error_codes, parameter_keys, Diagnostic};
use crate::core::context::AnalysisContext;
use crate::helpers::overloads::{resolve_call, resolve_new, CallResolution, CallTarget};
use crate::scopes::TypeResolution;
use crate::utils::{fuzzy, type_formatter};
use crate::visitors::{walk_expression, walk_field, walk_parameter, walk_statement, Folder};

const MAX_SUGGESTIONS: usize = 3;

pub struct UnresolvedReferenceReporter;

impl AnalysisPass for UnresolvedReferenceReporter {
    fn name(&self) -> &'static str {
        "unresolved-report"
    }

    fn apply(&self, script: Script, context: &mut AnalysisContext) -> Script {
        ReportFolder { context }.fold_script(script)
    }
}

struct ReportFolder<'a> {
    context: &'a mut AnalysisContext,
}

impl ReportFolder<'_> {
    fn check_type_ref(&self, type_ref: &TypeRef) {
        match &type_ref.kind {
            TypeRefKind::Unresolved(name) => self.check_type_name(name, type_ref.span),
            TypeRefKind::Array { component, .. } => self.check_type_ref(component),
            TypeRefKind::Wildcard {
                bound: Some(bound), ..
            } => self.check_type_ref(bound),
            _ => {}
        }
    }

    fn check_type_name(&self, name: &str, span: Span) {
        if PrimitiveType::from_keyword(name).is_some() || name == "void" {
            return;
        }
        match self.context.resolve_type(name) {
            Some(TypeResolution::Resolved(_)) => {}
            Some(TypeResolution::Ambiguous(candidates)) => {
                self.report_ambiguous_type(name, candidates, span)
            }
            None => {
                let known = self.context.type_env().known_simple_names();
                let simple = name.rsplit('.').next().unwrap_or(name);
                let mut diagnostic = Diagnostic::error_with_code(
                    span,
                    error_codes::TYPE_NOT_FOUND,
                    format!("Cannot find type '{}'", name),
                )
                .with_parameter(parameter_keys::NAME, name);
                for suggestion in fuzzy::suggest(simple, &known, MAX_SUGGESTIONS) {
                    diagnostic = diagnostic.with_suggestion(
                        span,
                        suggestion.to_string(),
                        format!("Did you mean '{}'?", suggestion),
                    );
                }
                self.context.add_error(diagnostic);
            }
        }
    }

    fn report_ambiguous_type(&self, name: &str, candidates: Vec<String>, span: Span) {
        self.context.add_error(
            Diagnostic::error_with_code(
                span,
                error_codes::TYPE_AMBIGUOUS,
                format!(
                    "Type '{}' is ambiguous: it is provided by {}",
                    name,
                    candidates.join(", ")
                ),
            )
            .with_parameter(parameter_keys::NAME, name)
            .with_candidates(candidates),
        );
    }

    fn check_void(&self, what: &str, name: &str, type_ref: &TypeRef, span: Span) {
        if type_ref.is_void() {
            self.context.add_error(
                Diagnostic::error_with_code(
                    span,
                    error_codes::ILLEGAL_VOID_DECLARATION,
                    format!("{} '{}' cannot be declared void", what, name),
                )
                .with_parameter(parameter_keys::NAME, name),
            );
        }
    }

    /// `unqualified` marks a bare `name(args)` call, the only kind the
    /// external binding can still serve at run time
    fn report_call(
        &self,
        callee: &str,
        arguments: &[Expression],
        resolution: CallResolution,
        unqualified: bool,
        span: Span,
    ) {
        let (code, message, candidates) = match resolution {
            CallResolution::Bound(_) | CallResolution::Construct(_) | CallResolution::Deferred => {
                return;
            }
            CallResolution::NotFound {
                target: CallTarget::Method,
                candidates,
            } => {
                if unqualified
                    && candidates.is_empty()
                    && self.context.binding_type().is_some()
                {
                    return;
                }
                (error_codes::METHOD_NOT_FOUND, "Cannot find matching method", candidates)
            }
            CallResolution::NotFound {
                target: CallTarget::Constructor,
                candidates,
            } => (
                error_codes::CONSTRUCTOR_NOT_FOUND,
                "Cannot find matching constructor",
                candidates,
            ),
            CallResolution::Ambiguous {
                target: CallTarget::Method,
                candidates,
            } => (error_codes::METHOD_AMBIGUOUS, "Ambiguous method call", candidates),
            CallResolution::Ambiguous {
                target: CallTarget::Constructor,
                candidates,
            } => (
                error_codes::CONSTRUCTOR_AMBIGUOUS,
                "Ambiguous constructor call",
                candidates,
            ),
        };

        let argument_list =
            type_formatter::format_argument_list(arguments.iter().map(|a| a.ty.as_ref()));
        let mut diagnostic = Diagnostic::error_with_code(
            span,
            code,
            format!("{} {}{}", message, callee, argument_list),
        )
        .with_parameter(parameter_keys::NAME, callee)
        .with_parameter(parameter_keys::ARGUMENTS, argument_list);
        if !candidates.is_empty() {
            diagnostic = diagnostic.with_candidates(candidates);
        }
        self.context.add_error(diagnostic);
    }

    fn check_expression(&self, expression: &Expression) {
        match &expression.kind {
            ExpressionKind::Call(call) if call.binding.is_none() => {
                let resolution = resolve_call(self.context, call);
                self.report_call(
                    &call.name,
                    &call.arguments,
                    resolution,
                    call.receiver.is_none(),
                    expression.span,
                );
            }
            ExpressionKind::New(new) if new.binding.is_none() => {
                let resolution = resolve_new(self.context, new);
                let callee = type_formatter::format_type_ref(&new.type_ref);
                self.report_call(&callee, &new.arguments, resolution, false, expression.span);
            }
            ExpressionKind::Name(name) if name.binding.is_none() => {
                self.check_name(&name.name, expression.span)
            }
            _ => {}
        }
    }

    fn check_name(&self, name: &str, span: Span) {
        if self.context.resolve_variable(name).is_some() {
            return;
        }
        // A type name read (or used as a static receiver) must be unique
        // whether or not the external binding is present.
        match self.context.resolve_type(name) {
            Some(TypeResolution::Resolved(_)) => return,
            Some(TypeResolution::Ambiguous(candidates)) => {
                self.report_ambiguous_type(name, candidates, span);
                return;
            }
            None => {}
        }
        let options = self.context.options();
        if !options.report_unresolved_names || self.context.binding_type().is_some() {
            return;
        }
        self.context.add_error(
            Diagnostic::error_with_code(
                span,
                error_codes::NAME_NOT_RESOLVED,
                format!("Cannot resolve name '{}'", name),
            )
            .with_parameter(parameter_keys::NAME, name),
        );
    }
}

impl Folder for ReportFolder<'_> {
    fn context(&mut self) -> &mut AnalysisContext {
        self.context
    }

    fn fold_field(&mut self, field: FieldDeclaration) -> FieldDeclaration {
        self.check_void("Field", &field.name, &field.ty, field.span);
        walk_field(self, field)
    }

    fn fold_parameter(&mut self, parameter: Parameter) -> Parameter {
        self.check_void("Parameter", &parameter.name, &parameter.ty, parameter.span);
        walk_parameter(self, parameter)
    }

    fn fold_statement(&mut self, statement: Statement) -> Statement {
        if let StatementKind::Local(local) = &statement.kind {
            if let Some(ty) = &local.ty {
                self.check_void("Local variable", &local.name, ty, statement.span);
            }
        }
        walk_statement(self, statement)
    }

    fn fold_expression(&mut self, expression: Expression) -> Expression {
        let expression = walk_expression(self, expression);
        self.check_expression(&expression);
        expression
    }

    fn fold_type_ref(&mut self, type_ref: TypeRef) -> TypeRef {
        self.check_type_ref(&type_ref);
        type_ref
    }
}
