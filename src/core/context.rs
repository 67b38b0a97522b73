use crate::ast::{Expression, Import, MethodBinding, Script, Span, VariableBinding};
use crate::cli::config::AnalyzerOptions;
use crate::cli::diagnostics::{Diagnostic, DiagnosticHandler};
use crate::core::class_id::GeneratedClassIds;
use crate::core::type_environment::{TypeEnvironment, TypeRepository};
use crate::scopes::{Scope, TypeResolution};
use crate::state::AnalysisMetrics;
use std::sync::Arc;
use tracing::trace;

/// Per-compilation analysis state threaded through every pass
pub struct AnalysisContext {
    scopes: Vec<Box<dyn Scope>>,
    default_imports: Vec<Import>,
    binding_type: Option<String>,
    type_env: TypeEnvironment,
    diagnostic_handler: Arc<dyn DiagnosticHandler>,
    class_ids: GeneratedClassIds,
    options: AnalyzerOptions,
    metrics: Arc<AnalysisMetrics>,
}

impl AnalysisContext {
    pub fn new(
        repository: Arc<dyn TypeRepository>,
        diagnostic_handler: Arc<dyn DiagnosticHandler>,
        options: AnalyzerOptions,
    ) -> Self {
        let default_imports = options
            .default_imports
            .iter()
            .map(|text| Import::parse(text, Span::dummy()))
            .collect();

        Self {
            scopes: Vec::new(),
            default_imports,
            binding_type: options.binding_type.clone(),
            type_env: TypeEnvironment::new(repository),
            diagnostic_handler,
            class_ids: GeneratedClassIds::default(),
            options,
            metrics: Arc::new(AnalysisMetrics::new()),
        }
    }

    pub fn with_class_ids(mut self, class_ids: GeneratedClassIds) -> Self {
        self.class_ids = class_ids;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<AnalysisMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn push_scope(&mut self, scope: Box<dyn Scope>) {
        trace!(kind = ?scope.kind(), depth = self.scopes.len() + 1, "push scope");
        self.metrics.record_scope_operation();
        self.scopes.push(scope);
    }

    pub fn pop_scope(&mut self) -> Option<Box<dyn Scope>> {
        self.metrics.record_scope_operation();
        self.scopes.pop()
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Drop every scope above `depth`
    pub fn truncate_scopes(&mut self, depth: usize) {
        if self.scopes.len() > depth {
            self.metrics.record_scope_operation();
            self.scopes.truncate(depth);
        }
    }

    /// Scopes, innermost first
    pub fn scopes(&self) -> impl Iterator<Item = &dyn Scope> {
        self.scopes.iter().rev().map(|scope| scope.as_ref())
    }

    pub fn resolve_type(&self, name: &str) -> Option<TypeResolution> {
        let resolution = self
            .scopes()
            .find_map(|scope| scope.resolve_type(name, &self.type_env));
        self.metrics
            .record_type_lookup(matches!(resolution, Some(TypeResolution::Resolved(_))));
        resolution
    }

    pub fn resolve_variable(&self, name: &str) -> Option<VariableBinding> {
        self.scopes().find_map(|scope| scope.resolve_variable(name))
    }

    pub fn materialize_assignment(
        &self,
        name: &str,
        value: &Expression,
        span: Span,
    ) -> Option<Expression> {
        self.scopes()
            .find_map(|scope| scope.materialize_assignment(name, value, span))
    }

    /// Candidates from the innermost scope offering any
    pub fn method_candidates(&self, name: &str, arity: usize) -> Vec<MethodBinding> {
        self.scopes()
            .map(|scope| scope.method_candidates(name, arity, &self.type_env))
            .find(|candidates| !candidates.is_empty())
            .unwrap_or_default()
    }

    /// Report `diagnostic` unless an equal one was already reported
    pub fn add_error(&self, diagnostic: Diagnostic) -> bool {
        self.report(diagnostic)
    }

    pub fn add_error_unless(
        &self,
        diagnostic: Diagnostic,
        is_duplicate: impl Fn(&Diagnostic) -> bool,
    ) -> bool {
        self.diagnostic_handler
            .report_unless(diagnostic, &is_duplicate)
    }

    /// Same de-duplicating path as [`AnalysisContext::add_error`]; the level
    /// travels with the diagnostic itself
    pub fn add_warning(&self, diagnostic: Diagnostic) -> bool {
        self.report(diagnostic)
    }

    fn report(&self, diagnostic: Diagnostic) -> bool {
        let reported = diagnostic.clone();
        self.add_error_unless(diagnostic, |existing| *existing == reported)
    }

    /// Rebuild the view of the unit's own declarations
    pub fn enter_unit(&mut self, script: &Script) {
        self.type_env.set_unit(script);
    }

    /// Fully-qualified name for a type declared in the current unit
    pub fn qualify(&self, simple_name: &str) -> String {
        match self.type_env.unit_package() {
            Some(package) if !package.is_empty() => format!("{}.{}", package, simple_name),
            _ => simple_name.to_string(),
        }
    }

    pub fn next_generated_class_name(&self) -> String {
        format!("{}{}", self.options.script_class_prefix, self.class_ids.next())
    }

    pub fn default_imports(&self) -> &[Import] {
        &self.default_imports
    }

    pub fn binding_type(&self) -> Option<&str> {
        self.binding_type.as_deref()
    }

    pub fn type_env(&self) -> &TypeEnvironment {
        &self.type_env
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    pub fn metrics(&self) -> &Arc<AnalysisMetrics> {
        &self.metrics
    }

    pub fn diagnostic_handler(&self) -> &Arc<dyn DiagnosticHandler> {
        &self.diagnostic_handler
    }
}

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::cli::diagnostics::CollectingDiagnosticHandler;
    use crate::core::type_environment::InMemoryTypeRepository;

    pub fn context_with(
        repository: InMemoryTypeRepository,
    ) -> (AnalysisContext, Arc<CollectingDiagnosticHandler>) {
        let handler = Arc::new(CollectingDiagnosticHandler::new());
        let context = AnalysisContext::new(
            Arc::new(repository),
            handler.clone(),
            AnalyzerOptions::default(),
        )
        .with_class_ids(GeneratedClassIds::seeded(1));
        (context, handler)
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::context_with;
    use super::*;
    use crate::ast::builder::{self, TypeBuilder};
    use crate::ast::{Modifiers, PrimitiveType};
    use crate::cli::diagnostics::error_codes;
    use crate::core::type_environment::InMemoryTypeRepository;
    use crate::scopes::{MethodScope, TypeDeclarationScope};
    use crate::stdlib;

    #[test]
    fn test_innermost_scope_shadows_and_pop_exposes() {
        let (mut ctx, _) = context_with(stdlib::standard_repository());
        let outer = TypeBuilder::class("Holder")
            .field(builder::field(
                "x",
                builder::primitive_type(PrimitiveType::Int),
                Modifiers::public(),
            ))
            .build();
        ctx.push_scope(Box::new(TypeDeclarationScope::from_declaration(
            &outer,
            "Holder".to_string(),
        )));
        ctx.push_scope(Box::new(MethodScope::new(
            &[],
            &[builder::local("x", Some(builder::primitive_type(PrimitiveType::Long)), None)],
        )));

        assert!(matches!(
            ctx.resolve_variable("x"),
            Some(VariableBinding::Local { .. })
        ));

        ctx.pop_scope();
        assert!(matches!(
            ctx.resolve_variable("x"),
            Some(VariableBinding::Field { .. })
        ));
        assert_eq!(ctx.scope_depth(), 1);

        ctx.truncate_scopes(0);
        assert!(ctx.resolve_variable("x").is_none());
    }

    #[test]
    fn test_add_error_deduplicates() {
        let (ctx, handler) = context_with(InMemoryTypeRepository::new());
        let diagnostic = Diagnostic::error_with_code(
            Span::new(1, 4, 1, 2),
            error_codes::TYPE_NOT_FOUND,
            "Cannot resolve type 'Foo'",
        );

        assert!(ctx.add_error(diagnostic.clone()));
        assert!(!ctx.add_error(diagnostic));
        assert_eq!(handler.error_count(), 1);
    }

    #[test]
    fn test_add_error_unless_uses_predicate() {
        let (ctx, handler) = context_with(InMemoryTypeRepository::new());
        ctx.add_error(Diagnostic::error(Span::dummy(), "first"));
        let reported = ctx.add_error_unless(Diagnostic::error(Span::dummy(), "second"), |d| {
            d.span == Span::dummy()
        });
        assert!(!reported);
        assert_eq!(handler.error_count(), 1);
    }

    #[test]
    fn test_add_warning_deduplicates_and_keeps_level() {
        let (ctx, handler) = context_with(InMemoryTypeRepository::new());
        let warning = Diagnostic::warning_with_code(
            Span::dummy(),
            error_codes::FIXPOINT_NOT_CONVERGED,
            "Analysis did not converge",
        );

        assert!(ctx.add_warning(warning.clone()));
        assert!(!ctx.add_warning(warning));
        assert_eq!(handler.warning_count(), 1);
        assert_eq!(handler.error_count(), 0);
    }

    #[test]
    fn test_generated_names_use_prefix() {
        let (ctx, _) = context_with(InMemoryTypeRepository::new());
        assert_eq!(ctx.next_generated_class_name(), "Script1");
        assert_eq!(ctx.next_generated_class_name(), "Script2");
    }
}
