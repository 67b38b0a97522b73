use crate::ast::Script;
use crate::cli::config::{AnalyzerConfig, AnalyzerOptions};
use crate::cli::diagnostics::{ConsoleDiagnosticHandler, Diagnostic, DiagnosticHandler};
use crate::cli::errors::AnalysisError;
use crate::core::class_id::GeneratedClassIds;
use crate::core::context::AnalysisContext;
use crate::core::fixpoint::{AnalysisOutcome, FixpointDriver};
use crate::core::type_environment::TypeRepository;
use crate::state::AnalysisMetrics;
use std::sync::Arc;
use tracing::{info, instrument};

/// Semantic analyzer for HostScript compilation units
pub struct SemanticAnalyzer {
    options: AnalyzerOptions,
    repository: Arc<dyn TypeRepository>,
    diagnostic_handler: Arc<dyn DiagnosticHandler>,
    class_ids: GeneratedClassIds,
    metrics: Arc<AnalysisMetrics>,
}

impl SemanticAnalyzer {
    /// Create an analyzer with default options.
    ///
    /// Generated script class names come from the process-wide counter; use
    /// [`SemanticAnalyzer::with_class_ids`] for an isolated sequence.
    pub fn new(
        repository: Arc<dyn TypeRepository>,
        diagnostic_handler: Arc<dyn DiagnosticHandler>,
    ) -> Self {
        Self {
            options: AnalyzerOptions::default(),
            repository,
            diagnostic_handler,
            class_ids: GeneratedClassIds::global(),
            metrics: Arc::new(AnalysisMetrics::new()),
        }
    }

    /// Build an analyzer that prints diagnostics to stderr as configured
    pub fn from_config(config: &AnalyzerConfig, repository: Arc<dyn TypeRepository>) -> Self {
        let handler = Arc::new(ConsoleDiagnosticHandler::new(
            config.analyzer_options.pretty,
        ));
        Self::new(repository, handler).with_options(config.analyzer_options.clone())
    }

    pub fn with_options(mut self, options: AnalyzerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_class_ids(mut self, class_ids: GeneratedClassIds) -> Self {
        self.class_ids = class_ids;
        self
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    pub fn metrics(&self) -> &Arc<AnalysisMetrics> {
        &self.metrics
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostic_handler.get_diagnostics()
    }

    fn context(&self) -> AnalysisContext {
        AnalysisContext::new(
            self.repository.clone(),
            self.diagnostic_handler.clone(),
            self.options.clone(),
        )
        .with_class_ids(self.class_ids.clone())
        .with_metrics(self.metrics.clone())
    }

    /// Analyze one compilation unit, reporting problems to the diagnostic handler.
    ///
    /// Always returns the best tree reached; check the handler (or use
    /// [`SemanticAnalyzer::analyze_checked`]) to learn whether it is usable.
    #[instrument(skip_all, fields(package = script.package.as_deref().unwrap_or("")))]
    pub fn analyze(&self, script: Script) -> AnalysisOutcome {
        let mut context = self.context();
        let errors_before = self.diagnostic_handler.error_count();

        let driver = FixpointDriver::standard().with_max_iterations(self.options.max_iterations);
        let outcome = driver.run(script, &mut context);

        info!(
            iterations = outcome.iterations,
            converged = outcome.converged,
            errors = self.diagnostic_handler.error_count() - errors_before,
            "analysis finished"
        );
        outcome
    }

    /// Like [`SemanticAnalyzer::analyze`], but fails if this unit produced errors
    pub fn analyze_checked(&self, script: Script) -> Result<AnalysisOutcome, AnalysisError> {
        let errors_before = self.diagnostic_handler.error_count();
        let outcome = self.analyze(script);
        let errors = self.diagnostic_handler.error_count() - errors_before;
        if errors > 0 {
            return Err(AnalysisError::SemanticErrors(errors));
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::{self, ScriptBuilder};
    use crate::cli::diagnostics::{error_codes, CollectingDiagnosticHandler};
    use crate::stdlib;

    fn analyzer() -> (SemanticAnalyzer, Arc<CollectingDiagnosticHandler>) {
        let handler = Arc::new(CollectingDiagnosticHandler::new());
        let analyzer = SemanticAnalyzer::new(Arc::new(stdlib::standard_repository()), handler.clone())
            .with_class_ids(GeneratedClassIds::seeded(1));
        (analyzer, handler)
    }

    #[test]
    fn test_clean_script_passes_checked_analysis() {
        let (analyzer, handler) = analyzer();
        let script = ScriptBuilder::new()
            .expression(builder::method_call(
                builder::name("Math"),
                "max",
                vec![builder::int(3), builder::long(4)],
            ))
            .build();
        let outcome = analyzer.analyze_checked(script).unwrap();
        assert!(outcome.converged);
        assert!(!handler.has_errors());
        assert!(outcome.script.find_type("Script1").is_some());
    }

    #[test]
    fn test_widening_to_two_overloads_is_ambiguous() {
        let (analyzer, handler) = analyzer();
        let script = ScriptBuilder::new()
            .expression(builder::method_call(
                builder::name("Math"),
                "max",
                vec![builder::int(1), builder::int(2)],
            ))
            .build();
        assert!(analyzer.analyze_checked(script).is_err());

        let diagnostics = handler.get_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].has_code(error_codes::METHOD_AMBIGUOUS));
        assert_eq!(diagnostics[0].candidates().map(|c| c.len()), Some(2));
    }

    #[test]
    fn test_missing_type_fails_checked_analysis() {
        let (analyzer, _) = analyzer();
        let script = ScriptBuilder::new()
            .statement(builder::local("x", Some(builder::named_type("Nope")), None))
            .build();
        match analyzer.analyze_checked(script) {
            Err(AnalysisError::SemanticErrors(count)) => assert_eq!(count, 1),
            other => panic!("expected semantic errors, got {:?}", other.map(|o| o.iterations)),
        }
    }

    #[test]
    fn test_metrics_accumulate_across_units() {
        let (analyzer, _) = analyzer();
        analyzer.analyze(ScriptBuilder::new().expression(builder::int(1)).build());
        analyzer.analyze(ScriptBuilder::new().expression(builder::int(2)).build());
        let summary = analyzer.metrics().get_summary();
        assert_eq!(summary.scripts_assembled, 2);
        assert!(summary.iterations >= 4);
    }
}
