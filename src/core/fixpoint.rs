use crate::ast::Script;
use crate::cli::diagnostics::{error_codes, Diagnostic};
use crate::core::context::AnalysisContext;
use crate::phases::{self, AnalysisPass};
use std::time::Instant;
use tracing::{debug, instrument, warn};

pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Result of driving a unit to its fixpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub script: Script,
    /// Full pipeline iterations run, including the one that changed nothing
    pub iterations: usize,
    /// False when the iteration cap was hit with the tree still changing
    pub converged: bool,
}

/// Runs an ordered pass list until the tree stops changing.
///
/// Every iteration runs each pass once, in order, and then compares the result
/// with the tree it started from. The loop ends on the first iteration that
/// changes nothing, or after `max_iterations`, in which case a warning is
/// reported and the last tree is returned as-is. The terminal passes run once
/// after the loop either way.
pub struct FixpointDriver {
    passes: Vec<Box<dyn AnalysisPass>>,
    terminal_passes: Vec<Box<dyn AnalysisPass>>,
    max_iterations: usize,
}

impl FixpointDriver {
    pub fn new(
        passes: Vec<Box<dyn AnalysisPass>>,
        terminal_passes: Vec<Box<dyn AnalysisPass>>,
    ) -> Self {
        Self {
            passes,
            terminal_passes,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// The standard pipeline followed by the unresolved-reference reporter
    pub fn standard() -> Self {
        Self::new(phases::standard_pipeline(), phases::terminal_passes())
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    fn run_pass(pass: &dyn AnalysisPass, script: Script, context: &mut AnalysisContext) -> Script {
        let start = Instant::now();
        let script = pass.apply(script, context);
        context.metrics().record_pass_run(pass.name(), start.elapsed());
        script
    }

    #[instrument(skip_all, fields(passes = self.passes.len(), max_iterations = self.max_iterations))]
    pub fn run(&self, script: Script, context: &mut AnalysisContext) -> AnalysisOutcome {
        let mut current = script;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;
            context.metrics().record_iteration();

            let before = current.clone();
            for pass in &self.passes {
                current = Self::run_pass(pass.as_ref(), current, context);
            }

            if current == before {
                converged = true;
                debug!(iterations, "fixpoint reached");
                break;
            }
            debug!(iteration = iterations, "tree changed");
        }

        if !converged {
            warn!(
                iterations,
                "tree still changing at the iteration cap; passes may be oscillating"
            );
            context.add_warning(Diagnostic::warning_with_code(
                current.span,
                error_codes::FIXPOINT_NOT_CONVERGED,
                format!(
                    "Analysis did not converge after {} iterations; results may be incomplete",
                    iterations
                ),
            ));
        }

        for pass in &self.terminal_passes {
            current = Self::run_pass(pass.as_ref(), current, context);
        }

        AnalysisOutcome {
            script: current,
            iterations,
            converged,
        }
    }
}
