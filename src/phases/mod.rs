//! Analysis passes run by the fixpoint driver
//!
//! Each pass is a whole-tree rewrite. The standard pipeline, in order:
//! - `script_assembly_phase`: wraps loose statements and members into a generated type
//! - `declaring_type_phase`: records each method's enclosing type
//! - `type_resolution_phase`: binds type references through the scope stack
//! - `literal_phase`: types literals, boolean operators and conditionals
//! - `assignment_phase`: turns name assignments into stores and binds name reads
//! - `overload_phase`: binds calls and instantiations
//!
//! `unresolved_report_phase` is terminal: it runs once after the loop and only
//! reports what the standard pipeline could not resolve.
//!
//! **Design Pattern**: every pass creates a fresh folder per application, so no
//! state leaks from one iteration into the next except through the tree itself.

pub mod assignment_phase;
pub mod declaring_type_phase;
pub mod literal_phase;
pub mod overload_phase;
pub mod script_assembly_phase;
pub mod type_resolution_phase;
pub mod unresolved_report_phase;

use crate::ast::Script;
use crate::core::context::AnalysisContext;

pub use assignment_phase::AssignmentRewriter;
pub use declaring_type_phase::DeclaringTypeDecorator;
pub use literal_phase::LiteralTypePropagator;
pub use overload_phase::OverloadResolver;
pub use script_assembly_phase::ScriptAssembler;
pub use type_resolution_phase::TypeReferenceResolver;
pub use unresolved_report_phase::UnresolvedReferenceReporter;

/// A single tree-to-tree rewrite step
pub trait AnalysisPass: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, script: Script, context: &mut AnalysisContext) -> Script;
}

/// The passes iterated to a fixpoint, in run order
pub fn standard_pipeline() -> Vec<Box<dyn AnalysisPass>> {
    vec![
        Box::new(ScriptAssembler),
        Box::new(DeclaringTypeDecorator),
        Box::new(TypeReferenceResolver),
        Box::new(LiteralTypePropagator),
        Box::new(AssignmentRewriter),
        Box::new(OverloadResolver),
    ]
}

/// Passes run once after the loop ends
pub fn terminal_passes() -> Vec<Box<dyn AnalysisPass>> {
    vec![Box::new(UnresolvedReferenceReporter)]
}
