//! Semantic analysis for HostScript compilation units
//!
//! A parsed [`ast::Script`] goes through a fixed pipeline of tree rewrites that
//! is repeated until the tree stops changing. Along the way loose statements
//! are assembled into a generated class, type references and names are bound,
//! literals are typed, assignments become concrete stores and calls are bound
//! to overloads. Whatever is still unresolved is reported once at the end.

pub mod ast;
pub mod cli;
pub mod core;
pub mod helpers;
pub mod phases;
pub mod scopes;
pub mod state;
pub mod stdlib;
pub mod utils;
pub mod visitors;

pub use crate::cli::config::{AnalyzerConfig, AnalyzerOptions, CliOverrides};
pub use crate::cli::diagnostics::{
    CollectingDiagnosticHandler, ConsoleDiagnosticHandler, Diagnostic, DiagnosticHandler,
    DiagnosticLevel,
};
pub use crate::cli::errors::{AnalysisError, RepositoryError};
pub use crate::core::analyzer::SemanticAnalyzer;
pub use crate::core::class_id::GeneratedClassIds;
pub use crate::core::context::AnalysisContext;
pub use crate::core::fixpoint::{AnalysisOutcome, FixpointDriver, DEFAULT_MAX_ITERATIONS};
pub use crate::core::type_compat::TypeCompatibility;
pub use crate::core::type_environment::{InMemoryTypeRepository, TypeEnvironment, TypeRepository};
pub use crate::phases::AnalysisPass;
pub use crate::state::{AnalysisMetrics, MetricSummary};
