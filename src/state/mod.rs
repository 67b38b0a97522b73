//! Analyzer state shared across passes and compilations

pub mod metrics;

pub use metrics::{AnalysisMetrics, MetricSummary};
