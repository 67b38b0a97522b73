use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Counters shared by every pass of one analyzer
#[derive(Debug, Default)]
pub struct AnalysisMetrics {
    pub iterations: AtomicUsize,
    pub pass_runs: AtomicUsize,
    pub type_lookups: AtomicUsize,
    pub type_hits: AtomicUsize,
    pub type_misses: AtomicUsize,
    pub calls_bound: AtomicUsize,
    pub constructors_bound: AtomicUsize,
    pub assignments_rewritten: AtomicUsize,
    pub conversions_inserted: AtomicUsize,
    pub scripts_assembled: AtomicUsize,
    pub scope_operations: AtomicUsize,
    pub pass_times: Mutex<HashMap<&'static str, Vec<Duration>>>,
}

impl AnalysisMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&self) {
        self.iterations.store(0, Ordering::SeqCst);
        self.pass_runs.store(0, Ordering::SeqCst);
        self.type_lookups.store(0, Ordering::SeqCst);
        self.type_hits.store(0, Ordering::SeqCst);
        self.type_misses.store(0, Ordering::SeqCst);
        self.calls_bound.store(0, Ordering::SeqCst);
        self.constructors_bound.store(0, Ordering::SeqCst);
        self.assignments_rewritten.store(0, Ordering::SeqCst);
        self.conversions_inserted.store(0, Ordering::SeqCst);
        self.scripts_assembled.store(0, Ordering::SeqCst);
        self.scope_operations.store(0, Ordering::SeqCst);
        self.pass_times.lock().unwrap().clear();
    }

    pub fn record_iteration(&self) {
        self.iterations.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_pass_run(&self, pass: &'static str, duration: Duration) {
        self.pass_runs.fetch_add(1, Ordering::SeqCst);
        let mut times = self.pass_times.lock().unwrap();
        times.entry(pass).or_default().push(duration);
    }

    pub fn record_type_lookup(&self, hit: bool) {
        self.type_lookups.fetch_add(1, Ordering::SeqCst);
        if hit {
            self.type_hits.fetch_add(1, Ordering::SeqCst);
        } else {
            self.type_misses.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn type_hit_rate(&self) -> f64 {
        let total = self.type_lookups.load(Ordering::SeqCst);
        if total == 0 {
            return 1.0;
        }
        let hits = self.type_hits.load(Ordering::SeqCst);
        hits as f64 / total as f64
    }

    pub fn record_call_bound(&self) {
        self.calls_bound.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_constructor_bound(&self) {
        self.constructors_bound.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_assignment_rewrite(&self) {
        self.assignments_rewritten.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_conversion(&self) {
        self.conversions_inserted.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_script_assembly(&self) {
        self.scripts_assembled.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_scope_operation(&self) {
        self.scope_operations.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get_summary(&self) -> MetricSummary {
        let pass_time = self
            .pass_times
            .lock()
            .unwrap()
            .values()
            .flatten()
            .sum::<Duration>();

        MetricSummary {
            iterations: self.iterations.load(Ordering::SeqCst),
            pass_runs: self.pass_runs.load(Ordering::SeqCst),
            pass_time,
            type_lookups: self.type_lookups.load(Ordering::SeqCst),
            type_hit_rate: self.type_hit_rate(),
            calls_bound: self.calls_bound.load(Ordering::SeqCst),
            constructors_bound: self.constructors_bound.load(Ordering::SeqCst),
            assignments_rewritten: self.assignments_rewritten.load(Ordering::SeqCst),
            conversions_inserted: self.conversions_inserted.load(Ordering::SeqCst),
            scripts_assembled: self.scripts_assembled.load(Ordering::SeqCst),
            scope_operations: self.scope_operations.load(Ordering::SeqCst),
        }
    }
}

#[derive(Debug)]
pub struct MetricSummary {
    pub iterations: usize,
    pub pass_runs: usize,
    pub pass_time: Duration,
    pub type_lookups: usize,
    pub type_hit_rate: f64,
    pub calls_bound: usize,
    pub constructors_bound: usize,
    pub assignments_rewritten: usize,
    pub conversions_inserted: usize,
    pub scripts_assembled: usize,
    pub scope_operations: usize,
}

impl MetricSummary {
    pub fn format(&self) -> String {
        format!(
            r#"=== Analysis Metrics ===
Iterations: {}
Pass Runs: {} ({:.2?})
Type Lookups: {} (hit rate: {:.1}%)
Calls Bound: {}
Constructors Bound: {}
Assignments Rewritten: {}
Conversions Inserted: {}
Scripts Assembled: {}
Scope Operations: {}"#,
            self.iterations,
            self.pass_runs,
            self.pass_time,
            self.type_lookups,
            self.type_hit_rate * 100.0,
            self.calls_bound,
            self.constructors_bound,
            self.assignments_rewritten,
            self.conversions_inserted,
            self.scripts_assembled,
            self.scope_operations
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_hit_rate() {
        let metrics = AnalysisMetrics::new();
        assert_eq!(metrics.type_hit_rate(), 1.0);

        metrics.record_type_lookup(true);
        metrics.record_type_lookup(false);
        assert_eq!(metrics.type_hit_rate(), 0.5);
    }

    #[test]
    fn test_reset_and_summary() {
        let metrics = AnalysisMetrics::new();
        metrics.record_iteration();
        metrics.record_pass_run("literals", Duration::from_millis(1));
        metrics.record_call_bound();

        let summary = metrics.get_summary();
        assert_eq!(summary.iterations, 1);
        assert_eq!(summary.pass_runs, 1);
        assert!(summary.format().contains("Calls Bound: 1"));

        metrics.reset();
        assert_eq!(metrics.get_summary().iterations, 0);
        assert_eq!(metrics.get_summary().pass_time, Duration::ZERO);
    }
}
