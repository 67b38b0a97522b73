use crate::ast::Span;
use indexmap::IndexMap;
use std::sync::Mutex;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

/// Diagnostic code for categorization and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// Numeric code (e.g., 3001)
    pub code: u16,
    /// Category prefix ("E" for error, "W" for warning)
    pub prefix: char,
}

impl DiagnosticCode {
    pub const fn new(prefix: char, code: u16) -> Self {
        Self { code, prefix }
    }

    /// Format as string (e.g., "E3001", "W1001")
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.code)
    }
}

/// Structured parameter value attached to a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiagnosticValue {
    Text(String),
    List(Vec<String>),
}

/// Related information for a diagnostic (additional context from other locations)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRelatedInformation {
    pub span: Span,
    pub message: String,
}

/// Suggested fix for a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticSuggestion {
    pub span: Span,
    pub replacement: String,
    pub message: String,
}

/// A diagnostic message with location, severity, and optional metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub span: Span,
    pub message: String,
    pub code: Option<DiagnosticCode>,
    /// Named values such as the unresolved name or the ambiguous candidates
    pub parameters: IndexMap<String, DiagnosticValue>,
    pub related_information: Vec<DiagnosticRelatedInformation>,
    pub suggestions: Vec<DiagnosticSuggestion>,
}

impl Diagnostic {
    fn with_level(level: DiagnosticLevel, span: Span, message: String) -> Self {
        Self {
            level,
            span,
            message,
            code: None,
            parameters: IndexMap::new(),
            related_information: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Error, span, message.into())
    }

    pub fn warning(span: Span, message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Warning, span, message.into())
    }

    pub fn info(span: Span, message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Info, span, message.into())
    }

    /// Create an error with a diagnostic code
    pub fn error_with_code(span: Span, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::error(span, message).with_code(code)
    }

    pub fn warning_with_code(
        span: Span,
        code: DiagnosticCode,
        message: impl Into<String>,
    ) -> Self {
        Self::warning(span, message).with_code(code)
    }

    /// Add related information to this diagnostic
    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            span,
            message: message.into(),
        });
        self
    }

    /// Add a suggestion to this diagnostic
    pub fn with_suggestion(
        mut self,
        span: Span,
        replacement: String,
        message: impl Into<String>,
    ) -> Self {
        self.suggestions.push(DiagnosticSuggestion {
            span,
            replacement,
            message: message.into(),
        });
        self
    }

    /// Set the diagnostic code
    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_parameter(mut self, key: &str, value: impl Into<String>) -> Self {
        self.parameters
            .insert(key.to_string(), DiagnosticValue::Text(value.into()));
        self
    }

    pub fn with_list_parameter(mut self, key: &str, values: Vec<String>) -> Self {
        self.parameters
            .insert(key.to_string(), DiagnosticValue::List(values));
        self
    }

    pub fn with_candidates(self, candidates: Vec<String>) -> Self {
        self.with_list_parameter(parameter_keys::CANDIDATES, candidates)
    }

    pub fn parameter(&self, key: &str) -> Option<&DiagnosticValue> {
        self.parameters.get(key)
    }

    /// Candidate list of an ambiguity diagnostic
    pub fn candidates(&self) -> Option<&[String]> {
        match self.parameters.get(parameter_keys::CANDIDATES) {
            Some(DiagnosticValue::List(values)) => Some(values),
            _ => None,
        }
    }

    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.code == Some(code)
    }
}

/// Well-known keys of [`Diagnostic::parameters`]
pub mod parameter_keys {
    pub const NAME: &str = "name";
    pub const ARGUMENTS: &str = "arguments";
    pub const CANDIDATES: &str = "candidates";
}

/// Trait for handling diagnostics
/// This allows for dependency injection and testing with mock handlers
pub trait DiagnosticHandler: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);

    /// Report `diagnostic` unless an already reported one satisfies `is_duplicate`.
    /// Returns whether it was reported.
    fn report_unless(
        &self,
        diagnostic: Diagnostic,
        is_duplicate: &dyn Fn(&Diagnostic) -> bool,
    ) -> bool {
        if self.get_diagnostics().iter().any(is_duplicate) {
            return false;
        }
        self.report(diagnostic);
        true
    }

    fn error(&self, span: Span, message: &str) {
        self.report(Diagnostic::error(span, message.to_string()));
    }

    fn warning(&self, span: Span, message: &str) {
        self.report(Diagnostic::warning(span, message.to_string()));
    }

    fn info(&self, span: Span, message: &str) {
        self.report(Diagnostic::info(span, message.to_string()));
    }

    fn has_errors(&self) -> bool;
    fn error_count(&self) -> usize;
    fn warning_count(&self) -> usize;
    fn get_diagnostics(&self) -> Vec<Diagnostic>;
}

fn count_level(diagnostics: &Mutex<Vec<Diagnostic>>, level: DiagnosticLevel) -> usize {
    diagnostics
        .lock()
        .unwrap()
        .iter()
        .filter(|d| d.level == level)
        .count()
}

/// Console-based diagnostic handler that prints to stderr
pub struct ConsoleDiagnosticHandler {
    diagnostics: Mutex<Vec<Diagnostic>>,
    pretty: bool,
}

impl ConsoleDiagnosticHandler {
    pub fn new(pretty: bool) -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            pretty,
        }
    }

    fn print(&self, diagnostic: &Diagnostic) {
        let level_str = match diagnostic.level {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Info => "info",
        };
        let code_str = if let Some(code) = &diagnostic.code {
            format!("[{}] ", code.as_str())
        } else {
            String::new()
        };

        if self.pretty {
            eprintln!(
                "\x1b[1m{}\x1b[0m {}at {}: {}",
                level_str, code_str, diagnostic.span, diagnostic.message
            );
            if let Some(candidates) = diagnostic.candidates() {
                eprintln!("  \x1b[36mCandidates\x1b[0m: {}", candidates.join(", "));
            }
            for related in &diagnostic.related_information {
                eprintln!(
                    "  \x1b[36mNote\x1b[0m at {}: {}",
                    related.span, related.message
                );
            }
            for suggestion in &diagnostic.suggestions {
                eprintln!("  \x1b[32mSuggestion\x1b[0m: {}", suggestion.message);
            }
        } else {
            eprintln!(
                "{} {}at {}: {}",
                level_str, code_str, diagnostic.span, diagnostic.message
            );
            if let Some(candidates) = diagnostic.candidates() {
                eprintln!("  Candidates: {}", candidates.join(", "));
            }
            for related in &diagnostic.related_information {
                eprintln!("  Note at {}: {}", related.span, related.message);
            }
            for suggestion in &diagnostic.suggestions {
                eprintln!("  Suggestion: {}", suggestion.message);
            }
        }
    }
}

impl DiagnosticHandler for ConsoleDiagnosticHandler {
    fn report(&self, diagnostic: Diagnostic) {
        self.print(&diagnostic);
        self.diagnostics.lock().unwrap().push(diagnostic);
    }

    fn report_unless(
        &self,
        diagnostic: Diagnostic,
        is_duplicate: &dyn Fn(&Diagnostic) -> bool,
    ) -> bool {
        let mut diagnostics = self.diagnostics.lock().unwrap();
        if diagnostics.iter().any(is_duplicate) {
            return false;
        }
        self.print(&diagnostic);
        diagnostics.push(diagnostic);
        true
    }

    fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn error_count(&self) -> usize {
        count_level(&self.diagnostics, DiagnosticLevel::Error)
    }

    fn warning_count(&self) -> usize {
        count_level(&self.diagnostics, DiagnosticLevel::Warning)
    }

    fn get_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().unwrap().clone()
    }
}

/// Collecting diagnostic handler for testing
/// Collects all diagnostics without printing
pub struct CollectingDiagnosticHandler {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnosticHandler {
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
        }
    }
}

impl Default for CollectingDiagnosticHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticHandler for CollectingDiagnosticHandler {
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().unwrap().push(diagnostic);
    }

    fn report_unless(
        &self,
        diagnostic: Diagnostic,
        is_duplicate: &dyn Fn(&Diagnostic) -> bool,
    ) -> bool {
        let mut diagnostics = self.diagnostics.lock().unwrap();
        if diagnostics.iter().any(is_duplicate) {
            return false;
        }
        diagnostics.push(diagnostic);
        true
    }

    fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn error_count(&self) -> usize {
        count_level(&self.diagnostics, DiagnosticLevel::Error)
    }

    fn warning_count(&self) -> usize {
        count_level(&self.diagnostics, DiagnosticLevel::Warning)
    }

    fn get_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().unwrap().clone()
    }
}

/// Error codes for analyzer diagnostics
///
/// - E3000-E3999: Semantic analysis errors
/// - W1000-W1999: Analysis warnings
pub mod error_codes {
    use super::DiagnosticCode;

    /// No visible type has the referenced name
    pub const TYPE_NOT_FOUND: DiagnosticCode = DiagnosticCode::new('E', 3001);

    /// Several on-demand or default imports provide the referenced name
    pub const TYPE_AMBIGUOUS: DiagnosticCode = DiagnosticCode::new('E', 3002);

    /// No applicable method for a call
    pub const METHOD_NOT_FOUND: DiagnosticCode = DiagnosticCode::new('E', 3003);

    /// More than one applicable method for a call
    pub const METHOD_AMBIGUOUS: DiagnosticCode = DiagnosticCode::new('E', 3004);

    /// No applicable constructor
    pub const CONSTRUCTOR_NOT_FOUND: DiagnosticCode = DiagnosticCode::new('E', 3005);

    /// More than one applicable constructor
    pub const CONSTRUCTOR_AMBIGUOUS: DiagnosticCode = DiagnosticCode::new('E', 3006);

    /// Field, parameter or local declared `void`
    pub const ILLEGAL_VOID_DECLARATION: DiagnosticCode = DiagnosticCode::new('E', 3007);

    /// Bare name that no scope binds
    pub const NAME_NOT_RESOLVED: DiagnosticCode = DiagnosticCode::new('E', 3008);

    /// Iteration cap reached before the tree stopped changing
    pub const FIXPOINT_NOT_CONVERGED: DiagnosticCode = DiagnosticCode::new('W', 1001);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_creation() {
        let span = Span::new(0, 5, 1, 1);
        let diag = Diagnostic::error(span, "Test error");

        assert_eq!(diag.level, DiagnosticLevel::Error);
        assert_eq!(diag.message, "Test error");
        assert!(diag.code.is_none());
        assert!(diag.parameters.is_empty());
        assert!(diag.related_information.is_empty());
        assert!(diag.suggestions.is_empty());
    }

    #[test]
    fn test_diagnostic_with_code() {
        let span = Span::new(0, 5, 1, 1);
        let diag = Diagnostic::error_with_code(span, error_codes::TYPE_NOT_FOUND, "Type not found");

        assert!(diag.has_code(error_codes::TYPE_NOT_FOUND));
        assert_eq!(error_codes::TYPE_NOT_FOUND.as_str(), "E3001");
        assert_eq!(error_codes::FIXPOINT_NOT_CONVERGED.as_str(), "W1001");
    }

    #[test]
    fn test_candidates_parameter() {
        let diag = Diagnostic::error(Span::dummy(), "ambiguous")
            .with_parameter(parameter_keys::NAME, "Bar")
            .with_candidates(vec!["a.Bar".to_string(), "b.Bar".to_string()]);

        assert_eq!(
            diag.parameter(parameter_keys::NAME),
            Some(&DiagnosticValue::Text("Bar".to_string()))
        );
        assert_eq!(
            diag.candidates(),
            Some(&["a.Bar".to_string(), "b.Bar".to_string()][..])
        );
    }

    #[test]
    fn test_collecting_handler() {
        let handler = CollectingDiagnosticHandler::new();
        handler.error(Span::new(0, 1, 1, 1), "first");
        handler.warning(Span::new(0, 1, 1, 1), "second");

        assert!(handler.has_errors());
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.warning_count(), 1);
        assert_eq!(handler.get_diagnostics().len(), 2);
    }

    #[test]
    fn test_report_unless_skips_duplicates() {
        let handler = CollectingDiagnosticHandler::new();
        let diag = Diagnostic::error(Span::new(3, 4, 1, 4), "Type not found: Foo");

        assert!(handler.report_unless(diag.clone(), &|d| *d == diag));
        assert!(!handler.report_unless(diag.clone(), &|d| *d == diag));
        assert_eq!(handler.error_count(), 1);

        let other = Diagnostic::error(Span::new(8, 9, 2, 1), "Type not found: Foo");
        assert!(handler.report_unless(other.clone(), &|d| *d == other));
        assert_eq!(handler.error_count(), 2);
    }

    #[test]
    fn test_error_codes_are_unique() {
        let codes = [
            error_codes::TYPE_NOT_FOUND,
            error_codes::TYPE_AMBIGUOUS,
            error_codes::METHOD_NOT_FOUND,
            error_codes::METHOD_AMBIGUOUS,
            error_codes::CONSTRUCTOR_NOT_FOUND,
            error_codes::CONSTRUCTOR_AMBIGUOUS,
            error_codes::ILLEGAL_VOID_DECLARATION,
            error_codes::NAME_NOT_RESOLVED,
            error_codes::FIXPOINT_NOT_CONVERGED,
        ];
        let unique: std::collections::HashSet<_> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(unique.len(), codes.len());
    }
}
