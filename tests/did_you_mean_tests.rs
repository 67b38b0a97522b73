//! "Did you mean?" suggestions, both through the fuzzy matcher directly and as
//! they surface on unresolved type diagnostics.

use hostscript_analyzer::ast::builder::{self, ScriptBuilder, TypeBuilder};
use hostscript_analyzer::ast::Modifiers;
use hostscript_analyzer::cli::diagnostics::CollectingDiagnosticHandler;
use hostscript_analyzer::utils::fuzzy;
use hostscript_analyzer::{stdlib, DiagnosticHandler, GeneratedClassIds, SemanticAnalyzer};
use std::sync::Arc;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn suggestions_for(type_name: &str) -> Vec<String> {
    let handler = Arc::new(CollectingDiagnosticHandler::new());
    let analyzer = SemanticAnalyzer::new(Arc::new(stdlib::standard_repository()), handler.clone())
        .with_class_ids(GeneratedClassIds::seeded(1));
    let script = ScriptBuilder::new()
        .declare(
            TypeBuilder::class("Holder")
                .field(builder::field(
                    "value",
                    builder::named_type(type_name),
                    Modifiers::public(),
                ))
                .build(),
        )
        .build();
    analyzer.analyze(script);
    handler
        .get_diagnostics()
        .iter()
        .flat_map(|d| d.suggestions.iter().map(|s| s.replacement.clone()))
        .collect()
}

#[test]
fn test_one_char_typo() {
    let candidates = names(&["ArrayList", "List", "Map"]);
    assert_eq!(fuzzy::suggest_one("ArrayLst", &candidates), Some("ArrayList"));
}

#[test]
fn test_case_mismatch() {
    let candidates = names(&["BigDecimal", "BigInteger"]);
    assert_eq!(fuzzy::suggest_one("bigdecimal", &candidates), Some("BigDecimal"));
}

#[test]
fn test_no_close_match() {
    let candidates = names(&["String", "Integer"]);
    assert_eq!(fuzzy::suggest_one("CompletelyDifferent", &candidates), None);
}

#[test]
fn test_limit_keeps_closest_first() {
    let candidates = names(&["Sets", "Set", "Seat", "Map"]);
    let found = fuzzy::suggest("Sett", &candidates, 2);
    assert_eq!(found.len(), 2);
    assert!(found.contains(&"Set") || found.contains(&"Sets"));
    assert!(!found.contains(&"Map"));
}

#[test]
fn test_threshold_scales_with_length() {
    assert_eq!(fuzzy::threshold("Set"), 2);
    assert_eq!(fuzzy::threshold("InterpolatedString"), 6);
}

#[test]
fn test_unresolved_type_suggests_platform_type() {
    assert!(suggestions_for("Strng").contains(&"String".to_string()));
    assert!(suggestions_for("Integr").contains(&"Integer".to_string()));
}

#[test]
fn test_far_name_gets_no_suggestion() {
    assert!(suggestions_for("Zzzzzzzzzzzz").is_empty());
}
