
use hostscript_analyzer::ast::builder::{self, ScriptBuilder, TypeBuilder};
use hostscript_analyzer::ast::{Modifiers, ResolvedType, Script};
use hostscript_analyzer::cli::diagnostics::error_codes;
use hostscript_analyzer::core::type_environment::{MethodShape, TypeShape};
use hostscript_analyzer::{stdlib, DiagnosticHandler};
use test_utils::TestAnalyzer;

fn fixtures() -> Vec<TypeShape> {
    vec![
        TypeShape::class("a.Bar"),
        TypeShape::class("b.Bar"),
        TypeShape::class("a.String"),
        TypeShape::class("geo.Point"),
    ]
}

fn holder(field_type: &str) -> TypeBuilder {
    TypeBuilder::class("Holder").field(builder::field(
        "value",
        builder::named_type(field_type),
        Modifiers::public(),
    ))
}

fn field_type(script: &Script) -> Option<ResolvedType> {
    script
        .find_type("Holder")
        .and_then(|holder| holder.fields().next())
        .and_then(|field| field.ty.static_type())
}

#[test]
fn test_two_on_demand_imports_are_ambiguous() {
    let harness = TestAnalyzer::new(fixtures());
    let script = ScriptBuilder::new()
        .imports(&["a.*", "b.*"])
        .declare(holder("Bar").build())
        .build();
    let result = harness.analyze(script);

    assert_eq!(field_type(&result), None);
    let diagnostics = harness.handler.get_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].has_code(error_codes::TYPE_AMBIGUOUS));
    let mut candidates = diagnostics[0].candidates().unwrap().to_vec();
    candidates.sort();
    assert_eq!(candidates, vec!["a.Bar".to_string(), "b.Bar".to_string()]);
}

#[test]
fn test_ambiguous_type_as_receiver_and_read_is_reported() {
    let factory = |name: &str| {
        TypeShape::class(name)
            .with_method(MethodShape::new("make", vec![], ResolvedType::Void).make_static())
    };
    let harness = TestAnalyzer::new(vec![factory("a.Bar"), factory("b.Bar")]);
    let script = ScriptBuilder::new()
        .imports(&["a.*", "b.*"])
        .expression(builder::method_call(builder::name("Bar"), "make", vec![]))
        .expression(builder::name("Bar"))
        .build();
    harness.analyze(script);

    let diagnostics = harness.handler.get_diagnostics();
    assert!(!diagnostics.is_empty());
    for diagnostic in &diagnostics {
        assert!(diagnostic.has_code(error_codes::TYPE_AMBIGUOUS));
        let mut candidates = diagnostic.candidates().unwrap().to_vec();
        candidates.sort();
        assert_eq!(candidates, vec!["a.Bar".to_string(), "b.Bar".to_string()]);
    }
}

#[test]
fn test_explicit_import_beats_on_demand() {
    let harness = TestAnalyzer::new(fixtures());
    let script = ScriptBuilder::new()
        .imports(&["a.*", "b.Bar"])
        .declare(holder("Bar").build())
        .build();
    let result = harness.analyze(script);
    assert_eq!(field_type(&result), Some(ResolvedType::class("b.Bar")));
    assert!(!harness.handler.has_errors());
}

#[test]
fn test_on_demand_import_beats_default_imports() {
    let harness = TestAnalyzer::new(fixtures());
    let script = ScriptBuilder::new()
        .imports(&["a.*"])
        .declare(holder("String").build())
        .build();
    let result = harness.analyze(script);
    assert_eq!(field_type(&result), Some(ResolvedType::class("a.String")));
}

#[test]
fn test_default_imports_apply_without_declarations() {
    let harness = TestAnalyzer::new(fixtures());
    let result = harness.analyze(ScriptBuilder::new().declare(holder("String").build()).build());
    assert_eq!(field_type(&result), Some(ResolvedType::class(stdlib::STRING)));
}

#[test]
fn test_unit_type_shadows_on_demand_import() {
    let harness = TestAnalyzer::new(fixtures());
    let script = ScriptBuilder::new()
        .package("app")
        .imports(&["a.*"])
        .declare(TypeBuilder::class("Bar").build())
        .declare(holder("Bar").build())
        .build();
    let result = harness.analyze(script);
    assert_eq!(field_type(&result), Some(ResolvedType::class("app.Bar")));
    assert!(!harness.handler.has_errors());
}

#[test]
fn test_fully_qualified_name_needs_no_import() {
    let harness = TestAnalyzer::new(fixtures());
    let result = harness.analyze(ScriptBuilder::new().declare(holder("geo.Point").build()).build());
    assert_eq!(field_type(&result), Some(ResolvedType::class("geo.Point")));
}

#[test]
fn test_missing_type_is_reported_once_with_suggestion() {
    let harness = TestAnalyzer::new(fixtures());
    let script = ScriptBuilder::new()
        .imports(&["geo.*"])
        .declare(holder("Pont").build())
        .build();
    harness.analyze(script);

    let diagnostics = harness.handler.get_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].has_code(error_codes::TYPE_NOT_FOUND));
    assert!(diagnostics[0]
        .suggestions
        .iter()
        .any(|s| s.replacement == "Point"));
}
