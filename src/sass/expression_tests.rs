use crate::sass::diagnostics::{DiagnosticCode, SassDiagnostic, create_range};
use crate::sass::expression::{ValueLocation, parse_expression};
use crate::sass::nodes::{ExpressionType, NodeValue, VariableLocation};
use crate::sass::scope::VariableLookup;
use crate::test_utils::test_uri;

/// Lookup over a fixed list of `(name, namespace, line)` declarations
struct KnownVariables(Vec<(&'static str, Option<&'static str>, usize)>);

impl VariableLookup for KnownVariables {
    fn lookup(&self, name: &str, namespace: Option<&str>, _level: usize) -> Option<VariableLocation> {
        self.0
            .iter()
            .find(|(known, known_namespace, _)| *known == name && *known_namespace == namespace)
            .map(|(_, _, line)| VariableLocation {
                uri: test_uri("main.sass"),
                line: *line,
            })
    }
}

fn location(line: usize, start_offset: usize) -> ValueLocation {
    ValueLocation {
        line,
        start_offset,
        level: 1,
    }
}

fn parse(raw: &str, known: KnownVariables) -> (Vec<NodeValue>, Vec<SassDiagnostic>) {
    let mut diagnostics = Vec::new();
    let values = parse_expression(raw, location(0, 0), &known, &mut diagnostics);
    (values, diagnostics)
}

fn literal_text(value: &NodeValue) -> &str {
    match value {
        NodeValue::Literal(literal) => &literal.value,
        other => panic!("Expected literal, got {:?}", other),
    }
}

#[test]
fn test_nested_functions_report_each_missing_variable() {
    let mut diagnostics = Vec::new();
    let values = parse_expression(
        "calc(calc(20px - $var2) + $var)",
        location(3, 8),
        &KnownVariables(Vec::new()),
        &mut diagnostics,
    );

    assert_eq!(values.len(), 1);
    let NodeValue::Expression(outer) = &values[0] else {
        panic!("Expected expression, got {:?}", values[0]);
    };
    assert_eq!(outer.expression_type, ExpressionType::Func { name: "calc".to_string() });
    assert_eq!(outer.body.len(), 3);

    let NodeValue::Expression(inner) = &outer.body[0] else {
        panic!("Expected nested expression, got {:?}", outer.body[0]);
    };
    assert_eq!(inner.expression_type, ExpressionType::Func { name: "calc".to_string() });
    assert_eq!(literal_text(&inner.body[0]), "20px");
    assert_eq!(literal_text(&inner.body[1]), "-");
    match &inner.body[2] {
        NodeValue::VariableRef(reference) => {
            assert_eq!(reference.name, "$var2");
            assert!(reference.reference.is_none());
        }
        other => panic!("Expected variable reference, got {:?}", other),
    }
    assert_eq!(literal_text(&outer.body[1]), "+");

    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.iter().all(|d| d.code == DiagnosticCode::VariableNotFound));
    assert!(!diagnostics[0].is_resolved_by_formatting);
    assert_eq!(diagnostics[0].range, create_range(3, 25, 30));
    assert_eq!(diagnostics[1].range, create_range(3, 34, 38));
    assert_eq!(diagnostics[0].message, "Variable declaration for $var2 not found.");
}

#[test]
fn test_resolved_references() {
    let (values, diagnostics) = parse(" $width solid $missing", KnownVariables(vec![("$width", None, 4)]));

    assert_eq!(values.len(), 3);
    match &values[0] {
        NodeValue::VariableRef(reference) => {
            assert_eq!(reference.value, "$width");
            assert_eq!(
                reference.reference,
                Some(VariableLocation {
                    uri: test_uri("main.sass"),
                    line: 4
                })
            );
        }
        other => panic!("Expected variable reference, got {:?}", other),
    }
    assert_eq!(literal_text(&values[1]), "solid");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].range, create_range(0, 14, 22));
}

#[test]
fn test_namespaced_reference() {
    let (values, diagnostics) = parse("m.$gap", KnownVariables(vec![("$gap", Some("m"), 0)]));

    assert!(diagnostics.is_empty());
    match &values[0] {
        NodeValue::VariableRef(reference) => {
            assert_eq!(reference.value, "m.$gap");
            assert_eq!(reference.name, "$gap");
            assert_eq!(reference.namespace.as_deref(), Some("m"));
            assert!(reference.reference.is_some());
        }
        other => panic!("Expected variable reference, got {:?}", other),
    }
}

#[test]
fn test_trailing_comma_is_part_of_the_token() {
    let (values, diagnostics) = parse("$a, $b", KnownVariables(vec![("$a", None, 0), ("$b", None, 1)]));

    assert!(diagnostics.is_empty());
    match &values[0] {
        NodeValue::VariableRef(reference) => {
            assert_eq!(reference.value, "$a,");
            assert_eq!(reference.name, "$a");
        }
        other => panic!("Expected variable reference, got {:?}", other),
    }
}

#[test]
fn test_quoted_strings_are_opaque() {
    let (values, diagnostics) = parse(r#""a b" 'c)d $x'"#, KnownVariables(Vec::new()));

    assert!(diagnostics.is_empty());
    assert_eq!(values.len(), 2);
    assert_eq!(literal_text(&values[0]), "\"a b\"");
    assert_eq!(literal_text(&values[1]), "'c)d $x'");
}

#[test]
fn test_interpolation() {
    let mut diagnostics = Vec::new();
    let values = parse_expression("#{$body} x", location(2, 10), &KnownVariables(Vec::new()), &mut diagnostics);

    assert_eq!(values.len(), 2);
    match &values[0] {
        NodeValue::Expression(expression) => {
            assert_eq!(expression.expression_type, ExpressionType::Interpolated);
            assert_eq!(expression.body.len(), 1);
        }
        other => panic!("Expected interpolation, got {:?}", other),
    }
    assert_eq!(literal_text(&values[1]), "x");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].range, create_range(2, 12, 17));
}

#[test]
fn test_unbalanced_parentheses() {
    // A closer with nothing open stays text
    let (values, _) = parse("a)", KnownVariables(Vec::new()));
    assert_eq!(values.len(), 1);
    assert_eq!(literal_text(&values[0]), "a)");

    // Anything left open is closed at the end of the value
    let (values, _) = parse("rgba(0, 0", KnownVariables(Vec::new()));
    assert_eq!(values.len(), 1);
    match &values[0] {
        NodeValue::Expression(expression) => {
            assert_eq!(expression.expression_type, ExpressionType::Func { name: "rgba".to_string() });
            assert_eq!(literal_text(&expression.body[0]), "0,");
            assert_eq!(literal_text(&expression.body[1]), "0");
        }
        other => panic!("Expected expression, got {:?}", other),
    }
}

#[test]
fn test_empty_value() {
    let (values, diagnostics) = parse("", KnownVariables(Vec::new()));
    assert!(values.is_empty());
    assert!(diagnostics.is_empty());

    let (values, _) = parse("   ", KnownVariables(Vec::new()));
    assert!(values.is_empty());
}

#[test]
fn test_joined_values() {
    let (values, _) = parse("1px -#{$w}px", KnownVariables(vec![("$w", None, 0)]));

    assert_eq!(values.len(), 4);
    assert_eq!(literal_text(&values[0]), "1px");
    assert!(!values[0].is_joined());
    assert_eq!(literal_text(&values[1]), "-");
    assert!(!values[1].is_joined());
    assert!(matches!(&values[2], NodeValue::Expression(expression) if expression.joined));
    assert_eq!(literal_text(&values[3]), "px");
    assert!(values[3].is_joined());
}
