use super::*;
use crate::{MismatchReason, NoopResolver, SymbolEnv, TypeExpr, conforms, explain};

fn pair(total: bool) -> RecordDef {
    RecordDef::new("Pair")
        .field("a", TypeExpr::INT)
        .field("b", TypeExpr::STR)
        .total(total)
}

fn matches(value: &Value, record: &RecordDef) -> bool {
    let direct = is_structural_match(value, record, &NoopResolver).expect("record check");
    // The prebuilt-field path must agree with the on-demand one.
    let built = conforms(value, &record.clone().into_expr(), &NoopResolver).expect("conforms");
    assert_eq!(direct, built, "{value:?}");
    direct
}

#[test]
fn total_record_requires_exact_keys() {
    let record = pair(true);
    assert!(matches(&Value::dict([("a", Value::Int(1)), ("b", Value::str("x"))]), &record));
    assert!(!matches(&Value::dict([("a", 1)]), &record));
    assert!(!matches(
        &Value::dict([
            ("a", Value::Int(1)),
            ("b", Value::str("x")),
            ("c", Value::Int(2)),
        ]),
        &record
    ));
}

#[test]
fn partial_record_relaxes_presence_only() {
    let record = pair(false);
    assert!(matches(&Value::dict([("a", 1)]), &record));
    assert!(matches(&Value::Dict(Vec::new()), &record));
    assert!(!matches(&Value::dict([("a", 1), ("c", 2)]), &record));
    assert!(!matches(&Value::dict([("a", "1")]), &record));
}

#[test]
fn field_values_must_conform() {
    let record = pair(true);
    assert!(!matches(&Value::dict([("a", Value::str("1")), ("b", Value::str("x"))]), &record));
    assert!(!matches(&Value::dict([("a", Value::Int(1)), ("b", Value::None)]), &record));
}

#[test]
fn non_mappings_and_non_string_keys_fail() {
    let record = pair(false);
    assert!(!matches(&Value::list([1]), &record));
    assert!(!matches(&Value::None, &record));
    assert!(!matches(&Value::dict([(1, 1)]), &record));
}

#[test]
fn fields_resolve_through_the_environment() {
    let env = SymbolEnv::new().with(
        "Address",
        RecordDef::new("Address").field("city", TypeExpr::STR),
    );
    let person = RecordDef::new("Person")
        .field("name", TypeExpr::STR)
        .field("address", TypeExpr::optional(TypeExpr::forward("Address")));

    let value = Value::dict([
        ("name", Value::str("Ada")),
        ("address", Value::dict([("city", "London")])),
    ]);
    assert!(is_structural_match(&value, &person, &env).unwrap());

    let homeless = Value::dict([("name", Value::str("Ada")), ("address", Value::None)]);
    assert!(is_structural_match(&homeless, &person, &env).unwrap());

    let bad = Value::dict([
        ("name", Value::str("Ada")),
        ("address", Value::dict([("city", 1)])),
    ]);
    assert!(!is_structural_match(&bad, &person, &env).unwrap());

    let err = is_structural_match(&value, &person, &NoopResolver).unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::Configuration);
}

#[test]
fn explains_record_failures() {
    let expr = pair(true).into_expr();
    let reason = |value: Value| {
        explain(&value, &expr, &NoopResolver)
            .expect("explain")
            .map(|mismatch| mismatch.reason)
    };

    assert_eq!(
        reason(Value::dict([("a", 1)])),
        Some(MismatchReason::MissingField("b".into()))
    );
    assert_eq!(
        reason(Value::dict([
            ("a", Value::Int(1)),
            ("b", Value::str("x")),
            ("c", Value::Int(2)),
        ])),
        Some(MismatchReason::UnexpectedKey("c".into()))
    );
    assert_eq!(
        reason(Value::dict([
            (Value::str("a"), Value::Int(1)),
            (Value::str("b"), Value::str("x")),
            (Value::Int(3), Value::Int(2)),
        ])),
        Some(MismatchReason::NonStringKey(crate::ValueKind::Int))
    );
    assert_eq!(
        reason(Value::dict([("a", Value::Int(1)), ("b", Value::str("x"))])),
        None
    );
}
