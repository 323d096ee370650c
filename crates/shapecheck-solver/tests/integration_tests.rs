//! End-to-end checks through the public entry points.

use crate::{
    ArrayKind, DiagnosticTracer, MismatchReason, NoopResolver, PathSegment, RecordDef, SymbolEnv,
    TypeExpr, TypeResolver, Validator, Value, ValueKind, conforms, explain,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[test]
fn json_documents_validate() {
    init_tracing();
    let json = serde_json::json!({
        "name": "widget",
        "tags": ["a", "b"],
        "dims": [1, 2],
        "owner": null,
    });
    let env = SymbolEnv::new().with(
        "Item",
        RecordDef::new("Item")
            .field("name", TypeExpr::STR)
            .field("tags", TypeExpr::parse("List[str]").unwrap())
            .field("dims", TypeExpr::parse("List[int]").unwrap())
            .field("owner", TypeExpr::parse("Optional[str]").unwrap()),
    );
    let value = Value::from(json.clone());
    assert!(conforms(&value, &TypeExpr::name("Item"), &env).unwrap());

    // Arrays read as tuples no longer match list fields.
    let as_tuples = Value::from_json_with(json, ArrayKind::Tuple);
    assert!(!conforms(&as_tuples, &TypeExpr::name("Item"), &env).unwrap());
}

#[test]
fn explain_reports_the_deepest_path() {
    let expr = TypeExpr::parse("List[Dict[str, int]]").unwrap();
    let value = Value::list([Value::dict([("a", 1)]), Value::dict([("a", "x")])]);

    let mismatch = explain(&value, &expr, &NoopResolver).unwrap().expect("mismatch");
    assert_eq!(
        mismatch.path,
        vec![PathSegment::Index(1), PathSegment::Key("a".into())]
    );
    assert_eq!(
        mismatch.reason,
        MismatchReason::KindMismatch {
            expected: "int".into(),
            found: ValueKind::Str,
        }
    );
    assert_eq!(mismatch.to_string(), r#"$[1]["a"]: expected int, found str"#);

    let fine = Value::list([Value::dict([("a", 1)])]);
    assert_eq!(explain(&fine, &expr, &NoopResolver).unwrap(), None);
}

#[test]
fn explain_forgets_failures_of_accepted_union_arms() {
    let expr = TypeExpr::parse("Tuple[Union[Tuple[int, int], Tuple[str]], int]").unwrap();
    let value = Value::tuple([Value::tuple(["a"]), Value::str("x")]);

    let mismatch = explain(&value, &expr, &NoopResolver).unwrap().expect("mismatch");
    assert_eq!(mismatch.path, vec![PathSegment::Index(1)]);
    assert!(matches!(
        mismatch.reason,
        MismatchReason::KindMismatch { found: ValueKind::Str, .. }
    ));
}

#[test]
fn explain_names_record_fields_and_literals() {
    let env = SymbolEnv::new()
        .with(
            "Address",
            RecordDef::new("Address").field("city", TypeExpr::STR),
        )
        .with(
            "Person",
            RecordDef::new("Person")
                .field("name", TypeExpr::STR)
                .field("address", TypeExpr::name("Address")),
        );
    let value = Value::dict([
        ("name", Value::str("Ada")),
        ("address", Value::dict([("city", 7)])),
    ]);
    let mismatch = explain(&value, &TypeExpr::name("Person"), &env).unwrap().expect("mismatch");
    assert_eq!(mismatch.path_string(), "$.address.city");

    let colours = TypeExpr::parse("Literal['red', 'green']").unwrap();
    let mismatch = explain(&Value::str("blue"), &colours, &NoopResolver).unwrap().expect("mismatch");
    assert_eq!(
        mismatch.reason,
        MismatchReason::NotInLiteral {
            allowed: "Literal['red', 'green']".into()
        }
    );
}

#[test]
fn validator_reuses_its_tracer() {
    let mut validator = Validator::with_tracer(&NoopResolver, DiagnosticTracer::new());
    let ty = TypeExpr::parse("Tuple[int, int]").unwrap();
    assert!(!validator.conforms(&Value::tuple([1]), &ty).unwrap());
    assert_eq!(
        validator.tracer().mismatch().map(|m| &m.reason),
        Some(&MismatchReason::LengthMismatch {
            expected: 2,
            found: 1
        })
    );
}

struct Scoped;

impl TypeResolver for Scoped {
    fn resolve_symbol(&self, name: &str) -> Option<TypeExpr> {
        name.strip_prefix("Vec")
            .and_then(|inner| TypeExpr::parse(inner).ok())
            .map(TypeExpr::list)
    }

    fn has_symbols(&self) -> bool {
        true
    }
}

#[test]
fn custom_resolvers_plug_in() {
    assert!(conforms(&Value::list([1, 2]), &TypeExpr::name("Vecint"), &Scoped).unwrap());
    assert!(!conforms(&Value::list(["a"]), &TypeExpr::forward("Vecint"), &Scoped).unwrap());
    let err = conforms(&Value::None, &TypeExpr::forward("Missing"), &Scoped).unwrap_err();
    assert_eq!(err.unresolved_name(), Some("Missing"));
}
