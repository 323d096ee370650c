use super::*;
use crate::{ErrorKind, Instance, NoopResolver, ValidationOptions, ValueKind, extract, normalize};

fn check(value: &Value, source: &str) -> bool {
    let expr = TypeExpr::parse(source).expect("parse");
    conforms(value, &expr, &NoopResolver).unwrap_or_else(|err| panic!("validate {source}: {err}"))
}

#[test]
fn scalar_kinds_match_exactly() {
    assert!(check(&Value::Int(1), "int"));
    assert!(check(&Value::str("x"), "str"));
    assert!(check(&Value::Float(1.5), "float"));
    assert!(check(&Value::Bytes(b"x".to_vec()), "bytes"));
    assert!(check(&Value::None, "None"));

    assert!(!check(&Value::str("1"), "int"));
    assert!(!check(&Value::Bool(true), "int"));
    assert!(!check(&Value::Int(1), "float"));
    assert!(!check(&Value::Int(0), "bool"));
}

#[test]
fn any_accepts_everything() {
    for value in [
        Value::None,
        Value::Int(3),
        Value::list([1, 2]),
        Value::Instance(Instance::new("Widget")),
    ] {
        assert!(check(&value, "Any"), "{value:?}");
    }
}

#[test]
fn optional_accepts_none_or_value() {
    assert!(check(&Value::None, "Optional[int]"));
    assert!(check(&Value::Int(3), "Optional[int]"));
    assert!(!check(&Value::str("3"), "Optional[int]"));
}

#[test]
fn sequences_check_every_element() {
    assert!(check(&Value::list([1, 2, 3]), "List[int]"));
    assert!(check(&Value::List(Vec::new()), "List[int]"));
    assert!(!check(&Value::list([Value::Int(1), Value::str("2"), Value::Int(3)]), "List[int]"));
    assert!(!check(&Value::list([Value::Int(1), Value::Int(2), Value::str("3")]), "List[int]"));
    assert!(!check(&Value::tuple([1, 2]), "List[int]"));

    assert!(check(&Value::set(["a", "b"]), "Set[str]"));
    assert!(!check(&Value::list(["a"]), "Set[str]"));
    assert!(!check(&Value::set([Value::str("a"), Value::Int(1)]), "Set[str]"));
}

#[test]
fn raw_container_handles_ignore_contents() {
    let mixed = Value::list([Value::Int(1), Value::str("a")]);
    assert!(check(&mixed, "list"));
    assert!(check(&mixed, "List"));
    assert!(!check(&mixed, "dict"));
    assert!(check(&Value::dict([(1, "x")]), "Dict"));
}

#[test]
fn mappings_check_keys_and_values() {
    assert!(check(&Value::dict([("a", 1), ("b", 2)]), "Dict[str, int]"));
    assert!(!check(&Value::dict([("a", "x")]), "Dict[str, int]"));
    assert!(!check(&Value::dict([(1, 1)]), "Dict[str, int]"));
    assert!(!check(&Value::list([1]), "Dict[str, int]"));
}

#[test]
fn tuples_check_length_and_positions() {
    assert!(check(&Value::tuple([Value::Int(1), Value::str("a")]), "Tuple[int, str]"));
    assert!(!check(&Value::tuple([1]), "Tuple[int, str]"));
    assert!(!check(&Value::tuple([1, 2]), "Tuple[int, str]"));
    assert!(!check(&Value::tuple([Value::str("a"), Value::Int(1)]), "Tuple[int, str]"));
    assert!(!check(&Value::list([Value::Int(1), Value::str("a")]), "Tuple[int, str]"));

    assert!(check(&Value::tuple([1, 2, 3]), "Tuple"));
    assert!(check(&Value::Tuple(Vec::new()), "tuple"));
}

#[test]
fn literal_membership_is_typed() {
    let allowed = "Literal[1, 7, 'hey']";
    assert!(check(&Value::Int(7), allowed));
    assert!(check(&Value::str("hey"), allowed));
    assert!(!check(&Value::Int(2), allowed));
    assert!(!check(&Value::str("Hey"), allowed));
    assert!(!check(&Value::Bool(true), "Literal[1]"));
    assert!(!check(&Value::Float(1.0), "Literal[1]"));
    assert!(check(&Value::None, "Literal[None, 'x']"));
}

#[test]
fn nested_unions_keep_their_structure() {
    assert!(check(&Value::list([Value::Int(1), Value::str("a")]), "List[Union[int, str]]"));
    assert!(!check(&Value::list([Value::Int(1), Value::None]), "List[Union[int, str]]"));
    assert!(check(&Value::list([Value::Int(1), Value::None]), "List[int | None]"));

    let scores = Value::dict([("a", Value::list([1, 2])), ("b", Value::None)]);
    assert!(check(&scores, "Dict[str, Optional[List[int]]]"));
    let bad = Value::dict([("a", Value::list([Value::str("1")]))]);
    assert!(!check(&bad, "Dict[str, Optional[List[int]]]"));
}

#[test]
fn type_and_custom_heads() {
    assert!(check(&Value::Type("int".into()), "Type[int]"));
    assert!(!check(&Value::Int(1), "type"));

    let custom = TypeExpr::custom("TestClass");
    let instance = Value::Instance(Instance::new("TestClass"));
    assert!(conforms(&instance, &custom, &NoopResolver).unwrap());
    assert!(!conforms(&Value::Instance(Instance::new("Other")), &custom, &NoopResolver).unwrap());
    assert!(!conforms(&Value::dict([("value", 1)]), &custom, &NoopResolver).unwrap());
}

#[test]
fn validates_with_separate_heads_and_subtypes() {
    let expr = TypeExpr::parse("List[int]").unwrap();
    let heads = normalize(&expr, &NoopResolver).unwrap();
    let subtypes = extract(&expr, &heads, &NoopResolver).unwrap();
    assert!(validate(&Value::list([1, 2]), &heads, &subtypes, &NoopResolver).unwrap());
    assert!(!validate(&Value::list(["x"]), &heads, &subtypes, &NoopResolver).unwrap());
}

#[test]
fn top_level_union_shares_unstructured_slots() {
    let expr = TypeExpr::parse("Optional[List[int]]").unwrap();
    let heads = normalize(&expr, &NoopResolver).unwrap();
    let subtypes = extract(&expr, &heads, &NoopResolver).unwrap();
    assert_eq!(subtypes, vec![SubtypeSlot::Unstructured]);
    assert!(validate(&Value::None, &heads, &subtypes, &NoopResolver).unwrap());
    assert!(validate(&Value::list(["x"]), &heads, &subtypes, &NoopResolver).unwrap());
    assert!(!validate(&Value::Int(1), &heads, &subtypes, &NoopResolver).unwrap());
}

#[test]
fn union_head_matches_member_kinds() {
    let heads = [HeadDescriptor::Union(vec![ValueKind::Int, ValueKind::Str])];
    assert!(validate(&Value::str("a"), &heads, &[], &NoopResolver).unwrap());
    assert!(!validate(&Value::None, &heads, &[], &NoopResolver).unwrap());
}

#[test]
fn malformed_slots_raise_arity_errors() {
    let any = SubtypeSlot::any();
    let err = validate(
        &Value::list([1]),
        &[HeadDescriptor::Sequence],
        &[any.clone(), any.clone()],
        &NoopResolver,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Arity);

    let err = validate(
        &Value::dict([("a", 1)]),
        &[HeadDescriptor::Mapping],
        &[any.clone(), any.clone(), any],
        &NoopResolver,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Arity);

    assert!(
        validate(
            &Value::dict([("a", 1)]),
            &[HeadDescriptor::Mapping],
            &[SubtypeSlot::Unstructured],
            &NoopResolver,
        )
        .unwrap()
    );
}

#[test]
fn forward_head_without_environment_is_an_error() {
    let err = validate(
        &Value::Int(1),
        &[HeadDescriptor::Forward("Node".into())],
        &[],
        &NoopResolver,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn nesting_is_bounded_by_max_depth() {
    let expr = TypeExpr::parse("List[List[List[int]]]").unwrap();
    let value = Value::list([Value::list([Value::list([1])])]);

    let shallow = ValidationOptions::default().with_max_depth(2);
    let err = Validator::new(&NoopResolver)
        .with_options(shallow)
        .conforms(&value, &expr)
        .unwrap_err();
    assert_eq!(err, TypeError::DepthExceeded { limit: 2 });

    let enough = ValidationOptions::default().with_max_depth(3);
    assert!(
        Validator::new(&NoopResolver)
            .with_options(enough)
            .conforms(&value, &expr)
            .unwrap()
    );
}

#[test]
fn bytes_literals_match_decoded_bytes() {
    assert!(check(&Value::Bytes(vec![0xff]), r"Literal[b'\xff']"));
    assert!(check(&Value::Bytes(b"\n".to_vec()), r"Literal[b'\n']"));
    assert!(!check(&Value::Bytes(br"\xff".to_vec()), r"Literal[b'\xff']"));
}
