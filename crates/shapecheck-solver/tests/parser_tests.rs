use crate::{Builtin, ErrorKind, LiteralValue, Origin, TypeError, TypeExpr, parse_type_expr};

fn parse(source: &str) -> TypeExpr {
    parse_type_expr(source).unwrap_or_else(|err| panic!("parse `{source}`: {err}"))
}

#[test]
fn parses_builtin_handles() {
    assert_eq!(parse("int"), TypeExpr::INT);
    assert_eq!(parse("None"), TypeExpr::NONE);
    assert_eq!(parse("NoneType"), TypeExpr::NONE);
    assert_eq!(parse("Any"), TypeExpr::ANY);
    assert_eq!(parse("List"), TypeExpr::Builtin(Builtin::List));
    assert_eq!(parse("dict"), TypeExpr::Builtin(Builtin::Dict));
}

#[test]
fn parses_nested_generics() {
    assert_eq!(
        parse("Dict[str, List[int]]"),
        TypeExpr::dict(TypeExpr::STR, TypeExpr::list(TypeExpr::INT))
    );
    assert_eq!(
        parse("Tuple[int, str, bytes,]"),
        TypeExpr::tuple(vec![TypeExpr::INT, TypeExpr::STR, TypeExpr::BYTES])
    );
}

#[test]
fn quoted_names_are_forward_references() {
    assert_eq!(
        parse("Optional['Node']"),
        TypeExpr::optional(TypeExpr::forward("Node"))
    );
    assert_eq!(parse("\"Node\""), TypeExpr::forward("Node"));
}

#[test]
fn other_identifiers_stay_symbolic() {
    assert_eq!(parse("TestClass"), TypeExpr::name("TestClass"));
    assert_eq!(
        parse("Callable[int]"),
        TypeExpr::generic(Origin::Other("Callable".into()), vec![TypeExpr::INT])
    );
}

#[test]
fn strips_typing_prefix() {
    assert_eq!(
        parse("typing.Dict[str, typing.Any]"),
        TypeExpr::dict(TypeExpr::STR, TypeExpr::ANY)
    );
}

#[test]
fn parses_literal_constants() {
    assert_eq!(
        parse("Literal[1, -2, 'a', b'x', True, None]"),
        TypeExpr::Literal(vec![
            LiteralValue::Int(1),
            LiteralValue::Int(-2),
            LiteralValue::Str("a".into()),
            LiteralValue::Bytes(b"x".to_vec()),
            LiteralValue::Bool(true),
            LiteralValue::None,
        ])
    );
}

#[test]
fn bar_builds_union() {
    assert_eq!(
        parse("int | str | None"),
        TypeExpr::union(vec![TypeExpr::INT, TypeExpr::STR, TypeExpr::NONE])
    );
}

#[test]
fn bare_special_forms_have_no_arguments() {
    assert_eq!(parse("Union"), TypeExpr::union(Vec::new()));
    assert_eq!(parse("Literal"), TypeExpr::Literal(Vec::new()));
}

#[test]
fn reports_syntax_errors_with_offset() {
    let err = parse_type_expr("List[int").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert!(matches!(err, TypeError::Syntax { offset: 8, .. }), "{err:?}");

    for source in ["List[]", "1", "List[int]]", "Literal[float]", ""] {
        let err = parse_type_expr(source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax, "{source}");
    }
}

#[test]
fn display_round_trips() {
    for source in [
        "Dict[str, List[int]]",
        "Optional['Node']",
        "Literal[1, 'a', None]",
        "Union[int, str]",
        "Tuple[int, bytes]",
    ] {
        assert_eq!(parse(source).to_string(), source);
    }
}

#[test]
fn bytes_literals_round_trip_through_display() {
    for (source, bytes) in [
        (r"Literal[b'\n']", vec![b'\n']),
        (r"Literal[b'\xff']", vec![0xff]),
        (r"Literal[b'a\x00\'z']", vec![b'a', 0, b'\'', b'z']),
    ] {
        let expr = parse(source);
        assert_eq!(expr, TypeExpr::Literal(vec![LiteralValue::Bytes(bytes)]));
        let rendered = expr.to_string();
        assert_eq!(parse(&rendered), expr, "`{rendered}` should parse back");
    }
    assert_eq!(parse(r"Literal[b'\n']").to_string(), r"Literal[b'\x0a']");
}

#[test]
fn rejects_malformed_bytes_literals() {
    let err = parse_type_expr(r"Literal[b'\xz1']").unwrap_err();
    assert!(matches!(err, TypeError::Syntax { offset: 10, .. }));
    assert_eq!(parse_type_expr("Literal[b'caf\u{e9}']").unwrap_err().kind(), ErrorKind::Syntax);
}
