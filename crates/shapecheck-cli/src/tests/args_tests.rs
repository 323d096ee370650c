use super::args::{ArrayKindArg, CliArgs, Command};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn parses_check_with_inline_value() {
    let args = CliArgs::try_parse_from([
        "shapecheck",
        "check",
        "--type",
        "List[int]",
        "--value",
        "[1, 2]",
        "--explain",
    ])
    .expect("check args should parse");

    let Command::Check(check) = args.command else {
        panic!("expected check subcommand");
    };
    assert_eq!(check.type_expr, "List[int]");
    assert_eq!(check.value.as_deref(), Some("[1, 2]"));
    assert!(check.explain);
    assert_eq!(check.array_kind, ArrayKindArg::List);
    assert!(!args.no_color);
}

#[test]
fn parses_check_with_value_file_and_config() {
    let args = CliArgs::try_parse_from([
        "shapecheck",
        "--no-color",
        "check",
        "-t",
        "Point",
        "--value-file",
        "point.json",
        "-c",
        "conf",
        "--array-kind",
        "tuple",
    ])
    .expect("check args should parse");

    assert!(args.no_color);
    let Command::Check(check) = args.command else {
        panic!("expected check subcommand");
    };
    assert_eq!(check.value, None);
    assert_eq!(check.value_file, Some(PathBuf::from("point.json")));
    assert_eq!(check.config, Some(PathBuf::from("conf")));
    assert_eq!(check.array_kind, ArrayKindArg::Tuple);
}

#[test]
fn check_requires_exactly_one_value_source() {
    assert!(CliArgs::try_parse_from(["shapecheck", "check", "-t", "int"]).is_err());
    assert!(
        CliArgs::try_parse_from([
            "shapecheck",
            "check",
            "-t",
            "int",
            "--value",
            "1",
            "--value-file",
            "v.json",
        ])
        .is_err()
    );
}

#[test]
fn parses_describe() {
    let args = CliArgs::try_parse_from(["shapecheck", "describe", "-t", "Optional[str]", "--json"])
        .expect("describe args should parse");
    let Command::Describe(describe) = args.command else {
        panic!("expected describe subcommand");
    };
    assert_eq!(describe.type_expr, "Optional[str]");
    assert!(describe.json);
    assert_eq!(describe.config, None);
}

#[test]
fn rejects_unknown_array_kind() {
    assert!(
        CliArgs::try_parse_from([
            "shapecheck",
            "check",
            "-t",
            "int",
            "--value",
            "1",
            "--array-kind",
            "deque",
        ])
        .is_err()
    );
}
