//! Public parsing entry point.

use flowstrip_parser::{DEFAULT_SOURCE_FILE_NAME, Field, NodeKind, ParseOptions, parse};

#[test]
fn parse_keeps_source_and_file_name() {
    let options = ParseOptions {
        source_file_name: Some("src/app.js".to_string()),
    };
    let parsed = parse("var a: number = 1;\n", &options).expect("parse");
    assert_eq!(parsed.source_text(), "var a: number = 1;\n");
    assert_eq!(parsed.source_file_name(), Some("src/app.js"));
    assert_eq!(parsed.arena.kind(parsed.root), Some(NodeKind::Program));
    assert_eq!(
        parsed.arena.list(parsed.root, Field::Body).map(|list| list.len()),
        Some(1)
    );
}

#[test]
fn parse_errors_name_the_default_file() {
    let err = parse("var x = (y: number);", &ParseOptions::default()).expect_err("type cast");
    assert_eq!(err.file_name, DEFAULT_SOURCE_FILE_NAME);
    assert!(
        err.to_string().starts_with("source.js:1:11: "),
        "unexpected message: {err}"
    );
}

#[test]
fn parse_empty_source() {
    let parsed = parse("", &ParseOptions::default()).expect("parse");
    assert_eq!(parsed.source_file_name(), None);
    let program = parsed.arena.get(parsed.root).expect("root");
    assert_eq!((program.pos, program.end), (0, 0));
    assert_eq!(
        parsed.arena.list(parsed.root, Field::Body).map(|list| list.len()),
        Some(0)
    );
}

#[test]
fn parsed_trees_are_independent() {
    let first = parse("type A = number;", &ParseOptions::default()).expect("parse");
    let second = parse("type A = number;", &ParseOptions::default()).expect("parse");
    assert_eq!(
        first.arena.to_json(first.root),
        second.arena.to_json(second.root)
    );
}
