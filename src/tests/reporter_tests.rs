use super::*;
use flowstrip_parser::{ParseOptions, parse};

fn parse_error(source: &str) -> ParseError {
    let options = ParseOptions {
        source_file_name: Some("in.js".into()),
    };
    parse(source, &options).expect_err("should fail")
}

#[test]
fn test_plain_rendering() {
    let source = "var ok = 1;\nvar x = (y: number);\n";
    let rendered = Reporter::new(false).format_parse_error(&parse_error(source), source);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "in.js:2:11 - error FS9003: Type cast expressions are not supported."
    );
    assert_eq!(lines[1], "    2   var x = (y: number);");
    // Marker sits under the column of the error.
    assert_eq!(lines[2].find('~'), Some(8 + 10));
}

#[test]
fn test_marker_counts_utf16_columns() {
    let source = "var s = \"😀\"; var x = (y: number);";
    let err = parse_error(source);
    let rendered = Reporter::new(false).format_parse_error(&err, source);
    let marker_line = rendered.lines().nth(2).expect("snippet");
    let column = marker_line.find('~').expect("marker") - 8;
    // The emoji is two UTF-16 units but one character of padding.
    assert_eq!(column as u32, err.column - 2);
}

#[test]
fn test_error_at_end_of_text_still_renders() {
    let source = "function f(";
    let rendered = Reporter::new(false).format_parse_error(&parse_error(source), source);
    assert!(rendered.starts_with("in.js:1:"));
    assert!(rendered.contains("function f("));
}

#[test]
fn test_marker_stops_at_line_end_with_non_ascii_text() {
    let source = "ab éééé\nnext";
    let err = ParseError {
        file_name: "in.js".into(),
        pos: 3,
        length: 10,
        line: 1,
        column: 4,
        code: 1005,
        message: "';' expected.".into(),
    };
    let rendered = Reporter::new(false).format_parse_error(&err, source);
    let marker_line = rendered.lines().nth(2).expect("snippet");
    // Four characters remain after the column, though they take eight bytes.
    assert_eq!(marker_line, format!("{}~~~~", " ".repeat(8 + 3)));
}
