//! Every mapping points from a generated character to the same character in
//! the source.

use flowstrip_emitter::{PrintOptions, SourceMap, print, vlq};
use flowstrip_parser::{ParseOptions, parse};
use flowstrip_transform::transform_tree;

#[derive(Debug, PartialEq, Eq)]
struct Segment {
    generated_line: usize,
    generated_column: usize,
    original_line: usize,
    original_column: usize,
}

fn decode_mappings(mappings: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let (mut source, mut original_line, mut original_column) = (0i64, 0i64, 0i64);
    for (generated_line, line) in mappings.split(';').enumerate() {
        let mut generated_column = 0i64;
        for segment in line.split(',').filter(|segment| !segment.is_empty()) {
            let mut fields = Vec::new();
            let mut rest = segment;
            while !rest.is_empty() {
                let (value, consumed) = vlq::decode(rest).expect("valid VLQ");
                fields.push(i64::from(value));
                rest = &rest[consumed..];
            }
            assert_eq!(fields.len(), 4, "segment {segment:?}");
            generated_column += fields[0];
            source += fields[1];
            original_line += fields[2];
            original_column += fields[3];
            assert_eq!(source, 0);
            segments.push(Segment {
                generated_line,
                generated_column: generated_column as usize,
                original_line: original_line as usize,
                original_column: original_column as usize,
            });
        }
    }
    segments
}

/// Character at a zero-based line and UTF-16 column.
fn char_at(text: &str, line: usize, column: usize) -> Option<char> {
    let line = text.split('\n').nth(line)?;
    let mut units = 0;
    for c in line.chars() {
        if units == column {
            return Some(c);
        }
        units += c.len_utf16();
    }
    None
}

fn strip_with_map(source: &str) -> (String, SourceMap) {
    let mut parsed = parse(source, &ParseOptions::default()).expect("parse");
    transform_tree(&mut parsed.arena, parsed.root);
    let options = PrintOptions {
        source_file_name: Some("input.js".into()),
        source_map_name: Some("input.out.js".into()),
    };
    let result = print(&parsed, &options).expect("print");
    (result.code, result.map.expect("map requested"))
}

fn assert_mappings_point_at_same_text(source: &str) {
    let (code, map) = strip_with_map(source);
    let segments = decode_mappings(&map.mappings);
    assert!(!segments.is_empty());
    for segment in &segments {
        let generated = char_at(&code, segment.generated_line, segment.generated_column);
        let original = char_at(source, segment.original_line, segment.original_column);
        assert_eq!(generated, original, "{segment:?} in {code:?}");
    }
}

#[test]
fn map_header() {
    let (_, map) = strip_with_map("var a: number = 1;");
    assert_eq!(map.version, 3);
    assert_eq!(map.file.as_deref(), Some("input.out.js"));
    assert_eq!(map.sources, vec!["input.js".to_string()]);
    assert!(map.names.is_empty());
}

#[test]
fn mappings_for_annotations() {
    assert_mappings_point_at_same_text(
        "function foo(param1: bool, x?: string): void {\n  return param1;\n}\nfoo(1);\n",
    );
}

#[test]
fn mappings_across_removed_lines() {
    assert_mappings_point_at_same_text(
        "// @flow\ntype A = number;\ninterface I {\n  m(): void;\n}\nvar b: A = 1;\nclass C<T> implements I {\n  x: T;\n  m() {}\n}\n",
    );
}

#[test]
fn mappings_with_wide_characters() {
    assert_mappings_point_at_same_text("var s: string = \"😀é\"; var t: number = 2;\nvar u = s;\n");
}

#[test]
fn every_output_line_is_mapped() {
    let (code, map) = strip_with_map("type A = 1;\nvar a: A = 1;\nvar b = 2;\n\nvar c = 3;\n");
    assert_eq!(code, "var a = 1;\nvar b = 2;\n\nvar c = 3;\n");
    let segments = decode_mappings(&map.mappings);
    for line in [0, 1, 3] {
        let first = segments
            .iter()
            .find(|segment| segment.generated_line == line)
            .unwrap_or_else(|| panic!("line {line} unmapped"));
        assert_eq!(first.generated_column, 0);
        assert_eq!(first.original_line, line + 1);
    }
}
