use super::*;
use flowstrip_parser::{ParseOptions, Path, parse};
use flowstrip_transform::{RuleTable, StripAction, transform_tree, transform_tree_with};

fn parse_source(source: &str) -> ParsedSource {
    parse(source, &ParseOptions::default()).unwrap_or_else(|err| panic!("parse failed: {err}"))
}

fn print_code(parsed: &ParsedSource) -> String {
    print(parsed, &PrintOptions::default())
        .unwrap_or_else(|err| panic!("print failed: {err}"))
        .code
}

fn strip(source: &str) -> String {
    let mut parsed = parse_source(source);
    transform_tree(&mut parsed.arena, parsed.root);
    print_code(&parsed)
}

fn statements(parsed: &ParsedSource) -> Vec<NodeIndex> {
    parsed
        .arena
        .list(parsed.root, Field::Body)
        .map(|list| list.nodes.clone())
        .unwrap_or_default()
}

#[test]
fn test_untouched_source_is_copied_exactly() {
    let source = "/* header */\nfunction  add(a,b){return a+b}\n\n\t// trailing\n";
    assert_eq!(print_code(&parse_source(source)), source);
    assert_eq!(strip(source), source);
}

#[test]
fn test_removes_annotations_without_touching_neighbours() {
    assert_eq!(
        strip("function foo(param1: bool) { return param1; }"),
        "function foo(param1) { return param1; }"
    );
    assert_eq!(strip("var myNum:?number = 42;"), "var myNum = 42;");
    assert_eq!(
        strip("function foo(param1, ...rest): void { param1(); }"),
        "function foo(param1, ...rest) { param1(); }"
    );
    assert_eq!(
        strip("var {x, y}: {x: number; y: string} = {x: 42, y: \"hello\"};"),
        "var {x, y} = {x: 42, y: \"hello\"};"
    );
}

#[test]
fn test_removes_type_parameters_and_optional_markers() {
    assert_eq!(
        strip("class Foo<T> { method1(param1) { return param1; } }"),
        "class Foo { method1(param1) { return param1; } }"
    );
    assert_eq!(strip("function f(x?: number, y?) {}"), "function f(x, y) {}");
    assert_eq!(
        strip("var f = async <T>(x: T, y?: number): Promise<T> => x;"),
        "var f = async (x, y) => x;"
    );
}

#[test]
fn test_removed_clause_takes_one_space_with_it() {
    assert_eq!(
        strip("class A extends B<T> implements C, D<T> {}"),
        "class A extends B {}"
    );
}

#[test]
fn test_words_stay_apart_after_a_cut() {
    assert_eq!(strip("class A<T>extends B {}"), "class A extends B {}");
}

#[test]
fn test_class_property_inside_one_line_body() {
    assert_eq!(strip("class Foo { prop1: T; }"), "class Foo { }");
}

#[test]
fn test_statements_alone_on_a_line_take_the_line() {
    assert_eq!(
        strip("// @flow\ntype A = number;\nvar b: A = 1;\n"),
        "// @flow\nvar b = 1;\n"
    );
    assert_eq!(
        strip("class C {\n  x: number;\n  static y: string;\n  m(): void {}\n}\n"),
        "class C {\n  m() {}\n}\n"
    );
    assert_eq!(
        strip("function f() {\n  interface I {\n    m(): void;\n  }\n  return 1;\n}"),
        "function f() {\n  return 1;\n}"
    );
}

#[test]
fn test_statements_sharing_a_line() {
    assert_eq!(strip("type A = 1; var b = 2;"), "var b = 2;");
    assert_eq!(strip("var b = 2; type A = 1;\nb;"), "var b = 2;\nb;");
    assert_eq!(strip("type A = 1; type B = 2;\nvar c;"), "var c;");
}

#[test]
fn test_crlf_lines_are_removed_whole() {
    assert_eq!(strip("type A = 1;\r\nvar b;\r\n"), "var b;\r\n");
}

#[test]
fn test_semicolon_keeps_statements_apart() {
    assert_eq!(strip("var a = b\ninterface I {}\n(c)\n"), "var a = b\n;(c)\n");
    // Nothing to guard when the previous statement is terminated.
    assert_eq!(strip("var a = b;\ninterface I {}\n(c)\n"), "var a = b;\n(c)\n");
}

#[test]
fn test_exported_and_declared_types_disappear() {
    assert_eq!(
        strip("declare var x: number;\nexport type T = number;\nexport const one: T = 1;\n"),
        "export const one = 1;\n"
    );
}

#[test]
fn test_printing_twice_gives_the_same_text() {
    let source = "class A<T> implements B {\n  x: T;\n  m(y?: T): void {}\n}\nvar z: ?number = null;\ntype C = A<number>;\n";
    let once = strip(source);
    assert_eq!(strip(&once), once);
}

#[test]
fn test_delimited_list_removal_takes_the_separator() {
    let mut parsed = parse_source("foo(a, b, c);");
    let call = parsed.arena.child(statements(&parsed)[0], Field::Expression);
    assert_eq!(
        Path::element(call, Field::Arguments, 1).delete(&mut parsed.arena),
        Ok(true)
    );
    assert_eq!(print_code(&parsed), "foo(a, c);");

    let mut parsed = parse_source("foo(a, b, c);");
    let call = parsed.arena.child(statements(&parsed)[0], Field::Expression);
    assert_eq!(
        Path::element(call, Field::Arguments, 2).delete(&mut parsed.arena),
        Ok(true)
    );
    assert_eq!(print_code(&parsed), "foo(a, b);");
}

#[test]
fn test_custom_table_prints_narrower_strip() {
    let rules = RuleTable::standard().with_action(NodeKind::ClassProperty, StripAction::PassThrough);
    let mut parsed = parse_source("class A { x: number; }");
    transform_tree_with(&mut parsed.arena, parsed.root, &rules);
    assert_eq!(print_code(&parsed), "class A { x; }");
}

#[test]
fn test_replacement_prints_the_new_node_text() {
    let mut parsed = parse_source("var a = 1, b = 2;");
    let declarators = parsed
        .arena
        .list(statements(&parsed)[0], Field::Declarations)
        .expect("declarators")
        .nodes
        .clone();
    let two = parsed.arena.child(declarators[1], Field::Init);
    assert_eq!(
        Path::field(declarators[0], Field::Init).replace(&mut parsed.arena, Some(two)),
        Ok(true)
    );
    assert_eq!(print_code(&parsed), "var a = 2, b = 2;");
}

#[test]
fn test_node_without_source_text_is_an_error() {
    let mut parsed = parse_source("var a = 1;");
    let declarator = parsed
        .arena
        .list(statements(&parsed)[0], Field::Declarations)
        .expect("declarators")
        .nodes[0];
    let synthetic = parsed.arena.add_leaf(NodeKind::Literal, 0, 0);
    Path::field(declarator, Field::Init)
        .replace(&mut parsed.arena, Some(synthetic))
        .expect("replace");

    let err = print(&parsed, &PrintOptions::default()).expect_err("no span");
    assert_eq!(err, EmitError::MissingSpan { kind: NodeKind::Literal });
}

#[test]
fn test_node_inserted_into_empty_slot_is_an_error() {
    let mut parsed = parse_source("var a; 1;");
    let statements = statements(&parsed);
    let declarator = parsed
        .arena
        .list(statements[0], Field::Declarations)
        .expect("declarators")
        .nodes[0];
    let one = parsed.arena.child(statements[1], Field::Expression);
    Path::field(declarator, Field::Init)
        .replace(&mut parsed.arena, Some(one))
        .expect("replace");

    let err = print(&parsed, &PrintOptions::default()).expect_err("inserted");
    assert_eq!(
        err,
        EmitError::InsertedNode {
            kind: NodeKind::VariableDeclarator,
            field: Field::Init,
        }
    );
    assert_eq!(
        err.to_string(),
        "cannot print VariableDeclarator.init: the slot gained a node that is not in the source"
    );
}

#[test]
fn test_map_only_when_requested() {
    let parsed = parse_source("var a;");
    assert!(print(&parsed, &PrintOptions::default()).expect("print").map.is_none());

    let options = PrintOptions {
        source_file_name: None,
        source_map_name: Some("out.js".into()),
    };
    let map = print(&parsed, &options).expect("print").map.expect("map");
    assert_eq!(map.version, 3);
    assert_eq!(map.file.as_deref(), Some("out.js"));
    assert_eq!(map.sources, vec![DEFAULT_SOURCE_FILE_NAME.to_string()]);
    assert_eq!(map.mappings, "AAAA");
}

#[test]
fn test_map_segments_follow_the_cuts() {
    let mut parsed = parse_source("var a: number = 1;\nvar b = a;\n");
    transform_tree(&mut parsed.arena, parsed.root);
    let options = PrintOptions {
        source_file_name: Some("in.js".into()),
        source_map_name: Some("out.js".into()),
    };
    let result = print(&parsed, &options).expect("print");
    assert_eq!(result.code, "var a = 1;\nvar b = a;\n");
    let map = result.map.expect("map");
    assert_eq!(map.sources, vec!["in.js".to_string()]);
    // "var " | "a" | " = 1" (from column 13) | ";" | newline, then line 2.
    assert_eq!(map.mappings, "AAAA,IAAI,CAAS,IAAI,CAAC;AAClB");
}
