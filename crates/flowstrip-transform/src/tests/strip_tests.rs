use super::*;
use flowstrip_parser::{ParseOptions, ParsedSource, parse};

fn parse_source(source: &str) -> ParsedSource {
    parse(source, &ParseOptions::default()).unwrap_or_else(|err| panic!("parse failed: {err}"))
}

fn strip(source: &str) -> (ParsedSource, StripStats) {
    let mut parsed = parse_source(source);
    let stats = transform_tree(&mut parsed.arena, parsed.root);
    (parsed, stats)
}

fn statements(parsed: &ParsedSource) -> Vec<NodeIndex> {
    parsed
        .arena
        .list(parsed.root, Field::Body)
        .map(|list| list.nodes.clone())
        .unwrap_or_default()
}

#[test]
fn strips_identifier_annotation() {
    let (parsed, stats) = strip("var a: number = 1;");
    assert_eq!(
        stats,
        StripStats {
            nodes_visited: 5,
            nodes_deleted: 0,
            fields_cleared: 1,
        }
    );
    let declarator = parsed
        .arena
        .list(statements(&parsed)[0], Field::Declarations)
        .expect("declarations")
        .nodes[0];
    let id = parsed.arena.child(declarator, Field::Id);
    assert!(parsed.arena.child(id, Field::TypeAnnotation).is_none());
    assert!(parsed.arena.is_modified(id));
    assert!(!parsed.arena.is_dirty(parsed.arena.child(declarator, Field::Init)));
}

#[test]
fn deletes_type_declarations_from_statement_lists() {
    let (parsed, stats) = strip(
        "type A = number;\nvar b;\ninterface I { x: number }\ndeclare var c: string;\n",
    );
    assert_eq!(stats.nodes_deleted, 3);
    let remaining = statements(&parsed);
    assert_eq!(remaining.len(), 1);
    assert_eq!(
        parsed.arena.kind(remaining[0]),
        Some(NodeKind::VariableDeclaration)
    );
}

#[test]
fn strips_functions_and_descends_into_bodies() {
    let (parsed, _) = strip(
        "function outer<T>(x?: T, ...rest: Array<T>): T {\n  function inner(y: number): void {}\n  return x;\n}",
    );
    let outer = statements(&parsed)[0];
    assert!(parsed.arena.child(outer, Field::TypeParameters).is_none());
    assert!(parsed.arena.child(outer, Field::ReturnType).is_none());

    let params = parsed.arena.list(outer, Field::Params).expect("params").nodes.clone();
    assert!(parsed.arena.child(params[0], Field::Optional).is_none());
    let rest_argument = parsed.arena.child(params[1], Field::Argument);
    assert!(parsed.arena.child(rest_argument, Field::TypeAnnotation).is_none());

    let body = parsed.arena.child(outer, Field::Body);
    let inner = parsed.arena.list(body, Field::Body).expect("body").nodes[0];
    assert!(parsed.arena.child(inner, Field::ReturnType).is_none());
}

#[test]
fn strips_class_type_syntax() {
    let (parsed, stats) = strip(
        "class Foo<T> extends Bar<T> implements Baz {\n  prop: T;\n  static count: number;\n  method<U>(u: U): T { return this.prop; }\n}",
    );
    let class = statements(&parsed)[0];
    assert!(parsed.arena.child(class, Field::TypeParameters).is_none());
    assert!(parsed.arena.child(class, Field::SuperTypeParameters).is_none());
    assert!(parsed.arena.list(class, Field::Implements).is_none());
    assert!(parsed.arena.child(class, Field::SuperClass).is_some());

    let body = parsed.arena.child(class, Field::Body);
    let members = parsed.arena.list(body, Field::Body).expect("members").nodes.clone();
    assert_eq!(members.len(), 1);
    let method = parsed.arena.child(members[0], Field::Value);
    assert!(parsed.arena.child(method, Field::TypeParameters).is_none());
    assert!(parsed.arena.child(method, Field::ReturnType).is_none());
    assert_eq!(stats.nodes_deleted, 2);
}

#[test]
fn arrow_type_syntax_is_reached_through_descent() {
    let (parsed, _) = strip("var f = <T>(x: T): T => x;");
    let declarator = parsed
        .arena
        .list(statements(&parsed)[0], Field::Declarations)
        .expect("declarations")
        .nodes[0];
    let arrow = parsed.arena.child(declarator, Field::Init);
    assert_eq!(parsed.arena.kind(arrow), Some(NodeKind::ArrowFunctionExpression));
    assert!(parsed.arena.child(arrow, Field::TypeParameters).is_none());
    assert!(parsed.arena.child(arrow, Field::ReturnType).is_none());
    // The arrow itself is only changed in the slots that held types.
    assert!(parsed.arena.child(arrow, Field::Body).is_some());
}

#[test]
fn no_type_kind_survives() {
    let source = "\
// @flow
import x from 'x';
export type Id = string | number;
export interface Named { name: string }
declare module M { declare function f(): void; }
declare class D<+T> { static make(): D<T>; }
var {a, b}: {a: number, b: ?string} = x;
var [c, d]: [number, string] = [1, 'one'];
function g({e}: {e: Array<number>}, [f]: number[] = [], ...rest: Array<mixed>): Promise<void> {}
var o = { m<T>(t: T): T { return t; }, get v(): number { return 1; } };
var K = class<T> extends Base<T> implements I<T> { p: T; };
var h = async (i: number, j?: string): Promise<void> => {};
for (var k: number of []) {}
try {} catch (err) {}
";
    let (parsed, stats) = strip(source);
    assert!(stats.changed());
    for node in parsed.arena.descendants(parsed.root) {
        let kind = parsed.arena.kind(node).expect("live node");
        assert_ne!(
            STANDARD_RULES.action(kind),
            StripAction::Delete,
            "{kind} survived stripping"
        );
        if let StripAction::StripFields(fields) = STANDARD_RULES.action(kind) {
            for &field in fields {
                assert!(
                    matches!(parsed.arena.slot(node, field), Some(Slot::Absent)),
                    "{kind}.{field} survived stripping"
                );
            }
        }
    }
}

#[test]
fn second_pass_changes_nothing() {
    let (mut parsed, first) = strip(
        "class A<T> implements B { x: T; m(y?: T): void {} }\nvar z: ?number = null;\ntype C = A<number>;",
    );
    assert!(first.changed());
    let before = parsed.arena.to_json(parsed.root);

    let second = transform_tree(&mut parsed.arena, parsed.root);
    assert!(!second.changed());
    assert_eq!(second.nodes_deleted, 0);
    assert_eq!(second.fields_cleared, 0);
    assert_eq!(parsed.arena.to_json(parsed.root), before);
}

#[test]
fn untyped_input_is_left_untouched() {
    let (parsed, stats) = strip(
        "function add(a, b) { return a + b; }\nclass P extends Q { m() { return [1, , 2]; } }\nvar type = 1, interface_ = type;",
    );
    assert!(!stats.changed());
    assert!(!parsed.arena.is_dirty(parsed.root));
    assert!(parsed.arena.descendants(parsed.root).iter().all(|&node| parsed.arena.original_slots(node).is_none()));
}

#[test]
fn custom_table_narrows_the_strip() {
    let rules = RuleTable::standard()
        .with_action(NodeKind::ClassProperty, StripAction::PassThrough);
    let mut parsed = parse_source("class A { x: number; }");
    let stats = transform_tree_with(&mut parsed.arena, parsed.root, &rules);

    let class = statements(&parsed)[0];
    let body = parsed.arena.child(class, Field::Body);
    let members = parsed.arena.list(body, Field::Body).expect("members").nodes.clone();
    assert_eq!(members.len(), 1);
    assert_eq!(parsed.arena.kind(members[0]), Some(NodeKind::ClassProperty));
    // Its annotation is still a deleted kind.
    assert!(parsed.arena.child(members[0], Field::TypeAnnotation).is_none());
    assert_eq!(stats.nodes_deleted, 1);
}

#[test]
fn pass_through_table_changes_nothing() {
    let mut parsed = parse_source("var a: number = 1; type T = string;");
    let stats = transform_tree_with(&mut parsed.arena, parsed.root, &RuleTable::pass_through());
    assert!(!stats.changed());
    assert_eq!(stats.nodes_visited, parsed.arena.descendants(parsed.root).len());
    assert!(!parsed.arena.is_dirty(parsed.root));
}

#[test]
fn root_delete_rule_is_ignored() {
    let rules = RuleTable::standard().with_action(NodeKind::Program, StripAction::Delete);
    let mut parsed = parse_source("type T = string;");
    let stats = transform_tree_with(&mut parsed.arena, parsed.root, &rules);
    assert_eq!(stats, StripStats::default());
    assert_eq!(statements(&parsed).len(), 1);
}

#[test]
fn deep_trees_do_not_overflow_the_stack() {
    let depth = 200_000;
    let mut arena = NodeArena::new();
    let any = arena.add_leaf(NodeKind::AnyTypeAnnotation, 0, 0);
    let annotation = arena.add_node(NodeKind::TypeAnnotation, 0, 0, [Slot::Node(any)]);
    let id = arena.add_node(
        NodeKind::Identifier,
        0,
        0,
        [Slot::Absent, Slot::Node(annotation)],
    );
    let mut node = arena.add_node(NodeKind::ExpressionStatement, 0, 0, [Slot::Node(id)]);
    for _ in 0..depth {
        node = arena.add_node(
            NodeKind::BlockStatement,
            0,
            0,
            [NodeArena::list_slot(vec![node], 0, 0)],
        );
    }
    let root = arena.add_node(
        NodeKind::Program,
        0,
        0,
        [NodeArena::list_slot(vec![node], 0, 0)],
    );

    let stats = transform_tree(&mut arena, root);
    assert_eq!(stats.fields_cleared, 1);
    assert_eq!(stats.nodes_visited, depth + 3);
    assert!(arena.child(id, Field::TypeAnnotation).is_none());
    assert!(arena.is_dirty(root));
}
