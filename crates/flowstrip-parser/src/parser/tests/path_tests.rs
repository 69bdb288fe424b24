use crate::parser::{
    Field, ModifiedFlags, NodeArena, NodeIndex, NodeKind, ParserState, Path, PathError,
    PathValue, Slot,
};

fn parse_arena(source: &str) -> (NodeArena, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser
        .parse_source_file()
        .unwrap_or_else(|err| panic!("unexpected parse error: {err}"));
    (parser.into_arena(), root)
}

fn first_statement(arena: &NodeArena, root: NodeIndex) -> NodeIndex {
    arena.list(root, Field::Body).expect("program body").nodes[0]
}

fn declarators(arena: &NodeArena, declaration: NodeIndex) -> Vec<NodeIndex> {
    arena
        .list(declaration, Field::Declarations)
        .expect("declarations")
        .nodes
        .clone()
}

#[test]
fn test_path_of_derives_location_from_parent_table() {
    let (arena, root) = parse_arena("var a: number = 1, b = 2;");
    let declaration = first_statement(&arena, root);
    let [first, second] = declarators(&arena, declaration)[..] else {
        panic!("expected two declarators");
    };

    assert_eq!(Path::of(&arena, root), Path::Root(root));
    assert_eq!(
        Path::of(&arena, declaration),
        Path::element(root, Field::Body, 0)
    );
    assert_eq!(
        Path::of(&arena, second),
        Path::element(declaration, Field::Declarations, 1)
    );

    let id = arena.child(first, Field::Id);
    let annotation = arena.child(id, Field::TypeAnnotation);
    let path = Path::of(&arena, annotation);
    assert_eq!(path, Path::field(id, Field::TypeAnnotation));
    assert_eq!(path.parent(), Some(id));
    assert_eq!(path.node(&arena), Some(annotation));
    assert_eq!(Path::Root(root).parent(), None);
}

#[test]
fn test_get_reports_absent_node_and_list_values() {
    let (arena, root) = parse_arena("var a, b = [1, , 3];");
    let declaration = first_statement(&arena, root);
    let [first, second] = declarators(&arena, declaration)[..] else {
        panic!("expected two declarators");
    };

    assert_eq!(
        Path::field(first, Field::Init).get(&arena),
        Ok(PathValue::Absent)
    );
    assert!(!Path::field(first, Field::Init).is_populated(&arena));

    let array = arena.child(second, Field::Init);
    assert_eq!(
        Path::field(second, Field::Init).get(&arena),
        Ok(PathValue::Node(array))
    );
    match Path::field(array, Field::Elements).get(&arena) {
        Ok(PathValue::List(list)) => assert_eq!(list.len(), 3),
        other => panic!("expected a list, got {other:?}"),
    }
    // Array holes read as absent elements.
    assert_eq!(
        Path::element(array, Field::Elements, 1).get(&arena),
        Ok(PathValue::Absent)
    );
}

#[test]
fn test_delete_field_records_modification_and_snapshot() {
    let (mut arena, root) = parse_arena("var a: number = 1;");
    let declaration = first_statement(&arena, root);
    let declarator = declarators(&arena, declaration)[0];
    let id = arena.child(declarator, Field::Id);
    let annotation = arena.child(id, Field::TypeAnnotation);

    assert!(!arena.is_dirty(root));
    let path = Path::field(id, Field::TypeAnnotation);
    assert_eq!(path.delete(&mut arena), Ok(true));

    assert!(arena.child(id, Field::TypeAnnotation).is_none());
    assert!(arena.is_modified(id));
    assert_eq!(
        arena.modified_flags(declarator),
        ModifiedFlags::SUBTREE_MODIFIED
    );
    assert!(arena.is_dirty(declaration));
    assert!(arena.is_dirty(root));
    assert!(!arena.is_dirty(arena.child(declarator, Field::Init)));

    // The pre-mutation slots stay available to the printer.
    let original = arena.original_slots(id).expect("snapshot");
    assert!(original.contains(&Slot::Node(annotation)));
}

#[test]
fn test_deleting_absent_field_is_a_no_op() {
    let (mut arena, root) = parse_arena("var a = 1;");
    let declaration = first_statement(&arena, root);
    let id = arena.child(declarators(&arena, declaration)[0], Field::Id);

    let path = Path::field(id, Field::TypeAnnotation);
    assert_eq!(path.delete(&mut arena), Ok(false));
    assert!(!arena.is_dirty(root));
    assert!(arena.original_slots(id).is_none());
}

#[test]
fn test_delete_is_idempotent() {
    let (mut arena, root) = parse_arena("function f(x?: number): void {}");
    let function = first_statement(&arena, root);
    let param = arena.list(function, Field::Params).expect("params").nodes[0];

    let optional = Path::field(param, Field::Optional);
    assert_eq!(optional.delete(&mut arena), Ok(true));
    assert_eq!(optional.delete(&mut arena), Ok(false));

    let return_type = Path::field(function, Field::ReturnType);
    assert_eq!(return_type.delete(&mut arena), Ok(true));
    assert_eq!(return_type.delete(&mut arena), Ok(false));
}

#[test]
fn test_delete_list_element_splices() {
    let (mut arena, root) = parse_arena("type A = number;\nvar a = 1;\ntype B = string;\n");
    assert_eq!(Path::element(root, Field::Body, 2).delete(&mut arena), Ok(true));
    assert_eq!(Path::element(root, Field::Body, 0).delete(&mut arena), Ok(true));

    let body = arena.list(root, Field::Body).expect("body");
    assert_eq!(body.len(), 1);
    assert_eq!(arena.kind(body.nodes[0]), Some(NodeKind::VariableDeclaration));
    // The list keeps its source span.
    assert_eq!(body.pos, 0);
    assert!(arena.is_modified(root));
}

#[test]
fn test_clear_whole_list_field() {
    let (mut arena, root) = parse_arena("class A implements B, C {}");
    let class = first_statement(&arena, root);
    let path = Path::field(class, Field::Implements);
    assert!(path.is_populated(&arena));
    assert_eq!(path.delete(&mut arena), Ok(true));
    assert!(arena.list(class, Field::Implements).is_none());
    assert!(!path.is_populated(&arena));
}

#[test]
fn test_replace_reparents_node() {
    let (mut arena, root) = parse_arena("var a = 1, b = 2;");
    let declaration = first_statement(&arena, root);
    let [first, second] = declarators(&arena, declaration)[..] else {
        panic!("expected two declarators");
    };
    let second_init = arena.child(second, Field::Init);

    let path = Path::field(first, Field::Init);
    assert_eq!(path.replace(&mut arena, Some(second_init)), Ok(true));
    assert_eq!(arena.child(first, Field::Init), second_init);
    assert_eq!(arena.parent(second_init), first);
    assert_eq!(Path::of(&arena, second_init), path);
    // Writing the same value again changes nothing.
    assert_eq!(path.replace(&mut arena, Some(second_init)), Ok(false));
}

#[test]
fn test_invalid_paths_are_rejected() {
    let (mut arena, root) = parse_arena("var a = 1;");
    let declaration = first_statement(&arena, root);
    let id = arena.child(declarators(&arena, declaration)[0], Field::Id);

    assert_eq!(Path::root(root).delete(&mut arena), Err(PathError::Root));
    assert_eq!(
        Path::field(id, Field::Body).get(&arena),
        Err(PathError::UnknownField {
            kind: NodeKind::Identifier,
            field: Field::Body,
        })
    );
    assert_eq!(
        Path::field(declaration, Field::Declarations).replace(&mut arena, Some(id)),
        Err(PathError::ListField {
            kind: NodeKind::VariableDeclaration,
            field: Field::Declarations,
        })
    );
    assert_eq!(
        Path::element(declaration, Field::Declarations, 5).delete(&mut arena),
        Err(PathError::IndexOutOfBounds {
            kind: NodeKind::VariableDeclaration,
            field: Field::Declarations,
            index: 5,
        })
    );
    assert_eq!(
        Path::element(id, Field::TypeAnnotation, 0).get(&arena),
        Err(PathError::NotAList {
            kind: NodeKind::Identifier,
            field: Field::TypeAnnotation,
        })
    );
    assert_eq!(
        Path::field(NodeIndex(9999), Field::Id).get(&arena),
        Err(PathError::MissingNode(NodeIndex(9999)))
    );
    assert!(!arena.is_dirty(root));
}

#[test]
fn test_child_and_children() {
    let (arena, root) = parse_arena("var a = 1;\nvar b;");
    let root_path = Path::root(root);

    let body = root_path.child(&arena, Field::Body).expect("body path");
    assert_eq!(body, Path::field(root, Field::Body));
    assert!(matches!(body.get(&arena), Ok(PathValue::List(list)) if list.len() == 2));
    assert_eq!(
        body.child(&arena, Field::Id),
        Err(PathError::NotANode)
    );

    let children = root_path.children(&arena).expect("children");
    assert_eq!(
        children,
        vec![
            Path::element(root, Field::Body, 0),
            Path::element(root, Field::Body, 1),
        ]
    );

    let second = children[1].node(&arena).expect("statement");
    let declarator = declarators(&arena, second)[0];
    let fields = Path::of(&arena, declarator)
        .children(&arena)
        .expect("declarator children");
    assert_eq!(
        fields,
        vec![
            Path::field(declarator, Field::Id),
            Path::field(declarator, Field::Init),
        ]
    );
    assert!(!fields[1].is_populated(&arena));
}
