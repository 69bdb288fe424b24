use super::*;

#[test]
fn standard_table_is_valid() {
    assert_eq!(STANDARD_RULES.validate(), Ok(()));
    assert_eq!(RuleTable::default(), STANDARD_RULES);
}

#[test]
fn every_type_kind_is_deleted() {
    for &kind in NodeKind::ALL {
        let name = kind.as_str();
        if name.ends_with("TypeAnnotation") || name.starts_with("ObjectType") {
            assert_eq!(
                STANDARD_RULES.action(kind),
                StripAction::Delete,
                "{name} should be deleted"
            );
        }
    }
    assert_eq!(STANDARD_RULES.deleted_kinds().count(), DELETED_KINDS.len());
}

#[test]
fn field_strip_targets() {
    assert_eq!(
        STANDARD_RULES.action(NodeKind::Identifier),
        StripAction::StripFields(&[Field::Optional, Field::TypeAnnotation])
    );
    for kind in [NodeKind::FunctionDeclaration, NodeKind::FunctionExpression] {
        assert_eq!(
            STANDARD_RULES.action(kind),
            StripAction::StripFields(&[Field::ReturnType, Field::TypeParameters])
        );
    }
    for kind in [NodeKind::ClassDeclaration, NodeKind::ClassExpression] {
        let StripAction::StripFields(fields) = STANDARD_RULES.action(kind) else {
            panic!("{kind} should strip fields");
        };
        assert!(fields.contains(&Field::SuperTypeParameters));
        assert!(fields.contains(&Field::Implements));
    }
}

#[test]
fn ordinary_kinds_pass_through() {
    for kind in [
        NodeKind::Program,
        NodeKind::ArrowFunctionExpression,
        NodeKind::VariableDeclarator,
        NodeKind::MethodDefinition,
        NodeKind::CallExpression,
    ] {
        assert_eq!(STANDARD_RULES.action(kind), StripAction::PassThrough, "{kind}");
    }
}

#[test]
fn stripping_required_field_is_a_defect() {
    let table = RuleTable::standard().with_action(
        NodeKind::VariableDeclarator,
        StripAction::StripFields(&[Field::Id, Field::Init]),
    );
    assert_eq!(
        table.validate(),
        Err(vec![RuleDefect::RequiredField {
            kind: NodeKind::VariableDeclarator,
            field: Field::Id,
        }])
    );
}

#[test]
fn stripping_unknown_field_is_a_defect() {
    let table = RuleTable::pass_through()
        .with_action(NodeKind::Identifier, StripAction::StripFields(&[Field::Body]))
        .with_action(NodeKind::Program, StripAction::Delete);
    let defects = table.validate().expect_err("defects");
    assert_eq!(
        defects,
        vec![
            RuleDefect::RootDeleted,
            RuleDefect::UnknownField {
                kind: NodeKind::Identifier,
                field: Field::Body,
            },
        ]
    );
    assert_eq!(
        defects[1].to_string(),
        "Identifier has no field `body` to strip"
    );
}

#[test]
fn pass_through_table_deletes_nothing() {
    let table = RuleTable::pass_through();
    assert_eq!(table.deleted_kinds().count(), 0);
    assert_eq!(table.validate(), Ok(()));
}
