//! Node-kind rule table.
//!
//! Stripping is data-driven: every `NodeKind` maps to exactly one
//! `StripAction`. Adding a new type-only kind is a one-line entry in
//! `DELETED_KINDS`; no traversal code changes.

use flowstrip_parser::{Field, FieldShape, NodeKind};

/// What the traversal does with a node of a given kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StripAction {
    /// Remove the node from its parent slot. Its subtree is not visited.
    Delete,
    /// Keep the node, clear the listed fields, then visit what remains.
    StripFields(&'static [Field]),
    /// Keep the node and visit every field.
    PassThrough,
}

/// Kinds that carry no runtime meaning.
const DELETED_KINDS: &[NodeKind] = &[
    // Declarations
    NodeKind::ClassImplements,
    NodeKind::ClassProperty,
    NodeKind::InterfaceDeclaration,
    NodeKind::InterfaceExtends,
    NodeKind::TypeAlias,
    NodeKind::DeclareVariable,
    NodeKind::DeclareFunction,
    NodeKind::DeclareClass,
    NodeKind::DeclareModule,
    // Annotation wrappers
    NodeKind::TypeAnnotation,
    NodeKind::OptionalMarker,
    NodeKind::TypeParameterDeclaration,
    NodeKind::TypeParameter,
    NodeKind::TypeParameterInstantiation,
    // Types
    NodeKind::AnyTypeAnnotation,
    NodeKind::MixedTypeAnnotation,
    NodeKind::VoidTypeAnnotation,
    NodeKind::NumberTypeAnnotation,
    NodeKind::StringTypeAnnotation,
    NodeKind::BooleanTypeAnnotation,
    NodeKind::NullLiteralTypeAnnotation,
    NodeKind::StringLiteralTypeAnnotation,
    NodeKind::NumberLiteralTypeAnnotation,
    NodeKind::BooleanLiteralTypeAnnotation,
    NodeKind::NullableTypeAnnotation,
    NodeKind::ArrayTypeAnnotation,
    NodeKind::TupleTypeAnnotation,
    NodeKind::UnionTypeAnnotation,
    NodeKind::IntersectionTypeAnnotation,
    NodeKind::TypeofTypeAnnotation,
    NodeKind::ExistsTypeAnnotation,
    NodeKind::GenericTypeAnnotation,
    NodeKind::QualifiedTypeIdentifier,
    NodeKind::FunctionTypeAnnotation,
    NodeKind::FunctionTypeParam,
    NodeKind::ObjectTypeAnnotation,
    NodeKind::ObjectTypeProperty,
    NodeKind::ObjectTypeIndexer,
    NodeKind::ObjectTypeCallProperty,
];

const IDENTIFIER_FIELDS: &[Field] = &[Field::Optional, Field::TypeAnnotation];
const FUNCTION_FIELDS: &[Field] = &[Field::ReturnType, Field::TypeParameters];
const CLASS_FIELDS: &[Field] = &[
    Field::TypeParameters,
    Field::SuperTypeParameters,
    Field::Implements,
];
const PATTERN_FIELDS: &[Field] = &[Field::TypeAnnotation];

/// The table used by `transform_tree`.
pub static STANDARD_RULES: RuleTable = RuleTable::standard();

/// A total mapping from node kind to strip action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleTable {
    actions: [StripAction; NodeKind::COUNT],
}

impl RuleTable {
    /// A table that changes nothing.
    pub const fn pass_through() -> RuleTable {
        RuleTable {
            actions: [StripAction::PassThrough; NodeKind::COUNT],
        }
    }

    /// The standard Flow stripping rules.
    pub const fn standard() -> RuleTable {
        let mut table = RuleTable::pass_through();
        let mut i = 0;
        while i < DELETED_KINDS.len() {
            table = table.with_action(DELETED_KINDS[i], StripAction::Delete);
            i += 1;
        }
        table
            .with_action(NodeKind::Identifier, StripAction::StripFields(IDENTIFIER_FIELDS))
            .with_action(NodeKind::FunctionDeclaration, StripAction::StripFields(FUNCTION_FIELDS))
            .with_action(NodeKind::FunctionExpression, StripAction::StripFields(FUNCTION_FIELDS))
            .with_action(NodeKind::ClassDeclaration, StripAction::StripFields(CLASS_FIELDS))
            .with_action(NodeKind::ClassExpression, StripAction::StripFields(CLASS_FIELDS))
            .with_action(NodeKind::ArrayPattern, StripAction::StripFields(PATTERN_FIELDS))
            .with_action(NodeKind::ObjectPattern, StripAction::StripFields(PATTERN_FIELDS))
    }

    /// The same table with `kind` mapped to `action`.
    #[must_use]
    pub const fn with_action(mut self, kind: NodeKind, action: StripAction) -> RuleTable {
        self.actions[kind as usize] = action;
        self
    }

    #[inline]
    pub const fn action(&self, kind: NodeKind) -> StripAction {
        self.actions[kind as usize]
    }

    /// Kinds mapped to `Delete`, in declaration order.
    pub fn deleted_kinds(&self) -> impl Iterator<Item = NodeKind> + '_ {
        NodeKind::ALL
            .iter()
            .copied()
            .filter(|&kind| self.action(kind) == StripAction::Delete)
    }

    /// Check that every field-strip target is an optional field of its kind
    /// and that the tree root can never be deleted.
    pub fn validate(&self) -> Result<(), Vec<RuleDefect>> {
        let mut defects = Vec::new();
        if self.action(NodeKind::Program) == StripAction::Delete {
            defects.push(RuleDefect::RootDeleted);
        }
        for &kind in NodeKind::ALL {
            let StripAction::StripFields(fields) = self.action(kind) else {
                continue;
            };
            for &field in fields {
                match kind.field_spec(field) {
                    None => defects.push(RuleDefect::UnknownField { kind, field }),
                    Some(spec) if !spec.optional || spec.shape == FieldShape::Block => {
                        defects.push(RuleDefect::RequiredField { kind, field });
                    }
                    Some(_) => {}
                }
            }
        }
        if defects.is_empty() {
            Ok(())
        } else {
            Err(defects)
        }
    }
}

impl Default for RuleTable {
    fn default() -> RuleTable {
        RuleTable::standard()
    }
}

/// A rule that would leave the tree malformed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuleDefect {
    #[error("{kind} has no field `{field}` to strip")]
    UnknownField { kind: NodeKind, field: Field },
    #[error("field `{field}` of {kind} is required and cannot be stripped")]
    RequiredField { kind: NodeKind, field: Field },
    #[error("Program is the tree root and cannot be deleted")]
    RootDeleted,
}

#[cfg(test)]
#[path = "tests/rules_tests.rs"]
mod rules_tests;
