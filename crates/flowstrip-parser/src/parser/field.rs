//! Field names and per-kind field schemas.
//!
//! Every `NodeKind` declares its fields in source order. The schema drives the
//! slot layout in the arena, traversal order, printing, and rule validation.

use serde::Serialize;

macro_rules! fields {
    ($($variant:ident => $name:literal,)+) => {
        /// A named field of a node.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum Field {
            $($variant,)+
        }

        impl Field {
            /// The ESTree spelling of the field name.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Field::$variant => $name,)+
                }
            }
        }
    };
}

fields! {
    Alternate => "alternate",
    Argument => "argument",
    Arguments => "arguments",
    Block => "block",
    Body => "body",
    Bound => "bound",
    Callee => "callee",
    Cases => "cases",
    Consequent => "consequent",
    Declaration => "declaration",
    Declarations => "declarations",
    Default => "default",
    Discriminant => "discriminant",
    Elements => "elements",
    ElementType => "elementType",
    Exported => "exported",
    Expression => "expression",
    Expressions => "expressions",
    Extends => "extends",
    Finalizer => "finalizer",
    Handler => "handler",
    Id => "id",
    Implements => "implements",
    Imported => "imported",
    Init => "init",
    Key => "key",
    Label => "label",
    Left => "left",
    Local => "local",
    Name => "name",
    Object => "object",
    Optional => "optional",
    Param => "param",
    Params => "params",
    Properties => "properties",
    Property => "property",
    Qualification => "qualification",
    Quasi => "quasi",
    Quasis => "quasis",
    Rest => "rest",
    ReturnType => "returnType",
    Right => "right",
    Source => "source",
    Specifiers => "specifiers",
    SuperClass => "superClass",
    SuperTypeParameters => "superTypeParameters",
    Tag => "tag",
    Test => "test",
    TypeAnnotation => "typeAnnotation",
    TypeParameters => "typeParameters",
    Types => "types",
    Update => "update",
    Value => "value",
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a field slot holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FieldShape {
    /// A single child node.
    Node,
    /// A separator-delimited sequence (`,`, `|`, `&`, `;`).
    List,
    /// An undelimited sequence of statements or class members.
    Block,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub field: Field,
    pub shape: FieldShape,
    /// Optional fields may be absent without making the parent malformed.
    pub optional: bool,
}

impl FieldSpec {
    #[inline]
    pub const fn is_sequence(&self) -> bool {
        !matches!(self.shape, FieldShape::Node)
    }
}

/// A required single-node field.
pub(crate) const fn node(field: Field) -> FieldSpec {
    FieldSpec {
        field,
        shape: FieldShape::Node,
        optional: false,
    }
}

/// An optional single-node field.
pub(crate) const fn opt(field: Field) -> FieldSpec {
    FieldSpec {
        field,
        shape: FieldShape::Node,
        optional: true,
    }
}

/// A delimited list that is always present (possibly empty).
pub(crate) const fn list(field: Field) -> FieldSpec {
    FieldSpec {
        field,
        shape: FieldShape::List,
        optional: false,
    }
}

/// A delimited list whose whole clause may be absent (`implements ...`).
pub(crate) const fn opt_list(field: Field) -> FieldSpec {
    FieldSpec {
        field,
        shape: FieldShape::List,
        optional: true,
    }
}

/// A statement or member sequence.
pub(crate) const fn block(field: Field) -> FieldSpec {
    FieldSpec {
        field,
        shape: FieldShape::Block,
        optional: false,
    }
}
