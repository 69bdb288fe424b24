//! The closed set of node kinds and their field schemas.
//!
//! Kind names and field names follow ESTree as extended by Flow. Fields are
//! listed in source order; that order is the traversal order.

use super::field::{Field, FieldSpec, block, list, node, opt, opt_list};
use serde::Serialize;

macro_rules! node_kinds {
    ($($kind:ident => [$($shape:ident $field:ident),* $(,)?],)+) => {
        /// Node kind tag.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[repr(u8)]
        pub enum NodeKind {
            $($kind,)+
        }

        impl NodeKind {
            /// Every kind, in declaration order (`ALL[k as usize] == k`).
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$kind,)+];
            pub const COUNT: usize = Self::ALL.len();

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(NodeKind::$kind => stringify!($kind),)+
                }
            }

            /// Fields of this kind in source order.
            pub const fn schema(self) -> &'static [FieldSpec] {
                match self {
                    $(NodeKind::$kind => {
                        const SCHEMA: &[FieldSpec] = &[$($shape(Field::$field)),*];
                        SCHEMA
                    })+
                }
            }
        }
    };
}

node_kinds! {
    Program => [block Body],

    // Statements
    ExpressionStatement => [node Expression],
    BlockStatement => [block Body],
    EmptyStatement => [],
    DebuggerStatement => [],
    WithStatement => [node Object, node Body],
    ReturnStatement => [opt Argument],
    LabeledStatement => [node Label, node Body],
    BreakStatement => [opt Label],
    ContinueStatement => [opt Label],
    IfStatement => [node Test, node Consequent, opt Alternate],
    SwitchStatement => [node Discriminant, block Cases],
    SwitchCase => [opt Test, block Consequent],
    ThrowStatement => [node Argument],
    TryStatement => [node Block, opt Handler, opt Finalizer],
    CatchClause => [node Param, node Body],
    WhileStatement => [node Test, node Body],
    DoWhileStatement => [node Body, node Test],
    ForStatement => [opt Init, opt Test, opt Update, node Body],
    ForInStatement => [node Left, node Right, node Body],
    ForOfStatement => [node Left, node Right, node Body],

    // Declarations
    FunctionDeclaration => [opt Id, opt TypeParameters, list Params, opt ReturnType, node Body],
    VariableDeclaration => [list Declarations],
    VariableDeclarator => [node Id, opt Init],
    ClassDeclaration => [
        opt Id, opt TypeParameters, opt SuperClass, opt SuperTypeParameters,
        opt_list Implements, node Body,
    ],

    // Expressions
    ThisExpression => [],
    Super => [],
    ArrayExpression => [list Elements],
    ObjectExpression => [list Properties],
    Property => [opt Key, node Value],
    FunctionExpression => [opt Id, opt TypeParameters, list Params, opt ReturnType, node Body],
    ArrowFunctionExpression => [opt TypeParameters, list Params, opt ReturnType, node Body],
    ClassExpression => [
        opt Id, opt TypeParameters, opt SuperClass, opt SuperTypeParameters,
        opt_list Implements, node Body,
    ],
    ClassBody => [block Body],
    MethodDefinition => [node Key, node Value],
    ClassProperty => [node Key, opt TypeAnnotation],
    ClassImplements => [node Id, opt TypeParameters],
    TemplateLiteral => [list Quasis, list Expressions],
    TemplateElement => [],
    TaggedTemplateExpression => [node Tag, node Quasi],
    SequenceExpression => [list Expressions],
    UnaryExpression => [node Argument],
    BinaryExpression => [node Left, node Right],
    LogicalExpression => [node Left, node Right],
    AssignmentExpression => [node Left, node Right],
    UpdateExpression => [node Argument],
    ConditionalExpression => [node Test, node Consequent, node Alternate],
    CallExpression => [node Callee, list Arguments],
    NewExpression => [node Callee, opt_list Arguments],
    MemberExpression => [node Object, node Property],
    SpreadElement => [node Argument],
    YieldExpression => [opt Argument],
    AwaitExpression => [node Argument],
    Identifier => [opt Optional, opt TypeAnnotation],
    Literal => [],

    // Patterns
    ObjectPattern => [list Properties, opt TypeAnnotation],
    ArrayPattern => [list Elements, opt TypeAnnotation],
    AssignmentPattern => [node Left, node Right],
    RestElement => [node Argument],

    // Modules
    ImportDeclaration => [opt_list Specifiers, node Source],
    ImportSpecifier => [opt Imported, node Local],
    ImportDefaultSpecifier => [node Local],
    ImportNamespaceSpecifier => [node Local],
    ExportNamedDeclaration => [opt Declaration, opt_list Specifiers, opt Source],
    ExportSpecifier => [node Local, opt Exported],
    ExportDefaultDeclaration => [node Declaration],
    ExportAllDeclaration => [node Source],

    // Flow type syntax
    TypeAnnotation => [node TypeAnnotation],
    OptionalMarker => [],
    TypeParameterDeclaration => [list Params],
    TypeParameter => [opt Bound, opt Default],
    TypeParameterInstantiation => [list Params],
    AnyTypeAnnotation => [],
    MixedTypeAnnotation => [],
    VoidTypeAnnotation => [],
    NumberTypeAnnotation => [],
    StringTypeAnnotation => [],
    BooleanTypeAnnotation => [],
    NullLiteralTypeAnnotation => [],
    StringLiteralTypeAnnotation => [],
    NumberLiteralTypeAnnotation => [],
    BooleanLiteralTypeAnnotation => [],
    NullableTypeAnnotation => [node TypeAnnotation],
    ArrayTypeAnnotation => [node ElementType],
    TupleTypeAnnotation => [list Types],
    UnionTypeAnnotation => [list Types],
    IntersectionTypeAnnotation => [list Types],
    TypeofTypeAnnotation => [node Argument],
    ExistsTypeAnnotation => [],
    GenericTypeAnnotation => [node Id, opt TypeParameters],
    QualifiedTypeIdentifier => [node Qualification, node Id],
    FunctionTypeAnnotation => [opt TypeParameters, list Params, opt Rest, node ReturnType],
    FunctionTypeParam => [opt Name, node TypeAnnotation],
    ObjectTypeAnnotation => [list Properties],
    ObjectTypeProperty => [node Key, node Value],
    ObjectTypeIndexer => [opt Id, node Key, node Value],
    ObjectTypeCallProperty => [node Value],
    InterfaceDeclaration => [node Id, opt TypeParameters, opt_list Extends, node Body],
    InterfaceExtends => [node Id, opt TypeParameters],
    TypeAlias => [node Id, opt TypeParameters, node Right],
    DeclareVariable => [node Id],
    DeclareFunction => [node Id],
    DeclareClass => [node Id, opt TypeParameters, opt_list Extends, node Body],
    DeclareModule => [node Id, node Body],
}

impl NodeKind {
    /// Schema entry for `field`, if this kind has it.
    pub fn field_spec(self, field: Field) -> Option<&'static FieldSpec> {
        self.schema().iter().find(|spec| spec.field == field)
    }

    /// Slot offset of `field` within this kind's slot run.
    pub fn field_index(self, field: Field) -> Option<usize> {
        self.schema().iter().position(|spec| spec.field == field)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
