//! Parser state - Flow type annotations, type parameters and object types.

use super::base::NodeIndex;
use super::node::{NodeArena, NodeFlags, Slot};
use super::node_kind::NodeKind;
use super::parse_rules::look_ahead_is_named_type_param;
use super::state::{ParseResult, ParserState};
use flowstrip_common::diagnostics::diagnostic_messages;
use flowstrip_scanner::SyntaxKind;

/// How a function type introduces its return type.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ReturnSeparator {
    /// `(x: A) => R` in type position.
    Arrow,
    /// `(x: A): R` for methods, call properties and `declare function`.
    Colon,
}

impl ParserState {
    // =========================================================================
    // Annotations
    // =========================================================================

    /// `: Type` if the current token is a colon.
    pub(crate) fn parse_type_annotation_opt(&mut self) -> ParseResult<NodeIndex> {
        if !self.is_token(SyntaxKind::ColonToken) {
            return Ok(NodeIndex::NONE);
        }
        let pos = self.token_pos();
        self.next_token()?;
        let ty = self.parse_type()?;
        Ok(self.finish_node(NodeKind::TypeAnnotation, pos, [ty.into()]))
    }

    pub(crate) fn parse_type(&mut self) -> ParseResult<NodeIndex> {
        self.guarded(Self::parse_union_type)
    }

    fn parse_union_type(&mut self) -> ParseResult<NodeIndex> {
        self.parse_type_list(
            SyntaxKind::BarToken,
            NodeKind::UnionTypeAnnotation,
            Self::parse_intersection_type,
        )
    }

    fn parse_intersection_type(&mut self) -> ParseResult<NodeIndex> {
        self.parse_type_list(
            SyntaxKind::AmpersandToken,
            NodeKind::IntersectionTypeAnnotation,
            Self::parse_prefix_type,
        )
    }

    /// `[sep] A sep B sep C`; a single member is returned as is.
    fn parse_type_list(
        &mut self,
        separator: SyntaxKind,
        kind: NodeKind,
        parse_member: fn(&mut Self) -> ParseResult<NodeIndex>,
    ) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_optional(separator)?;
        let first = parse_member(self)?;
        if !self.is_separator_before_type(separator) {
            return Ok(first);
        }
        let mut types = vec![first];
        while self.is_separator_before_type(separator) {
            self.next_token()?;
            types.push(parse_member(self)?);
        }
        let list = NodeArena::list_slot(types, pos, self.prev_token_end);
        Ok(self.finish_node(kind, pos, [list]))
    }

    /// `|` that continues a union, as opposed to the `|}` closing an exact
    /// object type.
    fn is_separator_before_type(&mut self, separator: SyntaxKind) -> bool {
        self.is_token(separator) && self.look_ahead_is(|token| token != SyntaxKind::CloseBraceToken)
    }

    fn parse_prefix_type(&mut self) -> ParseResult<NodeIndex> {
        if !self.is_token(SyntaxKind::QuestionToken) {
            return self.parse_postfix_type();
        }
        let pos = self.token_pos();
        self.next_token()?;
        let inner = self.guarded(Self::parse_prefix_type)?;
        Ok(self.finish_node(NodeKind::NullableTypeAnnotation, pos, [inner.into()]))
    }

    /// `T[]`, `T[][]`. The brackets must stay on the type's line.
    fn parse_postfix_type(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let mut ty = self.parse_primary_type()?;
        while self.is_token(SyntaxKind::OpenBracketToken)
            && !self.has_preceding_line_break()
            && self.look_ahead_is(|token| token == SyntaxKind::CloseBracketToken)
        {
            self.next_token()?;
            self.next_token()?;
            ty = self.finish_node(NodeKind::ArrayTypeAnnotation, pos, [ty.into()]);
        }
        Ok(ty)
    }

    fn parse_primary_type(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::OpenParenToken => self.parse_parenthesized_or_function_type(),
            SyntaxKind::LessThanToken => self.parse_function_type(pos, ReturnSeparator::Arrow),
            SyntaxKind::OpenBraceToken => self.parse_object_type(false),
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            SyntaxKind::TypeOfKeyword => {
                self.next_token()?;
                let argument = self.guarded(Self::parse_primary_type)?;
                Ok(self.finish_node(NodeKind::TypeofTypeAnnotation, pos, [argument.into()]))
            }
            SyntaxKind::AsteriskToken => self.parse_keyword_type(NodeKind::ExistsTypeAnnotation),
            SyntaxKind::StringLiteral => {
                self.parse_keyword_type(NodeKind::StringLiteralTypeAnnotation)
            }
            SyntaxKind::NumericLiteral => {
                self.parse_keyword_type(NodeKind::NumberLiteralTypeAnnotation)
            }
            SyntaxKind::MinusToken
                if self.look_ahead_is(|token| token == SyntaxKind::NumericLiteral) =>
            {
                self.next_token()?;
                self.parse_keyword_type(NodeKind::NumberLiteralTypeAnnotation)
                    .map(|node| self.extend_to(node, pos))
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                self.parse_keyword_type(NodeKind::BooleanLiteralTypeAnnotation)
            }
            SyntaxKind::NullKeyword => self.parse_keyword_type(NodeKind::NullLiteralTypeAnnotation),
            SyntaxKind::VoidKeyword => self.parse_keyword_type(NodeKind::VoidTypeAnnotation),
            token if token.is_identifier_like() => {
                let primitive = if self.look_ahead_is(|next| next == SyntaxKind::DotToken) {
                    None
                } else {
                    primitive_type_kind(self.token_value())
                };
                match primitive {
                    Some(kind) => self.parse_keyword_type(kind),
                    None => self.parse_generic_type(),
                }
            }
            _ => Err(self.error_at_current_token(diagnostic_messages::TYPE_EXPECTED, &[])),
        }
    }

    /// Single-token type; the token is kept for literal types.
    fn parse_keyword_type(&mut self, kind: NodeKind) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let token = self.token();
        self.next_token()?;
        let node = self.finish_leaf(kind, pos);
        self.set_token(node, token);
        Ok(node)
    }

    /// Move a node's start back to `pos` (the `-` of a negative literal).
    fn extend_to(&mut self, node: NodeIndex, pos: u32) -> NodeIndex {
        if let Some(header) = self.arena.get_mut(node) {
            header.pos = pos;
        }
        node
    }

    /// `A.B.C<T>`.
    fn parse_generic_type(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let id = self.parse_qualified_type_name()?;
        let type_parameters = self.parse_type_arguments_opt()?;
        Ok(self.finish_node(
            NodeKind::GenericTypeAnnotation,
            pos,
            [id.into(), type_parameters.into()],
        ))
    }

    /// `A` or `A.B.C` as an `Identifier` / `QualifiedTypeIdentifier` chain.
    pub(crate) fn parse_qualified_type_name(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let mut name = self.parse_identifier()?;
        while self.parse_optional(SyntaxKind::DotToken)? {
            let id = self.parse_identifier_name()?;
            name = self.finish_node(
                NodeKind::QualifiedTypeIdentifier,
                pos,
                [name.into(), id.into()],
            );
        }
        Ok(name)
    }

    fn parse_tuple_type(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let mut types = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken) {
            types.push(self.parse_type()?);
            if !self.is_token(SyntaxKind::CloseBracketToken) {
                self.parse_expected(SyntaxKind::CommaToken)?;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        let list = NodeArena::list_slot(types, pos, self.prev_token_end);
        Ok(self.finish_node(NodeKind::TupleTypeAnnotation, pos, [list]))
    }

    // =========================================================================
    // Function types
    // =========================================================================

    /// At `(` in type position: either a function type or a parenthesized
    /// type. `(A) => B` is a function type with one unnamed parameter.
    fn parse_parenthesized_or_function_type(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        if self.look_ahead_is_function_type_params() {
            return self.parse_function_type(pos, ReturnSeparator::Arrow);
        }

        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let inner_pos = self.token_pos();
        let inner = self.parse_type()?;
        let is_function = self.is_token(SyntaxKind::CommaToken)
            || (self.is_token(SyntaxKind::CloseParenToken)
                && self.look_ahead_is(|token| token == SyntaxKind::EqualsGreaterThanToken));
        if !is_function {
            self.parse_expected(SyntaxKind::CloseParenToken)?;
            return Ok(inner);
        }

        let first = self.finish_node(
            NodeKind::FunctionTypeParam,
            inner_pos,
            [Slot::Absent, inner.into()],
        );
        self.parse_optional(SyntaxKind::CommaToken)?;
        let (params, rest) = self.parse_function_type_params_rest(pos, vec![first])?;
        self.finish_function_type(pos, NodeIndex::NONE, params, rest, ReturnSeparator::Arrow)
    }

    /// `()`, `(...`, `(name:` and `(name?` open a parameter list.
    fn look_ahead_is_function_type_params(&mut self) -> bool {
        let snapshot = self.scanner.save_state();
        let first = self.scanner.scan();
        let result = match first {
            SyntaxKind::CloseParenToken | SyntaxKind::DotDotDotToken => true,
            token if token.is_identifier_or_keyword() => {
                look_ahead_is_named_type_param(&mut self.scanner)
            }
            _ => false,
        };
        self.scanner.restore_state(snapshot);
        result
    }

    fn parse_function_type(
        &mut self,
        pos: u32,
        separator: ReturnSeparator,
    ) -> ParseResult<NodeIndex> {
        let type_parameters = self.parse_type_parameters_opt()?;
        let list_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let (params, rest) = self.parse_function_type_params_rest(list_pos, Vec::new())?;
        self.finish_function_type(pos, type_parameters, params, rest, separator)
    }

    /// `<T>(params): R` following a method or function name.
    pub(crate) fn parse_function_type_after_name(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_function_type(pos, ReturnSeparator::Colon)
    }

    fn finish_function_type(
        &mut self,
        pos: u32,
        type_parameters: NodeIndex,
        params: Slot,
        rest: NodeIndex,
        separator: ReturnSeparator,
    ) -> ParseResult<NodeIndex> {
        match separator {
            ReturnSeparator::Arrow => self.parse_expected(SyntaxKind::EqualsGreaterThanToken)?,
            ReturnSeparator::Colon => self.parse_expected(SyntaxKind::ColonToken)?,
        }
        let return_type = self.parse_type()?;
        Ok(self.finish_node(
            NodeKind::FunctionTypeAnnotation,
            pos,
            [type_parameters.into(), params, rest.into(), return_type.into()],
        ))
    }

    /// Remaining parameters after the opening `(` (and any already parsed
    /// ones), through the closing `)`.
    fn parse_function_type_params_rest(
        &mut self,
        list_pos: u32,
        mut params: Vec<NodeIndex>,
    ) -> ParseResult<(Slot, NodeIndex)> {
        let mut rest = NodeIndex::NONE;
        while !self.is_token(SyntaxKind::CloseParenToken) {
            if self.is_token(SyntaxKind::DotDotDotToken) {
                let pos = self.token_pos();
                self.next_token()?;
                rest = self.parse_function_type_param(pos)?;
                self.parse_optional(SyntaxKind::CommaToken)?;
                break;
            }
            let pos = self.token_pos();
            params.push(self.parse_function_type_param(pos)?);
            if !self.is_token(SyntaxKind::CloseParenToken) {
                self.parse_expected(SyntaxKind::CommaToken)?;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok((NodeArena::list_slot(params, list_pos, self.prev_token_end), rest))
    }

    /// `name: T`, `name?: T` or a bare `T`.
    fn parse_function_type_param(&mut self, pos: u32) -> ParseResult<NodeIndex> {
        let named = self.token().is_identifier_or_keyword()
            && look_ahead_is_named_type_param(&mut self.scanner);
        if !named {
            let ty = self.parse_type()?;
            return Ok(self.finish_node(NodeKind::FunctionTypeParam, pos, [Slot::Absent, ty.into()]));
        }
        let name = self.parse_identifier_name()?;
        let optional = self.parse_optional(SyntaxKind::QuestionToken)?;
        self.parse_expected(SyntaxKind::ColonToken)?;
        let ty = self.parse_type()?;
        let node = self.finish_node(NodeKind::FunctionTypeParam, pos, [name.into(), ty.into()]);
        if optional {
            self.set_flags(node, NodeFlags::OPTIONAL);
        }
        Ok(node)
    }

    // =========================================================================
    // Type parameters and arguments
    // =========================================================================

    /// `<+T: Bound = Default, U>` if the current token is `<`.
    pub(crate) fn parse_type_parameters_opt(&mut self) -> ParseResult<NodeIndex> {
        if !self.is_token(SyntaxKind::LessThanToken) {
            return Ok(NodeIndex::NONE);
        }
        let pos = self.token_pos();
        self.next_token()?;
        let mut params = Vec::new();
        while !self.is_token(SyntaxKind::GreaterThanToken) {
            params.push(self.parse_type_parameter()?);
            if !self.is_token(SyntaxKind::GreaterThanToken) {
                self.parse_expected(SyntaxKind::CommaToken)?;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken)?;
        let list = NodeArena::list_slot(params, pos, self.prev_token_end);
        Ok(self.finish_node(NodeKind::TypeParameterDeclaration, pos, [list]))
    }

    fn parse_type_parameter(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let variance = if matches!(self.token(), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
            let token = self.token();
            self.next_token()?;
            token
        } else {
            SyntaxKind::Unknown
        };
        if !self.is_identifier() {
            return Err(
                self.error_at_current_token(diagnostic_messages::IDENTIFIER_EXPECTED, &[])
            );
        }
        let atom = self.scanner.get_token_atom();
        self.next_token()?;
        let bound = self.parse_type_annotation_opt()?;
        let default = if self.parse_optional(SyntaxKind::EqualsToken)? {
            self.parse_type()?
        } else {
            NodeIndex::NONE
        };
        let node = self.finish_node(NodeKind::TypeParameter, pos, [bound.into(), default.into()]);
        if let Some(header) = self.arena.get_mut(node) {
            header.atom = atom;
            header.token = variance;
        }
        Ok(node)
    }

    /// `<A, B>` if the current token is `<`.
    pub(crate) fn parse_type_arguments_opt(&mut self) -> ParseResult<NodeIndex> {
        if !self.is_token(SyntaxKind::LessThanToken) {
            return Ok(NodeIndex::NONE);
        }
        let pos = self.token_pos();
        self.next_token()?;
        let mut params = Vec::new();
        while !self.is_token(SyntaxKind::GreaterThanToken) {
            params.push(self.parse_type()?);
            if !self.is_token(SyntaxKind::GreaterThanToken) {
                self.parse_expected(SyntaxKind::CommaToken)?;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken)?;
        let list = NodeArena::list_slot(params, pos, self.prev_token_end);
        Ok(self.finish_node(NodeKind::TypeParameterInstantiation, pos, [list]))
    }

    // =========================================================================
    // Object types
    // =========================================================================

    /// `{ a: T, b?: U; m(): V, [k: K]: V, (x: A): R }`, or the exact form
    /// `{| ... |}`. `static` members are accepted in declared class bodies.
    pub(crate) fn parse_object_type(&mut self, allow_static: bool) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let exact = self.parse_optional(SyntaxKind::BarToken)?;
        let mut members = Vec::new();
        loop {
            let closing = if exact {
                self.is_token(SyntaxKind::BarToken)
            } else {
                self.is_token(SyntaxKind::CloseBraceToken)
            };
            if closing {
                break;
            }
            if self.is_token(SyntaxKind::EndOfFileToken) {
                return Err(self.error_expected(SyntaxKind::CloseBraceToken));
            }
            members.push(self.guarded(|p| p.parse_object_type_member(allow_static))?);
            if !self.parse_optional(SyntaxKind::CommaToken)? {
                self.parse_optional(SyntaxKind::SemicolonToken)?;
            }
        }
        if exact {
            self.parse_expected(SyntaxKind::BarToken)?;
        }
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        let list = NodeArena::list_slot(members, pos, self.prev_token_end);
        Ok(self.finish_node(NodeKind::ObjectTypeAnnotation, pos, [list]))
    }

    fn parse_object_type_member(&mut self, allow_static: bool) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let mut flags = NodeFlags::empty();
        if allow_static
            && self.is_token(SyntaxKind::StaticKeyword)
            && self.look_ahead_is(|token| {
                !matches!(
                    token,
                    SyntaxKind::OpenParenToken
                        | SyntaxKind::LessThanToken
                        | SyntaxKind::ColonToken
                        | SyntaxKind::QuestionToken
                )
            })
        {
            flags |= NodeFlags::STATIC;
            self.next_token()?;
        }
        let variance = if matches!(self.token(), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
            let token = self.token();
            self.next_token()?;
            token
        } else {
            SyntaxKind::Unknown
        };

        let node = match self.token() {
            SyntaxKind::OpenBracketToken => self.parse_object_type_indexer(pos)?,
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken => {
                let value = self.parse_function_type_after_name()?;
                self.finish_node(NodeKind::ObjectTypeCallProperty, pos, [value.into()])
            }
            _ => {
                let key = match self.token() {
                    SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => self.parse_literal()?,
                    _ => self.parse_identifier_name()?,
                };
                if self.parse_optional(SyntaxKind::QuestionToken)? {
                    flags |= NodeFlags::OPTIONAL;
                }
                if matches!(
                    self.token(),
                    SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
                ) {
                    flags |= NodeFlags::METHOD;
                    let value = self.parse_function_type_after_name()?;
                    self.finish_node(NodeKind::ObjectTypeProperty, pos, [key.into(), value.into()])
                } else {
                    self.parse_expected(SyntaxKind::ColonToken)?;
                    let value = self.parse_type()?;
                    self.finish_node(NodeKind::ObjectTypeProperty, pos, [key.into(), value.into()])
                }
            }
        };
        self.set_flags(node, flags);
        self.set_token(node, variance);
        Ok(node)
    }

    /// `[K]: V` or `[name: K]: V`.
    fn parse_object_type_indexer(&mut self, pos: u32) -> ParseResult<NodeIndex> {
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let id = if self.token().is_identifier_or_keyword()
            && self.look_ahead_is(|token| token == SyntaxKind::ColonToken)
        {
            let id = self.parse_identifier_name()?;
            self.parse_expected(SyntaxKind::ColonToken)?;
            id
        } else {
            NodeIndex::NONE
        };
        let key = self.parse_type()?;
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        self.parse_expected(SyntaxKind::ColonToken)?;
        let value = self.parse_type()?;
        Ok(self.finish_node(
            NodeKind::ObjectTypeIndexer,
            pos,
            [id.into(), key.into(), value.into()],
        ))
    }
}

/// Builtin type names that get a node kind of their own.
fn primitive_type_kind(name: &str) -> Option<NodeKind> {
    Some(match name {
        "any" => NodeKind::AnyTypeAnnotation,
        "mixed" => NodeKind::MixedTypeAnnotation,
        "number" => NodeKind::NumberTypeAnnotation,
        "string" => NodeKind::StringTypeAnnotation,
        "boolean" | "bool" => NodeKind::BooleanTypeAnnotation,
        _ => return None,
    })
}
