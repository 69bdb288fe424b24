//! Parser state - class declarations, class expressions and class members.

use super::base::NodeIndex;
use super::node::{NodeArena, NodeFlags, Slot};
use super::node_kind::NodeKind;
use super::parse_rules::{is_property_name_start, look_ahead_is_member_modifier};
use super::state::{ParseResult, ParserState};
use flowstrip_common::diagnostics::diagnostic_messages;
use flowstrip_scanner::SyntaxKind;

impl ParserState {
    pub(crate) fn parse_class_declaration(&mut self, pos: u32) -> ParseResult<NodeIndex> {
        self.parse_class(NodeKind::ClassDeclaration, pos, false)
    }

    /// `class Name<T> extends Base<U> implements I<V>, J { members }`.
    pub(crate) fn parse_class(
        &mut self,
        kind: NodeKind,
        pos: u32,
        allow_anonymous: bool,
    ) -> ParseResult<NodeIndex> {
        self.parse_expected(SyntaxKind::ClassKeyword)?;

        let id = if self.is_identifier() && !self.is_token(SyntaxKind::ImplementsKeyword) {
            self.parse_identifier()?
        } else if allow_anonymous {
            NodeIndex::NONE
        } else {
            return Err(
                self.error_at_current_token(diagnostic_messages::IDENTIFIER_EXPECTED, &[])
            );
        };
        let type_parameters = self.parse_type_parameters_opt()?;

        let (super_class, super_type_parameters) =
            if self.parse_optional(SyntaxKind::ExtendsKeyword)? {
                let super_class = self.parse_left_hand_side_expression()?;
                (super_class, self.parse_type_arguments_opt()?)
            } else {
                (NodeIndex::NONE, NodeIndex::NONE)
            };

        let implements = self.parse_implements_clause()?;
        let body = self.parse_class_body()?;
        Ok(self.finish_node(
            kind,
            pos,
            [
                id.into(),
                type_parameters.into(),
                super_class.into(),
                super_type_parameters.into(),
                implements,
                body.into(),
            ],
        ))
    }

    /// `implements A<T>, B`; the list spans from the keyword.
    fn parse_implements_clause(&mut self) -> ParseResult<Slot> {
        if !self.is_token(SyntaxKind::ImplementsKeyword) {
            return Ok(Slot::Absent);
        }
        let list_pos = self.token_pos();
        self.next_token()?;
        let mut implements = Vec::new();
        loop {
            let pos = self.token_pos();
            let id = self.parse_identifier()?;
            let type_parameters = self.parse_type_arguments_opt()?;
            implements.push(self.finish_node(
                NodeKind::ClassImplements,
                pos,
                [id.into(), type_parameters.into()],
            ));
            if !self.parse_optional(SyntaxKind::CommaToken)? {
                break;
            }
        }
        Ok(NodeArena::list_slot(implements, list_pos, self.prev_token_end))
    }

    fn parse_class_body(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let list_pos = self.prev_token_end;
        let mut members = Vec::new();
        loop {
            match self.token() {
                SyntaxKind::CloseBraceToken => break,
                SyntaxKind::SemicolonToken => {
                    self.next_token()?;
                }
                SyntaxKind::EndOfFileToken => {
                    return Err(self.error_expected(SyntaxKind::CloseBraceToken));
                }
                _ => members.push(self.guarded(Self::parse_class_member)?),
            }
        }
        let list_end = self.token_pos();
        self.next_token()?;
        let body = NodeArena::list_slot(members, list_pos, list_end);
        Ok(self.finish_node(NodeKind::ClassBody, pos, [body]))
    }

    fn parse_class_member(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let mut flags = NodeFlags::empty();

        if self.is_token(SyntaxKind::StaticKeyword)
            && look_ahead_is_member_modifier(&mut self.scanner, false)
        {
            flags |= NodeFlags::STATIC;
            self.next_token()?;
        }

        // Variance marks only appear on property declarations.
        if matches!(self.token(), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
            let variance = self.token();
            self.next_token()?;
            return self.parse_class_property(pos, flags, variance);
        }

        if self.is_token(SyntaxKind::AsyncKeyword)
            && look_ahead_is_member_modifier(&mut self.scanner, true)
        {
            flags |= NodeFlags::ASYNC;
            self.next_token()?;
        }
        if self.parse_optional(SyntaxKind::AsteriskToken)? {
            flags |= NodeFlags::GENERATOR;
        }
        if matches!(self.token(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword)
            && !flags.intersects(NodeFlags::ASYNC | NodeFlags::GENERATOR)
            && look_ahead_is_member_modifier(&mut self.scanner, false)
        {
            flags |= if self.is_token(SyntaxKind::GetKeyword) {
                NodeFlags::GETTER
            } else {
                NodeFlags::SETTER
            };
            self.next_token()?;
        }

        if !is_property_name_start(self.token()) {
            return Err(self.error_unexpected());
        }
        let is_constructor = self.is_token(SyntaxKind::Identifier)
            && self.token_value() == "constructor"
            && !flags.contains(NodeFlags::STATIC);
        let (key, computed) = self.parse_property_name()?;
        if computed {
            flags |= NodeFlags::COMPUTED;
        }

        if matches!(
            self.token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            if is_constructor {
                flags |= NodeFlags::CONSTRUCTOR;
            }
            let value = self.parse_method_function(flags)?;
            let node = self.finish_node(NodeKind::MethodDefinition, pos, [key.into(), value.into()]);
            self.set_flags(node, flags);
            return Ok(node);
        }

        if flags.intersects(
            NodeFlags::ASYNC | NodeFlags::GENERATOR | NodeFlags::GETTER | NodeFlags::SETTER,
        ) {
            return Err(self.error_expected(SyntaxKind::OpenParenToken));
        }
        self.parse_class_property_rest(pos, flags, SyntaxKind::Unknown, key)
    }

    fn parse_class_property(
        &mut self,
        pos: u32,
        flags: NodeFlags,
        variance: SyntaxKind,
    ) -> ParseResult<NodeIndex> {
        let (key, computed) = self.parse_property_name()?;
        let flags = if computed {
            flags | NodeFlags::COMPUTED
        } else {
            flags
        };
        self.parse_class_property_rest(pos, flags, variance, key)
    }

    /// `key[: Type];` after the key. Initializers are rejected.
    fn parse_class_property_rest(
        &mut self,
        pos: u32,
        flags: NodeFlags,
        variance: SyntaxKind,
        key: NodeIndex,
    ) -> ParseResult<NodeIndex> {
        let annotation = self.parse_type_annotation_opt()?;
        if self.is_token(SyntaxKind::EqualsToken) {
            return Err(self.error_at_current_token(
                diagnostic_messages::CLASS_PROPERTY_INITIALIZER_UNSUPPORTED,
                &[],
            ));
        }
        self.parse_semicolon()?;
        let node = self.finish_node(NodeKind::ClassProperty, pos, [key.into(), annotation.into()]);
        self.set_flags(node, flags);
        self.set_token(node, variance);
        Ok(node)
    }

    /// The function part of a method: `<T>(params): R { body }`, as a
    /// `FunctionExpression` spanning from its first token.
    pub(crate) fn parse_method_function(&mut self, flags: NodeFlags) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let is_async = flags.contains(NodeFlags::ASYNC);
        let is_generator = flags.contains(NodeFlags::GENERATOR);
        let (type_parameters, params, return_type, body) =
            self.parse_function_rest(is_async, is_generator)?;
        let node = self.finish_node(
            NodeKind::FunctionExpression,
            pos,
            [
                Slot::Absent,
                type_parameters.into(),
                params,
                return_type.into(),
                body.into(),
            ],
        );
        self.set_flags(node, flags & (NodeFlags::ASYNC | NodeFlags::GENERATOR));
        Ok(node)
    }
}
