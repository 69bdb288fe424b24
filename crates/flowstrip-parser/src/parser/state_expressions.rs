//! Parser state - expression, literal and binding pattern parsing methods.

use super::base::NodeIndex;
use super::field::Field;
use super::node::{NodeArena, NodeFlags, Slot};
use super::node_kind::NodeKind;
use super::parse_rules::{
    ParenFollow, is_property_name_start, look_ahead_is_member_modifier, look_ahead_is_on_same_line,
    look_ahead_paren_follow,
};
use super::state::{
    CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_DISALLOW_IN, CONTEXT_FLAG_GENERATOR,
    CONTEXT_FLAG_IN_CONDITIONAL_TRUE, ParseResult, ParserState,
};
use super::state_statements::function_context;
use flowstrip_common::diagnostics::diagnostic_messages;
use flowstrip_scanner::SyntaxKind;

/// Everything of an arrow function before its body.
struct ArrowHead {
    is_async: bool,
    type_parameters: NodeIndex,
    params: Slot,
    return_type: NodeIndex,
}

impl ParserState {
    /// Expression, including the comma operator.
    pub(crate) fn parse_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let first = self.parse_assignment_expression()?;
        if !self.is_token(SyntaxKind::CommaToken) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.parse_optional(SyntaxKind::CommaToken)? {
            expressions.push(self.parse_assignment_expression()?);
        }
        let list = NodeArena::list_slot(expressions, pos, self.prev_token_end);
        Ok(self.finish_node(NodeKind::SequenceExpression, pos, [list]))
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> ParseResult<NodeIndex> {
        self.guarded(Self::parse_assignment_expression_worker)
    }

    /// Nested expressions never see `CONTEXT_FLAG_IN_CONDITIONAL_TRUE`; it is
    /// handed on only to the tail positions of this expression.
    fn parse_assignment_expression_worker(&mut self) -> ParseResult<NodeIndex> {
        let tail = self.context_flags & CONTEXT_FLAG_IN_CONDITIONAL_TRUE;
        self.with_context(0, CONTEXT_FLAG_IN_CONDITIONAL_TRUE, |p| {
            p.parse_assignment_expression_rest(tail)
        })
    }

    fn parse_assignment_expression_rest(&mut self, tail: u32) -> ParseResult<NodeIndex> {
        if self.is_token(SyntaxKind::YieldKeyword) && self.in_context(CONTEXT_FLAG_GENERATOR) {
            return self.parse_yield_expression();
        }
        if let Some(arrow) = self.parse_arrow_function_opt(tail)? {
            return Ok(arrow);
        }

        let pos = self.token_pos();
        let left = self.parse_conditional_expression(tail)?;
        let operator = self.token();
        if !operator.is_assignment_operator() {
            return Ok(left);
        }

        let target = if operator == SyntaxKind::EqualsToken {
            self.to_assignment_target(left)?
        } else if matches!(
            self.node_kind(left),
            Some(NodeKind::Identifier | NodeKind::MemberExpression)
        ) {
            left
        } else {
            return Err(self.invalid_assignment_target(left));
        };
        self.next_token()?;
        let right = self.with_context(tail, 0, Self::parse_assignment_expression)?;
        let node = self.finish_node(
            NodeKind::AssignmentExpression,
            pos,
            [target.into(), right.into()],
        );
        self.set_token(node, operator);
        Ok(node)
    }

    fn parse_yield_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;
        let mut delegate = false;
        let argument = if self.has_preceding_line_break() {
            NodeIndex::NONE
        } else if self.parse_optional(SyntaxKind::AsteriskToken)? {
            delegate = true;
            self.parse_assignment_expression()?
        } else if self.can_start_yield_argument() {
            self.parse_assignment_expression()?
        } else {
            NodeIndex::NONE
        };
        let node = self.finish_node(NodeKind::YieldExpression, pos, [argument.into()]);
        if delegate {
            self.set_flags(node, NodeFlags::DELEGATE);
        }
        Ok(node)
    }

    fn can_start_yield_argument(&self) -> bool {
        !matches!(
            self.token(),
            SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::CommaToken
                | SyntaxKind::ColonToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::EndOfFileToken
        ) && !(self.is_token(SyntaxKind::InKeyword) && self.in_context(CONTEXT_FLAG_DISALLOW_IN))
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    /// Parse an arrow function if one starts here. The head is parsed
    /// speculatively; on failure nothing is consumed.
    ///
    /// `tail` is `CONTEXT_FLAG_IN_CONDITIONAL_TRUE` when this expression ends
    /// a conditional's consequent; `(b): c => d` is then not an arrow, so
    /// `a ? (b) : c => d` keeps its `:`.
    fn parse_arrow_function_opt(&mut self, tail: u32) -> ParseResult<Option<NodeIndex>> {
        let candidate = match self.token() {
            SyntaxKind::OpenParenToken => match look_ahead_paren_follow(&mut self.scanner) {
                ParenFollow::Arrow | ParenFollow::Unknown => true,
                ParenFollow::Colon => tail == 0,
                ParenFollow::Other => false,
            },
            SyntaxKind::LessThanToken | SyntaxKind::AsyncKeyword => true,
            _ => {
                self.is_identifier()
                    && self.look_ahead_is(|token| token == SyntaxKind::EqualsGreaterThanToken)
            }
        };
        if !candidate {
            return Ok(None);
        }

        let pos = self.token_pos();
        let Some(head) = self.try_parse(|p| {
            let head = p.parse_arrow_head()?;
            if tail != 0 && head.return_type.is_some() {
                return Err(p.error_expected(SyntaxKind::ColonToken));
            }
            Ok(head)
        }) else {
            return Ok(None);
        };

        let mut flags = NodeFlags::empty();
        flags.set(NodeFlags::ASYNC, head.is_async);
        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_function_body(head.is_async, false)?
        } else {
            flags |= NodeFlags::EXPRESSION_BODY;
            let set = tail | (if head.is_async { CONTEXT_FLAG_ASYNC } else { 0 });
            let clear = (CONTEXT_FLAG_ASYNC | CONTEXT_FLAG_GENERATOR) & !set;
            self.with_context(set, clear, Self::parse_assignment_expression)?
        };

        let node = self.finish_node(
            NodeKind::ArrowFunctionExpression,
            pos,
            [
                head.type_parameters.into(),
                head.params,
                head.return_type.into(),
                body.into(),
            ],
        );
        self.set_flags(node, flags);
        Ok(Some(node))
    }

    fn parse_arrow_head(&mut self) -> ParseResult<ArrowHead> {
        if self.is_identifier()
            && self.look_ahead_is(|token| token == SyntaxKind::EqualsGreaterThanToken)
        {
            let params = self.parse_single_arrow_parameter()?;
            self.parse_arrow_token()?;
            return Ok(ArrowHead {
                is_async: false,
                type_parameters: NodeIndex::NONE,
                params,
                return_type: NodeIndex::NONE,
            });
        }

        let is_async = self.is_token(SyntaxKind::AsyncKeyword)
            && look_ahead_is_on_same_line(&mut self.scanner, |token| {
                matches!(
                    token,
                    SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
                ) || token.is_identifier_like()
            });
        if is_async {
            self.next_token()?;
            if self.is_identifier() {
                let params = self.parse_single_arrow_parameter()?;
                self.parse_arrow_token()?;
                return Ok(ArrowHead {
                    is_async,
                    type_parameters: NodeIndex::NONE,
                    params,
                    return_type: NodeIndex::NONE,
                });
            }
        }

        let type_parameters = self.parse_type_parameters_opt()?;
        let (set, clear) = function_context(is_async, false);
        let params = self.with_context(set, clear, Self::parse_parameter_list)?;
        let return_type = self.parse_type_annotation_opt()?;
        self.parse_arrow_token()?;
        Ok(ArrowHead {
            is_async,
            type_parameters,
            params,
            return_type,
        })
    }

    fn parse_single_arrow_parameter(&mut self) -> ParseResult<Slot> {
        let pos = self.token_pos();
        let param = self.parse_identifier()?;
        Ok(NodeArena::list_slot(vec![param], pos, self.prev_token_end))
    }

    fn parse_arrow_token(&mut self) -> ParseResult<()> {
        if !self.is_token(SyntaxKind::EqualsGreaterThanToken) {
            return Err(self.error_expected(SyntaxKind::EqualsGreaterThanToken));
        }
        if self.has_preceding_line_break() {
            return Err(self.error_at_current_token(
                diagnostic_messages::LINE_BREAK_NOT_PERMITTED_HERE,
                &[],
            ));
        }
        self.next_token()?;
        Ok(())
    }

    // =========================================================================
    // Operators
    // =========================================================================

    fn parse_conditional_expression(&mut self, tail: u32) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let test = self.parse_binary_expression(0)?;
        if !self.is_token(SyntaxKind::QuestionToken) {
            return Ok(test);
        }
        self.next_token()?;
        let consequent = self.with_context(
            CONTEXT_FLAG_IN_CONDITIONAL_TRUE,
            CONTEXT_FLAG_DISALLOW_IN,
            Self::parse_assignment_expression,
        )?;
        self.parse_expected(SyntaxKind::ColonToken)?;
        let alternate = self.with_context(tail, 0, Self::parse_assignment_expression)?;
        Ok(self.finish_node(
            NodeKind::ConditionalExpression,
            pos,
            [test.into(), consequent.into(), alternate.into()],
        ))
    }

    fn binary_precedence(&self, operator: SyntaxKind) -> u8 {
        if operator == SyntaxKind::InKeyword && self.in_context(CONTEXT_FLAG_DISALLOW_IN) {
            0
        } else {
            operator.binary_precedence()
        }
    }

    /// Precedence climbing: consume operators binding tighter than
    /// `precedence` (`**` is right-associative).
    fn parse_binary_expression(&mut self, precedence: u8) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let mut left = self.parse_unary_expression()?;
        loop {
            let operator = self.re_scan_greater_token();
            let new_precedence = self.binary_precedence(operator);
            let consume = if operator == SyntaxKind::AsteriskAsteriskToken {
                new_precedence >= precedence
            } else {
                new_precedence > precedence
            };
            if new_precedence == 0 || !consume {
                break;
            }
            self.next_token()?;
            let right = self.guarded(|p| p.parse_binary_expression(new_precedence))?;
            let kind = if operator.is_logical_operator() {
                NodeKind::LogicalExpression
            } else {
                NodeKind::BinaryExpression
            };
            left = self.finish_node(kind, pos, [left.into(), right.into()]);
            self.set_token(left, operator);
        }
        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let operator = self.token();
        match operator {
            SyntaxKind::DeleteKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken => {
                self.next_token()?;
                let argument = self.guarded(Self::parse_unary_expression)?;
                let node = self.finish_node(NodeKind::UnaryExpression, pos, [argument.into()]);
                self.set_token(node, operator);
                self.set_flags(node, NodeFlags::PREFIX);
                Ok(node)
            }
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => {
                self.next_token()?;
                let argument = self.guarded(Self::parse_unary_expression)?;
                let node = self.finish_node(NodeKind::UpdateExpression, pos, [argument.into()]);
                self.set_token(node, operator);
                self.set_flags(node, NodeFlags::PREFIX);
                Ok(node)
            }
            SyntaxKind::AwaitKeyword if self.in_context(CONTEXT_FLAG_ASYNC) => {
                self.next_token()?;
                let argument = self.guarded(Self::parse_unary_expression)?;
                Ok(self.finish_node(NodeKind::AwaitExpression, pos, [argument.into()]))
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_postfix_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let expression = self.parse_left_hand_side_expression()?;
        let operator = self.token();
        if matches!(operator, SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken)
            && !self.has_preceding_line_break()
        {
            self.next_token()?;
            let node = self.finish_node(NodeKind::UpdateExpression, pos, [expression.into()]);
            self.set_token(node, operator);
            return Ok(node);
        }
        Ok(expression)
    }

    // =========================================================================
    // Member access and calls
    // =========================================================================

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let expression = match self.token() {
            SyntaxKind::NewKeyword => self.parse_new_expression()?,
            SyntaxKind::SuperKeyword => {
                self.next_token()?;
                self.finish_leaf(NodeKind::Super, pos)
            }
            _ => self.parse_primary_expression()?,
        };
        self.parse_member_and_call_rest(pos, expression, true)
    }

    fn parse_member_and_call_rest(
        &mut self,
        pos: u32,
        mut expression: NodeIndex,
        allow_call: bool,
    ) -> ParseResult<NodeIndex> {
        loop {
            expression = match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token()?;
                    let property = self.parse_identifier_name()?;
                    self.finish_node(
                        NodeKind::MemberExpression,
                        pos,
                        [expression.into(), property.into()],
                    )
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token()?;
                    let property =
                        self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, Self::parse_expression)?;
                    self.parse_expected(SyntaxKind::CloseBracketToken)?;
                    let node = self.finish_node(
                        NodeKind::MemberExpression,
                        pos,
                        [expression.into(), property.into()],
                    );
                    self.set_flags(node, NodeFlags::COMPUTED);
                    node
                }
                SyntaxKind::OpenParenToken if allow_call => {
                    let arguments = self.parse_arguments()?;
                    self.finish_node(NodeKind::CallExpression, pos, [expression.into(), arguments])
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    let quasi = self.parse_template_literal()?;
                    self.finish_node(
                        NodeKind::TaggedTemplateExpression,
                        pos,
                        [expression.into(), quasi.into()],
                    )
                }
                _ => return Ok(expression),
            };
        }
    }

    fn parse_new_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;
        let callee_pos = self.token_pos();
        let callee = if self.is_token(SyntaxKind::NewKeyword) {
            self.guarded(Self::parse_new_expression)?
        } else {
            self.parse_primary_expression()?
        };
        let callee = self.parse_member_and_call_rest(callee_pos, callee, false)?;
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            self.parse_arguments()?
        } else {
            Slot::Absent
        };
        Ok(self.finish_node(NodeKind::NewExpression, pos, [callee.into(), arguments]))
    }

    /// `(a, ...b)`; the list spans the parentheses.
    fn parse_arguments(&mut self) -> ParseResult<Slot> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let mut arguments = Vec::new();
        while !self.is_token(SyntaxKind::CloseParenToken) {
            let argument = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, Self::parse_spread_or_assignment)?;
            arguments.push(argument);
            if !self.is_token(SyntaxKind::CloseParenToken) {
                self.parse_expected(SyntaxKind::CommaToken)?;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(NodeArena::list_slot(arguments, pos, self.prev_token_end))
    }

    fn parse_spread_or_assignment(&mut self) -> ParseResult<NodeIndex> {
        if !self.is_token(SyntaxKind::DotDotDotToken) {
            return self.parse_assignment_expression();
        }
        let pos = self.token_pos();
        self.next_token()?;
        let argument = self.parse_assignment_expression()?;
        Ok(self.finish_node(NodeKind::SpreadElement, pos, [argument.into()]))
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    fn parse_primary_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::ThisKeyword => {
                self.next_token()?;
                Ok(self.finish_leaf(NodeKind::ThisExpression, pos))
            }
            SyntaxKind::NumericLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword => self.parse_literal(),
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                self.re_scan_slash_token()?;
                self.parse_literal()
            }
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                self.parse_template_literal()
            }
            SyntaxKind::OpenParenToken => self.parse_parenthesized_expression(),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function(NodeKind::FunctionExpression, pos, true),
            SyntaxKind::AsyncKeyword if self.look_ahead_is_async_function() => {
                self.parse_function(NodeKind::FunctionExpression, pos, true)
            }
            SyntaxKind::ClassKeyword => self.parse_class(NodeKind::ClassExpression, pos, true),
            _ if self.is_identifier() => self.parse_identifier(),
            SyntaxKind::EndOfFileToken => Err(self.error_unexpected()),
            _ => Err(self.error_at_current_token(diagnostic_messages::EXPRESSION_EXPECTED, &[])),
        }
    }

    /// `( expr )` produces no node of its own.
    fn parse_parenthesized_expression(&mut self) -> ParseResult<NodeIndex> {
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let expression = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, Self::parse_expression)?;
        if self.is_token(SyntaxKind::ColonToken) {
            return Err(
                self.error_at_current_token(diagnostic_messages::TYPE_CAST_UNSUPPORTED, &[])
            );
        }
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(expression)
    }

    fn parse_template_literal(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();

        let head = self.token();
        self.next_token()?;
        quasis.push(self.finish_leaf(NodeKind::TemplateElement, pos));

        if head == SyntaxKind::TemplateHead {
            loop {
                expressions.push(self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, Self::parse_expression)?);
                if !self.is_token(SyntaxKind::CloseBraceToken) {
                    return Err(self.error_expected(SyntaxKind::CloseBraceToken));
                }
                let continuation = self.re_scan_template_token()?;
                let element_pos = self.token_pos();
                self.next_token()?;
                quasis.push(self.finish_leaf(NodeKind::TemplateElement, element_pos));
                if continuation != SyntaxKind::TemplateMiddle {
                    break;
                }
            }
        }

        let end = self.prev_token_end;
        let quasis = NodeArena::list_slot(quasis, pos, end);
        let expressions = NodeArena::list_slot(expressions, pos, end);
        Ok(self.finish_node(NodeKind::TemplateLiteral, pos, [quasis, expressions]))
    }

    fn parse_array_literal(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken) {
            if self.parse_optional(SyntaxKind::CommaToken)? {
                elements.push(NodeIndex::NONE);
                continue;
            }
            elements.push(self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, Self::parse_spread_or_assignment)?);
            if !self.is_token(SyntaxKind::CloseBracketToken) {
                self.parse_expected(SyntaxKind::CommaToken)?;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        let elements = NodeArena::list_slot(elements, pos, self.prev_token_end);
        Ok(self.finish_node(NodeKind::ArrayExpression, pos, [elements]))
    }

    fn parse_object_literal(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut properties = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            properties.push(self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, Self::parse_object_literal_member)?);
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                self.parse_expected(SyntaxKind::CommaToken)?;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        let properties = NodeArena::list_slot(properties, pos, self.prev_token_end);
        Ok(self.finish_node(NodeKind::ObjectExpression, pos, [properties]))
    }

    fn parse_object_literal_member(&mut self) -> ParseResult<NodeIndex> {
        if self.is_token(SyntaxKind::DotDotDotToken) {
            return self.parse_spread_or_assignment();
        }

        let pos = self.token_pos();
        let mut flags = NodeFlags::empty();
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
            && flags.is_empty()
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
            return Err(self.error_at_current_token(
                diagnostic_messages::PROPERTY_ASSIGNMENT_EXPECTED,
                &[],
            ));
        }
        let shorthand_candidate = flags.is_empty() && self.is_identifier();
        let (key, computed) = self.parse_property_name()?;
        if computed {
            flags |= NodeFlags::COMPUTED;
        }

        if matches!(
            self.token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            let value = self.parse_method_function(flags)?;
            let node = self.finish_node(NodeKind::Property, pos, [key.into(), value.into()]);
            self.set_flags(node, flags | NodeFlags::METHOD);
            return Ok(node);
        }
        if flags.intersects(
            NodeFlags::ASYNC | NodeFlags::GENERATOR | NodeFlags::GETTER | NodeFlags::SETTER,
        ) {
            return Err(self.error_expected(SyntaxKind::OpenParenToken));
        }

        if self.parse_optional(SyntaxKind::ColonToken)? {
            let value = self.parse_assignment_expression()?;
            let node = self.finish_node(NodeKind::Property, pos, [key.into(), value.into()]);
            self.set_flags(node, flags);
            return Ok(node);
        }

        if shorthand_candidate
            && matches!(
                self.token(),
                SyntaxKind::CommaToken | SyntaxKind::CloseBraceToken | SyntaxKind::EqualsToken
            )
        {
            // `{a = 1}` is only valid once the literal becomes a pattern.
            let value = self.parse_shorthand_default(pos, key)?;
            let node = self.finish_node(NodeKind::Property, pos, [Slot::Absent, value.into()]);
            self.set_flags(node, NodeFlags::SHORTHAND);
            return Ok(node);
        }

        Err(self.error_at_current_token(diagnostic_messages::PROPERTY_ASSIGNMENT_EXPECTED, &[]))
    }

    /// `name` or `name = default` after a shorthand key.
    fn parse_shorthand_default(&mut self, pos: u32, name: NodeIndex) -> ParseResult<NodeIndex> {
        if !self.parse_optional(SyntaxKind::EqualsToken)? {
            return Ok(name);
        }
        let default = self.parse_assignment_expression()?;
        Ok(self.finish_node(
            NodeKind::AssignmentPattern,
            pos,
            [name.into(), default.into()],
        ))
    }

    /// Identifier, string, number or `[computed]` key. Returns whether the key
    /// is computed.
    pub(crate) fn parse_property_name(&mut self) -> ParseResult<(NodeIndex, bool)> {
        match self.token() {
            SyntaxKind::OpenBracketToken => {
                self.next_token()?;
                let key = self.with_context(
                    0,
                    CONTEXT_FLAG_DISALLOW_IN,
                    Self::parse_assignment_expression,
                )?;
                self.parse_expected(SyntaxKind::CloseBracketToken)?;
                Ok((key, true))
            }
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => {
                Ok((self.parse_literal()?, false))
            }
            _ => Ok((self.parse_identifier_name()?, false)),
        }
    }

    // =========================================================================
    // Binding patterns
    // =========================================================================

    /// Parameter list `(a, b?: T, {c} = d, ...rest: R)`; the list spans the
    /// parentheses.
    pub(crate) fn parse_parameter_list(&mut self) -> ParseResult<Slot> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let mut params = Vec::new();
        while !self.is_token(SyntaxKind::CloseParenToken) {
            if self.is_token(SyntaxKind::DotDotDotToken) {
                params.push(self.parse_rest_element()?);
                if self.is_token(SyntaxKind::CommaToken) {
                    return Err(self.error_at_current_token(
                        diagnostic_messages::REST_PARAMETER_MUST_BE_LAST,
                        &[],
                    ));
                }
                break;
            }
            params.push(self.parse_binding_element(true)?);
            if !self.is_token(SyntaxKind::CloseParenToken) {
                self.parse_expected(SyntaxKind::CommaToken)?;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(NodeArena::list_slot(params, pos, self.prev_token_end))
    }

    fn parse_rest_element(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::DotDotDotToken)?;
        let argument = self.parse_binding_target(false)?;
        Ok(self.finish_node(NodeKind::RestElement, pos, [argument.into()]))
    }

    /// Binding target with an optional `= default`.
    fn parse_binding_element(&mut self, allow_optional: bool) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let target = self.guarded(|p| p.parse_binding_target(allow_optional))?;
        if !self.parse_optional(SyntaxKind::EqualsToken)? {
            return Ok(target);
        }
        let default = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, Self::parse_assignment_expression)?;
        Ok(self.finish_node(
            NodeKind::AssignmentPattern,
            pos,
            [target.into(), default.into()],
        ))
    }

    /// Identifier or destructuring pattern, with an optional annotation.
    pub(crate) fn parse_binding_target(&mut self, allow_optional: bool) -> ParseResult<NodeIndex> {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_object_binding_pattern(),
            SyntaxKind::OpenBracketToken => self.parse_array_binding_pattern(),
            _ => self.parse_binding_identifier(allow_optional),
        }
    }

    /// `name`, `name?`, `name: T` or `name?: T`.
    pub(crate) fn parse_binding_identifier(&mut self, allow_optional: bool) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        if !self.is_identifier() {
            return Err(
                self.error_at_current_token(diagnostic_messages::IDENTIFIER_EXPECTED, &[])
            );
        }
        let atom = self.scanner.get_token_atom();
        self.next_token()?;

        let optional = if allow_optional && self.is_token(SyntaxKind::QuestionToken) {
            let marker_pos = self.token_pos();
            self.next_token()?;
            self.finish_leaf(NodeKind::OptionalMarker, marker_pos)
        } else {
            NodeIndex::NONE
        };
        let annotation = self.parse_type_annotation_opt()?;
        let id = self.finish_node(NodeKind::Identifier, pos, [optional.into(), annotation.into()]);
        if let Some(node) = self.arena.get_mut(id) {
            node.atom = atom;
        }
        Ok(id)
    }

    fn parse_object_binding_pattern(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut properties = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            if self.is_token(SyntaxKind::DotDotDotToken) {
                properties.push(self.parse_rest_element()?);
            } else {
                properties.push(self.parse_binding_property()?);
            }
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                self.parse_expected(SyntaxKind::CommaToken)?;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        let properties = NodeArena::list_slot(properties, pos, self.prev_token_end);
        let annotation = self.parse_type_annotation_opt()?;
        Ok(self.finish_node(NodeKind::ObjectPattern, pos, [properties, annotation.into()]))
    }

    fn parse_binding_property(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let shorthand_candidate = self.is_identifier();
        let (key, computed) = self.parse_property_name()?;

        if self.parse_optional(SyntaxKind::ColonToken)? {
            let value = self.parse_binding_element(false)?;
            let node = self.finish_node(NodeKind::Property, pos, [key.into(), value.into()]);
            if computed {
                self.set_flags(node, NodeFlags::COMPUTED);
            }
            return Ok(node);
        }
        if !shorthand_candidate {
            return Err(self.error_expected(SyntaxKind::ColonToken));
        }
        let value = self.parse_shorthand_default(pos, key)?;
        let node = self.finish_node(NodeKind::Property, pos, [Slot::Absent, value.into()]);
        self.set_flags(node, NodeFlags::SHORTHAND);
        Ok(node)
    }

    fn parse_array_binding_pattern(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken) {
            if self.parse_optional(SyntaxKind::CommaToken)? {
                elements.push(NodeIndex::NONE);
                continue;
            }
            if self.is_token(SyntaxKind::DotDotDotToken) {
                elements.push(self.parse_rest_element()?);
            } else {
                elements.push(self.parse_binding_element(false)?);
            }
            if !self.is_token(SyntaxKind::CloseBracketToken) {
                self.parse_expected(SyntaxKind::CommaToken)?;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        let elements = NodeArena::list_slot(elements, pos, self.prev_token_end);
        let annotation = self.parse_type_annotation_opt()?;
        Ok(self.finish_node(NodeKind::ArrayPattern, pos, [elements, annotation.into()]))
    }

    // =========================================================================
    // Expression to pattern conversion
    // =========================================================================

    fn invalid_assignment_target(&self, node: NodeIndex) -> super::state::ParseError {
        let (pos, end) = self
            .arena
            .get(node)
            .map_or((self.token_pos(), self.token_end()), |n| (n.pos, n.end));
        self.error_at(
            pos,
            end - pos,
            diagnostic_messages::INVALID_ASSIGNMENT_TARGET,
            &[],
        )
    }

    /// Reinterpret an expression parsed as the left side of `=` (or of a
    /// `for-in/of` head) as a pattern. Literals become patterns; the
    /// replaced expression nodes are left detached.
    pub(crate) fn to_assignment_target(&mut self, node: NodeIndex) -> ParseResult<NodeIndex> {
        match self.node_kind(node) {
            Some(
                NodeKind::Identifier
                | NodeKind::MemberExpression
                | NodeKind::ObjectPattern
                | NodeKind::ArrayPattern,
            ) => Ok(node),
            Some(NodeKind::ObjectExpression) => {
                let properties = self.arena.list(node, Field::Properties).cloned().unwrap_or_default();
                let mut converted = Vec::with_capacity(properties.len());
                for &property in &properties.nodes {
                    converted.push(self.to_pattern_property(property)?);
                }
                let list = NodeArena::list_slot(converted, properties.pos, properties.end);
                Ok(self.rebuild(node, NodeKind::ObjectPattern, [list]))
            }
            Some(NodeKind::ArrayExpression) => {
                let elements = self.arena.list(node, Field::Elements).cloned().unwrap_or_default();
                let mut converted = Vec::with_capacity(elements.len());
                for &element in &elements.nodes {
                    converted.push(if element.is_none() {
                        element
                    } else {
                        self.to_pattern_element(element)?
                    });
                }
                let list = NodeArena::list_slot(converted, elements.pos, elements.end);
                Ok(self.rebuild(node, NodeKind::ArrayPattern, [list]))
            }
            _ => Err(self.invalid_assignment_target(node)),
        }
    }

    /// Element of an array pattern or value of an object pattern property.
    fn to_pattern_element(&mut self, node: NodeIndex) -> ParseResult<NodeIndex> {
        match self.node_kind(node) {
            Some(NodeKind::SpreadElement) => {
                let argument = self.arena.child(node, Field::Argument);
                let argument = self.to_assignment_target(argument)?;
                Ok(self.rebuild(node, NodeKind::RestElement, [argument.into()]))
            }
            Some(NodeKind::AssignmentExpression)
                if self.arena.get(node).map(|n| n.token) == Some(SyntaxKind::EqualsToken) =>
            {
                let left = self.arena.child(node, Field::Left);
                let right = self.arena.child(node, Field::Right);
                Ok(self.rebuild(node, NodeKind::AssignmentPattern, [left.into(), right.into()]))
            }
            Some(NodeKind::AssignmentPattern) => Ok(node),
            _ => self.to_assignment_target(node),
        }
    }

    fn to_pattern_property(&mut self, node: NodeIndex) -> ParseResult<NodeIndex> {
        match self.node_kind(node) {
            Some(NodeKind::SpreadElement) => self.to_pattern_element(node),
            Some(NodeKind::Property) => {
                let flags = self.arena.get(node).map_or(NodeFlags::empty(), |n| n.flags);
                if flags.intersects(NodeFlags::METHOD | NodeFlags::GETTER | NodeFlags::SETTER) {
                    return Err(self.invalid_assignment_target(node));
                }
                let key = self.arena.child(node, Field::Key);
                let value = self.arena.child(node, Field::Value);
                let value = self.to_pattern_element(value)?;
                let property = self.rebuild(node, NodeKind::Property, [key.into(), value.into()]);
                self.set_flags(property, flags);
                Ok(property)
            }
            _ => Err(self.invalid_assignment_target(node)),
        }
    }

    /// New node of `kind` with the span of `original`.
    fn rebuild<I>(&mut self, original: NodeIndex, kind: NodeKind, slots: I) -> NodeIndex
    where
        I: IntoIterator<Item = Slot>,
    {
        let (pos, end) = self.arena.get(original).map_or((0, 0), |n| (n.pos, n.end));
        self.arena.add_node(kind, pos, end, slots)
    }
}
