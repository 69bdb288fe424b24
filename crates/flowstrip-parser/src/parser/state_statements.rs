//! Parser state - statement, declaration and module parsing methods.

use super::base::NodeIndex;
use super::node::{NodeArena, NodeFlags, Slot};
use super::node_kind::NodeKind;
use super::parse_rules::{
    look_ahead_is_declare_declaration, look_ahead_is_let_declaration, look_ahead_is_on_same_line,
    look_ahead_next_is_identifier_on_same_line,
};
use super::state::{
    CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_DISALLOW_IN, CONTEXT_FLAG_GENERATOR, ParseResult,
    ParserState,
};
use flowstrip_common::diagnostics::diagnostic_messages;
use flowstrip_scanner::SyntaxKind;

impl ParserState {
    /// Parse the whole source text into a `Program` node.
    pub fn parse_source_file(&mut self) -> ParseResult<NodeIndex> {
        self.scanner.scan_shebang_trivia();
        self.next_token()?;

        let mut statements = Vec::new();
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            statements.push(self.parse_statement()?);
        }

        let end = self.scanner.source_text().len() as u32;
        let body = NodeArena::list_slot(statements, 0, end);
        Ok(self.arena.add_node(NodeKind::Program, 0, end, [body]))
    }

    pub(crate) fn parse_statement(&mut self) -> ParseResult<NodeIndex> {
        self.guarded(Self::parse_statement_worker)
    }

    fn parse_statement_worker(&mut self) -> ParseResult<NodeIndex> {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_block_statement(),
            SyntaxKind::SemicolonToken => {
                let pos = self.token_pos();
                self.next_token()?;
                Ok(self.finish_leaf(NodeKind::EmptyStatement, pos))
            }
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => self.parse_variable_statement(),
            SyntaxKind::LetKeyword if look_ahead_is_let_declaration(&mut self.scanner) => {
                self.parse_variable_statement()
            }
            SyntaxKind::FunctionKeyword => {
                let pos = self.token_pos();
                self.parse_function_declaration(pos, false)
            }
            SyntaxKind::AsyncKeyword if self.look_ahead_is_async_function() => {
                let pos = self.token_pos();
                self.parse_function_declaration(pos, false)
            }
            SyntaxKind::ClassKeyword => self.parse_class_declaration(self.token_pos()),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::ContinueKeyword => self.parse_break_or_continue(NodeKind::ContinueStatement),
            SyntaxKind::BreakKeyword => self.parse_break_or_continue(NodeKind::BreakStatement),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::WithKeyword => self.parse_with_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::DebuggerKeyword => {
                let pos = self.token_pos();
                self.next_token()?;
                self.parse_semicolon()?;
                Ok(self.finish_leaf(NodeKind::DebuggerStatement, pos))
            }
            SyntaxKind::ImportKeyword => self.parse_import_declaration(),
            SyntaxKind::ExportKeyword => self.parse_export_declaration(),
            SyntaxKind::TypeKeyword
                if look_ahead_next_is_identifier_on_same_line(&mut self.scanner) =>
            {
                let pos = self.token_pos();
                self.parse_type_alias(pos, NodeFlags::empty())
            }
            SyntaxKind::InterfaceKeyword
                if look_ahead_next_is_identifier_on_same_line(&mut self.scanner) =>
            {
                let pos = self.token_pos();
                self.parse_interface_declaration(pos, NodeFlags::empty())
            }
            SyntaxKind::DeclareKeyword if look_ahead_is_declare_declaration(&mut self.scanner) => {
                self.parse_declare_statement()
            }
            SyntaxKind::EndOfFileToken => Err(self.error_at_current_token(
                diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
                &[],
            )),
            _ => self.parse_expression_or_labeled_statement(),
        }
    }

    /// The body of `if`, a loop, `with` or a label. Flow declarations must
    /// sit directly in a statement list so removing them leaves valid code.
    fn parse_embedded_statement(&mut self) -> ParseResult<NodeIndex> {
        let is_flow_declaration = match self.token() {
            SyntaxKind::TypeKeyword | SyntaxKind::InterfaceKeyword => {
                look_ahead_next_is_identifier_on_same_line(&mut self.scanner)
            }
            SyntaxKind::DeclareKeyword => look_ahead_is_declare_declaration(&mut self.scanner),
            _ => false,
        };
        if is_flow_declaration {
            return Err(self.error_at_current_token(
                diagnostic_messages::TYPE_DECLARATION_NOT_ALLOWED_HERE,
                &[],
            ));
        }
        self.parse_statement()
    }

    /// `async function` with no line break in between.
    pub(crate) fn look_ahead_is_async_function(&mut self) -> bool {
        look_ahead_is_on_same_line(&mut self.scanner, |token| {
            token == SyntaxKind::FunctionKeyword
        })
    }

    pub(crate) fn parse_block_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let body = self.parse_statement_block()?;
        Ok(self.finish_node(NodeKind::BlockStatement, pos, [body]))
    }

    /// `{ statements }`, returning the statement list.
    fn parse_statement_block(&mut self) -> ParseResult<Slot> {
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let list_pos = self.prev_token_end;
        let mut statements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            if self.is_token(SyntaxKind::EndOfFileToken) {
                return Err(self.error_expected(SyntaxKind::CloseBraceToken));
            }
            statements.push(self.parse_statement()?);
        }
        let list_end = self.token_pos();
        self.next_token()?;
        Ok(NodeArena::list_slot(statements, list_pos, list_end))
    }

    /// Function body; `async`/`generator` describe the function it belongs to.
    pub(crate) fn parse_function_body(
        &mut self,
        is_async: bool,
        is_generator: bool,
    ) -> ParseResult<NodeIndex> {
        let (set, clear) = function_context(is_async, is_generator);
        self.with_context(set, clear, Self::parse_block_statement)
    }

    fn parse_expression_or_labeled_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        if self.is_identifier()
            && self.look_ahead_is(|token| token == SyntaxKind::ColonToken)
        {
            let label = self.parse_identifier()?;
            self.parse_expected(SyntaxKind::ColonToken)?;
            let body = self.parse_embedded_statement()?;
            return Ok(self.finish_node(NodeKind::LabeledStatement, pos, [label.into(), body.into()]));
        }

        let expression = self.parse_expression()?;
        self.parse_semicolon()?;
        Ok(self.finish_node(NodeKind::ExpressionStatement, pos, [expression.into()]))
    }

    // =========================================================================
    // Variables
    // =========================================================================

    fn parse_variable_statement(&mut self) -> ParseResult<NodeIndex> {
        let declaration = self.parse_variable_declaration_list()?;
        self.parse_semicolon()?;
        // The statement owns the trailing semicolon.
        if let Some(node) = self.arena.get_mut(declaration) {
            node.end = self.prev_token_end;
        }
        Ok(declaration)
    }

    /// `var|let|const a = 1, b: T`, without the semicolon.
    pub(crate) fn parse_variable_declaration_list(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let keyword = self.token();
        self.next_token()?;

        let list_pos = self.token_pos();
        let mut declarators = Vec::new();
        loop {
            declarators.push(self.parse_variable_declarator()?);
            if !self.parse_optional(SyntaxKind::CommaToken)? {
                break;
            }
        }
        let list = NodeArena::list_slot(declarators, list_pos, self.prev_token_end);
        let node = self.finish_node(NodeKind::VariableDeclaration, pos, [list]);
        self.set_token(node, keyword);
        Ok(node)
    }

    fn parse_variable_declarator(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let id = self.parse_binding_target(false)?;
        let init = if self.parse_optional(SyntaxKind::EqualsToken)? {
            self.parse_assignment_expression()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.finish_node(NodeKind::VariableDeclarator, pos, [id.into(), init.into()]))
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// `[async] function [*] name<T>(params): R { body }`. `pos` is where the
    /// declaration starts (before `export default`'s inner keyword).
    pub(crate) fn parse_function_declaration(
        &mut self,
        pos: u32,
        allow_anonymous: bool,
    ) -> ParseResult<NodeIndex> {
        self.parse_function(NodeKind::FunctionDeclaration, pos, allow_anonymous)
    }

    pub(crate) fn parse_function(
        &mut self,
        kind: NodeKind,
        pos: u32,
        allow_anonymous: bool,
    ) -> ParseResult<NodeIndex> {
        let is_async = self.parse_optional(SyntaxKind::AsyncKeyword)?;
        self.parse_expected(SyntaxKind::FunctionKeyword)?;
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken)?;

        let id = if self.is_identifier() {
            self.parse_identifier()?
        } else if allow_anonymous {
            NodeIndex::NONE
        } else {
            return Err(
                self.error_at_current_token(diagnostic_messages::IDENTIFIER_EXPECTED, &[])
            );
        };

        let (type_parameters, params, return_type, body) =
            self.parse_function_rest(is_async, is_generator)?;
        let node = self.finish_node(
            kind,
            pos,
            [id.into(), type_parameters.into(), params, return_type.into(), body.into()],
        );
        let mut flags = NodeFlags::empty();
        flags.set(NodeFlags::ASYNC, is_async);
        flags.set(NodeFlags::GENERATOR, is_generator);
        self.set_flags(node, flags);
        Ok(node)
    }

    /// Everything after the function name: type parameters, parameters,
    /// return type and body.
    pub(crate) fn parse_function_rest(
        &mut self,
        is_async: bool,
        is_generator: bool,
    ) -> ParseResult<(NodeIndex, Slot, NodeIndex, NodeIndex)> {
        let type_parameters = self.parse_type_parameters_opt()?;
        let (set, clear) = function_context(is_async, is_generator);
        let params = self.with_context(set, clear, Self::parse_parameter_list)?;
        let return_type = self.parse_type_annotation_opt()?;
        let body = self.parse_function_body(is_async, is_generator)?;
        Ok((type_parameters, params, return_type, body))
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_parenthesized_condition(&mut self) -> ParseResult<NodeIndex> {
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let expression = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, Self::parse_expression)?;
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(expression)
    }

    fn parse_if_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;
        let test = self.parse_parenthesized_condition()?;
        let consequent = self.parse_embedded_statement()?;
        let alternate = if self.parse_optional(SyntaxKind::ElseKeyword)? {
            self.parse_embedded_statement()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.finish_node(
            NodeKind::IfStatement,
            pos,
            [test.into(), consequent.into(), alternate.into()],
        ))
    }

    fn parse_do_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;
        let body = self.parse_embedded_statement()?;
        self.parse_expected(SyntaxKind::WhileKeyword)?;
        let test = self.parse_parenthesized_condition()?;
        // A semicolon is always optional after `do ... while (x)`.
        self.parse_optional(SyntaxKind::SemicolonToken)?;
        Ok(self.finish_node(NodeKind::DoWhileStatement, pos, [body.into(), test.into()]))
    }

    fn parse_while_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;
        let test = self.parse_parenthesized_condition()?;
        let body = self.parse_embedded_statement()?;
        Ok(self.finish_node(NodeKind::WhileStatement, pos, [test.into(), body.into()]))
    }

    fn parse_for_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;
        self.parse_expected(SyntaxKind::OpenParenToken)?;

        let init = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else if self.is_token(SyntaxKind::VarKeyword)
            || self.is_token(SyntaxKind::ConstKeyword)
            || (self.is_token(SyntaxKind::LetKeyword)
                && look_ahead_is_let_declaration(&mut self.scanner))
        {
            self.with_context(
                CONTEXT_FLAG_DISALLOW_IN,
                0,
                Self::parse_variable_declaration_list,
            )?
        } else {
            self.with_context(CONTEXT_FLAG_DISALLOW_IN, 0, Self::parse_expression)?
        };

        let loop_kind = match self.token() {
            SyntaxKind::InKeyword => Some(NodeKind::ForInStatement),
            SyntaxKind::OfKeyword => Some(NodeKind::ForOfStatement),
            _ => None,
        };
        if let Some(kind) = loop_kind
            && init.is_some()
        {
            let left = if self.node_kind(init) == Some(NodeKind::VariableDeclaration) {
                init
            } else {
                self.to_assignment_target(init)?
            };
            self.next_token()?;
            let right = if kind == NodeKind::ForOfStatement {
                self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, Self::parse_assignment_expression)?
            } else {
                self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, Self::parse_expression)?
            };
            self.parse_expected(SyntaxKind::CloseParenToken)?;
            let body = self.parse_embedded_statement()?;
            return Ok(self.finish_node(kind, pos, [left.into(), right.into(), body.into()]));
        }

        self.parse_expected(SyntaxKind::SemicolonToken)?;
        let test = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, Self::parse_expression)?
        };
        self.parse_expected(SyntaxKind::SemicolonToken)?;
        let update = if self.is_token(SyntaxKind::CloseParenToken) {
            NodeIndex::NONE
        } else {
            self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, Self::parse_expression)?
        };
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        let body = self.parse_embedded_statement()?;
        Ok(self.finish_node(
            NodeKind::ForStatement,
            pos,
            [init.into(), test.into(), update.into(), body.into()],
        ))
    }

    fn parse_break_or_continue(&mut self, kind: NodeKind) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;
        let label = if !self.can_parse_semicolon() && self.is_identifier() {
            self.parse_identifier()?
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon()?;
        Ok(self.finish_node(kind, pos, [label.into()]))
    }

    fn parse_return_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;
        let argument = if self.can_parse_semicolon() {
            NodeIndex::NONE
        } else {
            self.parse_expression()?
        };
        self.parse_semicolon()?;
        Ok(self.finish_node(NodeKind::ReturnStatement, pos, [argument.into()]))
    }

    fn parse_with_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;
        let object = self.parse_parenthesized_condition()?;
        let body = self.parse_embedded_statement()?;
        Ok(self.finish_node(NodeKind::WithStatement, pos, [object.into(), body.into()]))
    }

    fn parse_switch_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;
        let discriminant = self.parse_parenthesized_condition()?;
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let list_pos = self.prev_token_end;
        let mut cases = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            cases.push(self.parse_switch_case()?);
        }
        let list_end = self.token_pos();
        self.next_token()?;
        let cases = NodeArena::list_slot(cases, list_pos, list_end);
        Ok(self.finish_node(NodeKind::SwitchStatement, pos, [discriminant.into(), cases]))
    }

    fn parse_switch_case(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let test = match self.token() {
            SyntaxKind::CaseKeyword => {
                self.next_token()?;
                self.parse_expression()?
            }
            SyntaxKind::DefaultKeyword => {
                self.next_token()?;
                NodeIndex::NONE
            }
            _ => return Err(self.error_expected(SyntaxKind::CaseKeyword)),
        };
        self.parse_expected(SyntaxKind::ColonToken)?;
        let list_pos = self.prev_token_end;
        let mut consequent = Vec::new();
        while !matches!(
            self.token(),
            SyntaxKind::CaseKeyword
                | SyntaxKind::DefaultKeyword
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::EndOfFileToken
        ) {
            consequent.push(self.parse_statement()?);
        }
        let consequent = NodeArena::list_slot(consequent, list_pos, self.prev_token_end);
        Ok(self.finish_node(NodeKind::SwitchCase, pos, [test.into(), consequent]))
    }

    fn parse_throw_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;
        if self.has_preceding_line_break() {
            return Err(self.error_at_current_token(
                diagnostic_messages::LINE_BREAK_NOT_PERMITTED_HERE,
                &[],
            ));
        }
        let argument = self.parse_expression()?;
        self.parse_semicolon()?;
        Ok(self.finish_node(NodeKind::ThrowStatement, pos, [argument.into()]))
    }

    fn parse_try_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;
        let block = self.parse_block_statement()?;

        let handler = if self.is_token(SyntaxKind::CatchKeyword) {
            let catch_pos = self.token_pos();
            self.next_token()?;
            self.parse_expected(SyntaxKind::OpenParenToken)?;
            let param = self.parse_binding_target(false)?;
            self.parse_expected(SyntaxKind::CloseParenToken)?;
            let body = self.parse_block_statement()?;
            self.finish_node(NodeKind::CatchClause, catch_pos, [param.into(), body.into()])
        } else {
            NodeIndex::NONE
        };

        let finalizer = if self.parse_optional(SyntaxKind::FinallyKeyword)? {
            self.parse_block_statement()?
        } else {
            NodeIndex::NONE
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.error_expected(SyntaxKind::CatchKeyword));
        }
        Ok(self.finish_node(
            NodeKind::TryStatement,
            pos,
            [block.into(), handler.into(), finalizer.into()],
        ))
    }

    // =========================================================================
    // Modules
    // =========================================================================

    fn parse_import_declaration(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;

        if self.is_token(SyntaxKind::StringLiteral) {
            let source = self.parse_string_literal()?;
            self.parse_semicolon()?;
            return Ok(self.finish_node(
                NodeKind::ImportDeclaration,
                pos,
                [Slot::Absent, source.into()],
            ));
        }

        if self.is_token(SyntaxKind::TypeKeyword) && self.look_ahead_is_type_import() {
            return Err(self.error_at_current_token(
                diagnostic_messages::TYPE_IMPORT_UNSUPPORTED,
                &[],
            ));
        }

        let list_pos = self.token_pos();
        let mut specifiers = Vec::new();
        if self.is_identifier() {
            let local_pos = self.token_pos();
            let local = self.parse_identifier()?;
            specifiers.push(self.finish_node(
                NodeKind::ImportDefaultSpecifier,
                local_pos,
                [local.into()],
            ));
            if !self.parse_optional(SyntaxKind::CommaToken)? {
                return self.finish_import(pos, specifiers, list_pos);
            }
        }

        match self.token() {
            SyntaxKind::AsteriskToken => {
                let star_pos = self.token_pos();
                self.next_token()?;
                self.parse_expected(SyntaxKind::AsKeyword)?;
                let local = self.parse_identifier()?;
                specifiers.push(self.finish_node(
                    NodeKind::ImportNamespaceSpecifier,
                    star_pos,
                    [local.into()],
                ));
            }
            SyntaxKind::OpenBraceToken => {
                self.next_token()?;
                while !self.is_token(SyntaxKind::CloseBraceToken) {
                    specifiers.push(self.parse_import_specifier()?);
                    if !self.parse_optional(SyntaxKind::CommaToken)? {
                        break;
                    }
                }
                self.parse_expected(SyntaxKind::CloseBraceToken)?;
            }
            _ => return Err(self.error_expected(SyntaxKind::OpenBraceToken)),
        }
        self.finish_import(pos, specifiers, list_pos)
    }

    fn finish_import(
        &mut self,
        pos: u32,
        specifiers: Vec<NodeIndex>,
        list_pos: u32,
    ) -> ParseResult<NodeIndex> {
        let specifiers = NodeArena::list_slot(specifiers, list_pos, self.prev_token_end);
        self.parse_expected(SyntaxKind::FromKeyword)?;
        let source = self.parse_string_literal()?;
        self.parse_semicolon()?;
        Ok(self.finish_node(NodeKind::ImportDeclaration, pos, [specifiers, source.into()]))
    }

    /// `import type X`, `import type {`, `import type *`, as opposed to a
    /// default import that happens to be named `type`.
    fn look_ahead_is_type_import(&mut self) -> bool {
        self.look_ahead_is(|token| {
            matches!(token, SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken)
                || (token.is_identifier_like() && token != SyntaxKind::FromKeyword)
        })
    }

    fn parse_import_specifier(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let name = self.parse_identifier_name()?;
        let (imported, local) = if self.parse_optional(SyntaxKind::AsKeyword)? {
            (name, self.parse_identifier()?)
        } else {
            (NodeIndex::NONE, name)
        };
        Ok(self.finish_node(NodeKind::ImportSpecifier, pos, [imported.into(), local.into()]))
    }

    fn parse_export_declaration(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;

        match self.token() {
            SyntaxKind::DefaultKeyword => {
                self.next_token()?;
                let declaration = match self.token() {
                    SyntaxKind::FunctionKeyword => {
                        let inner = self.token_pos();
                        self.parse_function_declaration(inner, true)?
                    }
                    SyntaxKind::AsyncKeyword if self.look_ahead_is_async_function() => {
                        let inner = self.token_pos();
                        self.parse_function_declaration(inner, true)?
                    }
                    SyntaxKind::ClassKeyword => {
                        let inner = self.token_pos();
                        self.parse_class(NodeKind::ClassDeclaration, inner, true)?
                    }
                    _ => {
                        let expression = self.parse_assignment_expression()?;
                        self.parse_semicolon()?;
                        expression
                    }
                };
                Ok(self.finish_node(
                    NodeKind::ExportDefaultDeclaration,
                    pos,
                    [declaration.into()],
                ))
            }
            SyntaxKind::AsteriskToken => {
                self.next_token()?;
                self.parse_expected(SyntaxKind::FromKeyword)?;
                let source = self.parse_string_literal()?;
                self.parse_semicolon()?;
                Ok(self.finish_node(NodeKind::ExportAllDeclaration, pos, [source.into()]))
            }
            SyntaxKind::OpenBraceToken => {
                let list_pos = self.token_pos();
                self.next_token()?;
                let mut specifiers = Vec::new();
                while !self.is_token(SyntaxKind::CloseBraceToken) {
                    specifiers.push(self.parse_export_specifier()?);
                    if !self.parse_optional(SyntaxKind::CommaToken)? {
                        break;
                    }
                }
                self.parse_expected(SyntaxKind::CloseBraceToken)?;
                let specifiers = NodeArena::list_slot(specifiers, list_pos, self.prev_token_end);
                let source = if self.parse_optional(SyntaxKind::FromKeyword)? {
                    self.parse_string_literal()?
                } else {
                    NodeIndex::NONE
                };
                self.parse_semicolon()?;
                Ok(self.finish_node(
                    NodeKind::ExportNamedDeclaration,
                    pos,
                    [Slot::Absent, specifiers, source.into()],
                ))
            }
            SyntaxKind::TypeKeyword => self.parse_type_alias(pos, NodeFlags::EXPORTED),
            SyntaxKind::InterfaceKeyword => {
                self.parse_interface_declaration(pos, NodeFlags::EXPORTED)
            }
            _ => {
                let declaration = match self.token() {
                    SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => {
                        self.parse_variable_statement()?
                    }
                    SyntaxKind::FunctionKeyword => {
                        let inner = self.token_pos();
                        self.parse_function_declaration(inner, false)?
                    }
                    SyntaxKind::AsyncKeyword if self.look_ahead_is_async_function() => {
                        let inner = self.token_pos();
                        self.parse_function_declaration(inner, false)?
                    }
                    SyntaxKind::ClassKeyword => {
                        let inner = self.token_pos();
                        self.parse_class(NodeKind::ClassDeclaration, inner, false)?
                    }
                    _ => return Err(self.error_unexpected()),
                };
                Ok(self.finish_node(
                    NodeKind::ExportNamedDeclaration,
                    pos,
                    [declaration.into(), Slot::Absent, Slot::Absent],
                ))
            }
        }
    }

    fn parse_export_specifier(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let local = self.parse_identifier_name()?;
        let exported = if self.parse_optional(SyntaxKind::AsKeyword)? {
            self.parse_identifier_name()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.finish_node(NodeKind::ExportSpecifier, pos, [local.into(), exported.into()]))
    }

    // =========================================================================
    // Flow declarations
    // =========================================================================

    /// `type Name<T> = Type;`. `pos` covers a leading `export` or `declare`.
    pub(crate) fn parse_type_alias(&mut self, pos: u32, flags: NodeFlags) -> ParseResult<NodeIndex> {
        self.parse_expected(SyntaxKind::TypeKeyword)?;
        let id = self.parse_identifier()?;
        let type_parameters = self.parse_type_parameters_opt()?;
        self.parse_expected(SyntaxKind::EqualsToken)?;
        let right = self.parse_type()?;
        self.parse_semicolon()?;
        let node = self.finish_node(
            NodeKind::TypeAlias,
            pos,
            [id.into(), type_parameters.into(), right.into()],
        );
        self.set_flags(node, flags);
        Ok(node)
    }

    /// `interface Name<T> extends A, B { ... }`.
    pub(crate) fn parse_interface_declaration(
        &mut self,
        pos: u32,
        flags: NodeFlags,
    ) -> ParseResult<NodeIndex> {
        self.parse_expected(SyntaxKind::InterfaceKeyword)?;
        let id = self.parse_identifier()?;
        let type_parameters = self.parse_type_parameters_opt()?;
        let extends = self.parse_interface_extends_opt()?;
        let body = self.parse_object_type(false)?;
        let node = self.finish_node(
            NodeKind::InterfaceDeclaration,
            pos,
            [id.into(), type_parameters.into(), extends, body.into()],
        );
        self.set_flags(node, flags);
        Ok(node)
    }

    /// `extends A<T>, B.C` on interfaces and declared classes.
    fn parse_interface_extends_opt(&mut self) -> ParseResult<Slot> {
        if !self.is_token(SyntaxKind::ExtendsKeyword) {
            return Ok(Slot::Absent);
        }
        let list_pos = self.token_pos();
        self.next_token()?;
        let mut extends = Vec::new();
        loop {
            let pos = self.token_pos();
            let id = self.parse_qualified_type_name()?;
            let type_parameters = self.parse_type_arguments_opt()?;
            extends.push(self.finish_node(
                NodeKind::InterfaceExtends,
                pos,
                [id.into(), type_parameters.into()],
            ));
            if !self.parse_optional(SyntaxKind::CommaToken)? {
                break;
            }
        }
        Ok(NodeArena::list_slot(extends, list_pos, self.prev_token_end))
    }

    fn parse_declare_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;

        match self.token() {
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => {
                self.next_token()?;
                let id = self.parse_binding_identifier(false)?;
                self.parse_semicolon()?;
                Ok(self.finish_node(NodeKind::DeclareVariable, pos, [id.into()]))
            }
            SyntaxKind::FunctionKeyword => {
                self.next_token()?;
                let id = self.parse_declared_function_id()?;
                self.parse_semicolon()?;
                Ok(self.finish_node(NodeKind::DeclareFunction, pos, [id.into()]))
            }
            SyntaxKind::ClassKeyword => {
                self.next_token()?;
                let id = self.parse_identifier()?;
                let type_parameters = self.parse_type_parameters_opt()?;
                let extends = self.parse_interface_extends_opt()?;
                let body = self.parse_object_type(true)?;
                Ok(self.finish_node(
                    NodeKind::DeclareClass,
                    pos,
                    [id.into(), type_parameters.into(), extends, body.into()],
                ))
            }
            SyntaxKind::ModuleKeyword => {
                self.next_token()?;
                let id = if self.is_token(SyntaxKind::StringLiteral) {
                    self.parse_string_literal()?
                } else {
                    self.parse_identifier()?
                };
                let body = self.parse_block_statement()?;
                Ok(self.finish_node(NodeKind::DeclareModule, pos, [id.into(), body.into()]))
            }
            SyntaxKind::TypeKeyword => self.parse_type_alias(pos, NodeFlags::DECLARED),
            SyntaxKind::InterfaceKeyword => {
                self.parse_interface_declaration(pos, NodeFlags::DECLARED)
            }
            _ => Err(self.error_unexpected()),
        }
    }

    /// `name<T>(params): R` of `declare function`: an identifier whose
    /// annotation is the function's type.
    fn parse_declared_function_id(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        if !self.is_identifier() {
            return Err(
                self.error_at_current_token(diagnostic_messages::IDENTIFIER_EXPECTED, &[])
            );
        }
        let atom = self.scanner.get_token_atom();
        self.next_token()?;

        let type_pos = self.token_pos();
        let function_type = self.parse_function_type_after_name()?;
        let annotation = self.finish_node(NodeKind::TypeAnnotation, type_pos, [function_type.into()]);
        let id = self.finish_node(NodeKind::Identifier, pos, [Slot::Absent, annotation.into()]);
        if let Some(node) = self.arena.get_mut(id) {
            node.atom = atom;
        }
        Ok(id)
    }
}

/// Context flags to set and clear for the body of a function.
pub(crate) fn function_context(is_async: bool, is_generator: bool) -> (u32, u32) {
    let mut set = 0;
    if is_async {
        set |= CONTEXT_FLAG_ASYNC;
    }
    if is_generator {
        set |= CONTEXT_FLAG_GENERATOR;
    }
    let clear = (CONTEXT_FLAG_ASYNC | CONTEXT_FLAG_GENERATOR | CONTEXT_FLAG_DISALLOW_IN) & !set;
    (set, clear)
}
