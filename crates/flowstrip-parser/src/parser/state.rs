//! Parser state: token handling, errors, speculation and node construction.
//!
//! The parser is a recursive-descent parser that stops at the first error.
//! It never recovers: a `ParseError` means no tree at all.

use std::sync::Arc;

use super::base::NodeIndex;
use super::node::{ArenaMark, NodeArena, NodeFlags, Slot};
use super::node_kind::NodeKind;
use super::parse_rules::look_ahead_is;
use flowstrip_common::diagnostics::{
    Diagnostic, DiagnosticMessage, diagnostic_messages, format_message,
};
use flowstrip_common::limits::{MAX_PARSER_RECURSION_DEPTH, SOURCE_BYTES_PER_NODE};
use flowstrip_common::position::LineMap;
use flowstrip_scanner::{ScannerSnapshot, ScannerState, SyntaxKind};
use tracing::debug;

/// Inside an async function or async arrow: `await` is an operator.
pub(crate) const CONTEXT_FLAG_ASYNC: u32 = 1 << 0;
/// Inside a generator: `yield` is an operator.
pub(crate) const CONTEXT_FLAG_GENERATOR: u32 = 1 << 1;
/// In a `for` head initializer, where `in` ends the expression.
pub(crate) const CONTEXT_FLAG_DISALLOW_IN: u32 = 1 << 2;
/// At the tail of a conditional's consequent, where a `:` belongs to the
/// conditional rather than to an arrow return type.
pub(crate) const CONTEXT_FLAG_IN_CONDITIONAL_TRUE: u32 = 1 << 3;

/// File name used when the caller does not name the source.
pub const DEFAULT_SOURCE_FILE_NAME: &str = "source.js";

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    /// Name reported in parse errors.
    pub source_file_name: Option<String>,
}

/// Malformed input. Carries the position of the offending token.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{file_name}:{line}:{column}: {message}")]
pub struct ParseError {
    pub file_name: String,
    /// Byte offset of the error.
    pub pos: u32,
    pub length: u32,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, in UTF-16 code units.
    pub column: u32,
    pub code: u32,
    pub message: String,
}

impl ParseError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(
            self.file_name.clone(),
            self.pos,
            self.length,
            self.message.clone(),
            self.code,
        )
    }
}

/// A parsed tree together with the text it was parsed from.
#[derive(Clone, Debug)]
pub struct ParsedSource {
    pub arena: NodeArena,
    pub root: NodeIndex,
    source: Arc<str>,
    file_name: Option<String>,
}

impl ParsedSource {
    pub fn source_text(&self) -> &str {
        &self.source
    }

    pub fn source_file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }
}

/// Parse `source` into a tree.
pub fn parse(source: &str, options: &ParseOptions) -> Result<ParsedSource, ParseError> {
    let file_name = options
        .source_file_name
        .clone()
        .unwrap_or_else(|| DEFAULT_SOURCE_FILE_NAME.to_string());
    let _span = tracing::debug_span!("parse", file = file_name.as_str(), bytes = source.len()).entered();

    let mut parser = ParserState::new(file_name, source.to_string());
    let root = parser.parse_source_file()?;
    let source = parser.scanner.source_text_arc();
    let arena = parser.into_arena();
    debug!(nodes = arena.len(), "parsed");
    Ok(ParsedSource {
        arena,
        root,
        source,
        file_name: options.source_file_name.clone(),
    })
}

#[derive(Clone, Debug)]
pub(crate) struct ParserSnapshot {
    scanner: ScannerSnapshot,
    current_token: SyntaxKind,
    prev_token_end: u32,
    context_flags: u32,
    mark: ArenaMark,
}

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: NodeArena,
    pub(crate) file_name: String,
    pub(crate) current_token: SyntaxKind,
    /// End of the most recently consumed token; the end of every node.
    pub(crate) prev_token_end: u32,
    pub(crate) context_flags: u32,
    recursion_depth: u32,
}

impl ParserState {
    pub fn new(file_name: String, source: String) -> ParserState {
        let capacity = source.len() / SOURCE_BYTES_PER_NODE;
        ParserState {
            scanner: ScannerState::new(Arc::from(source)),
            arena: NodeArena::with_capacity(capacity),
            file_name,
            current_token: SyntaxKind::Unknown,
            prev_token_end: 0,
            context_flags: 0,
            recursion_depth: 0,
        }
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Finish parsing and take the arena, with the identifier pool moved in.
    pub fn into_arena(mut self) -> NodeArena {
        let interner = self.scanner.take_interner();
        self.arena.set_interner(interner);
        self.arena
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.current_token
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.get_token_start()
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.get_token_end()
    }

    pub(crate) fn next_token(&mut self) -> ParseResult<SyntaxKind> {
        self.prev_token_end = self.scanner.get_token_end();
        self.current_token = self.scanner.scan();
        self.check_scanner()?;
        Ok(self.current_token)
    }

    fn check_scanner(&mut self) -> ParseResult<()> {
        match self.scanner.take_diagnostic() {
            Some(diagnostic) => Err(self.error_at(
                diagnostic.pos,
                diagnostic.length,
                diagnostic.message,
                &[],
            )),
            None => Ok(()),
        }
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> ParseResult<()> {
        if self.is_token(kind) {
            self.next_token()?;
            Ok(())
        } else {
            Err(self.error_expected(kind))
        }
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> ParseResult<bool> {
        if self.is_token(kind) {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Automatic semicolon insertion applies here.
    pub(crate) fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.current_token,
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.scanner.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) -> ParseResult<()> {
        if self.is_token(SyntaxKind::SemicolonToken) {
            self.next_token()?;
            Ok(())
        } else if self.can_parse_semicolon() {
            Ok(())
        } else {
            Err(self.error_expected(SyntaxKind::SemicolonToken))
        }
    }

    /// Build `>>`, `>=`, ... from a lone `>` in expression context.
    pub(crate) fn re_scan_greater_token(&mut self) -> SyntaxKind {
        if self.current_token == SyntaxKind::GreaterThanToken {
            self.current_token = self.scanner.re_scan_greater_token();
        }
        self.current_token
    }

    pub(crate) fn re_scan_slash_token(&mut self) -> ParseResult<SyntaxKind> {
        self.current_token = self.scanner.re_scan_slash_token();
        self.check_scanner()?;
        Ok(self.current_token)
    }

    pub(crate) fn re_scan_template_token(&mut self) -> ParseResult<SyntaxKind> {
        self.current_token = self.scanner.re_scan_template_token();
        self.check_scanner()?;
        Ok(self.current_token)
    }

    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    pub(crate) fn look_ahead_is(&mut self, check: impl FnOnce(SyntaxKind) -> bool) -> bool {
        look_ahead_is(&mut self.scanner, check)
    }

    // =========================================================================
    // Errors
    // =========================================================================

    pub(crate) fn error_at(
        &self,
        pos: u32,
        length: u32,
        message: DiagnosticMessage,
        args: &[&str],
    ) -> ParseError {
        let source = self.scanner.source_text();
        let position = LineMap::build(source).position_of(pos, source);
        ParseError {
            file_name: self.file_name.clone(),
            pos,
            length,
            line: position.line + 1,
            column: position.character + 1,
            code: message.code,
            message: format_message(message.message, args),
        }
    }

    pub(crate) fn error_at_current_token(
        &self,
        message: DiagnosticMessage,
        args: &[&str],
    ) -> ParseError {
        let pos = self.token_pos();
        self.error_at(pos, self.token_end() - pos, message, args)
    }

    pub(crate) fn error_expected(&self, kind: SyntaxKind) -> ParseError {
        self.error_at_current_token(diagnostic_messages::TOKEN_EXPECTED, &[kind.describe()])
    }

    pub(crate) fn error_unexpected(&self) -> ParseError {
        if self.is_token(SyntaxKind::EndOfFileToken) {
            self.error_at_current_token(diagnostic_messages::UNEXPECTED_END_OF_TEXT, &[])
        } else {
            self.error_at_current_token(diagnostic_messages::UNEXPECTED_TOKEN, &[])
        }
    }

    // =========================================================================
    // Speculation and recursion
    // =========================================================================

    pub(crate) fn save(&self) -> ParserSnapshot {
        ParserSnapshot {
            scanner: self.scanner.save_state(),
            current_token: self.current_token,
            prev_token_end: self.prev_token_end,
            context_flags: self.context_flags,
            mark: self.arena.mark(),
        }
    }

    pub(crate) fn restore(&mut self, snapshot: ParserSnapshot) {
        self.scanner.restore_state(snapshot.scanner);
        self.current_token = snapshot.current_token;
        self.prev_token_end = snapshot.prev_token_end;
        self.context_flags = snapshot.context_flags;
        self.arena.rollback(snapshot.mark);
    }

    /// Run `f`; on failure rewind the scanner and drop any nodes it built.
    pub(crate) fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> Option<T> {
        let snapshot = self.save();
        let depth = self.recursion_depth;
        match f(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.restore(snapshot);
                self.recursion_depth = depth;
                None
            }
        }
    }

    /// Count one level of grammar nesting around `f`.
    pub(crate) fn guarded<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.recursion_depth >= MAX_PARSER_RECURSION_DEPTH {
            let limit = MAX_PARSER_RECURSION_DEPTH.to_string();
            return Err(self.error_at_current_token(
                diagnostic_messages::MAXIMUM_NESTING_DEPTH_EXCEEDED,
                &[&limit],
            ));
        }
        self.recursion_depth += 1;
        let result = f(self);
        self.recursion_depth -= 1;
        result
    }

    /// Run `f` with `set` context flags added and `clear` removed.
    pub(crate) fn with_context<T>(
        &mut self,
        set: u32,
        clear: u32,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = self.context_flags;
        self.context_flags = (saved | set) & !clear;
        let result = f(self);
        self.context_flags = saved;
        result
    }

    #[inline]
    pub(crate) fn in_context(&self, flag: u32) -> bool {
        self.context_flags & flag != 0
    }

    // =========================================================================
    // Node construction
    // =========================================================================

    /// Create a node spanning from `pos` to the end of the last consumed token.
    pub(crate) fn finish_node<I>(&mut self, kind: NodeKind, pos: u32, slots: I) -> NodeIndex
    where
        I: IntoIterator<Item = Slot>,
    {
        self.arena.add_node(kind, pos, self.prev_token_end, slots)
    }

    pub(crate) fn finish_leaf(&mut self, kind: NodeKind, pos: u32) -> NodeIndex {
        self.arena.add_leaf(kind, pos, self.prev_token_end)
    }

    pub(crate) fn set_flags(&mut self, node: NodeIndex, flags: NodeFlags) {
        if let Some(node) = self.arena.get_mut(node) {
            node.flags |= flags;
        }
    }

    pub(crate) fn set_token(&mut self, node: NodeIndex, token: SyntaxKind) {
        if let Some(node) = self.arena.get_mut(node) {
            node.token = token;
        }
    }

    pub(crate) fn node_kind(&self, node: NodeIndex) -> Option<NodeKind> {
        self.arena.kind(node)
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    /// Can the current token serve as a binding or reference name here?
    pub(crate) fn is_identifier(&self) -> bool {
        match self.current_token {
            SyntaxKind::YieldKeyword => !self.in_context(CONTEXT_FLAG_GENERATOR),
            SyntaxKind::AwaitKeyword => !self.in_context(CONTEXT_FLAG_ASYNC),
            token => token.is_identifier_like(),
        }
    }

    pub(crate) fn parse_identifier(&mut self) -> ParseResult<NodeIndex> {
        if !self.is_identifier() {
            return Err(
                self.error_at_current_token(diagnostic_messages::IDENTIFIER_EXPECTED, &[])
            );
        }
        self.parse_identifier_name()
    }

    /// Any identifier or keyword, as after `.` or in a property key.
    pub(crate) fn parse_identifier_name(&mut self) -> ParseResult<NodeIndex> {
        if !self.current_token.is_identifier_or_keyword() {
            return Err(
                self.error_at_current_token(diagnostic_messages::IDENTIFIER_EXPECTED, &[])
            );
        }
        let pos = self.token_pos();
        let atom = self.scanner.get_token_atom();
        self.next_token()?;
        let node = self.finish_leaf(NodeKind::Identifier, pos);
        if let Some(node) = self.arena.get_mut(node) {
            node.atom = atom;
        }
        Ok(node)
    }

    /// Text of the current token's value (identifier name or literal text).
    pub(crate) fn token_value(&self) -> &str {
        self.scanner.get_token_value_ref()
    }

    pub(crate) fn parse_string_literal(&mut self) -> ParseResult<NodeIndex> {
        if !self.is_token(SyntaxKind::StringLiteral) {
            return Err(self.error_expected(SyntaxKind::StringLiteral));
        }
        self.parse_literal()
    }

    /// Consume the current literal token into a `Literal` node.
    pub(crate) fn parse_literal(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let token = self.token();
        self.next_token()?;
        let node = self.finish_leaf(NodeKind::Literal, pos);
        self.set_token(node, token);
        Ok(node)
    }
}
