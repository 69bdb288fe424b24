//! Scanner state machine.
//!
//! `ScannerState` produces one token per `scan()` call. A few tokens depend on
//! the parser's context and are re-scanned on request:
//!
//! - `/` and `/=` become a regular expression via `re_scan_slash_token`;
//! - `}` continues a template via `re_scan_template_token`;
//! - `>` is always scanned alone so that nested type arguments (`A<B<C>>`)
//!   close one at a time; `re_scan_greater_token` builds `>>`, `>=`, ...
//!   when the parser is in an expression.
//!
//! Lookahead is done by `save_state` / `restore_state`, which snapshot
//! everything the scanner would otherwise mutate.

use std::sync::Arc;

use bitflags::bitflags;
use flowstrip_common::diagnostics::{DiagnosticMessage, diagnostic_messages};
use flowstrip_common::interner::{Atom, Interner};
use memchr::{memchr2, memchr3, memmem};

use crate::char_codes::{
    LINE_SEPARATOR, PARAGRAPH_SEPARATOR, is_identifier_part, is_identifier_start, is_line_break,
    is_white_space_single_line,
};
use crate::syntax_kind::{SyntaxKind, text_to_keyword};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TokenFlags: u16 {
        const PRECEDING_LINE_BREAK = 1 << 0;
        const UNTERMINATED = 1 << 1;
        /// Identifier contained a `\u` escape; it is never treated as a keyword.
        const UNICODE_ESCAPE = 1 << 2;
        const OCTAL = 1 << 3;
    }
}

/// The first lexical error seen while scanning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScannerDiagnostic {
    pub pos: u32,
    pub length: u32,
    pub message: DiagnosticMessage,
}

#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    full_start_pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
    diagnostic: Option<ScannerDiagnostic>,
}

pub struct ScannerState {
    source: Arc<str>,
    pos: usize,
    full_start_pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
    diagnostic: Option<ScannerDiagnostic>,
    interner: Interner,
}

impl ScannerState {
    pub fn new(source: Arc<str>) -> Self {
        let mut interner = Interner::new();
        interner.intern_common();
        ScannerState {
            source,
            pos: 0,
            full_start_pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: TokenFlags::empty(),
            diagnostic: None,
            interner,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn source_text(&self) -> &str {
        &self.source
    }

    pub fn source_text_arc(&self) -> Arc<str> {
        Arc::clone(&self.source)
    }

    #[inline]
    pub fn get_token(&self) -> SyntaxKind {
        self.token
    }

    /// Start of the current token, after leading trivia.
    #[inline]
    pub fn get_token_start(&self) -> u32 {
        self.token_start as u32
    }

    /// End of the current token.
    #[inline]
    pub fn get_token_end(&self) -> u32 {
        self.pos as u32
    }

    /// Start of the trivia preceding the current token.
    #[inline]
    pub fn get_token_full_start(&self) -> u32 {
        self.full_start_pos as u32
    }

    /// Identifier name, or the raw text of a literal token.
    #[inline]
    pub fn get_token_value_ref(&self) -> &str {
        &self.token_value
    }

    /// Exact source text of the current token.
    pub fn get_token_text(&self) -> &str {
        self.source
            .get(self.token_start..self.pos)
            .unwrap_or_default()
    }

    #[inline]
    pub fn get_token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    #[inline]
    pub fn is_unterminated(&self) -> bool {
        self.token_flags.contains(TokenFlags::UNTERMINATED)
    }

    /// Intern the current token value.
    pub fn get_token_atom(&mut self) -> Atom {
        self.interner.intern(&self.token_value)
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Move the interner out, leaving an empty one behind.
    pub fn take_interner(&mut self) -> Interner {
        std::mem::take(&mut self.interner)
    }

    /// The first lexical error, if any. Cleared by the call.
    pub fn take_diagnostic(&mut self) -> Option<ScannerDiagnostic> {
        self.diagnostic.take()
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            full_start_pos: self.full_start_pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            diagnostic: self.diagnostic,
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.full_start_pos = snapshot.full_start_pos;
        self.token_start = snapshot.token_start;
        self.token = snapshot.token;
        self.token_value = snapshot.token_value;
        self.token_flags = snapshot.token_flags;
        self.diagnostic = snapshot.diagnostic;
    }

    // =========================================================================
    // Character helpers
    // =========================================================================

    #[inline]
    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.source.as_bytes().get(pos).copied()
    }

    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        self.source.get(pos..).and_then(|rest| rest.chars().next())
    }

    fn error(&mut self, message: DiagnosticMessage, pos: usize, length: usize) {
        if self.diagnostic.is_none() {
            self.diagnostic = Some(ScannerDiagnostic {
                pos: pos as u32,
                length: length as u32,
                message,
            });
        }
    }

    #[inline]
    fn finish(&mut self, kind: SyntaxKind, length: usize) -> SyntaxKind {
        self.pos += length;
        self.token = kind;
        kind
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Skip a `#!` line at the very start of the file.
    pub fn scan_shebang_trivia(&mut self) {
        if self.pos == 0 && self.source.starts_with("#!") {
            self.pos = self.find_line_end(2);
        }
    }

    /// Scan the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.full_start_pos = self.pos;
        self.token_flags = TokenFlags::empty();
        self.token_value.clear();

        loop {
            self.token_start = self.pos;
            let Some(ch) = self.char_at(self.pos) else {
                self.token = SyntaxKind::EndOfFileToken;
                return self.token;
            };
            let next = self.byte_at(self.pos + 1);
            let after = self.byte_at(self.pos + 2);

            return match ch {
                '\n' | '\r' | LINE_SEPARATOR | PARAGRAPH_SEPARATOR => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.pos += ch.len_utf8();
                    continue;
                }
                '/' => match next {
                    Some(b'/') => {
                        self.pos = self.find_line_end(self.pos + 2);
                        continue;
                    }
                    Some(b'*') => {
                        self.skip_block_comment();
                        continue;
                    }
                    Some(b'=') => self.finish(SyntaxKind::SlashEqualsToken, 2),
                    _ => self.finish(SyntaxKind::SlashToken, 1),
                },
                c if is_white_space_single_line(c) => {
                    self.pos += c.len_utf8();
                    continue;
                }
                '{' => self.finish(SyntaxKind::OpenBraceToken, 1),
                '}' => self.finish(SyntaxKind::CloseBraceToken, 1),
                '(' => self.finish(SyntaxKind::OpenParenToken, 1),
                ')' => self.finish(SyntaxKind::CloseParenToken, 1),
                '[' => self.finish(SyntaxKind::OpenBracketToken, 1),
                ']' => self.finish(SyntaxKind::CloseBracketToken, 1),
                ';' => self.finish(SyntaxKind::SemicolonToken, 1),
                ',' => self.finish(SyntaxKind::CommaToken, 1),
                ':' => self.finish(SyntaxKind::ColonToken, 1),
                '?' => self.finish(SyntaxKind::QuestionToken, 1),
                '~' => self.finish(SyntaxKind::TildeToken, 1),
                '.' => match next {
                    Some(b'0'..=b'9') => self.scan_number(),
                    Some(b'.') if after == Some(b'.') => {
                        self.finish(SyntaxKind::DotDotDotToken, 3)
                    }
                    _ => self.finish(SyntaxKind::DotToken, 1),
                },
                '<' => match (next, after) {
                    (Some(b'<'), Some(b'=')) => {
                        self.finish(SyntaxKind::LessThanLessThanEqualsToken, 3)
                    }
                    (Some(b'<'), _) => self.finish(SyntaxKind::LessThanLessThanToken, 2),
                    (Some(b'='), _) => self.finish(SyntaxKind::LessThanEqualsToken, 2),
                    _ => self.finish(SyntaxKind::LessThanToken, 1),
                },
                '>' => self.finish(SyntaxKind::GreaterThanToken, 1),
                '=' => match (next, after) {
                    (Some(b'='), Some(b'=')) => self.finish(SyntaxKind::EqualsEqualsEqualsToken, 3),
                    (Some(b'='), _) => self.finish(SyntaxKind::EqualsEqualsToken, 2),
                    (Some(b'>'), _) => self.finish(SyntaxKind::EqualsGreaterThanToken, 2),
                    _ => self.finish(SyntaxKind::EqualsToken, 1),
                },
                '!' => match (next, after) {
                    (Some(b'='), Some(b'=')) => {
                        self.finish(SyntaxKind::ExclamationEqualsEqualsToken, 3)
                    }
                    (Some(b'='), _) => self.finish(SyntaxKind::ExclamationEqualsToken, 2),
                    _ => self.finish(SyntaxKind::ExclamationToken, 1),
                },
                '+' => match next {
                    Some(b'+') => self.finish(SyntaxKind::PlusPlusToken, 2),
                    Some(b'=') => self.finish(SyntaxKind::PlusEqualsToken, 2),
                    _ => self.finish(SyntaxKind::PlusToken, 1),
                },
                '-' => match next {
                    Some(b'-') => self.finish(SyntaxKind::MinusMinusToken, 2),
                    Some(b'=') => self.finish(SyntaxKind::MinusEqualsToken, 2),
                    _ => self.finish(SyntaxKind::MinusToken, 1),
                },
                '*' => match (next, after) {
                    (Some(b'*'), Some(b'=')) => {
                        self.finish(SyntaxKind::AsteriskAsteriskEqualsToken, 3)
                    }
                    (Some(b'*'), _) => self.finish(SyntaxKind::AsteriskAsteriskToken, 2),
                    (Some(b'='), _) => self.finish(SyntaxKind::AsteriskEqualsToken, 2),
                    _ => self.finish(SyntaxKind::AsteriskToken, 1),
                },
                '%' => match next {
                    Some(b'=') => self.finish(SyntaxKind::PercentEqualsToken, 2),
                    _ => self.finish(SyntaxKind::PercentToken, 1),
                },
                '&' => match next {
                    Some(b'&') => self.finish(SyntaxKind::AmpersandAmpersandToken, 2),
                    Some(b'=') => self.finish(SyntaxKind::AmpersandEqualsToken, 2),
                    _ => self.finish(SyntaxKind::AmpersandToken, 1),
                },
                '|' => match next {
                    Some(b'|') => self.finish(SyntaxKind::BarBarToken, 2),
                    Some(b'=') => self.finish(SyntaxKind::BarEqualsToken, 2),
                    _ => self.finish(SyntaxKind::BarToken, 1),
                },
                '^' => match next {
                    Some(b'=') => self.finish(SyntaxKind::CaretEqualsToken, 2),
                    _ => self.finish(SyntaxKind::CaretToken, 1),
                },
                '"' | '\'' => self.scan_string(ch as u8),
                '`' => {
                    self.pos += 1;
                    self.scan_template(true)
                }
                '0'..='9' => self.scan_number(),
                '\\' => self.scan_identifier(),
                c if is_identifier_start(c) => self.scan_identifier(),
                c => {
                    self.error(
                        diagnostic_messages::INVALID_CHARACTER,
                        self.pos,
                        c.len_utf8(),
                    );
                    self.finish(SyntaxKind::Unknown, c.len_utf8())
                }
            };
        }
    }

    /// Offset of the next line terminator at or after `from` (or end of text).
    fn find_line_end(&self, from: usize) -> usize {
        let bytes = self.source.as_bytes();
        let mut at = from;
        while let Some(found) = bytes.get(at..).and_then(|rest| memchr3(b'\n', b'\r', 0xE2, rest))
        {
            let index = at + found;
            if bytes[index] != 0xE2
                || (bytes.get(index + 1) == Some(&0x80)
                    && matches!(bytes.get(index + 2), Some(0xA8 | 0xA9)))
            {
                return index;
            }
            at = index + 1;
        }
        bytes.len()
    }

    fn skip_block_comment(&mut self) {
        let body_start = self.pos + 2;
        let rest = self.source.as_bytes().get(body_start..).unwrap_or_default();
        let (body_end, comment_end) = match memmem::find(rest, b"*/") {
            Some(found) => (body_start + found, body_start + found + 2),
            None => {
                self.error(diagnostic_messages::COMMENT_NOT_TERMINATED, self.source.len(), 0);
                (self.source.len(), self.source.len())
            }
        };
        let body = &self.source[body_start..body_end];
        if memchr2(b'\n', b'\r', body.as_bytes()).is_some()
            || body.contains([LINE_SEPARATOR, PARAGRAPH_SEPARATOR])
        {
            self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
        }
        self.pos = comment_end;
    }

    fn scan_string(&mut self, quote: u8) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.byte_at(self.pos) {
                None | Some(b'\n' | b'\r') => {
                    self.token_flags |= TokenFlags::UNTERMINATED;
                    self.error(
                        diagnostic_messages::UNTERMINATED_STRING_LITERAL,
                        start,
                        self.pos - start,
                    );
                    break;
                }
                Some(b) if b == quote => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    self.skip_escaped_char();
                }
                Some(_) => self.pos += 1,
            }
        }
        let close = if self.is_unterminated() { self.pos } else { self.pos - 1 };
        self.token_value.push_str(&self.source[start + 1..close]);
        self.token = SyntaxKind::StringLiteral;
        self.token
    }

    /// Skip the character after a backslash; `\r\n` counts as one.
    fn skip_escaped_char(&mut self) {
        match self.char_at(self.pos) {
            Some('\r') if self.byte_at(self.pos + 1) == Some(b'\n') => self.pos += 2,
            Some(c) => self.pos += c.len_utf8(),
            None => {}
        }
    }

    /// Scan template text after a `` ` `` or a `}`.
    fn scan_template(&mut self, started_with_backtick: bool) -> SyntaxKind {
        let text_start = self.pos;
        let kind = loop {
            match self.byte_at(self.pos) {
                None => {
                    self.token_flags |= TokenFlags::UNTERMINATED;
                    self.error(
                        diagnostic_messages::UNTERMINATED_TEMPLATE_LITERAL,
                        self.token_start,
                        self.pos - self.token_start,
                    );
                    break if started_with_backtick {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                }
                Some(b'`') => {
                    self.pos += 1;
                    break if started_with_backtick {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                }
                Some(b'$') if self.byte_at(self.pos + 1) == Some(b'{') => {
                    self.pos += 2;
                    break if started_with_backtick {
                        SyntaxKind::TemplateHead
                    } else {
                        SyntaxKind::TemplateMiddle
                    };
                }
                Some(b'\\') => {
                    self.pos += 1;
                    self.skip_escaped_char();
                }
                Some(_) => self.pos += 1,
            }
        };
        self.token_value.clear();
        self.token_value
            .push_str(self.source.get(text_start..self.pos).unwrap_or_default());
        self.token = kind;
        kind
    }

    fn scan_digits(&mut self, radix: u32) -> usize {
        let start = self.pos;
        while let Some(b) = self.byte_at(self.pos) {
            if (b as char).is_digit(radix) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.pos - start
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let first = self.byte_at(self.pos);
        let radix = match (first, self.byte_at(self.pos + 1)) {
            (Some(b'0'), Some(b'x' | b'X')) => Some(16),
            (Some(b'0'), Some(b'o' | b'O')) => Some(8),
            (Some(b'0'), Some(b'b' | b'B')) => Some(2),
            _ => None,
        };

        if let Some(radix) = radix {
            self.pos += 2;
            if self.scan_digits(radix) == 0 {
                let message = if radix == 16 {
                    diagnostic_messages::HEXADECIMAL_DIGIT_EXPECTED
                } else {
                    diagnostic_messages::DIGIT_EXPECTED
                };
                self.error(message, self.pos, 0);
            }
        } else if first == Some(b'0') && matches!(self.byte_at(self.pos + 1), Some(b'0'..=b'9')) {
            // Legacy octal, or a decimal with a leading zero if it has 8 or 9.
            self.pos += 1;
            self.scan_digits(10);
            let digits = &self.source[start..self.pos];
            if digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
                self.token_flags |= TokenFlags::OCTAL;
            } else {
                self.scan_decimal_tail();
            }
        } else {
            self.scan_digits(10);
            self.scan_decimal_tail();
        }

        if let Some(c) = self.char_at(self.pos)
            && (is_identifier_start(c) || c.is_ascii_digit())
        {
            self.error(diagnostic_messages::INVALID_CHARACTER, self.pos, c.len_utf8());
        }

        self.token_value.push_str(&self.source[start..self.pos]);
        self.token = SyntaxKind::NumericLiteral;
        self.token
    }

    /// Fraction and exponent of a decimal literal.
    fn scan_decimal_tail(&mut self) {
        if self.byte_at(self.pos) == Some(b'.') {
            self.pos += 1;
            self.scan_digits(10);
        }
        if matches!(self.byte_at(self.pos), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.byte_at(self.pos), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.scan_digits(10) == 0 {
                self.error(diagnostic_messages::DIGIT_EXPECTED, self.pos, 0);
            }
        }
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let mut first = true;
        while let Some(c) = self.char_at(self.pos) {
            if c == '\\' {
                let escape_start = self.pos;
                match self.scan_unicode_escape() {
                    Some(cooked) if (first && is_identifier_start(cooked)) || (!first && is_identifier_part(cooked)) => {
                        self.token_flags |= TokenFlags::UNICODE_ESCAPE;
                        self.token_value.push(cooked);
                    }
                    _ => {
                        self.error(
                            diagnostic_messages::INVALID_CHARACTER,
                            escape_start,
                            (self.pos - escape_start).max(1),
                        );
                        if self.pos == escape_start {
                            self.pos += 1;
                        }
                    }
                }
            } else if (first && is_identifier_start(c)) || (!first && is_identifier_part(c)) {
                self.token_value.push(c);
                self.pos += c.len_utf8();
            } else {
                break;
            }
            first = false;
        }

        self.token = if self.token_flags.contains(TokenFlags::UNICODE_ESCAPE) {
            SyntaxKind::Identifier
        } else {
            text_to_keyword(&self.token_value).unwrap_or(SyntaxKind::Identifier)
        };
        self.token
    }

    /// Decode `\uXXXX` or `\u{X...}` at the current position.
    fn scan_unicode_escape(&mut self) -> Option<char> {
        if self.byte_at(self.pos + 1) != Some(b'u') {
            return None;
        }
        let digits_start = self.pos + 2;
        let (digits, end) = if self.byte_at(digits_start) == Some(b'{') {
            let rest = self.source.get(digits_start + 1..)?;
            let close = rest.find('}')?;
            (&rest[..close], digits_start + 1 + close + 1)
        } else {
            (self.source.get(digits_start..digits_start + 4)?, digits_start + 4)
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        let cooked = char::from_u32(value)?;
        self.pos = end;
        Some(cooked)
    }

    // =========================================================================
    // Re-scan entry points
    // =========================================================================

    /// Re-scan a `/` or `/=` token as a regular expression literal.
    pub fn re_scan_slash_token(&mut self) -> SyntaxKind {
        if !matches!(self.token, SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken) {
            return self.token;
        }
        let mut p = self.token_start + 1;
        let mut in_class = false;
        loop {
            let Some(c) = self.char_at(p) else {
                self.unterminated_regex(p);
                break;
            };
            if is_line_break(c) {
                self.unterminated_regex(p);
                break;
            }
            match c {
                '\\' => {
                    p += 1;
                    match self.char_at(p) {
                        Some(escaped) if !is_line_break(escaped) => p += escaped.len_utf8(),
                        _ => {}
                    }
                    continue;
                }
                '/' if !in_class => {
                    p += 1;
                    break;
                }
                '[' => in_class = true,
                ']' => in_class = false,
                _ => {}
            }
            p += c.len_utf8();
        }
        if !self.is_unterminated() {
            while let Some(c) = self.char_at(p) {
                if !is_identifier_part(c) {
                    break;
                }
                p += c.len_utf8();
            }
        }
        self.pos = p;
        self.token_value.clear();
        self.token_value
            .push_str(&self.source[self.token_start..self.pos]);
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }

    fn unterminated_regex(&mut self, at: usize) {
        self.token_flags |= TokenFlags::UNTERMINATED;
        self.error(
            diagnostic_messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL,
            self.token_start,
            at - self.token_start,
        );
    }

    /// Continue a template after the `}` that closes a substitution.
    pub fn re_scan_template_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::CloseBraceToken {
            return self.token;
        }
        self.pos = self.token_start + 1;
        self.scan_template(false)
    }

    /// Combine a `>` with directly following `>` / `=` characters.
    pub fn re_scan_greater_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::GreaterThanToken {
            return self.token;
        }
        let (kind, extra) = match (
            self.byte_at(self.pos),
            self.byte_at(self.pos + 1),
            self.byte_at(self.pos + 2),
        ) {
            (Some(b'>'), Some(b'>'), Some(b'=')) => {
                (SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken, 3)
            }
            (Some(b'>'), Some(b'>'), _) => (SyntaxKind::GreaterThanGreaterThanGreaterThanToken, 2),
            (Some(b'>'), Some(b'='), _) => (SyntaxKind::GreaterThanGreaterThanEqualsToken, 2),
            (Some(b'>'), _, _) => (SyntaxKind::GreaterThanGreaterThanToken, 1),
            (Some(b'='), _, _) => (SyntaxKind::GreaterThanEqualsToken, 1),
            _ => (SyntaxKind::GreaterThanToken, 0),
        };
        self.finish(kind, extra)
    }
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod scanner_tests;
