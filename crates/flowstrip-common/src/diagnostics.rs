//! Diagnostic types and message templates.
//!
//! Parse failures are reported with a numeric code and a message template.
//! Templates use `{0}`, `{1}` placeholders filled in by `format_message`.

use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Message = 3,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// A diagnostic anchored at a byte range of a source file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            file: file.into(),
            start,
            length,
            message_text: message.into(),
            category: DiagnosticCategory::Error,
            code,
        }
    }
}

macro_rules! diagnostic_messages {
    ($($name:ident = ($code:expr, $text:expr);)+) => {
        pub mod diagnostic_messages {
            use super::{DiagnosticCategory, DiagnosticMessage};
            $(
                pub const $name: DiagnosticMessage = DiagnosticMessage {
                    code: $code,
                    category: DiagnosticCategory::Error,
                    message: $text,
                };
            )+
        }

        pub mod diagnostic_codes {
            $(pub const $name: u32 = $code;)+
        }

        /// Every message known to the compiler.
        pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
            $(diagnostic_messages::$name,)+
        ];
    };
}

diagnostic_messages! {
    UNTERMINATED_STRING_LITERAL = (1002, "Unterminated string literal.");
    IDENTIFIER_EXPECTED = (1003, "Identifier expected.");
    TOKEN_EXPECTED = (1005, "'{0}' expected.");
    COMMENT_NOT_TERMINATED = (1010, "'*/' expected.");
    UNEXPECTED_TOKEN = (1012, "Unexpected token.");
    REST_PARAMETER_MUST_BE_LAST = (1014, "A rest parameter must be last in a parameter list.");
    DIGIT_EXPECTED = (1124, "Digit expected.");
    HEXADECIMAL_DIGIT_EXPECTED = (1125, "Hexadecimal digit expected.");
    UNEXPECTED_END_OF_TEXT = (1126, "Unexpected end of text.");
    INVALID_CHARACTER = (1127, "Invalid character.");
    DECLARATION_OR_STATEMENT_EXPECTED = (1128, "Declaration or statement expected.");
    EXPRESSION_EXPECTED = (1109, "Expression expected.");
    TYPE_EXPECTED = (1110, "Type expected.");
    PROPERTY_ASSIGNMENT_EXPECTED = (1136, "Property assignment expected.");
    UNTERMINATED_TEMPLATE_LITERAL = (1160, "Unterminated template literal.");
    UNTERMINATED_REGULAR_EXPRESSION_LITERAL = (1161, "Unterminated regular expression literal.");
    INVALID_ASSIGNMENT_TARGET = (2364, "The left-hand side of an assignment expression must be a variable or a property access.");
    LINE_BREAK_NOT_PERMITTED_HERE = (1142, "Line break not permitted here.");
    MAXIMUM_NESTING_DEPTH_EXCEEDED = (9001, "Maximum nesting depth of {0} exceeded.");
    CLASS_PROPERTY_INITIALIZER_UNSUPPORTED = (9002, "Class property initializers are not supported; declare the property with a type annotation only.");
    TYPE_CAST_UNSUPPORTED = (9003, "Type cast expressions are not supported.");
    TYPE_IMPORT_UNSUPPORTED = (9004, "'import type' declarations are not supported.");
    TYPE_DECLARATION_NOT_ALLOWED_HERE = (9005, "Type declarations are only allowed directly inside a block or program body.");
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod diagnostics_tests;
