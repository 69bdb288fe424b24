use super::*;
use flowstrip_common::diagnostics::diagnostic_codes;

fn scanner(source: &str) -> ScannerState {
    ScannerState::new(Arc::from(source))
}

fn tokens(source: &str) -> Vec<SyntaxKind> {
    let mut scanner = scanner(source);
    let mut kinds = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            return kinds;
        }
        kinds.push(kind);
    }
}

#[test]
fn test_scan_annotated_declaration() {
    assert_eq!(
        tokens("var myNum:?number = 42;"),
        vec![
            SyntaxKind::VarKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::ColonToken,
            SyntaxKind::QuestionToken,
            SyntaxKind::Identifier,
            SyntaxKind::EqualsToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::SemicolonToken,
        ]
    );
}

#[test]
fn test_contextual_keywords_scan_as_keywords() {
    assert_eq!(
        tokens("type interface declare"),
        vec![
            SyntaxKind::TypeKeyword,
            SyntaxKind::InterfaceKeyword,
            SyntaxKind::DeclareKeyword,
        ]
    );
    assert!(SyntaxKind::TypeKeyword.is_identifier_like());
    assert!(!SyntaxKind::VarKeyword.is_identifier_like());
}

#[test]
fn test_greater_than_is_always_single() {
    assert_eq!(
        tokens("a >>= b"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::EqualsToken,
            SyntaxKind::Identifier,
        ]
    );
}

#[test]
fn test_re_scan_greater_token() {
    let mut scanner = scanner("x >>>= 1");
    scanner.scan();
    assert_eq!(scanner.scan(), SyntaxKind::GreaterThanToken);
    assert_eq!(
        scanner.re_scan_greater_token(),
        SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken
    );
    assert_eq!(scanner.get_token_text(), ">>>=");
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
}

#[test]
fn test_re_scan_slash_token_as_regex() {
    let mut scanner = scanner("/a[/]b\\//gi.test(s)");
    assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
    assert_eq!(
        scanner.re_scan_slash_token(),
        SyntaxKind::RegularExpressionLiteral
    );
    assert_eq!(scanner.get_token_text(), "/a[/]b\\//gi");
    assert_eq!(scanner.scan(), SyntaxKind::DotToken);
}

#[test]
fn test_template_with_substitutions() {
    let mut scanner = scanner("`a${x}b${y}c`");
    assert_eq!(scanner.scan(), SyntaxKind::TemplateHead);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
    assert_eq!(scanner.re_scan_template_token(), SyntaxKind::TemplateMiddle);
    assert_eq!(scanner.get_token_text(), "}b${");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
    assert_eq!(scanner.re_scan_template_token(), SyntaxKind::TemplateTail);
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}

#[test]
fn test_comments_and_line_breaks() {
    let mut scanner = scanner("a /* one\ntwo */ b // tail\nc");
    scanner.scan();
    assert!(!scanner.has_preceding_line_break());
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert!(scanner.has_preceding_line_break());
    assert_eq!(scanner.get_token_start(), 16);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert!(scanner.has_preceding_line_break());
    assert_eq!(scanner.get_token_value_ref(), "c");
}

#[test]
fn test_save_and_restore_state() {
    let mut scanner = scanner("foo bar baz");
    scanner.scan();
    let snapshot = scanner.save_state();
    scanner.scan();
    scanner.scan();
    assert_eq!(scanner.get_token_value_ref(), "baz");
    scanner.restore_state(snapshot);
    assert_eq!(scanner.get_token_value_ref(), "foo");
    scanner.scan();
    assert_eq!(scanner.get_token_value_ref(), "bar");
}

#[test]
fn test_numbers() {
    for source in ["0", "42", "3.14", ".5", "1e10", "2E-3", "0xFF", "0o17", "0b101", "017"] {
        let mut scanner = scanner(source);
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral, "{source}");
        assert_eq!(scanner.get_token_text(), source);
        assert!(scanner.take_diagnostic().is_none(), "{source}");
    }
}

#[test]
fn test_unterminated_string_reports_diagnostic() {
    let mut scanner = scanner("'abc\n");
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert!(scanner.is_unterminated());
    let diagnostic = scanner.take_diagnostic().unwrap();
    assert_eq!(
        diagnostic.message.code,
        diagnostic_codes::UNTERMINATED_STRING_LITERAL
    );
    assert_eq!(diagnostic.pos, 0);
}

#[test]
fn test_invalid_character() {
    let mut scanner = scanner("a # b");
    scanner.scan();
    assert_eq!(scanner.scan(), SyntaxKind::Unknown);
    let diagnostic = scanner.take_diagnostic().unwrap();
    assert_eq!(diagnostic.message.code, diagnostic_codes::INVALID_CHARACTER);
    assert_eq!(diagnostic.pos, 2);
}

#[test]
fn test_unicode_identifiers_and_escapes() {
    let mut scanner = scanner("café \\u0061bc");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.get_token_value_ref(), "café");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.get_token_value_ref(), "abc");
    assert!(scanner.get_token_flags().contains(TokenFlags::UNICODE_ESCAPE));
}

#[test]
fn test_shebang_is_skipped() {
    let mut scanner = scanner("#!/usr/bin/env node\nfoo");
    scanner.scan_shebang_trivia();
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert!(scanner.has_preceding_line_break());
}

#[test]
fn test_token_atoms_are_interned() {
    let mut scanner = scanner("foo foo");
    scanner.scan();
    let first = scanner.get_token_atom();
    scanner.scan();
    let second = scanner.get_token_atom();
    assert_eq!(first, second);
    assert_eq!(scanner.interner().resolve(first), "foo");
}
