//! Scanner-level lookahead rules.
//!
//! Each helper scans ahead on a snapshot and restores the scanner, leaving
//! the parser's current token untouched.

use flowstrip_scanner::{ScannerState, SyntaxKind};

/// Check the token after the current one.
pub(crate) fn look_ahead_is(
    scanner: &mut ScannerState,
    check: impl FnOnce(SyntaxKind) -> bool,
) -> bool {
    let snapshot = scanner.save_state();
    let next = scanner.scan();
    let result = check(next);
    scanner.restore_state(snapshot);
    result
}

/// Check the token after the current one, requiring it on the same line.
pub(crate) fn look_ahead_is_on_same_line(
    scanner: &mut ScannerState,
    check: impl FnOnce(SyntaxKind) -> bool,
) -> bool {
    let snapshot = scanner.save_state();
    let next = scanner.scan();
    let result = !scanner.has_preceding_line_break() && check(next);
    scanner.restore_state(snapshot);
    result
}

/// `type Name` / `interface Name`: the contextual keyword starts a
/// declaration only when a name follows on the same line.
pub(crate) fn look_ahead_next_is_identifier_on_same_line(scanner: &mut ScannerState) -> bool {
    look_ahead_is_on_same_line(scanner, SyntaxKind::is_identifier_like)
}

/// `declare var|let|const|function|class|module|type|interface`.
pub(crate) fn look_ahead_is_declare_declaration(scanner: &mut ScannerState) -> bool {
    look_ahead_is_on_same_line(scanner, |token| {
        matches!(
            token,
            SyntaxKind::VarKeyword
                | SyntaxKind::LetKeyword
                | SyntaxKind::ConstKeyword
                | SyntaxKind::FunctionKeyword
                | SyntaxKind::ClassKeyword
                | SyntaxKind::ModuleKeyword
                | SyntaxKind::TypeKeyword
                | SyntaxKind::InterfaceKeyword
        )
    })
}

/// `let` starts a declaration when followed by a binding.
pub(crate) fn look_ahead_is_let_declaration(scanner: &mut ScannerState) -> bool {
    look_ahead_is(scanner, |token| {
        token.is_identifier_like()
            || matches!(
                token,
                SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken
            )
    })
}

/// Tokens that can start a property name.
pub(crate) fn is_property_name_start(token: SyntaxKind) -> bool {
    token.is_identifier_or_keyword()
        || matches!(
            token,
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::OpenBracketToken
        )
}

/// After `static` / `get` / `set` / `async`: is the keyword a modifier (a
/// member name follows) rather than the member name itself?
pub(crate) fn look_ahead_is_member_modifier(scanner: &mut ScannerState, same_line: bool) -> bool {
    let check = |token: SyntaxKind| is_property_name_start(token) || token == SyntaxKind::AsteriskToken;
    if same_line {
        look_ahead_is_on_same_line(scanner, check)
    } else {
        look_ahead_is(scanner, check)
    }
}

/// `name:` or `name?` inside a function type parameter list.
pub(crate) fn look_ahead_is_named_type_param(scanner: &mut ScannerState) -> bool {
    look_ahead_is(scanner, |token| {
        matches!(token, SyntaxKind::ColonToken | SyntaxKind::QuestionToken)
    })
}

/// What follows the parenthesised list that starts at the current `(`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ParenFollow {
    /// `(...) =>`
    Arrow,
    /// `(...):`, an arrow head only if a return type and `=>` follow.
    Colon,
    /// Anything else: not an arrow head.
    Other,
    /// The brackets do not match up; only a full parse can tell.
    Unknown,
}

/// Skip from the current `(` to its matching `)` and classify the token
/// after it. Linear in the length of the list.
pub(crate) fn look_ahead_paren_follow(scanner: &mut ScannerState) -> ParenFollow {
    let snapshot = scanner.save_state();
    let follow = scan_paren_follow(scanner);
    scanner.restore_state(snapshot);
    follow
}

fn scan_paren_follow(scanner: &mut ScannerState) -> ParenFollow {
    // Innermost last. `TemplateHead` stands for an open `${`.
    let mut open = vec![SyntaxKind::OpenParenToken];
    let mut prev = SyntaxKind::OpenParenToken;
    while let Some(&innermost) = open.last() {
        let mut token = scanner.scan();
        if matches!(token, SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken)
            && !ends_operand(prev)
        {
            token = scanner.re_scan_slash_token();
        }
        match token {
            SyntaxKind::OpenParenToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::TemplateHead => open.push(token),
            SyntaxKind::CloseParenToken if innermost == SyntaxKind::OpenParenToken => {
                open.pop();
            }
            SyntaxKind::CloseBracketToken if innermost == SyntaxKind::OpenBracketToken => {
                open.pop();
            }
            SyntaxKind::CloseBraceToken if innermost == SyntaxKind::OpenBraceToken => {
                open.pop();
            }
            SyntaxKind::CloseBraceToken if innermost == SyntaxKind::TemplateHead => {
                token = scanner.re_scan_template_token();
                if token == SyntaxKind::TemplateTail {
                    open.pop();
                }
            }
            SyntaxKind::CloseParenToken
            | SyntaxKind::CloseBracketToken
            | SyntaxKind::CloseBraceToken
            | SyntaxKind::EndOfFileToken
            | SyntaxKind::Unknown => return ParenFollow::Unknown,
            _ => {}
        }
        prev = token;
    }
    match scanner.scan() {
        SyntaxKind::EqualsGreaterThanToken => ParenFollow::Arrow,
        SyntaxKind::ColonToken => ParenFollow::Colon,
        _ => ParenFollow::Other,
    }
}

/// Can `token` end an operand, so that a following `/` divides?
fn ends_operand(token: SyntaxKind) -> bool {
    token.is_identifier_like()
        || matches!(
            token,
            SyntaxKind::ThisKeyword
                | SyntaxKind::SuperKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::NumericLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::RegularExpressionLiteral
                | SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::TemplateTail
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::PlusPlusToken
                | SyntaxKind::MinusMinusToken
        )
}
