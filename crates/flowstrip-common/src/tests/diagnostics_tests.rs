use super::*;
use rustc_hash::FxHashSet;

#[test]
fn test_format_message_substitutes_placeholders() {
    let text = format_message(diagnostic_messages::TOKEN_EXPECTED.message, &[")"]);
    assert_eq!(text, "')' expected.");
}

#[test]
fn test_message_lookup_by_code() {
    assert_eq!(
        get_message_template(diagnostic_codes::TYPE_EXPECTED),
        Some("Type expected.")
    );
    assert_eq!(get_message_template(4242), None);
}

#[test]
fn test_codes_are_unique() {
    let mut seen = FxHashSet::default();
    for message in DIAGNOSTIC_MESSAGES {
        assert!(seen.insert(message.code), "duplicate code {}", message.code);
        assert_eq!(message.category, DiagnosticCategory::Error);
    }
}

#[test]
fn test_diagnostic_serializes() {
    let diag = Diagnostic::error("input.js", 3, 1, "Type expected.", 1110);
    let json = serde_json::to_value(&diag).unwrap();
    assert_eq!(json["file"], "input.js");
    assert_eq!(json["code"], 1110);
    assert_eq!(json["category"], "Error");
}
