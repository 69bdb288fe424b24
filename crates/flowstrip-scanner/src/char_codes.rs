//! Character classification utilities.

pub const LINE_SEPARATOR: char = '\u{2028}';
pub const PARAGRAPH_SEPARATOR: char = '\u{2029}';
pub const BYTE_ORDER_MARK: char = '\u{FEFF}';
pub const NON_BREAKING_SPACE: char = '\u{00A0}';

#[inline]
pub fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | LINE_SEPARATOR | PARAGRAPH_SEPARATOR)
}

/// Whitespace that is not a line terminator.
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    match ch {
        ' ' | '\t' | '\u{000B}' | '\u{000C}' | NON_BREAKING_SPACE | BYTE_ORDER_MARK => true,
        _ if ch.is_ascii() => false,
        _ => ch.is_whitespace() && !is_line_break(ch),
    }
}

#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    match ch {
        'a'..='z' | 'A'..='Z' | '$' | '_' => true,
        _ if ch.is_ascii() => false,
        _ => ch.is_alphabetic(),
    }
}

#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    match ch {
        'a'..='z' | 'A'..='Z' | '0'..='9' | '$' | '_' => true,
        '\u{200C}' | '\u{200D}' => true,
        _ if ch.is_ascii() => false,
        _ => ch.is_alphanumeric(),
    }
}

/// True for bytes that can continue an identifier or number. Used to decide
/// whether two adjacent source fragments would fuse into one token.
#[inline]
pub fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'$' || byte == b'_' || byte >= 0x80
}
