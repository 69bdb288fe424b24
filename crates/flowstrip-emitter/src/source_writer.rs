//! Output buffer that tracks the generated position and feeds the source map.

use crate::source_map::SourceMapGenerator;
use flowstrip_common::position::Position;
use memchr::memchr3;

/// Generated-side position: zero-based line and UTF-16 column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

/// Writes output text, optionally recording mappings back to the source.
///
/// Lines end at `\n`, `\r\n`, lone `\r`, U+2028 and U+2029, the same set the
/// source line table uses, so copied text advances both sides in step.
pub struct SourceWriter {
    output: String,
    position: SourcePosition,
    /// The last character written was `\r`; a following `\n` ends no new line.
    after_cr: bool,
    map: Option<SourceMapGenerator>,
    source_index: u32,
}

impl SourceWriter {
    pub fn new(capacity: usize) -> Self {
        SourceWriter {
            output: String::with_capacity(capacity),
            position: SourcePosition::default(),
            after_cr: false,
            map: None,
            source_index: 0,
        }
    }

    /// Record mappings into `map`, pointing at source `source_index`.
    pub fn with_source_map(mut self, map: SourceMapGenerator, source_index: u32) -> Self {
        self.map = Some(map);
        self.source_index = source_index;
        self
    }

    pub fn position(&self) -> SourcePosition {
        self.position
    }

    pub fn last_char(&self) -> Option<char> {
        self.output.chars().next_back()
    }

    /// Write text with no source counterpart.
    pub fn write(&mut self, text: &str) {
        self.push(text, None);
    }

    /// Write text copied verbatim from the source, starting at `original`.
    ///
    /// A mapping is added at the start of the text and at the start of each
    /// line inside it.
    pub fn write_mapped(&mut self, text: &str, original: Position) {
        self.push(text, Some(original));
    }

    fn push(&mut self, text: &str, original: Option<Position>) {
        if text.is_empty() {
            return;
        }
        let mut original = original;
        if let Some(at) = original {
            self.add_mapping(at);
        }

        let bytes = text.as_bytes();
        let mut line_start = 0;
        let mut at = 0;
        while let Some(found) = bytes.get(at..).and_then(|rest| memchr3(b'\n', b'\r', 0xE2, rest)) {
            let index = at + found;
            let terminator_len = match bytes[index] {
                b'\n' if self.after_cr && index == 0 => {
                    // Second half of a `\r\n` split across writes.
                    self.after_cr = false;
                    at = 1;
                    line_start = 1;
                    continue;
                }
                b'\n' => 1,
                b'\r' if bytes.get(index + 1) == Some(&b'\n') => 2,
                b'\r' => 1,
                0xE2 if bytes.get(index + 1) == Some(&0x80)
                    && matches!(bytes.get(index + 2), Some(0xA8 | 0xA9)) =>
                {
                    3
                }
                _ => {
                    at = index + 1;
                    continue;
                }
            };
            self.after_cr = false;
            at = index + terminator_len;
            line_start = at;
            self.position.line += 1;
            self.position.column = 0;
            if let Some(previous) = original.as_mut() {
                previous.line += 1;
                previous.character = 0;
                if at < bytes.len() {
                    self.add_mapping(*previous);
                }
            }
        }

        let tail = &text[line_start..];
        self.position.column += utf16_len(tail);
        self.after_cr = bytes.last() == Some(&b'\r');
        self.output.push_str(text);
    }

    fn add_mapping(&mut self, original: Position) {
        if let Some(map) = self.map.as_mut() {
            map.add_mapping(
                self.position.line,
                self.position.column,
                self.source_index,
                original.line,
                original.character,
            );
        }
    }

    pub fn finish(self) -> (String, Option<SourceMapGenerator>) {
        (self.output, self.map)
    }
}

fn utf16_len(text: &str) -> u32 {
    if text.is_ascii() {
        text.len() as u32
    } else {
        text.chars().map(char::len_utf16).sum::<usize>() as u32
    }
}

#[cfg(test)]
#[path = "tests/source_writer_tests.rs"]
mod source_writer_tests;
