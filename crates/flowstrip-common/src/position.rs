//! Line/column positions for byte offsets.
//!
//! Nodes and diagnostics carry byte offsets. Error messages and source maps
//! need zero-based line numbers and UTF-16 columns, which is what `LineMap`
//! computes.

use serde::Serialize;

/// A zero-based line and UTF-16 column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// Byte offsets of every line start in a source text.
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build the line table. `\n`, `\r\n`, lone `\r`, U+2028 and U+2029 all
    /// terminate a line.
    pub fn build(source: &str) -> LineMap {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0u32];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_starts.push((i + 1) as u32);
                    i += 1;
                }
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push((i + 1) as u32);
                    i += 1;
                }
                // U+2028 / U+2029 are encoded as E2 80 A8 / E2 80 A9
                0xE2 if bytes.get(i + 1) == Some(&0x80)
                    && matches!(bytes.get(i + 2), Some(0xA8 | 0xA9)) =>
                {
                    line_starts.push((i + 3) as u32);
                    i += 3;
                }
                _ => i += 1,
            }
        }
        LineMap { line_starts }
    }

    /// Number of lines in the text (at least one).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset of the start of `line`, if it exists.
    pub fn line_start(&self, line: u32) -> Option<u32> {
        self.line_starts.get(line as usize).copied()
    }

    /// Zero-based line containing `offset`.
    pub fn line_of(&self, offset: u32) -> u32 {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line as u32,
            Err(next) => (next - 1) as u32,
        }
    }

    /// Convert a byte offset into a line and UTF-16 column.
    ///
    /// Offsets past the end of `source` are clamped to its length.
    pub fn position_of(&self, offset: u32, source: &str) -> Position {
        let offset = offset.min(source.len() as u32);
        let line = self.line_of(offset);
        let start = self.line_starts[line as usize] as usize;
        let prefix = source.get(start..offset as usize).unwrap_or("");
        let character = prefix.chars().map(char::len_utf16).sum::<usize>() as u32;
        Position { line, character }
    }
}

#[cfg(test)]
#[path = "tests/position_tests.rs"]
mod position_tests;
