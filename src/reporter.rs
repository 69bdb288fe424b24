//! Human-readable rendering of parse errors.
//!
//! ```text
//! input.js:2:11 - error FS9003: Type cast expressions are not supported.
//!     2   var x = (y: any);
//!                   ~
//! ```

use colored::Colorize;
use flowstrip_common::position::LineMap;
use flowstrip_parser::ParseError;

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// Render `error`, with a snippet of the line it points at when
    /// `source` is the text that failed to parse.
    pub fn format_parse_error(&self, error: &ParseError, source: &str) -> String {
        let location = format!("{}:{}:{}", error.file_name, error.line, error.column);
        let (category, code) = if self.color {
            (
                "error".red().bold().to_string(),
                format!("FS{}", error.code).bright_blue().to_string(),
            )
        } else {
            ("error".to_string(), format!("FS{}", error.code))
        };

        let mut output = format!("{location} - {category} {code}: {}", error.message);
        if let Some(snippet) = self.format_snippet(error, source) {
            output.push_str(&snippet);
        }
        output
    }

    fn format_snippet(&self, error: &ParseError, source: &str) -> Option<String> {
        let line_map = LineMap::build(source);
        let line = error.line.checked_sub(1)?;
        let start = line_map.line_start(line)? as usize;
        let end = line_map
            .line_start(line + 1)
            .map_or(source.len(), |next| next as usize);
        let line_text = source.get(start..end)?.trim_end_matches(['\n', '\r', '\u{2028}', '\u{2029}']);

        // Columns are UTF-16 units; the marker lines up by characters.
        let mut underline = String::new();
        let mut units = 1;
        for c in line_text.chars() {
            if units >= error.column {
                break;
            }
            underline.push(if c == '\t' { '\t' } else { ' ' });
            units += c.len_utf16() as u32;
        }
        let width = error.length.clamp(1, 80) as usize;
        let rest = line_text.chars().count().saturating_sub(underline.chars().count());
        let marker = "~".repeat(width.min(rest.max(1)));
        let marker = if self.color {
            marker.red().to_string()
        } else {
            marker
        };

        Some(format!("\n  {:>3}   {line_text}\n        {underline}{marker}", error.line))
    }
}

#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod reporter_tests;
