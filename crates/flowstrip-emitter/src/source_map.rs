//! Source Map v3 generation.
//!
//! Mappings are recorded as absolute positions and delta-encoded only when
//! the map is generated. Lines are zero-based, columns are UTF-16 units.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Base64 VLQ as used by the `mappings` field.
pub mod vlq {
    const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    const SHIFT: u32 = 5;
    const MASK: u32 = (1 << SHIFT) - 1;
    const CONTINUATION: u32 = 1 << SHIFT;

    pub fn encode(value: i32) -> String {
        let mut out = String::new();
        encode_into(value, &mut out);
        out
    }

    /// Append the encoding of `value` to `out`.
    pub fn encode_into(value: i32, out: &mut String) {
        // Sign goes in the least significant bit.
        let mut vlq = if value < 0 {
            (value.unsigned_abs() << 1) | 1
        } else {
            value.unsigned_abs() << 1
        };
        loop {
            let mut digit = vlq & MASK;
            vlq >>= SHIFT;
            if vlq > 0 {
                digit |= CONTINUATION;
            }
            out.push(BASE64[digit as usize] as char);
            if vlq == 0 {
                break;
            }
        }
    }

    /// Decode one value from the front of `text`, returning it with the
    /// number of bytes consumed.
    pub fn decode(text: &str) -> Option<(i32, usize)> {
        let mut result: u32 = 0;
        let mut shift = 0;
        for (index, byte) in text.bytes().enumerate() {
            let digit = BASE64.iter().position(|&b| b == byte)? as u32;
            result |= (digit & MASK).checked_shl(shift)?;
            if digit & CONTINUATION == 0 {
                let magnitude = (result >> 1) as i32;
                let value = if result & 1 == 1 { -magnitude } else { magnitude };
                return Some((value, index + 1));
            }
            shift += SHIFT;
        }
        None
    }
}

/// A generated source map, serialised with the standard v3 keys.
///
/// No symbol names are recorded, so `names` is always empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMap {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub sources: Vec<String>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    pub fn to_json(&self) -> String {
        // Plain strings and vectors always serialise.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// One mapping segment, in absolute coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Mapping {
    generated_line: u32,
    generated_column: u32,
    source: u32,
    original_line: u32,
    original_column: u32,
}

/// Collects mappings while output is written.
#[derive(Clone, Debug, Default)]
pub struct SourceMapGenerator {
    file: Option<String>,
    sources: IndexSet<String>,
    mappings: Vec<Mapping>,
}

impl SourceMapGenerator {
    pub fn new(file: Option<String>) -> Self {
        SourceMapGenerator {
            file,
            ..Default::default()
        }
    }

    /// Register a source file, returning its index.
    pub fn add_source(&mut self, name: &str) -> u32 {
        self.sources.insert_full(name.to_string()).0 as u32
    }

    pub fn add_mapping(
        &mut self,
        generated_line: u32,
        generated_column: u32,
        source: u32,
        original_line: u32,
        original_column: u32,
    ) {
        let mapping = Mapping {
            generated_line,
            generated_column,
            source,
            original_line,
            original_column,
        };
        // Two segments at the same generated position: the later one wins.
        if let Some(last) = self.mappings.last_mut()
            && last.generated_line == generated_line
            && last.generated_column == generated_column
        {
            *last = mapping;
            return;
        }
        self.mappings.push(mapping);
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    pub fn generate(&self) -> SourceMap {
        SourceMap {
            version: 3,
            file: self.file.clone(),
            sources: self.sources.iter().cloned().collect(),
            names: Vec::new(),
            mappings: self.encode_mappings(),
        }
    }

    fn encode_mappings(&self) -> String {
        let mut mappings = self.mappings.clone();
        mappings.sort_by_key(|m| (m.generated_line, m.generated_column));

        let mut out = String::new();
        let mut line = 0;
        let mut prev_column = 0i64;
        let mut prev_source = 0i64;
        let mut prev_original_line = 0i64;
        let mut prev_original_column = 0i64;
        let mut first_in_line = true;

        for m in &mappings {
            while line < m.generated_line {
                out.push(';');
                line += 1;
                prev_column = 0;
                first_in_line = true;
            }
            if !first_in_line {
                out.push(',');
            }
            first_in_line = false;

            let delta = |current: u32, prev: &mut i64| {
                let value = i64::from(current) - *prev;
                *prev = i64::from(current);
                value as i32
            };
            vlq::encode_into(delta(m.generated_column, &mut prev_column), &mut out);
            vlq::encode_into(delta(m.source, &mut prev_source), &mut out);
            vlq::encode_into(delta(m.original_line, &mut prev_original_line), &mut out);
            vlq::encode_into(delta(m.original_column, &mut prev_original_column), &mut out);
        }
        out
    }
}

#[cfg(test)]
#[path = "tests/source_map_tests.rs"]
mod source_map_tests;
