//! Format-preserving printer.
//!
//! A node with no modification in its subtree is printed as its source slice.
//! A dirty node is printed by copying its source slice with the text of
//! removed children cut out and dirty children printed in their place.
//! Original slot contents come from the arena's pre-mutation snapshots, so the
//! printer never invents formatting: every output character is either source
//! text or one of two separators (a space that keeps two words apart, a `;`
//! that keeps two statements apart).
//!
//! Printing uses an explicit work stack; deeply nested dirty trees do not
//! recurse.

use crate::source_map::{SourceMap, SourceMapGenerator};
use crate::source_writer::SourceWriter;
use flowstrip_common::position::LineMap;
use flowstrip_parser::{
    DEFAULT_SOURCE_FILE_NAME, Field, FieldShape, NodeArena, NodeIndex, NodeKind, NodeList,
    ParsedSource, Slot,
};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrintOptions {
    /// Name recorded in the map's `sources`. Defaults to the name the source
    /// was parsed with.
    pub source_file_name: Option<String>,
    /// When set, a source map is produced and this becomes its `file`.
    pub source_map_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintResult {
    pub code: String,
    pub map: Option<SourceMap>,
}

/// The tree cannot be printed from source text.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EmitError {
    #[error("node {0:?} does not exist")]
    MissingNode(NodeIndex),
    #[error("cannot print {kind}: the node has no source text")]
    MissingSpan { kind: NodeKind },
    #[error("cannot print {kind}.{field}: the slot gained a node that is not in the source")]
    InsertedNode { kind: NodeKind, field: Field },
}

/// Print the (possibly stripped) tree back to text.
pub fn print(parsed: &ParsedSource, options: &PrintOptions) -> Result<PrintResult, EmitError> {
    let source = parsed.source_text();
    let _span = tracing::debug_span!("print", bytes = source.len()).entered();

    let mut writer = SourceWriter::new(source.len());
    if let Some(map_name) = &options.source_map_name {
        let source_name = options
            .source_file_name
            .as_deref()
            .or(parsed.source_file_name())
            .unwrap_or(DEFAULT_SOURCE_FILE_NAME);
        let mut generator = SourceMapGenerator::new(Some(map_name.clone()));
        let source_index = generator.add_source(source_name);
        writer = writer.with_source_map(generator, source_index);
    }

    Printer {
        arena: &parsed.arena,
        source,
        line_map: LineMap::build(source),
        writer: &mut writer,
        separate_words: false,
    }
    .run(parsed.root)?;

    let (code, generator) = writer.finish();
    let map = generator.map(|generator| {
        debug!(mappings = generator.mapping_count(), "source map generated");
        generator.generate()
    });
    debug!(bytes = code.len(), "printed");
    Ok(PrintResult { code, map })
}

/// One unit of output work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Piece {
    /// Copy `source[start..end]`.
    Text(u32, u32),
    /// Print a node.
    Node(NodeIndex),
    /// Text was cut here; keep the words on either side apart.
    Cut,
    /// A `;` that stops the next statement continuing the previous one.
    Semicolon,
}

type Pieces = SmallVec<[Piece; 8]>;

/// A change to the text of one dirty node, in source coordinates.
#[derive(Clone, Copy, Debug)]
struct Edit {
    start: u32,
    end: u32,
    action: EditAction,
}

#[derive(Clone, Copy, Debug)]
enum EditAction {
    /// Print this node in place of `start..end`.
    Print(NodeIndex),
    /// Drop `start..end` from the middle of a node.
    RemoveField,
    /// Drop a run of statements or class members.
    RemoveLines { semicolon: bool },
    /// Drop `start..end` exactly (separators included by the caller).
    RemoveExact,
}

struct Printer<'a> {
    arena: &'a NodeArena,
    source: &'a str,
    line_map: LineMap,
    writer: &'a mut SourceWriter,
    separate_words: bool,
}

impl Printer<'_> {
    fn run(&mut self, root: NodeIndex) -> Result<(), EmitError> {
        let mut stack: Vec<Piece> = vec![Piece::Node(root)];
        while let Some(piece) = stack.pop() {
            match piece {
                Piece::Text(start, end) => self.copy(start, end),
                Piece::Node(node) => {
                    let pieces = self.expand(node)?;
                    stack.extend(pieces.into_iter().rev());
                }
                Piece::Cut => self.separate_words = true,
                Piece::Semicolon => {
                    self.writer.write(";");
                    self.separate_words = false;
                }
            }
        }
        Ok(())
    }

    fn copy(&mut self, start: u32, end: u32) {
        let Some(text) = self.source.get(start as usize..end as usize) else {
            return;
        };
        if text.is_empty() {
            return;
        }
        if std::mem::take(&mut self.separate_words)
            && self.writer.last_char().is_some_and(is_word_char)
            && text.chars().next().is_some_and(is_word_char)
        {
            self.writer.write(" ");
        }
        let original = self.line_map.position_of(start, self.source);
        self.writer.write_mapped(text, original);
    }

    /// Break a node into pieces: its source slice if clean, otherwise the
    /// slice split around the edits of its children.
    fn expand(&self, node: NodeIndex) -> Result<Pieces, EmitError> {
        let header = self.arena.get(node).ok_or(EmitError::MissingNode(node))?;
        if !self.arena.is_dirty(node) {
            return Ok(SmallVec::from_elem(Piece::Text(header.pos, header.end), 1));
        }
        if !header.has_span() {
            return Err(EmitError::MissingSpan { kind: header.kind });
        }

        let mut edits = self.edits(node, header.kind)?;
        edits.sort_by_key(|edit| (edit.start, edit.end));
        trace!(kind = %header.kind, edits = edits.len(), "printing modified node");

        let mut pieces = Pieces::new();
        let mut cursor = header.pos;
        for edit in edits {
            if edit.start < cursor {
                // Shares text with an earlier edit (shorthand properties).
                continue;
            }
            let (start, end) = match edit.action {
                EditAction::Print(child) => {
                    pieces.push(Piece::Text(cursor, edit.start));
                    pieces.push(Piece::Node(child));
                    cursor = edit.end;
                    continue;
                }
                EditAction::RemoveField => self.field_range(cursor, edit.start, edit.end),
                EditAction::RemoveLines { .. } => self.line_range(cursor, edit.start, edit.end),
                EditAction::RemoveExact => (edit.start, edit.end),
            };
            pieces.push(Piece::Text(cursor, start));
            pieces.push(Piece::Cut);
            if let EditAction::RemoveLines { semicolon: true } = edit.action {
                pieces.push(Piece::Semicolon);
            }
            cursor = end.max(cursor);
        }
        pieces.push(Piece::Text(cursor, header.end));
        Ok(pieces)
    }

    /// Compare the node's original slots with its current ones.
    fn edits(&self, node: NodeIndex, kind: NodeKind) -> Result<Vec<Edit>, EmitError> {
        let current = self.arena.slots(node);
        let original = self.arena.original_slots(node).unwrap_or(current);

        let mut edits = Vec::new();
        for ((spec, before), after) in kind.schema().iter().zip(original).zip(current) {
            match (before, after) {
                (Slot::List(old), Slot::List(new)) => {
                    self.list_edits(&mut edits, kind, spec.field, spec.shape, old, new)?;
                }
                (Slot::List(old), _) => {
                    // The whole clause goes, keyword and delimiters included.
                    if old.pos < old.end {
                        edits.push(Edit {
                            start: old.pos,
                            end: old.end,
                            action: EditAction::RemoveField,
                        });
                    }
                }
                _ => match (before.as_node(), after.as_node()) {
                    (Some(old), Some(new)) if old == new => self.push_if_dirty(&mut edits, new),
                    (Some(old), Some(new)) => {
                        let (start, end) = self.span(old)?;
                        self.require_span(new)?;
                        edits.push(Edit {
                            start,
                            end,
                            action: EditAction::Print(new),
                        });
                    }
                    (Some(old), None) => {
                        let (start, end) = self.span(old)?;
                        edits.push(Edit {
                            start,
                            end,
                            action: EditAction::RemoveField,
                        });
                    }
                    (None, _) => {
                        if after.is_populated() {
                            return Err(EmitError::InsertedNode {
                                kind,
                                field: spec.field,
                            });
                        }
                    }
                },
            }
        }
        Ok(edits)
    }

    fn push_if_dirty(&self, edits: &mut Vec<Edit>, child: NodeIndex) {
        if child.is_none() || !self.arena.is_dirty(child) {
            return;
        }
        if let Some(header) = self.arena.get(child) {
            edits.push(Edit {
                start: header.pos,
                end: header.end,
                action: EditAction::Print(child),
            });
        }
    }

    /// Align an original list with its current contents. Elements are only
    /// removed or swapped in place, so a two-pointer walk recovers which is
    /// which.
    fn list_edits(
        &self,
        edits: &mut Vec<Edit>,
        kind: NodeKind,
        field: Field,
        shape: FieldShape,
        old: &NodeList,
        new: &NodeList,
    ) -> Result<(), EmitError> {
        if old.nodes == new.nodes {
            for &child in &new.nodes {
                self.push_if_dirty(edits, child);
            }
            return Ok(());
        }

        let mut removed = vec![false; old.len()];
        let mut next = 0;
        for (index, &child) in old.nodes.iter().enumerate() {
            match new.nodes.get(next) {
                Some(&kept) if kept == child => {
                    self.push_if_dirty(edits, kept);
                    next += 1;
                }
                Some(&replacement) if new.len() - next == old.len() - index => {
                    let span = self.span(child)?;
                    self.require_span(replacement)?;
                    edits.push(Edit {
                        start: span.0,
                        end: span.1,
                        action: EditAction::Print(replacement),
                    });
                    next += 1;
                }
                _ => removed[index] = true,
            }
        }
        if next < new.len() {
            return Err(EmitError::InsertedNode { kind, field });
        }

        let mut index = 0;
        while index < old.len() {
            if !removed[index] {
                index += 1;
                continue;
            }
            let first = index;
            while index < old.len() && removed[index] {
                index += 1;
            }
            let run: SmallVec<[NodeIndex; 4]> = old.nodes[first..index]
                .iter()
                .copied()
                .filter(|node| node.is_some())
                .collect();
            let (Some(&run_first), Some(&run_last)) = (run.first(), run.last()) else {
                continue;
            };
            let survivor = |i: usize| Some(old.nodes[i]).filter(|n| n.is_some() && !removed[i]);
            let before = (0..first).rev().find_map(survivor);
            let after = (index..old.len()).find_map(survivor);
            edits.push(self.run_edit(shape, run_first, run_last, before, after)?);
        }
        Ok(())
    }

    /// The edit removing a run of adjacent list elements, `first` through
    /// `last`, whose nearest surviving neighbours are `before` and `after`.
    fn run_edit(
        &self,
        shape: FieldShape,
        first: NodeIndex,
        last: NodeIndex,
        before: Option<NodeIndex>,
        after: Option<NodeIndex>,
    ) -> Result<Edit, EmitError> {
        let (start, _) = self.span(first)?;
        let (_, end) = self.span(last)?;

        if shape == FieldShape::Block {
            let semicolon = match (before, after) {
                (Some(before), Some(after)) => self.continues_across(before, after)?,
                _ => false,
            };
            return Ok(Edit {
                start,
                end,
                action: EditAction::RemoveLines { semicolon },
            });
        }

        // Delimited list: take the separator that follows, or the one before
        // when nothing survives after the run.
        let (start, end) = match (before, after) {
            (_, Some(after)) => (start, self.span(after)?.0),
            (Some(before), None) => (self.span(before)?.1, end),
            (None, None) => (start, end),
        };
        Ok(Edit {
            start,
            end,
            action: EditAction::RemoveExact,
        })
    }

    /// Would `after` parse as a continuation of `before` once the statements
    /// between them are gone?
    fn continues_across(&self, before: NodeIndex, after: NodeIndex) -> Result<bool, EmitError> {
        let (_, before_end) = self.span(before)?;
        let (after_start, _) = self.span(after)?;
        let bytes = self.source.as_bytes();
        let terminated = before_end > 0 && bytes.get(before_end as usize - 1) == Some(&b';');
        let hazard = matches!(
            bytes.get(after_start as usize),
            Some(b'(' | b'[' | b'`' | b'+' | b'-' | b'/')
        );
        Ok(!terminated && hazard)
    }

    /// Extend a removed field over the horizontal whitespace before it when
    /// whitespace or a line end follows, so `a implements B {` loses one
    /// space and not two.
    fn field_range(&self, floor: u32, start: u32, end: u32) -> (u32, u32) {
        let space_start = self.space_before(floor, start);
        let (space_end, line_end) = self.space_after(end);
        if space_start < start && (space_end > end || line_end) {
            (space_start, end)
        } else {
            (start, end)
        }
    }

    /// Extend removed statements to whole lines when they stand alone on
    /// them, otherwise over the whitespace that separated them from their
    /// neighbours on the line.
    fn line_range(&self, floor: u32, start: u32, end: u32) -> (u32, u32) {
        let space_start = self.space_before(floor, start);
        let (space_end, line_end) = self.space_after(end);
        let line_start = self.is_line_start(space_start);
        match (line_start, line_end) {
            (true, true) => (space_start, space_end + self.terminator_len(space_end)),
            (false, true) => (space_start, space_end),
            _ => (start, space_end),
        }
    }

    fn space_before(&self, floor: u32, offset: u32) -> u32 {
        let bytes = self.source.as_bytes();
        let mut at = offset;
        while at > floor && matches!(bytes.get(at as usize - 1), Some(b' ' | b'\t' | 0x0B | 0x0C)) {
            at -= 1;
        }
        at
    }

    /// End of the horizontal whitespace at `offset`, and whether it reaches a
    /// line end (or the end of the text).
    fn space_after(&self, offset: u32) -> (u32, bool) {
        let bytes = self.source.as_bytes();
        let mut at = offset as usize;
        while matches!(bytes.get(at), Some(b' ' | b'\t' | 0x0B | 0x0C)) {
            at += 1;
        }
        let at = at as u32;
        (at, at as usize == bytes.len() || self.terminator_len(at) > 0)
    }

    fn is_line_start(&self, offset: u32) -> bool {
        offset == 0 || self.line_map.line_start(self.line_map.line_of(offset)) == Some(offset)
    }

    fn terminator_len(&self, offset: u32) -> u32 {
        match self.source.as_bytes().get(offset as usize..) {
            Some([b'\r', b'\n', ..]) => 2,
            Some([b'\n' | b'\r', ..]) => 1,
            Some([0xE2, 0x80, 0xA8 | 0xA9, ..]) => 3,
            _ => 0,
        }
    }

    fn span(&self, node: NodeIndex) -> Result<(u32, u32), EmitError> {
        let header = self.arena.get(node).ok_or(EmitError::MissingNode(node))?;
        Ok((header.pos, header.end))
    }

    fn require_span(&self, node: NodeIndex) -> Result<(), EmitError> {
        let header = self.arena.get(node).ok_or(EmitError::MissingNode(node))?;
        if header.has_span() {
            Ok(())
        } else {
            Err(EmitError::MissingSpan { kind: header.kind })
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || !c.is_ascii()
}

#[cfg(test)]
#[path = "tests/printer_tests.rs"]
mod printer_tests;
