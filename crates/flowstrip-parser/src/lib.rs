//! ECMAScript + Flow parser for the flowstrip compiler.
//!
//! This crate provides:
//! - `NodeArena` - arena storage for every node of one syntax tree
//! - `NodeKind` / `Field` - the closed node vocabulary and per-kind field schema
//! - `Path` - located handles used to replace or delete tree slots
//! - `parse` - source text to tree

pub mod parser;

pub use parser::{
    DEFAULT_SOURCE_FILE_NAME, Field, FieldShape, FieldSpec, ModifiedFlags, Node, NodeArena,
    NodeFlags, NodeIndex, NodeKind, NodeList, ParseError, ParseOptions, ParsedSource, ParserState,
    Path, PathError, PathValue, Slot, parse,
};
