//! Printer for the flowstrip compiler.
//!
//! This crate provides:
//! - `print` - tree back to text, copying every untouched region verbatim
//! - `SourceMapGenerator` / `SourceMap` - Source Map v3 output
//! - `SourceWriter` - position-tracking output buffer

pub mod printer;
pub mod source_map;
pub mod source_writer;

pub use printer::{EmitError, PrintOptions, PrintResult, print};
pub use source_map::{SourceMap, SourceMapGenerator, vlq};
pub use source_writer::{SourcePosition, SourceWriter};
