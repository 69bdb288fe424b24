//! Common types and utilities for the flowstrip compiler.
//!
//! This crate provides foundational types used across all flowstrip crates:
//! - String interning (`Atom`, `Interner`)
//! - Line/column lookup for byte offsets (`LineMap`)
//! - Diagnostic messages and codes
//! - Parser and emitter limits

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Centralized limits and thresholds
pub mod limits;

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Diagnostic messages shared by the parser and the driver
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticMessage};
