//! ECMAScript + Flow scanner/tokenizer for the flowstrip compiler.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine with re-scan entry points
//! - `char_codes` - Character classification utilities

pub mod char_codes;
pub mod scanner;
pub mod syntax_kind;

pub use scanner::{ScannerDiagnostic, ScannerSnapshot, ScannerState, TokenFlags};
pub use syntax_kind::{SyntaxKind, text_to_keyword};
