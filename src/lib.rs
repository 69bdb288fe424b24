//! Strip Flow type syntax from JavaScript, keeping everything else as written.
//!
//! The pipeline is parse → strip → print:
//!
//! ```
//! use flowstrip::{CompileOptions, compile};
//!
//! let result = compile("var n: number = 1;", &CompileOptions::default()).unwrap();
//! assert_eq!(result.code, "var n = 1;");
//! ```
//!
//! Each stage is also usable on its own: [`parse`] builds the tree,
//! [`transform`] strips it in place, [`print`] re-emits it with an optional
//! source map.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use flowstrip_emitter::{EmitError, PrintOptions, PrintResult, SourceMap, print};
pub use flowstrip_parser::{ParseError, ParseOptions, ParsedSource, parse};
pub use flowstrip_transform::{
    RuleTable, STANDARD_RULES, StripAction, StripStats, transform_tree, transform_tree_with,
};

pub mod filter;
pub use filter::StripFilter;

pub mod reporter;

#[cfg(feature = "cli")]
pub mod cli;

pub mod tracing_config;

/// Options for one compile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Name used in parse errors and in the source map's `sources`.
    pub source_file_name: Option<String>,
    /// When set, a source map is produced and this becomes its `file`.
    pub source_map_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// Strip every Flow construct from a parsed source.
pub fn transform(parsed: &mut ParsedSource) -> StripStats {
    transform_tree(&mut parsed.arena, parsed.root)
}

/// Parse, strip and print `source`.
pub fn compile(source: &str, options: &CompileOptions) -> Result<PrintResult, CompileError> {
    let parse_options = ParseOptions {
        source_file_name: options.source_file_name.clone(),
    };
    let mut parsed = parse(source, &parse_options)?;
    let stats = transform(&mut parsed);
    tracing::debug!(
        deleted = stats.nodes_deleted,
        cleared = stats.fields_cleared,
        "compile stripped"
    );
    let print_options = PrintOptions {
        source_file_name: options.source_file_name.clone(),
        source_map_name: options.source_map_name.clone(),
    };
    Ok(print(&parsed, &print_options)?)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod lib_tests;
