//! Parser module: arena AST, tree paths and the recursive-descent parser.

pub mod base;
pub mod field;
pub mod node;
pub mod node_kind;
pub mod path;

mod node_access;
mod node_arena;
mod parse_rules;
mod state;
mod state_expressions;
mod state_statements;
mod state_statements_class_members;
mod state_types;

pub use base::{NodeIndex, NodeList};
pub use field::{Field, FieldShape, FieldSpec};
pub use node::{ExtendedNodeInfo, ModifiedFlags, Node, NodeArena, NodeFlags, Slot};
pub use node_kind::NodeKind;
pub use path::{Path, PathError, PathValue};
pub use state::{
    DEFAULT_SOURCE_FILE_NAME, ParseError, ParseOptions, ParseResult, ParsedSource, ParserState,
    parse,
};

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
