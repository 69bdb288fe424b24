//! Flow type stripping over a parsed tree.
//!
//! This crate provides:
//! - `RuleTable` / `StripAction` - the static kind-to-action mapping
//! - `transform_tree` - the traversal that applies it in place

pub mod rules;
pub mod strip;

pub use rules::{RuleDefect, RuleTable, STANDARD_RULES, StripAction};
pub use strip::{StripPass, StripStats, transform_tree, transform_tree_with};
