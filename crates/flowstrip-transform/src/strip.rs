//! Type-stripping traversal.
//!
//! One pre-order walk over the live tree, driven by a `RuleTable`:
//!
//! - a node is visited once, after its parent and earlier siblings;
//! - `StripFields` targets are cleared before the node's children are
//!   looked at, so cleared subtrees are never entered;
//! - `Delete` children are removed from their slot by the parent visit and
//!   their subtrees are never entered either.
//!
//! The walk uses an explicit work stack, so nesting depth is bounded only by
//! memory. All mutation goes through `Path`, which ignores writes that do not
//! change anything; a second pass over stripped output changes nothing.

use crate::rules::{RuleTable, STANDARD_RULES, StripAction};
use flowstrip_common::limits::TRAVERSAL_STACK_CAPACITY;
use flowstrip_parser::{Field, NodeArena, NodeIndex, NodeKind, Path, Slot};
use tracing::{debug, trace, warn};

/// What one traversal did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StripStats {
    /// Surviving nodes the walk visited.
    pub nodes_visited: usize,
    /// Nodes removed by a `Delete` rule, counting each removed subtree once.
    pub nodes_deleted: usize,
    /// Populated fields cleared by a `StripFields` rule.
    pub fields_cleared: usize,
}

impl StripStats {
    /// True when the pass changed the tree.
    pub fn changed(&self) -> bool {
        self.nodes_deleted > 0 || self.fields_cleared > 0
    }
}

/// Strip every Flow construct under `root` using the standard rules.
pub fn transform_tree(arena: &mut NodeArena, root: NodeIndex) -> StripStats {
    transform_tree_with(arena, root, &STANDARD_RULES)
}

/// Strip the tree under `root` using a custom rule table.
pub fn transform_tree_with(arena: &mut NodeArena, root: NodeIndex, rules: &RuleTable) -> StripStats {
    StripPass::new(arena, rules).run(root)
}

/// Mutable state of one traversal.
pub struct StripPass<'a> {
    arena: &'a mut NodeArena,
    rules: &'a RuleTable,
    stack: Vec<NodeIndex>,
    /// Deletions found by the current visit, applied once the scan is done.
    pending: Vec<(Path, NodeKind)>,
    stats: StripStats,
}

impl<'a> StripPass<'a> {
    pub fn new(arena: &'a mut NodeArena, rules: &'a RuleTable) -> Self {
        StripPass {
            arena,
            rules,
            stack: Vec::with_capacity(TRAVERSAL_STACK_CAPACITY),
            pending: Vec::new(),
            stats: StripStats::default(),
        }
    }

    /// Walk the tree under `root`.
    pub fn run(mut self, root: NodeIndex) -> StripStats {
        let _span = tracing::debug_span!("strip", nodes = self.arena.len()).entered();

        let Some(kind) = self.arena.kind(root) else {
            warn!(?root, "strip root does not exist");
            return self.stats;
        };
        if self.rules.action(kind) == StripAction::Delete {
            // A root has no parent slot to be removed from.
            warn!(%kind, "rule table deletes the tree root; nothing stripped");
            return self.stats;
        }

        self.stack.push(root);
        while let Some(node) = self.stack.pop() {
            self.visit(node);
        }

        debug!(
            visited = self.stats.nodes_visited,
            deleted = self.stats.nodes_deleted,
            cleared = self.stats.fields_cleared,
            "stripped"
        );
        self.stats
    }

    fn visit(&mut self, node: NodeIndex) {
        let Some(kind) = self.arena.kind(node) else {
            return;
        };
        self.stats.nodes_visited += 1;

        if let StripAction::StripFields(fields) = self.rules.action(kind) {
            for &field in fields {
                self.clear_field(node, kind, field);
            }
        }
        self.delete_children(node, kind);

        // Reversed, so the leftmost child is popped first.
        self.stack.extend(self.arena.children(node).rev());
    }

    fn clear_field(&mut self, node: NodeIndex, kind: NodeKind, field: Field) {
        match Path::field(node, field).delete(self.arena) {
            Ok(true) => {
                trace!(%kind, %field, "cleared field");
                self.stats.fields_cleared += 1;
            }
            Ok(false) => {}
            Err(err) => warn!(%kind, %field, error = %err, "invalid strip rule"),
        }
    }

    /// Remove every child whose kind is deleted, leaving siblings in place.
    fn delete_children(&mut self, node: NodeIndex, kind: NodeKind) {
        let arena = &*self.arena;
        let rules = self.rules;
        let deleted_kind = |child: NodeIndex| {
            arena
                .kind(child)
                .filter(|&child_kind| rules.action(child_kind) == StripAction::Delete)
        };

        for (spec, slot) in kind.schema().iter().zip(arena.slots(node)) {
            match slot {
                Slot::Absent => {}
                Slot::Node(child) => {
                    if let Some(child_kind) = deleted_kind(*child) {
                        self.pending.push((Path::field(node, spec.field), child_kind));
                    }
                }
                Slot::List(list) => {
                    // Back to front, so earlier indices stay valid while splicing.
                    for (index, &child) in list.nodes.iter().enumerate().rev() {
                        if let Some(child_kind) = deleted_kind(child) {
                            self.pending
                                .push((Path::element(node, spec.field, index), child_kind));
                        }
                    }
                }
            }
        }

        for (path, child_kind) in self.pending.drain(..) {
            match path.delete(self.arena) {
                Ok(true) => {
                    trace!(kind = %child_kind, parent = %kind, "deleted node");
                    self.stats.nodes_deleted += 1;
                }
                Ok(false) => {}
                Err(err) => warn!(kind = %child_kind, error = %err, "cannot delete node"),
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/strip_tests.rs"]
mod strip_tests;
