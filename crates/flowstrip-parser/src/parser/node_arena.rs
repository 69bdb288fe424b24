//! NodeArena creation and mutation methods.
//!
//! Nodes are only ever appended. Mutation is limited to replacing slot
//! contents, which snapshots the node's original slots on first change and
//! propagates dirty flags to every ancestor.

use super::base::{NodeIndex, NodeList};
use super::node::{ArenaMark, ModifiedFlags, Node, NodeArena, NodeFlags, Slot};
use super::node_kind::NodeKind;
use flowstrip_common::interner::{Atom, Interner};
use flowstrip_scanner::SyntaxKind;

impl NodeArena {
    /// Maximum pre-allocation to avoid capacity overflow in huge files.
    const MAX_NODE_PREALLOC: usize = 5_000_000;

    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Create an arena with room for roughly `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> NodeArena {
        let safe_capacity = capacity.min(Self::MAX_NODE_PREALLOC);
        let mut arena = NodeArena::default();
        arena.nodes = Vec::with_capacity(safe_capacity);
        arena.extended_info = Vec::with_capacity(safe_capacity);
        // Most kinds have one or two fields.
        arena.slots = Vec::with_capacity(safe_capacity * 2);
        arena
    }

    /// Set the interner (called after parsing to transfer ownership from scanner)
    pub fn set_interner(&mut self, interner: Interner) {
        self.interner = interner;
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Intern a name in the arena's string pool.
    pub fn intern(&mut self, text: &str) -> Atom {
        self.interner.intern(text)
    }

    /// Append a node. `slots` are given in schema order; missing trailing
    /// slots are filled with `Slot::Absent`. Every child gets its parent
    /// back-pointer set to the new node.
    pub fn add_node<I>(&mut self, kind: NodeKind, pos: u32, end: u32, slots: I) -> NodeIndex
    where
        I: IntoIterator<Item = Slot>,
    {
        let index = NodeIndex(self.nodes.len() as u32);
        let slot_start = self.slots.len() as u32;
        let schema = kind.schema();

        let mut count = 0;
        for slot in slots {
            debug_assert!(count < schema.len(), "too many slots for {kind}");
            let Some(spec) = schema.get(count) else {
                break;
            };
            for child in slot.children() {
                self.set_parent(child, index, spec.field);
            }
            self.slots.push(slot);
            count += 1;
        }
        for _ in count..schema.len() {
            self.slots.push(Slot::Absent);
        }

        self.nodes.push(Node {
            kind,
            flags: NodeFlags::empty(),
            pos,
            end,
            token: SyntaxKind::Unknown,
            atom: Atom::NONE,
            slot_start,
        });
        self.extended_info.push(Default::default());
        index
    }

    /// Append a node with no children.
    pub fn add_leaf(&mut self, kind: NodeKind, pos: u32, end: u32) -> NodeIndex {
        self.add_node(kind, pos, end, std::iter::empty())
    }

    fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex, field: super::field::Field) {
        if let Some(info) = self.extended_info.get_mut(child.as_usize()) {
            info.parent = parent;
            info.parent_field = Some(field);
        }
    }

    pub(crate) fn mark(&self) -> ArenaMark {
        ArenaMark {
            nodes: self.nodes.len(),
            slots: self.slots.len(),
        }
    }

    /// Drop every node created after `mark`.
    ///
    /// Only valid when nothing created after the mark adopted an older node,
    /// which holds for speculative parses: they build fresh subtrees.
    pub(crate) fn rollback(&mut self, mark: ArenaMark) {
        self.nodes.truncate(mark.nodes);
        self.extended_info.truncate(mark.nodes);
        self.slots.truncate(mark.slots);
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Replace slot `slot_index` of `node`. Returns false (and records
    /// nothing) when the new value equals the current one.
    pub(crate) fn replace_slot(&mut self, node: NodeIndex, slot_index: usize, value: Slot) -> bool {
        let Some(header) = self.nodes.get(node.as_usize()) else {
            return false;
        };
        let kind = header.kind;
        let start = header.slot_start as usize;
        let len = kind.schema().len();
        if slot_index >= len || self.slots[start + slot_index] == value {
            return false;
        }

        if !self.originals.contains_key(&node) {
            let snapshot: Box<[Slot]> = self.slots[start..start + len].into();
            self.originals.insert(node, snapshot);
        }

        let field = kind.schema()[slot_index].field;
        for child in value.children() {
            self.set_parent(child, node, field);
        }
        self.slots[start + slot_index] = value;
        self.mark_modified(node);
        true
    }

    fn mark_modified(&mut self, node: NodeIndex) {
        let Some(info) = self.extended_info.get_mut(node.as_usize()) else {
            return;
        };
        info.modified |= ModifiedFlags::MODIFIED;
        let mut current = info.parent;
        while let Some(info) = self.extended_info.get_mut(current.as_usize()) {
            if info.modified.contains(ModifiedFlags::SUBTREE_MODIFIED) {
                // Ancestors were marked when this one was.
                break;
            }
            info.modified |= ModifiedFlags::SUBTREE_MODIFIED;
            current = info.parent;
        }
    }

    /// Build a `NodeList` with the span of the construct it came from.
    pub fn list_slot(nodes: Vec<NodeIndex>, pos: u32, end: u32) -> Slot {
        Slot::List(NodeList::new(nodes, pos, end))
    }
}
