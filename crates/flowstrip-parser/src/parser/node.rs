//! Arena node layout.
//!
//! A `Node` is a small fixed-size header. Its children live in the arena's
//! shared slot vector: `slots[slot_start .. slot_start + schema.len()]`, one
//! slot per field of the kind's schema. Parent back-pointers and modification
//! flags live in a parallel side table (`ExtendedNodeInfo`) so that nodes never
//! reference their parents directly.

use super::base::{NodeIndex, NodeList};
use super::field::Field;
use super::node_kind::NodeKind;
use bitflags::bitflags;
use flowstrip_common::interner::{Atom, Interner};
use flowstrip_scanner::SyntaxKind;
use rustc_hash::FxHashMap;
use serde::Serialize;

bitflags! {
    /// Syntactic flags recorded by the parser.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u32 {
        const GENERATOR = 1 << 0;
        const ASYNC = 1 << 1;
        const COMPUTED = 1 << 2;
        const STATIC = 1 << 3;
        const METHOD = 1 << 4;
        const SHORTHAND = 1 << 5;
        const GETTER = 1 << 6;
        const SETTER = 1 << 7;
        const PREFIX = 1 << 8;
        const DELEGATE = 1 << 9;
        /// Optional object type property or function type parameter.
        const OPTIONAL = 1 << 10;
        /// `export type` / `export interface`.
        const EXPORTED = 1 << 11;
        /// `declare type` / `declare interface`.
        const DECLARED = 1 << 12;
        const CONSTRUCTOR = 1 << 13;
        /// Arrow function with an expression body.
        const EXPRESSION_BODY = 1 << 14;
    }
}

bitflags! {
    /// Mutation tracking used by the printer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModifiedFlags: u8 {
        /// One of the node's own slots changed.
        const MODIFIED = 1 << 0;
        /// Some descendant changed.
        const SUBTREE_MODIFIED = 1 << 1;
    }
}

/// Node header.
#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub flags: NodeFlags,
    /// Start byte offset in the source.
    pub pos: u32,
    /// End byte offset in the source (exclusive).
    pub end: u32,
    /// Operator, declaration keyword or literal token, when relevant.
    pub token: SyntaxKind,
    /// Name of identifiers and type parameters.
    pub atom: Atom,
    pub(crate) slot_start: u32,
}

impl Node {
    /// True when the node covers a real range of source text.
    #[inline]
    pub fn has_span(&self) -> bool {
        self.pos < self.end
    }
}

/// Contents of one field of one node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Slot {
    #[default]
    Absent,
    Node(NodeIndex),
    List(NodeList),
}

impl Slot {
    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Slot::Absent)
    }

    /// Absent slots and empty lists hold nothing.
    pub fn is_populated(&self) -> bool {
        match self {
            Slot::Absent => false,
            Slot::Node(node) => node.is_some(),
            Slot::List(list) => !list.is_empty(),
        }
    }

    pub fn as_node(&self) -> Option<NodeIndex> {
        match self {
            Slot::Node(node) if node.is_some() => Some(*node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&NodeList> {
        match self {
            Slot::List(list) => Some(list),
            _ => None,
        }
    }

    /// Child nodes held by the slot, in order (array holes skipped).
    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeIndex> + '_ {
        let (single, many): (Option<NodeIndex>, &[NodeIndex]) = match self {
            Slot::Absent => (None, &[]),
            Slot::Node(node) => (Some(*node), &[]),
            Slot::List(list) => (None, &list.nodes),
        };
        single
            .into_iter()
            .chain(many.iter().copied())
            .filter(|node| node.is_some())
    }
}

impl From<NodeIndex> for Slot {
    fn from(node: NodeIndex) -> Slot {
        if node.is_none() {
            Slot::Absent
        } else {
            Slot::Node(node)
        }
    }
}

impl From<NodeList> for Slot {
    fn from(list: NodeList) -> Slot {
        Slot::List(list)
    }
}

impl From<Option<NodeList>> for Slot {
    fn from(list: Option<NodeList>) -> Slot {
        list.map_or(Slot::Absent, Slot::List)
    }
}

/// Side-table entry for a node.
#[derive(Clone, Copy, Debug)]
pub struct ExtendedNodeInfo {
    pub parent: NodeIndex,
    /// Field of `parent` that holds this node.
    pub parent_field: Option<Field>,
    pub modified: ModifiedFlags,
}

impl Default for ExtendedNodeInfo {
    fn default() -> Self {
        ExtendedNodeInfo {
            parent: NodeIndex::NONE,
            parent_field: None,
            modified: ModifiedFlags::empty(),
        }
    }
}

/// Arena owning every node of one syntax tree.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    pub(crate) nodes: Vec<Node>,
    pub(crate) slots: Vec<Slot>,
    pub(crate) extended_info: Vec<ExtendedNodeInfo>,
    /// Slots of each node as they were before its first mutation.
    pub(crate) originals: FxHashMap<NodeIndex, Box<[Slot]>>,
    pub(crate) interner: Interner,
}

/// Arena length marker used to roll back speculative parses.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ArenaMark {
    pub(crate) nodes: usize,
    pub(crate) slots: usize,
}
