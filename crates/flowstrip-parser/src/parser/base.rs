//! Base types for the arena AST: node handles and node lists.

use serde::Serialize;

/// Handle of a node in a `NodeArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == NodeIndex::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub(crate) fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// An ordered sequence of child nodes.
///
/// `pos..end` covers the whole construct the list was parsed from, e.g. the
/// parenthesised parameter list or the `implements A, B` clause. Array holes
/// are stored as `NodeIndex::NONE`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
    pub pos: u32,
    pub end: u32,
}

impl NodeList {
    pub fn new(nodes: Vec<NodeIndex>, pos: u32, end: u32) -> NodeList {
        NodeList { nodes, pos, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of `node` in the list.
    pub fn index_of(&self, node: NodeIndex) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node)
    }
}
