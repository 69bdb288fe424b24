//! Located handles into the tree.
//!
//! A `Path` names one field slot of one node (optionally one element of a
//! list field), or the root. Paths hold no borrows: they are plain values
//! resolved against the arena on each operation, so a path can be derived,
//! stored, and used to mutate the tree in between other reads.
//!
//! Mutating through a path only records a change when the stored value
//! actually differs. Clearing an already absent field is a no-op.

use super::base::{NodeIndex, NodeList};
use super::field::{Field, FieldShape};
use super::node::{NodeArena, Slot};
use super::node_kind::NodeKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Path {
    /// The tree root.
    Root(NodeIndex),
    /// A whole field of `parent`.
    Field { parent: NodeIndex, field: Field },
    /// One element of a list field of `parent`.
    Element {
        parent: NodeIndex,
        field: Field,
        index: usize,
    },
}

/// Current value at a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathValue<'a> {
    Absent,
    Node(NodeIndex),
    List(&'a NodeList),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("node {0:?} does not exist")]
    MissingNode(NodeIndex),
    #[error("{kind} has no field `{field}`")]
    UnknownField { kind: NodeKind, field: Field },
    #[error("field `{field}` of {kind} is not a list")]
    NotAList { kind: NodeKind, field: Field },
    #[error("field `{field}` of {kind} holds a list; address one of its elements")]
    ListField { kind: NodeKind, field: Field },
    #[error("index {index} is out of bounds for `{field}` of {kind}")]
    IndexOutOfBounds {
        kind: NodeKind,
        field: Field,
        index: usize,
    },
    #[error("the path does not hold a single node")]
    NotANode,
    #[error("the tree root cannot be replaced")]
    Root,
}

impl Path {
    pub fn root(node: NodeIndex) -> Path {
        Path::Root(node)
    }

    pub fn field(parent: NodeIndex, field: Field) -> Path {
        Path::Field { parent, field }
    }

    pub fn element(parent: NodeIndex, field: Field, index: usize) -> Path {
        Path::Element {
            parent,
            field,
            index,
        }
    }

    /// Path of `node` as currently attached, derived from the parent table.
    /// A node without a parent is a root.
    pub fn of(arena: &NodeArena, node: NodeIndex) -> Path {
        let Some(info) = arena.get_extended(node) else {
            return Path::Root(node);
        };
        let (parent, Some(field)) = (info.parent, info.parent_field) else {
            return Path::Root(node);
        };
        match arena.slot(parent, field) {
            Some(Slot::List(list)) => match list.index_of(node) {
                Some(index) => Path::element(parent, field, index),
                None => Path::field(parent, field),
            },
            _ => Path::field(parent, field),
        }
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        match *self {
            Path::Root(_) => None,
            Path::Field { parent, .. } | Path::Element { parent, .. } => Some(parent),
        }
    }

    /// Resolve `parent.field` to its slot offset and spec.
    fn locate(
        arena: &NodeArena,
        parent: NodeIndex,
        field: Field,
    ) -> Result<(NodeKind, usize, FieldShape), PathError> {
        let kind = arena.kind(parent).ok_or(PathError::MissingNode(parent))?;
        let offset = kind
            .field_index(field)
            .ok_or(PathError::UnknownField { kind, field })?;
        Ok((kind, offset, kind.schema()[offset].shape))
    }

    /// Read the current value.
    pub fn get<'a>(&self, arena: &'a NodeArena) -> Result<PathValue<'a>, PathError> {
        match *self {
            Path::Root(node) => {
                arena.get(node).ok_or(PathError::MissingNode(node))?;
                Ok(PathValue::Node(node))
            }
            Path::Field { parent, field } => {
                let (_, offset, _) = Self::locate(arena, parent, field)?;
                Ok(match &arena.slots(parent)[offset] {
                    Slot::Absent => PathValue::Absent,
                    Slot::Node(node) => PathValue::Node(*node),
                    Slot::List(list) => PathValue::List(list),
                })
            }
            Path::Element {
                parent,
                field,
                index,
            } => {
                let (kind, offset, _) = Self::locate(arena, parent, field)?;
                let list = arena.slots(parent)[offset]
                    .as_list()
                    .ok_or(PathError::NotAList { kind, field })?;
                let node = list
                    .nodes
                    .get(index)
                    .copied()
                    .ok_or(PathError::IndexOutOfBounds { kind, field, index })?;
                Ok(if node.is_none() {
                    PathValue::Absent
                } else {
                    PathValue::Node(node)
                })
            }
        }
    }

    /// The single node held at this path, if any.
    pub fn node(&self, arena: &NodeArena) -> Option<NodeIndex> {
        match self.get(arena) {
            Ok(PathValue::Node(node)) => Some(node),
            _ => None,
        }
    }

    /// True when the path holds a node or a non-empty list.
    pub fn is_populated(&self, arena: &NodeArena) -> bool {
        match self.get(arena) {
            Ok(PathValue::Node(_)) => true,
            Ok(PathValue::List(list)) => !list.is_empty(),
            _ => false,
        }
    }

    /// Replace the value with `replacement` (`None` means absent).
    ///
    /// - A single-node field becomes empty or holds the new node.
    /// - A list field can only be cleared as a whole (the clause disappears).
    /// - A list element is spliced out of its list, or swapped for the node.
    ///
    /// Returns whether anything changed.
    pub fn replace(
        &self,
        arena: &mut NodeArena,
        replacement: Option<NodeIndex>,
    ) -> Result<bool, PathError> {
        match *self {
            Path::Root(_) => Err(PathError::Root),
            Path::Field { parent, field } => {
                let (kind, offset, shape) = Self::locate(arena, parent, field)?;
                let value = match (shape, replacement) {
                    (_, None) => Slot::Absent,
                    (FieldShape::Node, Some(node)) => Slot::from(node),
                    (FieldShape::List | FieldShape::Block, Some(_)) => {
                        return Err(PathError::ListField { kind, field });
                    }
                };
                Ok(arena.replace_slot(parent, offset, value))
            }
            Path::Element {
                parent,
                field,
                index,
            } => {
                let (kind, offset, _) = Self::locate(arena, parent, field)?;
                let mut list = arena.slots(parent)[offset]
                    .as_list()
                    .ok_or(PathError::NotAList { kind, field })?
                    .clone();
                if index >= list.len() {
                    return Err(PathError::IndexOutOfBounds { kind, field, index });
                }
                match replacement {
                    None => {
                        list.nodes.remove(index);
                    }
                    Some(node) => list.nodes[index] = node,
                }
                Ok(arena.replace_slot(parent, offset, Slot::List(list)))
            }
        }
    }

    /// Delete whatever the path holds.
    pub fn delete(&self, arena: &mut NodeArena) -> Result<bool, PathError> {
        self.replace(arena, None)
    }

    /// Path of `field` on the node this path holds.
    pub fn child(&self, arena: &NodeArena, field: Field) -> Result<Path, PathError> {
        let node = self.node(arena).ok_or(PathError::NotANode)?;
        let kind = arena.kind(node).ok_or(PathError::MissingNode(node))?;
        kind.field_index(field)
            .ok_or(PathError::UnknownField { kind, field })?;
        Ok(Path::field(node, field))
    }

    /// Path of every child slot of the node this path holds: one per
    /// single-node field and one per list element, in schema order.
    pub fn children(&self, arena: &NodeArena) -> Result<Vec<Path>, PathError> {
        let node = self.node(arena).ok_or(PathError::NotANode)?;
        let kind = arena.kind(node).ok_or(PathError::MissingNode(node))?;
        let mut out = Vec::new();
        for (spec, slot) in kind.schema().iter().zip(arena.slots(node)) {
            match slot {
                Slot::List(list) => {
                    out.extend((0..list.len()).map(|index| Path::element(node, spec.field, index)));
                }
                _ => out.push(Path::field(node, spec.field)),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "tests/path_tests.rs"]
mod path_tests;
