//! NodeArena read access: headers, slots, parents and tree dumps.

use super::base::{NodeIndex, NodeList};
use super::field::Field;
use super::node::{ExtendedNodeInfo, ModifiedFlags, Node, NodeArena, Slot};
use super::node_kind::NodeKind;
use serde_json::{Map, Value, json};

impl NodeArena {
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.as_usize())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(index.as_usize())
    }

    #[inline]
    pub fn get_extended(&self, index: NodeIndex) -> Option<&ExtendedNodeInfo> {
        self.extended_info.get(index.as_usize())
    }

    /// Number of nodes ever allocated (including detached ones).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn kind(&self, index: NodeIndex) -> Option<NodeKind> {
        self.get(index).map(|node| node.kind)
    }

    /// Current slots of a node, one per schema field.
    pub fn slots(&self, index: NodeIndex) -> &[Slot] {
        match self.get(index) {
            Some(node) => {
                let start = node.slot_start as usize;
                &self.slots[start..start + node.kind.schema().len()]
            }
            None => &[],
        }
    }

    /// Slots as they were before the node's first mutation, if it has been
    /// mutated.
    pub fn original_slots(&self, index: NodeIndex) -> Option<&[Slot]> {
        self.originals.get(&index).map(|slots| &slots[..])
    }

    pub fn slot(&self, index: NodeIndex, field: Field) -> Option<&Slot> {
        let kind = self.kind(index)?;
        let offset = kind.field_index(field)?;
        self.slots(index).get(offset)
    }

    /// Child node held in a single-node field, or `NodeIndex::NONE`.
    pub fn child(&self, index: NodeIndex, field: Field) -> NodeIndex {
        self.slot(index, field)
            .and_then(Slot::as_node)
            .unwrap_or(NodeIndex::NONE)
    }

    pub fn list(&self, index: NodeIndex, field: Field) -> Option<&NodeList> {
        self.slot(index, field).and_then(Slot::as_list)
    }

    /// Children in schema order (array holes skipped).
    pub fn children(&self, index: NodeIndex) -> impl DoubleEndedIterator<Item = NodeIndex> + '_ {
        self.slots(index).iter().flat_map(Slot::children)
    }

    #[inline]
    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.get_extended(index)
            .map_or(NodeIndex::NONE, |info| info.parent)
    }

    #[inline]
    pub fn modified_flags(&self, index: NodeIndex) -> ModifiedFlags {
        self.get_extended(index)
            .map_or(ModifiedFlags::empty(), |info| info.modified)
    }

    /// The node's own slots changed.
    #[inline]
    pub fn is_modified(&self, index: NodeIndex) -> bool {
        self.modified_flags(index).contains(ModifiedFlags::MODIFIED)
    }

    /// The node or something below it changed.
    #[inline]
    pub fn is_dirty(&self, index: NodeIndex) -> bool {
        !self.modified_flags(index).is_empty()
    }

    /// Name of an identifier or type parameter.
    pub fn name(&self, index: NodeIndex) -> &str {
        self.get(index)
            .map_or("", |node| self.interner.resolve(node.atom))
    }

    /// Every node reachable from `root`, in pre-order.
    pub fn descendants(&self, root: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if self.get(node).is_none() {
                continue;
            }
            out.push(node);
            stack.extend(self.children(node).rev());
        }
        out
    }

    // =========================================================================
    // Structural dump
    // =========================================================================

    /// Dump the live tree under `root` as ESTree-shaped JSON.
    ///
    /// Two trees are structurally equal when their dumps are equal.
    pub fn to_json(&self, root: NodeIndex) -> Value {
        let Some(node) = self.get(root) else {
            return Value::Null;
        };
        let mut object = Map::new();
        object.insert("type".into(), json!(node.kind.as_str()));
        object.insert("range".into(), json!([node.pos, node.end]));
        if !node.atom.is_none() {
            object.insert("name".into(), json!(self.name(root)));
        }
        if node.token.text().is_some() || node.kind == NodeKind::Literal {
            object.insert("token".into(), json!(node.token));
        }
        if !node.flags.is_empty() {
            let flags: Vec<&str> = node.flags.iter_names().map(|(name, _)| name).collect();
            object.insert("flags".into(), json!(flags));
        }
        for (spec, slot) in node.kind.schema().iter().zip(self.slots(root)) {
            let value = match slot {
                Slot::Absent => Value::Null,
                Slot::Node(child) => self.to_json(*child),
                Slot::List(list) => Value::Array(
                    list.nodes
                        .iter()
                        .map(|&child| self.to_json(child))
                        .collect(),
                ),
            };
            object.insert(spec.field.as_str().into(), value);
        }
        Value::Object(object)
    }
}
