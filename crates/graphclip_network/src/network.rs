// SPDX-License-Identifier: MIT OR Apache-2.0
//! The flat item store backing a session's node networks.
//!
//! All items live in one map keyed by [`ItemId`] with parent links, rooted
//! at a container node. Containers are ordinary nodes whose type descriptor
//! carries a child category.

use crate::item::{Item, ItemId, ItemKind, Note};
use crate::node::{Node, NodeTypeInfo};
use crate::snapshot::SnapshotFormat;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Errors from network and item operations.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Item lookup failed
    #[error("item not found: {0:?}")]
    ItemNotFound(ItemId),

    /// Operation requires a container node
    #[error("item {0:?} is not a container")]
    NotAContainer(ItemId),

    /// Operation requires a node item
    #[error("item {0:?} is not a node")]
    NotANode(ItemId),

    /// Item has no parent network
    #[error("item {0:?} is not inside any network")]
    Detached(ItemId),

    /// Input wires must stay within one network
    #[error("cannot wire {offered:?} into {target:?}: items live in different networks")]
    CrossNetworkInput {
        /// Offered source item
        offered: ItemId,
        /// Node whose input was being set
        target: ItemId,
    },

    /// Blob bytes did not parse as a saved-items file
    #[error("malformed items blob: {0}")]
    MalformedBlob(String),

    /// Blob was written by a different save format than requested
    #[error("items blob was written as {found:?}, expected {expected:?}")]
    BlobFormatMismatch {
        /// Format recorded in the blob
        found: SnapshotFormat,
        /// Format the caller asked to load
        expected: SnapshotFormat,
    },

    /// Item data failed to encode
    #[error("item serialization failed: {0}")]
    Serialization(#[from] bincode::Error),

    /// Filesystem failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A session's item store.
#[derive(Debug, Clone)]
pub struct Network {
    items: IndexMap<ItemId, Item>,
    root: ItemId,
}

impl Network {
    /// Create a network rooted at a container of the given type.
    pub fn new(root_type: NodeTypeInfo) -> Self {
        let id = ItemId::new();
        let mut items = IndexMap::new();
        items.insert(
            id,
            Item {
                id,
                parent: None,
                kind: ItemKind::Node(Node::new(root_type, "root")),
            },
        );
        Self { items, root: id }
    }

    /// The root container.
    pub fn root(&self) -> ItemId {
        self.root
    }

    /// Look up an item.
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Look up a node item.
    pub fn node(&self, id: ItemId) -> Option<&Node> {
        self.items.get(&id).and_then(Item::as_node)
    }

    /// Look up a mutable node item.
    pub fn node_mut(&mut self, id: ItemId) -> Option<&mut Node> {
        self.items.get_mut(&id).and_then(Item::as_node_mut)
    }

    /// Number of items in the whole network, the root included.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Parent network of an item.
    pub fn parent_of(&self, id: ItemId) -> Result<ItemId, NetworkError> {
        let item = self.items.get(&id).ok_or(NetworkError::ItemNotFound(id))?;
        item.parent.ok_or(NetworkError::Detached(id))
    }

    /// Create a node under `parent`.
    pub fn add_node(&mut self, parent: ItemId, node: Node) -> Result<ItemId, NetworkError> {
        self.insert_item(parent, ItemKind::Node(node))
    }

    /// Create an annotation under `parent`.
    pub fn add_note(&mut self, parent: ItemId, note: Note) -> Result<ItemId, NetworkError> {
        self.insert_item(parent, ItemKind::Note(note))
    }

    fn insert_item(&mut self, parent: ItemId, kind: ItemKind) -> Result<ItemId, NetworkError> {
        let container = self
            .items
            .get(&parent)
            .ok_or(NetworkError::ItemNotFound(parent))?;
        if !container.as_node().is_some_and(Node::is_container) {
            return Err(NetworkError::NotAContainer(parent));
        }
        let id = ItemId::new();
        self.items.insert(
            id,
            Item {
                id,
                parent: Some(parent),
                kind,
            },
        );
        Ok(id)
    }

    /// Direct children of a container, in creation order.
    pub fn children_of(&self, parent: ItemId) -> impl Iterator<Item = ItemId> + '_ {
        self.items
            .values()
            .filter(move |item| item.parent == Some(parent))
            .map(|item| item.id)
    }

    /// Snapshot of a container's direct-child ID set.
    ///
    /// Bulk loads do not report what they created; callers take one
    /// snapshot before the load, one after, and use the set difference.
    pub fn child_ids(&self, parent: ItemId) -> HashSet<ItemId> {
        self.children_of(parent).collect()
    }

    /// Every nested descendant of an item, depth-first, the item excluded.
    pub fn descendants(&self, id: ItemId) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut stack: Vec<ItemId> = self.children_of(id).collect();
        while let Some(next) = stack.pop() {
            stack.extend(self.children_of(next));
            out.push(next);
        }
        out
    }

    /// Wire `source`'s output into input slot `slot` of `target`.
    ///
    /// Passing `None` clears the slot. The inputs vector grows to fit.
    pub fn set_input(
        &mut self,
        target: ItemId,
        slot: usize,
        source: Option<ItemId>,
    ) -> Result<(), NetworkError> {
        if let Some(source) = source {
            let source_item = self
                .items
                .get(&source)
                .ok_or(NetworkError::ItemNotFound(source))?;
            if source_item.as_node().is_none() {
                return Err(NetworkError::NotANode(source));
            }
            let target_item = self
                .items
                .get(&target)
                .ok_or(NetworkError::ItemNotFound(target))?;
            if source_item.parent != target_item.parent {
                return Err(NetworkError::CrossNetworkInput {
                    offered: source,
                    target,
                });
            }
        }
        let item = self
            .items
            .get_mut(&target)
            .ok_or(NetworkError::ItemNotFound(target))?;
        let node = item.as_node_mut().ok_or(NetworkError::NotANode(target))?;
        if node.inputs.len() <= slot {
            node.inputs.resize(slot + 1, None);
        }
        node.inputs[slot] = source;
        Ok(())
    }

    /// Remove an item, its whole subtree, and any wires into it.
    pub fn remove_item(&mut self, id: ItemId) -> Result<(), NetworkError> {
        if !self.items.contains_key(&id) {
            return Err(NetworkError::ItemNotFound(id));
        }
        if id == self.root {
            return Err(NetworkError::Detached(id));
        }
        let mut doomed = vec![id];
        doomed.extend(self.descendants(id));
        for gone in &doomed {
            self.items.shift_remove(gone);
        }
        let doomed: HashSet<ItemId> = doomed.into_iter().collect();
        for item in self.items.values_mut() {
            if let Some(node) = item.as_node_mut() {
                for slot in &mut node.inputs {
                    if slot.is_some_and(|source| doomed.contains(&source)) {
                        *slot = None;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::NetworkCategory;

    fn scene() -> Network {
        Network::new(NodeTypeInfo::container(
            "root",
            NetworkCategory::Scene,
            NetworkCategory::Scene,
        ))
    }

    fn geo_container() -> NodeTypeInfo {
        NodeTypeInfo::container("geo", NetworkCategory::Scene, NetworkCategory::Geometry)
    }

    #[test]
    fn test_add_and_list_children() {
        let mut network = scene();
        let geo = network
            .add_node(network.root(), Node::new(geo_container(), "geo1"))
            .unwrap();
        let a = network
            .add_node(geo, Node::new(NodeTypeInfo::new("grid", NetworkCategory::Geometry), "grid1"))
            .unwrap();
        let b = network
            .add_node(geo, Node::new(NodeTypeInfo::new("merge", NetworkCategory::Geometry), "merge1"))
            .unwrap();

        let children: Vec<ItemId> = network.children_of(geo).collect();
        assert_eq!(children, vec![a, b]);
        assert_eq!(network.item_count(), 4);
    }

    #[test]
    fn test_add_under_non_container_fails() {
        let mut network = scene();
        let geo = network
            .add_node(network.root(), Node::new(geo_container(), "geo1"))
            .unwrap();
        let grid = network
            .add_node(geo, Node::new(NodeTypeInfo::new("grid", NetworkCategory::Geometry), "grid1"))
            .unwrap();
        let err = network
            .add_node(grid, Node::new(NodeTypeInfo::new("merge", NetworkCategory::Geometry), "m"))
            .unwrap_err();
        assert!(matches!(err, NetworkError::NotAContainer(id) if id == grid));
    }

    #[test]
    fn test_child_id_diff_finds_new_items() {
        let mut network = scene();
        let geo = network
            .add_node(network.root(), Node::new(geo_container(), "geo1"))
            .unwrap();
        network
            .add_node(geo, Node::new(NodeTypeInfo::new("grid", NetworkCategory::Geometry), "grid1"))
            .unwrap();

        let before = network.child_ids(geo);
        let added = network
            .add_node(geo, Node::new(NodeTypeInfo::new("noise", NetworkCategory::Geometry), "noise1"))
            .unwrap();

        let created: Vec<ItemId> = network
            .children_of(geo)
            .filter(|id| !before.contains(id))
            .collect();
        assert_eq!(created, vec![added]);
    }

    #[test]
    fn test_set_input_rejects_cross_network_wires() {
        let mut network = scene();
        let geo1 = network
            .add_node(network.root(), Node::new(geo_container(), "geo1"))
            .unwrap();
        let geo2 = network
            .add_node(network.root(), Node::new(geo_container(), "geo2"))
            .unwrap();
        let a = network
            .add_node(geo1, Node::new(NodeTypeInfo::new("grid", NetworkCategory::Geometry), "a"))
            .unwrap();
        let b = network
            .add_node(geo2, Node::new(NodeTypeInfo::new("merge", NetworkCategory::Geometry), "b"))
            .unwrap();

        let err = network.set_input(b, 0, Some(a)).unwrap_err();
        assert!(matches!(err, NetworkError::CrossNetworkInput { .. }));
    }

    #[test]
    fn test_set_input_grows_slots() {
        let mut network = scene();
        let geo = network
            .add_node(network.root(), Node::new(geo_container(), "geo1"))
            .unwrap();
        let a = network
            .add_node(geo, Node::new(NodeTypeInfo::new("grid", NetworkCategory::Geometry), "a"))
            .unwrap();
        let b = network
            .add_node(geo, Node::new(NodeTypeInfo::new("merge", NetworkCategory::Geometry), "b"))
            .unwrap();

        network.set_input(b, 2, Some(a)).unwrap();
        let merge = network.node(b).unwrap();
        assert_eq!(merge.inputs, vec![None, None, Some(a)]);
    }

    #[test]
    fn test_descendants_walks_nested_containers() {
        let mut network = scene();
        let geo = network
            .add_node(network.root(), Node::new(geo_container(), "geo1"))
            .unwrap();
        let subnet = network
            .add_node(
                geo,
                Node::new(
                    NodeTypeInfo::container("subnet", NetworkCategory::Geometry, NetworkCategory::Geometry),
                    "inner",
                ),
            )
            .unwrap();
        let leaf = network
            .add_node(subnet, Node::new(NodeTypeInfo::new("grid", NetworkCategory::Geometry), "leaf"))
            .unwrap();

        let nested = network.descendants(geo);
        assert!(nested.contains(&subnet));
        assert!(nested.contains(&leaf));
        assert_eq!(nested.len(), 2);
    }

    #[test]
    fn test_remove_item_clears_subtree_and_wires() {
        let mut network = scene();
        let geo = network
            .add_node(network.root(), Node::new(geo_container(), "geo1"))
            .unwrap();
        let a = network
            .add_node(geo, Node::new(NodeTypeInfo::new("grid", NetworkCategory::Geometry), "a"))
            .unwrap();
        let b = network
            .add_node(geo, Node::new(NodeTypeInfo::new("merge", NetworkCategory::Geometry), "b"))
            .unwrap();
        network.set_input(b, 0, Some(a)).unwrap();

        network.remove_item(a).unwrap();
        assert!(network.item(a).is_none());
        assert_eq!(network.node(b).unwrap().inputs, vec![None]);

        let err = network.remove_item(network.root()).unwrap_err();
        assert!(matches!(err, NetworkError::Detached(_)));
    }
}
