// SPDX-License-Identifier: MIT OR Apache-2.0
//! Network items: the things a container holds.

use crate::node::Node;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a network item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    /// Create a new random item ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// A free-floating annotation in a network view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Annotation text
    pub text: String,
    /// Position in the network view
    pub position: [f32; 2],
}

impl Note {
    /// Create an annotation.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position: [0.0, 0.0],
        }
    }
}

/// What an item is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ItemKind {
    /// An operator node, possibly a container with its own child network
    Node(Node),
    /// A sticky annotation
    Note(Note),
}

/// A movable item stored in a [`crate::Network`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique instance ID
    pub id: ItemId,
    /// Containing network; `None` only for the root container
    pub parent: Option<ItemId>,
    /// Payload
    pub kind: ItemKind,
}

impl Item {
    /// The node payload, if this item is a node.
    pub fn as_node(&self) -> Option<&Node> {
        match &self.kind {
            ItemKind::Node(node) => Some(node),
            ItemKind::Note(_) => None,
        }
    }

    /// Mutable node payload, if this item is a node.
    pub fn as_node_mut(&mut self) -> Option<&mut Node> {
        match &mut self.kind {
            ItemKind::Node(node) => Some(node),
            ItemKind::Note(_) => None,
        }
    }

    /// The annotation payload, if this item is a note.
    pub fn as_note(&self) -> Option<&Note> {
        match &self.kind {
            ItemKind::Note(note) => Some(note),
            ItemKind::Node(_) => None,
        }
    }
}
