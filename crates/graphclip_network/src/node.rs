// SPDX-License-Identifier: MIT OR Apache-2.0
//! Operator node definitions.

use crate::category::NetworkCategory;
use crate::item::ItemId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Value stored in a node parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParmValue {
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// On/off toggle
    Toggle(bool),
    /// Text
    Text(String),
    /// 3D vector
    Vector3([f64; 3]),
}

/// Type descriptor for a node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTypeInfo {
    /// Type name, e.g. `merge` or a studio-authored component name
    pub name: String,
    /// Category the type itself lives in
    pub category: NetworkCategory,
    /// Category of child nodes, when this type is a container
    pub child_category: Option<NetworkCategory>,
}

impl NodeTypeInfo {
    /// Descriptor for a plain (non-container) type.
    pub fn new(name: impl Into<String>, category: NetworkCategory) -> Self {
        Self {
            name: name.into(),
            category,
            child_category: None,
        }
    }

    /// Descriptor for a container type holding `child_category` nodes.
    pub fn container(
        name: impl Into<String>,
        category: NetworkCategory,
        child_category: NetworkCategory,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            child_category: Some(child_category),
        }
    }

    /// Category of the network this type holds, if it is a container.
    pub fn child_category(&self) -> Option<NetworkCategory> {
        self.child_category
    }
}

/// An operator node instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Type descriptor
    pub type_info: NodeTypeInfo,
    /// Instance name
    pub name: String,
    /// Position in the network view
    pub position: [f32; 2],
    /// Parameter values keyed by parameter name
    pub parms: IndexMap<String, ParmValue>,
    /// Input wires by slot; `None` is an unconnected slot
    pub inputs: Vec<Option<ItemId>>,
}

impl Node {
    /// Create a node of the given type.
    pub fn new(type_info: NodeTypeInfo, name: impl Into<String>) -> Self {
        Self {
            type_info,
            name: name.into(),
            position: [0.0, 0.0],
            parms: IndexMap::new(),
            inputs: Vec::new(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// The node's type descriptor.
    ///
    /// Hosts from 4.0 on read the child category off this descriptor.
    pub fn node_type(&self) -> &NodeTypeInfo {
        &self.type_info
    }

    /// Child category, read straight off the node.
    ///
    /// Hosts before 4.0 exposed the category here instead of on the type
    /// descriptor. Both surfaces stay: payloads written against either one
    /// still need to load.
    pub fn child_category(&self) -> Option<NetworkCategory> {
        self.type_info.child_category
    }

    /// Whether this node is a container.
    pub fn is_container(&self) -> bool {
        self.type_info.child_category.is_some()
    }

    /// Set a parameter value.
    pub fn set_parm(&mut self, name: impl Into<String>, value: ParmValue) {
        self.parms.insert(name.into(), value);
    }

    /// Get a parameter value by name.
    pub fn parm(&self, name: &str) -> Option<&ParmValue> {
        self.parms.get(name)
    }
}
