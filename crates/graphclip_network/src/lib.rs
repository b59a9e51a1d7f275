// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host-side node-network model for GraphClip.
//!
//! This crate provides the pieces of the host application the clip codec
//! operates against:
//! - A flat item store with parent links ([`Network`])
//! - Operator nodes, containers, and annotation items
//! - Binary save/load of item subtrees ([`snapshot`])
//! - Component definitions and the process-wide [`DefinitionRegistry`]
//!
//! ## Architecture
//!
//! Everything lives in one [`Network`] keyed by [`ItemId`]; containers are
//! ordinary nodes whose type descriptor carries a child category. The codec
//! crate consumes these types but owns none of them.

pub mod category;
pub mod definition;
pub mod host;
pub mod item;
pub mod network;
pub mod node;
pub mod registry;
pub mod snapshot;

pub use category::NetworkCategory;
pub use definition::ComponentDefinition;
pub use host::{HostEnv, HostVersion};
pub use item::{Item, ItemId, ItemKind, Note};
pub use network::{Network, NetworkError};
pub use node::{Node, NodeTypeInfo, ParmValue};
pub use registry::{DefinitionRegistry, InstalledDefinition};
pub use snapshot::SnapshotFormat;
