// SPDX-License-Identifier: MIT OR Apache-2.0
//! Binary save and load of item subtrees.
//!
//! Two encodings exist because the host changed what a save captures at the
//! 4.0 boundary: older hosts wrote node items only, modern hosts write every
//! movable item. Both stay readable indefinitely; a blob names its own
//! format behind a magic prefix and readers refuse a format they were not
//! asked for.
//!
//! Loading creates fresh items under the target parent and deliberately
//! reports nothing about what it created; callers that need the new set
//! snapshot the parent's children before and after and diff.

use crate::category::NetworkCategory;
use crate::item::{Item, ItemId, ItemKind, Note};
use crate::network::{Network, NetworkError};
use crate::node::{Node, NodeTypeInfo, ParmValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Magic prefix of saved-items blobs.
const BLOB_MAGIC: [u8; 4] = *b"GCSI";

/// Which binary encoding rules a saved-items blob uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// Pre-4.0 hosts: node items only, annotations are dropped
    NodesOnly,
    /// Hosts from 4.0 on: every movable item
    AllItems,
}

impl SnapshotFormat {
    /// Tag byte written after the magic.
    pub fn tag(self) -> u8 {
        match self {
            Self::NodesOnly => 1,
            Self::AllItems => 2,
        }
    }

    /// Parse a tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::NodesOnly),
            2 => Some(Self::AllItems),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotNode {
    type_name: String,
    category: NetworkCategory,
    child_category: Option<NetworkCategory>,
    name: String,
    position: [f32; 2],
    parms: IndexMap<String, ParmValue>,
    /// Input slots as indices into this level's item list
    inputs: Vec<Option<u32>>,
    children: Vec<SnapshotItem>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotNote {
    text: String,
    position: [f32; 2],
}

#[derive(Debug, Serialize, Deserialize)]
enum SnapshotItem {
    Node(SnapshotNode),
    Note(SnapshotNote),
}

/// Serialize `items`, and the full subtrees of any containers among them,
/// into a blob file at `path`.
///
/// Callers are responsible for ensuring the items share one parent. Wires
/// to nodes outside the saved set are dropped.
pub fn save_items_to_file(
    network: &Network,
    items: &[ItemId],
    format: SnapshotFormat,
    path: &Path,
) -> Result<(), NetworkError> {
    let captured = capture_level(network, items, format)?;
    let body = match format {
        SnapshotFormat::NodesOnly => {
            let nodes: Vec<&SnapshotNode> = captured
                .iter()
                .filter_map(|item| match item {
                    SnapshotItem::Node(node) => Some(node),
                    SnapshotItem::Note(_) => None,
                })
                .collect();
            bincode::serialize(&nodes)?
        }
        SnapshotFormat::AllItems => bincode::serialize(&captured)?,
    };
    let mut bytes = Vec::with_capacity(5 + body.len());
    bytes.extend_from_slice(&BLOB_MAGIC);
    bytes.push(format.tag());
    bytes.extend_from_slice(&body);
    fs::write(path, bytes)?;
    Ok(())
}

/// Recreate the items stored in the blob at `path` under `parent`.
///
/// New items get fresh IDs and recorded wires are re-established among the
/// newly created set. A recorded wire whose source is missing from the blob
/// is logged and skipped rather than failing the whole load.
pub fn load_items_from_file(
    network: &mut Network,
    parent: ItemId,
    format: SnapshotFormat,
    path: &Path,
) -> Result<(), NetworkError> {
    let bytes = fs::read(path)?;
    if bytes.len() < 5 || bytes[..4] != BLOB_MAGIC {
        return Err(NetworkError::MalformedBlob(
            "missing saved-items magic".to_owned(),
        ));
    }
    let found = SnapshotFormat::from_tag(bytes[4])
        .ok_or_else(|| NetworkError::MalformedBlob(format!("unknown format tag {}", bytes[4])))?;
    if found != format {
        return Err(NetworkError::BlobFormatMismatch {
            found,
            expected: format,
        });
    }
    let items: Vec<SnapshotItem> = match format {
        SnapshotFormat::NodesOnly => {
            let nodes: Vec<SnapshotNode> = bincode::deserialize(&bytes[5..])
                .map_err(|err| NetworkError::MalformedBlob(err.to_string()))?;
            nodes.into_iter().map(SnapshotItem::Node).collect()
        }
        SnapshotFormat::AllItems => bincode::deserialize(&bytes[5..])
            .map_err(|err| NetworkError::MalformedBlob(err.to_string()))?,
    };
    restore_level(network, parent, &items)?;
    Ok(())
}

fn capture_level(
    network: &Network,
    items: &[ItemId],
    format: SnapshotFormat,
) -> Result<Vec<SnapshotItem>, NetworkError> {
    let mut kept: Vec<(ItemId, &Item)> = Vec::new();
    for &id in items {
        let item = network.item(id).ok_or(NetworkError::ItemNotFound(id))?;
        if format == SnapshotFormat::NodesOnly && matches!(item.kind, ItemKind::Note(_)) {
            continue;
        }
        kept.push((id, item));
    }
    let index_of: HashMap<ItemId, u32> = kept
        .iter()
        .enumerate()
        .map(|(index, (id, _))| (*id, index as u32))
        .collect();

    let mut captured = Vec::with_capacity(kept.len());
    for (id, item) in &kept {
        captured.push(match &item.kind {
            ItemKind::Node(node) => {
                let children: Vec<ItemId> = network.children_of(*id).collect();
                SnapshotItem::Node(SnapshotNode {
                    type_name: node.type_info.name.clone(),
                    category: node.type_info.category,
                    child_category: node.type_info.child_category,
                    name: node.name.clone(),
                    position: node.position,
                    parms: node.parms.clone(),
                    inputs: node
                        .inputs
                        .iter()
                        .map(|slot| slot.and_then(|source| index_of.get(&source).copied()))
                        .collect(),
                    children: capture_level(network, &children, format)?,
                })
            }
            ItemKind::Note(note) => SnapshotItem::Note(SnapshotNote {
                text: note.text.clone(),
                position: note.position,
            }),
        });
    }
    Ok(captured)
}

fn restore_level(
    network: &mut Network,
    parent: ItemId,
    items: &[SnapshotItem],
) -> Result<Vec<ItemId>, NetworkError> {
    let mut created = Vec::with_capacity(items.len());
    for snap in items {
        match snap {
            SnapshotItem::Node(snap_node) => {
                let type_info = NodeTypeInfo {
                    name: snap_node.type_name.clone(),
                    category: snap_node.category,
                    child_category: snap_node.child_category,
                };
                let mut node = Node::new(type_info, snap_node.name.clone());
                node.position = snap_node.position;
                node.parms = snap_node.parms.clone();
                node.inputs = vec![None; snap_node.inputs.len()];
                let id = network.add_node(parent, node)?;
                created.push(id);
                if !snap_node.children.is_empty() {
                    restore_level(network, id, &snap_node.children)?;
                }
            }
            SnapshotItem::Note(snap_note) => {
                let mut note = Note::new(snap_note.text.clone());
                note.position = snap_note.position;
                created.push(network.add_note(parent, note)?);
            }
        }
    }

    for (snap, &id) in items.iter().zip(&created) {
        let SnapshotItem::Node(snap_node) = snap else {
            continue;
        };
        for (slot, recorded) in snap_node.inputs.iter().enumerate() {
            let Some(local) = recorded else { continue };
            match created.get(*local as usize) {
                Some(&source) => network.set_input(id, slot, Some(source))?,
                None => tracing::warn!(
                    "dropping wire into input {slot} of '{}': source index {local} is not in the blob",
                    snap_node.name
                ),
            }
        }
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn scene() -> Network {
        Network::new(NodeTypeInfo::container(
            "root",
            NetworkCategory::Scene,
            NetworkCategory::Scene,
        ))
    }

    fn geo(network: &mut Network) -> ItemId {
        network
            .add_node(
                network.root(),
                Node::new(
                    NodeTypeInfo::container("geo", NetworkCategory::Scene, NetworkCategory::Geometry),
                    "geo1",
                ),
            )
            .unwrap()
    }

    #[test]
    fn test_round_trip_restores_wires_and_parms() {
        let mut network = scene();
        let source_geo = geo(&mut network);
        let mut grid = Node::new(NodeTypeInfo::new("grid", NetworkCategory::Geometry), "grid1");
        grid.set_parm("rows", ParmValue::Int(12));
        let a = network.add_node(source_geo, grid).unwrap();
        let b = network
            .add_node(
                source_geo,
                Node::new(NodeTypeInfo::new("smooth", NetworkCategory::Geometry), "smooth1"),
            )
            .unwrap();
        network.set_input(b, 0, Some(a)).unwrap();

        let blob = NamedTempFile::new().unwrap();
        save_items_to_file(&network, &[a, b], SnapshotFormat::AllItems, blob.path()).unwrap();

        let target_geo = geo(&mut network);
        load_items_from_file(&mut network, target_geo, SnapshotFormat::AllItems, blob.path())
            .unwrap();

        let children: Vec<ItemId> = network.children_of(target_geo).collect();
        assert_eq!(children.len(), 2);
        let new_grid = children[0];
        let new_smooth = children[1];
        assert_eq!(network.node(new_grid).unwrap().type_info.name, "grid");
        assert_eq!(
            network.node(new_grid).unwrap().parm("rows"),
            Some(&ParmValue::Int(12))
        );
        assert_eq!(network.node(new_smooth).unwrap().inputs, vec![Some(new_grid)]);
    }

    #[test]
    fn test_nodes_only_drops_annotations() {
        let mut network = scene();
        let source_geo = geo(&mut network);
        let a = network
            .add_node(
                source_geo,
                Node::new(NodeTypeInfo::new("grid", NetworkCategory::Geometry), "grid1"),
            )
            .unwrap();
        let note = network
            .add_note(source_geo, Note::new("remember to cache this"))
            .unwrap();

        let blob = NamedTempFile::new().unwrap();
        save_items_to_file(&network, &[a, note], SnapshotFormat::NodesOnly, blob.path()).unwrap();

        let target_geo = geo(&mut network);
        load_items_from_file(&mut network, target_geo, SnapshotFormat::NodesOnly, blob.path())
            .unwrap();
        assert_eq!(network.children_of(target_geo).count(), 1);
    }

    #[test]
    fn test_all_items_keeps_annotations() {
        let mut network = scene();
        let source_geo = geo(&mut network);
        let a = network
            .add_node(
                source_geo,
                Node::new(NodeTypeInfo::new("grid", NetworkCategory::Geometry), "grid1"),
            )
            .unwrap();
        let note = network
            .add_note(source_geo, Note::new("remember to cache this"))
            .unwrap();

        let blob = NamedTempFile::new().unwrap();
        save_items_to_file(&network, &[a, note], SnapshotFormat::AllItems, blob.path()).unwrap();

        let target_geo = geo(&mut network);
        load_items_from_file(&mut network, target_geo, SnapshotFormat::AllItems, blob.path())
            .unwrap();

        let children: Vec<ItemId> = network.children_of(target_geo).collect();
        assert_eq!(children.len(), 2);
        let texts: Vec<&str> = children
            .iter()
            .filter_map(|id| network.item(*id).unwrap().as_note())
            .map(|n| n.text.as_str())
            .collect();
        assert_eq!(texts, vec!["remember to cache this"]);
    }

    #[test]
    fn test_container_subtree_travels() {
        let mut network = scene();
        let source_geo = geo(&mut network);
        let subnet = network
            .add_node(
                source_geo,
                Node::new(
                    NodeTypeInfo::container("subnet", NetworkCategory::Geometry, NetworkCategory::Geometry),
                    "inner",
                ),
            )
            .unwrap();
        network
            .add_node(
                subnet,
                Node::new(NodeTypeInfo::new("grid", NetworkCategory::Geometry), "leaf"),
            )
            .unwrap();

        let blob = NamedTempFile::new().unwrap();
        save_items_to_file(&network, &[subnet], SnapshotFormat::AllItems, blob.path()).unwrap();

        let target_geo = geo(&mut network);
        load_items_from_file(&mut network, target_geo, SnapshotFormat::AllItems, blob.path())
            .unwrap();

        let children: Vec<ItemId> = network.children_of(target_geo).collect();
        assert_eq!(children.len(), 1);
        let inner: Vec<ItemId> = network.children_of(children[0]).collect();
        assert_eq!(inner.len(), 1);
        assert_eq!(network.node(inner[0]).unwrap().name, "leaf");
    }

    #[test]
    fn test_external_wires_are_dropped() {
        let mut network = scene();
        let source_geo = geo(&mut network);
        let outside = network
            .add_node(
                source_geo,
                Node::new(NodeTypeInfo::new("grid", NetworkCategory::Geometry), "outside"),
            )
            .unwrap();
        let saved = network
            .add_node(
                source_geo,
                Node::new(NodeTypeInfo::new("smooth", NetworkCategory::Geometry), "saved"),
            )
            .unwrap();
        network.set_input(saved, 0, Some(outside)).unwrap();

        let blob = NamedTempFile::new().unwrap();
        save_items_to_file(&network, &[saved], SnapshotFormat::AllItems, blob.path()).unwrap();

        let target_geo = geo(&mut network);
        load_items_from_file(&mut network, target_geo, SnapshotFormat::AllItems, blob.path())
            .unwrap();
        let children: Vec<ItemId> = network.children_of(target_geo).collect();
        assert_eq!(network.node(children[0]).unwrap().inputs, vec![None]);
    }

    #[test]
    fn test_format_mismatch_is_rejected() {
        let mut network = scene();
        let source_geo = geo(&mut network);
        let a = network
            .add_node(
                source_geo,
                Node::new(NodeTypeInfo::new("grid", NetworkCategory::Geometry), "grid1"),
            )
            .unwrap();

        let blob = NamedTempFile::new().unwrap();
        save_items_to_file(&network, &[a], SnapshotFormat::AllItems, blob.path()).unwrap();

        let err = load_items_from_file(
            &mut network,
            source_geo,
            SnapshotFormat::NodesOnly,
            blob.path(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            NetworkError::BlobFormatMismatch {
                found: SnapshotFormat::AllItems,
                expected: SnapshotFormat::NodesOnly,
            }
        ));
    }

    #[test]
    fn test_garbage_blob_is_rejected() {
        let mut network = scene();
        let target = geo(&mut network);
        let blob = NamedTempFile::new().unwrap();
        std::fs::write(blob.path(), b"not a blob at all").unwrap();

        let err =
            load_items_from_file(&mut network, target, SnapshotFormat::AllItems, blob.path())
                .unwrap_err();
        assert!(matches!(err, NetworkError::MalformedBlob(_)));
    }
}
