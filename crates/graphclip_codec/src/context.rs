// SPDX-License-Identifier: MIT OR Apache-2.0
//! Network-context resolution across host-version bands.
//!
//! The host moved a container's child category from the node itself onto
//! its type descriptor at the 4.0 API boundary. Clips written against
//! either surface still need to load, so both paths are kept behind a
//! closed set of band handlers, selected once per call instead of
//! scattered version conditionals.

use crate::error::ClipError;
use graphclip_network::{HostVersion, ItemId, Network, NetworkError, SnapshotFormat};

/// First host major that reports the child category on the type descriptor.
const DESCRIPTOR_API_MAJOR: u32 = 4;
/// Oldest host major the codec still understands.
const OLDEST_SUPPORTED_MAJOR: u32 = 2;

/// How a given host generation exposes a container's child category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBand {
    /// Hosts before 4.0: the container node carries the category itself
    DirectCategory,
    /// Hosts from 4.0 on: the category lives on the type descriptor
    TypeDescriptor,
}

impl VersionBand {
    /// Select the band handler for a host version.
    pub fn for_host(version: HostVersion) -> Result<Self, ClipError> {
        match version.major() {
            major if major >= DESCRIPTOR_API_MAJOR => Ok(Self::TypeDescriptor),
            major if major >= OLDEST_SUPPORTED_MAJOR => Ok(Self::DirectCategory),
            _ => Err(ClipError::UnsupportedHostVersion(version)),
        }
    }

    /// Binary save format hosts in this band write.
    pub fn snapshot_format(self) -> SnapshotFormat {
        match self {
            Self::DirectCategory => SnapshotFormat::NodesOnly,
            Self::TypeDescriptor => SnapshotFormat::AllItems,
        }
    }

    /// Resolve the child category of `container` through this band's API
    /// surface.
    pub fn child_context(self, network: &Network, container: ItemId) -> Result<String, ClipError> {
        let node = network
            .node(container)
            .ok_or(NetworkError::ItemNotFound(container))?;
        let category = match self {
            Self::DirectCategory => node.child_category(),
            Self::TypeDescriptor => node.node_type().child_category(),
        };
        category
            .map(|c| c.name().to_owned())
            .ok_or_else(|| NetworkError::NotAContainer(container).into())
    }
}

/// Resolve the semantic category of the network inside `container`.
pub fn resolve_child_context(
    network: &Network,
    container: ItemId,
    host_version: HostVersion,
) -> Result<String, ClipError> {
    VersionBand::for_host(host_version)?.child_context(network, container)
}

/// Check that a target context can accept a payload context.
///
/// Plain equality, no coercion. The error carries both sides so callers
/// can offer to create a matching container instead.
pub fn validate_context(current: &str, expected: &str) -> Result<(), ClipError> {
    if current == expected {
        Ok(())
    } else {
        Err(ClipError::ContextMismatch {
            current: current.to_owned(),
            expected: expected.to_owned(),
        })
    }
}
