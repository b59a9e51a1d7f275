// SPDX-License-Identifier: MIT OR Apache-2.0
//! The versioned wire envelope wrapping an encoded clip.

use graphclip_network::HostVersion;
use serde::{Deserialize, Serialize};

/// Format version written by this build: (major, minor).
///
/// The major version gates compatibility at load time; the minor version is
/// informational only.
pub const CURRENT_FORMAT_VERSION: (u32, u32) = (2, 2);

/// An embedded component-definition record traveling with a clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Node type name the definition implements
    #[serde(rename = "type")]
    pub type_name: String,
    /// Category name of the type
    pub category: String,
    /// Base64 of the definition-library bytes
    pub code: String,
}

/// The versioned JSON envelope wrapping an encoded item payload.
///
/// Pure transit data: built fresh on every encode, discarded after decode,
/// with no identity beyond its content. The serialized field names are the
/// wire contract and never change meaning across minor versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Binary encoding generation that produced `code`; generation 0 is
    /// retired and always rejected
    #[serde(rename = "algtype")]
    pub algorithm: u32,
    /// Format major version
    #[serde(rename = "version")]
    pub version_major: u32,
    /// Format minor version, informational
    #[serde(rename = "version.minor")]
    pub version_minor: u32,
    /// Version of the producing host, diagnostic only
    #[serde(rename = "houver")]
    pub host_version: HostVersion,
    /// Network category the payload's items belong to
    pub context: String,
    /// Base64 of the raw binary item payload
    pub code: String,
    /// Embedded component definitions the payload depends on
    #[serde(rename = "hdaList", default)]
    pub assets: Vec<AssetRecord>,
    /// Hex digest of `code`, computed over the still-encoded text
    #[serde(rename = "chsum")]
    pub checksum: String,
}
