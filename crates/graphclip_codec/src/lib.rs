// SPDX-License-Identifier: MIT OR Apache-2.0
//! Portable node-network clips for GraphClip.
//!
//! A clip is a single URL-safe string carrying a compressed, checksummed
//! JSON envelope around a native binary item payload, plus any authored
//! component definitions the payload depends on. Clips survive clipboards,
//! files, and plain-text transports, and reconstruct their items under a
//! compatible container elsewhere.
//!
//! ## Pipeline
//!
//! Save: items → context resolution → native binary payload → definition
//! sweep → JSON envelope → compress → URL-safe base64.
//!
//! Load: the reverse, behind an admission gate that checks, in order, the
//! encoding generation, the format major version, the target context, and
//! the payload checksum.

pub mod assets;
pub mod codec;
pub mod context;
pub mod envelope;
pub mod error;
pub mod gate;

pub use assets::{collect_embeddable_assets, install_assets, InstallOptions};
pub use codec::{
    decode_items, encode_items, load_items_from_path, required_context, save_items_to_path,
    DecodeOptions,
};
pub use context::{resolve_child_context, validate_context, VersionBand};
pub use envelope::{AssetRecord, Envelope, CURRENT_FORMAT_VERSION};
pub use error::ClipError;
