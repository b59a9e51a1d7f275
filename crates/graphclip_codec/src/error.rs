// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error taxonomy for clip encoding and decoding.

use graphclip_network::{HostVersion, NetworkError};

/// Errors produced while encoding or decoding clips.
///
/// Every variant is terminal for the operation that raised it; nothing is
/// retried. Definition installs that happened before a later step failed
/// stay installed (see [`crate::assets::install_assets`]).
#[derive(Debug, thiserror::Error)]
pub enum ClipError {
    /// The clip failed outer decoding: base64, decompression, or the JSON
    /// envelope. Surfaced as one class; the message names the stage.
    #[error("clip data is corrupted or not a valid clip string: {0}")]
    CorruptPayload(String),

    /// The payload was written with a retired or unknown binary encoding
    #[error("clip uses unsupported encoding generation {0}; re-save it with a current host")]
    UnsupportedAlgorithm(u32),

    /// The payload's format major version postdates this build
    #[error("clip format version {found} is newer than the supported version {supported}; update the host")]
    FutureFormat {
        /// Major version recorded in the clip
        found: u32,
        /// Major version this build understands
        supported: u32,
    },

    /// The payload digest does not match its code field
    #[error("checksum verification failed; the clip was corrupted in transit")]
    ChecksumMismatch,

    /// Target network category differs from the payload's
    #[error("clip requires a '{expected}' network, but the target is a '{current}' network")]
    ContextMismatch {
        /// Category of the target container
        current: String,
        /// Category the clip was saved from
        expected: String,
    },

    /// The running host version has no context-resolution band
    #[error("unsupported host version {0}")]
    UnsupportedHostVersion(HostVersion),

    /// Items passed to encode live under different parents
    #[error("all items must share the same parent network")]
    HeterogeneousParent,

    /// Encode was called with no items
    #[error("no items were given to encode")]
    EmptyInput,

    /// A definition embedded in the clip failed to install. Definitions
    /// installed before the failing record stay installed.
    #[error("failed to install embedded definition '{type_name}' ({category}): {source}")]
    AssetInstall {
        /// Type name of the failing record
        type_name: String,
        /// Category name of the failing record
        category: String,
        /// Underlying install failure
        #[source]
        source: NetworkError,
    },

    /// Host network layer failure
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Filesystem failure outside the host network layer
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
