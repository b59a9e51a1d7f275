// SPDX-License-Identifier: MIT OR Apache-2.0
//! Integrity and compatibility checks for parsed envelopes.
//!
//! The checks are pure functions over the envelope and run in a fixed
//! order at decode time: encoding generation first (a retired generation's
//! remaining fields are untrustworthy and must never be interpreted), then
//! format major version, then target context, then checksum.

use crate::envelope::{Envelope, CURRENT_FORMAT_VERSION};
use crate::error::ClipError;
use graphclip_network::SnapshotFormat;
use sha1::{Digest, Sha1};

/// Hex digest of an encoded `code` field, as recorded in `chsum`.
///
/// Detects transport corruption only; this is not a security control and
/// must not be treated as one.
pub fn checksum_of(code: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check the encoding generation and name the binary format it selects.
///
/// Generation 0 is the retired pre-2.0 encoding and is rejected before any
/// other envelope field is looked at.
pub fn verify_generation(envelope: &Envelope) -> Result<SnapshotFormat, ClipError> {
    if envelope.algorithm == 0 {
        return Err(ClipError::UnsupportedAlgorithm(0));
    }
    u8::try_from(envelope.algorithm)
        .ok()
        .and_then(SnapshotFormat::from_tag)
        .ok_or(ClipError::UnsupportedAlgorithm(envelope.algorithm))
}

/// Reject envelopes whose format major version postdates this build.
pub fn verify_format_version(envelope: &Envelope) -> Result<(), ClipError> {
    if envelope.version_major > CURRENT_FORMAT_VERSION.0 {
        return Err(ClipError::FutureFormat {
            found: envelope.version_major,
            supported: CURRENT_FORMAT_VERSION.0,
        });
    }
    Ok(())
}

/// Verify the recorded checksum against the `code` field.
pub fn verify_checksum(envelope: &Envelope) -> Result<(), ClipError> {
    if checksum_of(&envelope.code) != envelope.checksum {
        return Err(ClipError::ChecksumMismatch);
    }
    Ok(())
}
