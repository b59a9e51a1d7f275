// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host application version and environment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Host application version triple (major, minor, patch).
///
/// Serializes as a plain array, which is how clip envelopes record the
/// producing host's version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HostVersion(pub u32, pub u32, pub u32);

impl HostVersion {
    /// Version of the running host build.
    pub const CURRENT: HostVersion = HostVersion(5, 1, 243);

    /// Major component.
    pub fn major(self) -> u32 {
        self.0
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0, self.1, self.2)
    }
}

/// The host facilities the codec reads, bundled as an explicit value
/// rather than ambient globals.
#[derive(Debug, Clone)]
pub struct HostEnv {
    /// Version of the running host
    pub version: HostVersion,
    /// Root of the base installation; definitions under it ship with the
    /// host and are assumed present at any destination
    pub install_root: PathBuf,
}

impl HostEnv {
    /// Create an environment description.
    pub fn new(version: HostVersion, install_root: impl Into<PathBuf>) -> Self {
        Self {
            version,
            install_root: install_root.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_display() {
        assert_eq!(HostVersion(5, 1, 243).to_string(), "5.1.243");
    }

    #[test]
    fn test_version_ordering() {
        assert!(HostVersion(4, 0, 0) > HostVersion(3, 9, 999));
    }
}
