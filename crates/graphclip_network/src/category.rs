// SPDX-License-Identifier: MIT OR Apache-2.0
//! Semantic network categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The semantic category of a node network.
///
/// A container's child category determines which node types may live
/// inside it; clips record it as a plain string via [`Self::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkCategory {
    /// Object-level scene containers
    Scene,
    /// Geometry operators
    Geometry,
    /// Shading networks
    Shading,
    /// Motion and simulation operators
    Motion,
    /// Output and render drivers
    Output,
}

impl NetworkCategory {
    /// Canonical name, as recorded in clip envelopes.
    pub fn name(self) -> &'static str {
        match self {
            Self::Scene => "Scene",
            Self::Geometry => "Geometry",
            Self::Shading => "Shading",
            Self::Motion => "Motion",
            Self::Output => "Output",
        }
    }

    /// Parse a canonical name back into a category.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Scene" => Some(Self::Scene),
            "Geometry" => Some(Self::Geometry),
            "Shading" => Some(Self::Shading),
            "Motion" => Some(Self::Motion),
            "Output" => Some(Self::Output),
            _ => None,
        }
    }
}

impl fmt::Display for NetworkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
