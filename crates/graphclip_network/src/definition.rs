// SPDX-License-Identifier: MIT OR Apache-2.0
//! Component definitions and definition-library files.
//!
//! A component definition is a reusable, authored node-type definition. A
//! library file holds one or more of them and is the unit of installation
//! and of transfer: clips embed whole library files as bytes.

use crate::category::NetworkCategory;
use crate::network::NetworkError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Magic prefix of definition-library files.
const LIBRARY_MAGIC: [u8; 4] = *b"GCDL";

/// A reusable, authored node-type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    /// Node type name this definition implements
    pub type_name: String,
    /// Category the type lives in
    pub category: NetworkCategory,
    /// Author-facing description
    pub description: String,
    /// Opaque authored implementation payload
    pub implementation: Vec<u8>,
}

impl ComponentDefinition {
    /// Create a definition.
    pub fn new(
        type_name: impl Into<String>,
        category: NetworkCategory,
        description: impl Into<String>,
        implementation: Vec<u8>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            category,
            description: description.into(),
            implementation,
        }
    }
}

/// Write a definition library holding `definitions` to `path`.
pub fn save_library(definitions: &[ComponentDefinition], path: &Path) -> Result<(), NetworkError> {
    let body = bincode::serialize(definitions)?;
    let mut bytes = Vec::with_capacity(4 + body.len());
    bytes.extend_from_slice(&LIBRARY_MAGIC);
    bytes.extend_from_slice(&body);
    fs::write(path, bytes)?;
    Ok(())
}

/// Read every definition stored in the library file at `path`.
pub fn read_library(path: &Path) -> Result<Vec<ComponentDefinition>, NetworkError> {
    let bytes = fs::read(path)?;
    if bytes.len() < 4 || bytes[..4] != LIBRARY_MAGIC {
        return Err(NetworkError::MalformedBlob(
            "missing definition-library magic".to_owned(),
        ));
    }
    bincode::deserialize(&bytes[4..]).map_err(|err| NetworkError::MalformedBlob(err.to_string()))
}
