// SPDX-License-Identifier: MIT OR Apache-2.0
//! Registry of component definitions available to the running host.
//!
//! Installation changes which node types exist for the entire process and
//! is never rolled back; callers hold the registry by `&mut` so that side
//! effect stays visible at every call boundary.

use crate::category::NetworkCategory;
use crate::definition::{self, ComponentDefinition};
use crate::network::NetworkError;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Key identifying a definition slot: category plus type name.
pub type DefinitionKey = (NetworkCategory, String);

/// An installed definition plus its installation metadata.
#[derive(Debug, Clone)]
pub struct InstalledDefinition {
    /// The authored definition
    pub definition: ComponentDefinition,
    /// Library file this definition was installed from
    pub library_path: PathBuf,
    /// Whether this install is the preferred one for its type
    pub preferred: bool,
}

/// The process-wide component-definition registry.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    definitions: IndexMap<DefinitionKey, Vec<InstalledDefinition>>,
}

impl DefinitionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a definition, e.g. the stock ones shipped under the install root.
    pub fn register(&mut self, definition: ComponentDefinition, library_path: impl Into<PathBuf>) {
        let key = (definition.category, definition.type_name.clone());
        self.definitions.entry(key).or_default().push(InstalledDefinition {
            definition,
            library_path: library_path.into(),
            preferred: false,
        });
    }

    /// Install every definition found in the library file at `path`.
    ///
    /// Returns the keys that were installed.
    pub fn install_file(&mut self, path: &Path) -> Result<Vec<DefinitionKey>, NetworkError> {
        let definitions = definition::read_library(path)?;
        let mut keys = Vec::with_capacity(definitions.len());
        for def in definitions {
            keys.push((def.category, def.type_name.clone()));
            self.register(def, path);
        }
        tracing::info!("installed {} definition(s) from {}", keys.len(), path.display());
        Ok(keys)
    }

    /// Whether any definition is installed for the given type.
    pub fn is_defined(&self, category: NetworkCategory, type_name: &str) -> bool {
        self.definitions
            .contains_key(&(category, type_name.to_owned()))
    }

    /// The definition used when instantiating the type: the explicitly
    /// preferred install, else the most recent one.
    pub fn preferred_definition(
        &self,
        category: NetworkCategory,
        type_name: &str,
    ) -> Option<&InstalledDefinition> {
        let installs = self.definitions.get(&(category, type_name.to_owned()))?;
        installs.iter().rfind(|d| d.preferred).or_else(|| installs.last())
    }

    /// Mark the install of `type_name` that came from `library_path` as
    /// preferred. Returns `false` when no such install exists.
    pub fn set_preferred(
        &mut self,
        category: NetworkCategory,
        type_name: &str,
        library_path: &Path,
    ) -> bool {
        let Some(installs) = self.definitions.get_mut(&(category, type_name.to_owned())) else {
            return false;
        };
        if !installs.iter().any(|d| d.library_path == library_path) {
            return false;
        }
        for install in installs.iter_mut() {
            install.preferred = install.library_path == library_path;
        }
        true
    }

    /// Number of installed definitions, counting every install.
    pub fn definition_count(&self) -> usize {
        self.definitions.values().map(Vec::len).sum()
    }
}
