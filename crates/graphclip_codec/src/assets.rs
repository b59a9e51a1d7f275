// SPDX-License-Identifier: MIT OR Apache-2.0
//! Discovery and installation of component definitions traveling with clips.
//!
//! Stock definitions living under the host install root are assumed present
//! at any destination and never travel; only user- or project-authored
//! definitions are embedded. Installation mutates the process-wide registry
//! and is not rolled back when a later record fails.

use crate::envelope::AssetRecord;
use crate::error::ClipError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use graphclip_network::{
    definition, DefinitionRegistry, HostEnv, ItemId, Network, NetworkCategory, NetworkError,
};
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;

/// How embedded definitions are applied to the registry at decode time.
#[derive(Debug, Clone, Copy)]
pub struct InstallOptions {
    /// Skip records whose type already has any installed definition
    pub skip_if_already_defined: bool,
    /// Mark each installed definition preferred for its type, so future
    /// nodes of that type use the embedded version over same-named installs
    pub force_preferred: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            skip_if_already_defined: true,
            force_preferred: false,
        }
    }
}

/// Sweep `items`, and every nested descendant node, for definitions that
/// must travel with a payload.
///
/// A definition is embedded only when its library file lives outside the
/// install root. Nothing is deduplicated here; duplicate records across
/// nodes are acceptable and collapse at install time.
pub fn collect_embeddable_assets(
    network: &Network,
    items: &[ItemId],
    registry: &DefinitionRegistry,
    env: &HostEnv,
) -> Result<Vec<AssetRecord>, ClipError> {
    let mut records = Vec::new();
    for &item in items {
        if network.node(item).is_none() {
            continue;
        }
        let mut scope = vec![item];
        scope.extend(network.descendants(item));
        for id in scope {
            let Some(node) = network.node(id) else {
                continue;
            };
            let type_info = node.node_type();
            let Some(installed) = registry.preferred_definition(type_info.category, &type_info.name)
            else {
                // Built-in type with no authored definition behind it.
                continue;
            };
            if installed.library_path.starts_with(&env.install_root) {
                continue;
            }

            let library = NamedTempFile::new()?;
            definition::save_library(std::slice::from_ref(&installed.definition), library.path())?;
            let bytes = fs::read(library.path())?;
            records.push(AssetRecord {
                type_name: type_info.name.clone(),
                category: type_info.category.name().to_owned(),
                code: STANDARD.encode(&bytes),
            });
        }
    }
    Ok(records)
}

/// Install embedded definition records into the registry.
///
/// Runs record by record; earlier records stay installed when a later one
/// fails, and the error names the failing record.
pub fn install_assets(
    records: &[AssetRecord],
    registry: &mut DefinitionRegistry,
    options: InstallOptions,
) -> Result<(), ClipError> {
    for record in records {
        if options.skip_if_already_defined {
            let known = NetworkCategory::from_name(&record.category)
                .is_some_and(|category| registry.is_defined(category, &record.type_name));
            if known {
                tracing::debug!(
                    "definition '{}' already installed, skipping embedded copy",
                    record.type_name
                );
                continue;
            }
        }

        let bytes = STANDARD.decode(&record.code).map_err(|err| {
            ClipError::CorruptPayload(format!(
                "embedded definition '{}' is not valid base64: {err}",
                record.type_name
            ))
        })?;

        let library = NamedTempFile::new()?;
        fs::write(library.path(), &bytes)?;
        install_record(registry, library.path(), record, options.force_preferred).map_err(
            |source| ClipError::AssetInstall {
                type_name: record.type_name.clone(),
                category: record.category.clone(),
                source,
            },
        )?;
    }
    Ok(())
}

fn install_record(
    registry: &mut DefinitionRegistry,
    library: &Path,
    record: &AssetRecord,
    force_preferred: bool,
) -> Result<(), NetworkError> {
    registry.install_file(library)?;
    if force_preferred {
        for def in definition::read_library(library)? {
            if def.type_name == record.type_name {
                registry.set_preferred(def.category, &def.type_name, library);
            }
        }
    }
    Ok(())
}
