// SPDX-License-Identifier: MIT OR Apache-2.0
//! Encoding and decoding of portable clip strings.
//!
//! Encode resolves the parent's context once (that value is authoritative
//! for the clip's whole life), writes the native binary payload through a
//! scoped temporary file, sweeps embeddable definitions, and wraps
//! everything in the JSON envelope before compressing and URL-safe
//! base64-encoding the result.
//!
//! Decode reverses the outer layers — any failure there is one corrupt-
//! payload class — then runs the admission checks in fixed order, installs
//! embedded definitions, and loads the binary payload under the target
//! parent. The load primitive does not report what it created, so the
//! target's child set is snapshotted before and after and the set
//! difference is returned as the newly created items.

use crate::assets::{collect_embeddable_assets, install_assets, InstallOptions};
use crate::context;
use crate::envelope::{Envelope, CURRENT_FORMAT_VERSION};
use crate::error::ClipError;
use crate::gate;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use graphclip_network::{snapshot, DefinitionRegistry, HostEnv, ItemId, Network};
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;

/// How a clip is applied to the destination session.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Skip embedded definitions whose type is already installed
    pub skip_known_assets: bool,
    /// Mark embedded definitions preferred over same-named installs
    pub prefer_embedded_assets: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            skip_known_assets: true,
            prefer_embedded_assets: false,
        }
    }
}

/// Encode `items` into a single portable clip string.
///
/// The items must be non-empty and share one parent container; the
/// parent's context is resolved once here and recorded as authoritative.
/// With `include_assets`, definitions authored outside the install root
/// travel inside the clip.
pub fn encode_items(
    network: &Network,
    items: &[ItemId],
    registry: &DefinitionRegistry,
    env: &HostEnv,
    include_assets: bool,
) -> Result<String, ClipError> {
    if items.is_empty() {
        return Err(ClipError::EmptyInput);
    }
    let parent = network.parent_of(items[0])?;
    for &item in &items[1..] {
        if network.parent_of(item)? != parent {
            return Err(ClipError::HeterogeneousParent);
        }
    }

    let band = context::VersionBand::for_host(env.version)?;
    let clip_context = band.child_context(network, parent)?;
    let format = band.snapshot_format();

    let assets = if include_assets {
        collect_embeddable_assets(network, items, registry, env)?
    } else {
        Vec::new()
    };

    // The native save primitive is file-based; the file never outlives
    // this call, failing paths included.
    let payload = NamedTempFile::new()?;
    snapshot::save_items_to_file(network, items, format, payload.path())?;
    let code = STANDARD.encode(fs::read(payload.path())?);
    let checksum = gate::checksum_of(&code);

    let envelope = Envelope {
        algorithm: u32::from(format.tag()),
        version_major: CURRENT_FORMAT_VERSION.0,
        version_minor: CURRENT_FORMAT_VERSION.1,
        host_version: env.version,
        context: clip_context,
        code,
        assets,
        checksum,
    };

    let json = serde_json::to_string(&envelope)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    let compressed = zstd::encode_all(json.as_bytes(), zstd::DEFAULT_COMPRESSION_LEVEL)?;
    Ok(URL_SAFE.encode(compressed))
}

/// Decode a clip string and recreate its items under `parent`.
///
/// Embedded definitions are installed before any item is created; that
/// side effect is global and survives a later failure, so a decode that
/// errored partway may already have changed the registry.
///
/// Returns exactly the items the clip created, discovered by diffing the
/// parent's child set around the load.
pub fn decode_items(
    network: &mut Network,
    clip: &str,
    parent: ItemId,
    registry: &mut DefinitionRegistry,
    env: &HostEnv,
    options: &DecodeOptions,
) -> Result<Vec<ItemId>, ClipError> {
    let envelope = parse_envelope(clip)?;

    // Admission, in fixed order: generation, format version, context,
    // checksum. A retired generation is rejected before anything else in
    // the envelope is interpreted.
    let format = gate::verify_generation(&envelope)?;
    gate::verify_format_version(&envelope)?;
    let target_context = context::resolve_child_context(network, parent, env.version)?;
    context::validate_context(&target_context, &envelope.context)?;
    gate::verify_checksum(&envelope)?;

    install_assets(
        &envelope.assets,
        registry,
        InstallOptions {
            skip_if_already_defined: options.skip_known_assets,
            force_preferred: options.prefer_embedded_assets,
        },
    )?;

    let bytes = STANDARD.decode(&envelope.code).map_err(|err| {
        ClipError::CorruptPayload(format!("code field is not valid base64: {err}"))
    })?;

    let before = network.child_ids(parent);

    let payload = NamedTempFile::new()?;
    fs::write(payload.path(), &bytes)?;
    snapshot::load_items_from_file(network, parent, format, payload.path())?;

    let created: Vec<ItemId> = network
        .children_of(parent)
        .filter(|id| !before.contains(id))
        .collect();
    tracing::info!("clip decode created {} item(s)", created.len());
    Ok(created)
}

/// Read the network context a clip requires, without running the
/// admission gate.
///
/// Lets callers check the destination up front and offer to create a
/// matching container before attempting the real decode.
pub fn required_context(clip: &str) -> Result<String, ClipError> {
    Ok(parse_envelope(clip)?.context)
}

/// Encode `items` and write the clip string to `path`.
pub fn save_items_to_path(
    network: &Network,
    items: &[ItemId],
    registry: &DefinitionRegistry,
    env: &HostEnv,
    path: &Path,
    include_assets: bool,
) -> Result<(), ClipError> {
    let clip = encode_items(network, items, registry, env, include_assets)?;
    fs::write(path, clip)?;
    Ok(())
}

/// Read a clip string from `path` and decode it under `parent`.
pub fn load_items_from_path(
    network: &mut Network,
    path: &Path,
    parent: ItemId,
    registry: &mut DefinitionRegistry,
    env: &HostEnv,
    options: &DecodeOptions,
) -> Result<Vec<ItemId>, ClipError> {
    let clip = fs::read_to_string(path)?;
    decode_items(network, &clip, parent, registry, env, options)
}

fn parse_envelope(clip: &str) -> Result<Envelope, ClipError> {
    let compressed = URL_SAFE
        .decode(clip.trim())
        .map_err(|err| corrupt("outer base64 decode", &err))?;
    let json = zstd::decode_all(compressed.as_slice())
        .map_err(|err| corrupt("decompression", &err))?;
    serde_json::from_slice(&json).map_err(|err| corrupt("envelope parse", &err))
}

fn corrupt(stage: &str, err: &dyn std::fmt::Display) -> ClipError {
    ClipError::CorruptPayload(format!("{stage} failed: {err}"))
}
