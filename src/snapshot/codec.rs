//! Snapshot encoding and decoding
//!
//! Two packagings share one JSON document:
//! - JSON: the document on its own
//! - ZIP: the document as `config.json`, plus the live settings file verbatim
//!   as `settings.json` when settings were captured

use serde::Deserialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use super::{Metadata, Snapshot, TOOL_VERSION};
use crate::editor::cli::validate_extension_id;
use crate::editor::settings::json_type_name;
use crate::error::{Result, SyncError};

/// Name of the snapshot document inside a ZIP package
pub const CONFIG_ENTRY: &str = "config.json";

/// Name of the raw settings file inside a ZIP package
pub const SETTINGS_ENTRY: &str = "settings.json";

/// Entry names written by earlier releases, still accepted on decode
const LEGACY_CONFIG_ENTRIES: [&str; 2] = ["vscode_config.json", "vscode_sync_export.json"];

/// Local file header / empty archive signatures
const ZIP_MAGIC: [&[u8]; 2] = [b"PK\x03\x04", b"PK\x05\x06"];

/// On-disk packaging of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    Json,
    Zip,
}

impl SnapshotFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }
}

/// Write a snapshot to `destination`, replacing any existing file
///
/// `raw_settings` is the live settings file to bundle alongside the document
/// in ZIP mode; it is ignored for JSON and when the snapshot has no settings.
pub fn encode(
    snapshot: &Snapshot,
    destination: &Path,
    format: SnapshotFormat,
    raw_settings: Option<&Path>,
) -> Result<()> {
    let document = to_document(snapshot, destination)?;

    match format {
        SnapshotFormat::Json => fs::write(destination, document)
            .map_err(|e| SyncError::io("Failed to write snapshot", destination, e)),
        SnapshotFormat::Zip => {
            let raw = match (snapshot.settings.as_ref(), raw_settings) {
                (Some(_), Some(path)) if path.is_file() => Some(
                    fs::read(path).map_err(|e| SyncError::io("Failed to read settings", path, e))?,
                ),
                _ => None,
            };
            write_zip(destination, document.as_bytes(), raw.as_deref())
        }
    }
}

fn to_document(snapshot: &Snapshot, destination: &Path) -> Result<String> {
    let mut document =
        serde_json::to_string_pretty(snapshot).map_err(|e| SyncError::Format {
            path: destination.to_path_buf(),
            message: e.to_string(),
        })?;
    document.push('\n');
    Ok(document)
}

fn write_zip(destination: &Path, document: &[u8], raw_settings: Option<&[u8]>) -> Result<()> {
    let io_err = |e| SyncError::io("Failed to write snapshot", destination, e);

    let file = File::create(destination).map_err(io_err)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file(CONFIG_ENTRY, options)?;
    zip.write_all(document).map_err(io_err)?;

    if let Some(raw) = raw_settings {
        zip.start_file(SETTINGS_ENTRY, options)?;
        zip.write_all(raw).map_err(io_err)?;
    }

    zip.finish()?;
    Ok(())
}

/// Read a snapshot from a JSON file or ZIP package
///
/// The packaging is detected from the file's leading bytes, so a ZIP without
/// a `.zip` extension still decodes.
pub fn decode(source: &Path) -> Result<Snapshot> {
    let bytes = fs::read(source).map_err(|e| SyncError::io("Failed to read snapshot", source, e))?;

    let document = if is_zip(&bytes) {
        read_zip_document(bytes, source)?
    } else {
        bytes
    };

    parse_document(&document, source)
}

fn is_zip(bytes: &[u8]) -> bool {
    ZIP_MAGIC.iter().any(|magic| bytes.starts_with(magic))
}

fn read_zip_document(bytes: Vec<u8>, source: &Path) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    for name in std::iter::once(CONFIG_ENTRY).chain(LEGACY_CONFIG_ENTRIES) {
        let mut entry = match archive.by_name(name) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => continue,
            Err(e) => return Err(e.into()),
        };

        let mut document = Vec::new();
        entry
            .read_to_end(&mut document)
            .map_err(|e| SyncError::io("Failed to read archive entry", source, e))?;
        tracing::debug!(entry = name, "read snapshot document from archive");
        return Ok(document);
    }

    Err(SyncError::Schema {
        path: source.to_path_buf(),
        message: format!("archive has no {} entry", CONFIG_ENTRY),
    })
}

fn parse_document(document: &[u8], source: &Path) -> Result<Snapshot> {
    let value: Value = serde_json::from_slice(document).map_err(|e| SyncError::Format {
        path: source.to_path_buf(),
        message: e.to_string(),
    })?;

    let schema_err = |message: String| SyncError::Schema {
        path: source.to_path_buf(),
        message,
    };

    let Some(object) = value.as_object() else {
        return Err(schema_err(format!(
            "expected a JSON object, found {}",
            json_type_name(&value)
        )));
    };

    match object.get("metadata") {
        Some(Value::Object(_)) => {}
        Some(other) => {
            return Err(schema_err(format!(
                "'metadata' must be an object, found {}",
                json_type_name(other)
            )))
        }
        None => return Err(schema_err("missing required key 'metadata'".to_string())),
    }

    match object.get("extensions") {
        None | Some(Value::Array(_)) => {}
        Some(other) => {
            return Err(schema_err(format!(
                "'extensions' must be an array, found {}",
                json_type_name(other)
            )))
        }
    }

    match object.get("settings") {
        None | Some(Value::Object(_)) => {}
        Some(other) => {
            return Err(schema_err(format!(
                "'settings' must be an object, found {}",
                json_type_name(other)
            )))
        }
    }

    let mut snapshot: Snapshot =
        serde_json::from_value(value).map_err(|e| schema_err(e.to_string()))?;

    if let Some(extensions) = snapshot.extensions.as_mut() {
        for id in extensions.iter() {
            validate_extension_id(id).map_err(schema_err)?;
        }

        let before = extensions.len();
        let mut seen = std::collections::HashSet::new();
        extensions.retain(|id| seen.insert(id.clone()));
        if extensions.len() != before {
            tracing::warn!(
                path = %source.display(),
                removed = before - extensions.len(),
                "dropped duplicate extension identifiers"
            );
        }
    }

    Ok(snapshot)
}

/// Compare the snapshot's tool version with ours
///
/// Returns a warning message when the versions may be incompatible (different
/// major version, or different minor before 1.0). Never an error: snapshots
/// from other versions are still imported.
pub fn check_version(metadata: &Metadata) -> Option<String> {
    let current = semver::Version::parse(TOOL_VERSION).ok()?;

    if metadata.vscode_sync_version.is_empty() {
        return Some("snapshot does not record which vscode-sync version wrote it".to_string());
    }

    match semver::Version::parse(&metadata.vscode_sync_version) {
        Ok(theirs) => {
            let compatible = if current.major == 0 {
                theirs.major == 0 && theirs.minor == current.minor
            } else {
                theirs.major == current.major
            };
            (!compatible).then(|| {
                format!(
                    "snapshot was written by vscode-sync {}, this is {}",
                    theirs, current
                )
            })
        }
        Err(_) => Some(format!(
            "snapshot has unrecognised vscode-sync version '{}'",
            metadata.vscode_sync_version
        )),
    }
}
