//! The portable snapshot of editor state
//!
//! ```json
//! {
//!   "metadata": { "created_at": "...", "system": "Linux", "vscode_sync_version": "0.1.0" },
//!   "extensions": ["publisher.extension-id"],
//!   "settings": { "editor.fontSize": 14 }
//! }
//! ```
//!
//! `extensions` and `settings` are independently optional. A missing key means
//! "not captured / not requested", which is different from an empty list or map.

pub mod codec;

use serde::{Deserialize, Serialize};

use crate::config::OsFamily;
use crate::editor::settings::Settings;

pub use codec::{check_version, decode, encode, SnapshotFormat};

/// Version stamped into exported snapshots
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Snapshot provenance
///
/// Missing fields read back as empty strings; only the `metadata` object
/// itself is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// ISO-8601 creation time
    pub created_at: String,
    /// OS family of the exporting machine
    pub system: String,
    /// Version of the tool that wrote the snapshot
    pub vscode_sync_version: String,
}

impl Metadata {
    /// Metadata for a snapshot created now, on this machine
    pub fn now() -> Self {
        Self {
            created_at: chrono::Local::now()
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, false),
            system: OsFamily::current().to_string(),
            vscode_sync_version: TOOL_VERSION.to_string(),
        }
    }
}

/// Extensions and settings captured from (or destined for) an editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: Metadata,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

impl Snapshot {
    /// Create a snapshot stamped with fresh metadata
    pub fn new(extensions: Option<Vec<String>>, settings: Option<Settings>) -> Self {
        Self {
            metadata: Metadata::now(),
            extensions,
            settings,
        }
    }

    /// Neither extensions nor settings present
    pub fn is_empty(&self) -> bool {
        self.extensions.is_none() && self.settings.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_order_is_stable() {
        let mut settings = Settings::new();
        settings.insert("editor.fontSize".to_string(), json!(14));
        let snapshot = Snapshot::new(Some(vec!["a.b".to_string()]), Some(settings));

        let text = serde_json::to_string(&snapshot).unwrap();
        let metadata = text.find("\"metadata\"").unwrap();
        let extensions = text.find("\"extensions\"").unwrap();
        let settings = text.find("\"settings\"").unwrap();
        assert!(metadata < extensions && extensions < settings);
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let snapshot = Snapshot::new(Some(vec!["a.b".to_string()]), None);
        let value = serde_json::to_value(&snapshot).unwrap();
        assert!(value.get("settings").is_none());
        assert_eq!(value["extensions"], json!(["a.b"]));
    }

    #[test]
    fn test_metadata_now() {
        let metadata = Metadata::now();
        assert_eq!(metadata.vscode_sync_version, TOOL_VERSION);
        assert_eq!(metadata.system, OsFamily::current().to_string());
        assert!(chrono::DateTime::parse_from_rfc3339(&metadata.created_at).is_ok());
    }

    #[test]
    fn test_empty_snapshot() {
        assert!(Snapshot::new(None, None).is_empty());
        assert!(!Snapshot::new(Some(vec![]), None).is_empty());
    }
}
