//! Platform-specific configuration and paths
//!
//! Editor data lives under a per-OS application-data directory:
//! - macOS: ~/Library/Application Support/<App>/
//! - Linux: ~/.config/<App>/
//! - Windows: %APPDATA%/<App>/ (~/AppData/Roaming/<App>/)
//!
//! where `<App>` is `Code` for VS Code and `Cursor` for Cursor.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::editor::EditorKind;
use crate::error::{Result, SyncError};
use crate::snapshot::SnapshotFormat;

/// Operating system family, as far as editor path conventions go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    MacOs,
    Linux,
    Windows,
}

/// Application-data directory, relative to the home directory
const APP_DATA_CONVENTIONS: [(OsFamily, &[&str]); 3] = [
    (OsFamily::MacOs, &["Library", "Application Support"]),
    (OsFamily::Linux, &[".config"]),
    (OsFamily::Windows, &["AppData", "Roaming"]),
];

impl OsFamily {
    /// The OS family this binary was built for
    ///
    /// Unix-likes other than macOS follow the XDG layout, same as Linux.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(windows) {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    fn app_data_segments(self) -> &'static [&'static str] {
        APP_DATA_CONVENTIONS
            .iter()
            .find(|(os, _)| *os == self)
            .map(|(_, segments)| *segments)
            .unwrap_or(&[".config"])
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs => write!(f, "macOS"),
            Self::Linux => write!(f, "Linux"),
            Self::Windows => write!(f, "Windows"),
        }
    }
}

/// The editor's data directory, e.g. ~/.config/Code
pub fn editor_data_dir(os: OsFamily, editor: EditorKind, home: &Path) -> PathBuf {
    let mut dir = home.to_path_buf();
    for segment in os.app_data_segments() {
        dir.push(segment);
    }
    dir.join(editor.app_dir())
}

/// The editor's user settings.json
pub fn settings_path(os: OsFamily, editor: EditorKind, home: &Path) -> PathBuf {
    editor_data_dir(os, editor, home)
        .join("User")
        .join("settings.json")
}

/// storage.json files that record recently opened folders
/// - <App>/User/globalStorage/storage.json
/// - <App>/storage.json (older editor versions)
pub fn storage_json_paths(os: OsFamily, editor: EditorKind, home: &Path) -> Vec<PathBuf> {
    let data_dir = editor_data_dir(os, editor, home);
    vec![
        data_dir
            .join("User")
            .join("globalStorage")
            .join("storage.json"),
        data_dir.join("storage.json"),
    ]
}

/// Settings path for the current user and OS
pub fn default_settings_path(editor: EditorKind) -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(SyncError::NoHomeDir)?;
    Ok(settings_path(OsFamily::current(), editor, &home))
}

/// Get the tool's own directory (~/.vscode-sync/)
pub fn tool_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(SyncError::NoHomeDir)?;
    Ok(home.join(".vscode-sync"))
}

/// User configuration, read from ~/.vscode-sync/config.json
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Back up the live settings file before an import rewrites it
    pub auto_backup: bool,
    /// Export format when the destination extension doesn't say
    pub default_format: SnapshotFormat,
    /// Preferred editor when both CLIs are installed
    pub editor: Option<EditorKind>,
    /// Explicit live settings file, overriding the per-OS convention
    pub settings_path: Option<PathBuf>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            auto_backup: true,
            default_format: SnapshotFormat::Json,
            editor: None,
            settings_path: None,
        }
    }
}

impl SyncConfig {
    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        Ok(tool_dir()?.join("config.json"))
    }

    /// Load the config file, falling back to defaults
    ///
    /// A missing file is not an error. A malformed one is logged and ignored.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SyncError::io("Failed to read config", path, e))?;

        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                Ok(Self::default())
            }
        }
    }
}
