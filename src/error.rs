//! Error types shared by the library

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("No supported editor CLI found on PATH (tried: {tried})")]
    EditorNotFound { tried: String },

    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("Settings file not found: {}", .0.display())]
    SettingsNotFound(PathBuf),

    #[error("Unknown preset '{name}' (available: {})", .available.join(", "))]
    PresetNotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("Editor CLI failed: {0}")]
    Cli(String),

    #[error("Invalid JSON in {}: {message}", .path.display())]
    Format { path: PathBuf, message: String },

    #[error("Invalid snapshot {}: {message}", .path.display())]
    Schema { path: PathBuf, message: String },

    #[error("Failed to back up {} to {}: {source}", .source_path.display(), .backup_path.display())]
    Backup {
        source_path: PathBuf,
        backup_path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{context}: {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl SyncError {
    /// Attach a path to an I/O error
    pub fn io(context: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
