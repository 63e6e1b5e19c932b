//! Capturing a snapshot from a live installation
//!
//! Missing pieces degrade instead of failing: no settings file means an
//! extensions-only snapshot, a failing `--list-extensions` means zero
//! extensions. Both are reported as warnings.

use std::path::{Path, PathBuf};

use crate::editor::settings::{locate_settings_file, read_settings};
use crate::editor::EditorCli;
use crate::snapshot::Snapshot;

/// What to capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub settings: bool,
    pub extensions: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            settings: true,
            extensions: true,
        }
    }
}

/// A captured snapshot plus what the codec needs to package it
#[derive(Debug, Clone)]
pub struct Capture {
    pub snapshot: Snapshot,
    /// Live settings file backing `snapshot.settings`, for ZIP packaging
    pub raw_settings: Option<PathBuf>,
    /// Recoverable problems hit while capturing
    pub warnings: Vec<String>,
}

/// Build a snapshot from the editor CLI and the live settings file
pub fn capture<C: EditorCli>(cli: &C, settings_path: &Path, options: ExportOptions) -> Capture {
    let mut warnings = Vec::new();

    let extensions = options.extensions.then(|| match cli.list_extensions() {
        Ok(extensions) => extensions,
        Err(e) => {
            tracing::debug!(error = %e, "could not list extensions, exporting none");
            warnings.push(format!("Could not list extensions ({}); exporting none", e));
            Vec::new()
        }
    });

    let mut raw_settings = None;
    let settings = if options.settings {
        match locate_settings_file(settings_path).and_then(|path| read_settings(&path)) {
            Ok(Some(settings)) => {
                raw_settings = Some(settings_path.to_path_buf());
                Some(settings)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(error = %e, "exporting without settings");
                warnings.push(format!("{}; exporting without settings", e));
                None
            }
        }
    } else {
        None
    };

    Capture {
        snapshot: Snapshot::new(extensions, settings),
        raw_settings,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::cli::fake::FakeCli;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_capture_everything() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        fs::write(&settings_path, r#"{ "editor.fontSize": 14 }"#).unwrap();
        let cli = FakeCli::with_installed(&["a.b", "c.d"]);

        let capture = capture(&cli, &settings_path, ExportOptions::default());

        assert!(capture.warnings.is_empty());
        assert_eq!(
            capture.snapshot.extensions,
            Some(vec!["a.b".to_string(), "c.d".to_string()])
        );
        let settings = capture.snapshot.settings.unwrap();
        assert_eq!(settings["editor.fontSize"], json!(14));
        assert_eq!(capture.raw_settings, Some(settings_path));
    }

    #[test]
    fn test_capture_no_settings_flag() {
        let dir = tempfile::tempdir().unwrap();
        let cli = FakeCli::with_installed(&["a.b", "c.d"]);
        let options = ExportOptions {
            settings: false,
            ..Default::default()
        };

        let capture = capture(&cli, &dir.path().join("settings.json"), options);

        assert!(capture.warnings.is_empty());
        assert_eq!(
            capture.snapshot.extensions,
            Some(vec!["a.b".to_string(), "c.d".to_string()])
        );
        assert_eq!(capture.snapshot.settings, None);
        assert_eq!(capture.raw_settings, None);
    }

    #[test]
    fn test_capture_missing_settings_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let cli = FakeCli::with_installed(&["a.b"]);

        let capture = capture(&cli, &dir.path().join("settings.json"), ExportOptions::default());

        assert_eq!(capture.snapshot.settings, None);
        assert_eq!(capture.warnings.len(), 1);
        assert!(capture.warnings[0].contains("Settings file not found"));
    }

    #[test]
    fn test_capture_malformed_settings_warns() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        fs::write(&settings_path, "{ broken").unwrap();
        let cli = FakeCli::default();

        let capture = capture(&cli, &settings_path, ExportOptions::default());

        assert_eq!(capture.snapshot.settings, None);
        assert_eq!(capture.warnings.len(), 1);
    }

    #[test]
    fn test_capture_list_failure_exports_zero_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let cli = FakeCli {
            list_fails: true,
            ..Default::default()
        };
        let options = ExportOptions {
            settings: false,
            extensions: true,
        };

        let capture = capture(&cli, &dir.path().join("settings.json"), options);

        assert_eq!(capture.snapshot.extensions, Some(vec![]));
        assert_eq!(capture.warnings.len(), 1);
    }

    #[test]
    fn test_capture_no_extensions_flag() {
        let dir = tempfile::tempdir().unwrap();
        let cli = FakeCli::with_installed(&["a.b"]);
        let options = ExportOptions {
            settings: false,
            extensions: false,
        };

        let capture = capture(&cli, &dir.path().join("settings.json"), options);
        assert!(capture.snapshot.is_empty());
    }
}
