//! Status command - Show the detected editor and its settings

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use super::{utils, Context};
use vscode_sync::editor::settings::read_settings;
use vscode_sync::editor::{EditorCli, EditorKind, ProcessCli};

/// What this machine looks like to vscode-sync
#[derive(Debug, Default)]
pub struct Status {
    /// Detected editor, if any
    pub editor: Option<EditorKind>,

    /// Resolved path of the editor CLI
    pub program: Option<PathBuf>,

    /// Output of `--version` (first line)
    pub version: Option<String>,

    /// Number of installed extensions, if they could be listed
    pub extensions: Option<usize>,

    /// Live settings file
    pub settings_path: Option<PathBuf>,

    /// Number of top-level settings; `None` if missing or unreadable
    pub settings_count: Option<usize>,

    /// Size of the settings file in bytes
    pub settings_size: u64,

    /// Problems encountered while inspecting
    pub notes: Vec<String>,
}

/// Inspect the environment without changing anything
///
/// Only a missing editor is an error; everything else is reported.
pub fn status(ctx: &Context, settings_file: Option<PathBuf>) -> Result<Status> {
    let editor = ctx.detect_editor()?;
    let cli = ProcessCli::for_editor(&editor);
    let mut status = Status {
        editor: Some(editor.kind),
        program: Some(editor.program.clone()),
        ..Default::default()
    };

    match cli.version() {
        Ok(version) => status.version = Some(version),
        Err(e) => status.notes.push(e.to_string()),
    }

    match cli.list_extensions() {
        Ok(extensions) => status.extensions = Some(extensions.len()),
        Err(e) => status.notes.push(e.to_string()),
    }

    let settings_path = ctx.settings_path(&editor, settings_file)?;
    match read_settings(&settings_path) {
        Ok(Some(settings)) => {
            status.settings_count = Some(settings.len());
            status.settings_size = fs::metadata(&settings_path).map(|m| m.len()).unwrap_or(0);
        }
        Ok(None) => status.notes.push("Settings file does not exist yet".to_string()),
        Err(e) => status.notes.push(e.to_string()),
    }
    status.settings_path = Some(settings_path);

    Ok(status)
}

/// Format status for display
pub fn format_status(status: &Status) -> String {
    let mut lines = vec![];

    match (&status.editor, &status.program) {
        (Some(kind), Some(program)) => {
            lines.push(format!("Editor: {} ({})", kind, program.display()))
        }
        _ => lines.push("Editor: (not found)".to_string()),
    }
    lines.push(format!(
        "Version: {}",
        status.version.as_deref().unwrap_or("(unknown)")
    ));
    lines.push(format!(
        "Extensions: {}",
        status
            .extensions
            .map(|n| n.to_string())
            .unwrap_or_else(|| "(unavailable)".to_string())
    ));

    lines.push(String::new()); // blank line

    match &status.settings_path {
        Some(path) => lines.push(format!("Settings File: {}", path.display())),
        None => lines.push("Settings File: (unknown)".to_string()),
    }
    match status.settings_count {
        Some(count) => lines.push(format!(
            "Settings: {} keys ({})",
            count,
            utils::format_size(status.settings_size)
        )),
        None => lines.push("Settings: (none)".to_string()),
    }

    if !status.notes.is_empty() {
        lines.push(String::new());
        lines.extend(status.notes.iter().map(|n| format!("Note: {}", n)));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default() {
        let status = Status::default();
        assert_eq!(status.extensions, None);
        assert_eq!(status.settings_count, None);
        assert_eq!(status.settings_size, 0);
    }

    #[test]
    fn test_format_status() {
        let status = Status {
            editor: Some(EditorKind::Cursor),
            program: Some(PathBuf::from("/usr/bin/cursor")),
            version: Some("0.42.0".to_string()),
            extensions: Some(12),
            settings_path: Some(PathBuf::from("/home/me/.config/Cursor/User/settings.json")),
            settings_count: Some(3),
            settings_size: 2048,
            notes: vec![],
        };
        let text = format_status(&status);
        assert!(text.contains("Editor: Cursor (/usr/bin/cursor)"));
        assert!(text.contains("Extensions: 12"));
        assert!(text.contains("Settings: 3 keys (2.0 KB)"));
        assert!(!text.contains("Note:"));
    }

    #[test]
    fn test_format_status_with_notes() {
        let status = Status {
            notes: vec!["Settings file does not exist yet".to_string()],
            ..Default::default()
        };
        let text = format_status(&status);
        assert!(text.contains("Editor: (not found)"));
        assert!(text.contains("Extensions: (unavailable)"));
        assert!(text.contains("Note: Settings file does not exist yet"));
    }
}
