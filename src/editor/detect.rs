//! Editor detection
//!
//! VS Code ships a `code` CLI and Cursor ships `cursor`. Whichever resolves on
//! PATH first (VS Code before Cursor, unless a preference is given) is the
//! editor every other operation talks to.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

use crate::error::{Result, SyncError};

/// Supported editor variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
pub enum EditorKind {
    /// Visual Studio Code
    #[serde(rename = "code")]
    #[value(name = "code")]
    VsCode,
    /// Cursor (VS Code fork)
    #[serde(rename = "cursor")]
    #[value(name = "cursor")]
    Cursor,
}

impl EditorKind {
    /// Probe order when no preference is given
    pub const DETECTION_ORDER: [EditorKind; 2] = [EditorKind::VsCode, EditorKind::Cursor];

    /// Name of the command-line executable
    pub fn cli_name(self) -> &'static str {
        match self {
            Self::VsCode => "code",
            Self::Cursor => "cursor",
        }
    }

    /// Directory name under the OS application-data directory
    pub fn app_dir(self) -> &'static str {
        match self {
            Self::VsCode => "Code",
            Self::Cursor => "Cursor",
        }
    }
}

impl fmt::Display for EditorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VsCode => write!(f, "VS Code"),
            Self::Cursor => write!(f, "Cursor"),
        }
    }
}

/// A detected editor and the resolved path of its CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    pub kind: EditorKind,
    pub program: PathBuf,
}

/// Detect the installed editor by probing PATH
pub fn detect_editor(preferred: Option<EditorKind>) -> Result<Editor> {
    detect_editor_with(preferred, |name| which::which(name).ok())
}

/// Detect the installed editor using a custom PATH lookup
pub fn detect_editor_with<F>(preferred: Option<EditorKind>, lookup: F) -> Result<Editor>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    if let Some(kind) = preferred {
        if let Some(program) = lookup(kind.cli_name()) {
            tracing::debug!(editor = %kind, program = %program.display(), "using preferred editor");
            return Ok(Editor { kind, program });
        }
        tracing::warn!(
            editor = %kind,
            "preferred editor CLI '{}' not found on PATH, falling back",
            kind.cli_name()
        );
    }

    for kind in EditorKind::DETECTION_ORDER {
        if let Some(program) = lookup(kind.cli_name()) {
            tracing::debug!(editor = %kind, program = %program.display(), "detected editor");
            return Ok(Editor { kind, program });
        }
    }

    Err(SyncError::EditorNotFound {
        tried: EditorKind::DETECTION_ORDER
            .iter()
            .map(|k| k.cli_name())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_only(names: &'static [&'static str]) -> impl Fn(&str) -> Option<PathBuf> {
        move |name| {
            names
                .contains(&name)
                .then(|| PathBuf::from(format!("/usr/bin/{}", name)))
        }
    }

    #[test]
    fn test_detect_prefers_vscode() {
        let editor = detect_editor_with(None, lookup_only(&["code", "cursor"])).unwrap();
        assert_eq!(editor.kind, EditorKind::VsCode);
        assert_eq!(editor.program, PathBuf::from("/usr/bin/code"));
    }

    #[test]
    fn test_detect_falls_back_to_cursor() {
        let editor = detect_editor_with(None, lookup_only(&["cursor"])).unwrap();
        assert_eq!(editor.kind, EditorKind::Cursor);
    }

    #[test]
    fn test_detect_honors_preference() {
        let editor =
            detect_editor_with(Some(EditorKind::Cursor), lookup_only(&["code", "cursor"])).unwrap();
        assert_eq!(editor.kind, EditorKind::Cursor);
    }

    #[test]
    fn test_detect_missing_preference_falls_back() {
        let editor = detect_editor_with(Some(EditorKind::Cursor), lookup_only(&["code"])).unwrap();
        assert_eq!(editor.kind, EditorKind::VsCode);
    }

    #[test]
    fn test_detect_not_found() {
        let err = detect_editor_with(None, lookup_only(&[])).unwrap_err();
        assert!(matches!(err, SyncError::EditorNotFound { .. }));
        assert!(err.to_string().contains("code, cursor"));
    }

    #[test]
    fn test_editor_kind_names() {
        assert_eq!(EditorKind::VsCode.cli_name(), "code");
        assert_eq!(EditorKind::Cursor.app_dir(), "Cursor");
        assert_eq!(EditorKind::VsCode.to_string(), "VS Code");
    }
}
