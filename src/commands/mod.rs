//! CLI commands

pub mod export;
pub mod import;
pub mod list_repos;
pub mod presets;
pub mod status;
pub mod utils;
pub mod wizard;

use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

use vscode_sync::config::{self, SyncConfig};
use vscode_sync::editor::{detect_editor, Editor, EditorKind};

/// Settings shared by all commands: config file plus global flags
pub struct Context {
    pub config: SyncConfig,
    editor_flag: Option<EditorKind>,
}

impl Context {
    pub fn new(config: SyncConfig, editor_flag: Option<EditorKind>) -> Self {
        Self {
            config,
            editor_flag,
        }
    }

    /// Detect the editor; `--editor` wins over the config file
    pub fn detect_editor(&self) -> Result<Editor> {
        let preferred = self.editor_flag.or(self.config.editor);
        let editor = detect_editor(preferred)?;
        println!(
            "Using {} ({})",
            editor.kind.bold(),
            editor.program.display().dimmed()
        );
        Ok(editor)
    }

    /// Live settings file: `--settings-file`, then config, then the OS convention
    pub fn settings_path(&self, editor: &Editor, flag: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = flag.or_else(|| self.config.settings_path.clone()) {
            return Ok(path);
        }
        Ok(config::default_settings_path(editor.kind)?)
    }

    /// Whether import should back up settings, given `--no-backup`
    pub fn backup_enabled(&self, no_backup: bool) -> bool {
        !no_backup && self.config.auto_backup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_enabled() {
        let ctx = Context::new(SyncConfig::default(), None);
        assert!(ctx.backup_enabled(false));
        assert!(!ctx.backup_enabled(true));

        let config = SyncConfig {
            auto_backup: false,
            ..Default::default()
        };
        let ctx = Context::new(config, None);
        assert!(!ctx.backup_enabled(false));
    }

    #[test]
    fn test_settings_path_precedence() {
        let editor = Editor {
            kind: EditorKind::VsCode,
            program: PathBuf::from("/usr/bin/code"),
        };
        let config = SyncConfig {
            settings_path: Some(PathBuf::from("/from/config.json")),
            ..Default::default()
        };
        let ctx = Context::new(config, None);

        assert_eq!(
            ctx.settings_path(&editor, Some(PathBuf::from("/from/flag.json")))
                .unwrap(),
            PathBuf::from("/from/flag.json")
        );
        assert_eq!(
            ctx.settings_path(&editor, None).unwrap(),
            PathBuf::from("/from/config.json")
        );
    }
}
