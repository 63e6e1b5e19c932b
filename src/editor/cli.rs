//! Editor command-line interface
//!
//! Everything the tool asks of the editor goes through two capabilities:
//! listing installed extensions and installing one extension.

use std::path::PathBuf;
use std::process::{Command, Output};

use super::detect::Editor;
use crate::error::{Result, SyncError};

/// Capabilities of the editor CLI
pub trait EditorCli {
    /// List installed extension identifiers, in the order the CLI reports them
    fn list_extensions(&self) -> Result<Vec<String>>;

    /// Install a single extension by identifier
    fn install_extension(&self, id: &str) -> Result<()>;

    /// Editor version string (first line of `--version`)
    fn version(&self) -> Result<String>;
}

/// Editor CLI backed by the real executable
#[derive(Debug, Clone)]
pub struct ProcessCli {
    program: PathBuf,
}

impl ProcessCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn for_editor(editor: &Editor) -> Self {
        Self::new(&editor.program)
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        tracing::debug!(program = %self.program.display(), ?args, "running editor CLI");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| {
                SyncError::Cli(format!("failed to run {}: {}", self.program.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            return Err(SyncError::Cli(format!(
                "{} {} exited with {}{}",
                self.program.display(),
                args.join(" "),
                output.status,
                if detail.is_empty() {
                    String::new()
                } else {
                    format!(": {}", detail)
                }
            )));
        }

        Ok(output)
    }
}

impl EditorCli for ProcessCli {
    fn list_extensions(&self) -> Result<Vec<String>> {
        let output = self.run(&["--list-extensions"])?;
        Ok(parse_extension_list(&String::from_utf8_lossy(&output.stdout)))
    }

    fn install_extension(&self, id: &str) -> Result<()> {
        self.run(&["--install-extension", id])?;
        Ok(())
    }

    fn version(&self) -> Result<String> {
        let output = self.run(&["--version"])?;
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

/// Check that `id` looks like `publisher.name`
///
/// Identifiers are passed to the CLI as a bare argument, so anything that
/// could be read as a flag is rejected. A trailing `@version` is allowed.
pub fn validate_extension_id(id: &str) -> std::result::Result<(), String> {
    let name = id.split('@').next().unwrap_or_default();

    if id.is_empty() {
        return Err("extension identifier is empty".to_string());
    }
    if id.starts_with('-') {
        return Err(format!("'{}' looks like a command-line flag", id));
    }
    if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(format!("'{}' contains whitespace", id));
    }

    let valid_part = |part: &str| {
        part.chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric())
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    };
    match name.split_once('.') {
        Some((publisher, rest)) if valid_part(publisher) && valid_part(rest) => Ok(()),
        _ => Err(format!("'{}' is not of the form publisher.name", id)),
    }
}

/// Split `--list-extensions` output into identifiers
pub fn parse_extension_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
