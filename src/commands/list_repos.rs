//! List-repos command - Show git repositories among recently opened folders

use anyhow::Result;
use owo_colors::OwoColorize;

use super::Context;
use vscode_sync::config::{self, OsFamily};
use vscode_sync::editor::storage::recent_git_repos;
use vscode_sync::SyncError;

/// Execute the list-repos command
pub fn execute(ctx: &Context) -> Result<()> {
    let editor = ctx.detect_editor()?;
    let home = dirs::home_dir().ok_or(SyncError::NoHomeDir)?;
    let storage_files = config::storage_json_paths(OsFamily::current(), editor.kind, &home);

    let repos = recent_git_repos(&storage_files);
    if repos.is_empty() {
        println!("No recently opened git repositories found.");
        return Ok(());
    }

    for repo in &repos {
        println!("{}", repo.display());
    }
    println!();
    println!("{} {} repositories", "Found:".green(), repos.len());

    Ok(())
}
