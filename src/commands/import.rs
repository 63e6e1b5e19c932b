//! Import command - Apply a snapshot file to the local editor

use anyhow::{bail, Context as _, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

use super::Context;
use vscode_sync::editor::ProcessCli;
use vscode_sync::snapshot::{self, Snapshot};
use vscode_sync::sync::{
    exit_code, ImportEngine, ImportEvent, ImportOptions, ImportReport, ImportStage,
    InstallOutcome,
};

/// Execute the import command
pub fn execute(
    ctx: &Context,
    input: &str,
    options: ImportOptions,
    strict: bool,
    settings_file: Option<PathBuf>,
) -> Result<ExitCode> {
    let input = PathBuf::from(input);
    if !input.exists() {
        bail!("Snapshot file does not exist: {}", input.display());
    }

    let snapshot = snapshot::decode(&input)
        .with_context(|| format!("Failed to read snapshot: {}", input.display()))?;

    if let Some(warning) = snapshot::check_version(&snapshot.metadata) {
        println!("{} {}", "Warning:".yellow(), warning);
    }

    println!("Importing from: {}", input.display());
    if !snapshot.metadata.created_at.is_empty() {
        println!(
            "  Created: {} on {}",
            snapshot.metadata.created_at, snapshot.metadata.system
        );
    }
    println!();

    apply(ctx, &snapshot, options, strict, settings_file)
}

/// Import a snapshot into the detected editor, printing progress as it goes
///
/// Shared by the import and wizard commands.
pub fn apply(
    ctx: &Context,
    snapshot: &Snapshot,
    options: ImportOptions,
    strict: bool,
    settings_file: Option<PathBuf>,
) -> Result<ExitCode> {
    let editor = ctx.detect_editor()?;
    let settings_path = ctx.settings_path(&editor, settings_file)?;
    let cli = ProcessCli::for_editor(&editor);

    let engine = ImportEngine::new(&cli, &settings_path, options);
    let report = engine.run_with(snapshot, print_event)?;

    println!();
    println!("{}", format_report(&report));

    Ok(ExitCode::from(exit_code(&report, strict)))
}

fn print_event(event: ImportEvent<'_>) {
    match event {
        ImportEvent::Stage(ImportStage::ExtensionInstall) => println!(),
        ImportEvent::Stage(_) => {}
        ImportEvent::BackupCreated(backup) => {
            println!("{} {}", "Backup:".green(), backup.path.display());
        }
        ImportEvent::SettingsApplied(path) => {
            println!("{} {}", "Updated:".green(), path.display());
        }
        ImportEvent::Installing { id, index, total } => {
            println!("[{}/{}] Installing {}...", index + 1, total, id);
        }
        ImportEvent::ExtensionFinished(result) => match &result.outcome {
            InstallOutcome::Installed => {}
            InstallOutcome::Failed(reason) => {
                println!("  {} {}: {}", "Failed:".red(), result.id, reason);
            }
        },
    }
}

/// Format the end-of-import summary
pub fn format_report(report: &ImportReport) -> String {
    let mut lines = vec![];

    lines.push(format!(
        "Settings: {}",
        if report.settings_applied {
            "applied"
        } else {
            "unchanged"
        }
    ));
    if let Some(backup) = &report.backup {
        lines.push(format!("Backup: {}", backup.path.display()));
    }

    let installed = report.installed().count();
    let failed: Vec<&str> = report.failed().map(|r| r.id.as_str()).collect();
    lines.push(format!(
        "Extensions: {} installed, {} failed",
        installed,
        failed.len()
    ));
    if !failed.is_empty() {
        lines.push(format!("Failed extensions: {}", failed.join(", ")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vscode_sync::sync::ExtensionResult;

    fn result(id: &str, outcome: InstallOutcome) -> ExtensionResult {
        ExtensionResult {
            id: id.to_string(),
            outcome,
        }
    }

    #[test]
    fn test_format_report_empty() {
        let report = ImportReport::default();
        let text = format_report(&report);
        assert!(text.contains("Settings: unchanged"));
        assert!(text.contains("Extensions: 0 installed, 0 failed"));
        assert!(!text.contains("Failed extensions"));
    }

    #[test]
    fn test_format_report_lists_failures() {
        let report = ImportReport {
            backup: None,
            settings_applied: true,
            extensions: vec![
                result("x.one", InstallOutcome::Installed),
                result("y.two", InstallOutcome::Failed("not found".to_string())),
                result("z.three", InstallOutcome::Installed),
            ],
        };
        let text = format_report(&report);
        assert!(text.contains("Settings: applied"));
        assert!(text.contains("Extensions: 2 installed, 1 failed"));
        assert!(text.contains("Failed extensions: y.two"));
    }
}
