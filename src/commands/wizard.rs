//! Wizard command - Build a setup from presets and apply or save it

use anyhow::{bail, Context as _, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

use super::{export, import, Context};
use vscode_sync::presets::{self, Preset};
use vscode_sync::snapshot::{self, Snapshot};
use vscode_sync::sync::ImportOptions;
use vscode_sync::wizard::{self, InquirePrompter, WizardOutcome};
use vscode_sync::SyncError;

/// Execute the wizard command
pub fn execute(
    ctx: &Context,
    preset_names: &[String],
    yes: bool,
    output: Option<&str>,
    options: ImportOptions,
    settings_file: Option<PathBuf>,
) -> Result<ExitCode> {
    // Unknown names fail before any prompt is shown
    let selected: Vec<&Preset> = preset_names
        .iter()
        .map(|name| presets::get(name))
        .collect::<Result<_, _>>()?;

    let snapshot = if yes {
        if selected.is_empty() {
            bail!("--yes needs at least one --preset");
        }
        wizard::compose(preset_names)?.into_snapshot()
    } else {
        match wizard::run(&mut InquirePrompter, &selected) {
            Ok(WizardOutcome::Apply(snapshot)) => snapshot,
            Ok(WizardOutcome::Declined) => {
                println!("No changes made.");
                return Ok(ExitCode::SUCCESS);
            }
            Err(SyncError::Cancelled) => {
                println!("{} No changes made.", "Cancelled.".yellow());
                return Ok(ExitCode::SUCCESS);
            }
            Err(e) => return Err(e.into()),
        }
    };

    if snapshot.is_empty() {
        println!("Nothing selected; no changes made.");
        return Ok(ExitCode::SUCCESS);
    }

    match output {
        Some(output) => {
            save(ctx, &snapshot, output)?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!();
            import::apply(ctx, &snapshot, options, false, settings_file)
        }
    }
}

fn save(ctx: &Context, snapshot: &Snapshot, output: &str) -> Result<()> {
    let output = PathBuf::from(output);
    let format = export::resolve_format(None, &output, ctx.config.default_format);

    snapshot::encode(snapshot, &output, format, None)
        .with_context(|| format!("Failed to save to {}", output.display()))?;

    println!("{} {}", "Created:".green(), output.display());
    println!("Apply it later with: vscode-sync import {}", output.display());
    Ok(())
}
