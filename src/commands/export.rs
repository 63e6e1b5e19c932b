//! Export command - Save extensions and settings to a snapshot file

use anyhow::{bail, Context as _, Result};
use owo_colors::OwoColorize;
use std::fs;
use std::path::{Path, PathBuf};

use super::{utils, Context};
use vscode_sync::editor::ProcessCli;
use vscode_sync::snapshot::{self, SnapshotFormat};
use vscode_sync::sync::{self, ExportOptions};

/// Execute the export command
pub fn execute(
    ctx: &Context,
    output: &str,
    options: ExportOptions,
    format: Option<SnapshotFormat>,
    settings_file: Option<PathBuf>,
) -> Result<()> {
    if !options.settings && !options.extensions {
        bail!("Nothing to export: both --no-settings and --no-extensions were given");
    }

    let output = PathBuf::from(output);
    let format = resolve_format(format, &output, ctx.config.default_format);

    let editor = ctx.detect_editor()?;
    let settings_path = ctx.settings_path(&editor, settings_file)?;
    let cli = ProcessCli::for_editor(&editor);

    let capture = sync::capture(&cli, &settings_path, options);
    for warning in &capture.warnings {
        println!("{} {}", "Warning:".yellow(), warning);
    }

    snapshot::encode(
        &capture.snapshot,
        &output,
        format,
        capture.raw_settings.as_deref(),
    )
    .with_context(|| format!("Failed to export to {}", output.display()))?;

    let size = fs::metadata(&output).map(|m| m.len()).unwrap_or(0);

    if let Some(extensions) = &capture.snapshot.extensions {
        println!("{} {} extensions", "Exported:".green(), extensions.len());
    }
    if let Some(settings) = &capture.snapshot.settings {
        println!(
            "{} {} settings from {}",
            "Exported:".green(),
            settings.len(),
            settings_path.display()
        );
    }
    println!(
        "{} {} ({})",
        "Created:".green(),
        output.display(),
        utils::format_size(size)
    );

    Ok(())
}

/// `--format` wins, then the file extension, then the configured default
pub fn resolve_format(
    flag: Option<SnapshotFormat>,
    output: &Path,
    default: SnapshotFormat,
) -> SnapshotFormat {
    flag.or_else(|| SnapshotFormat::from_path(output))
        .unwrap_or(default)
}
