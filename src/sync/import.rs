//! Import engine
//!
//! One import runs through `Start -> BackupDecision -> SettingsApply ->
//! ExtensionInstall -> Done`. Any fatal error stops the run in the stage where
//! it happened and is returned as an [`ImportFailure`].
//!
//! Extension installs are best-effort: each identifier gets its own CLI call
//! and a failure is recorded in the report without stopping the loop. An
//! interrupted run may leave a subset of extensions installed; there is no
//! rollback.
//!
//! The live settings file is read and rewritten without any lock, so edits
//! made by the editor or another process during an import can be lost.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::editor::settings::{apply_settings, create_backup, create_backup_in, Backup};
use crate::editor::cli::validate_extension_id;
use crate::editor::EditorCli;
use crate::error::SyncError;
use crate::snapshot::Snapshot;

/// Exit code for a best-effort import where some extensions failed, under `--strict`
pub const STRICT_FAILURE_EXIT_CODE: u8 = 2;

/// Which parts of a snapshot to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    pub settings: bool,
    pub extensions: bool,
    pub backup: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            settings: true,
            extensions: true,
            backup: true,
        }
    }
}

/// Import state machine stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Start,
    BackupDecision,
    SettingsApply,
    ExtensionInstall,
    Done,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::BackupDecision => "backup",
            Self::SettingsApply => "settings",
            Self::ExtensionInstall => "extension install",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// A fatal error, tagged with the stage it stopped in
#[derive(Error, Debug)]
#[error("Import failed during {stage} stage: {source}")]
pub struct ImportFailure {
    pub stage: ImportStage,
    #[source]
    pub source: SyncError,
}

/// Outcome of installing one extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionResult {
    pub id: String,
    pub outcome: InstallOutcome,
}

impl ExtensionResult {
    pub fn is_success(&self) -> bool {
        self.outcome == InstallOutcome::Installed
    }
}

/// Summary of a completed import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub backup: Option<Backup>,
    pub settings_applied: bool,
    pub extensions: Vec<ExtensionResult>,
}

impl ImportReport {
    pub fn installed(&self) -> impl Iterator<Item = &ExtensionResult> {
        self.extensions.iter().filter(|r| r.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ExtensionResult> {
        self.extensions.iter().filter(|r| !r.is_success())
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }
}

/// Process exit status for a completed import
///
/// Failed extension installs don't fail the import: the default is exit 0.
/// With `strict`, any failed extension gives [`STRICT_FAILURE_EXIT_CODE`].
pub fn exit_code(report: &ImportReport, strict: bool) -> u8 {
    if strict && report.has_failures() {
        STRICT_FAILURE_EXIT_CODE
    } else {
        0
    }
}

/// Progress notifications emitted while an import runs
#[derive(Debug)]
pub enum ImportEvent<'a> {
    Stage(ImportStage),
    BackupCreated(&'a Backup),
    SettingsApplied(&'a Path),
    Installing {
        id: &'a str,
        index: usize,
        total: usize,
    },
    ExtensionFinished(&'a ExtensionResult),
}

/// Applies snapshots to one editor installation
pub struct ImportEngine<'a, C: EditorCli> {
    cli: &'a C,
    settings_path: PathBuf,
    backup_dir: Option<PathBuf>,
    options: ImportOptions,
}

impl<'a, C: EditorCli> ImportEngine<'a, C> {
    pub fn new(cli: &'a C, settings_path: impl Into<PathBuf>, options: ImportOptions) -> Self {
        Self {
            cli,
            settings_path: settings_path.into(),
            backup_dir: None,
            options,
        }
    }

    /// Write backups to `dir` instead of next to the settings file
    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = Some(dir.into());
        self
    }

    /// Run an import without progress reporting
    pub fn run(&self, snapshot: &Snapshot) -> Result<ImportReport, ImportFailure> {
        self.run_with(snapshot, |_| {})
    }

    /// Run an import, passing progress events to `observe`
    pub fn run_with<F>(&self, snapshot: &Snapshot, mut observe: F) -> Result<ImportReport, ImportFailure>
    where
        F: FnMut(ImportEvent<'_>),
    {
        let settings = snapshot.settings.as_ref().filter(|_| self.options.settings);
        let extensions = snapshot
            .extensions
            .as_deref()
            .filter(|_| self.options.extensions);

        let mut report = ImportReport::default();
        let mut stage = ImportStage::Start;

        loop {
            tracing::debug!(%stage, "import stage");
            observe(ImportEvent::Stage(stage));

            stage = match stage {
                ImportStage::Start => ImportStage::BackupDecision,

                ImportStage::BackupDecision => {
                    // Only worth a copy if the live file is about to change
                    if settings.is_some() && self.options.backup && self.settings_path.exists() {
                        let backup = match &self.backup_dir {
                            Some(dir) => create_backup_in(&self.settings_path, dir),
                            None => create_backup(&self.settings_path),
                        }
                        .map_err(|source| ImportFailure { stage, source })?;
                        observe(ImportEvent::BackupCreated(&backup));
                        report.backup = Some(backup);
                    }
                    ImportStage::SettingsApply
                }

                ImportStage::SettingsApply => {
                    if let Some(settings) = settings {
                        apply_settings(&self.settings_path, settings)
                            .map_err(|source| ImportFailure { stage, source })?;
                        tracing::info!(
                            path = %self.settings_path.display(),
                            keys = settings.len(),
                            "settings applied"
                        );
                        report.settings_applied = true;
                        observe(ImportEvent::SettingsApplied(&self.settings_path));
                    }
                    ImportStage::ExtensionInstall
                }

                ImportStage::ExtensionInstall => {
                    let ids = extensions.unwrap_or_default();
                    for (index, id) in ids.iter().enumerate() {
                        observe(ImportEvent::Installing {
                            id,
                            index,
                            total: ids.len(),
                        });
                        let result = self.install(id);
                        observe(ImportEvent::ExtensionFinished(&result));
                        report.extensions.push(result);
                    }
                    ImportStage::Done
                }

                ImportStage::Done => return Ok(report),
            };
        }
    }

    fn install(&self, id: &str) -> ExtensionResult {
        if let Err(reason) = validate_extension_id(id) {
            tracing::debug!(extension = id, %reason, "skipping malformed extension id");
            return ExtensionResult {
                id: id.to_string(),
                outcome: InstallOutcome::Failed(reason),
            };
        }

        let outcome = match self.cli.install_extension(id) {
            Ok(()) => {
                tracing::info!(extension = id, "extension installed");
                InstallOutcome::Installed
            }
            Err(e) => {
                tracing::debug!(extension = id, error = %e, "extension install failed");
                InstallOutcome::Failed(e.to_string())
            }
        };
        ExtensionResult {
            id: id.to_string(),
            outcome,
        }
    }
}
