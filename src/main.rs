//! vscode-sync: export, import, and share VS Code / Cursor setups

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use vscode_sync::config::SyncConfig;
use vscode_sync::editor::EditorKind;
use vscode_sync::snapshot::SnapshotFormat;
use vscode_sync::sync::{ExportOptions, ImportOptions};

mod commands;

#[derive(Parser)]
#[command(name = "vscode-sync")]
#[command(about = "Export, import, and share your VS Code extensions and settings", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.vscode-sync/config.json)
    #[arg(long, global = true, env = "VSCODE_SYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Editor to use when both are installed
    #[arg(long, global = true, value_enum)]
    editor: Option<EditorKind>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export extensions and settings to a snapshot file
    Export {
        /// Output file (.json or .zip)
        output: String,

        /// Don't include settings
        #[arg(long)]
        no_settings: bool,

        /// Don't include extensions
        #[arg(long)]
        no_extensions: bool,

        /// Output format (default: from the file extension)
        #[arg(long, short, value_enum)]
        format: Option<SnapshotFormat>,

        /// Settings file to export instead of the editor default
        #[arg(long)]
        settings_file: Option<PathBuf>,
    },

    /// Import extensions and settings from a snapshot file
    Import {
        /// Snapshot file (.json or .zip)
        input: String,

        /// Don't update settings
        #[arg(long)]
        no_settings: bool,

        /// Don't install extensions
        #[arg(long)]
        no_extensions: bool,

        /// Don't back up the current settings file
        #[arg(long)]
        no_backup: bool,

        /// Exit with status 2 if any extension fails to install
        #[arg(long)]
        strict: bool,

        /// Settings file to update instead of the editor default
        #[arg(long)]
        settings_file: Option<PathBuf>,
    },

    /// Build a configuration from presets and apply it
    Wizard {
        /// Preset to start from (repeatable; later presets win on conflicts)
        #[arg(long = "preset", short = 'p')]
        presets: Vec<String>,

        /// Apply the given presets without prompting
        #[arg(short, long)]
        yes: bool,

        /// Save the result to a snapshot file instead of applying it
        #[arg(long, short)]
        output: Option<String>,

        /// Don't back up the current settings file
        #[arg(long)]
        no_backup: bool,

        /// Settings file to update instead of the editor default
        #[arg(long)]
        settings_file: Option<PathBuf>,
    },

    /// Show the detected editor, extensions and settings file
    Status {
        /// Settings file to inspect instead of the editor default
        #[arg(long)]
        settings_file: Option<PathBuf>,
    },

    /// List built-in presets
    Presets,

    /// List git repositories among recently opened folders
    ListRepos,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => SyncConfig::default_path()?,
    };
    let config = SyncConfig::load(&config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;
    let ctx = commands::Context::new(config, cli.editor);

    match cli.command {
        Commands::Export {
            output,
            no_settings,
            no_extensions,
            format,
            settings_file,
        } => {
            let options = ExportOptions {
                settings: !no_settings,
                extensions: !no_extensions,
            };
            commands::export::execute(&ctx, &output, options, format, settings_file)?;
        }

        Commands::Import {
            input,
            no_settings,
            no_extensions,
            no_backup,
            strict,
            settings_file,
        } => {
            let options = ImportOptions {
                settings: !no_settings,
                extensions: !no_extensions,
                backup: ctx.backup_enabled(no_backup),
            };
            return commands::import::execute(&ctx, &input, options, strict, settings_file);
        }

        Commands::Wizard {
            presets,
            yes,
            output,
            no_backup,
            settings_file,
        } => {
            let options = ImportOptions {
                backup: ctx.backup_enabled(no_backup),
                ..Default::default()
            };
            return commands::wizard::execute(
                &ctx,
                &presets,
                yes,
                output.as_deref(),
                options,
                settings_file,
            );
        }

        Commands::Status { settings_file } => {
            let status = commands::status::status(&ctx, settings_file)?;
            println!("{}", commands::status::format_status(&status));
        }

        Commands::Presets => {
            println!("{}", commands::presets::format_presets());
        }

        Commands::ListRepos => {
            commands::list_repos::execute(&ctx)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Log to stderr, filtered by RUST_LOG (default: warnings only)
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
