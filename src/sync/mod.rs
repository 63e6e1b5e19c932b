//! Export and import operations

pub mod export;
pub mod import;

pub use export::{capture, Capture, ExportOptions};
pub use import::{
    exit_code, ExtensionResult, ImportEngine, ImportEvent, ImportFailure, ImportOptions,
    ImportReport, ImportStage, InstallOutcome,
};
