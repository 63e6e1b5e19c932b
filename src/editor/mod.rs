//! Editor environment: detection, CLI access, settings and storage files

pub mod cli;
pub mod detect;
pub mod settings;
pub mod storage;

pub use cli::{EditorCli, ProcessCli};
pub use detect::{detect_editor, Editor, EditorKind};
