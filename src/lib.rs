//! vscode-sync library
//!
//! Export a VS Code (or Cursor) installation's extensions and user settings
//! to a portable snapshot, and restore them on another machine.

pub mod config;
pub mod editor;
pub mod error;
pub mod presets;
pub mod snapshot;
pub mod sync;
pub mod wizard;

pub use error::{Result, SyncError};
pub use snapshot::Snapshot;
