//! Repository layer for user data
//!
//! Repositories handle data the user edits between sessions:
//! - Behavior script sources, one per slot
//! - Game settings
//!
//! Static content (templates, fight configuration) is handled by
//! `arena-content`, not Repositories.

mod error;
mod export;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use export::{EXPORT_TYPE, EXPORT_VERSION, ScriptExport, import_script};
pub use file::{FileScriptRepository, FileSettingsRepository};
pub use memory::{InMemoryScriptRepo, InMemorySettingsRepo};
pub use traits::{ScriptRepository, SettingsRepository};
