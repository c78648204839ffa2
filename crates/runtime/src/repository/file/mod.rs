//! File-based repository implementations.
//!
//! Every write goes to a temporary sibling first and is renamed into place,
//! so a crash never leaves a half-written file behind.

mod script;
mod settings;

pub use script::FileScriptRepository;
pub use settings::FileSettingsRepository;

use std::fs;
use std::path::Path;

use crate::repository::Result;

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(".tmp");
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
