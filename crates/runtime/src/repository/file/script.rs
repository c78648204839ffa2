//! File-based ScriptRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use arena_core::ScriptSlot;

use super::write_atomic;
use crate::repository::{Result, ScriptRepository};

/// Stores each slot's source as `{slot}.js` (`slot1.js`, `slot2.js`) in a
/// base directory.
pub struct FileScriptRepository {
    base_dir: PathBuf,
}

impl FileScriptRepository {
    /// Create a new file-based script repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Get the path to a slot's script file.
    pub fn script_path(&self, slot: ScriptSlot) -> PathBuf {
        self.base_dir.join(format!("{}.js", slot.id()))
    }
}

impl ScriptRepository for FileScriptRepository {
    fn save(&self, slot: ScriptSlot, source: &str) -> Result<()> {
        let path = self.script_path(slot);
        write_atomic(&path, source.as_bytes())?;
        tracing::debug!("Saved script[{}] to {}", slot.id(), path.display());
        Ok(())
    }

    fn load(&self, slot: ScriptSlot) -> Result<Option<String>> {
        let path = self.script_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        let source = fs::read_to_string(&path)?;
        tracing::debug!("Loaded script[{}] from {}", slot.id(), path.display());
        Ok(Some(source))
    }

    fn delete(&self, slot: ScriptSlot) -> Result<()> {
        let path = self.script_path(slot);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted script[{}]", slot.id());
        }
        Ok(())
    }

    fn exists(&self, slot: ScriptSlot) -> bool {
        self.script_path(slot).exists()
    }
}
