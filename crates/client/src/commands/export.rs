//! Export a slot's script as a portable document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arena_core::ScriptSlot;
use arena_runtime::ScriptExport;
use arena_runtime::scripts::source_for;
use clap::Parser;

use super::{SlotArg, script_repository};

/// Write a slot's script (stored, or its template) as an export document
#[derive(Parser, Debug)]
pub struct Export {
    /// Script slot to export
    #[arg(value_enum)]
    pub slot: SlotArg,

    /// Destination file
    pub file: PathBuf,
}

impl Export {
    pub fn execute(self, data_dir: &Path) -> Result<()> {
        let slot = ScriptSlot::from(self.slot);
        let repo = script_repository(data_dir)?;
        let document = ScriptExport::new(source_for(slot, &repo))
            .to_json()
            .context("Failed to encode export document")?;

        std::fs::write(&self.file, document)
            .with_context(|| format!("Failed to write {}", self.file.display()))?;
        tracing::info!("Exported {} to {}", slot, self.file.display());
        Ok(())
    }
}
