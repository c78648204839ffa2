//! Import an export document into a slot.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arena_core::ScriptSlot;
use clap::Parser;

use super::{SlotArg, open_runtime};

/// Store and compile a script from an export document
#[derive(Parser, Debug)]
pub struct Import {
    /// Export document to read
    pub file: PathBuf,

    /// Script slot to replace
    #[arg(value_enum)]
    pub slot: SlotArg,
}

impl Import {
    pub async fn execute(self, data_dir: &Path) -> Result<()> {
        let slot = ScriptSlot::from(self.slot);
        let document = std::fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        let Some(code) = arena_runtime::import_script(&document) else {
            anyhow::bail!("{} is not a behavior script export", self.file.display());
        };

        let mut runtime = open_runtime(data_dir).await?;
        let outcome = runtime.save_script(slot, &code).await?;
        runtime.shutdown();

        match outcome.error {
            None => {
                println!("Imported {} into {}", self.file.display(), slot);
                Ok(())
            }
            Some(error) => anyhow::bail!("Stored {} but it does not compile:\n{}", slot, error),
        }
    }
}
