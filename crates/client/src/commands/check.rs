//! Check a script file without storing it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use arena_core::ActorSnapshot;
use arena_script::CompileOptions;
use clap::Parser;

/// Run the safety analysis and compile a script file
#[derive(Parser, Debug)]
pub struct Check {
    /// Script source file
    pub file: PathBuf,
}

impl Check {
    pub fn execute(self) -> Result<()> {
        let source = std::fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;

        if let Some(diagnostic) = arena_script::analyze(&source).diagnostic() {
            anyhow::bail!("{}: rejected\n{}", self.file.display(), diagnostic);
        }

        let mut script = arena_script::compile(&source, &CompileOptions::default())
            .with_context(|| format!("{}: failed to compile", self.file.display()))?;

        // One dry call against resting actors surfaces obvious runtime errors.
        let me = ActorSnapshot::default();
        let invocation = script.decide(&me, &me);
        println!("{}: ok", self.file.display());
        println!(
            "sample decision: {}",
            serde_json::to_string(&invocation.decision)?
        );
        if let Some(error) = invocation.error {
            println!("sample call failed: {}", error);
        }
        Ok(())
    }
}
