//! In-memory ScriptRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use arena_core::ScriptSlot;

use crate::repository::{RepositoryError, Result, ScriptRepository};

/// In-memory implementation of ScriptRepository.
#[derive(Default)]
pub struct InMemoryScriptRepo {
    scripts: RwLock<HashMap<ScriptSlot, String>>,
}

impl InMemoryScriptRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with `source` already stored for `slot`.
    pub fn with_script(slot: ScriptSlot, source: impl Into<String>) -> Self {
        let mut scripts = HashMap::new();
        scripts.insert(slot, source.into());
        Self {
            scripts: RwLock::new(scripts),
        }
    }
}

impl ScriptRepository for InMemoryScriptRepo {
    fn save(&self, slot: ScriptSlot, source: &str) -> Result<()> {
        let mut scripts = self
            .scripts
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        scripts.insert(slot, source.to_owned());
        Ok(())
    }

    fn load(&self, slot: ScriptSlot) -> Result<Option<String>> {
        let scripts = self
            .scripts
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(scripts.get(&slot).cloned())
    }

    fn delete(&self, slot: ScriptSlot) -> Result<()> {
        let mut scripts = self
            .scripts
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        scripts.remove(&slot);
        Ok(())
    }
}
