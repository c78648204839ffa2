//! In-memory SettingsRepository implementation for tests and local runs.

use std::sync::RwLock;

use crate::repository::{RepositoryError, Result, SettingsRepository};
use crate::settings::GameSettings;

#[derive(Default)]
pub struct InMemorySettingsRepo {
    settings: RwLock<Option<GameSettings>>,
}

impl InMemorySettingsRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsRepository for InMemorySettingsRepo {
    fn save(&self, settings: &GameSettings) -> Result<()> {
        let mut stored = self
            .settings
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *stored = Some(settings.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<GameSettings>> {
        let stored = self
            .settings
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(stored.clone())
    }

    fn clear(&self) -> Result<()> {
        let mut stored = self
            .settings
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *stored = None;
        Ok(())
    }
}
