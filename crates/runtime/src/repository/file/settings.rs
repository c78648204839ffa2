//! File-based SettingsRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use super::write_atomic;
use crate::repository::{Result, SettingsRepository};
use crate::settings::GameSettings;

/// Stores settings as a single JSON document.
pub struct FileSettingsRepository {
    path: PathBuf,
}

impl FileSettingsRepository {
    /// Create a repository backed by `path`; parent directories are created.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsRepository for FileSettingsRepository {
    fn save(&self, settings: &GameSettings) -> Result<()> {
        let json = serde_json::to_vec_pretty(settings)?;
        write_atomic(&self.path, &json)?;
        tracing::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<GameSettings>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)?;
        let settings = serde_json::from_slice(&bytes)?;
        Ok(Some(settings))
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            tracing::debug!("Cleared settings at {}", self.path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryError;

    #[test]
    fn malformed_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let repo = FileSettingsRepository::new(&path).unwrap();
        assert!(matches!(repo.load(), Err(RepositoryError::Json(_))));
    }

    #[test]
    fn saved_settings_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSettingsRepository::new(dir.path().join("nested/settings.json")).unwrap();
        let settings = GameSettings {
            fps: 90,
            ..GameSettings::default()
        };
        repo.save(&settings).unwrap();
        assert_eq!(repo.load().unwrap(), Some(settings));
        repo.clear().unwrap();
        assert_eq!(repo.load().unwrap(), None);
    }
}
