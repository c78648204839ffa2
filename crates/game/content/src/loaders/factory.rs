//! Content factory for loading a session's data directory.

use std::path::{Path, PathBuf};

use arena_core::FightConfig;

use crate::loaders::{FightConfigLoader, LoadResult};

/// Content factory that loads arena content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── fight.toml
/// └── scripts/
///     ├── slot1.js
///     └── slot2.js
/// ```
///
/// Every file is optional. `scripts/` belongs to the runtime's script
/// repository; the factory only resolves its location.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load fight configuration from `fight.toml`, or the defaults when the
    /// file does not exist.
    pub fn load_fight_config(&self) -> LoadResult<FightConfig> {
        let path = self.data_dir.join("fight.toml");
        if !path.exists() {
            return Ok(FightConfig::default());
        }
        FightConfigLoader::load(&path)
    }

    /// Directory holding the per-slot script files.
    pub fn scripts_dir(&self) -> PathBuf {
        self.data_dir.join("scripts")
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
        assert_eq!(factory.scripts_dir(), Path::new("/tmp/data/scripts"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_fight_config().unwrap(), FightConfig::default());
    }

    #[test]
    fn stored_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fight.toml"), "[world]\ngravity = 1.2\n").unwrap();
        let factory = ContentFactory::new(dir.path());
        let config = factory.load_fight_config().unwrap();
        assert_eq!(config.world.gravity, 1.2);
    }
}
