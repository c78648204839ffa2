//! Fight configuration loader.

use std::path::Path;

use arena_core::FightConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for fight configuration from TOML files.
///
/// Every section and field is optional; missing values keep their defaults.
pub struct FightConfigLoader;

impl FightConfigLoader {
    /// Load and validate a [`FightConfig`] from a TOML file.
    pub fn load(path: &Path) -> LoadResult<FightConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| e.context(format!("Invalid fight config {}", path.display())))
    }

    /// Parse and validate TOML text.
    pub fn parse(content: &str) -> LoadResult<FightConfig> {
        let config: FightConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse fight config TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = FightConfigLoader::parse(
            r#"
            [world]
            gravity = 1.2

            [combat]
            backstab_multiplier = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(config.world.gravity, 1.2);
        assert_eq!(config.combat.backstab_multiplier, 1.5);
        assert_eq!(config.actor, FightConfig::default().actor);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = FightConfigLoader::parse("[combat]\nhitbox_window_start = 30\n").unwrap_err();
        assert!(err.to_string().contains("hitbox window"));
    }

    #[test]
    fn empty_file_is_the_default() {
        assert_eq!(FightConfigLoader::parse("").unwrap(), FightConfig::default());
    }
}
