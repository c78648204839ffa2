//! Content loaders for reading arena data from files.
//!
//! This module converts TOML files into core configuration types and
//! resolves the layout of a session data directory.

pub mod config;
pub mod factory;

pub use config::FightConfigLoader;
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
