//! Platform-specific directory utilities
//!
//! Provides consistent directory paths across different operating systems,
//! following platform conventions for cache and data directories.

use std::path::PathBuf;

const APP_NAME: &str = "arena";

/// Get the platform-specific log directory
///
/// - Linux: `~/.cache/arena/logs` (or `$XDG_CACHE_HOME/arena/logs`)
/// - macOS: `~/Library/Caches/arena/logs`
/// - Fallback: `/tmp/arena/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(APP_NAME))
        .join("logs")
}

/// Get the platform-specific data directory (scripts, settings, fight.toml)
///
/// - Linux: `~/.local/share/arena` (or `$XDG_DATA_HOME/arena`)
/// - macOS: `~/Library/Application Support/arena`
/// - Fallback: `./arena_data`
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./arena_data"))
}
