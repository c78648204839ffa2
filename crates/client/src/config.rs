//! Client configuration from the environment.
use std::env;
use std::path::PathBuf;

/// Where the client keeps its data and how its session is named.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Holds `fight.toml`, `settings.json` and `scripts/`.
    pub data_dir: PathBuf,
    /// Log directory name under the platform log dir. Generated when unset.
    pub session_id: Option<String>,
}

impl ClientConfig {
    /// Construct client configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_DATA_DIR` - Data directory (default: platform data dir)
    /// - `ARENA_SESSION_ID` - Session name for the log directory
    pub fn from_env() -> Self {
        Self {
            data_dir: read_env("ARENA_DATA_DIR").unwrap_or_else(arena_runtime::dirs::data_dir),
            session_id: read_env("ARENA_SESSION_ID"),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
