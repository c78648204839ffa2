//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from configuration, settings and repositories so
//! clients can bubble them up with consistent context. Script failures are
//! not here: they are contained at the isolation boundary and only show up
//! as messages on [`crate::CompileOutcome`] or
//! [`crate::ScriptSlots::last_error`].
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("invalid fight configuration")]
    FightConfig(#[source] arena_core::ConfigError),

    #[error("invalid runtime configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid settings: {0}")]
    Settings(#[from] crate::settings::SettingsError),
}
