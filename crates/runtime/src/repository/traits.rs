//! Repository contracts for data that outlives a session.

use arena_core::ScriptSlot;

use crate::repository::Result;
use crate::settings::GameSettings;

/// Raw script text keyed by slot (`slot1`, `slot2`).
///
/// Implementations store exactly what they are given; validation happens
/// when the script is compiled.
pub trait ScriptRepository: Send + Sync {
    /// Save the source for `slot`, replacing any previous one.
    fn save(&self, slot: ScriptSlot, source: &str) -> Result<()>;

    /// Load the source for `slot`, if one was saved.
    fn load(&self, slot: ScriptSlot) -> Result<Option<String>>;

    /// Remove the source for `slot`.
    fn delete(&self, slot: ScriptSlot) -> Result<()>;

    /// Check if a source exists for `slot`
    fn exists(&self, slot: ScriptSlot) -> bool {
        matches!(self.load(slot), Ok(Some(_)))
    }
}

/// Persisted [`GameSettings`].
///
/// `load` returns whatever was stored; callers go through
/// [`crate::settings::load_settings`] to validate it.
pub trait SettingsRepository: Send + Sync {
    fn save(&self, settings: &GameSettings) -> Result<()>;

    fn load(&self) -> Result<Option<GameSettings>>;

    /// Forget the stored settings.
    fn clear(&self) -> Result<()>;
}
