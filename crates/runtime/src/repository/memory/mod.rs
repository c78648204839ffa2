//! In-memory repository implementations for testing and development.

mod script;
mod settings;

pub use script::InMemoryScriptRepo;
pub use settings::InMemorySettingsRepo;
