//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or persistence.

pub mod errors;
pub mod providers;

pub use errors::{Result, RuntimeError};
pub use providers::{IdleInput, InputProvider, ScriptedInput};
