//! Runtime orchestration for the scripted arena fight.
//!
//! This crate wires together the deterministic engine from `arena-core`,
//! isolated script workers, repositories, and the round state machine into a
//! cohesive runtime API. Consumers embed [`Runtime`] to drive a session and
//! subscribe to events through its [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the session runtime, its builder and configuration
//! - [`orchestrator`] runs the round state machine over the engine
//! - [`isolation`] and [`scripts`] bridge script workers into the tick
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`repository`] and [`settings`] persist user data between sessions
//! - [`workers`] keeps the worker protocol and threads internal to the crate
pub mod api;
pub mod dirs;
pub mod events;
pub mod game_loop;
pub mod isolation;
pub mod orchestrator;
pub mod repository;
pub mod runtime;
pub mod scripts;
pub mod settings;

mod workers;

pub use api::{IdleInput, InputProvider, Result, RuntimeError, ScriptedInput};
pub use events::{Event, EventBus, MatchEvent, ScriptEvent, Topic};
pub use game_loop::{GameLoop, LoopReport, Pacing};
pub use isolation::{CompileOutcome, IsolationError, IsolationRuntime};
pub use orchestrator::{FrameCounters, MatchOrchestrator, MatchState, MatchTiming, TickOutcome};
pub use repository::{
    FileScriptRepository, FileSettingsRepository, InMemoryScriptRepo, InMemorySettingsRepo,
    RepositoryError, ScriptExport, ScriptRepository, SettingsRepository, import_script,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use scripts::ScriptSlots;
pub use settings::{GameSettings, PlayerType, SettingsError, load_settings};
pub use workers::{WorkerRequest, WorkerResponse};
