//! Deterministic fight simulation shared by the runtime and offline tools.
//!
//! `arena-core` defines the canonical rules of a two-actor fight: actor
//! state, the per-tick state machine, hit detection and the counter model.
//! It performs no I/O and never blocks; decisions for script-controlled
//! actors arrive through the [`DecisionSource`] seam.
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;
pub mod traits;

pub use combat::{AttackKind, Counter, HitOutcome};
pub use config::{ActorConfig, AttackProfile, CombatConfig, EnergyConfig, FightConfig, WorldConfig};
pub use engine::{FightEngine, Interactions};
pub use error::ConfigError;
pub use state::{
    ActionState, Actor, ActorSnapshot, ControlSource, Decision, EndReason, Facing, Rect,
    RoundResult, RoundStatus, ScriptSlot, SessionStats, Side,
};
pub use traits::{DecisionSource, NeutralDecisions};
