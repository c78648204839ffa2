//! Event types for different topics.

use arena_core::{ControlSource, RoundResult, ScriptSlot, SessionStats};
use serde::{Deserialize, Serialize};

/// Round lifecycle events, in the order a round produces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// Fresh actors were spawned and the round is waiting to start.
    RoundStarted {
        round: u32,
        first: ControlSource,
        second: ControlSource,
        first_x: f64,
        second_x: f64,
    },

    /// The countdown shows a new value (3, 2, 1, 0).
    Countdown { value: u8 },

    /// Live input is enabled and the clock runs.
    FightStarted,

    /// The round ended; `stats` already includes `result`.
    RoundEnded {
        result: RoundResult,
        stats: SessionStats,
        ticks: u64,
    },
}

/// Script lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptEvent {
    Compiled {
        slot: ScriptSlot,
        success: bool,
        error: Option<String>,
    },
}
