use arena_core::{RoundResult, RoundStatus, SessionStats};
use serde::Serialize;

use super::timing::TICKS_PER_SECOND;

/// Observable match state, updated by the orchestrator only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchState {
    /// 1-based number of the current round.
    pub round: u32,
    pub status: RoundStatus,
    /// Countdown value on screen; `None` outside the countdown.
    pub countdown: Option<u8>,
    pub ticks_remaining: u32,
    pub stats: SessionStats,
    pub last_result: Option<RoundResult>,
}

impl MatchState {
    pub(crate) fn new(match_ticks: u32) -> Self {
        Self {
            round: 0,
            status: RoundStatus::Waiting,
            countdown: None,
            ticks_remaining: match_ticks,
            stats: SessionStats::default(),
            last_result: None,
        }
    }

    /// Match clock in seconds.
    pub fn time_remaining(&self) -> f64 {
        f64::from(self.ticks_remaining) / f64::from(TICKS_PER_SECOND)
    }
}
