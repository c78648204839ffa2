/// Diagnostic counters for one round. Owned by its orchestrator and reset
/// whenever a new round spawns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounters {
    /// Loop frames seen this round.
    pub frames: u64,
    /// Simulation ticks run this round, in any status.
    pub ticks: u64,
    /// Ticks run while fighting.
    pub fight_ticks: u64,
    /// Hits landed by either side.
    pub hits: u64,
}

impl FrameCounters {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
