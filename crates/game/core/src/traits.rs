//! Seams between the deterministic engine and decision producers.

use crate::state::{ActorSnapshot, Decision, ScriptSlot, Side};

/// Supplies decisions for script-controlled actors.
///
/// The engine calls this once per tick for each script-controlled actor with
/// fresh snapshots. Implementations must answer immediately: a runtime that
/// computes decisions elsewhere returns its last cached value and may use
/// the snapshots to request the next one. Both sides may share one slot, so
/// `side` tells the two callers apart.
pub trait DecisionSource {
    fn decision_for(
        &mut self,
        side: Side,
        slot: ScriptSlot,
        me: &ActorSnapshot,
        opponent: &ActorSnapshot,
    ) -> Decision;
}

/// Always answers with [`Decision::NEUTRAL`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NeutralDecisions;

impl DecisionSource for NeutralDecisions {
    fn decision_for(
        &mut self,
        _: Side,
        _: ScriptSlot,
        _: &ActorSnapshot,
        _: &ActorSnapshot,
    ) -> Decision {
        Decision::NEUTRAL
    }
}

impl<F> DecisionSource for F
where
    F: FnMut(Side, ScriptSlot, &ActorSnapshot, &ActorSnapshot) -> Decision,
{
    fn decision_for(
        &mut self,
        side: Side,
        slot: ScriptSlot,
        me: &ActorSnapshot,
        opponent: &ActorSnapshot,
    ) -> Decision {
        self(side, slot, me, opponent)
    }
}
