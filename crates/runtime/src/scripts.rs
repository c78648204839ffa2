//! Per-slot script management.
//!
//! [`ScriptSlots`] owns one [`IsolationRuntime`] per script slot and is the
//! runtime's [`DecisionSource`]: the engine asks it for a scripted actor's
//! decision, it hands back the cached one and queues a fresh request.

use arena_core::{ActorSnapshot, Decision, DecisionSource, ScriptSlot, Side};
use arena_script::CompileOptions;
use strum::IntoEnumIterator;
use tracing::{info, warn};

use crate::events::{EventBus, ScriptEvent};
use crate::isolation::{CompileOutcome, IsolationRuntime};
use crate::repository::ScriptRepository;
use crate::settings::GameSettings;

/// Source for `slot`: the stored script, or the slot's template when none
/// is stored, the stored one is blank, or storage fails.
pub fn source_for(slot: ScriptSlot, repo: &dyn ScriptRepository) -> String {
    match repo.load(slot) {
        Ok(Some(source)) if !source.trim().is_empty() => source,
        Ok(_) => arena_content::template_for(slot).to_owned(),
        Err(err) => {
            warn!(slot = %slot, error = %err, "failed to load stored script, using template");
            arena_content::template_for(slot).to_owned()
        }
    }
}

pub struct ScriptSlots {
    a: IsolationRuntime,
    b: IsolationRuntime,
    events: EventBus,
}

impl ScriptSlots {
    /// Each slot's script gets its own `Math.random` stream derived from
    /// `options.seed`.
    pub fn new(options: CompileOptions, queue_capacity: usize, events: EventBus) -> Self {
        let for_slot = |offset: u64| CompileOptions {
            seed: options.seed.wrapping_add(offset),
            ..options
        };
        Self {
            a: IsolationRuntime::with_capacity(ScriptSlot::A, for_slot(1), queue_capacity),
            b: IsolationRuntime::with_capacity(ScriptSlot::B, for_slot(2), queue_capacity),
            events,
        }
    }

    pub fn runtime(&self, slot: ScriptSlot) -> &IsolationRuntime {
        match slot {
            ScriptSlot::A => &self.a,
            ScriptSlot::B => &self.b,
        }
    }

    pub fn runtime_mut(&mut self, slot: ScriptSlot) -> &mut IsolationRuntime {
        match slot {
            ScriptSlot::A => &mut self.a,
            ScriptSlot::B => &mut self.b,
        }
    }

    /// Compiles `source` into `slot` and publishes the outcome.
    pub async fn compile(&mut self, slot: ScriptSlot, source: &str) -> CompileOutcome {
        let outcome = self.runtime_mut(slot).compile(source).await;
        match &outcome.error {
            None => info!(slot = %slot, "script compiled"),
            Some(error) => warn!(slot = %slot, error = %error, "script failed to compile"),
        }
        self.events.publish(ScriptEvent::Compiled {
            slot,
            success: outcome.success,
            error: outcome.error.clone(),
        });
        outcome
    }

    /// Compiles the slots `settings` needs that are not ready yet.
    pub async fn prepare(
        &mut self,
        settings: &GameSettings,
        repo: &dyn ScriptRepository,
    ) -> Vec<(ScriptSlot, CompileOutcome)> {
        let mut outcomes = Vec::new();
        for slot in ScriptSlot::iter() {
            if settings.uses_slot(slot) && !self.runtime(slot).is_ready() {
                let source = source_for(slot, repo);
                outcomes.push((slot, self.compile(slot, &source).await));
            }
        }
        outcomes
    }

    /// Reloads every slot from storage and recompiles it.
    pub async fn recompile_all(
        &mut self,
        repo: &dyn ScriptRepository,
    ) -> Vec<(ScriptSlot, CompileOutcome)> {
        let mut outcomes = Vec::new();
        for slot in ScriptSlot::iter() {
            let source = source_for(slot, repo);
            outcomes.push((slot, self.compile(slot, &source).await));
        }
        outcomes
    }

    pub fn is_ready(&self, slot: ScriptSlot) -> bool {
        self.runtime(slot).is_ready()
    }

    pub fn last_error(&self, slot: ScriptSlot) -> Option<&str> {
        self.runtime(slot).last_error()
    }

    /// Waits for every slot's in-flight requests.
    pub async fn settle(&mut self) {
        self.a.settle().await;
        self.b.settle().await;
    }

    pub fn terminate_all(&mut self) {
        self.a.terminate();
        self.b.terminate();
    }
}

impl DecisionSource for ScriptSlots {
    /// Reads the cached decision before queueing the next request, so the
    /// answer never depends on how fast the worker replies within a tick.
    fn decision_for(
        &mut self,
        side: Side,
        slot: ScriptSlot,
        me: &ActorSnapshot,
        opponent: &ActorSnapshot,
    ) -> Decision {
        let runtime = self.runtime_mut(slot);
        let decision = runtime.current_decision(side);
        runtime.request_decision(side, me, opponent);
        decision
    }
}

impl std::fmt::Debug for ScriptSlots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptSlots")
            .field("a", &self.a)
            .field("b", &self.b)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryScriptRepo;
    use crate::settings::PlayerType;

    #[test]
    fn blank_stored_script_falls_back_to_template() {
        let repo = InMemoryScriptRepo::with_script(ScriptSlot::B, "   \n");
        assert_eq!(
            source_for(ScriptSlot::B, &repo),
            arena_content::template_for(ScriptSlot::B)
        );
        assert_eq!(
            source_for(ScriptSlot::A, &repo),
            arena_content::template_for(ScriptSlot::A)
        );
    }

    #[tokio::test]
    async fn prepare_compiles_only_needed_slots() {
        let mut slots = ScriptSlots::new(CompileOptions::default(), 4, EventBus::new());
        let settings = GameSettings {
            player1: PlayerType::Human,
            player2: PlayerType::CustomB,
            ..GameSettings::default()
        };
        let outcomes = slots.prepare(&settings, &InMemoryScriptRepo::new()).await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].0, ScriptSlot::B);
        assert!(outcomes[0].1.success);
        assert!(slots.is_ready(ScriptSlot::B));
        assert!(!slots.is_ready(ScriptSlot::A));

        // Already ready: nothing to do.
        assert!(slots.prepare(&settings, &InMemoryScriptRepo::new()).await.is_empty());
    }
}
