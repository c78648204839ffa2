//! Fixed-step fight simulation.
//!
//! [`FightEngine`] is the only code that mutates [`Actor`]s. A tick is two
//! [`FightEngine::update_actor`] calls (first actor, then second) followed by
//! one [`FightEngine::resolve_interactions`]. Given the same configuration,
//! actors and decisions, a tick always produces the same result.

mod intents;
mod physics;

use crate::combat::{self, HitOutcome};
use crate::config::FightConfig;
use crate::state::{Actor, ControlSource, Decision, Side};
use crate::traits::DecisionSource;

/// Hits registered during one interaction pass, in resolution order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Interactions {
    /// First actor's attack against the second.
    pub first_hit: Option<HitOutcome>,
    /// Second actor's attack against the first.
    pub second_hit: Option<HitOutcome>,
}

impl Interactions {
    pub fn hits(&self) -> impl Iterator<Item = (Side, &HitOutcome)> {
        self.first_hit
            .iter()
            .map(|hit| (Side::First, hit))
            .chain(self.second_hit.iter().map(|hit| (Side::Second, hit)))
    }
}

/// Stateless rule set bound to a configuration.
#[derive(Clone, Copy, Debug)]
pub struct FightEngine<'a> {
    config: &'a FightConfig,
}

impl<'a> FightEngine<'a> {
    pub fn new(config: &'a FightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a FightConfig {
        self.config
    }

    /// Advances one actor by one tick.
    ///
    /// `input` drives human-controlled actors. A script-controlled actor
    /// ignores it and asks `decisions` instead, with snapshots taken before
    /// any of this tick's changes. A knocked-out actor only falls and slides.
    pub fn update_actor(
        &self,
        side: Side,
        actor: &mut Actor,
        input: Decision,
        opponent: &Actor,
        decisions: &mut (impl DecisionSource + ?Sized),
    ) {
        if !actor.is_alive() {
            physics::ragdoll(actor, self.config);
            return;
        }

        let input = match actor.control {
            ControlSource::Human => input,
            ControlSource::Script(slot) => {
                decisions.decision_for(side, slot, &actor.snapshot(), &opponent.snapshot())
            }
        };

        intents::regenerate(actor, self.config);
        intents::apply_movement(actor, &input, self.config);
        intents::apply_attacks(actor, &input, self.config);
        actor.hitbox = combat::active_hitbox(actor, &self.config.combat);
        physics::integrate(actor, self.config);
    }

    /// Overlap correction, then hit tests first→second and second→first.
    pub fn resolve_interactions(&self, first: &mut Actor, second: &mut Actor) -> Interactions {
        physics::separate(first, second);
        let first_hit = combat::resolve_hit(first, second, self.config);
        let second_hit = combat::resolve_hit(second, first, self.config);
        Interactions {
            first_hit,
            second_hit,
        }
    }

    /// One full tick for both actors.
    pub fn step(
        &self,
        first: &mut Actor,
        second: &mut Actor,
        inputs: [Decision; 2],
        decisions: &mut (impl DecisionSource + ?Sized),
    ) -> Interactions {
        let [first_input, second_input] = inputs;
        self.update_actor(Side::First, first, first_input, second, decisions);
        self.update_actor(Side::Second, second, second_input, first, decisions);
        self.resolve_interactions(first, second)
    }
}
