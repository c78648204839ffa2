use std::fmt;

use super::{ActionState, ActorSnapshot, Rect};
use crate::config::FightConfig;

/// Which of the two combatants; `First` spawns on the left.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    #[strum(serialize = "player 1")]
    First,
    #[strum(serialize = "player 2")]
    Second,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// Identifier of a behavior script slot.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScriptSlot {
    #[strum(serialize = "slot1", serialize = "a")]
    #[cfg_attr(feature = "serde", serde(rename = "slot1"))]
    A,
    #[strum(serialize = "slot2", serialize = "b")]
    #[cfg_attr(feature = "serde", serde(rename = "slot2"))]
    B,
}

impl ScriptSlot {
    /// Storage key of this slot.
    pub const fn id(self) -> &'static str {
        match self {
            Self::A => "slot1",
            Self::B => "slot2",
        }
    }

    /// Human-facing label ("Script A").
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "Script A",
            Self::B => "Script B",
        }
    }
}

impl fmt::Display for ScriptSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who drives an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlSource {
    Human,
    Script(ScriptSlot),
}

impl ControlSource {
    pub const fn script_slot(self) -> Option<ScriptSlot> {
        match self {
            Self::Human => None,
            Self::Script(slot) => Some(slot),
        }
    }
}

impl fmt::Display for ControlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => f.write_str("Human"),
            Self::Script(slot) => fmt::Display::fmt(slot, f),
        }
    }
}

/// Facing direction; only two values exist so the ±1 invariant is structural.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Signed unit direction: `-1` left, `+1` right.
    #[inline]
    pub const fn sign(self) -> i8 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        f64::from(self.sign())
    }
}

/// The authoritative, mutable combatant.
///
/// Created by [`Actor::spawn`] at round start and discarded when the round
/// ends; nothing carries over between rounds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub width: f64,
    pub height: f64,
    pub health: f64,
    pub energy: f64,
    pub state: ActionState,
    pub facing: Facing,
    /// Frames remaining until a new attack may start.
    pub cooldown: u32,
    pub hitbox: Option<Rect>,
    pub control: ControlSource,
}

impl Actor {
    /// Factory keyed on the control source: a fresh actor standing on the
    /// ground at `x` with full health and energy.
    pub fn spawn(x: f64, facing: Facing, control: ControlSource, config: &FightConfig) -> Self {
        Self {
            x,
            y: config.ground_top(),
            vx: 0.0,
            vy: 0.0,
            width: config.actor.width,
            height: config.actor.height,
            health: config.actor.max_health,
            energy: config.energy.max,
            state: ActionState::Idle,
            facing,
            cooldown: 0,
            hitbox: None,
            control,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_script_controlled(&self) -> bool {
        matches!(self.control, ControlSource::Script(_))
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Read-only copy handed to scripts.
    pub fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            x: self.x,
            y: self.y,
            vx: self.vx,
            vy: self.vy,
            health: self.health,
            energy: self.energy,
            state: self.state.code(),
            direction: self.facing.sign(),
            cooldown: self.cooldown,
            width: self.width,
            height: self.height,
        }
    }

    pub(crate) fn set_health(&mut self, value: f64, max: f64) {
        self.health = value.clamp(0.0, max);
    }

    pub(crate) fn set_energy(&mut self, value: f64, max: f64) {
        self.energy = value.clamp(0.0, max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_places_actor_on_ground_with_full_resources() {
        let config = FightConfig::default();
        let actor = Actor::spawn(280.0, Facing::Right, ControlSource::Human, &config);
        assert_eq!(actor.y, 305.0);
        assert_eq!(actor.health, 100.0);
        assert_eq!(actor.energy, 100.0);
        assert_eq!(actor.cooldown, 0);
        assert!(actor.hitbox.is_none());
    }

    #[test]
    fn snapshot_copies_wire_fields() {
        let config = FightConfig::default();
        let mut actor = Actor::spawn(
            470.0,
            Facing::Left,
            ControlSource::Script(ScriptSlot::A),
            &config,
        );
        actor.state = ActionState::Guard;
        let snap = actor.snapshot();
        assert_eq!(snap.direction, -1);
        assert_eq!(snap.state, 7);
        assert_eq!(snap.x, 470.0);

        actor.x = 0.0;
        assert_eq!(snap.x, 470.0);
    }

    #[test]
    fn slot_ids_parse_both_forms() {
        assert_eq!("slot2".parse::<ScriptSlot>(), Ok(ScriptSlot::B));
        assert_eq!("a".parse::<ScriptSlot>(), Ok(ScriptSlot::A));
        assert_eq!(ScriptSlot::B.id(), "slot2");
    }
}
