//! Fight configuration constants and tunable parameters.
//!
//! Every number the engine uses lives here so that a loaded configuration
//! fully determines simulation behavior. Defaults reproduce the reference
//! tuning of the arena (60 Hz frames, 800×450 arena).

use crate::error::ConfigError;

/// Complete tuning for one fight simulation.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FightConfig {
    pub world: WorldConfig,
    pub actor: ActorConfig,
    pub energy: EnergyConfig,
    pub combat: CombatConfig,
}

impl FightConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the invariants the engine relies on.
    ///
    /// The engine itself never fails, so configurations coming from disk are
    /// validated once at load time instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if !(world.gravity > 0.0) {
            return Err(ConfigError::NonPositive { field: "world.gravity" });
        }
        if !(0.0..=1.0).contains(&world.friction) {
            return Err(ConfigError::OutOfRange {
                field: "world.friction",
                min: 0.0,
                max: 1.0,
            });
        }
        if !(self.actor.width > 0.0) || !(self.actor.height > 0.0) {
            return Err(ConfigError::NonPositive { field: "actor.width/height" });
        }
        if world.arena_width <= self.actor.width {
            return Err(ConfigError::ArenaTooNarrow {
                arena: world.arena_width,
                actor: self.actor.width,
            });
        }
        if world.ground_y <= self.actor.height {
            return Err(ConfigError::GroundTooHigh {
                ground: world.ground_y,
                actor: self.actor.height,
            });
        }

        let combat = &self.combat;
        if combat.hitbox_window_start >= combat.hitbox_window_end
            || combat.hitbox_window_end > combat.attack_cooldown
        {
            return Err(ConfigError::InvalidHitboxWindow {
                start: combat.hitbox_window_start,
                end: combat.hitbox_window_end,
                cooldown: combat.attack_cooldown,
            });
        }
        if combat.light.damage > combat.heavy.damage {
            return Err(ConfigError::AttackOrdering);
        }
        if combat.backstab_multiplier < 0.0 {
            return Err(ConfigError::NonPositive { field: "combat.backstab_multiplier" });
        }

        Ok(())
    }

    /// Y coordinate of an actor's top edge while standing on the ground.
    pub fn ground_top(&self) -> f64 {
        self.world.ground_y - self.actor.height
    }
}

/// Arena geometry and global physics.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    pub arena_width: f64,
    pub arena_height: f64,
    /// Added to vertical velocity every tick.
    pub gravity: f64,
    /// Horizontal velocity multiplier applied every tick.
    pub friction: f64,
    /// Y coordinate of the floor (actors' bottom edge rests here).
    pub ground_y: f64,
}

impl WorldConfig {
    pub const DEFAULT_ARENA_WIDTH: f64 = 800.0;
    pub const DEFAULT_ARENA_HEIGHT: f64 = 450.0;
    pub const DEFAULT_GRAVITY: f64 = 0.8;
    pub const DEFAULT_FRICTION: f64 = 0.85;
    pub const DEFAULT_GROUND_Y: f64 = 415.0;
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            arena_width: Self::DEFAULT_ARENA_WIDTH,
            arena_height: Self::DEFAULT_ARENA_HEIGHT,
            gravity: Self::DEFAULT_GRAVITY,
            friction: Self::DEFAULT_FRICTION,
            ground_y: Self::DEFAULT_GROUND_Y,
        }
    }
}

/// Body dimensions and locomotion of a combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActorConfig {
    pub width: f64,
    pub height: f64,
    pub max_health: f64,
    /// Horizontal velocity added per tick of held movement.
    pub move_acceleration: f64,
    /// Vertical velocity set on jump (negative is up).
    pub jump_velocity: f64,
    pub crouch_damping: f64,
    pub guard_damping: f64,
    /// Horizontal damping when an attack starts.
    pub attack_damping: f64,
    /// Cooldown above which movement and stance changes are locked out.
    pub lock_threshold: u32,
    /// Height above the floor at which a knocked-out body comes to rest.
    pub ragdoll_floor_offset: f64,
    /// Horizontal velocity multiplier for a body sliding on the floor.
    pub ragdoll_slide_decay: f64,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            width: 55.0,
            height: 110.0,
            max_health: 100.0,
            move_acceleration: 1.5,
            jump_velocity: -18.0,
            crouch_damping: 0.5,
            guard_damping: 0.3,
            attack_damping: 0.2,
            lock_threshold: 5,
            ragdoll_floor_offset: 40.0,
            ragdoll_slide_decay: 0.5,
        }
    }
}

/// Energy pool, regeneration and per-intent costs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnergyConfig {
    pub max: f64,
    pub regen_idle: f64,
    pub regen_active: f64,
    /// Horizontal speed below which an IDLE actor counts as fully idle.
    pub idle_speed_threshold: f64,
    pub cost_move: f64,
    pub cost_jump: f64,
    pub cost_crouch: f64,
    pub cost_guard: f64,
    pub cost_light: f64,
    pub cost_heavy: f64,
    /// Drained from a defender who partially mitigates a hit.
    pub hit_penalty: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            max: 100.0,
            regen_idle: 0.5,
            regen_active: 0.2,
            idle_speed_threshold: 0.5,
            cost_move: 0.1,
            cost_jump: 15.0,
            cost_crouch: 0.5,
            cost_guard: 0.5,
            cost_light: 10.0,
            cost_heavy: 20.0,
            hit_penalty: 1.0,
        }
    }
}

/// Attack timing, reach and the damage/counter model.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Cooldown assigned when any attack starts.
    pub attack_cooldown: u32,
    /// Hitbox is live while `start < cooldown < end`.
    pub hitbox_window_start: u32,
    pub hitbox_window_end: u32,
    /// Cooldown added to an attacker whose hit was perfectly countered.
    pub counter_stun: u32,
    /// Damage multiplier when a counter only partially mitigates a hit.
    pub partial_mitigation: f64,
    /// Damage multiplier against a defender facing away.
    pub backstab_multiplier: f64,
    /// Upward velocity imparted on every successful hit.
    pub knockback_pop: f64,
    pub light: AttackProfile,
    pub heavy: AttackProfile,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            attack_cooldown: 20,
            hitbox_window_start: 5,
            hitbox_window_end: 15,
            counter_stun: 5,
            partial_mitigation: 0.5,
            backstab_multiplier: 1.0,
            knockback_pop: -5.0,
            light: AttackProfile {
                damage: 5.0,
                knockback: 8.0,
                reach: 46.0,
                offset_y: 20.0,
                height: 20.0,
            },
            heavy: AttackProfile {
                damage: 10.0,
                knockback: 15.0,
                reach: 66.0,
                offset_y: 40.0,
                height: 30.0,
            },
        }
    }
}

/// Shape and strength of one attack kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackProfile {
    pub damage: f64,
    /// Horizontal speed given to a struck defender.
    pub knockback: f64,
    /// Hitbox width projected from the attacker's leading edge.
    pub reach: f64,
    /// Hitbox top, measured down from the attacker's top edge.
    pub offset_y: f64,
    pub height: f64,
}
