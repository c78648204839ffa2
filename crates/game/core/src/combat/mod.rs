//! Combat resolution.
//!
//! Pure functions over two [`Actor`](crate::Actor)s: hitbox projection, the
//! stance counter model, and damage/knockback application.

pub mod damage;
pub mod hitbox;
pub mod result;

pub use damage::{counter_for, damage_multiplier, is_facing_away, resolve_hit};
pub use hitbox::{active_hitbox, attack_profile};
pub use result::{AttackKind, Counter, HitOutcome};
