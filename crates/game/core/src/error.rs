//! Error types for arena-core.
//!
//! The simulation step itself is infallible: every input, including a
//! malformed decision, has a defined outcome. The only fallible surface is
//! the configuration, validated once before a fight starts.

/// Rejected [`FightConfig`](crate::FightConfig) values.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },

    #[error("{field} must be within [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("arena width {arena} cannot fit an actor of width {actor}")]
    ArenaTooNarrow { arena: f64, actor: f64 },

    #[error("ground at y={ground} leaves no room for an actor of height {actor}")]
    GroundTooHigh { ground: f64, actor: f64 },

    #[error(
        "hitbox window ({start}, {end}) must be non-empty and fit inside the attack cooldown {cooldown}"
    )]
    InvalidHitboxWindow { start: u32, end: u32, cooldown: u32 },

    #[error("light attack damage must not exceed heavy attack damage")]
    AttackOrdering,
}
