//! Round setup: spawn positions and fresh actors.

use arena_core::{Actor, ControlSource, Facing, FightConfig};
use rand::Rng;

pub const FIRST_SPAWN_X: f64 = 280.0;
pub const SECOND_SPAWN_X: f64 = 470.0;
/// Spawn offsets are drawn from `[-SPAWN_JITTER, SPAWN_JITTER)`.
pub const SPAWN_JITTER: f64 = 30.0;

pub fn spawn_offset(rng: &mut impl Rng) -> f64 {
    rng.gen_range(-SPAWN_JITTER..SPAWN_JITTER)
}

/// Mirrored pair: the first actor moves right by `offset` while the second
/// moves left by the same amount. The second actor faces left.
pub fn spawn_pair(controls: [ControlSource; 2], offset: f64, config: &FightConfig) -> (Actor, Actor) {
    let [first, second] = controls;
    (
        Actor::spawn(FIRST_SPAWN_X + offset, Facing::Right, first, config),
        Actor::spawn(SECOND_SPAWN_X - offset, Facing::Left, second, config),
    )
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn spawns_are_mirrored() {
        let config = FightConfig::default();
        let (first, second) = spawn_pair([ControlSource::Human; 2], 12.5, &config);
        assert_eq!(first.x, 292.5);
        assert_eq!(second.x, 457.5);
        assert_eq!(first.facing, Facing::Right);
        assert_eq!(second.facing, Facing::Left);
        assert_eq!(first.x - FIRST_SPAWN_X, SECOND_SPAWN_X - second.x);
    }

    #[test]
    fn offsets_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let offset = spawn_offset(&mut rng);
            assert!((-SPAWN_JITTER..SPAWN_JITTER).contains(&offset));
        }
    }
}
