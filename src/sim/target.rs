//! Targets: spawn, pursuit and respawn rules

use glam::Vec3;
use rand::Rng;

use crate::consts::*;
use crate::level::LevelConfig;

/// Stable handle the renderer keys its scene object on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

/// What a single `advance` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved,
    Respawned,
}

/// A target entity
#[derive(Debug, Clone)]
pub struct Target {
    pub id: TargetId,
    pub pos: Vec3,
    /// Units per tick, copied from the level at spawn time
    pub speed: f32,
    /// Euler angles (cosmetic only)
    pub rotation: Vec3,
    /// Hit flash intensity (0-1, cosmetic only)
    pub hit_flash: f32,
}

impl Target {
    /// Create a target already placed in the level's spawn volume
    pub fn new(id: TargetId, level: &LevelConfig, rng: &mut impl Rng) -> Self {
        let mut target = Self {
            id,
            pos: Vec3::ZERO,
            speed: 0.0,
            rotation: Vec3::ZERO,
            hit_flash: 0.0,
        };
        target.spawn(level, rng);
        target
    }

    /// Place the target at a random point in front of the player
    pub fn spawn(&mut self, level: &LevelConfig, rng: &mut impl Rng) {
        let vol = &level.spawn_volume;

        let x = if vol.half_width > 0.0 {
            rng.random_range(-vol.half_width..=vol.half_width)
        } else {
            0.0
        };
        let y = if vol.half_height > 0.0 {
            rng.random_range(0.0..vol.half_height)
        } else {
            0.0
        } + GROUND_CLEARANCE;
        // Shallow volumes collapse onto the minimum offset
        let far = vol.depth.max(MIN_FORWARD_OFFSET);
        let z = rng.random_range(-far..=-MIN_FORWARD_OFFSET);

        self.pos = Vec3::new(x, y, z);
        self.speed = level.target_speed;
        self.hit_flash = 0.0;
    }

    pub fn distance_to(&self, player: Vec3) -> f32 {
        self.pos.distance(player)
    }

    /// Move `speed` units straight at the player and spin.
    ///
    /// Lands on the player instead of overshooting when closer than one step.
    pub fn pursue(&mut self, player: Vec3) {
        let to_player = player - self.pos;
        let dist = to_player.length();
        if dist <= self.speed {
            self.pos = player;
        } else {
            self.pos += to_player / dist * self.speed;
        }

        self.rotation.x += TARGET_SPIN_PER_TICK;
        self.rotation.y += TARGET_SPIN_PER_TICK;
        if self.hit_flash > 0.0 {
            self.hit_flash = (self.hit_flash - HIT_FLASH_DECAY).max(0.0);
        }
    }

    /// Whether the target is too close or has slipped past the player
    pub fn should_respawn(&self, player: Vec3) -> bool {
        self.distance_to(player) < RESPAWN_DISTANCE || self.pos.z - player.z > 0.0
    }

    /// Respawn if `should_respawn`, using the level as it is now
    pub fn respawn_if_passed(
        &mut self,
        player: Vec3,
        level: &LevelConfig,
        rng: &mut impl Rng,
    ) -> Advance {
        if self.should_respawn(player) {
            self.spawn(level, rng);
            Advance::Respawned
        } else {
            Advance::Moved
        }
    }

    /// One simulation step with no collision check
    pub fn advance(&mut self, player: Vec3, level: &LevelConfig, rng: &mut impl Rng) -> Advance {
        self.pursue(player);
        self.respawn_if_passed(player, level, rng)
    }

    pub fn is_colliding(&self, player: Vec3, level: &LevelConfig) -> bool {
        self.distance_to(player) < level.collision_distance
    }

    /// Face ring as seen head-on: (vertical squash 0-1, roll in radians)
    pub fn ring_ellipse(&self) -> (f32, f32) {
        (self.rotation.x.cos().abs(), self.rotation.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn in_spawn_volume(pos: Vec3, level: &LevelConfig) -> bool {
        let vol = &level.spawn_volume;
        pos.x.abs() <= vol.half_width
            && pos.y >= GROUND_CLEARANCE
            && pos.y <= vol.half_height + GROUND_CLEARANCE
            && pos.z <= -MIN_FORWARD_OFFSET
            && pos.z >= -vol.depth.max(MIN_FORWARD_OFFSET)
    }

    proptest! {
        #[test]
        fn spawn_is_always_in_front(seed in any::<u64>(), preset in 0usize..3) {
            let level = [LevelConfig::easy(), LevelConfig::medium(), LevelConfig::hard()][preset].clone();
            let mut rng = Pcg32::seed_from_u64(seed);
            let target = Target::new(TargetId(1), &level, &mut rng);

            prop_assert!(target.pos.z < PLAYER_EYE.z);
            prop_assert!(in_spawn_volume(target.pos, &level));
            prop_assert_eq!(target.speed, level.target_speed);
        }

        #[test]
        fn advance_closes_distance_until_respawn(seed in any::<u64>()) {
            let mut level = LevelConfig::hard();
            level.target_speed = 0.5;
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut target = Target::new(TargetId(1), &level, &mut rng);

            let mut last = target.distance_to(PLAYER_EYE);
            let mut respawned = false;
            for _ in 0..1000 {
                match target.advance(PLAYER_EYE, &level, &mut rng) {
                    Advance::Moved => {
                        let d = target.distance_to(PLAYER_EYE);
                        prop_assert!(d < last);
                        last = d;
                    }
                    Advance::Respawned => {
                        prop_assert!(in_spawn_volume(target.pos, &level));
                        respawned = true;
                        break;
                    }
                }
            }
            prop_assert!(respawned);
        }
    }

    #[test]
    fn test_shallow_volume_uses_min_offset() {
        let mut level = LevelConfig::easy();
        level.spawn_volume.depth = 2.0;
        let mut rng = Pcg32::seed_from_u64(7);
        let target = Target::new(TargetId(1), &level, &mut rng);
        assert_eq!(target.pos.z, -MIN_FORWARD_OFFSET);
    }

    #[test]
    fn test_pursue_moves_exactly_speed() {
        let level = LevelConfig::easy();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut target = Target::new(TargetId(1), &level, &mut rng);
        target.pos = Vec3::new(0.0, 0.0, -20.0);

        target.pursue(Vec3::ZERO);
        assert!((target.pos.z - (-20.0 + level.target_speed)).abs() < 1e-5);
        assert_eq!(target.pos.x, 0.0);
        assert!(target.rotation.x > 0.0);
    }

    #[test]
    fn test_ring_follows_spin() {
        let level = LevelConfig::easy();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut target = Target::new(TargetId(1), &level, &mut rng);
        assert_eq!(target.ring_ellipse(), (1.0, 0.0));

        for _ in 0..10 {
            target.pursue(Vec3::ZERO);
        }
        let (squash, roll) = target.ring_ellipse();
        assert!(squash < 1.0 && squash > 0.0);
        assert!((roll - 10.0 * TARGET_SPIN_PER_TICK).abs() < 1e-5);
    }

    #[test]
    fn test_pursue_does_not_overshoot() {
        let level = LevelConfig::easy();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut target = Target::new(TargetId(1), &level, &mut rng);
        target.pos = Vec3::new(0.0, 0.0, -0.01);
        target.speed = 1.0;

        target.pursue(Vec3::ZERO);
        assert_eq!(target.pos, Vec3::ZERO);
    }

    #[test]
    fn test_respawn_when_behind_player() {
        let level = LevelConfig::medium();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut target = Target::new(TargetId(1), &level, &mut rng);
        target.pos = Vec3::new(5.0, 0.0, 0.5);

        assert_eq!(
            target.respawn_if_passed(Vec3::ZERO, &level, &mut rng),
            Advance::Respawned
        );
        assert!(target.pos.z <= -MIN_FORWARD_OFFSET);
    }

    #[test]
    fn test_respawn_uses_current_level_speed() {
        let easy = LevelConfig::easy();
        let hard = LevelConfig::hard();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut target = Target::new(TargetId(1), &easy, &mut rng);
        target.pos = Vec3::new(0.0, 0.0, -0.5);

        target.respawn_if_passed(Vec3::ZERO, &hard, &mut rng);
        assert_eq!(target.speed, hard.target_speed);
    }

    #[test]
    fn test_collision_threshold() {
        let level = LevelConfig::easy();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut target = Target::new(TargetId(1), &level, &mut rng);

        target.pos = Vec3::new(0.0, 0.0, -(level.collision_distance + 0.01));
        assert!(!target.is_colliding(Vec3::ZERO, &level));
        target.pos = Vec3::new(0.0, 0.0, -(level.collision_distance - 0.01));
        assert!(target.is_colliding(Vec3::ZERO, &level));
    }
}
