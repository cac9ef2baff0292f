//! Per-frame simulation tick
//!
//! Called every display frame in every phase; only mutates targets while the
//! match is Active. Movement is a fixed step per tick, not scaled by frame time.

use glam::Vec3;

use super::state::{MatchPhase, MatchState};
use super::target::{Advance, TargetId};

/// What a frame did to the target set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameResult {
    /// Not Active, nothing moved
    Frozen,
    /// Every target advanced; `respawned` of them were recycled
    Advanced { respawned: u32 },
    /// A target reached the player; later targets were not advanced
    Collision(TargetId),
}

/// Advance every target one step toward `player`.
///
/// Collision is checked after the move and before the respawn rule, so a
/// target inside both the collision and respawn radius ends the match.
pub fn tick_targets(state: &mut MatchState, player: Vec3) -> FrameResult {
    if state.phase != MatchPhase::Active {
        return FrameResult::Frozen;
    }
    let Some(level) = state.level.clone() else {
        return FrameResult::Frozen;
    };

    let MatchState { targets, rng, .. } = state;
    let mut respawned = 0;
    for target in targets.iter_mut() {
        target.pursue(player);

        if target.is_colliding(player, &level) {
            return FrameResult::Collision(target.id);
        }

        if target.respawn_if_passed(player, &level, rng) == Advance::Respawned {
            respawned += 1;
        }
    }

    FrameResult::Advanced { respawned }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelConfig;
    use std::rc::Rc;

    fn active_state(level: LevelConfig) -> MatchState {
        let mut state = MatchState::new(12345);
        state.reset_for(Rc::new(level));
        state.phase = MatchPhase::Active;
        state
    }

    #[test]
    fn test_frozen_outside_active() {
        let mut state = active_state(LevelConfig::easy());
        let before: Vec<_> = state.targets.iter().map(|t| t.pos).collect();

        for phase in [
            MatchPhase::Idle,
            MatchPhase::Countdown,
            MatchPhase::Ended,
            MatchPhase::Abandoned,
        ] {
            state.phase = phase;
            assert_eq!(tick_targets(&mut state, Vec3::ZERO), FrameResult::Frozen);
        }

        let after: Vec<_> = state.targets.iter().map(|t| t.pos).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_active_moves_targets() {
        let mut state = active_state(LevelConfig::easy());
        let before: Vec<_> = state.targets.iter().map(|t| t.pos).collect();

        assert!(matches!(
            tick_targets(&mut state, Vec3::ZERO),
            FrameResult::Advanced { .. }
        ));
        for (t, old) in state.targets.iter().zip(before) {
            assert!(t.pos.distance(Vec3::ZERO) < old.distance(Vec3::ZERO));
        }
    }

    #[test]
    fn test_collision_beats_respawn() {
        let mut level = LevelConfig::easy();
        level.target_count = 1;
        let mut state = active_state(level);
        // Inside both the respawn radius and the collision radius after one step
        state.targets[0].pos = Vec3::new(0.0, 0.0, -0.5);
        let id = state.targets[0].id;

        assert_eq!(
            tick_targets(&mut state, Vec3::ZERO),
            FrameResult::Collision(id)
        );
        // Not recycled
        assert!(state.targets[0].pos.z > -1.0);
    }

    #[test]
    fn test_passed_target_respawns() {
        let mut level = LevelConfig::easy();
        level.target_count = 1;
        level.collision_distance = 0.5;
        let mut state = active_state(level);
        state.targets[0].pos = Vec3::new(8.0, 0.0, 3.0);

        assert_eq!(
            tick_targets(&mut state, Vec3::ZERO),
            FrameResult::Advanced { respawned: 1 }
        );
        assert!(state.targets[0].pos.z < 0.0);
    }
}
