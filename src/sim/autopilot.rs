//! Demo mode: aim at the closest target and fire on a fixed cadence

use glam::Vec3;

use super::hit::Ray;
use super::state::{MatchPhase, MatchState};

/// Ray from `eye` to the nearest target, if any
pub fn aim_at_nearest(state: &MatchState, eye: Vec3) -> Option<Ray> {
    state
        .targets
        .iter()
        .min_by(|a, b| {
            a.distance_to(eye)
                .partial_cmp(&b.distance_to(eye))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|t| Ray::towards(eye, t.pos))
}

/// Fires at the nearest target every `interval_frames` Active frames
#[derive(Debug, Clone)]
pub struct Autopilot {
    pub interval_frames: u32,
    frames: u32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(20)
    }
}

impl Autopilot {
    pub fn new(interval_frames: u32) -> Self {
        Self {
            interval_frames: interval_frames.max(1),
            frames: 0,
        }
    }

    /// Call once per frame; returns a shot when one is due
    pub fn update(&mut self, state: &MatchState, eye: Vec3) -> Option<Ray> {
        if state.phase != MatchPhase::Active {
            self.frames = 0;
            return None;
        }

        self.frames += 1;
        if self.frames < self.interval_frames {
            return None;
        }
        self.frames = 0;
        aim_at_nearest(state, eye)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelConfig;
    use crate::sim::hit::nearest_hit;
    use std::rc::Rc;

    #[test]
    fn test_aim_hits_nearest() {
        let mut state = MatchState::new(5);
        assert!(aim_at_nearest(&state, Vec3::ZERO).is_none());

        let level = Rc::new(LevelConfig::medium());
        state.reset_for(level.clone());
        let ray = aim_at_nearest(&state, Vec3::ZERO).unwrap();
        let nearest = state
            .targets
            .iter()
            .map(|t| t.distance_to(Vec3::ZERO))
            .fold(f32::MAX, f32::min);

        let hit = nearest_hit(&ray, &state.targets, level.target_size).unwrap();
        let hit_target = state.target(hit.target).unwrap();
        assert!((hit_target.distance_to(Vec3::ZERO) - nearest).abs() < 1e-3);
    }

    #[test]
    fn test_cadence() {
        let mut state = MatchState::new(5);
        state.reset_for(Rc::new(LevelConfig::easy()));
        let mut pilot = Autopilot::new(3);

        assert!(pilot.update(&state, Vec3::ZERO).is_none());
        state.phase = MatchPhase::Active;
        assert!(pilot.update(&state, Vec3::ZERO).is_none());
        assert!(pilot.update(&state, Vec3::ZERO).is_none());
        assert!(pilot.update(&state, Vec3::ZERO).is_some());
        assert!(pilot.update(&state, Vec3::ZERO).is_none());
    }
}
