//! Match state and core simulation types
//!
//! Everything a single match mutates lives in `MatchState`; the controller
//! is the only writer.

use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::target::{Target, TargetId};
use crate::consts::COUNTDOWN_START;
use crate::level::LevelConfig;

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// No match yet, level selection showing
    Idle,
    /// Targets placed but frozen, counting down
    Countdown,
    /// Targets moving, clock running, shooting enabled
    Active,
    /// Match finished with a summary
    Ended,
    /// Pointer lock released mid-match; no summary
    Abandoned,
}

impl MatchPhase {
    /// Whether a level can be selected from this phase
    pub fn accepts_selection(self) -> bool {
        matches!(
            self,
            MatchPhase::Idle | MatchPhase::Ended | MatchPhase::Abandoned
        )
    }
}

/// How a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Survived until the clock ran out
    TimeUp,
    /// A target reached the player
    Collision,
}

/// End-of-match report for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub level_name: String,
    pub score: u32,
    pub outcome: Outcome,
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct MatchState {
    pub phase: MatchPhase,
    pub score: u32,
    /// Seconds remaining
    pub time_left: u32,
    pub countdown: u32,
    /// Level of the current (or last) match
    pub level: Option<Rc<LevelConfig>>,
    /// Active targets (sorted by id)
    pub targets: Vec<Target>,
    pub last_summary: Option<MatchSummary>,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl MatchState {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: MatchPhase::Idle,
            score: 0,
            time_left: 0,
            countdown: 0,
            level: None,
            targets: Vec::new(),
            last_summary: None,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Reset counters and replace the target set for a new match
    pub fn reset_for(&mut self, level: Rc<LevelConfig>) {
        self.score = 0;
        self.time_left = level.game_time;
        self.countdown = COUNTDOWN_START;
        self.last_summary = None;

        self.targets.clear();
        for _ in 0..level.target_count {
            let id = self.next_target_id();
            let target = Target::new(id, &level, &mut self.rng);
            self.targets.push(target);
        }
        self.level = Some(level);
    }

    fn next_target_id(&mut self) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn target(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn target_mut(&mut self, id: TargetId) -> Option<&mut Target> {
        self.targets.iter_mut().find(|t| t.id == id)
    }

    /// Respawn one target in the current level's volume
    pub fn respawn_target(&mut self, id: TargetId) -> bool {
        let Some(level) = self.level.clone() else {
            return false;
        };
        match self.targets.iter_mut().find(|t| t.id == id) {
            Some(target) => {
                target.spawn(&level, &mut self.rng);
                true
            }
            None => false,
        }
    }

    pub fn level_name(&self) -> &str {
        self.level.as_ref().map(|l| l.name.as_str()).unwrap_or("")
    }
}
