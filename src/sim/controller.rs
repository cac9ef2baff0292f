//! Match lifecycle state machine
//!
//! Idle/Ended/Abandoned -> Countdown -> Active -> Ended (or Abandoned).
//! The controller owns the match state and the scheduler, takes discrete
//! input events, and queues presentation events for the front end.

use std::rc::Rc;

use glam::Vec3;

use super::hit::{Ray, RayHit, nearest_hit};
use super::schedule::{Scheduler, TimerKind};
use super::state::{MatchPhase, MatchState, MatchSummary, Outcome};
use super::target::TargetId;
use super::tick::{FrameResult, tick_targets};
use crate::consts::*;
use crate::error::MatchError;
use crate::format_clock;
use crate::level::{LevelCatalog, LevelConfig, LevelInfo};

/// Discrete input from the front end
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    SelectLevel(String),
    FireShot(Ray),
    PointerLockChanged(bool),
    HoverLevel(String),
}

/// Events consumed by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ScoreChanged(u32),
    /// Formatted `M:SS`
    TimeChanged(String),
    CountdownChanged(u32),
    PhaseChanged(MatchPhase),
    LevelHovered(LevelInfo),
    TargetHit(TargetId),
    MatchEnded(MatchSummary),
}

/// Anything that renders game events (DOM HUD, audio, logs)
pub trait Presenter {
    fn present(&mut self, event: &GameEvent);
}

/// Owns one match at a time
pub struct MatchController {
    state: MatchState,
    catalog: LevelCatalog,
    scheduler: Scheduler,
    pointer_locked: bool,
    events: Vec<GameEvent>,
}

impl MatchController {
    pub fn new(catalog: LevelCatalog, seed: u64) -> Self {
        Self {
            state: MatchState::new(seed),
            catalog,
            scheduler: Scheduler::new(),
            pointer_locked: false,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> MatchPhase {
        self.state.phase
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Timers currently armed (countdown, clock, pending respawns)
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn is_respawn_pending(&self, id: TargetId) -> bool {
        self.scheduler.is_pending(TimerKind::Respawn(id))
    }

    /// Route an input event. Fire and pointer-lock events never fail.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<(), MatchError> {
        match event {
            InputEvent::SelectLevel(name) => self.select_level(&name),
            InputEvent::FireShot(ray) => {
                self.fire(&ray);
                Ok(())
            }
            InputEvent::PointerLockChanged(locked) => {
                self.set_pointer_locked(locked);
                Ok(())
            }
            InputEvent::HoverLevel(name) => self.hover_level(&name),
        }
    }

    pub fn select_level(&mut self, name: &str) -> Result<(), MatchError> {
        let level = self
            .catalog
            .find(name)
            .ok_or_else(|| MatchError::UnknownLevel(name.to_string()))?;
        self.start_countdown(level)
    }

    pub fn hover_level(&mut self, name: &str) -> Result<(), MatchError> {
        let info = self
            .catalog
            .info(name)
            .ok_or_else(|| MatchError::UnknownLevel(name.to_string()))?;
        self.events.push(GameEvent::LevelHovered(info));
        Ok(())
    }

    /// Begin a new match on `level`
    pub fn start_countdown(&mut self, level: Rc<LevelConfig>) -> Result<(), MatchError> {
        if !self.state.phase.accepts_selection() {
            log::debug!("Level selection ignored during {:?}", self.state.phase);
            return Err(MatchError::SelectionLocked(self.state.phase));
        }

        log::info!(
            "Starting {} ({} targets, {}s)",
            level.name,
            level.target_count,
            level.game_time
        );

        self.scheduler.cancel_all();
        self.state.reset_for(level);
        self.set_phase(MatchPhase::Countdown);
        self.events.push(GameEvent::ScoreChanged(self.state.score));
        self.events
            .push(GameEvent::TimeChanged(format_clock(self.state.time_left)));
        self.events
            .push(GameEvent::CountdownChanged(self.state.countdown));
        self.scheduler
            .schedule(TimerKind::Countdown, SECOND_MS, Some(SECOND_MS));
        Ok(())
    }

    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked;
        if !locked && self.state.phase == MatchPhase::Active {
            self.abandon();
        }
    }

    /// Resolve a shot. Ignored unless Active with the pointer locked.
    pub fn fire(&mut self, ray: &Ray) -> Option<RayHit> {
        if self.state.phase != MatchPhase::Active || !self.pointer_locked {
            return None;
        }
        let radius = self.state.level.as_ref()?.target_size;

        let hit = nearest_hit(ray, &self.state.targets, radius)?;
        if let Some(target) = self.state.target_mut(hit.target) {
            target.hit_flash = 1.0;
        }
        self.state.score += 1;
        // The first hit owns the respawn deadline
        let respawn = TimerKind::Respawn(hit.target);
        if !self.scheduler.is_pending(respawn) {
            self.scheduler.schedule(respawn, HIT_RESPAWN_DELAY_MS, None);
        }

        self.events.push(GameEvent::TargetHit(hit.target));
        self.events.push(GameEvent::ScoreChanged(self.state.score));
        Some(hit)
    }

    /// Feed elapsed wall time to the countdown, match clock and respawn timers
    pub fn advance_clock(&mut self, elapsed_ms: u64) {
        let until = self.scheduler.now_ms() + elapsed_ms;
        while let Some(kind) = self.scheduler.pop_due(until) {
            self.on_timer(kind);
        }
        self.scheduler.finish_at(until);
    }

    /// One display frame of target simulation
    pub fn frame(&mut self, player: Vec3) -> FrameResult {
        let result = tick_targets(&mut self.state, player);
        if let FrameResult::Collision(id) = result {
            log::info!("Target {:?} reached the player", id);
            self.end_match(Outcome::Collision);
        }
        result
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn dispatch_events(&mut self, presenter: &mut dyn Presenter) {
        for event in self.drain_events() {
            presenter.present(&event);
        }
    }

    fn on_timer(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::Countdown => self.countdown_step(),
            TimerKind::MatchClock => self.clock_step(),
            TimerKind::Respawn(id) => {
                if self.state.phase == MatchPhase::Active {
                    self.state.respawn_target(id);
                }
            }
        }
    }

    fn countdown_step(&mut self) {
        if self.state.phase != MatchPhase::Countdown {
            debug_assert!(false, "countdown tick during {:?}", self.state.phase);
            self.scheduler.cancel(TimerKind::Countdown);
            return;
        }

        self.state.countdown = self.state.countdown.saturating_sub(1);
        self.events
            .push(GameEvent::CountdownChanged(self.state.countdown));
        if self.state.countdown == 0 {
            self.scheduler.cancel(TimerKind::Countdown);
            if !self.pointer_locked {
                log::info!("Pointer not locked when the countdown ran out");
                self.abandon();
                return;
            }
            self.scheduler
                .schedule(TimerKind::MatchClock, SECOND_MS, Some(SECOND_MS));
            self.set_phase(MatchPhase::Active);
        }
    }

    fn clock_step(&mut self) {
        if self.state.phase != MatchPhase::Active {
            debug_assert!(false, "clock tick during {:?}", self.state.phase);
            self.scheduler.cancel(TimerKind::MatchClock);
            return;
        }

        debug_assert!(self.state.time_left > 0, "clock ticked past zero");
        self.state.time_left = self.state.time_left.saturating_sub(1);
        self.events
            .push(GameEvent::TimeChanged(format_clock(self.state.time_left)));
        if self.state.time_left == 0 {
            self.end_match(Outcome::TimeUp);
        }
    }

    fn end_match(&mut self, outcome: Outcome) {
        if self.state.phase != MatchPhase::Active {
            return;
        }
        self.scheduler.cancel_all();

        let summary = MatchSummary {
            level_name: self.state.level_name().to_string(),
            score: self.state.score,
            outcome,
        };
        log::info!(
            "Match over on {}: {:?}, score {}",
            summary.level_name,
            summary.outcome,
            summary.score
        );

        self.state.last_summary = Some(summary.clone());
        self.events.push(GameEvent::MatchEnded(summary));
        self.set_phase(MatchPhase::Ended);
    }

    fn abandon(&mut self) {
        log::info!("Match abandoned at score {}", self.state.score);
        self.scheduler.cancel_all();
        self.set_phase(MatchPhase::Abandoned);
    }

    fn set_phase(&mut self, phase: MatchPhase) {
        log::debug!("Phase {:?} -> {:?}", self.state.phase, phase);
        self.state.phase = phase;
        self.events.push(GameEvent::PhaseChanged(phase));
    }
}
