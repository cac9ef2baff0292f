//! Millisecond timer scheduler
//!
//! Replaces free-running intervals: the frame loop feeds elapsed time in and
//! gets back the timers that fired, in order. One timer per kind.

use super::target::TargetId;

/// What a timer is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Countdown step (repeating, 1s)
    Countdown,
    /// Match clock step (repeating, 1s)
    MatchClock,
    /// Delayed respawn after a hit
    Respawn(TargetId),
}

#[derive(Debug, Clone)]
struct Timer {
    kind: TimerKind,
    due_ms: u64,
    period_ms: Option<u64>,
    /// Insertion order breaks ties between timers due at the same instant
    seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    timers: Vec<Timer>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `kind` after `delay_ms`, replacing any pending timer of the same kind.
    ///
    /// A `period_ms` makes it repeat; a zero period is treated as one-shot.
    pub fn schedule(&mut self, kind: TimerKind, delay_ms: u64, period_ms: Option<u64>) {
        debug_assert!(period_ms != Some(0), "zero-period timer {:?}", kind);
        self.cancel(kind);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            kind,
            due_ms: self.now_ms + delay_ms,
            period_ms: period_ms.filter(|p| *p > 0),
            seq,
        });
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.timers.retain(|t| t.kind != kind);
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.timers.iter().any(|t| t.kind == kind)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Pop the earliest timer due at or before `until_ms`, advancing the clock to it.
    ///
    /// Repeating timers are re-armed one period later.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerKind> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(i, _)| i)?;

        let due_ms = self.timers[idx].due_ms;
        let kind = self.timers[idx].kind;
        self.now_ms = self.now_ms.max(due_ms);

        match self.timers[idx].period_ms {
            Some(period) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let timer = &mut self.timers[idx];
                timer.due_ms = due_ms + period;
                timer.seq = seq;
            }
            None => {
                self.timers.swap_remove(idx);
            }
        }
        Some(kind)
    }

    /// Move the clock to `until_ms` once every due timer has been popped
    pub fn finish_at(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    /// Advance the clock by `elapsed_ms` and return every firing in order
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<TimerKind> {
        let until = self.now_ms + elapsed_ms;
        let mut fired = Vec::new();
        while let Some(kind) = self.pop_due(until) {
            fired.push(kind);
        }
        self.finish_at(until);
        fired
    }
}
