//! Focus timer state machine.
//!
//! The timer does not use internal threads - the caller is responsible
//! for calling `tick()` once per wall-clock second while it runs. Owners
//! that do not keep the timer in memory between invocations serialize it
//! and call `sync()` on reload to apply the wall-clock seconds that
//! passed in the meantime as discrete ticks.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!         Running -> Finished          (countdown reached zero)
//!         Running | Paused -> Cancelled (no record emitted)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::session::SessionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Finished,
    Cancelled,
}

/// Core countdown timer for a single focus session.
///
/// Operates on one-second ticks -- no internal thread. The caller is
/// responsible for calling `tick()` periodically while Running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusTimer {
    state: TimerState,
    objective: String,
    /// Planned duration in minutes.
    planned_min: u64,
    /// Remaining time in whole seconds for the countdown.
    remaining_secs: u64,
    started_at: Option<DateTime<Utc>>,
    /// Epoch seconds of the last applied tick while Running.
    /// `sync()` uses this to convert wall-clock time into ticks.
    #[serde(default)]
    last_tick_epoch_secs: Option<i64>,
    ambient_sound: bool,
}

impl FocusTimer {
    /// Create an idle timer. The presentation layer enforces a nonzero
    /// duration and a non-empty objective before starting; the timer
    /// itself accepts zero and finishes on its first tick.
    pub fn new(objective: impl Into<String>, planned_min: u64, ambient_sound: bool) -> Self {
        Self {
            state: TimerState::Idle,
            objective: objective.into(),
            planned_min,
            remaining_secs: planned_min.saturating_mul(60),
            started_at: None,
            last_tick_epoch_secs: None,
            ambient_sound,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }

    pub fn planned_min(&self) -> u64 {
        self.planned_min
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.planned_min.saturating_mul(60)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, TimerState::Finished | TimerState::Cancelled)
    }

    /// 0.0 .. 100.0 progress through the countdown.
    pub fn progress_pct(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_secs as f64 / total as f64) * 100.0
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            objective: self.objective.clone(),
            planned_min: self.planned_min,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            progress_pct: self.progress_pct(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state != TimerState::Idle {
            return None;
        }
        let now = Utc::now();
        self.state = TimerState::Running;
        self.started_at = Some(now);
        self.remaining_secs = self.total_secs();
        self.last_tick_epoch_secs = Some(now.timestamp());
        Some(Event::TimerStarted {
            objective: self.objective.clone(),
            planned_min: self.planned_min,
            ambient_sound: self.ambient_sound,
            at: now,
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Paused;
        self.last_tick_epoch_secs = None;
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        self.state = TimerState::Running;
        self.last_tick_epoch_secs = Some(Utc::now().timestamp());
        Some(Event::TimerResumed {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Abandon the session. Only completed sessions are recorded, so no
    /// record is emitted here.
    pub fn cancel(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running | TimerState::Paused => {
                self.state = TimerState::Cancelled;
                self.last_tick_epoch_secs = None;
                Some(Event::TimerCancelled {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Apply one one-second tick. Inert unless Running. Returns
    /// `Some(Event::SessionCompleted)` when the countdown reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.last_tick_epoch_secs = Some(Utc::now().timestamp());
        if self.remaining_secs == 0 {
            return Some(self.finish());
        }
        None
    }

    /// Apply the wall-clock seconds elapsed since the last tick as
    /// discrete ticks. Used by callers that reload the timer from storage
    /// instead of holding it in memory.
    pub fn sync(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        let now = Utc::now().timestamp();
        let last = self.last_tick_epoch_secs.unwrap_or(now);
        let elapsed = now.saturating_sub(last).max(0) as u64;
        self.last_tick_epoch_secs = Some(now);
        if elapsed == 0 && self.remaining_secs > 0 {
            return None;
        }
        if elapsed >= self.remaining_secs {
            self.remaining_secs = 0;
            return Some(self.finish());
        }
        self.remaining_secs -= elapsed;
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finish(&mut self) -> Event {
        let now = Utc::now();
        self.state = TimerState::Finished;
        self.last_tick_epoch_secs = None;
        let focused = self.total_secs().saturating_sub(self.remaining_secs);
        let record = SessionRecord::new(
            self.objective.clone(),
            self.planned_min,
            focused,
            self.started_at.unwrap_or(now),
            true,
        );
        Event::SessionCompleted { record, at: now }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_pause_resume() {
        let mut timer = FocusTimer::new("deep work", 25, true);
        assert_eq!(timer.state(), TimerState::Idle);

        assert!(timer.start().is_some());
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.remaining_secs(), 25 * 60);

        assert!(timer.pause().is_some());
        assert_eq!(timer.state(), TimerState::Paused);

        assert!(timer.resume().is_some());
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[test]
    fn tick_is_inert_while_paused() {
        let mut timer = FocusTimer::new("deep work", 25, false);
        timer.start();
        timer.pause();
        let before = timer.remaining_secs();
        assert!(timer.tick().is_none());
        assert_eq!(timer.remaining_secs(), before);
    }

    #[test]
    fn countdown_finishes_with_full_focus() {
        let mut timer = FocusTimer::new("deep work", 1, false);
        timer.start();
        let mut completed = None;
        for _ in 0..60 {
            if let Some(event) = timer.tick() {
                completed = Some(event);
                break;
            }
        }
        let event = completed.expect("countdown should finish after 60 ticks");
        assert_eq!(timer.state(), TimerState::Finished);
        match event {
            Event::SessionCompleted { record, .. } => {
                assert!(record.completed);
                assert_eq!(record.planned_min, 1);
                assert_eq!(record.focused_secs, 60);
                assert_eq!(record.objective, "deep work");
            }
            other => panic!("expected SessionCompleted, got {other:?}"),
        }
    }

    #[test]
    fn zero_minute_timer_finishes_immediately() {
        let mut timer = FocusTimer::new("", 0, false);
        timer.start();
        let event = timer.tick().expect("first tick should finish");
        match event {
            Event::SessionCompleted { record, .. } => {
                assert_eq!(record.focused_secs, 0);
                assert!(record.completed);
            }
            other => panic!("expected SessionCompleted, got {other:?}"),
        }
        assert_eq!(timer.state(), TimerState::Finished);
    }

    #[test]
    fn cancel_emits_no_record() {
        let mut timer = FocusTimer::new("deep work", 25, false);
        timer.start();
        timer.tick();
        let event = timer.cancel().expect("cancel from running");
        assert!(matches!(event, Event::TimerCancelled { .. }));
        assert_eq!(timer.state(), TimerState::Cancelled);
        // Terminal: no further transitions.
        assert!(timer.tick().is_none());
        assert!(timer.resume().is_none());
    }

    #[test]
    fn cancel_from_paused() {
        let mut timer = FocusTimer::new("deep work", 25, false);
        timer.start();
        timer.pause();
        assert!(timer.cancel().is_some());
        assert_eq!(timer.state(), TimerState::Cancelled);
    }

    #[test]
    fn start_requires_idle() {
        let mut timer = FocusTimer::new("deep work", 25, false);
        timer.start();
        assert!(timer.start().is_none());
    }

    #[test]
    fn sync_finishes_zero_minute_timer() {
        let mut timer = FocusTimer::new("", 0, false);
        timer.start();
        let event = timer.sync().expect("sync should finish a zero countdown");
        assert!(matches!(event, Event::SessionCompleted { .. }));
    }

    #[test]
    fn sync_without_elapsed_time_is_inert() {
        let mut timer = FocusTimer::new("deep work", 25, false);
        timer.start();
        assert!(timer.sync().is_none());
        assert_eq!(timer.remaining_secs(), 25 * 60);
    }

    #[test]
    fn snapshot_reflects_state() {
        let timer = FocusTimer::new("deep work", 25, false);
        match timer.snapshot() {
            Event::StateSnapshot {
                state,
                remaining_secs,
                total_secs,
                ..
            } => {
                assert_eq!(state, TimerState::Idle);
                assert_eq!(remaining_secs, 25 * 60);
                assert_eq!(total_secs, 25 * 60);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn engine_roundtrips_through_json() {
        let mut timer = FocusTimer::new("deep work", 25, true);
        timer.start();
        timer.tick();
        let json = serde_json::to_string(&timer).unwrap();
        let back: FocusTimer = serde_json::from_str(&json).unwrap();
        assert_eq!(back.state(), TimerState::Running);
        assert_eq!(back.remaining_secs(), timer.remaining_secs());
        assert_eq!(back.objective(), "deep work");
    }
}
