//! The pomodoro state machine.
//!
//! Everything here is pure: operations take the current time and return the
//! side effects the caller must perform, in order. Serialising access to the
//! state and performing the effects is the engine's job.

use crate::clock::elapsed_secs;
use crate::hooks::HookEvent;
use crate::persistence::SessionRecord;
use chrono::{DateTime, Duration, Local, SubsecRound};
use pomod_ipc::{Mode, Status};

/// Periods with less active time than this are not logged.
pub const MIN_LOGGED_SECS: u64 = 60;

/// Side effect produced by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Hook(HookEvent),
    Log(SessionRecord),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub mode: Mode,
    pub time_left: u64,
    pub active_time: u64,
    /// Start of the current run. `Some` exactly while the timer is running.
    started_at: Option<DateTime<Local>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Mode::Work)
    }
}

impl SessionState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            time_left: mode.nominal_duration(),
            active_time: 0,
            started_at: None,
        }
    }

    pub fn running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Commit the time elapsed since the run started and stop the clock.
    ///
    /// Active time is credited up to the remaining budget only, so an
    /// overshoot past the end of the period is not counted.
    fn reconcile(&mut self, now: DateTime<Local>) {
        if let Some(start) = self.started_at.take() {
            let elapsed = elapsed_secs(start, now);
            let credited = elapsed.min(self.time_left);
            self.time_left -= credited;
            self.active_time += credited;
        }
    }

    pub fn toggle(&mut self, now: DateTime<Local>) -> Vec<Effect> {
        if self.running() {
            self.reconcile(now);
            vec![Effect::Hook(HookEvent::Paused)]
        } else {
            self.started_at = Some(now);
            vec![Effect::Hook(HookEvent::Resumed)]
        }
    }

    /// End the current period early, whatever time is left.
    pub fn finish(&mut self, now: DateTime<Local>) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.running() {
            self.reconcile(now);
            effects.push(Effect::Hook(HookEvent::Paused));
        }
        self.rollover(now, &mut effects);
        effects
    }

    /// Detect natural expiry of a running period.
    pub fn tick(&mut self, now: DateTime<Local>) -> Vec<Effect> {
        let Some(start) = self.started_at else {
            return Vec::new();
        };
        if elapsed_secs(start, now) < self.time_left {
            return Vec::new();
        }

        self.active_time += self.time_left;
        self.time_left = 0;
        self.started_at = None;

        let mut effects = Vec::new();
        self.rollover(now, &mut effects);
        effects
    }

    /// Read-only snapshot. Does not reconcile.
    pub fn status(&self, now: DateTime<Local>) -> Status {
        let time_left = match self.started_at {
            Some(start) => self.time_left.saturating_sub(elapsed_secs(start, now)),
            None => self.time_left,
        };
        Status {
            mode: self.mode,
            running: self.running(),
            time_left,
        }
    }

    fn rollover(&mut self, now: DateTime<Local>, effects: &mut Vec<Effect>) {
        if self.active_time >= MIN_LOGGED_SECS {
            effects.push(Effect::Log(self.record(now)));
        }
        effects.push(Effect::Hook(HookEvent::finished(self.mode)));
        self.switch_mode();
    }

    /// The start is approximated as `now - active_time`; pauses within the
    /// period are not tracked individually.
    fn record(&self, now: DateTime<Local>) -> SessionRecord {
        let end = now.trunc_subsecs(0);
        SessionRecord {
            kind: self.mode,
            start: end - Duration::seconds(self.active_time as i64),
            end,
            duration: self.active_time,
        }
    }

    pub fn switch_mode(&mut self) {
        *self = Self::new(self.mode.next());
    }
}
