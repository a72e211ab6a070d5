//! Serialised access to the session state.
//!
//! Every operation runs its whole transition under one lock and performs the
//! resulting side effects only after the lock is released, so a command and
//! a monitor tick can never interleave halfway through a rollover.

use crate::clock::Clock;
use crate::hooks::HookRunner;
use crate::notify;
use crate::persistence::SessionLog;
use crate::session::{Effect, SessionState};
use pomod_ipc::Status;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub struct Engine {
    state: Mutex<SessionState>,
    clock: Arc<dyn Clock>,
    log: SessionLog,
    hooks: HookRunner,
    notifications: bool,
}

impl Engine {
    pub fn new(clock: Arc<dyn Clock>, log: SessionLog, hooks: HookRunner) -> Self {
        Self {
            state: Mutex::new(SessionState::default()),
            clock,
            log,
            hooks,
            notifications: false,
        }
    }

    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications = enabled;
        self
    }

    pub async fn toggle(&self) {
        let effects = {
            let mut state = self.state.lock().await;
            let effects = state.toggle(self.clock.now());
            info!(
                mode = %state.mode,
                running = state.running(),
                time_left = state.time_left,
                "Toggled timer"
            );
            effects
        };
        self.dispatch(effects);
    }

    pub async fn finish(&self) {
        let effects = {
            let mut state = self.state.lock().await;
            let finished = state.mode;
            let effects = state.finish(self.clock.now());
            info!(finished = %finished, next = %state.mode, "Period finished early");
            effects
        };
        self.dispatch(effects);
    }

    /// Called by the monitor once per interval.
    pub async fn tick(&self) {
        let effects = {
            let mut state = self.state.lock().await;
            let mode = state.mode;
            let effects = state.tick(self.clock.now());
            if !effects.is_empty() {
                info!(finished = %mode, next = %state.mode, "Period expired");
            }
            effects
        };
        self.dispatch(effects);
    }

    pub async fn status(&self) -> Status {
        self.state.lock().await.status(self.clock.now())
    }

    fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Log(record) => {
                    if let Err(e) = self.log.append(&record) {
                        warn!(
                            error = %e,
                            path = %self.log.path().display(),
                            "Failed to write session log"
                        );
                    }
                }
                Effect::Hook(event) => {
                    match self.hooks.fire(event) {
                        Ok(true) => debug!(hook = %event, "Launched hook"),
                        Ok(false) => {}
                        Err(e) => warn!(error = %e, hook = %event, "Failed to launch hook"),
                    }
                    if let (true, Some(mode)) = (self.notifications, event.finished_mode()) {
                        notify::period_finished(mode);
                    }
                }
            }
        }
    }
}
