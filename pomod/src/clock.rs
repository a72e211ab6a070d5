use chrono::{DateTime, Local};

/// Source of wall-clock time for the session engine.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Whole seconds from `start` to `now`. A clock that stepped backwards counts
/// as no time elapsed.
pub fn elapsed_secs(start: DateTime<Local>, now: DateTime<Local>) -> u64 {
    (now - start).num_seconds().max(0) as u64
}
