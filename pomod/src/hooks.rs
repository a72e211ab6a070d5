//! External hook scripts, launched fire-and-forget on state transitions.

use pomod_ipc::Mode;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    Paused,
    Resumed,
    SessionFinished,
    BreakFinished,
}

impl HookEvent {
    /// Event fired when a period of `mode` ends.
    pub fn finished(mode: Mode) -> Self {
        match mode {
            Mode::Work => HookEvent::SessionFinished,
            Mode::Break => HookEvent::BreakFinished,
        }
    }

    /// Mode whose period just ended, for the two rollover events.
    pub fn finished_mode(&self) -> Option<Mode> {
        match self {
            HookEvent::SessionFinished => Some(Mode::Work),
            HookEvent::BreakFinished => Some(Mode::Break),
            HookEvent::Paused | HookEvent::Resumed => None,
        }
    }

    /// File name of the hook executable for this event.
    pub fn name(&self) -> &'static str {
        match self {
            HookEvent::Paused => "paused",
            HookEvent::Resumed => "resumed",
            HookEvent::SessionFinished => "session_finished",
            HookEvent::BreakFinished => "break_finished",
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct HookRunner {
    dir: PathBuf,
}

impl HookRunner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Launch the hook for `event` if one is installed.
    ///
    /// Returns `Ok(false)` when there is no hook. The child is never awaited;
    /// tokio reaps it in the background once it exits.
    pub fn fire(&self, event: HookEvent) -> io::Result<bool> {
        let path = self.dir.join(event.name());
        if !path.is_file() {
            return Ok(false);
        }

        Command::new(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(true)
    }
}
