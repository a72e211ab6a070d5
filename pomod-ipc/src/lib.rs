//! Inter-process communication between pomod and pomodctl
//!
//! The wire format is deliberately tiny: the client writes one ASCII command
//! token and, for `status` only, the daemon answers with a JSON object and
//! closes the connection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

pub const SOCKET_PATH: &str = "/tmp/pomod.sock";

/// Reply written for any payload that is not a known command.
pub const UNKNOWN_COMMAND: &str = "unknown command";

/// The daemon reads a single chunk of at most this many bytes per connection.
pub const MAX_COMMAND_BYTES: usize = 128;

/// Commands that pomodctl can send to pomod
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Finish,
    Status,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Toggle => "toggle",
            Command::Finish => "finish",
            Command::Status => "status",
        }
    }

    /// Only `status` gets a reply; the other commands are fire-and-forget.
    pub fn expects_reply(&self) -> bool {
        matches!(self, Command::Status)
    }
}

impl FromStr for Command {
    type Err = IpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "toggle" => Ok(Command::Toggle),
            "finish" => Ok(Command::Finish),
            "status" => Ok(Command::Status),
            other => Err(IpcError::UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two kinds of period the timer alternates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Work,
    Break,
}

impl Mode {
    pub const WORK_SECS: u64 = 50 * 60;
    pub const BREAK_SECS: u64 = 10 * 60;

    /// Length of a full period of this mode, in seconds.
    pub fn nominal_duration(&self) -> u64 {
        match self {
            Mode::Work => Self::WORK_SECS,
            Mode::Break => Self::BREAK_SECS,
        }
    }

    pub fn next(&self) -> Mode {
        match self {
            Mode::Work => Mode::Break,
            Mode::Break => Mode::Work,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::Break => "break",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot returned by the `status` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub mode: Mode,
    pub running: bool,
    pub time_left: u64, // seconds
}

#[derive(Error, Debug)]
pub enum IpcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("daemon not running?")]
    ConnectionRefused,

    #[error("unknown command: {0:?}")]
    UnknownCommand(String),
}

/// Send one command to the daemon listening on `socket`.
///
/// Returns the raw reply for commands that have one (`status`), `None`
/// otherwise.
pub async fn request(socket: &Path, command: Command) -> Result<Option<String>, IpcError> {
    let mut stream = UnixStream::connect(socket)
        .await
        .map_err(|_| IpcError::ConnectionRefused)?;

    stream.write_all(command.as_str().as_bytes()).await?;

    if !command.expects_reply() {
        return Ok(None);
    }

    // The daemon closes the connection after writing its reply.
    let mut reply = String::new();
    stream.read_to_string(&mut reply).await?;
    Ok(Some(reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::UnixListener;

    #[test]
    fn parses_known_commands_and_trims_newline() {
        assert_eq!("toggle".parse::<Command>().unwrap(), Command::Toggle);
        assert_eq!("finish\n".parse::<Command>().unwrap(), Command::Finish);
        assert_eq!(" status ".parse::<Command>().unwrap(), Command::Status);
    }

    #[test]
    fn rejects_unknown_command() {
        let err = "foo".parse::<Command>().unwrap_err();
        assert!(matches!(err, IpcError::UnknownCommand(ref s) if s == "foo"));
        assert!("Toggle".parse::<Command>().is_err());
        assert!("".parse::<Command>().is_err());
    }

    #[test]
    fn status_uses_wire_field_names() {
        let status = Status {
            mode: Mode::Break,
            running: true,
            time_left: 42,
        };
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "mode": "break", "running": true, "time_left": 42 })
        );
    }

    #[test]
    fn modes_alternate_with_fixed_durations() {
        assert_eq!(Mode::Work.nominal_duration(), 3000);
        assert_eq!(Mode::Break.nominal_duration(), 600);
        assert_eq!(Mode::Work.next(), Mode::Break);
        assert_eq!(Mode::Break.next(), Mode::Work);
    }

    #[tokio::test]
    async fn request_without_daemon_is_connection_refused() {
        let dir = tempfile::tempdir().unwrap();
        let err = request(&dir.path().join("missing.sock"), Command::Status)
            .await
            .unwrap_err();
        assert!(matches!(err, IpcError::ConnectionRefused));
        assert_eq!(err.to_string(), "daemon not running?");
    }

    #[tokio::test]
    async fn request_status_reads_reply_until_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pomod.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; MAX_COMMAND_BYTES];
            let n = stream.read(&mut buf).await.unwrap();
            assert_eq!(&buf[..n], b"status");
            stream.write_all(b"{\"ok\":1}").await.unwrap();
        });

        let reply = request(&path, Command::Status).await.unwrap();
        assert_eq!(reply.as_deref(), Some("{\"ok\":1}"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn request_toggle_returns_without_reply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pomod.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut payload = String::new();
            stream.read_to_string(&mut payload).await.unwrap();
            payload
        });

        assert!(request(&path, Command::Toggle).await.unwrap().is_none());
        assert_eq!(server.await.unwrap(), "toggle");
    }
}
