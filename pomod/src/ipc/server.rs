//! Unix domain socket server for IPC

use crate::engine::Engine;
use anyhow::{Context, Result};
use pomod_ipc::{Command, MAX_COMMAND_BYTES, UNKNOWN_COMMAND};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, info, warn};

/// Bind a fresh listener at `path`, replacing any stale socket file.
pub fn bind(path: &Path) -> Result<UnixListener> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory {:?}", parent))?;
        }
    }

    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to remove stale socket {:?}", path))
        }
    }

    let listener =
        UnixListener::bind(path).with_context(|| format!("Failed to bind socket {:?}", path))?;
    info!(path = %path.display(), "IPC server listening");
    Ok(listener)
}

pub async fn serve(listener: UnixListener, engine: Arc<Engine>) {
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let engine = engine.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_client(stream, engine).await {
                        debug!(error = %e, "Connection closed with error");
                    }
                });
            }
            Err(e) => {
                warn!(error = %e, "Error accepting connection");
            }
        }
    }
}

async fn handle_client(mut stream: UnixStream, engine: Arc<Engine>) -> Result<()> {
    // One command per connection, delivered in a single write.
    let mut buf = [0u8; MAX_COMMAND_BYTES];
    let n = stream.read(&mut buf).await?;
    if n == 0 {
        return Ok(());
    }

    let payload = String::from_utf8_lossy(&buf[..n]);
    match payload.parse::<Command>() {
        Ok(Command::Toggle) => engine.toggle().await,
        Ok(Command::Finish) => engine.finish().await,
        Ok(Command::Status) => {
            let status = engine.status().await;
            stream.write_all(&serde_json::to_vec(&status)?).await?;
        }
        Err(e) => {
            debug!(error = %e, "Rejected command");
            stream.write_all(UNKNOWN_COMMAND.as_bytes()).await?;
        }
    }

    stream.shutdown().await?;
    Ok(())
}
