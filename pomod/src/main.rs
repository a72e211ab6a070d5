use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod clock;
mod config;
mod engine;
mod hooks;
mod ipc;
mod monitor;
mod notify;
mod persistence;
mod session;

use clock::SystemClock;
use config::Config;
use engine::Engine;
use hooks::HookRunner;
use persistence::SessionLog;

const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() {
    let config = match config::load_config() {
        Ok(config) => config,
        Err(err) => {
            init_logging(DEFAULT_LOG_FILTER);
            error!(error = %format!("{err:#}"), "Failed to load configuration");
            std::process::exit(1);
        }
    };
    init_logging(&config.log_filter);

    if let Err(err) = run(config).await {
        error!(error = %format!("{err:#}"), "pomod stopped");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    let data_dir = config.resolved_data_dir()?;
    let log = SessionLog::new(&data_dir);
    let hooks = HookRunner::new(config.hooks_dir()?);
    info!(
        log = %log.path().display(),
        hooks = %hooks.dir().display(),
        "Starting pomod"
    );
    match log.read_all() {
        Ok(records) => debug!(sessions = records.len(), "Read session history"),
        Err(err) => warn!(
            error = %format!("{err:#}"),
            path = %log.path().display(),
            "Session log is unreadable or corrupt"
        ),
    }

    let listener = ipc::server::bind(&config.socket_path).context("Error creating socket")?;

    let engine = Arc::new(
        Engine::new(Arc::new(SystemClock), log, hooks).with_notifications(config.notifications),
    );
    let monitor = monitor::spawn(engine.clone());

    tokio::select! {
        _ = ipc::server::serve(listener, engine) => Ok(()),
        res = monitor => match res {
            Ok(()) => bail!("Ticking monitor exited"),
            Err(e) => bail!("Ticking monitor failed: {}", e),
        },
    }
}

fn init_logging(fallback: &str) {
    let filter = EnvFilter::try_from_env("POMOD_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
