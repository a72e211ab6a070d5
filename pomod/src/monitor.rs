use crate::engine::Engine;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Poll the engine once per interval so a running period ends on its own
/// when no command arrives.
pub fn spawn(engine: Arc<Engine>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            engine.tick().await;
        }
    })
}
