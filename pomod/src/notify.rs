use pomod_ipc::Mode;
use tracing::warn;

/// Desktop notification for the end of a period. Runs on a blocking thread
/// since the notification backend talks to the session bus synchronously.
pub fn period_finished(mode: Mode) {
    let (summary, body) = match mode {
        Mode::Work => ("Work session finished", "Time for a break."),
        Mode::Break => ("Break finished", "Back to work."),
    };

    tokio::task::spawn_blocking(move || {
        if let Err(e) = notify_rust::Notification::new()
            .summary(summary)
            .body(body)
            .appname("pomod")
            .show()
        {
            warn!(error = %e, "Failed to send notification");
        }
    });
}
