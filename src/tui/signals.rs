//! Platform shutdown sources.
//!
//! Turns the operating system's "please stop" events into calls to a
//! trigger closure. In raw mode Ctrl+C reaches us as a key press instead
//! (see `event::KeyInput::Interrupt`), so this mainly catches signals sent
//! from outside: `kill -INT`, terminal close (SIGHUP) and SIGTERM.

use log::{info, warn};
use tokio::task::JoinHandle;

/// Spawn a task that calls `trigger` once per received shutdown signal.
///
/// The task runs until aborted.
pub fn spawn_listener<F>(trigger: F) -> JoinHandle<()>
where
    F: Fn() + Send + Sync + 'static,
{
    tokio::spawn(async move {
        loop {
            match next_signal().await {
                Ok(name) => {
                    info!("Received {}", name);
                    trigger();
                }
                Err(e) => {
                    warn!("Signal listener failed: {}", e);
                    return;
                }
            }
        }
    })
}

#[cfg(unix)]
async fn next_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
        _ = hangup.recv() => Ok("SIGHUP"),
    }
}

#[cfg(not(unix))]
async fn next_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|()| "Ctrl+C")
}
