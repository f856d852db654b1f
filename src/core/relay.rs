//! # Relay
//!
//! The producer/consumer pair that moves typed lines back onto the screen.
//!
//! ```text
//! LineSource ──next_line()──▶ input_loop ──mpsc──▶ display_loop ──display()──▶ LineSink
//! ```
//!
//! Both loops stop only by observing the `ShutdownFlag`. The queue is a tokio
//! unbounded channel, so ordering is FIFO and nothing is lost or duplicated.

use async_trait::async_trait;
use log::{debug, info, warn};
use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::mpsc::error::TryRecvError;

use crate::core::state::ShutdownFlag;

/// Where completed input lines come from.
#[async_trait]
pub trait LineSource: Send {
    /// Wait for the next line. An empty string means "nothing to send"
    /// (empty Enter, or input abandoned on shutdown).
    async fn next_line(&mut self) -> io::Result<String>;
}

/// Where dequeued lines are shown.
pub trait LineSink: Send + Sync {
    fn display(&self, line: &str) -> io::Result<()>;
}

/// Reads lines and enqueues the non-empty ones until shutdown.
pub async fn input_loop<S: LineSource>(
    mut source: S,
    queue: UnboundedSender<String>,
    shutdown: ShutdownFlag,
) -> io::Result<()> {
    while !shutdown.is_requested() {
        let line = source.next_line().await?;
        if line.is_empty() {
            continue;
        }
        debug!("Enqueueing line ({} bytes)", line.len());
        if queue.send(line).is_err() {
            warn!("Pending queue closed; input loop stopping");
            break;
        }
    }
    info!("Input loop finished");
    Ok(())
}

/// Drains the queue into the sink, pausing for `interval` when idle.
pub async fn display_loop<K: LineSink + ?Sized>(
    sink: Arc<K>,
    mut queue: UnboundedReceiver<String>,
    shutdown: ShutdownFlag,
    interval: Duration,
) -> io::Result<()> {
    while !shutdown.is_requested() {
        let mut drained = 0usize;
        loop {
            match queue.try_recv() {
                Ok(line) => {
                    sink.display(&line)?;
                    drained += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        if drained > 0 {
            debug!("Displayed {} queued line(s)", drained);
            continue;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.cancelled() => {}
        }
    }
    info!("Display loop finished");
    Ok(())
}

/// One or more loops ended with an error or a panic.
#[derive(Debug)]
pub struct LoopFailure {
    pub failures: Vec<String>,
}

impl fmt::Display for LoopFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "One or more errors occurred. ({})", self.failures.join(") ("))
    }
}

impl std::error::Error for LoopFailure {}

/// Runs both loops as independent tasks and waits for them.
///
/// A failing loop raises the shutdown flag so its partner does not keep
/// running alone.
pub async fn run_loops<S, K>(
    source: S,
    sink: Arc<K>,
    shutdown: ShutdownFlag,
    interval: Duration,
) -> Result<(), LoopFailure>
where
    S: LineSource + 'static,
    K: LineSink + ?Sized + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    let input = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            let result = input_loop(source, tx, shutdown.clone()).await;
            if result.is_err() {
                shutdown.request();
            }
            result
        })
    };
    let display = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            let result = display_loop(sink, rx, shutdown.clone(), interval).await;
            if result.is_err() {
                shutdown.request();
            }
            result
        })
    };

    let (input, display) = tokio::join!(input, display);

    let mut failures = Vec::new();
    for (name, outcome) in [("input loop", input), ("display loop", display)] {
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!("{} failed: {}", name, e);
                failures.push(format!("{name}: {e}"));
            }
            Err(e) => {
                warn!("{} panicked or was cancelled: {}", name, e);
                failures.push(format!("{name}: {e}"));
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(LoopFailure { failures })
    }
}
