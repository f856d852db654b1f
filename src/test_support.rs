//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use crate::core::relay::{LineSink, LineSource};
use crate::core::state::ShutdownFlag;

/// A source that replays canned lines.
///
/// Once the script runs out it either raises the shutdown flag (like a closed
/// stdin) or, with `hold_open`, waits for somebody else to raise it.
pub struct ScriptedSource {
    lines: VecDeque<String>,
    shutdown: ShutdownFlag,
    hold_open: bool,
    failure: Option<String>,
}

impl ScriptedSource {
    pub fn new<I, L>(lines: I, shutdown: ShutdownFlag) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            shutdown,
            hold_open: false,
            failure: None,
        }
    }

    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    pub fn failing(message: &str) -> Self {
        Self {
            lines: VecDeque::new(),
            shutdown: ShutdownFlag::new(),
            hold_open: false,
            failure: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl LineSource for ScriptedSource {
    async fn next_line(&mut self) -> io::Result<String> {
        if let Some(message) = &self.failure {
            return Err(io::Error::other(message.clone()));
        }
        if let Some(line) = self.lines.pop_front() {
            return Ok(line);
        }
        if self.hold_open {
            self.shutdown.cancelled().await;
        } else {
            self.shutdown.request();
        }
        Ok(String::new())
    }
}

/// A sink that remembers every line it was asked to show.
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
    stop_after: Option<(usize, ShutdownFlag)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            stop_after: None,
        }
    }

    /// Raise `shutdown` once `count` lines have been displayed.
    pub fn stop_after(count: usize, shutdown: ShutdownFlag) -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            stop_after: Some((count, shutdown)),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LineSink for RecordingSink {
    fn display(&self, line: &str) -> io::Result<()> {
        let mut lines = self.lines.lock().unwrap();
        lines.push(line.to_string());
        if let Some((count, shutdown)) = &self.stop_after
            && lines.len() >= *count
        {
            shutdown.request();
        }
        Ok(())
    }
}
