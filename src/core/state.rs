//! # Shared State
//!
//! The two pieces of state every part of the console touches:
//!
//! ```text
//! ScrollBuffer                      // bounded, bottom-anchored log lines
//! ├── lines: VecDeque<String>       // oldest first
//! └── capacity: usize               // never exceeded
//!
//! ShutdownFlag                      // cloneable handle
//! └── tx: watch::Sender<bool>       // false until the first request
//! ```
//!
//! Neither type knows anything about terminals. The display surface owns the
//! buffer; the flag is cloned into every loop that has to stop.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::watch;

/// Append-only list of displayed lines with FIFO eviction.
#[derive(Debug, Clone)]
pub struct ScrollBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl ScrollBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a line, evicting the oldest one when full.
    ///
    /// Returns the evicted line, if any. With a capacity of zero the pushed
    /// line itself is handed straight back.
    pub fn push(&mut self, line: impl Into<String>) -> Option<String> {
        let line = line.into();
        if self.capacity == 0 {
            return Some(line);
        }
        let evicted = if self.lines.len() == self.capacity {
            self.lines.pop_front()
        } else {
            None
        };
        self.lines.push_back(line);
        evicted
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Row of the first line when the buffer is drawn bottom-anchored in a
    /// pane of `pane_height` rows.
    pub fn first_row(&self, pane_height: u16) -> u16 {
        let len = u16::try_from(self.lines.len()).unwrap_or(u16::MAX);
        pane_height.saturating_sub(len)
    }
}

/// Process-wide "please stop" signal.
///
/// Set at most once; every later request is a no-op. Waiters are woken
/// through a watch channel, so nobody has to spin on the flag.
#[derive(Debug, Clone)]
pub struct ShutdownFlag {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Raise the flag. Returns `true` only for the request that flipped it.
    pub fn request(&self) -> bool {
        self.tx.send_if_modified(|requested| {
            if *requested {
                false
            } else {
                *requested = true;
                true
            }
        })
    }

    pub fn is_requested(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the flag is raised (immediately if it already is).
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|requested| *requested).await;
    }
}

impl Default for ShutdownFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_evicts_oldest_when_full() {
        let mut buffer = ScrollBuffer::new(3);
        assert_eq!(buffer.push("a"), None);
        assert_eq!(buffer.push("b"), None);
        assert_eq!(buffer.push("c"), None);
        assert_eq!(buffer.push("d"), Some("a".to_string()));
        assert_eq!(buffer.iter().collect::<Vec<_>>(), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_buffer_never_exceeds_capacity() {
        let mut buffer = ScrollBuffer::new(5);
        for i in 0..50 {
            let evicted = buffer.push(format!("line {i}"));
            assert!(buffer.len() <= buffer.capacity());
            if i >= 5 {
                assert_eq!(evicted, Some(format!("line {}", i - 5)));
            } else {
                assert_eq!(evicted, None);
            }
        }
        assert_eq!(buffer.iter().next(), Some("line 45"));
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut buffer = ScrollBuffer::new(0);
        assert_eq!(buffer.push("x"), Some("x".to_string()));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_first_row_is_bottom_anchored() {
        let mut buffer = ScrollBuffer::new(10);
        assert_eq!(buffer.first_row(10), 10);
        buffer.push("one");
        buffer.push("two");
        assert_eq!(buffer.first_row(10), 8);
    }

    #[test]
    fn test_shutdown_request_is_idempotent() {
        let flag = ShutdownFlag::new();
        assert!(!flag.is_requested());
        assert!(flag.request());
        assert!(!flag.request());
        assert!(!flag.request());
        assert!(flag.is_requested());
    }

    #[test]
    fn test_shutdown_clones_share_state() {
        let flag = ShutdownFlag::new();
        let other = flag.clone();
        other.request();
        assert!(flag.is_requested());
    }

    #[tokio::test]
    async fn test_cancelled_wakes_waiter() {
        let flag = ShutdownFlag::new();
        let waiter = {
            let flag = flag.clone();
            tokio::spawn(async move { flag.cancelled().await })
        };
        tokio::task::yield_now().await;
        flag.request();
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_returns_when_already_set() {
        let flag = ShutdownFlag::new();
        flag.request();
        flag.cancelled().await;
    }

    #[test]
    fn test_cancelled_stays_pending_until_requested() {
        let flag = ShutdownFlag::new();
        let mut wait = tokio_test::task::spawn(flag.cancelled());
        tokio_test::assert_pending!(wait.poll());
        flag.request();
        assert!(wait.is_woken());
        tokio_test::assert_ready!(wait.poll());
    }
}
