//! Deferred saves for free-text edits.
//!
//! Typing into a description or the notes should not write the board on every
//! keystroke. Each edit (re)schedules a single pending save `delay` in the future;
//! scheduling again replaces the pending one, so only the last edit in a burst is
//! written. The caller's event loop asks [`SaveScheduler::due`] when it gets a
//! chance, and flushes with [`SaveScheduler::take`] before shutting down.
//!
//! Time is always passed in, which keeps this deterministic under test.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SaveScheduler {
    delay: Duration,
    pending: Option<Instant>,
}

impl SaveScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels any pending save and schedules a fresh one at `now + delay`.
    pub fn schedule(&mut self, now: Instant) {
        self.pending = Some(now + self.delay);
    }

    /// Discards the pending save. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }

    /// True once the pending save's time has come; consumes it.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(at) if now >= at => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Consumes the pending save regardless of time.
    pub fn take(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
