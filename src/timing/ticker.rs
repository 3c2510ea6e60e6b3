//! Fixed-period ticker on the virtual clock.

use std::time::Duration;

/// Recurring tick with at most one pending occurrence.
///
/// `start` on a running ticker is a no-op, so toggling a game between
/// playing and paused can never stack up two ticking processes.
#[derive(Clone, Debug)]
pub struct Ticker {
    interval: Duration,
    next: Option<Duration>,
}

impl Ticker {
    /// Create a stopped ticker.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        assert!(!interval.is_zero(), "Tick interval must be non-zero");
        Self { interval, next: None }
    }

    /// Tick period.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Is a tick pending?
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Start ticking one interval after `now`. No-op if already running.
    ///
    /// Returns true if the ticker was started by this call.
    pub fn start(&mut self, now: Duration) -> bool {
        if self.next.is_some() {
            return false;
        }
        self.next = Some(now + self.interval);
        true
    }

    /// Cancel the pending tick.
    pub fn stop(&mut self) {
        self.next = None;
    }

    /// When the pending tick is due.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.next
    }

    /// Consume the pending tick if it is due at or before `now`, scheduling
    /// the following one a full interval after the consumed due time.
    pub fn fire(&mut self, now: Duration) -> bool {
        match self.next {
            Some(due) if due <= now => {
                self.next = Some(due + self.interval);
                true
            }
            _ => false,
        }
    }
}
