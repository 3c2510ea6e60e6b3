//! Host-driven virtual clock.

use std::time::Duration;

/// Monotonic virtual time since the session was created.
///
/// The host advances it from its own frame loop or timer; nothing in the
/// crate reads wall-clock time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VirtualClock {
    now: Duration,
}

impl VirtualClock {
    /// A clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward to `at`. Earlier instants are ignored.
    pub fn advance_to(&mut self, at: Duration) {
        self.now = self.now.max(at);
    }
}
