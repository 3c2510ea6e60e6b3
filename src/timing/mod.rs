//! Timers: virtual clock, one-second ticker, delayed tasks.
//!
//! The game is single-threaded and event driven. Instead of spawning timers
//! the session keeps a virtual clock that the host advances; ticks and
//! delayed tasks fire in chronological order during `GameSession::advance`.
//!
//! Delayed tasks carry the session generation they were scheduled under, so
//! a task outliving its attempt (the player restarted or went home) is
//! recognised as stale and dropped instead of touching the newer session.

pub mod clock;
pub mod deferred;
pub mod ticker;

pub use clock::VirtualClock;
pub use deferred::{Deferred, DeferredQueue};
pub use ticker::Ticker;
