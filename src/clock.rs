//! Time sources for measuring stitch latency.
//!
//! The search controller reads a [`Clock`] immediately before and after each
//! stitching call. [`SystemClock`] is the monotonic wall clock used in
//! production; [`ManualClock`] is advanced by hand so tests can simulate
//! latency without sleeping.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A monotonic time source.
///
/// `now` returns the time elapsed since an arbitrary fixed origin. Only
/// differences between two readings are meaningful.
pub trait Clock {
    /// Current reading of the clock.
    fn now(&self) -> Duration;
}

/// Monotonic wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same reading, so a stub stitcher can hold one clone and
/// advance it while the controller reads another.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use panosweep::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// handle.advance(Duration::from_millis(250));
/// assert_eq!(clock.now(), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    reading: Arc<Mutex<Duration>>,
}

impl ManualClock {
    /// Create a clock reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut reading = self
            .reading
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *reading += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self
            .reading
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
