/// Monotonic time source.
///
/// Anything that asks "how long since X" (the serve countdown, the match
/// timer, blinking glyphs) reads it through a `Clock`, so tests can step
/// time by hand instead of sleeping.

use std::cell::Cell;
use std::time::{Duration, Instant};

pub trait Clock {
    /// Time since the clock was created.
    fn now(&self) -> Duration;
    /// Block for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Wall-clock time backed by `Instant`.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
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

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A clock that only moves when told to.  `sleep` advances it instantly.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
    slept: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Total time spent in `sleep`.
    pub fn slept(&self) -> Duration {
        self.slept.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.slept.set(self.slept.get() + duration);
        self.advance(duration);
    }
}
