//! Tick pacing.
//!
//! Each tick measures the time since the previous tick and asks for the
//! next one after `max(min_delay, target - elapsed)`. A slow tick is paid
//! back by a short gap after it, which keeps the long-run rate close to
//! the target.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of "now" for the scheduler.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock; clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Drift-correcting delay calculator.
#[derive(Debug, Clone)]
pub struct Ticker {
    target: Duration,
    min_delay: Duration,
    last_tick: Instant,
}

impl Ticker {
    pub fn new(target: Duration, min_delay: Duration, start: Instant) -> Self {
        Self {
            target,
            min_delay,
            last_tick: start,
        }
    }

    /// Desired time between displayed frames.
    pub fn target(&self) -> Duration {
        self.target
    }

    pub fn last_tick(&self) -> Instant {
        self.last_tick
    }

    /// Record a tick at `now` and return the delay before the next one.
    pub fn reschedule(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.target.saturating_sub(elapsed).max(self.min_delay)
    }
}
