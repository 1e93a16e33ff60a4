//! # Outbound Ports
//!
//! The clock. Every operation reads it exactly once, so cooldown checks and
//! permit deadlines are deterministic under a manual source.

use shared_types::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic non-decreasing clock in seconds.
pub trait TimeSource: Send + Sync {
    /// Current time in seconds.
    fn now(&self) -> Timestamp;
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Box<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Wall clock (unix seconds), clamped so it never goes backwards.
#[derive(Debug, Default)]
pub struct SystemTimeSource {
    high_water: AtomicU64,
}

impl SystemTimeSource {
    /// Creates a clock that never reports less than `floor`.
    ///
    /// Seed it with the last timestamp persisted in state so a restarted
    /// process cannot move time backwards either.
    pub fn with_floor(floor: Timestamp) -> Self {
        Self {
            high_water: AtomicU64::new(floor),
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        let wall = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let previous = self.high_water.fetch_max(wall, Ordering::SeqCst);
        previous.max(wall)
    }
}

/// Manually driven clock for tests and replay tooling.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    time: AtomicU64,
}

impl ManualTimeSource {
    /// Starts at `initial`.
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: AtomicU64::new(initial),
        }
    }

    /// Moves forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.time.fetch_add(secs, Ordering::SeqCst);
    }

    /// Jumps to `time`; earlier values are ignored.
    pub fn set(&self, time: Timestamp) {
        self.time.fetch_max(time, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(Ordering::SeqCst)
    }
}
