//! Wall-clock time abstraction for expiry and freshness logic.
//!
//! All `DiscoveryEntry` timestamps (`lastSeenDateMs`, `expiryDateMs`) are
//! plain milliseconds since the Unix epoch. Every place the directory reads
//! "now" goes through [`ClockSource`] rather than calling `SystemTime::now()`
//! directly, so tests can inject a virtual clock and assert exact expiry and
//! touch behavior deterministically.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Abstraction over the system clock for dependency injection.
pub trait ClockSource: Send + Sync {
    /// Returns the current time as milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Default clock source backed by `std::time::SystemTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is before Unix epoch")
            .as_millis() as i64
    }
}

/// Virtual clock for deterministic tests: starts at a fixed value and only
/// moves when [`VirtualClock::advance`] is called.
///
/// Not test-gated so downstream crates can build integration tests against
/// it without a `dev-dependency` cycle back into `lcd-core`.
#[derive(Debug, Default)]
pub struct VirtualClock(AtomicI64);

impl VirtualClock {
    #[must_use]
    pub fn new(start_ms: i64) -> Self {
        Self(AtomicI64::new(start_ms))
    }

    pub fn advance(&self, delta_ms: i64) {
        self.0.fetch_add(delta_ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: i64) {
        self.0.store(ms, Ordering::SeqCst);
    }
}

impl ClockSource for VirtualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}
