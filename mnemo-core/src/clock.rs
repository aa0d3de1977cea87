//! Injectable wall-clock abstraction.
//!
//! Expiry timestamps are absolute wall-clock milliseconds, so every time
//! read in the cache goes through [`Clock`]. Production code uses
//! [`SystemClock`]; tests use [`ManualClock`] to pin and advance time
//! deterministically, including moving it backward to exercise the
//! clock-jump guard.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;

/// Source of wall-clock time in milliseconds since the Unix epoch.
///
/// Implementations must be cheap to call; the cache reads the clock on
/// every lookup and insert.
pub trait Clock: Send + Sync {
    /// Returns the current wall-clock time in milliseconds since epoch.
    fn now_millis(&self) -> i64;
}

/// Production clock backed by the system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for deterministic tests.
///
/// Cloning shares the underlying time, so a clone handed to a cache and a
/// clone kept by the test observe the same instants.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<i64>>,
}

impl ManualClock {
    /// Creates a manual clock starting at the given epoch-millisecond value.
    pub fn starting_at(millis: i64) -> Self {
        Self {
            now: Arc::new(Mutex::new(millis)),
        }
    }

    /// Sets the clock to an absolute epoch-millisecond value.
    ///
    /// The value may be earlier than the current one; that is how tests
    /// simulate a backward clock jump.
    pub fn set(&self, millis: i64) {
        *self.now.lock() = millis;
    }

    /// Advances the clock by the given number of milliseconds.
    pub fn advance(&self, millis: i64) {
        *self.now.lock() += millis;
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        *self.now.lock()
    }
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualClock")
            .field("now", &*self.now.lock())
            .finish()
    }
}
