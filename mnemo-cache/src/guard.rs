//! Clock-jump guard.
//!
//! Expiry timestamps are absolute wall-clock values, so they are
//! meaningless after a wall-clock discontinuity. The guard ticks at a
//! fixed interval, measures the wall-clock time elapsed since its previous
//! tick, and clears the whole store when the clock moved backward or
//! further forward than the tick interval plus a jitter tolerance. It is a
//! per-wrapper task, stopped when the wrapper is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use mnemo_core::clock::Clock;

use crate::config::GuardConfig;
use crate::store::EntryStore;

/// Detects wall-clock discontinuities between guard ticks.
#[derive(Debug)]
pub(crate) struct JumpDetector {
    last_observed: i64,
    tick_millis: i64,
    tolerance_millis: i64,
}

impl JumpDetector {
    pub(crate) fn new(config: &GuardConfig, now: i64) -> Self {
        Self {
            last_observed: now,
            tick_millis: config.tick_millis,
            tolerance_millis: config.tolerance_millis,
        }
    }

    /// Records a tick at `now` and returns true if the elapsed time since
    /// the previous tick indicates a clock jump.
    ///
    /// Backward movement is always a jump. Forward movement is a jump only
    /// beyond `tick + tolerance`; anything less is ordinary scheduling
    /// delay.
    pub(crate) fn observe(&mut self, now: i64) -> bool {
        let elapsed = now - self.last_observed;
        self.last_observed = now;
        elapsed < 0 || elapsed > self.tick_millis + self.tolerance_millis
    }
}

/// Handle to a running clock-jump guard task.
///
/// Dropping the handle aborts the task, so the guard never outlives the
/// wrapper that spawned it.
#[derive(Debug)]
pub struct ClockJumpGuard {
    handle: JoinHandle<()>,
}

impl ClockJumpGuard {
    /// Spawns the guard on the current tokio runtime.
    ///
    /// Outside a runtime the guard is skipped with a warning rather than
    /// panicking; the cache itself keeps working without it.
    pub(crate) fn spawn<V>(
        config: GuardConfig,
        store: Arc<EntryStore<V>>,
        clock: Arc<dyn Clock>,
    ) -> Option<Self>
    where
        V: Clone + Send + Sync + 'static,
    {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No tokio runtime, clock-jump guard disabled");
                return None;
            }
        };

        let mut detector = JumpDetector::new(&config, clock.now_millis());
        let tick = Duration::from_millis(config.tick_millis as u64);

        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of an interval completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let now = clock.now_millis();
                if detector.observe(now) {
                    warn!(now, "Wall clock jumped, invalidating cache");
                    store.clear();
                } else {
                    debug!(now, "Guard tick");
                }
            }
        });

        Some(Self { handle })
    }
}

impl Drop for ClockJumpGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_core::constants::{DEFAULT_GUARD_TICK_MILLIS, DEFAULT_GUARD_TOLERANCE_MILLIS};

    fn detector_at(now: i64) -> JumpDetector {
        JumpDetector::new(&GuardConfig::default(), now)
    }

    #[test]
    fn test_normal_tick_is_not_a_jump() {
        let mut detector = detector_at(1_000_000);
        assert!(!detector.observe(1_000_000 + DEFAULT_GUARD_TICK_MILLIS));
    }

    #[test]
    fn test_backward_movement_is_a_jump() {
        let mut detector = detector_at(1_000_000);
        assert!(detector.observe(999_999));
    }

    #[test]
    fn test_forward_jump_beyond_tolerance() {
        let mut detector = detector_at(1_000_000);
        let limit = DEFAULT_GUARD_TICK_MILLIS + DEFAULT_GUARD_TOLERANCE_MILLIS;
        assert!(detector.observe(1_000_000 + limit + 1));
    }

    #[test]
    fn test_forward_movement_within_tolerance() {
        let mut detector = detector_at(1_000_000);
        let limit = DEFAULT_GUARD_TICK_MILLIS + DEFAULT_GUARD_TOLERANCE_MILLIS;
        // Exactly at the limit counts as scheduling delay, not a jump
        assert!(!detector.observe(1_000_000 + limit));
    }

    #[test]
    fn test_zero_elapsed_is_not_a_jump() {
        let mut detector = detector_at(1_000_000);
        assert!(!detector.observe(1_000_000));
    }

    #[test]
    fn test_last_observed_updates_every_tick() {
        let mut detector = detector_at(0);

        // A single backward discontinuity fires once, then ticks settle
        assert!(detector.observe(-50_000));
        assert!(!detector.observe(-50_000 + DEFAULT_GUARD_TICK_MILLIS));
    }
}
