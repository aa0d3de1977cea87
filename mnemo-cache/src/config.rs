//! Cache and guard configuration.
//!
//! Misconfiguration is never an error: all normalization happens in one
//! place, [`ResolvedConfig::resolve`], executed once at construction. A
//! negative or absent TTL becomes `0`, which disables caching entirely;
//! nonsensical guard timings fall back to the defaults.

use serde::{Deserialize, Serialize};

use mnemo_core::constants::{DEFAULT_GUARD_TICK_MILLIS, DEFAULT_GUARD_TOLERANCE_MILLIS};

/// Memoization configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoConfig {
    /// Time-to-live for cached results, in milliseconds.
    ///
    /// `0` or negative means "never cache": every call passes through to
    /// the wrapped function.
    pub ttl_millis: i64,
    /// Clock-jump guard settings. `None` disables the guard.
    pub guard: Option<GuardConfig>,
}

impl MemoConfig {
    /// Creates a configuration with the given TTL and no guard.
    pub fn with_ttl(ttl_millis: i64) -> Self {
        Self {
            ttl_millis,
            guard: None,
        }
    }

    /// Enables the clock-jump guard with the given settings.
    #[must_use]
    pub fn with_guard(mut self, guard: GuardConfig) -> Self {
        self.guard = Some(guard);
        self
    }
}

/// Clock-jump guard configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Interval between guard ticks, in milliseconds.
    pub tick_millis: i64,
    /// Extra forward slack allowed beyond the tick interval before the
    /// elapsed time counts as a jump, in milliseconds.
    pub tolerance_millis: i64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            tick_millis: DEFAULT_GUARD_TICK_MILLIS,
            tolerance_millis: DEFAULT_GUARD_TOLERANCE_MILLIS,
        }
    }
}

/// Configuration after one-shot normalization.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedConfig {
    pub(crate) ttl_millis: i64,
    pub(crate) guard: Option<GuardConfig>,
}

impl ResolvedConfig {
    /// Normalizes a user configuration. Never fails.
    pub(crate) fn resolve(config: &MemoConfig) -> Self {
        let ttl_millis = config.ttl_millis.max(0);
        let guard = config.guard.as_ref().map(|g| GuardConfig {
            tick_millis: if g.tick_millis > 0 {
                g.tick_millis
            } else {
                DEFAULT_GUARD_TICK_MILLIS
            },
            tolerance_millis: g.tolerance_millis.max(0),
        });
        Self { ttl_millis, guard }
    }

    /// Returns true if results should be written to the store at all.
    pub(crate) fn caching_enabled(&self) -> bool {
        self.ttl_millis > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_disables_caching() {
        let resolved = ResolvedConfig::resolve(&MemoConfig::default());
        assert_eq!(resolved.ttl_millis, 0);
        assert!(!resolved.caching_enabled());
        assert!(resolved.guard.is_none());
    }

    #[test]
    fn test_negative_ttl_normalizes_to_zero() {
        let resolved = ResolvedConfig::resolve(&MemoConfig::with_ttl(-500));
        assert_eq!(resolved.ttl_millis, 0);
        assert!(!resolved.caching_enabled());
    }

    #[test]
    fn test_positive_ttl_enables_caching() {
        let resolved = ResolvedConfig::resolve(&MemoConfig::with_ttl(2_000));
        assert_eq!(resolved.ttl_millis, 2_000);
        assert!(resolved.caching_enabled());
    }

    #[test]
    fn test_guard_defaults() {
        let guard = GuardConfig::default();
        assert_eq!(guard.tick_millis, DEFAULT_GUARD_TICK_MILLIS);
        assert_eq!(guard.tolerance_millis, DEFAULT_GUARD_TOLERANCE_MILLIS);
    }

    #[test]
    fn test_invalid_guard_timings_fall_back() {
        let config = MemoConfig::with_ttl(1_000).with_guard(GuardConfig {
            tick_millis: -10,
            tolerance_millis: -10,
        });
        let resolved = ResolvedConfig::resolve(&config);
        let guard = resolved.guard.unwrap();
        assert_eq!(guard.tick_millis, DEFAULT_GUARD_TICK_MILLIS);
        assert_eq!(guard.tolerance_millis, 0);
    }

    #[test]
    fn test_config_roundtrips_through_serde() {
        let config = MemoConfig::with_ttl(5_000).with_guard(GuardConfig::default());
        let json = serde_json::to_string(&config).unwrap();
        let back: MemoConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ttl_millis, 5_000);
        assert!(back.guard.is_some());
    }
}
