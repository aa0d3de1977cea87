//! Defaults and sentinels for the mnemo cache.
//!
//! The guard timings match the reference behavior: a check every 10 seconds
//! with a 5 second buffer for scheduling delay before a forward movement of
//! the wall clock counts as a jump.

// ═══════════════════════════════════════════════════════════════════════════════
// CLOCK-JUMP GUARD TIMINGS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default interval between clock-jump checks, in milliseconds.
pub const DEFAULT_GUARD_TICK_MILLIS: i64 = 10_000;

/// Default tolerance added to the tick interval before a forward clock
/// movement is treated as a jump, in milliseconds.
///
/// A tick observed more than `tick + tolerance` after the previous one
/// means the wall clock moved further than scheduling jitter can explain.
pub const DEFAULT_GUARD_TOLERANCE_MILLIS: i64 = 5_000;

// ═══════════════════════════════════════════════════════════════════════════════
// KEY DERIVATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Canonical key string produced for an absent first argument.
///
/// Unit and `None` both canonicalize to JSON `null`; using the same fixed
/// sentinel everywhere keeps "no argument" a single, consistent cache key.
pub const UNDEFINED_KEY_SENTINEL: &str = "null";
