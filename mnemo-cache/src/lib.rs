//! # mnemo Cache
//!
//! TTL-bounded function-result memoization with defensive clock-jump
//! invalidation.
//!
//! ## Features
//!
//! - **Transparent wrapping**: a [`Memoized`] wrapper has the same calling
//!   convention and result semantics as the function it wraps
//! - **Key resolution**: a user [`KeyResolver`] with a matching arity, or
//!   canonical serialization of the first argument by default
//! - **Absolute TTL**: entries expire at computation time plus the TTL,
//!   never refreshed on access; a zero TTL disables caching
//! - **Clock-jump guard**: an optional per-wrapper background task that
//!   clears the whole cache when the wall clock moves non-monotonically
//! - **Lenient configuration**: bad settings normalize instead of failing
//!
//! ## Example
//!
//! ```rust
//! use mnemo_cache::memoize;
//!
//! let expensive = |(n,): (u64,)| n * n;
//! let memo = memoize(expensive, 5_000);
//!
//! assert_eq!(memo.call((12,)), 144);
//! // Served from cache for the next five seconds
//! assert_eq!(memo.call((12,)), 144);
//! ```
//!
//! With a resolver and the clock-jump guard (requires a tokio runtime):
//!
//! ```rust
//! use mnemo_cache::{memoize_with, CacheKey, GuardConfig, KeyResolver, MemoConfig};
//!
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let lookup = |(user, _verbose): (String, bool)| user.len();
//! let memo = memoize_with(
//!     lookup,
//!     KeyResolver::exact(|(user, _): &(String, bool)| CacheKey::new(user.clone())),
//!     MemoConfig::with_ttl(60_000).with_guard(GuardConfig::default()),
//! );
//!
//! assert_eq!(memo.call(("alice".into(), true)), 5);
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod guard;
mod memo;
mod resolver;
mod store;

pub use config::{GuardConfig, MemoConfig};
pub use guard::ClockJumpGuard;
pub use memo::{
    memoize, memoize_with, try_memoize, try_memoize_with, Memoized, TryMemoized,
};
pub use resolver::{CallArgs, KeyResolver};
pub use store::{CacheStats, EntryStore};

// Re-exported so callers only need one crate in scope for common use
pub use mnemo_core::{CacheKey, Clock, ManualClock, SystemClock};
