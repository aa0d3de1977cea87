//! The memoized wrapper and `memoize` factory.
//!
//! A [`Memoized`] wraps a target function and serves TTL-bounded cached
//! results. Every call derives a cache key, checks the store, and on a
//! miss or expired entry invokes the target and writes the fresh result
//! back with a new absolute expiry. The wrapper introduces no failure
//! modes of its own: bad configuration is normalized at construction and
//! an underivable default key downgrades the call to a plain pass-through.

use std::sync::Arc;

use tracing::warn;

use mnemo_core::clock::{Clock, SystemClock};
use mnemo_core::key::CacheKey;

use crate::config::{MemoConfig, ResolvedConfig};
use crate::guard::ClockJumpGuard;
use crate::resolver::{CallArgs, KeyResolver, KeyStrategy};
use crate::store::{CacheStats, EntryStore};

/// Shared state behind both wrapper flavors: resolved configuration, key
/// strategy, the entry store, the clock, and the optional running guard.
struct MemoState<A, R> {
    strategy: KeyStrategy<A>,
    config: ResolvedConfig,
    store: Arc<EntryStore<R>>,
    clock: Arc<dyn Clock>,
    _guard: Option<ClockJumpGuard>,
}

impl<A, R> MemoState<A, R>
where
    A: CallArgs,
    R: Clone + Send + Sync + 'static,
{
    fn build(
        resolver: Option<KeyResolver<A>>,
        config: &MemoConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let resolved = ResolvedConfig::resolve(config);
        let store = Arc::new(EntryStore::new());
        let guard = resolved
            .guard
            .clone()
            .and_then(|g| ClockJumpGuard::spawn(g, Arc::clone(&store), Arc::clone(&clock)));

        Self {
            strategy: KeyStrategy::select(resolver),
            config: resolved,
            store,
            clock,
            _guard: guard,
        }
    }

    /// Derives the cache key for a call. A derivation failure downgrades
    /// the call to uncached pass-through instead of surfacing an error.
    fn derive_key(&self, args: &A) -> Option<CacheKey> {
        match self.strategy.derive(args) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(error = %e, "Key derivation failed, call will not be cached");
                None
            }
        }
    }

    fn lookup(&self, key: Option<&CacheKey>) -> Option<R> {
        let key = key?;
        self.store.get_valid(key, self.clock.now_millis())
    }

    /// Writes a fresh result iff caching is enabled and a key was derived.
    /// Expiry is absolute: computation time plus the configured TTL.
    fn store_result(&self, key: Option<CacheKey>, value: &R) {
        if !self.config.caching_enabled() {
            return;
        }
        if let Some(key) = key {
            let expires_at = self.clock.now_millis() + self.config.ttl_millis;
            self.store.insert(key, value.clone(), expires_at);
        }
    }
}

/// A memoized function wrapper.
///
/// Created by [`memoize`], [`memoize_with`], or the constructors below.
/// Call it through [`Memoized::call`] with the argument tuple the wrapped
/// function takes.
pub struct Memoized<A, R, F> {
    func: F,
    state: MemoState<A, R>,
}

impl<A, R, F> Memoized<A, R, F>
where
    A: CallArgs,
    R: Clone + Send + Sync + 'static,
    F: Fn(A) -> R,
{
    /// Wraps `func` with the given optional resolver and configuration,
    /// using the system wall clock.
    pub fn new(func: F, resolver: Option<KeyResolver<A>>, config: MemoConfig) -> Self {
        Self::with_clock(func, resolver, config, Arc::new(SystemClock::new()))
    }

    /// Wraps `func` with an injected clock. Test seam; production code
    /// uses [`Memoized::new`].
    pub fn with_clock(
        func: F,
        resolver: Option<KeyResolver<A>>,
        config: MemoConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            func,
            state: MemoState::build(resolver, &config, clock),
        }
    }

    /// Invokes the wrapped function through the cache.
    ///
    /// A valid cached entry is returned without invoking the target and
    /// without refreshing its expiry. On a miss or expired entry the
    /// target runs with the original arguments and its result is cached
    /// for the next TTL window (when caching is enabled).
    pub fn call(&self, args: A) -> R {
        let key = self.state.derive_key(&args);
        if let Some(hit) = self.state.lookup(key.as_ref()) {
            return hit;
        }
        let result = (self.func)(args);
        self.state.store_result(key, &result);
        result
    }

    /// Removes the cached entry for a key, if present.
    ///
    /// The next call deriving that key re-invokes the target.
    pub fn remove(&self, key: &CacheKey) {
        self.state.store.remove(key);
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.state.store.clear();
    }

    /// Number of stored entries, including not-yet-dropped expired ones.
    pub fn len(&self) -> usize {
        self.state.store.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.state.store.is_empty()
    }

    /// Returns store statistics as of the current clock reading.
    pub fn stats(&self) -> CacheStats {
        self.state.store.stats(self.state.clock.now_millis())
    }
}

/// A memoized wrapper around a fallible function.
///
/// An `Err` from the target propagates to the caller, caches nothing, and
/// leaves any previously cached entry exactly as it was.
pub struct TryMemoized<A, R, E, F> {
    func: F,
    state: MemoState<A, R>,
    _marker: std::marker::PhantomData<fn() -> E>,
}

impl<A, R, E, F> TryMemoized<A, R, E, F>
where
    A: CallArgs,
    R: Clone + Send + Sync + 'static,
    F: Fn(A) -> Result<R, E>,
{
    /// Wraps a fallible `func`, using the system wall clock.
    pub fn new(func: F, resolver: Option<KeyResolver<A>>, config: MemoConfig) -> Self {
        Self::with_clock(func, resolver, config, Arc::new(SystemClock::new()))
    }

    /// Wraps a fallible `func` with an injected clock.
    pub fn with_clock(
        func: F,
        resolver: Option<KeyResolver<A>>,
        config: MemoConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            func,
            state: MemoState::build(resolver, &config, clock),
            _marker: std::marker::PhantomData,
        }
    }

    /// Invokes the wrapped fallible function through the cache.
    ///
    /// Only `Ok` results are cached; failures surface unchanged.
    pub fn try_call(&self, args: A) -> Result<R, E> {
        let key = self.state.derive_key(&args);
        if let Some(hit) = self.state.lookup(key.as_ref()) {
            return Ok(hit);
        }
        let result = (self.func)(args)?;
        self.state.store_result(key, &result);
        Ok(result)
    }

    /// Removes the cached entry for a key, if present.
    ///
    /// The next call deriving that key re-invokes the target.
    pub fn remove(&self, key: &CacheKey) {
        self.state.store.remove(key);
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.state.store.clear();
    }

    /// Number of stored entries, including not-yet-dropped expired ones.
    pub fn len(&self) -> usize {
        self.state.store.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.state.store.is_empty()
    }

    /// Returns store statistics as of the current clock reading.
    pub fn stats(&self) -> CacheStats {
        self.state.store.stats(self.state.clock.now_millis())
    }
}

/// Memoizes `func` with default key derivation and the given TTL.
///
/// The cache key is the canonical serialization of the first positional
/// argument. A TTL of `0` (or negative) disables caching.
pub fn memoize<A, R, F>(func: F, ttl_millis: i64) -> Memoized<A, R, F>
where
    A: CallArgs,
    R: Clone + Send + Sync + 'static,
    F: Fn(A) -> R,
{
    Memoized::new(func, None, MemoConfig::with_ttl(ttl_millis))
}

/// Memoizes `func` with a user resolver and full configuration.
///
/// The resolver applies only when its declared arity matches the
/// function's arity; otherwise key derivation silently falls back to the
/// first positional argument.
pub fn memoize_with<A, R, F>(
    func: F,
    resolver: KeyResolver<A>,
    config: MemoConfig,
) -> Memoized<A, R, F>
where
    A: CallArgs,
    R: Clone + Send + Sync + 'static,
    F: Fn(A) -> R,
{
    Memoized::new(func, Some(resolver), config)
}

/// Memoizes a fallible `func` with default key derivation.
pub fn try_memoize<A, R, E, F>(func: F, ttl_millis: i64) -> TryMemoized<A, R, E, F>
where
    A: CallArgs,
    R: Clone + Send + Sync + 'static,
    F: Fn(A) -> Result<R, E>,
{
    TryMemoized::new(func, None, MemoConfig::with_ttl(ttl_millis))
}

/// Memoizes a fallible `func` with a user resolver and full configuration.
pub fn try_memoize_with<A, R, E, F>(
    func: F,
    resolver: KeyResolver<A>,
    config: MemoConfig,
) -> TryMemoized<A, R, E, F>
where
    A: CallArgs,
    R: Clone + Send + Sync + 'static,
    F: Fn(A) -> Result<R, E>,
{
    TryMemoized::new(func, Some(resolver), config)
}
