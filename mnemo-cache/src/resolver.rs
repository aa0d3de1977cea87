//! Cache-key resolution.
//!
//! A wrapper derives its cache key either from a user-supplied
//! [`KeyResolver`] or, by default, from the canonical serialization of the
//! first positional argument. A resolver only applies when its declared
//! arity matches the wrapped function's arity; a mismatch silently falls
//! back to default derivation. That permissiveness is part of the
//! contract, not a defect.

use serde::Serialize;
use tracing::debug;

use mnemo_core::error::Result;
use mnemo_core::key::{canonical_key, CacheKey};

/// Argument tuple of a memoizable function.
///
/// Implemented for tuples of arity 0 through 4 whose first element is
/// serializable. The first element drives default key derivation.
pub trait CallArgs {
    /// Number of arguments the wrapped function takes.
    const ARITY: usize;

    /// Derives the default cache key from the first positional argument.
    fn default_key(&self) -> Result<CacheKey>;
}

impl CallArgs for () {
    const ARITY: usize = 0;

    fn default_key(&self) -> Result<CacheKey> {
        Ok(CacheKey::undefined())
    }
}

macro_rules! impl_call_args {
    ($arity:expr; $first:ident $(, $rest:ident)*) => {
        impl<$first: Serialize $(, $rest)*> CallArgs for ($first, $($rest,)*) {
            const ARITY: usize = $arity;

            fn default_key(&self) -> Result<CacheKey> {
                canonical_key(&self.0)
            }
        }
    };
}

impl_call_args!(1; A);
impl_call_args!(2; A, B);
impl_call_args!(3; A, B, C);
impl_call_args!(4; A, B, C, D);

/// User-supplied cache-key resolver.
///
/// The resolver receives the exact argument tuple the wrapped function
/// receives and returns the cache key. Its declared arity is compared to
/// the wrapped function's arity at construction.
pub struct KeyResolver<A> {
    arity: usize,
    func: Box<dyn Fn(&A) -> CacheKey + Send + Sync>,
}

impl<A: CallArgs> KeyResolver<A> {
    /// Creates a resolver declaring the given arity.
    pub fn new(arity: usize, func: impl Fn(&A) -> CacheKey + Send + Sync + 'static) -> Self {
        Self {
            arity,
            func: Box::new(func),
        }
    }

    /// Creates a resolver whose declared arity matches the argument tuple.
    pub fn exact(func: impl Fn(&A) -> CacheKey + Send + Sync + 'static) -> Self {
        Self::new(A::ARITY, func)
    }

    /// Returns the declared arity.
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub(crate) fn resolve(&self, args: &A) -> CacheKey {
        (self.func)(args)
    }
}

impl<A> std::fmt::Debug for KeyResolver<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyResolver")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Key-derivation strategy, fixed once at construction.
pub(crate) enum KeyStrategy<A> {
    /// Arity-matched user resolver.
    Resolver(KeyResolver<A>),
    /// Canonical serialization of the first positional argument.
    FirstArg,
}

impl<A: CallArgs> KeyStrategy<A> {
    /// Selects the strategy for an optional resolver.
    ///
    /// A resolver whose declared arity differs from the function's arity is
    /// ignored in favor of default derivation.
    pub(crate) fn select(resolver: Option<KeyResolver<A>>) -> Self {
        match resolver {
            Some(r) if r.arity() == A::ARITY => KeyStrategy::Resolver(r),
            Some(r) => {
                debug!(
                    declared = r.arity(),
                    expected = A::ARITY,
                    "Resolver arity mismatch, using first-argument key"
                );
                KeyStrategy::FirstArg
            }
            None => KeyStrategy::FirstArg,
        }
    }

    pub(crate) fn derive(&self, args: &A) -> Result<CacheKey> {
        match self {
            KeyStrategy::Resolver(r) => Ok(r.resolve(args)),
            KeyStrategy::FirstArg => args.default_key(),
        }
    }
}
