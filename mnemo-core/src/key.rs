//! Cache keys and canonical key derivation.
//!
//! Default key derivation serializes the first call argument into a
//! deterministic string, so structurally equal inputs always index the same
//! cache slot. Serialization goes through [`serde_json::Value`], whose
//! object representation keeps map keys sorted; two maps with the same
//! contents produce the same key regardless of insertion order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::UNDEFINED_KEY_SENTINEL;
use crate::error::Result;

/// A derived cache key.
///
/// Keys are canonical strings: totally ordered, hashable, and stable across
/// calls for structurally equal inputs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Wraps an already-canonical string as a key.
    ///
    /// Used by resolvers that compute their own key material.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key for an absent first argument.
    pub fn undefined() -> Self {
        Self(UNDEFINED_KEY_SENTINEL.to_string())
    }

    /// Returns the canonical string form of this key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Derives the canonical cache key for a value.
///
/// The value is structurally serialized: objects and arrays with equal
/// contents yield identical keys, and `()`/`None` yield the fixed
/// undefined-key sentinel.
pub fn canonical_key<T: Serialize>(value: &T) -> Result<CacheKey> {
    // Round-tripping through Value sorts object keys, which plain
    // `to_string` does not guarantee for map-like types.
    let canonical = serde_json::to_value(value)?;
    Ok(CacheKey(canonical.to_string()))
}
