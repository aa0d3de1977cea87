//! Error types for mnemo.
//!
//! The memoization wrapper itself never fails: misconfiguration is
//! normalized, not rejected, and target-function failures propagate to the
//! caller untouched. The only explicit fallible surface left is canonical
//! key serialization.

use thiserror::Error;

/// Result type alias using `MnemoError`.
pub type Result<T> = std::result::Result<T, MnemoError>;

/// Main error type for mnemo operations.
#[derive(Debug, Error)]
pub enum MnemoError {
    /// Canonical serialization of a default cache key failed.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
