//! # mnemo Core
//!
//! Core types, errors, and the clock abstraction for the mnemo memoization cache.
//!
//! This crate provides the foundational building blocks used by `mnemo-cache`:
//!
//! - **Keys**: The canonical [`CacheKey`] type and structural key derivation
//! - **Errors**: Error types with context
//! - **Constants**: Default guard timings and the undefined-key sentinel
//! - **Clock**: An injectable wall-clock interface for deterministic tests
//!
//! ## Example
//!
//! ```rust
//! use mnemo_core::canonical_key;
//!
//! // Structurally equal values derive identical keys
//! let a = canonical_key(&("user", 42)).unwrap();
//! let b = canonical_key(&("user", 42)).unwrap();
//! assert_eq!(a, b);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod clock;
pub mod constants;
pub mod error;
pub mod key;

// Re-export commonly used items at crate root
pub use clock::{Clock, ManualClock, SystemClock};
pub use constants::*;
pub use error::{MnemoError, Result};
pub use key::{canonical_key, CacheKey};
