//! Error types for the advertizer library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned by fallible constructors when a parameter is
//!   out of range (e.g. `max_advertisements == 0`).
//! - [`InvariantError`]: Returned by the debug-only `check_invariants`
//!   methods when the heap and its index disagree.
//!
//! Absence ("nothing to advertize", "unknown id") is never an error; those
//! operations return `Option`.
//!
//! ## Example Usage
//!
//! ```
//! use advertizer::error::ConfigError;
//! use advertizer::policy::advertizer::Advertizer;
//!
//! let ok: Result<Advertizer<u64, &str>, ConfigError> = Advertizer::try_new(3);
//! assert!(ok.is_ok());
//!
//! // Zero advertisements per item is rejected without panicking
//! let bad = Advertizer::<u64, &str>::try_new(0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal heap/index invariants are violated.
///
/// Produced by debug-only `check_invariants` methods such as
/// [`IndexedMinHeap::check_invariants`](crate::ds::IndexedMinHeap::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when construction parameters are invalid.
///
/// Produced by [`Advertizer::try_new`](crate::policy::advertizer::Advertizer::try_new)
/// and [`Advertizer::try_with_capacity`](crate::policy::advertizer::Advertizer::try_with_capacity).
///
/// # Example
///
/// ```
/// use advertizer::policy::advertizer::Advertizer;
///
/// let err = Advertizer::<u64, u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("max_advertisements"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
