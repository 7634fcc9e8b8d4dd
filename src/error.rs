//! Errors surfaced by table construction and configuration.
//!
//! Membership operations never fail: duplicates, misses and missing removals
//! are reported through their boolean return values.

use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The second-hash constant `R` must be strictly positive.
    #[error("invalid stride constant {0}: must be greater than zero")]
    InvalidStride(i64),

    /// No prime slot count at or above the request fits in `usize`.
    #[error("capacity overflow: no prime capacity >= {requested}")]
    CapacityOverflow { requested: usize },

    /// The backing store could not be allocated.
    #[error("backing store allocation failed: {0}")]
    AllocationFailed(#[from] TryReserveError),
}
