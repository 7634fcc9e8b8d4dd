//! double-hash-table: an open-addressing hash set that resolves collisions
//! with double hashing and deletes lazily through tombstones.
//!
//! Internal Design:
//!
//! Summary
//! - One contiguous backing store of `Slot`s, each `Empty`, `Active(x)` or
//!   `Deleted(x)`. The store size is always prime.
//! - Every operation funnels through a single probe routine: start at
//!   `hash(x) mod capacity`, step by `R - (hash(x) mod R)`, stop at an
//!   `Empty` slot or at a slot holding an element equal to `x`.
//! - `insert`, `contains` and `remove` are thin wrappers over that probe
//!   plus their own bookkeeping.
//!
//! Constraints
//! - Single-threaded: the collision counter lives in a `Cell`, so the
//!   table is `!Sync`. Share it across threads only behind external
//!   synchronization.
//! - Load factor: the element count never exceeds `capacity / 2` once an
//!   insert returns. Crossing it grows the store to
//!   `next_prime(2 * capacity)` and re-inserts the live elements.
//! - No shrink path, no tombstone compaction outside a rehash, no
//!   iteration API.
//!
//! Tombstones
//! - Removing a slot would cut the probe chains of elements that were
//!   placed past it, so `remove` turns `Active(x)` into `Deleted(x)`.
//! - A tombstone for a different element never ends a probe and never
//!   reports as present. Inserts land where the probe ends: re-inserting a
//!   removed element revives its own tombstone, anything else takes the
//!   `Empty` slot that stopped the probe.
//!
//! Stride guard
//! - A stride that is a multiple of the capacity would never leave the
//!   home slot; it is replaced by 1. With a prime capacity every other
//!   stride visits every slot, so probes always terminate.
//! - `R <= 0` is rejected with [`TableError::InvalidStride`].
//!
//! Removal accounting
//! - [`RemovalPolicy::Legacy`] (default): `remove` does not decrement
//!   `len()`; tombstoned elements keep counting toward the load until the
//!   next rehash recounts the live ones.
//! - [`RemovalPolicy::Decrement`]: `remove` decrements `len()` and growth
//!   is driven by live elements plus tombstones.
//!
//! Element contract
//! - `T: Eq + Hash` with equal elements hashing identically. Breaking this
//!   makes probes for an element start from the wrong slot.

mod config;
mod double_hash_table;
mod double_hash_table_proptest;
mod error;
pub mod prime;
mod slot;

// Public surface
pub use config::TableBuilder;
pub use double_hash_table::{
    DoubleHashTable, RemovalPolicy, DEFAULT_CAPACITY, DEFAULT_STRIDE_CONSTANT,
};
pub use error::TableError;
