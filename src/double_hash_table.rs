//! DoubleHashTable: open-addressing set with double hashing and tombstones.

use crate::error::TableError;
use crate::prime::next_prime;
use crate::slot::Slot;
use core::cell::Cell;
use core::hash::{BuildHasher, Hash};
use log::{debug, trace};
use std::collections::hash_map::RandomState;

/// Capacity hint used by `Default`.
pub const DEFAULT_CAPACITY: usize = 101;
/// Default `R` for the second hash `R - (hash(x) mod R)`.
pub const DEFAULT_STRIDE_CONSTANT: i64 = 99;

const MIN_CAPACITY: usize = 3;

/// How `remove` accounts for the element it tombstones.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum RemovalPolicy {
    /// `remove` leaves `len()` untouched, so the load check and rehash
    /// sizing count tombstoned elements until the next rehash.
    #[default]
    Legacy,
    /// `remove` decrements `len()`. Growth is triggered by live elements
    /// plus tombstones so probes always find an empty slot.
    Decrement,
}

/// Where a probe for `x` stopped.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Probe {
    /// An `Active` slot holding `x`.
    Hit(usize),
    /// A tombstone still holding `x`.
    Buried(usize),
    /// The `Empty` slot that ended the probe.
    Vacant(usize),
}

#[derive(Clone)]
pub struct DoubleHashTable<T, S = RandomState> {
    slots: Vec<Slot<T>>,
    len: usize,
    tombstones: usize,
    // Probes run from `&self` (contains), so the diagnostic counter needs a Cell.
    collisions: Cell<usize>,
    stride_constant: u64,
    policy: RemovalPolicy,
    hasher: S,
}

#[cold]
#[inline(never)]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

fn capacity_for(hint: usize) -> Result<usize, TableError> {
    next_prime(hint.max(MIN_CAPACITY)).ok_or(TableError::CapacityOverflow { requested: hint })
}

fn empty_store<T>(capacity: usize) -> Vec<Slot<T>> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

pub(crate) fn try_empty_store<T>(capacity: usize) -> Result<Vec<Slot<T>>, TableError> {
    let mut store = Vec::new();
    store.try_reserve_exact(capacity)?;
    store.extend((0..capacity).map(|_| Slot::Empty));
    Ok(store)
}

impl<T> DoubleHashTable<T>
where
    T: Eq + Hash,
{
    /// Creates a table with `next_prime(capacity_hint)` slots.
    ///
    /// Aborts on allocation failure; see [`Self::try_new`].
    pub fn new(capacity_hint: usize) -> Self {
        Self::with_capacity_and_hasher(capacity_hint, RandomState::new())
    }

    pub fn try_new(capacity_hint: usize) -> Result<Self, TableError> {
        Self::try_with_capacity_and_hasher(capacity_hint, RandomState::new())
    }
}

impl<T, S> Default for DoubleHashTable<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, S::default())
    }
}

impl<T, S> DoubleHashTable<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hasher)
    }

    pub fn with_capacity_and_hasher(capacity_hint: usize, hasher: S) -> Self {
        let capacity = capacity_for(capacity_hint).unwrap_or_else(|_| capacity_overflow());
        Self::from_parts(
            empty_store(capacity),
            DEFAULT_STRIDE_CONSTANT as u64,
            RemovalPolicy::default(),
            hasher,
        )
    }

    /// Like [`Self::with_capacity_and_hasher`] but reports capacity overflow
    /// and allocation failure instead of aborting.
    pub fn try_with_capacity_and_hasher(
        capacity_hint: usize,
        hasher: S,
    ) -> Result<Self, TableError> {
        let capacity = capacity_for(capacity_hint)?;
        Ok(Self::from_parts(
            try_empty_store(capacity)?,
            DEFAULT_STRIDE_CONSTANT as u64,
            RemovalPolicy::default(),
            hasher,
        ))
    }

    pub(crate) fn from_parts(
        slots: Vec<Slot<T>>,
        stride_constant: u64,
        policy: RemovalPolicy,
        hasher: S,
    ) -> Self {
        debug_assert!(stride_constant > 0);
        Self {
            slots,
            len: 0,
            tombstones: 0,
            collisions: Cell::new(0),
            stride_constant,
            policy,
            hasher,
        }
    }

    pub(crate) fn capacity_for_hint(capacity_hint: usize) -> Result<usize, TableError> {
        capacity_for(capacity_hint)
    }

    /// Number of elements counted toward the load factor.
    ///
    /// Under [`RemovalPolicy::Legacy`] removed elements stay counted until
    /// the next rehash.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the backing store. Always prime.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slots probed past without a match since the last reset.
    pub fn collisions(&self) -> usize {
        self.collisions.get()
    }

    pub fn reset_collisions(&mut self) {
        self.collisions.set(0);
    }

    /// Slots currently holding a tombstone.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    pub fn stride_constant(&self) -> u64 {
        self.stride_constant
    }

    pub fn removal_policy(&self) -> RemovalPolicy {
        self.policy
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Sets `R` for the second hash. Rejects `r <= 0`.
    ///
    /// Changing `R` changes every element's probe sequence, so an occupied
    /// table re-places its live elements at the current capacity.
    pub fn set_stride_constant(&mut self, r: i64) -> Result<(), TableError> {
        if r <= 0 {
            return Err(TableError::InvalidStride(r));
        }
        let r = r as u64;
        if r == self.stride_constant {
            return Ok(());
        }
        trace!("stride constant {} -> {}", self.stride_constant, r);
        self.stride_constant = r;
        if self.slots.iter().any(|s| !s.is_empty()) {
            let capacity = self.capacity();
            debug!("reindex after stride change: capacity {}", capacity);
            self.rebuild(capacity);
        }
        Ok(())
    }

    /// Empties every slot and zeroes the element and collision counters.
    /// Capacity is kept.
    pub fn clear(&mut self) {
        trace!("clear: capacity {}", self.capacity());
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.len = 0;
        self.tombstones = 0;
        self.collisions.set(0);
    }

    pub fn contains(&self, x: &T) -> bool {
        matches!(self.find_pos(x), Probe::Hit(_))
    }

    /// Inserts `x`, returning false if an equal element is already present.
    ///
    /// Grows the table when the insert pushes the load past one half.
    pub fn insert(&mut self, x: T) -> bool {
        match self.vacancy(&x) {
            Some(pos) => {
                self.fill(pos, x);
                true
            }
            None => false,
        }
    }

    /// Inserts a copy of `x`; leaves the table in the same state as
    /// `insert(x.clone())` but only clones when `x` is absent.
    pub fn insert_cloned(&mut self, x: &T) -> bool
    where
        T: Clone,
    {
        match self.vacancy(x) {
            Some(pos) => {
                self.fill(pos, x.clone());
                true
            }
            None => false,
        }
    }

    /// Slot an insert of `x` would take, or `None` if `x` is present.
    fn vacancy(&self, x: &T) -> Option<usize> {
        match self.find_pos(x) {
            Probe::Hit(_) => None,
            Probe::Buried(pos) | Probe::Vacant(pos) => Some(pos),
        }
    }

    fn fill(&mut self, pos: usize, x: T) {
        if let Slot::Deleted(_) = self.slots[pos] {
            self.tombstones -= 1;
        }
        self.slots[pos] = Slot::Active(x);
        self.len += 1;
        if self.occupancy() > self.capacity() / 2 {
            self.rehash();
        }
    }

    /// Tombstones `x`. Returns false if `x` is not present.
    pub fn remove(&mut self, x: &T) -> bool {
        let Probe::Hit(pos) = self.find_pos(x) else {
            return false;
        };
        debug_assert!(self.slots[pos].is_active());
        self.slots[pos].bury();
        self.tombstones += 1;
        if self.policy == RemovalPolicy::Decrement {
            self.len -= 1;
        }
        true
    }

    fn occupancy(&self) -> usize {
        match self.policy {
            RemovalPolicy::Legacy => self.len,
            RemovalPolicy::Decrement => self.len + self.tombstones,
        }
    }

    #[inline]
    fn primary_hash(&self, hash: u64) -> usize {
        (hash % self.capacity() as u64) as usize
    }

    /// `R - (hash mod R)`, reduced modulo the capacity. A stride that is a
    /// multiple of the capacity would never leave the home slot, so it
    /// becomes 1. Any non-zero stride cycles through every slot of a prime
    /// sized store.
    #[inline]
    fn second_hash(&self, hash: u64) -> usize {
        let r = self.stride_constant;
        let stride = ((r - hash % r) % self.capacity() as u64) as usize;
        if stride == 0 {
            1
        } else {
            stride
        }
    }

    fn find_pos(&self, x: &T) -> Probe {
        let hash = self.hasher.hash_one(x);
        let capacity = self.capacity();
        let stride = self.second_hash(hash);
        let mut pos = self.primary_hash(hash);
        let mut steps = 0usize;
        loop {
            match &self.slots[pos] {
                Slot::Empty => return Probe::Vacant(pos),
                Slot::Active(e) if e == x => return Probe::Hit(pos),
                Slot::Deleted(e) if e == x => return Probe::Buried(pos),
                Slot::Active(_) | Slot::Deleted(_) => {}
            }
            self.collisions.set(self.collisions.get() + 1);
            steps += 1;
            debug_assert!(steps < capacity, "probe visited every slot without an empty one");
            pos += stride;
            if pos >= capacity {
                pos -= capacity;
            }
        }
    }

    fn rehash(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity
            .checked_mul(2)
            .and_then(next_prime)
            .unwrap_or_else(|| capacity_overflow());
        debug!(
            "rehash: capacity {} -> {}, {} counted, {} tombstones",
            old_capacity, new_capacity, self.len, self.tombstones
        );
        self.rebuild(new_capacity);
    }

    /// Replaces the store with `capacity` empty slots and re-inserts the
    /// live elements of the old store, in store order. Tombstones are dropped.
    fn rebuild(&mut self, capacity: usize) {
        let old = core::mem::replace(&mut self.slots, empty_store(capacity));
        self.len = 0;
        self.tombstones = 0;
        for x in old.into_iter().filter_map(Slot::into_active) {
            self.insert(x);
        }
    }

    #[cfg(test)]
    pub(crate) fn slot(&self, pos: usize) -> &Slot<T> {
        &self.slots[pos]
    }

    #[cfg(test)]
    pub(crate) fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }
}
