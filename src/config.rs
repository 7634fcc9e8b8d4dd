//! TableBuilder: validated construction of a `DoubleHashTable`.

use crate::double_hash_table::{
    try_empty_store, DoubleHashTable, RemovalPolicy, DEFAULT_CAPACITY, DEFAULT_STRIDE_CONSTANT,
};
use crate::error::TableError;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

#[derive(Clone, Debug)]
pub struct TableBuilder<S = RandomState> {
    capacity_hint: usize,
    stride_constant: i64,
    removal_policy: RemovalPolicy,
    hasher: S,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            capacity_hint: DEFAULT_CAPACITY,
            stride_constant: DEFAULT_STRIDE_CONSTANT,
            removal_policy: RemovalPolicy::default(),
            hasher: RandomState::new(),
        }
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> TableBuilder<S> {
    /// Requested slot count; rounded up to a prime on build.
    pub fn capacity_hint(mut self, hint: usize) -> Self {
        self.capacity_hint = hint;
        self
    }

    /// `R` for the second hash; validated on build.
    pub fn stride_constant(mut self, r: i64) -> Self {
        self.stride_constant = r;
        self
    }

    pub fn removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = policy;
        self
    }

    pub fn hasher<S2>(self, hasher: S2) -> TableBuilder<S2> {
        TableBuilder {
            capacity_hint: self.capacity_hint,
            stride_constant: self.stride_constant,
            removal_policy: self.removal_policy,
            hasher,
        }
    }

    pub fn build<T>(self) -> Result<DoubleHashTable<T, S>, TableError>
    where
        T: Eq + Hash,
        S: BuildHasher,
    {
        if self.stride_constant <= 0 {
            return Err(TableError::InvalidStride(self.stride_constant));
        }
        let capacity = DoubleHashTable::<T, S>::capacity_for_hint(self.capacity_hint)?;
        let slots = try_empty_store(capacity)?;
        Ok(DoubleHashTable::from_parts(
            slots,
            self.stride_constant as u64,
            self.removal_policy,
            self.hasher,
        ))
    }
}
