#![cfg(test)]

// Property tests for DoubleHashTable kept inside the crate so they can
// build tables with either removal policy through `from_parts`.

use crate::double_hash_table::{try_empty_store, DoubleHashTable, RemovalPolicy};
use crate::prime::is_prime;
use crate::TableError;
use proptest::prelude::*;
use std::collections::hash_map::RandomState;
use std::collections::HashSet;
use std::hash::{BuildHasher, Hash, Hasher};

#[derive(Clone, Debug)]
enum Op {
    Insert(u16),
    InsertCloned(u16),
    Remove(u16),
    Contains(u16),
    ResetCollisions,
    SetStride(i64),
    Clear,
}

const UNIVERSE: u16 = 64;

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let v = 0..UNIVERSE;
    let op = prop_oneof![
        4 => v.clone().prop_map(Op::Insert),
        1 => v.clone().prop_map(Op::InsertCloned),
        3 => v.clone().prop_map(Op::Remove),
        3 => v.prop_map(Op::Contains),
        1 => Just(Op::ResetCollisions),
        1 => (-3i64..200).prop_map(Op::SetStride),
        1 => Just(Op::Clear),
    ];
    proptest::collection::vec(op, 1..200)
}

fn table<S: BuildHasher>(hint: usize, policy: RemovalPolicy, hasher: S) -> DoubleHashTable<u16, S> {
    let capacity = DoubleHashTable::<u16, S>::capacity_for_hint(hint).unwrap();
    DoubleHashTable::from_parts(try_empty_store(capacity).unwrap(), 99, policy, hasher)
}

// State-machine equivalence against std::collections::HashSet.
// Invariants checked after every op:
// - contains(v) matches the model for the whole universe.
// - capacity is prime and the counted load stays within capacity / 2.
// - len() follows the removal policy: exact under Decrement; under Legacy
//   it only grows between rehashes and is recounted by them.
// - collisions only grow, except across reset_collisions and clear.
fn run_state_machine<S: BuildHasher>(
    mut sut: DoubleHashTable<u16, S>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let policy = sut.removal_policy();
    let mut model: HashSet<u16> = HashSet::new();

    for op in ops {
        let len_before = sut.len();
        let capacity_before = sut.capacity();
        let mut collisions_floor = sut.collisions();

        match op {
            Op::Insert(v) | Op::InsertCloned(v) => {
                let inserted = match op {
                    Op::Insert(_) => sut.insert(v),
                    _ => sut.insert_cloned(&v),
                };
                prop_assert_eq!(inserted, model.insert(v));
                if !inserted {
                    prop_assert_eq!(sut.len(), len_before);
                } else if sut.capacity() != capacity_before {
                    prop_assert!(sut.capacity() >= 2 * capacity_before);
                    prop_assert_eq!(sut.tombstones(), 0, "rehash drops tombstones");
                    if policy == RemovalPolicy::Legacy {
                        prop_assert_eq!(sut.len(), model.len());
                    }
                } else if policy == RemovalPolicy::Legacy {
                    prop_assert_eq!(sut.len(), len_before + 1);
                }
            }
            Op::Remove(v) => {
                let tombstones_before = sut.tombstones();
                prop_assert_eq!(sut.remove(&v), model.remove(&v));
                prop_assert!(!sut.contains(&v));
                prop_assert_eq!(sut.capacity(), capacity_before, "remove never resizes");
                if policy == RemovalPolicy::Legacy {
                    prop_assert_eq!(sut.len(), len_before);
                }
                prop_assert!(sut.tombstones() >= tombstones_before);
            }
            Op::Contains(v) => {
                prop_assert_eq!(sut.contains(&v), model.contains(&v));
            }
            Op::ResetCollisions => {
                sut.reset_collisions();
                prop_assert_eq!(sut.collisions(), 0);
                collisions_floor = 0;
            }
            Op::SetStride(r) => {
                let old = sut.stride_constant();
                let occupied = !model.is_empty() || sut.tombstones() > 0;
                let res = sut.set_stride_constant(r);
                if r <= 0 {
                    prop_assert_eq!(res, Err(TableError::InvalidStride(r)));
                    prop_assert_eq!(sut.stride_constant(), old);
                    prop_assert_eq!(sut.len(), len_before);
                } else {
                    prop_assert!(res.is_ok());
                    prop_assert_eq!(sut.stride_constant(), r as u64);
                    prop_assert_eq!(sut.capacity(), capacity_before);
                    if r as u64 != old && occupied {
                        prop_assert_eq!(sut.len(), model.len());
                        prop_assert_eq!(sut.tombstones(), 0);
                    } else {
                        prop_assert_eq!(sut.len(), len_before);
                    }
                }
            }
            Op::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.len(), 0);
                prop_assert_eq!(sut.collisions(), 0);
                prop_assert_eq!(sut.capacity(), capacity_before);
                collisions_floor = 0;
            }
        }

        prop_assert!(sut.collisions() >= collisions_floor);
        prop_assert!(is_prime(sut.capacity()));
        match policy {
            RemovalPolicy::Legacy => {
                prop_assert!(sut.len() >= model.len());
                prop_assert!(sut.len() <= sut.capacity() / 2);
            }
            RemovalPolicy::Decrement => {
                prop_assert_eq!(sut.len(), model.len());
                prop_assert!(sut.len() + sut.tombstones() <= sut.capacity() / 2);
            }
        }
        for v in 0..UNIVERSE {
            prop_assert_eq!(sut.contains(&v), model.contains(&v), "membership of {}", v);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_legacy(hint in 0usize..40, ops in arb_ops()) {
        let sut = table(hint, RemovalPolicy::Legacy, RandomState::new());
        run_state_machine(sut, ops)?;
    }

    #[test]
    fn prop_state_machine_decrement(hint in 0usize..40, ops in arb_ops()) {
        let sut = table(hint, RemovalPolicy::Decrement, RandomState::new());
        run_state_machine(sut, ops)?;
    }
}

// Collision variant using a constant hasher: every element shares a home
// slot and a stride, so probes walk one long chain of equality checks.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions(
        hint in 0usize..40,
        decrement in any::<bool>(),
        ops in arb_ops()
    ) {
        let policy = if decrement { RemovalPolicy::Decrement } else { RemovalPolicy::Legacy };
        run_state_machine(table(hint, policy, ConstBuildHasher), ops)?;
    }
}

// ASCII case-insensitive key: Eq and Hash agree on the lowercase form.
#[derive(Clone, Debug)]
struct NoCase(String);
impl PartialEq for NoCase {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}
impl Eq for NoCase {}
impl Hash for NoCase {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

// Property: elements that compare equal hash identically, and the table
// treats them as one element.
proptest! {
    #[test]
    fn prop_equal_elements_hash_identically(s in "[a-zA-Z]{0,12}") {
        let lower = NoCase(s.to_ascii_lowercase());
        let upper = NoCase(s.to_ascii_uppercase());
        prop_assert!(lower == upper);

        let mut t: DoubleHashTable<NoCase> = DoubleHashTable::new(7);
        prop_assert_eq!(t.hasher().hash_one(&lower), t.hasher().hash_one(&upper));
        prop_assert!(t.insert(lower.clone()));
        prop_assert!(t.contains(&upper));
        prop_assert!(!t.insert(upper.clone()));
        prop_assert!(t.remove(&upper));
        prop_assert!(!t.contains(&lower));
    }

    // Property: rehash keeps exactly the live elements.
    #[test]
    fn prop_growth_preserves_live_set(
        values in proptest::collection::hash_set(any::<u32>(), 0..300),
        removed_every in 2usize..6,
    ) {
        let mut t: DoubleHashTable<u32> = DoubleHashTable::new(3);
        let mut live = HashSet::new();
        for (i, v) in values.iter().copied().enumerate() {
            prop_assert!(t.insert(v));
            live.insert(v);
            if i % removed_every == 0 {
                prop_assert!(t.remove(&v));
                live.remove(&v);
            }
        }
        for v in &values {
            prop_assert_eq!(t.contains(v), live.contains(v));
        }
    }
}
