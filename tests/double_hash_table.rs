// DoubleHashTable public API test suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Membership: contains(x) is true iff x was inserted and not removed.
// - Uniqueness: duplicate insert returns false and changes nothing.
// - Growth: the counted load stays within capacity / 2 and capacity stays
//   prime; growth preserves the live set.
// - Diagnostics: collision counting and reset.
// - Configuration: invalid stride constants are rejected.
use double_hash_table::prime::is_prime;
use double_hash_table::{DoubleHashTable, RemovalPolicy, TableBuilder, TableError};
use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};

// Test: insert/contains round-trip and duplicate rejection.
// Verifies: first insert true, second false; len counts once.
#[test]
fn insert_contains_and_duplicates() {
    let mut t = DoubleHashTable::new(101);
    assert!(t.insert("alpha".to_string()));
    assert!(t.contains(&"alpha".to_string()));
    assert!(!t.insert("alpha".to_string()));
    assert_eq!(t.len(), 1);
    assert!(!t.contains(&"beta".to_string()));
}

// Test: the hint-10 growth scenario.
// Assumes: next_prime(10) = 11, next_prime(22) = 23.
// Verifies: the sixth element crosses 11 / 2 and the table grows to 23.
#[test]
fn growth_from_eleven_to_twenty_three() {
    let mut t = DoubleHashTable::new(10);
    assert_eq!(t.capacity(), 11);
    for x in 0..6u32 {
        assert!(t.insert(x));
    }
    assert_eq!(t.capacity(), 23);
    assert!((0..6u32).all(|x| t.contains(&x)));
}

// Test: remove semantics.
// Verifies: remove of a present element succeeds once and hides it; remove
// of an absent element returns false.
#[test]
fn remove_present_and_absent() {
    let mut t = DoubleHashTable::new(31);
    for x in 0..10u64 {
        t.insert(x);
    }
    assert!(t.remove(&3));
    assert!(!t.contains(&3));
    assert!(!t.remove(&3));
    assert!(!t.remove(&1_000));
    for x in (0..10u64).filter(|&x| x != 3) {
        assert!(t.contains(&x));
    }
    // Removed elements can come back.
    assert!(t.insert(3));
    assert!(t.contains(&3));
}

// Test: legacy and corrected removal accounting side by side.
// Verifies: Legacy keeps len after remove; Decrement lowers it.
#[test]
fn removal_policies_differ_only_in_count() {
    let mut legacy: DoubleHashTable<u32> = TableBuilder::new().build().unwrap();
    let mut corrected: DoubleHashTable<u32> = TableBuilder::new()
        .removal_policy(RemovalPolicy::Decrement)
        .build()
        .unwrap();
    for t in [&mut legacy, &mut corrected] {
        t.insert(1);
        t.insert(2);
        assert!(t.remove(&1));
        assert!(!t.contains(&1));
        assert!(t.contains(&2));
        assert_eq!(t.tombstones(), 1);
    }
    assert_eq!(legacy.len(), 2);
    assert_eq!(corrected.len(), 1);
}

// Test: load factor and prime capacity across many inserts.
#[test]
fn load_factor_bound_after_every_insert() {
    let mut t = DoubleHashTable::new(0);
    for x in 0..5_000u64 {
        assert!(t.insert(x.wrapping_mul(0x9e37_79b9_7f4a_7c15)));
        assert!(t.len() <= t.capacity() / 2);
        assert!(is_prime(t.capacity()));
    }
    assert_eq!(t.len(), 5_000);
}

// Test: collision counter reset.
// Assumes: with a constant hasher every element after the first collides.
// Verifies: counter grows with probes and reset zeroes it without touching
// membership; a first-probe hit adds nothing.
#[test]
fn collision_counter_and_reset() {
    let mut t: DoubleHashTable<u8, ConstBuildHasher> =
        DoubleHashTable::with_hasher(ConstBuildHasher);
    t.insert(1);
    assert_eq!(t.collisions(), 0);
    t.insert(2);
    assert_eq!(t.collisions(), 1);
    t.insert(3);
    assert_eq!(t.collisions(), 3);

    t.reset_collisions();
    assert_eq!(t.collisions(), 0);
    assert!(t.contains(&1));
    assert_eq!(t.collisions(), 0);
    assert!(t.contains(&3));
    assert_eq!(t.collisions(), 2);
    assert_eq!(t.len(), 3);
}

// Test: stride constant validation and reconfiguration.
// Verifies: R <= 0 errors; a valid R keeps all elements reachable.
#[test]
fn stride_constant_configuration() {
    let mut t: DoubleHashTable<u8, ConstBuildHasher> =
        DoubleHashTable::with_hasher(ConstBuildHasher);
    for x in 0..20 {
        t.insert(x);
    }
    assert_eq!(t.set_stride_constant(0), Err(TableError::InvalidStride(0)));
    assert_eq!(t.set_stride_constant(i64::MIN), Err(TableError::InvalidStride(i64::MIN)));
    assert_eq!(t.stride_constant(), 99);

    t.set_stride_constant(5).unwrap();
    assert_eq!(t.stride_constant(), 5);
    assert!((0..20).all(|x| t.contains(&x)));

    // R larger than the capacity still probes every slot.
    t.set_stride_constant(10_000).unwrap();
    assert!((0..20).all(|x| t.contains(&x)));
    assert!(!t.contains(&200));
}

// Test: builder errors.
#[test]
fn builder_rejects_bad_configuration() {
    let err = TableBuilder::new().stride_constant(-7).build::<u64>().err();
    assert_eq!(err, Some(TableError::InvalidStride(-7)));
    assert_eq!(
        err.map(|e| e.to_string()),
        Some("invalid stride constant -7: must be greater than zero".to_string())
    );

    let err = DoubleHashTable::<u64>::try_new(usize::MAX).err();
    assert!(matches!(err, Some(TableError::CapacityOverflow { .. })));
}

// Test: deterministic hasher gives reproducible probe statistics.
// Verifies: two tables with the same hasher and inputs agree on every
// diagnostic.
#[test]
fn deterministic_hasher_reproduces_collisions() {
    type Fixed = BuildHasherDefault<DefaultHasher>;
    let build = || -> DoubleHashTable<u32, Fixed> {
        let mut t = DoubleHashTable::with_capacity_and_hasher(10, Fixed::default());
        for x in 0..500 {
            t.insert(x * 7);
        }
        for x in 0..100 {
            t.remove(&(x * 14));
        }
        t
    };
    let (a, b) = (build(), build());
    assert_eq!(a.collisions(), b.collisions());
    assert_eq!(a.capacity(), b.capacity());
    assert_eq!(a.len(), b.len());
    assert_eq!(a.tombstones(), b.tombstones());
}

// Test: clear keeps capacity and empties the table.
#[test]
fn clear_empties_table() {
    let mut t = DoubleHashTable::new(10);
    for x in 0..50u16 {
        t.insert(x);
    }
    let capacity = t.capacity();
    t.clear();
    assert!(t.is_empty());
    assert_eq!(t.capacity(), capacity);
    assert_eq!(t.collisions(), 0);
    assert!((0..50u16).all(|x| !t.contains(&x)));
    assert!(t.insert(7));
}

// Test: equal elements must hash identically.
// Verifies: a key type whose Eq ignores a field also leaves it out of Hash,
// and the table treats such elements as one.
#[test]
fn equal_elements_hash_identically() {
    #[derive(Debug, Clone)]
    struct Tagged {
        id: u32,
        note: &'static str,
    }
    impl PartialEq for Tagged {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }
    impl Eq for Tagged {}
    impl Hash for Tagged {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.id.hash(state);
        }
    }

    let a = Tagged { id: 9, note: "first" };
    let b = Tagged { id: 9, note: "second" };
    let mut t: DoubleHashTable<Tagged> = DoubleHashTable::new(11);
    assert_eq!(t.hasher().hash_one(&a), t.hasher().hash_one(&b));
    assert!(t.insert(a));
    assert!(!t.insert(b.clone()));
    assert!(t.contains(&b));
    assert_ne!(b.note, "first");
}

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
    // Every element shares one home slot and one stride.
    fn finish(&self) -> u64 {
        0
    }
}
