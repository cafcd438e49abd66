use rand::{rngs::StdRng, SeedableRng};

use crate::collections::{ArrayError, ReservePolicy};
use crate::flexarr;

use super::*;

fn check_invariants<T>(arr: &FlexArr<T>) {
    assert!(arr.len() <= arr.capacity());
    assert!(arr.capacity() >= ReservePolicy::MIN_CAPACITY);
}

#[test]
fn flexarr_new() {
    let arr = FlexArr::<i32>::new();
    assert_eq!(arr.capacity(), ReservePolicy::MIN_CAPACITY);
    assert_eq!(arr.len(), 0);
    assert!(arr.is_empty());

    let arr = FlexArr::<i32>::with_capacity(21).unwrap();
    assert!(arr.capacity() >= 21);
    assert_eq!(arr.len(), 0);

    // Requested capacities below the floor are raised to it.
    let arr = FlexArr::<i32>::with_capacity(2).unwrap();
    assert_eq!(arr.capacity(), ReservePolicy::MIN_CAPACITY);

    assert_eq!(
        FlexArr::<i32>::with_capacity(0),
        Err(ArrayError::InvalidArgument { what: "capacity must be non-zero" }),
    );
}

#[test]
fn flexarr_policy_validation() {
    assert!(ReservePolicy::new(0.5, 0.5).is_ok());
    assert!(ReservePolicy::new(0.25, 0.75).is_ok());

    // A grow ratio above 0.5 truncates to a non-growing multiplier.
    assert!(matches!(ReservePolicy::new(0.6, 0.5), Err(ArrayError::InvalidArgument { .. })));
    assert!(matches!(ReservePolicy::new(0.0, 0.5), Err(ArrayError::InvalidArgument { .. })));
    assert!(matches!(ReservePolicy::new(0.5, 0.0), Err(ArrayError::InvalidArgument { .. })));
    assert!(matches!(ReservePolicy::new(0.5, 1.0), Err(ArrayError::InvalidArgument { .. })));
}

#[test]
fn flexarr_filled() {
    let arr = FlexArr::filled(5, 7).unwrap();
    assert_eq!(arr, [7, 7, 7, 7, 7]);
    assert!(arr.capacity() >= 2 * arr.len());
    check_invariants(&arr);

    // Small fills still respect the capacity floor.
    let arr = FlexArr::filled(2, 0).unwrap();
    assert_eq!(arr.capacity(), ReservePolicy::MIN_CAPACITY);

    assert!(matches!(FlexArr::<i32>::filled(0, 1), Err(ArrayError::InvalidArgument { .. })));
}

#[test]
fn flexarr_from_range() {
    let src = [10, 20, 30, 40, 50];

    let arr = FlexArr::from_range(&src, 1, 4);
    assert_eq!(arr, [20, 30, 40]);

    // Clamped to the source, never an error.
    let arr = FlexArr::from_range(&src, 3, 100);
    assert_eq!(arr, [40, 50]);
    let arr = FlexArr::from_range(&src, 4, 2);
    assert!(arr.is_empty());

    // The destination buffer exactly fits large ranges.
    let big: Vec<i32> = (0..100).collect();
    let arr = FlexArr::from_range(&big, 0, 100);
    assert_eq!(arr.len(), 100);
    assert_eq!(arr.capacity(), 100);

    // Copying from another container goes through the same path.
    let copy = FlexArr::from_range(&arr, 10, 13);
    assert_eq!(copy, [10, 11, 12]);
}

#[test]
fn flexarr_access() {
    let mut arr = flexarr![1, 2, 3];

    assert_eq!(arr.at(0), Ok(&1));
    assert_eq!(arr.at(2), Ok(&3));
    assert_eq!(arr.at(3), Err(ArrayError::OutOfRange { index: 3, len: 3 }));

    *arr.at_mut(1).unwrap() = 9;
    assert_eq!(arr, [1, 9, 3]);
    assert!(arr.at_mut(5).is_err());

    assert_eq!(arr[1], 9);
    arr[1] = 2;
    assert_eq!(arr.get(1), Some(&2));
    assert_eq!(arr.get(7), None);
}

#[test]
fn flexarr_push_growth_is_logarithmic() {
    let mut arr = FlexArr::new();
    let mut reallocations = 0;
    let mut last_capacity = arr.capacity();

    for i in 0..1024 {
        arr.push(i);
        check_invariants(&arr);
        if arr.capacity() != last_capacity {
            reallocations += 1;
            last_capacity = arr.capacity();
        }
    }

    assert_eq!(arr.len(), 1024);
    assert_eq!(arr[1023], 1023);
    // Doubling from 8 to 2048 is 8 reallocations; O(log n), not O(n).
    assert_eq!(reallocations, 8);
}

#[test]
fn flexarr_grow_ratio_quadruples() {
    let policy = ReservePolicy::new(0.25, 0.5).unwrap();
    let mut arr = FlexArr::with_capacity_and_policy(8, policy).unwrap();

    arr.push(1);
    arr.push(2);
    assert_eq!(arr.capacity(), 8);
    // Third element exceeds 0.25 * 8, multiplier is 4.
    arr.push(3);
    assert_eq!(arr.capacity(), 32);
}

#[test]
fn flexarr_insert() {
    let mut arr = flexarr![1, 2, 3];

    assert_eq!(arr.insert(1, 4), Ok(1));
    assert_eq!(arr, [1, 4, 2, 3]);

    // index == len degenerates to push and returns right away.
    assert_eq!(arr.insert(4, 5), Ok(4));
    assert_eq!(arr, [1, 4, 2, 3, 5]);

    assert_eq!(arr.insert(7, 9), Err(ArrayError::OutOfRange { index: 7, len: 5 }));
    assert_eq!(arr, [1, 4, 2, 3, 5]);
}

#[test]
fn flexarr_remove() {
    let mut arr = flexarr![1, 2, 3, 4];

    assert_eq!(arr.remove(1), Ok(2));
    assert_eq!(arr, [1, 3, 4]);
    assert_eq!(arr.remove(2), Ok(4));
    assert_eq!(arr, [1, 3]);

    assert_eq!(arr.remove(2), Err(ArrayError::OutOfRange { index: 2, len: 2 }));
}

#[test]
fn flexarr_insert_remove_inverse() {
    let original = flexarr![10, 20, 30, 40, 50];

    for i in 0..=original.len() {
        let mut arr = original.clone();
        let at = arr.insert(i, 99).unwrap();
        assert_eq!(at, i);
        assert_eq!(arr.len(), original.len() + 1);
        assert_eq!(arr.remove(at), Ok(99));
        assert_eq!(arr, original);
        check_invariants(&arr);
    }
}

#[test]
fn flexarr_shrink_to_floor() {
    let mut arr: FlexArr<i32> = (0..100).collect();
    assert!(arr.capacity() > ReservePolicy::MIN_CAPACITY);

    while !arr.is_empty() {
        arr.remove(0).unwrap();
        check_invariants(&arr);
    }
    assert_eq!(arr.capacity(), ReservePolicy::MIN_CAPACITY);
}

#[test]
fn flexarr_pop() {
    let mut arr = flexarr![1, 2, 3];
    assert_eq!(arr.pop(), Some(3));
    assert_eq!(arr.pop(), Some(2));
    assert_eq!(arr.pop(), Some(1));
    assert_eq!(arr.pop(), None);
    check_invariants(&arr);
}

#[test]
fn flexarr_remove_range() {
    let mut arr: FlexArr<i32> = (0..10).collect();

    // Malformed range: no-op, neutral result.
    assert_eq!(arr.remove_range(7, 3), 0);
    assert_eq!(arr.len(), 10);

    // Out-of-bounds end clamps to the live range.
    assert_eq!(arr.remove_range(8, 100), 2);
    assert_eq!(arr, [0, 1, 2, 3, 4, 5, 6, 7]);

    assert_eq!(arr.remove_range(2, 5), 3);
    assert_eq!(arr, [0, 1, 5, 6, 7]);

    assert_eq!(arr.remove_range(5, 5), 0);
    check_invariants(&arr);
}

#[test]
fn flexarr_remove_range_capacity_matches_single_removes() {
    let bulk: FlexArr<i32> = (0..40).collect();
    let mut single = bulk.clone();
    let mut bulk = bulk;

    assert_eq!(bulk.remove_range(5, 30), 25);
    for _ in 0..25 {
        single.remove(5).unwrap();
    }

    assert_eq!(bulk, single);
    assert_eq!(bulk.capacity(), single.capacity());
}

#[test]
fn flexarr_remove_range_drops_victims() {
    use core::sync::atomic::{AtomicUsize, Ordering};

    static DROPS: AtomicUsize = AtomicUsize::new(0);
    struct Counted(#[allow(dead_code)] i32);
    impl Drop for Counted {
        fn drop(&mut self) {
            DROPS.fetch_add(1, Ordering::SeqCst);
        }
    }

    let mut arr: FlexArr<Counted> = (0..10).map(Counted).collect();
    assert_eq!(arr.remove_range(2, 7), 5);
    assert_eq!(DROPS.load(Ordering::SeqCst), 5);

    drop(arr);
    assert_eq!(DROPS.load(Ordering::SeqCst), 10);
}

#[test]
fn flexarr_clear_and_truncate() {
    let mut arr: FlexArr<i32> = (0..50).collect();
    arr.truncate(3);
    assert_eq!(arr, [0, 1, 2]);
    check_invariants(&arr);

    // Truncating longer than the content is a no-op.
    arr.truncate(10);
    assert_eq!(arr.len(), 3);

    arr.clear();
    assert!(arr.is_empty());
    assert_eq!(arr.capacity(), ReservePolicy::MIN_CAPACITY);
}

#[test]
fn flexarr_traverse() {
    let mut arr = flexarr![1, 2, 3];
    arr.traverse(|value| *value += 100);
    assert_eq!(arr, [101, 102, 103]);
}

#[test]
fn flexarr_rfind_last_occurrence() {
    let arr = flexarr![3, 1, 4, 1, 5, 1];

    assert_eq!(arr.rfind(&1, 0, arr.len()), Some(5));
    assert_eq!(arr.rfind(&1, 0, 5), Some(3));
    assert_eq!(arr.rfind(&1, 0, 1), None);
    assert_eq!(arr.rfind(&9, 0, arr.len()), None);

    // Malformed and out-of-bounds ranges are neutral.
    assert_eq!(arr.rfind(&1, 4, 2), None);
    assert_eq!(arr.rfind(&1, 0, 100), Some(5));
}

#[test]
fn flexarr_deduplicate() {
    let mut arr = flexarr![0, 1, 2, 3, 4, 1, 2];
    assert_eq!(arr.deduplicate(), 2);
    assert_eq!(arr, [0, 1, 2, 3, 4]);

    // Idempotent: a second pass removes nothing.
    assert_eq!(arr.deduplicate(), 0);
    assert_eq!(arr, [0, 1, 2, 3, 4]);
    check_invariants(&arr);
}

#[test]
fn flexarr_disordered() {
    let arr = flexarr![1, 2, 3, 4, 5];
    assert_eq!(arr.disordered(), 0);

    let arr = flexarr![3, 1, 2];
    assert_eq!(arr.disordered(), 1);

    let arr = flexarr![5, 4, 3];
    assert_eq!(arr.disordered(), 2);

    let arr = FlexArr::<i32>::new();
    assert_eq!(arr.disordered(), 0);
}

#[test]
fn flexarr_uniquify_sorted() {
    let mut arr = flexarr![1, 1, 2, 2, 3];
    assert_eq!(arr.uniquify(), 2);
    assert_eq!(arr, [1, 2, 3]);
    check_invariants(&arr);

    let mut arr = flexarr![7, 7, 7, 7];
    assert_eq!(arr.uniquify(), 3);
    assert_eq!(arr, [7]);
}

#[test]
fn flexarr_uniquify_disordered_falls_back() {
    let mut arr = flexarr![2, 1, 2, 1, 3];
    assert_eq!(arr.uniquify(), 2);
    assert_eq!(arr, [2, 1, 3]);
}

#[test]
fn flexarr_search_sorted() {
    let arr = flexarr![1, 2, 3, 4, 5];

    assert_eq!(arr.search(&3, 0, arr.len()), Some(2));
    assert_eq!(arr.search(&1, 0, arr.len()), Some(0));
    assert_eq!(arr.search(&5, 0, arr.len()), Some(4));
    assert_eq!(arr.search(&6, 0, arr.len()), None);
    assert_eq!(arr.search_all(&4), Some(3));

    // Sub-range search only sees the window.
    assert_eq!(arr.search(&5, 0, 3), None);
    assert_eq!(arr.search(&2, 1, 3), Some(1));

    // Empty and malformed windows.
    assert_eq!(arr.search(&3, 2, 2), None);
    assert_eq!(arr.search(&3, 4, 1), None);
}

#[test]
fn flexarr_search_unsorted_falls_back_to_linear() {
    let arr = flexarr![4, 1, 3, 2];
    assert!(arr.disordered() > 0);

    assert_eq!(arr.search_all(&3), Some(2));
    assert_eq!(arr.search_all(&9), None);
}

#[test]
fn flexarr_bubble_sort() {
    let mut arr = flexarr![5, 3, 1, 4, 2];
    arr.bubble_sort(0, 5);
    assert_eq!(arr, [1, 2, 3, 4, 5]);
    assert_eq!(arr.disordered(), 0);

    // Sub-range sort leaves the rest alone.
    let mut arr = flexarr![9, 4, 3, 2, 0];
    arr.bubble_sort(1, 4);
    assert_eq!(arr, [9, 2, 3, 4, 0]);
}

#[test]
fn flexarr_bubble_sort_early_exit() {
    use core::cmp::Ordering as CmpOrdering;
    use core::sync::atomic::{AtomicUsize, Ordering};

    static COMPARES: AtomicUsize = AtomicUsize::new(0);

    #[derive(PartialEq, Eq)]
    struct Counted(i32);
    impl PartialOrd for Counted {
        fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for Counted {
        fn cmp(&self, other: &Self) -> CmpOrdering {
            COMPARES.fetch_add(1, Ordering::SeqCst);
            self.0.cmp(&other.0)
        }
    }

    let mut arr: FlexArr<Counted> = (0..6).map(Counted).collect();
    arr.bubble_sort(0, 6);

    // Already sorted: exactly one clean pass of n - 1 comparisons.
    assert_eq!(COMPARES.load(Ordering::SeqCst), 5);
}

#[test]
fn flexarr_merge_sort() {
    let mut arr = flexarr![5, 3, 1, 4, 1, 2];
    arr.merge_sort(0, arr.len());
    assert_eq!(arr, [1, 1, 2, 3, 4, 5]);
    assert_eq!(arr.disordered(), 0);

    let mut arr: FlexArr<i32> = (0..200).rev().collect();
    arr.sort();
    assert_eq!(arr.as_slice(), (0..200).collect::<Vec<_>>().as_slice());

    let mut empty = FlexArr::<i32>::new();
    empty.merge_sort(0, 0);
    assert!(empty.is_empty());
}

#[test]
fn flexarr_merge_sort_is_stable() {
    use core::cmp::Ordering as CmpOrdering;

    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    struct Rec {
        key: u32,
        tag: u32,
    }
    impl PartialOrd for Rec {
        fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for Rec {
        fn cmp(&self, other: &Self) -> CmpOrdering {
            self.key.cmp(&other.key)
        }
    }

    let mut arr = flexarr![
        Rec { key: 2, tag: 0 },
        Rec { key: 1, tag: 1 },
        Rec { key: 2, tag: 2 },
        Rec { key: 1, tag: 3 },
        Rec { key: 2, tag: 4 },
    ];
    arr.merge_sort(0, arr.len());

    // Equal keys keep their original relative order.
    let tags: Vec<u32> = arr.iter().map(|r| r.tag).collect();
    assert_eq!(tags, [1, 3, 0, 2, 4]);
}

#[test]
fn flexarr_shuffle_seeded() {
    let original: FlexArr<i32> = (0..32).collect();

    let mut a = original.clone();
    let mut b = original.clone();
    let mut rng_a = StdRng::seed_from_u64(42);
    let mut rng_b = StdRng::seed_from_u64(42);
    a.shuffle(&mut rng_a);
    b.shuffle(&mut rng_b);

    // Same seed, same permutation; and it is a permutation.
    assert_eq!(a, b);
    let mut back = a.clone();
    back.sort();
    assert_eq!(back, original);
}

#[test]
fn flexarr_clone_is_deep() {
    let arr = flexarr![String::from("a"), String::from("b")];
    let mut copy = arr.clone();

    assert_eq!(copy, arr);
    assert_eq!(copy.capacity(), arr.capacity());
    assert_eq!(copy.policy(), arr.policy());

    copy[0].push('!');
    copy.push(String::from("c"));
    assert_eq!(arr, [String::from("a"), String::from("b")]);
}

#[test]
fn flexarr_into_iter() {
    let arr = flexarr![1, 2, 3, 4, 5];
    let mut iter = arr.into_iter();

    assert_eq!(iter.len(), 5);
    assert_eq!(iter.next(), Some(1));
    assert_eq!(iter.next_back(), Some(5));
    assert_eq!(iter.as_slice(), &[2, 3, 4]);
    assert_eq!(iter.collect::<Vec<_>>(), [2, 3, 4]);

    let arr = flexarr![1, 2, 3];
    let total: i32 = (&arr).into_iter().sum();
    assert_eq!(total, 6);
}

#[test]
fn flexarr_into_iter_drops_leftovers() {
    use core::sync::atomic::{AtomicUsize, Ordering};

    static DROPS: AtomicUsize = AtomicUsize::new(0);
    struct Counted(#[allow(dead_code)] i32);
    impl Drop for Counted {
        fn drop(&mut self) {
            DROPS.fetch_add(1, Ordering::SeqCst);
        }
    }

    let arr: FlexArr<Counted> = (0..5).map(Counted).collect();
    let mut iter = arr.into_iter();
    drop(iter.next());
    drop(iter.next_back());
    assert_eq!(DROPS.load(Ordering::SeqCst), 2);

    drop(iter);
    assert_eq!(DROPS.load(Ordering::SeqCst), 5);
}

#[test]
fn flexarr_zero_sized_elements() {
    #[derive(PartialEq, Debug)]
    struct Unit;

    let mut arr = FlexArr::new();
    for _ in 0..100 {
        arr.push(Unit);
    }
    assert_eq!(arr.len(), 100);
    check_invariants(&arr);

    assert_eq!(arr.pop(), Some(Unit));
    assert_eq!(arr.remove_range(0, 50), 50);
    assert_eq!(arr.len(), 49);
    assert_eq!(arr.iter().count(), 49);
}

#[test]
fn flexarr_macro_forms() {
    let arr: FlexArr<i32> = flexarr![];
    assert!(arr.is_empty());

    let arr = flexarr![1; 4];
    assert_eq!(arr, [1, 1, 1, 1]);

    let arr = flexarr![1, 2, 3,];
    assert_eq!(arr, [1, 2, 3]);
}

#[test]
fn flexarr_error_display() {
    let err = ArrayError::OutOfRange { index: 9, len: 4 };
    assert_eq!(err.to_string(), "index (is 9) should be < len (is 4)");

    let err = ArrayError::InvalidArgument { what: "capacity must be non-zero" };
    assert_eq!(err.to_string(), "invalid argument: capacity must be non-zero");
}

#[test]
fn flexarr_end_to_end_walk() {
    // Fill-construct, write by index, then the push/insert/remove walk.
    let mut arr = FlexArr::filled(5, 0).unwrap();
    for i in 0..arr.len() {
        arr[i] = i as i32;
    }
    assert_eq!(arr, [0, 1, 2, 3, 4]);

    arr.push(10);
    assert_eq!(arr, [0, 1, 2, 3, 4, 10]);

    arr.insert(0, 0).unwrap();
    assert_eq!(arr, [0, 0, 1, 2, 3, 4, 10]);

    assert_eq!(arr.remove(0), Ok(0));
    assert_eq!(arr, [0, 1, 2, 3, 4, 10]);
    check_invariants(&arr);
}
