use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Bound;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use threaded_rbtree::rbtree_map::{self, Entry};
use threaded_rbtree::{KeyNotFound, Natural, RBTreeMap, Reversed};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 10_000;

/// Generates keys from a range small enough to cause collisions.
fn key_strategy() -> impl Strategy<Value = i64> {
    -20_000i64..20_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

fn build(entries: &[(i64, i64)]) -> (RBTreeMap<i64, i64>, BTreeMap<i64, i64>) {
    let mut rb_map = RBTreeMap::new();
    let mut bt_map = BTreeMap::new();
    for (k, v) in entries {
        rb_map.insert_or_assign(*k, *v);
        bt_map.insert(*k, *v);
    }
    (rb_map, bt_map)
}

fn collect(map: &RBTreeMap<i64, i64>) -> Vec<(i64, i64)> {
    map.iter().map(|(&k, &v)| (k, v)).collect()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    InsertOrAssign(i64, i64),
    Erase(i64),
    Remove(i64),
    Get(i64),
    Find(i64),
    LowerBound(i64),
    UpperBound(i64),
    FirstKeyValue,
    LastKeyValue,
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        2 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::InsertOrAssign(k, v)),
        2 => key_strategy().prop_map(MapOp::Erase),
        2 => key_strategy().prop_map(MapOp::Remove),
        1 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::Find),
        1 => key_strategy().prop_map(MapOp::LowerBound),
        1 => key_strategy().prop_map(MapOp::UpperBound),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

// ─── Core operations ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both RBTreeMap and BTreeMap and
    /// asserts identical results at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut rb_map: RBTreeMap<i64, i64> = RBTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k, v) => {
                    let (position, inserted) = rb_map.insert(*k, *v);
                    prop_assert_eq!(inserted, !bt_map.contains_key(k), "insert({}, {})", k, v);
                    let expected = *bt_map.entry(*k).or_insert(*v);
                    prop_assert_eq!(rb_map.get_at(position), Some((k, &expected)));
                }
                MapOp::InsertOrAssign(k, v) => {
                    prop_assert_eq!(rb_map.insert_or_assign(*k, *v), bt_map.insert(*k, *v), "insert_or_assign({})", k);
                }
                MapOp::Erase(k) => {
                    let expected = usize::from(bt_map.remove(k).is_some());
                    prop_assert_eq!(rb_map.erase(k), expected, "erase({})", k);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(rb_map.remove_entry(k), bt_map.remove_entry(k), "remove_entry({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(rb_map.get(k), bt_map.get(k), "get({})", k);
                    prop_assert_eq!(rb_map.at(k).ok(), bt_map.get(k), "at({})", k);
                    prop_assert_eq!(rb_map.count(k), usize::from(bt_map.contains_key(k)));
                }
                MapOp::Find(k) => {
                    let position = rb_map.find(k);
                    prop_assert_eq!(rb_map.get_at(position), bt_map.get_key_value(k), "find({})", k);
                    prop_assert_eq!(rb_map.is_end(position), !bt_map.contains_key(k));
                }
                MapOp::LowerBound(k) => {
                    let position = rb_map.lower_bound(k);
                    prop_assert_eq!(rb_map.get_at(position), bt_map.range(k..).next(), "lower_bound({})", k);
                }
                MapOp::UpperBound(k) => {
                    let position = rb_map.upper_bound(k);
                    let expected = bt_map.range((Bound::Excluded(k), Bound::Unbounded)).next();
                    prop_assert_eq!(rb_map.get_at(position), expected, "upper_bound({})", k);
                }
                MapOp::FirstKeyValue => {
                    prop_assert_eq!(rb_map.first_key_value(), bt_map.first_key_value());
                }
                MapOp::LastKeyValue => {
                    prop_assert_eq!(rb_map.last_key_value(), bt_map.last_key_value());
                }
                MapOp::PopFirst => {
                    prop_assert_eq!(rb_map.pop_first(), bt_map.pop_first());
                }
                MapOp::PopLast => {
                    prop_assert_eq!(rb_map.pop_last(), bt_map.pop_last());
                }
            }
            prop_assert_eq!(rb_map.len(), bt_map.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(rb_map.is_empty(), bt_map.is_empty(), "is_empty mismatch after {:?}", op);
        }

        let expected: Vec<_> = bt_map.into_iter().collect();
        prop_assert_eq!(collect(&rb_map), expected);
    }

    /// Tests that iteration order matches BTreeMap after random insertions.
    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let (rb_map, bt_map) = build(&entries);

        let expected: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(collect(&rb_map), expected.clone());

        let rb_rev: Vec<_> = rb_map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        let bt_rev: Vec<_> = expected.into_iter().rev().collect();
        prop_assert_eq!(rb_rev, bt_rev);

        prop_assert!(rb_map.keys().eq(bt_map.keys()));
        prop_assert!(rb_map.values().eq(bt_map.values()));
        prop_assert_eq!(rb_map.iter().len(), bt_map.len());
    }

    /// Walks the map with positions in both directions.
    #[test]
    fn positions_walk_like_iterators(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let (rb_map, bt_map) = build(&entries);

        let mut forward = Vec::new();
        let mut position = rb_map.begin();
        while !rb_map.is_end(position) {
            let (k, v) = rb_map.get_at(position).unwrap();
            forward.push((*k, *v));
            position = rb_map.advance(position);
        }
        prop_assert_eq!(&forward, &bt_map.iter().map(|(&k, &v)| (k, v)).collect::<Vec<_>>());

        let mut backward = Vec::new();
        let mut position = rb_map.retreat(rb_map.end());
        while let Some((k, v)) = rb_map.get_at(position) {
            backward.push((*k, *v));
            position = rb_map.retreat(position);
        }
        forward.reverse();
        prop_assert_eq!(backward, forward);
        prop_assert_eq!(rb_map.advance(position), rb_map.begin());
    }

    /// Tests that iterators meeting from both ends yield every element once.
    #[test]
    fn iter_double_ended_meets_once(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE),
        pattern in proptest::collection::vec(any::<bool>(), 0..TEST_SIZE),
    ) {
        let (rb_map, bt_map) = build(&entries);

        let mut rb_iter = rb_map.iter();
        let mut bt_iter = bt_map.iter();
        for from_front in pattern.iter().copied().chain(std::iter::repeat(true)) {
            let (rb_next, bt_next) = if from_front {
                (rb_iter.next(), bt_iter.next())
            } else {
                (rb_iter.next_back(), bt_iter.next_back())
            };
            prop_assert_eq!(rb_next, bt_next);
            prop_assert_eq!(rb_iter.len(), bt_iter.len());
            if rb_next.is_none() {
                break;
            }
        }
        prop_assert_eq!(rb_iter.next(), None);
        prop_assert_eq!(rb_iter.next_back(), None);
    }

    #[test]
    fn range_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        lo in key_strategy(),
        hi in key_strategy(),
    ) {
        let (rb_map, bt_map) = build(&entries);
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

        let pairs = |r: rbtree_map::Range<'_, i64, i64>| r.map(|(&k, &v)| (k, v)).collect::<Vec<_>>();
        let bt_pairs = |r: std::collections::btree_map::Range<'_, i64, i64>| r.map(|(&k, &v)| (k, v)).collect::<Vec<_>>();

        prop_assert_eq!(pairs(rb_map.range(lo..=hi)), bt_pairs(bt_map.range(lo..=hi)), "range({}..={})", lo, hi);
        prop_assert_eq!(pairs(rb_map.range(lo..hi)), bt_pairs(bt_map.range(lo..hi)), "range({}..{})", lo, hi);
        prop_assert_eq!(pairs(rb_map.range(lo..)), bt_pairs(bt_map.range(lo..)), "range({}..)", lo);
        prop_assert_eq!(pairs(rb_map.range(..=hi)), bt_pairs(bt_map.range(..=hi)), "range(..={})", hi);
        prop_assert_eq!(pairs(rb_map.range(..)), bt_pairs(bt_map.range(..)), "range(..)");

        let rb_rev: Vec<_> = rb_map.range(lo..=hi).rev().map(|(&k, &v)| (k, v)).collect();
        let bt_rev: Vec<_> = bt_map.range(lo..=hi).rev().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(rb_rev, bt_rev, "range({}..={}).rev()", lo, hi);

        if lo < hi {
            let bounds = (Bound::Excluded(lo), Bound::Excluded(hi));
            prop_assert_eq!(pairs(rb_map.range(bounds)), bt_pairs(bt_map.range(bounds)));
        }
    }

    #[test]
    fn equal_range_brackets_matching_keys(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        probes in proptest::collection::vec(key_strategy(), 100),
    ) {
        let (rb_map, bt_map) = build(&entries);
        for k in &probes {
            let (low, high) = rb_map.equal_range(k);
            if bt_map.contains_key(k) {
                prop_assert_eq!(rb_map.get_at(low).map(|(k, _)| *k), Some(*k));
                prop_assert_eq!(rb_map.advance(low), high);
            } else {
                prop_assert_eq!(low, high);
            }
        }
    }

    #[test]
    fn remove_range_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        lo in key_strategy(),
        hi in key_strategy(),
    ) {
        let (mut rb_map, mut bt_map) = build(&entries);
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

        let removed = rb_map.remove_range(rb_map.lower_bound(&lo), rb_map.lower_bound(&hi));
        let doomed: Vec<i64> = bt_map.range(lo..hi).map(|(&k, _)| k).collect();
        for k in &doomed {
            bt_map.remove(k);
        }

        prop_assert_eq!(removed, doomed.len());
        prop_assert_eq!(collect(&rb_map), bt_map.into_iter().collect::<Vec<_>>());
    }

    /// Positions of surviving entries keep naming the same entry through removals.
    #[test]
    fn positions_survive_other_removals(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE),
        victims in proptest::collection::vec(key_strategy(), 0..TEST_SIZE),
    ) {
        let (mut rb_map, mut bt_map) = build(&entries);
        let positions: Vec<_> = bt_map.keys().map(|k| (*k, rb_map.find(k))).collect();

        for k in &victims {
            prop_assert_eq!(rb_map.remove(k), bt_map.remove(k));
        }

        for (k, position) in positions {
            if let Some(v) = bt_map.get(&k) {
                prop_assert_eq!(rb_map.get_at(position), Some((&k, v)));
            }
        }
    }

    #[test]
    fn retain_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let (mut rb_map, mut bt_map) = build(&entries);
        rb_map.retain(|k, v| (k ^ *v) % 3 != 0);
        bt_map.retain(|k, v| (k ^ *v) % 3 != 0);
        prop_assert_eq!(collect(&rb_map), bt_map.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn clear_empties_map(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let (mut rb_map, _) = build(&entries);
        rb_map.clear();
        prop_assert!(rb_map.is_empty());
        prop_assert_eq!(rb_map.begin(), rb_map.end());
        prop_assert_eq!(rb_map.iter().next(), None);

        rb_map.insert(1, 1);
        prop_assert_eq!(rb_map.first_key_value(), Some((&1, &1)));
    }

    #[test]
    fn entry_api_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        probes in proptest::collection::vec((key_strategy(), value_strategy()), 100),
    ) {
        let (mut rb_map, mut bt_map) = build(&entries);
        for (k, v) in &probes {
            let rb_value = *rb_map.entry(*k).and_modify(|e| *e = e.wrapping_add(1)).or_insert(*v);
            let bt_value = *bt_map.entry(*k).and_modify(|e| *e = e.wrapping_add(1)).or_insert(*v);
            prop_assert_eq!(rb_value, bt_value);
        }
        prop_assert_eq!(collect(&rb_map), bt_map.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn iter_mut_matches(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let (mut rb_map, mut bt_map) = build(&entries);
        for (k, v) in rb_map.iter_mut() {
            *v = v.wrapping_mul(3) ^ k;
        }
        for (k, v) in bt_map.iter_mut() {
            *v = v.wrapping_mul(3) ^ k;
        }
        prop_assert_eq!(collect(&rb_map), bt_map.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn clone_eq_and_hash_agree(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let (rb_map, _) = build(&entries);
        let copy = rb_map.clone();
        prop_assert_eq!(&copy, &rb_map);

        let hash = |map: &RBTreeMap<i64, i64>| {
            let mut hasher = DefaultHasher::new();
            map.hash(&mut hasher);
            hasher.finish()
        };
        prop_assert_eq!(hash(&copy), hash(&rb_map));
    }

    #[test]
    fn ord_matches_btreemap(
        a in proptest::collection::vec((key_strategy(), value_strategy()), 0..100),
        b in proptest::collection::vec((key_strategy(), value_strategy()), 0..100),
    ) {
        let (rb_a, bt_a) = build(&a);
        let (rb_b, bt_b) = build(&b);
        prop_assert_eq!(rb_a.cmp(&rb_b), bt_a.cmp(&bt_b));
        prop_assert_eq!(rb_a == rb_b, bt_a == bt_b);
    }

    #[test]
    fn reversed_comparator_mirrors_natural(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let (rb_map, _) = build(&entries);
        let mut reversed = RBTreeMap::with_comparator(Reversed(Natural));
        reversed.extend(rb_map.iter());

        let forward: Vec<_> = rb_map.iter().rev().collect();
        let backward: Vec<_> = reversed.iter().collect();
        prop_assert_eq!(forward, backward);
    }
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

#[test]
fn scenario_inserts_come_out_sorted() {
    let mut map = RBTreeMap::new();
    for key in [10, 5, 20, 1, 7, 15, 25] {
        map.insert(key, ());
    }
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 5, 7, 10, 15, 20, 25]);

    assert_eq!(map.erase(&10), 1);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 5, 7, 15, 20, 25]);
}

#[test]
fn subscript_twice_keeps_the_last_value() {
    let mut map: RBTreeMap<i32, &str> = RBTreeMap::new();
    *map.get_or_insert_default(5) = "x";
    *map.get_or_insert_default(5) = "y";
    assert_eq!(map.len(), 1);
    assert_eq!(map.at(&5), Ok(&"y"));
}

#[test]
fn erase_everything_leaves_begin_at_end() {
    let mut map: RBTreeMap<i32, i32> = (0..100).map(|i| (i, i)).collect();
    assert_eq!(map.remove_range(map.begin(), map.end()), 100);
    assert!(map.is_empty());
    assert_eq!(map.begin(), map.end());
}

#[test]
fn insert_then_erase_round_trips() {
    let mut map: RBTreeMap<i32, i32> = (0..10).map(|i| (i * 2, i)).collect();
    let (position, inserted) = map.insert(7, 70);
    assert!(inserted);
    assert_eq!(map.remove_at(position), Some((7, 70)));
    assert_eq!(map.find(&7), map.end());
}

#[test]
fn erasing_absent_key_twice_reports_zero() {
    let mut map = RBTreeMap::from([(1, 'a')]);
    assert_eq!(map.erase(&2), 0);
    assert_eq!(map.erase(&2), 0);
    assert_eq!(map.len(), 1);
}

#[test]
fn extremes_follow_insertion_order() {
    const N: i32 = 1_000;

    let ascending: RBTreeMap<i32, ()> = (1..=N).map(|k| (k, ())).collect();
    let descending: RBTreeMap<i32, ()> = (1..=N).rev().map(|k| (k, ())).collect();
    // Multiplying by a unit modulo a prime visits every residue once.
    let scrambled: RBTreeMap<i32, ()> = (1..=N).map(|k| ((k * 389) % 1_009, ())).collect();

    for map in [&ascending, &descending] {
        assert_eq!(map.get_at(map.begin()), Some((&1, &())));
        assert_eq!(map.get_at(map.retreat(map.end())), Some((&N, &())));
    }
    let min = *scrambled.keys().min().unwrap();
    let max = *scrambled.keys().max().unwrap();
    assert_eq!(scrambled.first_key_value(), Some((&min, &())));
    assert_eq!(scrambled.last_key_value(), Some((&max, &())));
}

#[test]
fn at_on_missing_key_is_an_error() {
    let map: RBTreeMap<i32, i32> = RBTreeMap::new();
    let err = map.at(&1).unwrap_err();
    assert_eq!(err, KeyNotFound);
    assert_eq!(err.to_string(), "key not found");
}

#[test]
fn entry_variants_are_exposed() {
    let mut map: RBTreeMap<&str, u32> = RBTreeMap::new();
    match map.entry("a") {
        Entry::Vacant(v) => assert_eq!(*v.insert(1), 1),
        Entry::Occupied(_) => unreachable!(),
    }
    match map.entry("a") {
        Entry::Occupied(o) => assert_eq!(o.remove(), 1),
        Entry::Vacant(_) => unreachable!(),
    }
    assert!(map.is_empty());
}

#[test]
fn large_maps_clear_without_recursion() {
    let mut map: RBTreeMap<u32, u32> = (0..200_000).map(|i| (i, i)).collect();
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.begin(), map.end());
}

// ─── Invalid range bounds panic tests ─────────────────────────────────────────

#[test]
#[should_panic(expected = "range start is greater than range end in RBTreeMap")]
fn range_start_greater_than_end_panics() {
    let map: RBTreeMap<i32, i32> = [(1, 1), (2, 2), (3, 3)].into_iter().collect();
    // Use tuple bounds to avoid clippy::reversed_empty_ranges lint
    let _: Vec<_> = map.range((Bound::Included(5), Bound::Included(3))).collect();
}

#[test]
#[should_panic(expected = "range start is greater than range end in RBTreeMap")]
fn range_excluded_excluded_same_bound_panics() {
    let map: RBTreeMap<i32, i32> = [(1, 1), (2, 2), (3, 3)].into_iter().collect();
    let _: Vec<_> = map.range((Bound::Excluded(2), Bound::Excluded(2))).collect();
}

// ─── Index<&Q> panic tests ────────────────────────────────────────────────────

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_missing_key_panics() {
    let map: RBTreeMap<i32, i32> = [(1, 1), (2, 2), (3, 3)].into_iter().collect();
    let _ = map[&999];
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_removed_key_panics() {
    let mut map: RBTreeMap<i32, i32> = [(1, 1), (2, 2), (3, 3)].into_iter().collect();
    map.remove(&2);
    let _ = map[&2];
}
