use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem;
use core::ops::{Bound, Index, RangeBounds};

use crate::compare::{Compare, Natural};
use crate::error::KeyNotFound;
use crate::raw::{Arena, Handle, Node, RawRBTreeMap, Span};

mod capacity;
mod entry;
mod position;

pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use position::Position;

/// Validates that the start bound does not come after the end bound.
///
/// # Panics
///
/// Panics if `start > end` or if `start == end` and both bounds are `Excluded`.
fn validate_range_bounds<T, C, R>(compare: &C, range: &R)
where
    T: ?Sized,
    C: Compare<T>,
    R: RangeBounds<T>,
{
    if let (Bound::Included(start) | Bound::Excluded(start), Bound::Included(end) | Bound::Excluded(end)) =
        (range.start_bound(), range.end_bound())
    {
        let valid =
            if matches!(range.start_bound(), Bound::Excluded(_)) && matches!(range.end_bound(), Bound::Excluded(_)) {
                compare.less(start, end)
            } else {
                !compare.less(end, start)
            };
        assert!(valid, "range start is greater than range end in RBTreeMap");
    }
}

/// An ordered map based on a [red-black tree].
///
/// Entries are kept in the order given by the comparator `C`, a strict weak order over the keys
/// (see [`Compare`]). The default, [`Natural`], uses the key's [`Ord`] implementation. Two keys
/// that are equivalent under the comparator are the same key: the map never holds both.
///
/// Lookups, insertion, and removal take O(log n) time. Every node lives in an arena and refers to
/// its neighbors by index. Two permanent boundary nodes hang off the minimum and maximum entries,
/// so the first and last entries are found in O(1) and stepping through the map never needs a
/// stack or recursion.
///
/// Besides the usual iterators, the map hands out [`Position`]s: `Copy` cursors that can be
/// stepped in both directions and stay valid across insertions and across removal of other
/// entries.
///
/// It is a logic error for a key to be modified in such a way that its order relative to any
/// other key changes while it is in the map. The behavior resulting from such a logic error is
/// not specified, but will be encapsulated to the `RBTreeMap` that observed it and not result in
/// undefined behavior.
///
/// # Examples
///
/// ```
/// use threaded_rbtree::RBTreeMap;
///
/// // type inference lets us omit an explicit type signature (which
/// // would be `RBTreeMap<&str, &str>` in this example).
/// let mut movie_reviews = RBTreeMap::new();
///
/// // review some movies.
/// movie_reviews.insert("Office Space",       "Deals with real issues in the workplace.");
/// movie_reviews.insert("Pulp Fiction",       "Masterpiece.");
/// movie_reviews.insert("The Godfather",      "Very enjoyable.");
/// movie_reviews.insert("The Blues Brothers", "Eye lyked it a lot.");
///
/// // check for a specific one.
/// if !movie_reviews.contains_key("Les Miserables") {
///     println!("We've got {} reviews, but Les Miserables ain't one.",
///              movie_reviews.len());
/// }
///
/// // oops, this review has a lot of spelling mistakes, let's delete it.
/// assert_eq!(movie_reviews.erase("The Blues Brothers"), 1);
///
/// // `at` reports missing keys as an error.
/// assert!(movie_reviews.at("Up!").is_err());
/// assert_eq!(movie_reviews.at("Pulp Fiction"), Ok(&"Masterpiece."));
///
/// // Look up the value for a key (will panic if the key is not found).
/// println!("Movie review: {}", movie_reviews["Office Space"]);
///
/// // iterate over everything.
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// ```
///
/// A map with a custom order:
///
/// ```
/// use threaded_rbtree::{Natural, RBTreeMap, Reversed};
///
/// let mut countdown = RBTreeMap::with_comparator(Reversed(Natural));
/// countdown.extend([(1, "liftoff"), (3, "three"), (2, "two")]);
/// let order: Vec<_> = countdown.values().copied().collect();
/// assert_eq!(order, ["three", "two", "liftoff"]);
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RBTreeMap<K, V, C = Natural> {
    raw: RawRBTreeMap<K, V>,
    compare: C,
}

/// An iterator over the entries of an `RBTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use threaded_rbtree::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RBTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    raw: Option<&'a RawRBTreeMap<K, V>>,
    span: Span,
    remaining: usize,
}

/// A mutable iterator over the entries of an `RBTreeMap`.
///
/// This `struct` is created by the [`iter_mut`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// [`iter_mut`]: RBTreeMap::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K: 'a, V: 'a> {
    nodes: Option<&'a Arena<Node<K>>>,
    values: *mut Arena<V>,
    span: Span,
    remaining: usize,
    _marker: PhantomData<&'a mut V>,
}

// SAFETY: IterMut hands out `&K` and `&mut V`, so it may move to another thread when `&K` and
// `&mut V` may, and be shared when `&K` and `&V` may.
unsafe impl<K: Sync, V: Send> Send for IterMut<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for IterMut<'_, K, V> {}

/// An owning iterator over the entries of an `RBTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`RBTreeMap`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of an `RBTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// [`keys`]: RBTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an `RBTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// [`values`]: RBTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// A mutable iterator over the values of an `RBTreeMap`.
///
/// This `struct` is created by the [`values_mut`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// [`values_mut`]: RBTreeMap::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

/// An owning iterator over the keys of an `RBTreeMap`.
///
/// This `struct` is created by the [`into_keys`] method on [`RBTreeMap`].
///
/// [`into_keys`]: RBTreeMap::into_keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoKeys<K, V> {
    inner: IntoIter<K, V>,
}

/// An owning iterator over the values of an `RBTreeMap`.
///
/// This `struct` is created by the [`into_values`] method on [`RBTreeMap`].
///
/// [`into_values`]: RBTreeMap::into_values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoValues<K, V> {
    inner: IntoIter<K, V>,
}

/// An iterator over a sub-range of entries in an `RBTreeMap`.
///
/// This `struct` is created by the [`range`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// [`range`]: RBTreeMap::range
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, K: 'a, V: 'a> {
    raw: Option<&'a RawRBTreeMap<K, V>>,
    span: Span,
}

impl<K, V> RBTreeMap<K, V> {
    /// Makes a new, empty `RBTreeMap` ordered by [`Ord`].
    ///
    /// Allocates the two boundary nodes.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub fn new() -> RBTreeMap<K, V> {
        RBTreeMap::with_comparator(Natural)
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Makes a new, empty `RBTreeMap` ordered by `compare`.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::with_comparator(|a: &i32, b: &i32| a.abs() < b.abs());
    /// map.insert(-3, "minus three");
    /// map.insert(2, "two");
    /// assert!(!map.insert(3, "three").1);
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [2, -3]);
    /// ```
    #[must_use]
    pub fn with_comparator(compare: C) -> Self {
        RBTreeMap {
            raw: RawRBTreeMap::new(),
            compare,
        }
    }

    /// Returns a reference to the comparator ordering this map.
    #[must_use]
    pub fn comparator(&self) -> &C {
        &self.compare
    }

    /// Returns a predicate ordering `(key, value)` pairs by their keys alone.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "z"), (2, "a")]);
    /// let less = map.value_comp();
    /// assert!(less((&1, &"z"), (&2, &"a")));
    /// assert!(!less((&2, &"a"), (&2, &"b")));
    /// ```
    #[must_use]
    pub fn value_comp(&self) -> impl Fn((&K, &V), (&K, &V)) -> bool + '_
    where
        C: Compare<K>,
    {
        move |a, b| self.compare.less(a.0, b.0)
    }

    /// Clears the map, removing all elements.
    ///
    /// Runs without recursion, so arbitrarily large maps can be cleared.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// assert_eq!(a.begin(), a.end());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Exchanges the contents of two maps, comparators included.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::from([(1, 'a')]);
    /// let mut b = RBTreeMap::from([(2, 'b'), (3, 'c')]);
    /// a.swap(&mut b);
    /// assert_eq!(a.len(), 2);
    /// assert_eq!(b.first_key_value(), Some((&1, &'a')));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[allow(clippy::must_use_candidate)]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.entry(self.raw.first())
    }

    /// Removes and returns the first element in the map.
    /// The key of this element is the minimum key that was in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// while let Some((key, _val)) = map.pop_first() {
    ///     assert!(map.iter().all(|(k, _v)| *k > key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.raw.first();
        (!first.is_boundary()).then(|| self.raw.remove_node(first))
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.last_key_value(), Some((&2, &"a")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[allow(clippy::must_use_candidate)]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.entry(self.raw.last())
    }

    /// Removes and returns the last element in the map.
    /// The key of this element is the maximum key that was in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.raw.last();
        (!last.is_boundary()).then(|| self.raw.remove_node(last))
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all pairs `(k, v)` for which `f(&k, &mut v)` returns `false`.
    /// The elements are visited in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// // Keep only the elements with even-numbered keys.
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert!(map.into_iter().eq(vec![(0, 0), (2, 20), (4, 40), (6, 60)]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n log n) in the worst case (when many elements are removed).
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        // Removal frees only the removed node, so the saved successor stays valid.
        let mut current = self.raw.first();
        while current != Handle::TAIL {
            let next = self.raw.advance(current);
            let keep = match self.raw.entry_mut(current) {
                Some((key, value)) => f(key, value),
                None => true,
            };
            if !keep {
                self.raw.remove_node(current);
            }
            current = next;
        }
    }

    /// Creates a consuming iterator visiting all the keys, in sorted order.
    /// The map cannot be used after calling this.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert(2, "b");
    /// a.insert(1, "a");
    ///
    /// let keys: Vec<i32> = a.into_keys().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys {
            inner: self.into_iter(),
        }
    }

    /// Creates a consuming iterator visiting all the values, in order by key.
    /// The map cannot be used after calling this.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn into_values(self) -> IntoValues<K, V> {
        IntoValues {
            inner: self.into_iter(),
        }
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    ///
    /// let reversed: Vec<_> = map.iter().rev().map(|(k, _)| *k).collect();
    /// assert_eq!(reversed, [3, 2, 1]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) to create the iterator; O(1) amortized per step.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            raw: Some(&self.raw),
            span: self.raw.span(),
            remaining: self.raw.len(),
        }
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([
    ///    ("a", 1),
    ///    ("b", 2),
    ///    ("c", 3),
    /// ]);
    ///
    /// // add 10 to the value if the key isn't "a"
    /// for (key, value) in map.iter_mut() {
    ///     if key != &"a" {
    ///         *value += 10;
    ///     }
    /// }
    /// assert_eq!(map.values().copied().collect::<Vec<_>>(), [1, 12, 13]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) to create the iterator; O(1) amortized per step.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let span = self.raw.span();
        let remaining = self.raw.len();
        let (nodes, values) = self.raw.split_mut();
        IterMut {
            nodes: Some(nodes),
            values: core::ptr::from_mut(values),
            span,
            remaining,
            _marker: PhantomData,
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert(2, "b");
    /// a.insert(1, "a");
    ///
    /// let keys: Vec<_> = a.keys().cloned().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.iter(),
        }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert(1, "hello");
    /// a.insert(2, "goodbye");
    ///
    /// let values: Vec<&str> = a.values().cloned().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.iter(),
        }
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert(1, String::from("hello"));
    /// a.insert(2, String::from("goodbye"));
    ///
    /// for value in a.values_mut() {
    ///     value.push_str("!");
    /// }
    ///
    /// let values: Vec<String> = a.values().cloned().collect();
    /// assert_eq!(values, [String::from("hello!"), String::from("goodbye!")]);
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the largest number of entries any map of this type can hold.
    ///
    /// Inserting beyond this panics.
    #[must_use]
    pub const fn max_len(&self) -> usize {
        RawRBTreeMap::<K, V>::MAX_LEN
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Inserts a key-value pair unless an equivalent key is already present.
    ///
    /// Returns the position of the entry holding the key, and `true` if the pair was inserted.
    /// An existing entry is left untouched and `value` is dropped; use
    /// [`insert_or_assign`](Self::insert_or_assign) to overwrite.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// let (position, inserted) = map.insert(37, "a");
    /// assert!(inserted);
    /// assert_eq!(map.get_at(position), Some((&37, &"a")));
    ///
    /// let (again, inserted) = map.insert(37, "b");
    /// assert!(!inserted);
    /// assert_eq!(again, position);
    /// assert_eq!(map[&37], "a");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool)
    where
        C: Compare<K>,
    {
        let (handle, inserted) = self.raw.insert(key, value, &self.compare);
        (Position(handle), inserted)
    }

    /// Inserts a key-value pair, overwriting the value of an equivalent key.
    ///
    /// Returns the previous value, if any. The stored key is not replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.insert_or_assign(37, "a"), None);
    /// assert_eq!(map.insert_or_assign(37, "c"), Some("a"));
    /// assert_eq!(map[&37], "c");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Option<V>
    where
        C: Compare<K>,
    {
        match self.raw.search_insert(&key, &self.compare) {
            Ok(handle) => Some(mem::replace(self.raw.value_mut(handle), value)),
            Err(point) => {
                self.raw.insert_at(point, key, value);
                None
            }
        }
    }

    /// Gets the given key's corresponding entry in the map for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut count: RBTreeMap<&str, usize> = RBTreeMap::new();
    ///
    /// // count the number of occurrences of letters in the vec
    /// for x in ["a", "b", "a", "c", "a", "b"] {
    ///     count.entry(x).and_modify(|curr| *curr += 1).or_insert(1);
    /// }
    ///
    /// assert_eq!(count["a"], 3);
    /// assert_eq!(count["b"], 2);
    /// assert_eq!(count["c"], 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V>
    where
        C: Compare<K>,
    {
        match self.raw.search_insert(&key, &self.compare) {
            Ok(handle) => Entry::Occupied(OccupiedEntry {
                handle,
                tree: &mut self.raw,
            }),
            Err(point) => Entry::Vacant(VacantEntry {
                key,
                point,
                tree: &mut self.raw,
            }),
        }
    }

    /// Returns a mutable reference to the value for `key`, inserting `V::default()` first if the
    /// key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<i32, &str> = RBTreeMap::new();
    /// *map.get_or_insert_default(5) = "x";
    /// *map.get_or_insert_default(5) = "y";
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.at(&5), Ok(&"y"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        C: Compare<K>,
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, as long as the comparator
    /// orders the borrowed form the same way.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let handle = self.raw.search(key, &self.compare)?;
        Some(self.raw.value(handle))
    }

    /// Returns the key-value pair corresponding to the supplied key.
    ///
    /// The returned key is the one stored in the map, which may differ from an equivalent `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::with_comparator(|a: &&str, b: &&str| {
    ///     a.to_lowercase() < b.to_lowercase()
    /// });
    /// map.insert("Paris", 1);
    /// assert_eq!(map.get_key_value(&"PARIS"), Some((&"Paris", &1)));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let handle = self.raw.search(key, &self.compare)?;
        self.raw.entry(handle)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let handle = self.raw.search(key, &self.compare)?;
        Some(self.raw.value_mut(handle))
    }

    /// Returns a reference to the value corresponding to the key, or [`KeyNotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`KeyNotFound`] if no entry has a key equivalent to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::{KeyNotFound, RBTreeMap};
    ///
    /// let map = RBTreeMap::from([(1, "a")]);
    /// assert_eq!(map.at(&1), Ok(&"a"));
    /// assert_eq!(map.at(&2), Err(KeyNotFound));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn at<Q>(&self, key: &Q) -> Result<&V, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.get(key).ok_or(KeyNotFound)
    }

    /// Returns a mutable reference to the value corresponding to the key, or [`KeyNotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`KeyNotFound`] if no entry has a key equivalent to `key`.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.get_mut(key).ok_or(KeyNotFound)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.raw.search(key, &self.compare).is_some()
    }

    /// Returns the number of entries whose key is equivalent to `key`: `0` or `1`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        usize::from(self.contains_key(key))
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if the key
    /// was previously in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.raw.remove(key, &self.compare)
    }

    /// Removes the entry for `key` and returns how many entries were removed: `0` or `1`.
    ///
    /// Removing an absent key is not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a")]);
    /// assert_eq!(map.erase(&1), 1);
    /// assert_eq!(map.erase(&1), 0);
    /// assert_eq!(map.erase(&1), 0);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        usize::from(self.remove_entry(key).is_some())
    }

    /// Constructs a double-ended iterator over a sub-range of elements in the map.
    /// The simplest way is to use the range syntax `min..max`, thus `range(min..max)` will
    /// yield elements from min (inclusive) to max (exclusive).
    /// The range may also be entered as `(Bound<T>, Bound<T>)`, so for example
    /// `range((Excluded(4), Included(10)))` will yield a left-exclusive, right-inclusive
    /// range from 4 to 10.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`.
    /// Panics if range `start == end` and both bounds are `Excluded`.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::ops::Bound::Included;
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(3, "a");
    /// map.insert(5, "b");
    /// map.insert(8, "c");
    /// for (&key, &value) in map.range((Included(&4), Included(&8))) {
    ///     println!("{key}: {value}");
    /// }
    /// assert_eq!(Some((&5, &"b")), map.range(4..).next());
    /// assert_eq!(Some((&5, &"b")), map.range(..8).next_back());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; O(1) amortized per step.
    pub fn range<T, R>(&self, range: R) -> Range<'_, K, V>
    where
        T: ?Sized,
        K: Borrow<T>,
        C: Compare<T>,
        R: RangeBounds<T>,
    {
        validate_range_bounds(&self.compare, &range);

        let front = match range.start_bound() {
            Bound::Included(start) => self.raw.lower_bound(start, &self.compare),
            Bound::Excluded(start) => self.raw.upper_bound(start, &self.compare),
            Bound::Unbounded => self.raw.first(),
        };
        let end = match range.end_bound() {
            Bound::Included(end) => self.raw.upper_bound(end, &self.compare),
            Bound::Excluded(end) => self.raw.lower_bound(end, &self.compare),
            Bound::Unbounded => Handle::TAIL,
        };

        Range {
            raw: Some(&self.raw),
            span: Span::new(front, end),
        }
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RBTreeMap<K, V, C> {
    fn clone(&self) -> Self {
        RBTreeMap {
            raw: self.raw.clone(),
            compare: self.compare.clone(),
        }
    }
}

impl<K: Hash, V: Hash, C> Hash for RBTreeMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RBTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C> Eq for RBTreeMap<K, V, C> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for RBTreeMap<K, V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord, C> Ord for RBTreeMap<K, V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RBTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for RBTreeMap<K, V, C> {
    fn default() -> Self {
        RBTreeMap::with_comparator(C::default())
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for RBTreeMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = RBTreeMap::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for RBTreeMap<K, V, C> {
    /// Inserts every pair; a later pair overwrites the value of an earlier equivalent key.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert_or_assign(k, v);
        }
    }
}

impl<'a, K: Copy, V: Copy, C: Compare<K>> Extend<(&'a K, &'a V)> for RBTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert_or_assign(k, v);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a RBTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut RBTreeMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, C> IntoIterator for RBTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, Q, V, C> Index<&Q> for RBTreeMap<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Compare<Q>,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RBTreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let raw = self.raw?;
        let handle = self.span.next(raw.nodes())?;
        self.remaining -= 1;
        raw.entry(handle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let raw = self.raw?;
        let handle = self.span.next_back(raw.nodes())?;
        self.remaining -= 1;
        raw.entry(handle)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Default for Iter<'_, K, V> {
    /// Creates an empty `rbtree_map::Iter`.
    ///
    /// ```
    /// # use threaded_rbtree::rbtree_map;
    /// let iter: rbtree_map::Iter<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            raw: None,
            span: Span::EMPTY,
            remaining: 0,
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            raw: self.raw,
            span: self.span,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> IterMut<'a, K, V> {
    fn yield_handle(&mut self, handle: Handle) -> Option<(&'a K, &'a mut V)> {
        let node = self.nodes?.get(handle);
        let key = node.key()?;
        let value = node.value()?;
        self.remaining -= 1;
        // SAFETY: `values` came from the `&'a mut` borrow in `iter_mut`, and the span yields each
        // node at most once, so no other reference to this value is alive. Keys are read from the
        // node arena, which is never written through `values`.
        Some((key, unsafe { Arena::get_mut_ptr(self.values, value) }))
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.span.next(self.nodes?)?;
        self.yield_handle(handle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.span.next_back(self.nodes?)?;
        self.yield_handle(handle)
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K, V> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish()
    }
}

impl<K, V> Default for IterMut<'_, K, V> {
    /// Creates an empty `rbtree_map::IterMut`.
    ///
    /// ```
    /// # use threaded_rbtree::rbtree_map;
    /// let iter: rbtree_map::IterMut<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IterMut {
            nodes: None,
            values: core::ptr::null_mut(),
            span: Span::EMPTY,
            remaining: 0,
            _marker: PhantomData,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<K, V> Default for IntoIter<K, V> {
    /// Creates an empty `rbtree_map::IntoIter`.
    ///
    /// ```
    /// # use threaded_rbtree::rbtree_map;
    /// let iter: rbtree_map::IntoIter<u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoIter {
            inner: alloc::vec::Vec::new().into_iter(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Default for Keys<'_, K, V> {
    fn default() -> Self {
        Keys {
            inner: Iter::default(),
        }
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> Default for Values<'_, K, V> {
    fn default() -> Self {
        Values {
            inner: Iter::default(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut").field("remaining", &self.inner.remaining).finish()
    }
}

impl<K, V> Default for ValuesMut<'_, K, V> {
    fn default() -> Self {
        ValuesMut {
            inner: IterMut::default(),
        }
    }
}

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for IntoKeys<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoKeys<K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for IntoKeys<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.inner.as_slice().iter().map(|(k, _)| k)).finish()
    }
}

impl<K, V> Default for IntoKeys<K, V> {
    fn default() -> Self {
        IntoKeys {
            inner: IntoIter::default(),
        }
    }
}

impl<K, V> Iterator for IntoValues<K, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoValues<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for IntoValues<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoValues<K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for IntoValues<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.inner.as_slice().iter().map(|(_, v)| v)).finish()
    }
}

impl<K, V> Default for IntoValues<K, V> {
    fn default() -> Self {
        IntoValues {
            inner: IntoIter::default(),
        }
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.raw?;
        let handle = self.span.next(raw.nodes())?;
        raw.entry(handle)
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for Range<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let raw = self.raw?;
        let handle = self.span.next_back(raw.nodes())?;
        raw.entry(handle)
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Range<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Default for Range<'_, K, V> {
    /// Creates an empty `rbtree_map::Range`.
    ///
    /// ```
    /// # use threaded_rbtree::rbtree_map;
    /// let iter: rbtree_map::Range<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.count(), 0);
    /// ```
    fn default() -> Self {
        Range {
            raw: None,
            span: Span::EMPTY,
        }
    }
}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Range {
            raw: self.raw,
            span: self.span,
        }
    }
}
