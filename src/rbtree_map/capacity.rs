use super::RBTreeMap;
use crate::compare::Natural;
use crate::raw::RawRBTreeMap;

impl<K, V> RBTreeMap<K, V> {
    /// Creates an empty map with room for at least `capacity` entries before reallocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTreeMap::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Creates an empty map ordered by `compare` with room for at least `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::{Natural, RBTreeMap, Reversed};
    ///
    /// let mut map = RBTreeMap::with_capacity_and_comparator(8, Reversed(Natural));
    /// map.insert(1, ());
    /// map.insert(2, ());
    /// assert_eq!(map.first_key_value(), Some((&2, &())));
    /// assert!(map.capacity() >= 8);
    /// ```
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, compare: C) -> Self {
        RBTreeMap {
            raw: RawRBTreeMap::with_capacity(capacity),
            compare,
        }
    }

    /// Returns how many entries the map can hold before reallocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::with_capacity(32);
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
