use core::borrow::Borrow;

use super::RBTreeMap;
use crate::compare::Compare;
use crate::raw::Handle;

/// A bidirectional cursor into an [`RBTreeMap`].
///
/// A position names either an entry or one of the map's two boundaries: the *end* position one
/// past the last entry, and the *reverse end* one before the first. Positions are plain tokens;
/// they do not borrow the map and are resolved by passing them back to the map that produced
/// them.
///
/// Inserting never invalidates a position. Removing an entry invalidates only the positions of
/// that entry; every other position keeps naming the same entry, even when its node is moved
/// within the tree by the removal.
///
/// Using a position with a different map, or after its entry was removed, is a logic error. The
/// result may be a panic or a position naming some other entry, but never undefined behavior.
///
/// # Examples
///
/// ```
/// use threaded_rbtree::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
/// let first = map.begin();
/// assert_eq!(map.get_at(first), Some((&1, &"a")));
///
/// let second = map.advance(first);
/// assert_eq!(map.get_at(second), Some((&2, &"b")));
/// assert!(map.is_end(map.advance(second)));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Position(pub(crate) Handle);

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Returns the position of the first entry, or [`end`](Self::end) if the map is empty.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn begin(&self) -> Position {
        Position(self.raw.first())
    }

    /// Returns the position one past the last entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<i32, i32> = RBTreeMap::new();
    /// assert_eq!(map.begin(), map.end());
    ///
    /// map.insert(1, 1);
    /// assert_ne!(map.begin(), map.end());
    /// assert_eq!(map.retreat(map.end()), map.begin());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn end(&self) -> Position {
        Position(Handle::TAIL)
    }

    /// Returns `true` if `position` is [`end`](Self::end).
    #[must_use]
    pub fn is_end(&self, position: Position) -> bool {
        position.0 == Handle::TAIL
    }

    /// Returns the position after `position`.
    ///
    /// Advancing the last entry yields [`end`](Self::end); advancing the reverse end yields
    /// [`begin`](Self::begin). Advancing `end` itself wraps back onto the last entry, which is a
    /// logic error in the caller.
    ///
    /// # Complexity
    ///
    /// O(1) amortized, O(log n) worst case.
    #[must_use]
    pub fn advance(&self, position: Position) -> Position {
        Position(self.raw.advance(position.0))
    }

    /// Returns the position before `position`.
    ///
    /// Retreating from [`end`](Self::end) yields the last entry; retreating from
    /// [`begin`](Self::begin) yields the reverse end.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, 'a'), (2, 'b'), (3, 'c')]);
    /// let mut position = map.end();
    /// let mut keys = Vec::new();
    /// loop {
    ///     position = map.retreat(position);
    ///     match map.get_at(position) {
    ///         Some((key, _)) => keys.push(*key),
    ///         None => break,
    ///     }
    /// }
    /// assert_eq!(keys, [3, 2, 1]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) amortized, O(log n) worst case.
    #[must_use]
    pub fn retreat(&self, position: Position) -> Position {
        Position(self.raw.retreat(position.0))
    }

    /// Returns the entry at `position`, or `None` if it is a boundary.
    ///
    /// # Panics
    ///
    /// Panics if the entry at `position` has been removed and its slot not reused.
    #[must_use]
    pub fn get_at(&self, position: Position) -> Option<(&K, &V)> {
        self.raw.entry(position.0)
    }

    /// Returns the entry at `position` with a mutable value, or `None` if it is a boundary.
    ///
    /// # Panics
    ///
    /// Panics if the entry at `position` has been removed and its slot not reused.
    pub fn get_at_mut(&mut self, position: Position) -> Option<(&K, &mut V)> {
        self.raw.entry_mut(position.0)
    }

    /// Removes the entry at `position` and returns it.
    ///
    /// Returns `None` for a boundary or a position whose entry is already gone. All other
    /// positions stay valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let last = map.find(&3);
    /// let (position, _) = map.insert(4, "d");
    /// assert_eq!(map.remove_at(position), Some((4, "d")));
    /// assert_eq!(map.get_at(last), Some((&3, &"c")));
    /// assert_eq!(map.remove_at(map.end()), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_at(&mut self, position: Position) -> Option<(K, V)> {
        let handle = position.0;
        if handle.is_boundary() || !self.raw.contains_handle(handle) {
            return None;
        }
        Some(self.raw.remove_node(handle))
    }

    /// Removes the entries in the half-open run `[first, last)` and returns how many were removed.
    ///
    /// `first` must not come after `last`. Removal stops at [`end`](Self::end) regardless.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<i32, i32> = (0..10).map(|i| (i, i)).collect();
    /// let removed = map.remove_range(map.find(&3), map.find(&7));
    /// assert_eq!(removed, 4);
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [0, 1, 2, 7, 8, 9]);
    ///
    /// assert_eq!(map.remove_range(map.begin(), map.end()), 6);
    /// assert!(map.is_empty());
    /// assert_eq!(map.begin(), map.end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(k log n) for k removed entries.
    pub fn remove_range(&mut self, first: Position, last: Position) -> usize {
        let mut removed = 0;
        let mut current = first.0;
        while current != last.0 && current != Handle::TAIL {
            let next = self.raw.advance(current);
            if !current.is_boundary() {
                self.raw.remove_node(current);
                removed += 1;
            }
            current = next;
        }
        removed
    }

    /// Returns the position of the entry whose key is equivalent to `key`, or
    /// [`end`](Self::end) if there is none.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn find<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        Position(self.raw.search(key, &self.compare).unwrap_or(Handle::TAIL))
    }

    /// Returns the position of the first entry whose key is not ordered before `key`, or
    /// [`end`](Self::end) if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(10, 'a'), (20, 'b'), (30, 'c')]);
    /// assert_eq!(map.get_at(map.lower_bound(&20)), Some((&20, &'b')));
    /// assert_eq!(map.get_at(map.lower_bound(&21)), Some((&30, &'c')));
    /// assert!(map.is_end(map.lower_bound(&31)));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn lower_bound<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        Position(self.raw.lower_bound(key, &self.compare))
    }

    /// Returns the position of the first entry whose key is ordered after `key`, or
    /// [`end`](Self::end) if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_rbtree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(10, 'a'), (20, 'b'), (30, 'c')]);
    /// assert_eq!(map.get_at(map.upper_bound(&20)), Some((&30, &'c')));
    /// assert_eq!(map.get_at(map.upper_bound(&0)), Some((&10, &'a')));
    /// assert!(map.is_end(map.upper_bound(&30)));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn upper_bound<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        Position(self.raw.upper_bound(key, &self.compare))
    }

    /// Returns `(lower_bound(key), upper_bound(key))`, the run of entries equivalent to `key`.
    ///
    /// The run holds at most one entry since keys are unique.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn equal_range<Q>(&self, key: &Q) -> (Position, Position)
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        (self.lower_bound(key), self.upper_bound(key))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::{Natural, RBTreeMap};
    use alloc::vec::Vec;

    fn scenario() -> RBTreeMap<i32, i32> {
        [10, 5, 20, 1, 7, 15, 25].into_iter().map(|k| (k, k * 10)).collect()
    }

    #[test]
    fn boundaries_bracket_the_entries() {
        let map = scenario();
        let reverse_end = map.retreat(map.begin());
        assert_eq!(map.get_at(reverse_end), None);
        assert!(!map.is_end(reverse_end));
        assert_eq!(map.advance(reverse_end), map.begin());
        assert_eq!(map.get_at(map.retreat(map.end())), Some((&25, &250)));
    }

    #[test]
    fn advancing_visits_every_key() {
        let map = scenario();
        let mut keys = Vec::new();
        let mut position = map.begin();
        while !map.is_end(position) {
            keys.push(*map.get_at(position).unwrap().0);
            position = map.advance(position);
        }
        assert_eq!(keys, [1, 5, 7, 10, 15, 20, 25]);
    }

    #[test]
    fn positions_survive_removal_of_other_entries() {
        let mut map = scenario();
        let positions: Vec<_> = [1, 5, 7, 15, 20, 25].iter().map(|k| (*k, map.find(k))).collect();

        assert_eq!(map.remove_at(map.find(&10)), Some((10, 100)));
        map.raw.validate_invariants(&Natural);

        for (key, position) in positions {
            assert_eq!(map.get_at(position), Some((&key, &(key * 10))));
        }
    }

    #[test]
    fn erased_position_reports_nothing() {
        let mut map = scenario();
        let position = map.find(&7);
        assert!(map.remove_at(position).is_some());
        assert_eq!(map.remove_at(position), None);
        assert_eq!(map.len(), 6);
    }

    #[test]
    fn insert_then_remove_at_round_trips() {
        let mut map = scenario();
        let (position, inserted) = map.insert(12, 120);
        assert!(inserted);
        assert_eq!(map.remove_at(position), Some((12, 120)));
        assert!(map.is_end(map.find(&12)));
        map.raw.validate_invariants(&Natural);
    }

    #[test]
    fn find_misses_return_end() {
        let map = scenario();
        assert_eq!(map.find(&11), map.end());
        let empty: RBTreeMap<i32, i32> = RBTreeMap::new();
        assert_eq!(empty.find(&1), empty.end());
        assert_eq!(empty.lower_bound(&1), empty.end());
    }

    #[test]
    fn equal_range_brackets_one_entry() {
        let map = scenario();
        let (low, high) = map.equal_range(&15);
        assert_eq!(map.get_at(low), Some((&15, &150)));
        assert_eq!(map.advance(low), high);

        let (low, high) = map.equal_range(&16);
        assert_eq!(low, high);
        assert_eq!(map.get_at(low), Some((&20, &200)));
    }

    #[test]
    fn remove_whole_range_empties_the_map() {
        let mut map = scenario();
        assert_eq!(map.remove_range(map.begin(), map.end()), 7);
        assert!(map.is_empty());
        assert_eq!(map.begin(), map.end());
        map.raw.validate_invariants(&Natural);
    }

    #[test]
    fn remove_empty_range_is_a_no_op() {
        let mut map = scenario();
        let position = map.find(&7);
        assert_eq!(map.remove_range(position, position), 0);
        assert_eq!(map.len(), 7);
    }

    #[test]
    fn get_at_mut_updates_in_place() {
        let mut map = scenario();
        let position = map.find(&5);
        if let Some((_, value)) = map.get_at_mut(position) {
            *value = -5;
        }
        assert_eq!(map.get(&5), Some(&-5));
        assert_eq!(map.get_at_mut(map.end()), None);
    }
}
