/// A strict weak order over `T`.
///
/// Two values are equivalent when neither is less than the other. The map never stores two
/// equivalent keys.
///
/// Implemented for [`Natural`], [`Reversed`], and any `Fn(&T, &T) -> bool` closure.
///
/// # Examples
///
/// ```
/// use threaded_rbtree::RBTreeMap;
///
/// // Order strings by length only; "ab" and "cd" are equivalent.
/// let mut map = RBTreeMap::with_comparator(|a: &&str, b: &&str| a.len() < b.len());
/// assert!(map.insert("ab", 1).1);
/// assert!(!map.insert("cd", 2).1);
/// assert_eq!(map.get(&"zz"), Some(&1));
/// ```
pub trait Compare<T: ?Sized> {
    /// Returns `true` if `a` is ordered strictly before `b`.
    fn less(&self, a: &T, b: &T) -> bool;

    /// Returns `true` if neither value is ordered before the other.
    fn equivalent(&self, a: &T, b: &T) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }
}

/// The order given by [`Ord`]. This is the default comparator of [`RBTreeMap`](crate::RBTreeMap).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<T: ?Sized + Ord> Compare<T> for Natural {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Reverses the order of the wrapped comparator.
///
/// # Examples
///
/// ```
/// use threaded_rbtree::{Natural, RBTreeMap, Reversed};
///
/// let mut map = RBTreeMap::with_comparator(Reversed(Natural));
/// map.insert(1, "a");
/// map.insert(3, "c");
/// map.insert(2, "b");
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, [3, 2, 1]);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reversed<C>(pub C);

impl<T: ?Sized, C: Compare<T>> Compare<T> for Reversed<C> {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self.0.less(b, a)
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}
