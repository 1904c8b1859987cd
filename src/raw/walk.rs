//! Sentinel-threaded stepping.
//!
//! The minimum node's left child is [`Handle::HEAD`] and the maximum node's right child is
//! [`Handle::TAIL`]. Each boundary's parent caches the extreme node it hangs off, which gives
//! O(1) access to both ends and lets the ordinary successor/predecessor walk land on (and come
//! back from) the boundaries without any special casing. On an empty tree the boundaries are
//! each other's parent.

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};

/// Returns the in-order successor of `handle`.
///
/// Stepping from a boundary follows its cached parent; from the maximum node this lands on
/// [`Handle::TAIL`].
pub(crate) fn advance<K>(nodes: &Arena<Node<K>>, handle: Handle) -> Handle {
    step(nodes, handle, Side::Right)
}

/// Returns the in-order predecessor of `handle`. Mirror of [`advance`].
pub(crate) fn retreat<K>(nodes: &Arena<Node<K>>, handle: Handle) -> Handle {
    step(nodes, handle, Side::Left)
}

fn step<K>(nodes: &Arena<Node<K>>, handle: Handle, toward: Side) -> Handle {
    let node = nodes.get(handle);
    if node.is_boundary() {
        return node.parent.expect("`walk::step()` - boundary is not bound!");
    }

    if let Some(child) = node.child(toward) {
        // A boundary child means `handle` is the extreme node on this side.
        if child.is_boundary() {
            return child;
        }
        return extreme(nodes, child, toward.opposite());
    }

    // Climb until we arrive from the side opposite to `toward`.
    let mut from = handle;
    let mut parent = node.parent;
    while let Some(current) = parent {
        let current_node = nodes.get(current);
        if current_node.child(toward.opposite()) == Some(from) {
            return current;
        }
        from = current;
        parent = current_node.parent;
    }
    panic!("`walk::step()` - ran off the root without reaching a boundary!")
}

/// Descends from `handle` to the last real node on `side`, stopping short of any boundary.
pub(crate) fn extreme<K>(nodes: &Arena<Node<K>>, mut handle: Handle, side: Side) -> Handle {
    while let Some(next) = nodes.get(handle).child(side) {
        if next.is_boundary() {
            break;
        }
        handle = next;
    }
    handle
}

#[inline]
pub(crate) fn leftmost<K>(nodes: &Arena<Node<K>>, handle: Handle) -> Handle {
    extreme(nodes, handle, Side::Left)
}

#[inline]
pub(crate) fn rightmost<K>(nodes: &Arena<Node<K>>, handle: Handle) -> Handle {
    extreme(nodes, handle, Side::Right)
}

/// A half-open run `[front, end)` of nodes in key order.
///
/// `end` is either [`Handle::TAIL`] or the first node past the run. Shrinking from the back
/// moves `end` onto the element being yielded, so both directions meet without a counter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Span {
    front: Handle,
    end: Handle,
}

impl Span {
    pub(crate) const EMPTY: Self = Self::new(Handle::TAIL, Handle::TAIL);

    pub(crate) const fn new(front: Handle, end: Handle) -> Self {
        Self { front, end }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.front == self.end
    }

    pub(crate) fn next<K>(&mut self, nodes: &Arena<Node<K>>) -> Option<Handle> {
        if self.is_empty() {
            return None;
        }
        let handle = self.front;
        self.front = advance(nodes, handle);
        Some(handle)
    }

    pub(crate) fn next_back<K>(&mut self, nodes: &Arena<Node<K>>) -> Option<Handle> {
        if self.is_empty() {
            return None;
        }
        self.end = retreat(nodes, self.end);
        Some(self.end)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Hand-wires `HEAD <- 1 <- 2 -> 3 -> TAIL` with 2 at the root.
    fn three_nodes() -> (Arena<Node<u8>>, [Handle; 3]) {
        let mut nodes = Arena::new();
        assert_eq!(nodes.alloc(Node::boundary()), Handle::HEAD);
        assert_eq!(nodes.alloc(Node::boundary()), Handle::TAIL);

        let value = Handle::from_index(0);
        let one = nodes.alloc(Node::entry(1, value));
        let two = nodes.alloc(Node::entry(2, value));
        let three = nodes.alloc(Node::entry(3, value));

        nodes.get_mut(two).left = Some(one);
        nodes.get_mut(two).right = Some(three);
        nodes.get_mut(one).parent = Some(two);
        nodes.get_mut(three).parent = Some(two);

        nodes.get_mut(one).left = Some(Handle::HEAD);
        nodes.get_mut(Handle::HEAD).parent = Some(one);
        nodes.get_mut(three).right = Some(Handle::TAIL);
        nodes.get_mut(Handle::TAIL).parent = Some(three);

        (nodes, [one, two, three])
    }

    #[test]
    fn advance_visits_in_order_and_lands_on_tail() {
        let (nodes, [one, two, three]) = three_nodes();
        assert_eq!(advance(&nodes, one), two);
        assert_eq!(advance(&nodes, two), three);
        assert_eq!(advance(&nodes, three), Handle::TAIL);
    }

    #[test]
    fn retreat_mirrors_advance() {
        let (nodes, [one, two, three]) = three_nodes();
        assert_eq!(retreat(&nodes, Handle::TAIL), three);
        assert_eq!(retreat(&nodes, three), two);
        assert_eq!(retreat(&nodes, two), one);
        assert_eq!(retreat(&nodes, one), Handle::HEAD);
        assert_eq!(advance(&nodes, Handle::HEAD), one);
    }

    #[test]
    fn extremes_stop_short_of_boundaries() {
        let (nodes, [one, two, three]) = three_nodes();
        assert_eq!(leftmost(&nodes, two), one);
        assert_eq!(rightmost(&nodes, two), three);
        assert_eq!(leftmost(&nodes, one), one);
    }

    #[test]
    fn span_meets_in_the_middle() {
        let (nodes, [one, two, three]) = three_nodes();
        let mut span = Span::new(one, Handle::TAIL);
        assert_eq!(span.next(&nodes), Some(one));
        assert_eq!(span.next_back(&nodes), Some(three));
        assert_eq!(span.next(&nodes), Some(two));
        assert_eq!(span.next_back(&nodes), None);
        assert_eq!(span.next(&nodes), None);
    }

    #[test]
    fn span_over_whole_tree() {
        let (nodes, _) = three_nodes();
        let front = nodes.get(Handle::HEAD).parent.unwrap();
        let mut span = Span::new(front, Handle::TAIL);
        let keys: Vec<u8> = core::iter::from_fn(|| span.next(&nodes))
            .map(|h| *nodes.get(h).key().unwrap())
            .collect();
        assert_eq!(keys, [1, 2, 3]);
    }

    #[test]
    fn empty_span_yields_nothing() {
        let (nodes, _) = three_nodes();
        let mut span = Span::EMPTY;
        assert!(span.is_empty());
        assert_eq!(span.next(&nodes), None);
        assert_eq!(span.next_back(&nodes), None);
    }
}
