use alloc::vec::Vec;
use core::borrow::Borrow;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, Side, Slot};
use super::walk::{self, Span};
use crate::compare::Compare;

/// The red-black tree backing `RBTreeMap`.
///
/// Slots 0 and 1 of `nodes` are the two boundaries ([`Handle::HEAD`] and [`Handle::TAIL`]); they
/// are allocated once here and live as long as the tree.
#[derive(Clone)]
pub(crate) struct RawRBTreeMap<K, V> {
    /// Arena storing the boundaries and every tree node.
    nodes: Arena<Node<K>>,
    /// Arena storing all values (separate from nodes so values can be borrowed mutably while
    /// links are read).
    values: Arena<V>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of real nodes.
    len: usize,
}

/// Where a missing key belongs: under a parent on one side, or as the root of an empty tree.
#[derive(Clone, Copy, Debug)]
pub(crate) struct InsertPoint(Option<(Handle, Side)>);

/// Drops boundary links, keeping only links to real nodes.
#[inline]
fn real(link: Option<Handle>) -> Option<Handle> {
    link.filter(|handle| !handle.is_boundary())
}

impl<K, V> RawRBTreeMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new tree with room for `capacity` entries.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Arena::with_capacity(capacity.saturating_add(Handle::RESERVED));
        let head = nodes.alloc(Node::boundary());
        let tail = nodes.alloc(Node::boundary());
        debug_assert_eq!((head, tail), (Handle::HEAD, Handle::TAIL));

        let mut raw = Self {
            nodes,
            values: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        };
        raw.unbind_boundaries();
        raw
    }

    /// The largest number of entries a tree can hold.
    pub(crate) const MAX_LEN: usize = Handle::MAX - Handle::RESERVED;

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub(crate) fn nodes(&self) -> &Arena<Node<K>> {
        &self.nodes
    }

    /// Splits the borrow so values can be mutated while links are read.
    pub(crate) fn split_mut(&mut self) -> (&Arena<Node<K>>, &mut Arena<V>) {
        (&self.nodes, &mut self.values)
    }

    /// The minimum node, or [`Handle::TAIL`] when empty.
    #[inline]
    pub(crate) fn first(&self) -> Handle {
        self.boundary_target(Handle::HEAD)
    }

    /// The maximum node, or [`Handle::HEAD`] when empty.
    #[inline]
    pub(crate) fn last(&self) -> Handle {
        self.boundary_target(Handle::TAIL)
    }

    fn boundary_target(&self, boundary: Handle) -> Handle {
        self.nodes.get(boundary).parent.expect("`RawRBTreeMap` - boundary is not bound!")
    }

    #[inline]
    pub(crate) fn advance(&self, handle: Handle) -> Handle {
        walk::advance(&self.nodes, handle)
    }

    #[inline]
    pub(crate) fn retreat(&self, handle: Handle) -> Handle {
        walk::retreat(&self.nodes, handle)
    }

    /// All entries in key order.
    pub(crate) fn span(&self) -> Span {
        Span::new(self.first(), Handle::TAIL)
    }

    /// Returns `true` if `handle` names a live node of this tree.
    pub(crate) fn contains_handle(&self, handle: Handle) -> bool {
        self.nodes.contains(handle)
    }

    /// Returns the entry stored at `handle`, or `None` for a boundary.
    pub(crate) fn entry(&self, handle: Handle) -> Option<(&K, &V)> {
        match &self.nodes.get(handle).slot {
            Slot::Entry { key, value } => Some((key, self.values.get(*value))),
            Slot::Boundary => None,
        }
    }

    /// Returns the entry stored at `handle` with a mutable value, or `None` for a boundary.
    pub(crate) fn entry_mut(&mut self, handle: Handle) -> Option<(&K, &mut V)> {
        match &self.nodes.get(handle).slot {
            Slot::Entry { key, value } => Some((key, self.values.get_mut(*value))),
            Slot::Boundary => None,
        }
    }

    /// Returns the key of the real node at `handle`.
    pub(crate) fn key(&self, handle: Handle) -> &K {
        self.nodes.get(handle).key().expect("`RawRBTreeMap::key()` - `handle` is a boundary!")
    }

    /// Returns the value of the real node at `handle`.
    pub(crate) fn value(&self, handle: Handle) -> &V {
        let value = self.nodes.get(handle).value().expect("`RawRBTreeMap::value()` - `handle` is a boundary!");
        self.values.get(value)
    }

    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        let value = self.nodes.get(handle).value().expect("`RawRBTreeMap::value_mut()` - `handle` is a boundary!");
        self.values.get_mut(value)
    }

    /// Removes every entry. The boundaries survive.
    ///
    /// Uses an explicit stack, so depth is bounded by the heap rather than the call stack.
    pub(crate) fn clear(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(len = self.len, "clear");

        let mut pending: SmallVec<[Handle; 64]> = SmallVec::new();
        pending.extend(self.root.take());
        while let Some(handle) = pending.pop() {
            let node = self.nodes.take(handle);
            pending.extend(real(node.left));
            pending.extend(real(node.right));
            if let Slot::Entry { value, .. } = node.slot {
                self.values.free(value);
            }
        }
        self.len = 0;
        self.unbind_boundaries();
    }

    /// Removes every entry, returning them in key order.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut order = Vec::with_capacity(self.len);
        let mut span = self.span();
        while let Some(handle) = span.next(&self.nodes) {
            order.push(handle);
        }

        let mut entries = Vec::with_capacity(order.len());
        for handle in order {
            if let Slot::Entry { key, value } = self.nodes.take(handle).slot {
                entries.push((key, self.values.take(value)));
            }
        }
        self.root = None;
        self.len = 0;
        self.unbind_boundaries();
        entries
    }

    /// Unlinks and frees the real node at `handle`, returning its entry.
    ///
    /// Only `handle` is freed. Every other handle keeps naming the same entry.
    pub(crate) fn remove_node(&mut self, handle: Handle) -> (K, V) {
        assert!(!handle.is_boundary(), "`RawRBTreeMap::remove_node()` - `handle` is a boundary!");

        let node = self.nodes.get(handle);
        if let (Some(_), Some(right)) = (real(node.left), real(node.right)) {
            // Keys are immutable, so rather than copying the successor's entry up we swap the
            // two nodes' positions and delete `handle` from the successor's old spot.
            let successor = walk::leftmost(&self.nodes, right);
            self.transplant(handle, successor);
        }
        self.delete_one_child(handle);
        self.len -= 1;

        match self.nodes.take(handle).slot {
            Slot::Entry { key, value } => (key, self.values.take(value)),
            Slot::Boundary => unreachable!("`RawRBTreeMap::remove_node()` - freed a boundary!"),
        }
    }

    // ─── Boundary binding ───────────────────────────────────────────────────

    /// Wires the empty-tree state: each boundary caches the other.
    fn unbind_boundaries(&mut self) {
        self.nodes.get_mut(Handle::HEAD).parent = Some(Handle::TAIL);
        self.nodes.get_mut(Handle::TAIL).parent = Some(Handle::HEAD);
    }

    /// Hangs [`Handle::HEAD`] off the leftmost node of the subtree at `handle`.
    fn bind_leftmost(&mut self, handle: Handle) {
        let target = walk::leftmost(&self.nodes, handle);
        self.bind(Handle::HEAD, target, Side::Left);
    }

    /// Hangs [`Handle::TAIL`] off the rightmost node of the subtree at `handle`.
    fn bind_rightmost(&mut self, handle: Handle) {
        let target = walk::rightmost(&self.nodes, handle);
        self.bind(Handle::TAIL, target, Side::Right);
    }

    fn bind(&mut self, boundary: Handle, target: Handle, side: Side) {
        self.nodes.get_mut(target).set_child(side, Some(boundary));
        self.nodes.get_mut(boundary).parent = Some(target);
    }

    // ─── Structural primitives ──────────────────────────────────────────────

    fn alloc_entry(&mut self, key: K, value: V) -> Handle {
        let value = self.values.alloc(value);
        self.nodes.alloc(Node::entry(key, value))
    }

    #[inline]
    fn is_red(&self, handle: Handle) -> bool {
        self.nodes.get(handle).is_red()
    }

    #[inline]
    fn is_red_link(&self, link: Option<Handle>) -> bool {
        link.is_some_and(|handle| self.is_red(handle))
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.nodes.get_mut(handle).color = color;
    }

    #[inline]
    fn parent(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).parent
    }

    /// Which side of `parent` holds `child`.
    fn side_of(&self, child: Handle, parent: Handle) -> Side {
        if self.nodes.get(parent).left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Points whichever link of `parent` referenced `old` at `new` instead.
    fn replace_child(&mut self, parent: Handle, old: Handle, new: Option<Handle>) {
        let side = self.side_of(old, parent);
        self.nodes.get_mut(parent).set_child(side, new);
    }

    /// Points the link that owns `old` (a parent slot or the root) at `new`.
    fn replace_in_parent(&mut self, parent: Option<Handle>, old: Handle, new: Handle) {
        match parent {
            None => self.root = Some(new),
            Some(parent) => self.replace_child(parent, old, Some(new)),
        }
    }

    /// Rotates `pivot` down toward `direction`; its child on the other side rises into its place.
    fn rotate(&mut self, pivot: Handle, direction: Side) {
        #[cfg(feature = "tracing")]
        tracing::trace!(?pivot, ?direction, "rotate");

        let rising_side = direction.opposite();
        let rising = real(self.nodes.get(pivot).child(rising_side))
            .expect("`RawRBTreeMap::rotate()` - no child to rotate up!");

        // Boundaries hang off the outer edges of the extreme nodes, so the inner grandchild is
        // never a boundary and moves across like any subtree.
        let inner = self.nodes.get(rising).child(direction);
        self.nodes.get_mut(pivot).set_child(rising_side, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).parent = Some(pivot);
        }

        let grandparent = self.parent(pivot);
        self.nodes.get_mut(rising).parent = grandparent;
        self.replace_in_parent(grandparent, pivot, rising);

        self.nodes.get_mut(rising).set_child(direction, Some(pivot));
        self.nodes.get_mut(pivot).parent = Some(rising);
    }

    /// Links the detached node `child` into the empty (or boundary) `side` slot of `parent`.
    fn attach(&mut self, parent: Handle, side: Side, child: Handle) {
        let displaced = self.nodes.get(parent).child(side);
        self.nodes.get_mut(parent).set_child(side, Some(child));
        self.nodes.get_mut(child).parent = Some(parent);

        // A new extreme takes over the boundary its parent was holding.
        if displaced == Some(Handle::HEAD) {
            self.bind_leftmost(child);
        } else if displaced == Some(Handle::TAIL) {
            self.bind_rightmost(child);
        }
    }

    // ─── Insertion ──────────────────────────────────────────────────────────

    /// Restores the red-black invariants after `node` was linked in red.
    fn insert_fixup(&mut self, mut node: Handle) {
        loop {
            let Some(parent) = self.parent(node) else {
                break;
            };
            if !self.is_red(node) || !self.is_red(parent) {
                break;
            }
            // The root is black, so a red parent always has a parent of its own.
            let Some(grandparent) = self.parent(parent) else {
                break;
            };

            let side = self.side_of(parent, grandparent);
            let uncle = self.nodes.get(grandparent).child(side.opposite());

            if self.is_red_link(uncle) {
                #[cfg(feature = "tracing")]
                tracing::trace!(?node, ?grandparent, "insert: recolor");

                self.set_color(parent, Color::Black);
                if let Some(uncle) = uncle {
                    self.set_color(uncle, Color::Black);
                }
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if self.side_of(node, parent) != side {
                #[cfg(feature = "tracing")]
                tracing::trace!(?node, ?parent, "insert: inner grandchild");

                self.rotate(parent, side);
                node = parent;
                continue;
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(?node, ?grandparent, "insert: outer grandchild");

            self.rotate(grandparent, side.opposite());
            self.set_color(grandparent, Color::Red);
            self.set_color(parent, Color::Black);
            break;
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    // ─── Deletion ───────────────────────────────────────────────────────────

    /// Swaps the tree positions of `node` and its in-order `successor`.
    ///
    /// Links and colors are exchanged; both slots keep their entries. Afterwards `node` sits
    /// where `successor` was and has no left child.
    fn transplant(&mut self, node: Handle, successor: Handle) {
        #[cfg(feature = "tracing")]
        tracing::trace!(?node, ?successor, "transplant");

        let n = self.nodes.get(node);
        let (node_parent, node_left, node_right, node_color) = (n.parent, n.left, n.right, n.color);
        let s = self.nodes.get(successor);
        let (successor_parent, successor_right, successor_color) = (s.parent, s.right, s.color);
        debug_assert!(s.left.is_none(), "`RawRBTreeMap::transplant()` - successor has a left child!");

        // `successor` takes over `node`'s position.
        self.replace_in_parent(node_parent, node, successor);
        let s = self.nodes.get_mut(successor);
        s.parent = node_parent;
        s.left = node_left;
        s.color = node_color;
        if let Some(left) = node_left {
            self.nodes.get_mut(left).parent = Some(successor);
        }

        if successor_parent == Some(node) {
            self.nodes.get_mut(successor).right = Some(node);
            self.nodes.get_mut(node).parent = Some(successor);
        } else {
            self.nodes.get_mut(successor).right = node_right;
            if let Some(right) = node_right {
                self.nodes.get_mut(right).parent = Some(successor);
            }
            let old_parent =
                successor_parent.expect("`RawRBTreeMap::transplant()` - successor below `node` has no parent!");
            // The successor is the leftmost node of a subtree, so it was a left child.
            self.nodes.get_mut(old_parent).left = Some(node);
            self.nodes.get_mut(node).parent = Some(old_parent);
        }

        // `node` takes over `successor`'s old position.
        let n = self.nodes.get_mut(node);
        n.left = None;
        n.right = successor_right;
        n.color = successor_color;
        if let Some(right) = successor_right {
            self.nodes.get_mut(right).parent = Some(node);
        }
    }

    /// Unlinks `node`, which has at most one real child, keeping the tree balanced and the
    /// boundaries bound.
    fn delete_one_child(&mut self, node: Handle) {
        let n = self.nodes.get(node);
        let child = real(n.left).or(real(n.right));
        let was_first = n.left == Some(Handle::HEAD);
        let was_last = n.right == Some(Handle::TAIL);

        if n.parent.is_none() {
            match child {
                None => {
                    self.root = None;
                    self.unbind_boundaries();
                }
                Some(child) => {
                    self.root = Some(child);
                    let c = self.nodes.get_mut(child);
                    c.parent = None;
                    c.color = Color::Black;
                    self.bind_leftmost(child);
                    self.bind_rightmost(child);
                }
            }
            return;
        }

        if !self.is_red(node) {
            match child {
                // Recoloring the red child restores the black count on this path.
                Some(child) if self.is_red(child) => self.set_color(child, Color::Black),
                _ => self.delete_fixup(node),
            }
        }

        // Rotations in the fixup never change `node`'s parent, but re-read it anyway.
        let parent = self.parent(node).expect("`RawRBTreeMap::delete_one_child()` - node lost its parent!");
        self.replace_child(parent, node, child);
        if let Some(child) = child {
            self.nodes.get_mut(child).parent = Some(parent);
        }

        if was_first {
            self.bind_leftmost(child.unwrap_or(parent));
        }
        if was_last {
            self.bind_rightmost(child.unwrap_or(parent));
        }
    }

    /// Rebalances around the black node `node`, whose path is about to lose one black.
    fn delete_fixup(&mut self, mut node: Handle) {
        loop {
            // Case 1: the root has no sibling to balance against.
            let Some(parent) = self.parent(node) else {
                #[cfg(feature = "tracing")]
                tracing::trace!(?node, "delete: case 1");
                return;
            };

            let side = self.side_of(node, parent);
            let far = side.opposite();
            let mut sibling = self.sibling(parent, side);

            // Case 2: red sibling. Rotate it above the parent so `node` gets a black sibling.
            if self.is_red(sibling) {
                #[cfg(feature = "tracing")]
                tracing::trace!(?node, ?sibling, "delete: case 2");

                self.set_color(parent, Color::Red);
                self.set_color(sibling, Color::Black);
                self.rotate(parent, side);
                sibling = self.sibling(parent, side);
            }

            let near_nephew = self.nodes.get(sibling).child(side);
            let far_nephew = self.nodes.get(sibling).child(far);
            let near_red = self.is_red_link(near_nephew);
            let far_red = self.is_red_link(far_nephew);

            if !near_red && !far_red {
                self.set_color(sibling, Color::Red);
                if self.is_red(parent) {
                    // Case 4: move the parent's red down onto the sibling.
                    #[cfg(feature = "tracing")]
                    tracing::trace!(?node, ?parent, "delete: case 4");

                    self.set_color(parent, Color::Black);
                    return;
                }

                // Case 3: everything black. Push the deficit up a level.
                #[cfg(feature = "tracing")]
                tracing::trace!(?node, ?parent, "delete: case 3");

                node = parent;
                continue;
            }

            // Case 5: only the near nephew is red. Rotate it up to become the far nephew.
            if !far_red {
                #[cfg(feature = "tracing")]
                tracing::trace!(?node, ?sibling, "delete: case 5");

                if let Some(near) = near_nephew {
                    self.set_color(near, Color::Black);
                }
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, far);
                sibling = self.sibling(parent, side);
            }

            // Case 6: red far nephew. One rotation at the parent settles it.
            #[cfg(feature = "tracing")]
            tracing::trace!(?node, ?sibling, "delete: case 6");

            let parent_color = self.nodes.get(parent).color;
            self.set_color(sibling, parent_color);
            self.set_color(parent, Color::Black);
            if let Some(far_nephew) = self.nodes.get(sibling).child(far) {
                self.set_color(far_nephew, Color::Black);
            }
            self.rotate(parent, side);
            return;
        }
    }

    /// The child of `parent` opposite to `side`. A black non-root node always has one.
    fn sibling(&self, parent: Handle, side: Side) -> Handle {
        real(self.nodes.get(parent).child(side.opposite()))
            .expect("`RawRBTreeMap::sibling()` - black node without a sibling!")
    }
}

impl<K, V> RawRBTreeMap<K, V> {
    /// Inserts `key` unless an equivalent key is present, in which case `value` is dropped.
    ///
    /// Returns the handle of the entry holding the key and whether it was inserted.
    pub(crate) fn insert<C>(&mut self, key: K, value: V, cmp: &C) -> (Handle, bool)
    where
        C: Compare<K> + ?Sized,
    {
        match self.search_insert(&key, cmp) {
            Ok(existing) => (existing, false),
            Err(point) => (self.insert_at(point, key, value), true),
        }
    }

    /// Finds the node holding `key`, or the point where it would be linked.
    pub(crate) fn search_insert<C>(&self, key: &K, cmp: &C) -> Result<Handle, InsertPoint>
    where
        C: Compare<K> + ?Sized,
    {
        let Some(mut current) = self.root else {
            return Err(InsertPoint(None));
        };

        loop {
            let stored = self.key(current);
            let side = if cmp.less(key, stored) {
                Side::Left
            } else if cmp.less(stored, key) {
                Side::Right
            } else {
                return Ok(current);
            };
            match real(self.nodes.get(current).child(side)) {
                Some(next) => current = next,
                None => return Err(InsertPoint(Some((current, side)))),
            }
        }
    }

    /// Links a new entry at `point`, which must come from [`Self::search_insert`] on the
    /// unchanged tree.
    ///
    /// # Panics
    ///
    /// Panics if the tree already holds [`Self::MAX_LEN`] entries. The tree is left unchanged.
    pub(crate) fn insert_at(&mut self, point: InsertPoint, key: K, value: V) -> Handle {
        // Both arenas must have room before either allocates.
        assert!(
            self.len < Self::MAX_LEN,
            "`RawRBTreeMap::insert_at()` - tree is at maximum capacity ({})",
            Self::MAX_LEN
        );
        let handle = self.alloc_entry(key, value);
        self.len += 1;

        match point.0 {
            None => {
                self.set_color(handle, Color::Black);
                self.root = Some(handle);
                self.bind(Handle::HEAD, handle, Side::Left);
                self.bind(Handle::TAIL, handle, Side::Right);
            }
            Some((parent, side)) => {
                self.attach(parent, side, handle);
                self.insert_fixup(handle);
            }
        }
        handle
    }

    /// Finds the node whose key is equivalent to `key`.
    pub(crate) fn search<Q, C>(&self, key: &Q, cmp: &C) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q> + ?Sized,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let stored = self.key(handle).borrow();
            let node = self.nodes.get(handle);
            current = if cmp.less(key, stored) {
                real(node.left)
            } else if cmp.less(stored, key) {
                real(node.right)
            } else {
                return Some(handle);
            };
        }
        None
    }

    /// The first node whose key is not less than `key`, or [`Handle::TAIL`].
    pub(crate) fn lower_bound<Q, C>(&self, key: &Q, cmp: &C) -> Handle
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q> + ?Sized,
    {
        self.bound(|stored| !cmp.less(stored, key))
    }

    /// The first node whose key is greater than `key`, or [`Handle::TAIL`].
    pub(crate) fn upper_bound<Q, C>(&self, key: &Q, cmp: &C) -> Handle
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q> + ?Sized,
    {
        self.bound(|stored| cmp.less(key, stored))
    }

    /// Descends to the first node satisfying `past`, which must be monotone in key order.
    fn bound<Q, F>(&self, past: F) -> Handle
    where
        K: Borrow<Q>,
        Q: ?Sized,
        F: Fn(&Q) -> bool,
    {
        let mut found = Handle::TAIL;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = if past(self.key(handle).borrow()) {
                found = handle;
                real(node.left)
            } else {
                real(node.right)
            };
        }
        found
    }

    /// Removes the entry whose key is equivalent to `key`.
    pub(crate) fn remove<Q, C>(&mut self, key: &Q, cmp: &C) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q> + ?Sized,
    {
        let handle = self.search(key, cmp)?;
        Some(self.remove_node(handle))
    }
}
