use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// What a node carries: a stored entry, or nothing at all for the two boundaries.
///
/// The key of an entry is never reassigned after construction. Structural edits move links and
/// colors between nodes, never slots.
#[derive(Clone)]
pub(crate) enum Slot<K> {
    Entry {
        key: K,
        // Values live in their own arena so mutable iteration can hand out `&mut V` while the
        // node links are being read.
        value: Handle,
    },
    Boundary,
}

/// A vertex of the red-black tree.
///
/// `left`/`right` are owning relations, `parent` is a back-reference. Boundaries hang off the
/// extreme nodes as their outer children.
#[derive(Clone)]
pub(crate) struct Node<K> {
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) color: Color,
    pub(crate) slot: Slot<K>,
}

impl<K> Node<K> {
    /// Creates a detached red node holding an entry.
    pub(crate) fn entry(key: K, value: Handle) -> Self {
        Self {
            parent: None,
            left: None,
            right: None,
            color: Color::Red,
            slot: Slot::Entry { key, value },
        }
    }

    /// Creates a boundary node. Boundaries are always black.
    pub(crate) fn boundary() -> Self {
        Self {
            parent: None,
            left: None,
            right: None,
            color: Color::Black,
            slot: Slot::Boundary,
        }
    }

    #[inline]
    pub(crate) fn is_boundary(&self) -> bool {
        matches!(self.slot, Slot::Boundary)
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    /// Returns the stored key, or `None` for a boundary.
    #[inline]
    pub(crate) fn key(&self) -> Option<&K> {
        match &self.slot {
            Slot::Entry { key, .. } => Some(key),
            Slot::Boundary => None,
        }
    }

    /// Returns the handle of the stored value, or `None` for a boundary.
    #[inline]
    pub(crate) fn value(&self) -> Option<Handle> {
        match self.slot {
            Slot::Entry { value, .. } => Some(value),
            Slot::Boundary => None,
        }
    }

    /// Returns the child on the requested side.
    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

/// Which child slot of a node. Lets the mirrored halves of the fixups share one body.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_entries_are_red_and_detached() {
        let node = Node::entry("k", Handle::from_index(5));
        assert!(node.is_red());
        assert!(!node.is_boundary());
        assert_eq!(node.key(), Some(&"k"));
        assert_eq!(node.value(), Some(Handle::from_index(5)));
        assert_eq!((node.parent, node.left, node.right), (None, None, None));
    }

    #[test]
    fn boundaries_are_black_and_empty() {
        let node: Node<u8> = Node::boundary();
        assert!(!node.is_red());
        assert!(node.is_boundary());
        assert_eq!(node.key(), None);
        assert_eq!(node.value(), None);
    }

    #[test]
    fn sides_mirror() {
        let mut node: Node<u8> = Node::boundary();
        node.set_child(Side::Left, Some(Handle::from_index(3)));
        node.set_child(Side::Left.opposite(), Some(Handle::from_index(4)));
        assert_eq!(node.left, Some(Handle::from_index(3)));
        assert_eq!(node.child(Side::Right), Some(Handle::from_index(4)));
    }
}
