use core::fmt;
use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Index of a node slot in the arena.
///
/// The first two slots of every tree are reserved for the boundary nodes, so their handles are
/// known constants and never recycled.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    /// The pre-first boundary. Its parent caches the minimum node.
    pub(crate) const HEAD: Self = Self::from_index(0);
    /// The post-last boundary. Its parent caches the maximum node.
    pub(crate) const TAIL: Self = Self::from_index(1);

    /// Number of slots taken by the boundaries.
    pub(crate) const RESERVED: usize = 2;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // `index + 1` is never zero and fits because `index <= MAX`.
        #[allow(clippy::cast_possible_truncation)]
        match NonZero::new((index + 1) as RawHandle) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    #[inline]
    pub(crate) const fn is_boundary(self) -> bool {
        self.to_index() < Self::RESERVED
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::HEAD {
            f.write_str("HEAD")
        } else if *self == Self::TAIL {
            f.write_str("TAIL")
        } else {
            write!(f, "#{}", self.to_index())
        }
    }
}
