use core::fmt;

/// The error returned by [`RBTreeMap::at`](crate::RBTreeMap::at) and
/// [`RBTreeMap::at_mut`](crate::RBTreeMap::at_mut) when the key is absent.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct KeyNotFound;

impl fmt::Display for KeyNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key not found")
    }
}

impl core::error::Error for KeyNotFound {}
