mod arena;
mod handle;
mod node;
mod raw_rbtree_map;
mod walk;

pub(crate) use arena::Arena;
pub(crate) use handle::Handle;
pub(crate) use node::Node;
pub(crate) use raw_rbtree_map::{InsertPoint, RawRBTreeMap};
pub(crate) use walk::Span;
