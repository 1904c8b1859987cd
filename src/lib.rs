//! A red-black tree ordered map with sentinel-threaded iteration.
//!
//! This crate provides [`RBTreeMap`], an ordered map whose nodes live in an arena and link to
//! each other by index. Two permanent boundary nodes hang off the minimum and maximum entries:
//!
//! - [`first_key_value`](RBTreeMap::first_key_value) and
//!   [`last_key_value`](RBTreeMap::last_key_value) are O(1)
//! - Iteration in both directions needs no stack and no recursion
//! - [`Position`]s are `Copy` cursors that survive insertion and the removal of other entries
//!
//! Keys are ordered by a pluggable [`Compare`] predicate, [`Natural`] ([`Ord`]) by default.
//!
//! # Example
//!
//! ```
//! use threaded_rbtree::RBTreeMap;
//!
//! let mut scores = RBTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Walk the map with positions, from the back.
//! let last = scores.retreat(scores.end());
//! assert_eq!(scores.get_at(last), Some((&"Carol", &92)));
//!
//! // Bounds descend the tree in O(log n).
//! let from_b = scores.lower_bound(&"B");
//! assert_eq!(scores.get_at(from_b), Some((&"Bob", &85)));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **`tracing`** - Emits `tracing` events for rotations and rebalancing cases (off by default)

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: Mutable iteration hands out disjoint `&mut V` from one arena, which needs unsafe code.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod compare;
mod error;
mod raw;

pub mod rbtree_map;

pub use compare::{Compare, Natural, Reversed};
pub use error::KeyNotFound;
pub use rbtree_map::{Position, RBTreeMap};
