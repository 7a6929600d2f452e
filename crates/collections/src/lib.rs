//! Dual-encoded containers for the tessera collection engine.
//!
//! Each container is a polymorphic object with two interchangeable physical
//! encodings: a compact inline representation for small/simple contents and
//! a general-purpose one it promotes to when a size or content threshold is
//! crossed.
//!
//! - [`Set`]: packed sorted integers ([`intset::IntSet`]) or a hash table
//!   of value objects
//! - [`List`]: packed inline entries ([`ziplist::ZipList`]) or a deque of
//!   shared value objects
//!
//! Promotion is one-way and automatic; encodings never regress. Containers
//! exchange elements through [`tessera_core::Literal`] views so that
//! cross-encoding algorithms stay zero-copy for the integer case.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod intset;
pub mod list;
pub mod set;
pub mod ziplist;

pub use intset::IntSet;
pub use list::{End, List, ListEncoding, ListIter, Side};
pub use set::{Set, SetEncoding, SetIter};
pub use ziplist::{ZipEntry, ZipList};
