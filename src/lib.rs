//! Generic algorithms and containers.
//!
//! - [`algorithm`]: search, binary search, set, heap, comparison and byte order utilities over
//!   slices.
//! - [`sort`]: introsort, buffer-bounded stable merge sort, merge primitives and friends.
//! - [`intrusive`]: a doubly-linked list threaded through caller-owned elements.
//! - [`scratch`]: the allocator-backed working memory the merge based sorts borrow.
//!
//! Everything is single-threaded and synchronous. Slices are the ranges, indices the
//! positions, and comparators are `is_less` closures describing a strict weak ordering.

pub mod algorithm;
pub mod intrusive;
pub mod scratch;
pub mod sort;

pub use scratch::{Global, RawAllocator, ScratchBuffer, ScratchError};
