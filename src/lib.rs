//! Array-backed heaps and an indexed priority queue for Rust
//!
//! This crate provides complete K-ary heaps stored in a vector, and a priority
//! queue built on them that tracks the position of every element so keys can
//! be changed in place.
//!
//! # Features
//!
//! - **Binary heap**: O(log n) push and pop, O(n) bulk construction
//! - **K-ary heap**: same operations with a runtime arity K > 2, trading a
//!   shallower tree for wider sift-down levels
//! - **Priority queue**: O(1) `contains` and key lookup, O(log n) `update_key`
//!   toward the root, usable over either arity
//! - **Pathfinding**: Dijkstra and A* whose open set improves queued nodes in
//!   place instead of pushing duplicates
//!
//! Min or max ordering is chosen by the comparator (or [`Polarity`]) the
//! structure is created with; there is no separate max code path.
//!
//! # Example
//!
//! ```rust
//! use rust_indexed_heaps::{HeapState, PriorityQueue};
//!
//! let mut queue = PriorityQueue::min(
//!     vec![5, 4, 1, 3, 6, 0, 2],
//!     vec!['m', 'i', 'n', 'h', 'e', 'a', 'p'],
//!     HeapState::Unordered,
//! );
//!
//! queue.update_key(-1, &'p');
//! assert_eq!(queue.key_at(&'p'), &-1);
//! assert_eq!(queue.pop(), (-1, 'p'));
//! assert_eq!(queue.pop(), (0, 'a'));
//! ```

pub mod arity;
pub mod array_heap;
pub mod pathfinding;
pub mod priority_queue;
pub mod traits;

// Re-export the main types for convenience
pub use array_heap::{BinaryHeap, KHeap};
pub use priority_queue::{PriorityQueue, QueueBuilder};
pub use traits::{Compare, Heap, HeapError, HeapState, Polarity, SwapHook};
