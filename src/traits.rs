//! Common traits for array-backed heap data structures
//!
//! This module holds the small vocabulary every heap in the crate is built from:
//!
//! - [`Heap`]: the operation surface shared by binary and k-ary heaps
//! - [`Compare`]: the strict-order predicate that decides heap polarity
//! - [`SwapHook`]: the notification seam used to track element positions
//! - [`HeapError`]: the error type reported by the checked (`try_*`) operations
//!
//! Polarity is never a separate code path. A heap is a min-heap or a max-heap
//! purely because of the [`Compare`] implementation it was built with.

use std::fmt;

use log::error;

/// Error type for heap and priority queue operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `top` or `pop` was called on an empty structure
    Empty,
    /// The element is not present in the priority queue
    ElementNotFound,
    /// The new key would move the element away from the root
    KeyNotImproved,
    /// A k-ary heap was requested with an arity of 2 or less
    InvalidArity(usize),
    /// Keys and elements passed at construction have different lengths
    LengthMismatch {
        /// Number of keys supplied
        keys: usize,
        /// Number of elements supplied
        elements: usize,
    },
    /// The element is already present in the priority queue
    DuplicateElement,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::Empty => write!(f, "heap is empty"),
            HeapError::ElementNotFound => {
                write!(f, "element is not present in the priority queue")
            }
            HeapError::KeyNotImproved => {
                write!(f, "new key moves the element against the heap polarity")
            }
            HeapError::InvalidArity(k) => {
                write!(f, "k-ary heap requires an arity greater than 2, got {}", k)
            }
            HeapError::LengthMismatch { keys, elements } => write!(
                f,
                "got {} keys for {} elements, lengths must match",
                keys, elements
            ),
            HeapError::DuplicateElement => {
                write!(f, "element is already present in the priority queue")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// Reports a broken caller contract and aborts the current operation.
///
/// Used by the unchecked entry points (`top`, `pop`, `update_key`, ...) whose
/// preconditions are programming errors rather than runtime conditions.
#[cold]
#[track_caller]
pub(crate) fn contract_violation(err: HeapError) -> ! {
    error!("heap contract violated: {}", err);
    panic!("{}", err)
}

/// Which end of the order a structure yields first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Polarity {
    /// Smallest key first
    #[default]
    Min,
    /// Largest key first
    Max,
}

impl Polarity {
    /// Returns true if `a` must give way to `b` under this polarity
    ///
    /// This is `a > b` for [`Polarity::Min`] and `a < b` for [`Polarity::Max`].
    #[inline]
    pub fn yields<K: Ord + ?Sized>(self, a: &K, b: &K) -> bool {
        match self {
            Polarity::Min => a > b,
            Polarity::Max => a < b,
        }
    }

    /// Returns true if replacing `old` with `new` can only move an element
    /// toward the root.
    ///
    /// Equal keys count as an improvement (the update is a no-op for order).
    #[inline]
    pub fn improves<K: Ord + ?Sized>(self, old: &K, new: &K) -> bool {
        !self.yields(new, old)
    }
}

/// Whether the initial sequence handed to a heap is already heap-ordered
///
/// [`HeapState::AlreadyHeap`] skips the O(n) bottom-up build. The claim is not
/// verified; handing an unordered sequence with this flag leaves the heap in an
/// unspecified (but memory safe) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeapState {
    /// Run the bottom-up build after construction
    #[default]
    Unordered,
    /// The caller guarantees the heap property already holds
    AlreadyHeap,
}

/// Strict-order predicate used by the sift algorithms
///
/// `yields(parent, child)` returns true when `parent` should be displaced in
/// favour of `child`. A greater-than predicate produces a min-heap and a
/// less-than predicate produces a max-heap.
///
/// Any `Fn(&T, &T) -> bool` closure is a comparator:
///
/// ```rust
/// use rust_indexed_heaps::{Heap, HeapState};
/// use rust_indexed_heaps::arity::Binary;
/// use rust_indexed_heaps::array_heap::ArrayHeap;
///
/// // Order strings by length, shortest first
/// let by_len = |a: &String, b: &String| a.len() > b.len();
/// let words = vec!["ccc".to_string(), "a".to_string(), "bb".to_string()];
/// let mut heap = ArrayHeap::new(Binary, by_len, words, HeapState::Unordered);
/// assert_eq!(heap.pop(), "a");
/// assert_eq!(heap.pop(), "bb");
/// ```
pub trait Compare<T: ?Sized> {
    /// Returns true if `parent` must give way to `child`
    fn yields(&self, parent: &T, child: &T) -> bool;
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn yields(&self, parent: &T, child: &T) -> bool {
        self(parent, child)
    }
}

/// Observer of structural changes in a heap's backing sequence
///
/// The heap algorithms report every position change through this trait, so a
/// composing structure can keep an out-of-band index synchronized without any
/// access to the heap's internals. `()` is the no-op hook used by plain heaps.
pub trait SwapHook<T> {
    /// Positions `i` and `j` of `nodes` were just exchanged
    fn swapped(&mut self, nodes: &[T], i: usize, j: usize);

    /// `nodes[i]` was just written in place (an append, or the last element
    /// moved into the root during a pop)
    fn placed(&mut self, _nodes: &[T], _i: usize) {}

    /// The backing sequence was emptied
    fn cleared(&mut self) {}
}

impl<T> SwapHook<T> for () {
    #[inline]
    fn swapped(&mut self, _nodes: &[T], _i: usize, _j: usize) {}
}

/// Operation surface shared by the array-backed heaps
///
/// Unlike the priority queue, a plain heap orders its elements directly: the
/// element is its own priority.
///
/// # Example
///
/// ```rust
/// use rust_indexed_heaps::{Heap, HeapState};
/// use rust_indexed_heaps::array_heap::BinaryHeap;
///
/// let mut heap = BinaryHeap::min(Vec::new(), HeapState::Unordered);
/// heap.push(3);
/// heap.push(1);
/// heap.push(2);
///
/// assert_eq!(heap.top(), &1);
/// assert_eq!(heap.pop(), 1);
/// assert_eq!(heap.try_pop(), Some(2));
/// ```
pub trait Heap<T> {
    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the root element, or `None` if the heap is empty
    fn peek(&self) -> Option<&T>;

    /// Returns the root element
    ///
    /// # Panics
    /// Panics if the heap is empty.
    #[track_caller]
    fn top(&self) -> &T {
        match self.peek() {
            Some(item) => item,
            None => contract_violation(HeapError::Empty),
        }
    }

    /// Inserts an element
    ///
    /// # Time Complexity
    /// O(log n) for binary heaps, O(log_k n) for k-ary heaps.
    fn push(&mut self, item: T);

    /// Removes and returns the root element, or `None` if the heap is empty
    ///
    /// # Time Complexity
    /// O(log n) for binary heaps, O(k log_k n) for k-ary heaps.
    fn try_pop(&mut self) -> Option<T>;

    /// Removes and returns the root element
    ///
    /// # Panics
    /// Panics if the heap is empty.
    #[track_caller]
    fn pop(&mut self) -> T {
        match self.try_pop() {
            Some(item) => item,
            None => contract_violation(HeapError::Empty),
        }
    }
}
