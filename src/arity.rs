//! Arity strategies for array-backed heaps
//!
//! An array heap stores a complete tree in a vector. The arity decides the
//! index arithmetic between a node and its parent or children, and how many
//! children sift-down has to inspect per level.
//!
//! - [`Binary`]: arity 2, closed-form shift arithmetic
//! - [`KAry`]: arity K > 2, chosen at construction
//!
//! The binary case is kept separate from [`KAry`] because it is the common
//! path and its children are reached with shifts instead of a multiply by a
//! runtime value. `KAry` pays one multiply/divide by a non-constant K per level.
//!
//! | Operation   | Binary      | K-ary          |
//! |-------------|-------------|----------------|
//! | sift-up     | O(log n)    | O(log_k n)     |
//! | sift-down   | O(log n)    | O(k log_k n)   |
//! | build       | O(n)        | O(n)           |

use std::fmt;

use crate::traits::{contract_violation, Compare, HeapError};

/// Index arithmetic and child selection for one heap arity
///
/// Implementors only describe the tree shape. The sift loops themselves live
/// in [`ArrayHeap`](crate::array_heap::ArrayHeap) and call back into these
/// methods.
pub trait Arity: Copy + fmt::Debug {
    /// Number of children per internal node
    fn degree(&self) -> usize;

    /// Returns the parent of position `i`
    ///
    /// `i` must be greater than 0; the root has no parent.
    fn parent(&self, i: usize) -> usize;

    /// Returns the `j`-th child of position `i`, `j < degree()`
    fn child(&self, i: usize, j: usize) -> usize;

    /// Returns true if position `i` has no children in a heap of `len` nodes
    fn is_leaf(&self, i: usize, len: usize) -> bool;

    /// Returns the last position with at least one child, if any
    fn last_internal(&self, len: usize) -> Option<usize> {
        if len < 2 {
            None
        } else {
            Some(self.parent(len - 1))
        }
    }

    /// Returns the position the comparator prefers among `i` and its in-range
    /// children. Returns `i` itself when no child should replace it.
    fn preferred<T, C: Compare<T>>(&self, nodes: &[T], i: usize, comp: &C) -> usize;
}

/// Arity 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Binary;

impl Binary {
    #[inline]
    fn left(i: usize) -> usize {
        (i << 1) + 1
    }

    #[inline]
    fn right(i: usize) -> usize {
        (i << 1) + 2
    }
}

impl Arity for Binary {
    #[inline]
    fn degree(&self) -> usize {
        2
    }

    #[inline]
    fn parent(&self, i: usize) -> usize {
        (i - 1) >> 1
    }

    #[inline]
    fn child(&self, i: usize, j: usize) -> usize {
        (i << 1) + j + 1
    }

    #[inline]
    fn is_leaf(&self, i: usize, len: usize) -> bool {
        i >= len >> 1
    }

    #[inline]
    fn preferred<T, C: Compare<T>>(&self, nodes: &[T], i: usize, comp: &C) -> usize {
        let len = nodes.len();
        let l = Self::left(i);
        let r = Self::right(i);
        let mut best = i;

        if l < len && comp.yields(&nodes[best], &nodes[l]) {
            best = l;
        }
        if r < len && comp.yields(&nodes[best], &nodes[r]) {
            best = r;
        }
        best
    }
}

/// Arity K, with K > 2 fixed at construction
///
/// # Example
///
/// ```rust
/// use rust_indexed_heaps::arity::{Arity, KAry};
///
/// let four = KAry::new(4);
/// assert_eq!(four.child(0, 3), 4);
/// assert_eq!(four.parent(4), 0);
/// assert!(KAry::try_new(2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KAry {
    k: usize,
}

impl KAry {
    /// Creates a k-ary strategy
    ///
    /// # Panics
    /// Panics if `k <= 2`. Use [`Binary`] for arity 2.
    #[track_caller]
    pub fn new(k: usize) -> Self {
        match Self::try_new(k) {
            Ok(arity) => arity,
            Err(err) => contract_violation(err),
        }
    }

    /// Creates a k-ary strategy, rejecting `k <= 2`
    pub fn try_new(k: usize) -> Result<Self, HeapError> {
        if k > 2 {
            Ok(KAry { k })
        } else {
            Err(HeapError::InvalidArity(k))
        }
    }

    /// Returns K
    pub fn k(&self) -> usize {
        self.k
    }
}

impl fmt::Display for KAry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-ary", self.k)
    }
}

impl Arity for KAry {
    #[inline]
    fn degree(&self) -> usize {
        self.k
    }

    #[inline]
    fn parent(&self, i: usize) -> usize {
        (i - 1) / self.k
    }

    #[inline]
    fn child(&self, i: usize, j: usize) -> usize {
        self.k * i + j + 1
    }

    #[inline]
    fn is_leaf(&self, i: usize, len: usize) -> bool {
        // saturating: a huge K must not wrap around into a valid index
        self.k.saturating_mul(i).saturating_add(1) >= len
    }

    fn preferred<T, C: Compare<T>>(&self, nodes: &[T], i: usize, comp: &C) -> usize {
        let len = nodes.len();
        let first = self.k.saturating_mul(i).saturating_add(1);
        let end = first.saturating_add(self.k).min(len);
        let mut best = i;

        // Time: O(K)
        for son in first..end {
            if comp.yields(&nodes[best], &nodes[son]) {
                best = son;
            }
        }
        best
    }
}
