//! Array-backed binary and k-ary heaps
//!
//! [`ArrayHeap`] stores a complete tree in a `Vec<T>` and keeps two invariants:
//!
//! - **Shape**: positions `0..len` are all populated
//! - **Order**: for every non-root position `i`, `comp.yields(nodes[parent(i)], nodes[i])`
//!   is false
//!
//! The arity ([`Binary`] or [`KAry`]) decides the index arithmetic, the
//! comparator ([`MinOrder`], [`MaxOrder`] or any [`Compare`]) decides the
//! polarity, and an optional [`SwapHook`] is told about every position change.
//!
//! # Time Complexity
//!
//! | Operation | Binary     | K-ary          |
//! |-----------|------------|----------------|
//! | `push`    | O(log n)   | O(log_k n)     |
//! | `pop`     | O(log n)   | O(k log_k n)   |
//! | `top`     | O(1)       | O(1)           |
//! | build     | O(n)       | O(n)           |
//!
//! # Example
//!
//! ```rust
//! use rust_indexed_heaps::{Heap, HeapState};
//! use rust_indexed_heaps::array_heap::{BinaryHeap, KHeap};
//!
//! let mut min = BinaryHeap::min(vec![30, 1, 50, 20], HeapState::Unordered);
//! assert_eq!(min.pop(), 1);
//! assert_eq!(min.pop(), 20);
//!
//! let mut max = KHeap::max(4, vec![30, 1, 50, 20], HeapState::Unordered);
//! assert_eq!(max.pop(), 50);
//! assert_eq!(max.pop(), 30);
//! ```

use log::trace;

use crate::arity::{Arity, Binary, KAry};
use crate::traits::{Compare, Heap, HeapState, SwapHook};

/// Greater-than comparator: the smallest element is the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MinOrder;

impl<T: Ord> Compare<T> for MinOrder {
    #[inline]
    fn yields(&self, parent: &T, child: &T) -> bool {
        parent > child
    }
}

/// Less-than comparator: the largest element is the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaxOrder;

impl<T: Ord> Compare<T> for MaxOrder {
    #[inline]
    fn yields(&self, parent: &T, child: &T) -> bool {
        parent < child
    }
}

/// An array-backed heap with arity `A`, comparator `C` and swap hook `H`
#[derive(Debug, Clone)]
pub struct ArrayHeap<T, A, C, H = ()> {
    /// Complete tree in level order
    nodes: Vec<T>,
    arity: A,
    comp: C,
    hook: H,
}

/// Arity-2 heap; a min-heap unless another comparator is given
pub type BinaryHeap<T, C = MinOrder> = ArrayHeap<T, Binary, C>;

/// Arity-K heap (K > 2); a min-heap unless another comparator is given
pub type KHeap<T, C = MinOrder> = ArrayHeap<T, KAry, C>;

impl<T: Ord> ArrayHeap<T, Binary, MinOrder> {
    /// Creates a binary min-heap from `nodes`
    pub fn min(nodes: Vec<T>, state: HeapState) -> Self {
        ArrayHeap::new(Binary, MinOrder, nodes, state)
    }
}

impl<T: Ord> ArrayHeap<T, Binary, MaxOrder> {
    /// Creates a binary max-heap from `nodes`
    pub fn max(nodes: Vec<T>, state: HeapState) -> Self {
        ArrayHeap::new(Binary, MaxOrder, nodes, state)
    }
}

impl<T: Ord> ArrayHeap<T, KAry, MinOrder> {
    /// Creates a k-ary min-heap from `nodes`
    ///
    /// # Panics
    /// Panics if `k <= 2`.
    #[track_caller]
    pub fn min(k: usize, nodes: Vec<T>, state: HeapState) -> Self {
        ArrayHeap::new(KAry::new(k), MinOrder, nodes, state)
    }
}

impl<T: Ord> ArrayHeap<T, KAry, MaxOrder> {
    /// Creates a k-ary max-heap from `nodes`
    ///
    /// # Panics
    /// Panics if `k <= 2`.
    #[track_caller]
    pub fn max(k: usize, nodes: Vec<T>, state: HeapState) -> Self {
        ArrayHeap::new(KAry::new(k), MaxOrder, nodes, state)
    }
}

impl<T, A: Arity, C: Compare<T>> ArrayHeap<T, A, C> {
    /// Creates a heap with an explicit arity and comparator
    ///
    /// Unless `state` is [`HeapState::AlreadyHeap`], the O(n) bottom-up build
    /// runs before this returns.
    pub fn new(arity: A, comp: C, nodes: Vec<T>, state: HeapState) -> Self {
        Self::with_hook(arity, comp, (), nodes, state)
    }

    /// Creates an empty heap with room for `capacity` elements
    pub fn with_capacity(arity: A, comp: C, capacity: usize) -> Self {
        Self::new(arity, comp, Vec::with_capacity(capacity), HeapState::AlreadyHeap)
    }
}

impl<T, A: Arity, C: Compare<T>, H: SwapHook<T>> ArrayHeap<T, A, C, H> {
    /// Creates a heap whose position changes are reported to `hook`
    ///
    /// The hook must already reflect `nodes` as given (position `i` holds
    /// `nodes[i]`); from then on every swap is reported to it.
    pub fn with_hook(arity: A, comp: C, hook: H, nodes: Vec<T>, state: HeapState) -> Self {
        let mut heap = ArrayHeap {
            nodes,
            arity,
            comp,
            hook,
        };

        match state {
            HeapState::Unordered => {
                trace!(
                    "building heap of {} nodes, degree {}",
                    heap.nodes.len(),
                    heap.arity.degree()
                );
                heap.build_heap();
            }
            HeapState::AlreadyHeap => {
                trace!(
                    "skipping build for {} pre-ordered nodes, degree {}",
                    heap.nodes.len(),
                    heap.arity.degree()
                );
            }
        }

        heap
    }

    /// Returns the arity strategy
    pub fn arity(&self) -> A {
        self.arity
    }

    /// Returns the comparator
    pub fn comparator(&self) -> &C {
        &self.comp
    }

    /// Mutable access to the comparator. Callers that change the outcome of
    /// a comparison must repair the affected position afterwards.
    pub(crate) fn comparator_mut(&mut self) -> &mut C {
        &mut self.comp
    }

    pub(crate) fn hook(&self) -> &H {
        &self.hook
    }

    pub(crate) fn hook_mut(&mut self) -> &mut H {
        &mut self.hook
    }

    /// Returns the backing sequence in level order
    pub fn as_slice(&self) -> &[T] {
        &self.nodes
    }

    /// Consumes the heap, returning the backing sequence in level order
    pub fn into_vec(self) -> Vec<T> {
        self.nodes
    }

    /// Removes every element
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.hook.cleared();
    }

    /// Reserves room for at least `additional` more elements
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// Returns true if every parent/child pair satisfies the order invariant
    ///
    /// # Time Complexity
    /// O(n)
    pub fn is_valid(&self) -> bool {
        (1..self.nodes.len()).all(|i| {
            let p = self.arity.parent(i);
            !self.comp.yields(&self.nodes[p], &self.nodes[i])
        })
    }

    /// Consumes the heap and returns its elements in extraction order
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.nodes.len());
        while let Some(item) = self.try_pop() {
            sorted.push(item);
        }
        sorted
    }

    /// Exchanges two positions and reports the swap to the hook
    #[inline]
    fn swap_nodes(&mut self, i: usize, j: usize) {
        self.nodes.swap(i, j);
        self.hook.swapped(&self.nodes, i, j);
    }

    /// Moves the node at `index` toward the root until its parent no longer
    /// yields to it. Returns the final position.
    pub(crate) fn sift_up(&mut self, index: usize) -> usize {
        let mut i = index;
        while i > 0 {
            let p = self.arity.parent(i);
            if !self.comp.yields(&self.nodes[p], &self.nodes[i]) {
                break;
            }
            self.swap_nodes(i, p);
            i = p;
        }
        i
    }

    /// Moves the node at `index` toward the leaves until it beats all of its
    /// children. Returns the final position.
    pub(crate) fn sift_down(&mut self, index: usize) -> usize {
        let len = self.nodes.len();
        let mut i = index;
        while !self.arity.is_leaf(i, len) {
            let best = self.arity.preferred(&self.nodes, i, &self.comp);
            if best == i {
                break;
            }
            self.swap_nodes(i, best);
            i = best;
        }
        i
    }

    /// Bottom-up O(n) build: sift every internal node down, last to first
    fn build_heap(&mut self) {
        if let Some(last) = self.arity.last_internal(self.nodes.len()) {
            for i in (0..=last).rev() {
                self.sift_down(i);
            }
        }
    }
}

impl<T, A: Arity, C: Compare<T>, H: SwapHook<T>> Heap<T> for ArrayHeap<T, A, C, H> {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn peek(&self) -> Option<&T> {
        self.nodes.first()
    }

    fn push(&mut self, item: T) {
        let index_to_fix = self.nodes.len();
        self.nodes.push(item);
        self.hook.placed(&self.nodes, index_to_fix);
        self.sift_up(index_to_fix);
    }

    fn try_pop(&mut self) -> Option<T> {
        if self.nodes.is_empty() {
            return None;
        }

        // the last element takes the root's place
        let root = self.nodes.swap_remove(0);

        if !self.nodes.is_empty() {
            self.hook.placed(&self.nodes, 0);
            self.sift_down(0);
        }

        Some(root)
    }
}

impl<T, A, C, H> Extend<T> for ArrayHeap<T, A, C, H>
where
    A: Arity,
    C: Compare<T>,
    H: SwapHook<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.nodes.reserve(iter.size_hint().0);
        for item in iter {
            self.push(item);
        }
    }
}

impl<T, A, C> FromIterator<T> for ArrayHeap<T, A, C>
where
    A: Arity + Default,
    C: Compare<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        ArrayHeap::new(
            A::default(),
            C::default(),
            iter.into_iter().collect(),
            HeapState::Unordered,
        )
    }
}

impl<T, A, C> Default for ArrayHeap<T, A, C>
where
    A: Arity + Default,
    C: Compare<T> + Default,
{
    fn default() -> Self {
        ArrayHeap::new(A::default(), C::default(), Vec::new(), HeapState::AlreadyHeap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every swap so tests can replay them against a shadow copy
    #[derive(Default)]
    struct SwapLog {
        swaps: Vec<(usize, usize)>,
        placed: Vec<usize>,
    }

    impl SwapHook<i32> for SwapLog {
        fn swapped(&mut self, _nodes: &[i32], i: usize, j: usize) {
            self.swaps.push((i, j));
        }

        fn placed(&mut self, _nodes: &[i32], i: usize) {
            self.placed.push(i);
        }
    }

    fn drain<H: Heap<i32>>(mut heap: H) -> Vec<i32> {
        let mut out = Vec::new();
        while let Some(x) = heap.try_pop() {
            out.push(x);
        }
        out
    }

    #[test]
    fn test_basic_operations() {
        let mut heap = BinaryHeap::min(Vec::new(), HeapState::Unordered);

        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        heap.push(3);
        heap.push(1);
        heap.push(2);

        assert!(!heap.is_empty());
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.top(), &1);

        assert_eq!(heap.pop(), 1);
        assert_eq!(heap.pop(), 2);
        assert_eq!(heap.pop(), 3);
        assert_eq!(heap.try_pop(), None);
    }

    #[test]
    fn test_build_from_unordered() {
        let heap = BinaryHeap::min(vec![30, 1, 50, 20, 40, 60, 100], HeapState::Unordered);
        assert!(heap.is_valid());
        assert_eq!(drain(heap), vec![1, 20, 30, 40, 50, 60, 100]);

        let heap = BinaryHeap::max(vec![30, 1, 50, 20, 40, 60, 100], HeapState::Unordered);
        assert!(heap.is_valid());
        assert_eq!(drain(heap), vec![100, 60, 50, 40, 30, 20, 1]);
    }

    #[test]
    fn test_kary_build_from_unordered() {
        for k in [3, 4, 8] {
            let heap = KHeap::min(k, vec![30, 1, 50, 20, 40, 60, 100], HeapState::Unordered);
            assert!(heap.is_valid());
            assert_eq!(drain(heap), vec![1, 20, 30, 40, 50, 60, 100]);

            let heap = KHeap::max(k, vec![30, 1, 50, 20, 80, 60, 100], HeapState::Unordered);
            assert!(heap.is_valid());
            assert_eq!(drain(heap), vec![100, 80, 60, 50, 30, 20, 1]);
        }
    }

    #[test]
    fn test_already_heap_skips_build() {
        // deliberately not a heap: the flag must leave the order untouched
        let heap = BinaryHeap::min(vec![5, 1, 2], HeapState::AlreadyHeap);
        assert_eq!(heap.as_slice(), &[5, 1, 2]);
        assert!(!heap.is_valid());

        let heap = BinaryHeap::min(vec![0, 1, 2, 3, 4, 5, 6, 7, 8], HeapState::AlreadyHeap);
        assert!(heap.is_valid());
        assert_eq!(drain(heap), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_single_and_two_elements() {
        let mut heap = KHeap::min(3, vec![7], HeapState::Unordered);
        assert_eq!(heap.top(), &7);
        assert_eq!(heap.pop(), 7);
        assert!(heap.is_empty());

        let heap = BinaryHeap::max(vec![1, 2], HeapState::Unordered);
        assert_eq!(drain(heap), vec![2, 1]);
    }

    #[test]
    fn test_hook_sees_every_swap() {
        let mut heap = ArrayHeap::with_hook(
            Binary,
            MinOrder,
            SwapLog::default(),
            vec![3, 2, 1],
            HeapState::Unordered,
        );
        // build: node 0 swaps with node 2
        assert_eq!(heap.hook().swaps, vec![(0, 2)]);

        heap.push(0);
        // appended at 3, then 3<->1, 1<->0
        assert_eq!(heap.hook().placed, vec![3]);
        assert_eq!(heap.hook().swaps[1..], [(3, 1), (1, 0)]);

        heap.pop();
        assert_eq!(heap.hook().placed, vec![3, 0]);
        assert_eq!(heap.as_slice()[0], 1);
    }

    #[test]
    fn test_custom_comparator() {
        // order by absolute value, smallest first
        let by_abs = |a: &i32, b: &i32| a.abs() > b.abs();
        let heap = ArrayHeap::new(Binary, by_abs, vec![-5, 3, -1, 4, -2], HeapState::Unordered);
        assert_eq!(heap.into_sorted_vec(), vec![-1, -2, 3, 4, -5]);
    }

    #[test]
    fn test_extend_and_collect() {
        let mut heap: BinaryHeap<i32> = (0..10).rev().collect();
        assert!(heap.is_valid());
        heap.extend(vec![-3, 42]);
        assert_eq!(heap.len(), 12);
        assert_eq!(heap.top(), &-3);

        let max: BinaryHeap<i32, MaxOrder> = (0..10).collect();
        assert_eq!(max.top(), &9);
    }

    #[test]
    fn test_clear() {
        let mut heap = KHeap::max(5, (0..20).collect(), HeapState::Unordered);
        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.peek(), None);
        heap.push(4);
        assert_eq!(heap.top(), &4);
    }

    #[test]
    #[should_panic(expected = "heap is empty")]
    fn test_top_on_empty_panics() {
        let heap: BinaryHeap<i32> = BinaryHeap::default();
        let _ = heap.top();
    }

    #[test]
    #[should_panic(expected = "heap is empty")]
    fn test_pop_on_empty_panics() {
        let mut heap = KHeap::<i32>::min(4, Vec::new(), HeapState::Unordered);
        heap.pop();
    }

    #[test]
    fn test_duplicate_values() {
        let heap = KHeap::min(3, vec![2, 1, 2, 1, 2, 1], HeapState::Unordered);
        assert_eq!(heap.into_sorted_vec(), vec![1, 1, 1, 2, 2, 2]);
    }
}
