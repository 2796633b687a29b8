//! Indexed priority queue with O(log n) key updates
//!
//! A plain array heap can push and pop in O(log n), but changing the priority
//! of an element already inside it first needs a linear scan to find the
//! element. [`PriorityQueue`] removes the scan by keeping two hash maps next
//! to the heap:
//!
//! - the **key map** (element → current key), owned by the [`KeyOrder`]
//!   comparator so that every comparison sees the latest keys;
//! - the **index map** (element → current position), owned by the
//!   [`IndexTracker`] swap hook so that every swap performed by the heap
//!   algorithms keeps it in sync.
//!
//! Both maps live inside the [`ArrayHeap`] the queue owns. Moving or cloning a
//! queue therefore moves or deep-copies the maps with it; there is no
//! reference to re-bind.
//!
//! # Time Complexity
//!
//! | Operation        | Binary     | K-ary          |
//! |------------------|------------|----------------|
//! | `push`           | O(log n)   | O(log_k n)     |
//! | `pop`            | O(log n)   | O(k log_k n)   |
//! | `update_key`     | O(log n)   | O(log_k n)     |
//! | `top`, `key_at`  | O(1)       | O(1)           |
//! | `contains`       | O(1)       | O(1)           |
//!
//! # Example
//!
//! ```rust
//! use rust_indexed_heaps::{HeapState, PriorityQueue};
//!
//! let mut queue = PriorityQueue::min(
//!     vec![0, 2, 4, 6, 8, 10, 12],
//!     vec!['m', 'i', 'n', 'h', 'e', 'a', 'p'],
//!     HeapState::AlreadyHeap,
//! );
//!
//! queue.update_key(5, &'e');
//! queue.update_key(1, &'p');
//!
//! assert_eq!(queue.pop(), (0, 'm'));
//! assert_eq!(queue.pop(), (1, 'p'));
//! assert_eq!(queue.key_at(&'e'), &5);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use log::debug;
use rustc_hash::FxBuildHasher;

use crate::arity::{Arity, Binary, KAry};
use crate::array_heap::ArrayHeap;
use crate::traits::{contract_violation, Compare, Heap, HeapError, HeapState, Polarity, SwapHook};

/// Comparator that orders elements by the keys in a live key map
///
/// This is the queue's key map. Keys are looked up on every comparison, so an
/// update is visible to the very next sift.
#[derive(Clone)]
pub struct KeyOrder<E, K, S = FxBuildHasher> {
    keys: HashMap<E, K, S>,
    polarity: Polarity,
}

impl<E, K, S> KeyOrder<E, K, S> {
    /// Returns the polarity this comparator orders by
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }
}

impl<E: Eq + Hash, K: Ord, S: BuildHasher> Compare<E> for KeyOrder<E, K, S> {
    #[inline]
    fn yields(&self, parent: &E, child: &E) -> bool {
        self.polarity.yields(&self.keys[parent], &self.keys[child])
    }
}

impl<E: fmt::Debug, K: fmt::Debug, S> fmt::Debug for KeyOrder<E, K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyOrder")
            .field("keys", &self.keys)
            .field("polarity", &self.polarity)
            .finish()
    }
}

/// Swap hook that tracks the backing position of every element
///
/// This is the queue's index map.
#[derive(Clone)]
pub struct IndexTracker<E, S = FxBuildHasher> {
    positions: HashMap<E, usize, S>,
}

impl<E: Clone + Eq + Hash, S: BuildHasher> SwapHook<E> for IndexTracker<E, S> {
    #[inline]
    fn swapped(&mut self, nodes: &[E], i: usize, j: usize) {
        for index in [i, j] {
            match self.positions.get_mut(&nodes[index]) {
                Some(pos) => *pos = index,
                None => debug_assert!(false, "swapped element at {} has no tracked position", index),
            }
        }
    }

    fn placed(&mut self, nodes: &[E], i: usize) {
        match self.positions.get_mut(&nodes[i]) {
            Some(pos) => *pos = i,
            None => {
                self.positions.insert(nodes[i].clone(), i);
            }
        }
    }

    fn cleared(&mut self) {
        self.positions.clear();
    }
}

impl<E: fmt::Debug, S> fmt::Debug for IndexTracker<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexTracker")
            .field("positions", &self.positions)
            .finish()
    }
}

type Inner<E, K, A, S> = ArrayHeap<E, A, KeyOrder<E, K, S>, IndexTracker<E, S>>;

/// A heap-backed priority queue with O(1) lookup and O(log n) key updates
///
/// # Type Parameters
/// - `E`: the element type; elements are unique and act as map keys
/// - `K`: the priority key type
/// - `A`: the arity strategy, [`Binary`] by default
/// - `S`: the hasher used by both maps, FxHash by default
///
/// # Example
///
/// ```rust
/// use rust_indexed_heaps::{HeapState, PriorityQueue};
///
/// let mut queue = PriorityQueue::max_k(4, vec![3, 9], vec!["low", "high"], HeapState::Unordered);
/// queue.push(5, "mid");
///
/// assert!(queue.contains(&"mid"));
/// assert_eq!(queue.top_key_value(), (&9, &"high"));
///
/// queue.update_key(10, &"low");
/// assert_eq!(queue.pop(), (10, "low"));
/// ```
#[derive(Clone)]
pub struct PriorityQueue<E, K, A = Binary, S = FxBuildHasher> {
    heap: Inner<E, K, A, S>,
}

impl PriorityQueue<(), ()> {
    /// Starts a [`QueueBuilder`] with the default configuration
    /// (min polarity, binary arity, FxHash)
    pub fn builder() -> QueueBuilder {
        QueueBuilder::new()
    }
}

impl<E, K> PriorityQueue<E, K>
where
    E: Clone + Eq + Hash,
    K: Ord,
{
    /// Creates a binary min-queue from aligned keys and elements
    ///
    /// # Panics
    /// Panics if the lengths differ or an element appears twice.
    #[track_caller]
    pub fn min(keys: Vec<K>, elements: Vec<E>, state: HeapState) -> Self {
        QueueBuilder::new().min().state(state).build(keys, elements)
    }

    /// Creates a binary max-queue from aligned keys and elements
    ///
    /// # Panics
    /// Panics if the lengths differ or an element appears twice.
    #[track_caller]
    pub fn max(keys: Vec<K>, elements: Vec<E>, state: HeapState) -> Self {
        QueueBuilder::new().max().state(state).build(keys, elements)
    }
}

impl<E, K> PriorityQueue<E, K, KAry>
where
    E: Clone + Eq + Hash,
    K: Ord,
{
    /// Creates a k-ary min-queue from aligned keys and elements
    ///
    /// # Panics
    /// Panics if `k <= 2`, the lengths differ or an element appears twice.
    #[track_caller]
    pub fn min_k(k: usize, keys: Vec<K>, elements: Vec<E>, state: HeapState) -> Self {
        QueueBuilder::new().min().arity(k).state(state).build(keys, elements)
    }

    /// Creates a k-ary max-queue from aligned keys and elements
    ///
    /// # Panics
    /// Panics if `k <= 2`, the lengths differ or an element appears twice.
    #[track_caller]
    pub fn max_k(k: usize, keys: Vec<K>, elements: Vec<E>, state: HeapState) -> Self {
        QueueBuilder::new().max().arity(k).state(state).build(keys, elements)
    }
}

impl<E, K, A, S> PriorityQueue<E, K, A, S>
where
    E: Clone + Eq + Hash,
    K: Ord,
    A: Arity,
    S: BuildHasher,
{
    /// Returns the number of elements
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the queue's polarity
    pub fn polarity(&self) -> Polarity {
        self.heap.comparator().polarity
    }

    /// Returns the arity strategy
    pub fn arity(&self) -> A {
        self.heap.arity()
    }

    fn keys(&self) -> &HashMap<E, K, S> {
        &self.heap.comparator().keys
    }

    fn positions(&self) -> &HashMap<E, usize, S> {
        &self.heap.hook().positions
    }

    /// Returns true if `element` is in the queue
    ///
    /// # Time Complexity
    /// O(1)
    pub fn contains(&self, element: &E) -> bool {
        self.positions().contains_key(element)
    }

    /// Returns the key of `element`, or `None` if it is not in the queue
    pub fn get_key(&self, element: &E) -> Option<&K> {
        self.keys().get(element)
    }

    /// Returns the key of `element`
    ///
    /// # Panics
    /// Panics if `element` is not in the queue.
    #[track_caller]
    pub fn key_at(&self, element: &E) -> &K {
        match self.get_key(element) {
            Some(key) => key,
            None => contract_violation(HeapError::ElementNotFound),
        }
    }

    /// Returns the current backing position of `element`
    pub fn position_of(&self, element: &E) -> Option<usize> {
        self.positions().get(element).copied()
    }

    /// Returns the elements in backing (level) order, not priority order
    pub fn as_slice(&self) -> &[E] {
        self.heap.as_slice()
    }

    /// Returns the root key and element, or `None` if the queue is empty
    pub fn peek(&self) -> Option<(&K, &E)> {
        let top = self.heap.peek()?;
        Some((&self.keys()[top], top))
    }

    /// Returns the root element
    ///
    /// # Panics
    /// Panics if the queue is empty.
    #[track_caller]
    pub fn top(&self) -> &E {
        self.heap.top()
    }

    /// Returns the root key and element
    ///
    /// # Panics
    /// Panics if the queue is empty.
    #[track_caller]
    pub fn top_key_value(&self) -> (&K, &E) {
        match self.peek() {
            Some(pair) => pair,
            None => contract_violation(HeapError::Empty),
        }
    }

    /// Inserts `element` with priority `key`
    ///
    /// # Errors
    /// Returns [`HeapError::DuplicateElement`] if `element` is already queued;
    /// the queue is left unchanged.
    pub fn try_push(&mut self, key: K, element: E) -> Result<(), HeapError> {
        if self.contains(&element) {
            return Err(HeapError::DuplicateElement);
        }

        // the index is recorded by the hook when the heap appends the element
        self.heap.comparator_mut().keys.insert(element.clone(), key);
        self.heap.push(element);
        Ok(())
    }

    /// Inserts `element` with priority `key`
    ///
    /// # Panics
    /// Panics if `element` is already queued.
    #[track_caller]
    pub fn push(&mut self, key: K, element: E) {
        if let Err(err) = self.try_push(key, element) {
            contract_violation(err);
        }
    }

    /// Moves `element` toward the root by giving it the key `key`
    ///
    /// The new key must not be worse than the current one: not greater for a
    /// min-queue, not smaller for a max-queue. Only a single sift-up runs, which
    /// keeps the update logarithmic.
    ///
    /// # Errors
    /// - [`HeapError::ElementNotFound`] if `element` is not queued
    /// - [`HeapError::KeyNotImproved`] if `key` would move the element away
    ///   from the root
    ///
    /// The queue is left unchanged on error.
    pub fn try_update_key(&mut self, key: K, element: &E) -> Result<(), HeapError> {
        let index_to_fix = self
            .position_of(element)
            .ok_or(HeapError::ElementNotFound)?;

        let order = self.heap.comparator_mut();
        let polarity = order.polarity;
        let current = order
            .keys
            .get_mut(element)
            .ok_or(HeapError::ElementNotFound)?;

        if !polarity.improves(current, &key) {
            return Err(HeapError::KeyNotImproved);
        }
        *current = key;

        self.heap.sift_up(index_to_fix);
        Ok(())
    }

    /// Moves `element` toward the root by giving it the key `key`
    ///
    /// # Panics
    /// Panics if `element` is not queued, or if `key` is worse than the
    /// current key under the queue's polarity.
    #[track_caller]
    pub fn update_key(&mut self, key: K, element: &E) {
        if let Err(err) = self.try_update_key(key, element) {
            contract_violation(err);
        }
    }

    /// Removes and returns the root key and element, or `None` if empty
    pub fn try_pop(&mut self) -> Option<(K, E)> {
        // the heap re-registers the new root at index 0 before sifting it down
        let root = self.heap.try_pop()?;

        self.heap.hook_mut().positions.remove(&root);
        match self.heap.comparator_mut().keys.remove(&root) {
            Some(key) => Some((key, root)),
            None => contract_violation(HeapError::ElementNotFound),
        }
    }

    /// Removes and returns the root key and element
    ///
    /// # Panics
    /// Panics if the queue is empty.
    #[track_caller]
    pub fn pop(&mut self) -> (K, E) {
        match self.try_pop() {
            Some(pair) => pair,
            None => contract_violation(HeapError::Empty),
        }
    }

    /// Removes every element
    pub fn clear(&mut self) {
        self.heap.clear();
        self.heap.comparator_mut().keys.clear();
    }

    /// Returns true if the heap order holds and both maps agree with the
    /// backing sequence
    ///
    /// # Time Complexity
    /// O(n)
    pub fn is_consistent(&self) -> bool {
        let nodes = self.heap.as_slice();
        self.heap.is_valid()
            && self.keys().len() == nodes.len()
            && self.positions().len() == nodes.len()
            && nodes.iter().enumerate().all(|(i, e)| {
                self.keys().contains_key(e) && self.positions().get(e) == Some(&i)
            })
    }

    /// Consumes the queue and returns its pairs in extraction order
    pub fn into_sorted_vec(mut self) -> Vec<(K, E)> {
        let mut sorted = Vec::with_capacity(self.len());
        while let Some(pair) = self.try_pop() {
            sorted.push(pair);
        }
        sorted
    }
}

impl<E, K, A, S> Extend<(K, E)> for PriorityQueue<E, K, A, S>
where
    E: Clone + Eq + Hash,
    K: Ord,
    A: Arity,
    S: BuildHasher,
{
    /// # Panics
    /// Panics if an element is already queued.
    fn extend<I: IntoIterator<Item = (K, E)>>(&mut self, iter: I) {
        for (key, element) in iter {
            self.push(key, element);
        }
    }
}

impl<E, K> Default for PriorityQueue<E, K>
where
    E: Clone + Eq + Hash,
    K: Ord,
{
    fn default() -> Self {
        QueueBuilder::new().build_empty()
    }
}

impl<E, K, A, S> fmt::Debug for PriorityQueue<E, K, A, S>
where
    E: fmt::Debug,
    K: fmt::Debug,
    A: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("heap", &self.heap)
            .finish()
    }
}

/// Fluent configuration for [`PriorityQueue`]
///
/// # Example
///
/// ```rust
/// use rust_indexed_heaps::PriorityQueue;
///
/// let mut queue = PriorityQueue::builder()
///     .max()
///     .arity(3)
///     .with_capacity(16)
///     .build(vec![1, 7, 4], vec!['a', 'b', 'c']);
///
/// assert_eq!(queue.pop(), (7, 'b'));
/// assert_eq!(queue.arity().k(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct QueueBuilder<A = Binary, S = FxBuildHasher> {
    arity: A,
    polarity: Polarity,
    state: HeapState,
    capacity: usize,
    hasher: S,
}

impl QueueBuilder {
    /// Creates a builder for a binary min-queue hashed with FxHash
    pub fn new() -> Self {
        QueueBuilder {
            arity: Binary,
            polarity: Polarity::Min,
            state: HeapState::Unordered,
            capacity: 0,
            hasher: FxBuildHasher::default(),
        }
    }
}

impl Default for QueueBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Arity, S: BuildHasher + Clone> QueueBuilder<A, S> {
    /// Smallest key first
    pub fn min(self) -> Self {
        self.polarity(Polarity::Min)
    }

    /// Largest key first
    pub fn max(self) -> Self {
        self.polarity(Polarity::Max)
    }

    /// Sets the polarity
    pub fn polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Declares that the initial keys already satisfy the heap property
    pub fn already_heap(self) -> Self {
        self.state(HeapState::AlreadyHeap)
    }

    /// Sets whether the initial sequence needs the O(n) build
    pub fn state(mut self, state: HeapState) -> Self {
        self.state = state;
        self
    }

    /// Reserves room for at least `capacity` elements in the heap and maps
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Switches to a k-ary heap
    ///
    /// # Panics
    /// Panics if `k <= 2`.
    #[track_caller]
    pub fn arity(self, k: usize) -> QueueBuilder<KAry, S> {
        self.with_arity(KAry::new(k))
    }

    /// Switches to a k-ary heap, rejecting `k <= 2`
    pub fn try_arity(self, k: usize) -> Result<QueueBuilder<KAry, S>, HeapError> {
        Ok(self.with_arity(KAry::try_new(k)?))
    }

    /// Switches to an explicit arity strategy
    pub fn with_arity<B: Arity>(self, arity: B) -> QueueBuilder<B, S> {
        QueueBuilder {
            arity,
            polarity: self.polarity,
            state: self.state,
            capacity: self.capacity,
            hasher: self.hasher,
        }
    }

    /// Hashes elements with `hasher` instead of FxHash
    pub fn hasher<T: BuildHasher + Clone>(self, hasher: T) -> QueueBuilder<A, T> {
        QueueBuilder {
            arity: self.arity,
            polarity: self.polarity,
            state: self.state,
            capacity: self.capacity,
            hasher,
        }
    }

    /// Creates an empty queue
    pub fn build_empty<E, K>(self) -> PriorityQueue<E, K, A, S>
    where
        E: Clone + Eq + Hash,
        K: Ord,
    {
        debug!(
            "empty priority queue: {:?} polarity, degree {}, capacity {}",
            self.polarity,
            self.arity.degree(),
            self.capacity
        );

        let order = KeyOrder {
            keys: HashMap::with_capacity_and_hasher(self.capacity, self.hasher.clone()),
            polarity: self.polarity,
        };
        let tracker = IndexTracker {
            positions: HashMap::with_capacity_and_hasher(self.capacity, self.hasher),
        };

        PriorityQueue {
            heap: ArrayHeap::with_hook(
                self.arity,
                order,
                tracker,
                Vec::with_capacity(self.capacity),
                HeapState::AlreadyHeap,
            ),
        }
    }

    /// Creates a queue from aligned keys and elements
    ///
    /// `keys[i]` is the key of `elements[i]`.
    ///
    /// # Panics
    /// Panics if the lengths differ or an element appears twice.
    #[track_caller]
    pub fn build<E, K>(self, keys: Vec<K>, elements: Vec<E>) -> PriorityQueue<E, K, A, S>
    where
        E: Clone + Eq + Hash,
        K: Ord,
    {
        match self.try_build(keys, elements) {
            Ok(queue) => queue,
            Err(err) => contract_violation(err),
        }
    }

    /// Creates a queue from aligned keys and elements
    ///
    /// # Errors
    /// - [`HeapError::LengthMismatch`] if the lengths differ
    /// - [`HeapError::DuplicateElement`] if an element appears twice
    pub fn try_build<E, K>(
        self,
        keys: Vec<K>,
        mut elements: Vec<E>,
    ) -> Result<PriorityQueue<E, K, A, S>, HeapError>
    where
        E: Clone + Eq + Hash,
        K: Ord,
    {
        if keys.len() != elements.len() {
            return Err(HeapError::LengthMismatch {
                keys: keys.len(),
                elements: elements.len(),
            });
        }

        let capacity = self.capacity.max(elements.len());
        let mut key_map = HashMap::with_capacity_and_hasher(capacity, self.hasher.clone());
        let mut positions = HashMap::with_capacity_and_hasher(capacity, self.hasher);

        for (index, (key, element)) in keys.into_iter().zip(elements.iter()).enumerate() {
            if positions.insert(element.clone(), index).is_some() {
                return Err(HeapError::DuplicateElement);
            }
            key_map.insert(element.clone(), key);
        }
        elements.reserve(capacity - elements.len());

        debug!(
            "priority queue: {} elements, {:?} polarity, degree {}, {:?}",
            elements.len(),
            self.polarity,
            self.arity.degree(),
            self.state
        );

        let order = KeyOrder {
            keys: key_map,
            polarity: self.polarity,
        };
        let tracker = IndexTracker { positions };

        Ok(PriorityQueue {
            heap: ArrayHeap::with_hook(self.arity, order, tracker, elements, self.state),
        })
    }
}
