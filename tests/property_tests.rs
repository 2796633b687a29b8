//! Property-based tests using proptest
//!
//! These tests generate random inputs and operation sequences and verify that
//! the heap order and the queue's index maps stay consistent throughout.

use proptest::prelude::*;
use rust_indexed_heaps::arity::{Arity, Binary, KAry};
use rust_indexed_heaps::array_heap::{ArrayHeap, MaxOrder, MinOrder};
use rust_indexed_heaps::{Heap, HeapError, HeapState, Polarity, PriorityQueue, QueueBuilder};

use std::collections::HashMap;

#[ctor::ctor]
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Builds a min-heap, checks the order invariant, and returns the drain order
fn build_and_drain<A: Arity>(arity: A, data: Vec<i32>) -> Result<Vec<i32>, TestCaseError> {
    let heap = ArrayHeap::new(arity, MinOrder, data, HeapState::Unordered);
    prop_assert!(heap.is_valid());
    Ok(heap.into_sorted_vec())
}

/// Applies push/pop operations and compares every pop against a sorted model
fn push_pop_matches_model<A: Arity>(
    arity: A,
    ops: Vec<(bool, i32)>,
) -> Result<(), TestCaseError> {
    let mut heap = ArrayHeap::with_capacity(arity, MaxOrder, 0);
    let mut model: Vec<i32> = Vec::new();

    for (should_pop, value) in ops {
        if should_pop {
            model.sort();
            prop_assert_eq!(heap.try_pop(), model.pop());
        } else {
            heap.push(value);
            model.push(value);
        }

        prop_assert_eq!(heap.len(), model.len());
        prop_assert_eq!(heap.peek().copied(), model.iter().max().copied());
        prop_assert!(heap.is_valid());
    }

    Ok(())
}

/// Applies key updates to a queue and checks the maps against a model
fn updates_match_model<A: Arity>(
    arity: A,
    polarity: Polarity,
    initial: Vec<i32>,
    updates: Vec<(usize, i32)>,
) -> Result<(), TestCaseError> {
    let elements: Vec<u32> = (0..initial.len() as u32).collect();
    let mut queue = QueueBuilder::new()
        .polarity(polarity)
        .with_arity(arity)
        .build(initial.clone(), elements);
    let mut model: HashMap<u32, i32> = initial
        .iter()
        .enumerate()
        .map(|(i, k)| (i as u32, *k))
        .collect();

    prop_assert!(queue.is_consistent());

    for (index, new_key) in updates {
        let element = (index % initial.len()) as u32;
        let old_key = model[&element];
        let result = queue.try_update_key(new_key, &element);

        if polarity.improves(&old_key, &new_key) {
            prop_assert_eq!(result, Ok(()));
            model.insert(element, new_key);
        } else {
            prop_assert_eq!(result, Err(HeapError::KeyNotImproved));
        }

        prop_assert!(queue.is_consistent());
        prop_assert_eq!(queue.get_key(&element), Some(&model[&element]));
    }

    let mut expected: Vec<i32> = model.values().copied().collect();
    expected.sort();
    if polarity == Polarity::Max {
        expected.reverse();
    }

    let mut drained = Vec::new();
    while let Some((key, element)) = queue.try_pop() {
        prop_assert_eq!(model.remove(&element), Some(key));
        prop_assert!(!queue.contains(&element));
        prop_assert!(queue.is_consistent());
        drained.push(key);
    }
    prop_assert_eq!(drained, expected);
    prop_assert!(model.is_empty());

    Ok(())
}

/// Builds the same valid min-queue with and without the O(n) build and
/// checks both yield the same layout and extraction order
fn already_heap_queue_matches_built<A: Arity>(
    arity: A,
    mut keys: Vec<i32>,
) -> Result<(), TestCaseError> {
    // a non-decreasing sequence is a valid min-heap for every arity
    keys.sort();
    let elements: Vec<usize> = (0..keys.len()).collect();

    let trusted = QueueBuilder::new()
        .with_arity(arity)
        .already_heap()
        .build(keys.clone(), elements.clone());
    let built = QueueBuilder::new()
        .with_arity(arity)
        .state(HeapState::Unordered)
        .build(keys, elements);

    prop_assert!(trusted.is_consistent());
    prop_assert_eq!(trusted.as_slice(), built.as_slice());
    prop_assert_eq!(trusted.into_sorted_vec(), built.into_sorted_vec());
    Ok(())
}

proptest! {
    #[test]
    fn prop_build_sorts_binary(data in prop::collection::vec(any::<i32>(), 0..200)) {
        let mut expected = data.clone();
        expected.sort();
        prop_assert_eq!(build_and_drain(Binary, data)?, expected);
    }

    #[test]
    fn prop_build_sorts_kary(
        data in prop::collection::vec(any::<i32>(), 0..200),
        k in 3usize..10,
    ) {
        let mut expected = data.clone();
        expected.sort();
        prop_assert_eq!(build_and_drain(KAry::new(k), data)?, expected);
    }

    #[test]
    fn prop_push_pop_binary(ops in prop::collection::vec((any::<bool>(), -1000i32..1000), 0..300)) {
        push_pop_matches_model(Binary, ops)?;
    }

    #[test]
    fn prop_push_pop_kary(
        ops in prop::collection::vec((any::<bool>(), -1000i32..1000), 0..300),
        k in 3usize..10,
    ) {
        push_pop_matches_model(KAry::new(k), ops)?;
    }

    #[test]
    fn prop_already_heap_skips_build(data in prop::collection::vec(any::<i32>(), 0..100)) {
        // a sorted sequence is a valid min-heap for every arity
        let mut sorted = data;
        sorted.sort();
        let heap = ArrayHeap::new(KAry::new(4), MinOrder, sorted.clone(), HeapState::AlreadyHeap);
        prop_assert_eq!(heap.as_slice(), sorted.as_slice());
        prop_assert!(heap.is_valid());
        prop_assert_eq!(heap.into_sorted_vec(), sorted);
    }

    #[test]
    fn prop_queue_updates_min_binary(
        initial in prop::collection::vec(-500i32..500, 1..60),
        updates in prop::collection::vec((any::<usize>(), -600i32..600), 0..100),
    ) {
        updates_match_model(Binary, Polarity::Min, initial, updates)?;
    }

    #[test]
    fn prop_queue_updates_max_kary(
        initial in prop::collection::vec(-500i32..500, 1..60),
        updates in prop::collection::vec((any::<usize>(), -600i32..600), 0..100),
        k in 3usize..8,
    ) {
        updates_match_model(KAry::new(k), Polarity::Max, initial, updates)?;
    }

    #[test]
    fn prop_queue_already_heap_matches_build(
        keys in prop::collection::vec(-1000i32..1000, 0..120),
        k in 3usize..9,
    ) {
        already_heap_queue_matches_built(Binary, keys.clone())?;
        already_heap_queue_matches_built(KAry::new(k), keys)?;
    }

    #[test]
    fn prop_queue_arities_agree(
        initial in prop::collection::vec(-100i32..100, 0..80),
        k in 3usize..10,
    ) {
        let elements: Vec<usize> = (0..initial.len()).collect();
        let binary = PriorityQueue::min(initial.clone(), elements.clone(), HeapState::Unordered);
        let kary = PriorityQueue::min_k(k, initial, elements, HeapState::Unordered);

        let binary_keys: Vec<i32> = binary.into_sorted_vec().into_iter().map(|(key, _)| key).collect();
        let kary_keys: Vec<i32> = kary.into_sorted_vec().into_iter().map(|(key, _)| key).collect();
        prop_assert_eq!(binary_keys, kary_keys);
    }

    #[test]
    fn prop_queue_positions_track_slice(
        keys in prop::collection::vec(any::<i16>(), 0..100),
        pops in 0usize..50,
    ) {
        let elements: Vec<usize> = (0..keys.len()).collect();
        let mut queue = PriorityQueue::max(keys, elements, HeapState::Unordered);
        for _ in 0..pops {
            queue.try_pop();
        }
        for (i, e) in queue.as_slice().iter().enumerate() {
            prop_assert_eq!(queue.position_of(e), Some(i));
        }
        prop_assert!(queue.is_consistent());
    }
}
