//! Scenario tests for the Fibonacci heap
//!
//! Each test walks through one documented behaviour end to end:
//! - Extract order on float keys
//! - Decrease-key re-rooting with cascading cut marks
//! - Delete by data handle
//! - Union of two heaps
//! - Clear on empty and populated heaps

use fibheap::{DuplicatePolicy, FibonacciHeap, HeapConfig, HeapError, NodeRef};
use ordered_float::OrderedFloat;

/// Inserts keys 0..9 (data == key) and extracts 0, leaving the single tree
///
/// ```text
/// 1 ── 2
///   ├─ 3 ── 4
///   └─ 5 ── 6
///        └─ 7 ── 8
/// ```
fn three_level_tree() -> (FibonacciHeap<i32>, Vec<NodeRef>) {
    let mut heap = FibonacciHeap::new();
    let handles: Vec<NodeRef> = (0..9).map(|i| heap.insert(i, i as i64).unwrap()).collect();
    assert_eq!(heap.extract_min(), Some(0));
    assert_eq!(heap.root_count(), 1);
    (heap, handles)
}

#[test]
fn test_extract_order_with_float_keys() {
    let mut heap = FibonacciHeap::new();
    heap.insert(OrderedFloat(0.5), 1).unwrap();
    heap.insert(OrderedFloat(0.2), 2).unwrap();
    heap.insert(OrderedFloat(0.1), 3).unwrap();

    assert_eq!(heap.find_min(), Some(3));
    assert_eq!(heap.extract_min(), Some(3));
    assert_eq!(heap.extract_min(), Some(2));
    assert_eq!(heap.extract_min(), Some(1));
    assert_eq!(heap.extract_min(), None);
    assert!(heap.is_empty());
}

#[test]
fn test_tree_shape_after_consolidation() {
    let (heap, handles) = three_level_tree();
    let view = |i: usize| heap.inspect(&handles[i]).unwrap();

    assert_eq!(view(1).parent, None);
    assert_eq!(view(1).degree, 3);
    assert_eq!(view(5).parent, Some(1));
    assert_eq!(view(5).degree, 2);
    assert_eq!(view(7).parent, Some(5));
    assert_eq!(view(8).parent, Some(7));
    assert!(heap.inspect(&handles[0]).is_none());
}

#[test]
fn test_decrease_key_reroots_and_marks() {
    let (mut heap, handles) = three_level_tree();

    // Below its grandparent: 8 is cut, its parent 7 becomes marked
    assert!(heap.decrease_key(8, -1));
    let eight = heap.inspect(&handles[8]).unwrap();
    assert_eq!(eight.parent, None);
    assert!(!eight.marked);
    assert_eq!(heap.find_min(), Some(8));
    assert!(heap.inspect(&handles[7]).unwrap().marked);
    assert!(!heap.inspect(&handles[5]).unwrap().marked);
    assert_eq!(heap.root_count(), 2);
    heap.validate().unwrap();

    // Cutting 7 itself marks 5
    heap.decrease_key_ref(&handles[7], 0).unwrap();
    assert_eq!(heap.inspect(&handles[7]).unwrap().parent, None);
    assert!(!heap.inspect(&handles[7]).unwrap().marked);
    assert!(heap.inspect(&handles[5]).unwrap().marked);
    assert_eq!(heap.root_count(), 3);

    // Cutting 6 cascades through the marked 5, which stops at the root 1
    heap.decrease_key_ref(&handles[6], -2).unwrap();
    let five = heap.inspect(&handles[5]).unwrap();
    assert_eq!(five.parent, None);
    assert!(!five.marked);
    assert_eq!(five.degree, 0);
    assert_eq!(heap.inspect(&handles[1]).unwrap().degree, 2);
    assert!(!heap.inspect(&handles[1]).unwrap().marked);
    assert_eq!(heap.root_count(), 5);
    assert_eq!(heap.find_min(), Some(6));
    heap.validate().unwrap();

    let order: Vec<i64> = heap.drain_sorted().map(|(_, data)| data).collect();
    assert_eq!(order, vec![6, 8, 7, 1, 2, 3, 4, 5]);
}

#[test]
fn test_decrease_key_on_root_only_moves_min() {
    let (mut heap, handles) = three_level_tree();
    heap.decrease_key_ref(&handles[1], -5).unwrap();
    assert_eq!(heap.root_count(), 1);
    assert_eq!(heap.peek_entry(), Some((&-5, 1)));
}

#[test]
fn test_decrease_key_without_order_violation_keeps_tree() {
    let (mut heap, handles) = three_level_tree();
    // Equal to its parent's key: no cut
    assert!(heap.decrease_key(8, 7));
    assert_eq!(heap.inspect(&handles[8]).unwrap().parent, Some(7));
    assert!(!heap.inspect(&handles[7]).unwrap().marked);
    assert_eq!(heap.root_count(), 1);
}

#[test]
fn test_decrease_key_failures_leave_heap_unchanged() {
    let (mut heap, handles) = three_level_tree();
    assert!(!heap.decrease_key(4, 100));
    assert!(!heap.decrease_key(42, 0));
    assert_eq!(
        heap.decrease_key_ref(&handles[4], 100),
        Err(HeapError::PriorityNotDecreased)
    );
    assert_eq!(
        heap.decrease_key_ref(&handles[0], -100),
        Err(HeapError::InvalidHandle)
    );
    assert_eq!(heap.key_of(4), Some(&4));
    assert_eq!(heap.len(), 8);
    heap.validate().unwrap();
}

#[test]
fn test_delete_removes_handle() {
    let (mut heap, handles) = three_level_tree();
    let before = heap.len();

    assert!(heap.contains(7));
    assert!(heap.delete(7));
    assert!(!heap.contains(7));
    assert_eq!(heap.len(), before - 1);
    assert!(!heap.contains_ref(&handles[7]));
    heap.validate().unwrap();

    // Second delete is a no-op
    assert!(!heap.delete(7));
    assert_eq!(heap.len(), before - 1);

    // The orphaned child 8 survives
    assert!(heap.contains(8));
    assert_eq!(heap.key_of_ref(&handles[8]), Some(&8));
}

#[test]
fn test_delete_ref_returns_entry() {
    let (mut heap, handles) = three_level_tree();
    assert_eq!(heap.delete_ref(&handles[3]), Ok((3, 3)));
    assert_eq!(heap.delete_ref(&handles[3]), Err(HeapError::InvalidHandle));
    // Deleting the minimum behaves like extract_min
    assert_eq!(heap.delete_ref(&handles[1]), Ok((1, 1)));
    assert_eq!(heap.find_min(), Some(2));
    heap.validate().unwrap();
}

#[test]
fn test_union_merges_without_loss() {
    let mut left = FibonacciHeap::new();
    for data in 1..=3 {
        left.insert(data * 10, data).unwrap();
    }
    let mut right = FibonacciHeap::new();
    for data in 4..=5 {
        right.insert(data - 3, data).unwrap();
    }

    left.union(&mut right);
    assert_eq!(left.len(), 5);
    assert_eq!(left.find_min(), Some(4));
    assert_eq!(right.len(), 0);
    assert!(right.is_empty());
    left.validate().unwrap();

    let order: Vec<i64> = left.drain_sorted().map(|(_, data)| data).collect();
    assert_eq!(order, vec![4, 5, 1, 2, 3]);
}

#[test]
fn test_union_keeps_receiver_handles() {
    let mut left = FibonacciHeap::new();
    let kept = left.insert(50, 1).unwrap();
    let mut right = FibonacciHeap::new();
    let donor = right.insert(60, 2).unwrap();
    right.insert(70, 3).unwrap();

    left.union(&mut right);
    left.decrease_key_ref(&kept, 5).unwrap();
    assert_eq!(left.find_min(), Some(1));
    // The donor's node was re-homed; reach it by value instead
    assert!(!right.contains_ref(&donor));
    assert!(left.decrease_key(2, 1));
    assert_eq!(left.find_min(), Some(2));
}

#[test]
fn test_union_with_empty_heaps() {
    let mut left: FibonacciHeap<i32> = FibonacciHeap::new();
    let mut right = FibonacciHeap::new();
    left.union(&mut right);
    assert!(left.is_empty());

    right.insert(1, 1).unwrap();
    left.union(&mut right);
    assert_eq!(left.len(), 1);
    assert!(right.is_empty());

    let mut empty = FibonacciHeap::new();
    left.union(&mut empty);
    assert_eq!(left.len(), 1);
}

#[test]
fn test_clear_is_idempotent() {
    let mut heap: FibonacciHeap<i32> = FibonacciHeap::new();
    heap.clear();
    assert_eq!(heap.len(), 0);
    assert!(heap.is_empty());

    let (mut heap, handles) = three_level_tree();
    heap.clear();
    heap.clear();
    assert_eq!(heap.len(), 0);
    assert!(heap.is_empty());
    assert_eq!(heap.pool_len(), 0);
    assert!(!heap.contains_ref(&handles[1]));

    // Usable after clearing
    heap.insert(3, 3).unwrap();
    assert_eq!(heap.find_min(), Some(3));
}

#[test]
fn test_duplicate_handles_with_allow_policy() {
    let mut heap =
        FibonacciHeap::with_config(HeapConfig::new().with_duplicates(DuplicatePolicy::Allow));
    heap.insert(5, 9).unwrap();
    heap.insert(2, 9).unwrap();
    assert_eq!(heap.len(), 2);
    assert!(heap.delete(9));
    assert!(heap.contains(9));
    assert!(heap.delete(9));
    assert!(!heap.contains(9));
}

#[test]
fn test_insert_errors() {
    let mut heap = FibonacciHeap::new();
    assert_eq!(heap.insert(1, -3), Err(HeapError::NegativeData(-3)));
    heap.insert(1, 3).unwrap();
    let err = heap.insert(1, 3).unwrap_err();
    assert_eq!(err, HeapError::DuplicateData(3));
    assert_eq!(err.to_string(), "data handle 3 is already present in the heap");
    assert_eq!(heap.len(), 1);
}
