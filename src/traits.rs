//! Common traits and errors for the heap
//!
//! - [`Heap`]: the push/pop/peek surface that queue consumers drive
//! - [`Handle`]: marker for opaque references to a node inside a heap
//! - [`HeapError`]: recoverable errors reported by heap operations
//!
//! The [`Heap`] trait keeps consumers (graph searches, drains, batch loaders)
//! independent of the concrete heap type, while the inherent methods on
//! [`FibonacciHeap`](crate::fibonacci::FibonacciHeap) expose the full
//! handle-addressed API.

use thiserror::Error;

/// Integer handle identifying a node for by-value lookup.
///
/// Only non-negative values are accepted on insert.
pub type Data = i64;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// Data handles must be non-negative
    #[error("negative data handle {0} is not supported")]
    NegativeData(Data),
    /// The data handle is already present and duplicates are rejected
    #[error("data handle {0} is already present in the heap")]
    DuplicateData(Data),
    /// The new priority is greater than the current priority
    #[error("new priority is greater than current priority")]
    PriorityNotDecreased,
    /// The handle is no longer valid (element was removed)
    #[error("handle is no longer valid (element was removed)")]
    InvalidHandle,
}

/// A handle to an element in the heap, used for O(1) decrease-key and delete
///
/// This is an opaque type that identifies a specific node. It stays `Copy`
/// because it carries no ownership; validity is checked on every use.
pub trait Handle: Copy + PartialEq + Eq + std::fmt::Debug {}

/// Push/pop surface of a min-priority queue of data handles
///
/// Unlike `BinaryHeap`, entries are (priority, data) pairs so that the ordering
/// key is separate from the handle that consumers hold on to.
///
/// # Example
///
/// ```rust
/// use fibheap::Heap;
/// use fibheap::fibonacci::FibonacciHeap;
///
/// let mut heap: FibonacciHeap<u32> = Heap::new();
/// heap.push(3, 30).unwrap();
/// heap.push(1, 10).unwrap();
/// heap.push(2, 20).unwrap();
///
/// assert_eq!(heap.peek(), Some((&1, 10)));
/// assert_eq!(heap.pop(), Some((1, 10)));
/// ```
pub trait Heap<P: Ord> {
    /// The handle type returned by [`Heap::push`]
    type Handle: Handle;

    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts `data` with the given priority
    ///
    /// # Errors
    /// Returns [`HeapError::NegativeData`] for negative handles and
    /// [`HeapError::DuplicateData`] if duplicates are rejected.
    ///
    /// # Time Complexity
    /// O(1) amortized for Fibonacci heaps.
    fn push(&mut self, priority: P, data: Data) -> Result<Self::Handle, HeapError>;

    /// Returns the minimum priority and its data without removing it
    ///
    /// # Time Complexity
    /// O(1)
    fn peek(&self) -> Option<(&P, Data)>;

    /// Removes and returns the minimum priority and its data
    ///
    /// # Time Complexity
    /// O(log n) amortized
    fn pop(&mut self) -> Option<(P, Data)>;

    /// Moves every element of `other` into this heap, leaving `other` empty
    fn merge(&mut self, other: &mut Self);

    /// Removes all elements
    fn clear(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            HeapError::NegativeData(-3).to_string(),
            "negative data handle -3 is not supported"
        );
        assert_eq!(
            HeapError::DuplicateData(7).to_string(),
            "data handle 7 is already present in the heap"
        );
        assert_eq!(
            HeapError::InvalidHandle.to_string(),
            "handle is no longer valid (element was removed)"
        );
    }
}
