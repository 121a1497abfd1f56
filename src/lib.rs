//! Fibonacci heap priority queue for Rust
//!
//! This crate provides a Fibonacci heap with efficient `decrease_key` support,
//! as described by Fredman and Tarjan, plus the graph algorithms that benefit
//! from it.
//!
//! # Features
//!
//! - **Fibonacci Heap**: O(1) amortized insert and decrease_key; O(log n) amortized extract_min and delete; union linear in the absorbed heap
//! - **Integer data handles**: every element carries an `i64` handle for by-value lookup
//! - **Node references**: generation-checked [`NodeRef`]s for O(1) decrease_key without a forest walk
//! - **Node recycling**: extracted nodes are pooled and reused by later inserts
//! - **Invariant checking**: [`FibonacciHeap::validate`] audits the whole forest
//! - **Pathfinding**: Dijkstra, A* and Prim driven by the heap
//!
//! # Example
//!
//! ```rust
//! use fibheap::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! heap.insert(5, 1).unwrap();
//! let handle = heap.insert(8, 2).unwrap();
//! heap.insert(3, 3).unwrap();
//!
//! heap.decrease_key_ref(&handle, 1).unwrap();
//! assert_eq!(heap.find_min(), Some(2));
//!
//! assert!(heap.decrease_key(1, 0));
//! assert_eq!(heap.extract_min(), Some(1));
//! assert_eq!(heap.len(), 2);
//! ```
//!
//! # Cargo features
//!
//! - `debug-invariants`: validate the forest after every mutating operation
//!   and panic on the first violation.

pub mod arena;
pub mod config;
pub mod fibonacci;
pub mod pathfinding;
pub mod rank;
mod ring;
pub mod traits;
pub mod validate;

// Re-export the main types for convenience
pub use arena::{NodeId, NodeRef};
pub use config::{DuplicatePolicy, HeapConfig};
pub use fibonacci::{DrainSorted, FibonacciHeap, NodeView};
pub use traits::{Data, Handle, Heap, HeapError};
pub use validate::InvariantViolation;
