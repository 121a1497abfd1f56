//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert and decrease_key
//! - O(m) union, where m is the size of the absorbed heap
//! - O(log n) amortized extract_min and delete
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked list, as are the children of every node. The heap
//! keeps a reference to the minimum root.
//!
//! # Addressing nodes
//!
//! Every node carries an integer data handle. Two ways of addressing a node are
//! offered:
//!
//! - By [`NodeRef`], returned from [`FibonacciHeap::insert`]. This is O(1) and is
//!   what [`decrease_key_ref`](FibonacciHeap::decrease_key_ref) and
//!   [`delete_ref`](FibonacciHeap::delete_ref) need to meet their amortized bounds.
//! - By data value, through [`contains`](FibonacciHeap::contains),
//!   [`decrease_key`](FibonacciHeap::decrease_key) and
//!   [`delete`](FibonacciHeap::delete). These walk the forest and cost O(n).
//!
//! # Node lifetime
//!
//! Nodes are only created by insert and only retired by extract_min (delete
//! extracts as well). Links, cuts and consolidation relocate nodes between
//! rings; they never allocate or free. Retired nodes go to a free pool and are
//! reused by later inserts.

use crate::arena::{Arena, NodeId, NodeRef};
use crate::config::{DuplicatePolicy, HeapConfig};
use crate::rank::{self, Degree};
use crate::traits::{Data, Heap, HeapError};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;
use tracing::{debug, trace, warn};

/// Fibonacci Heap
///
/// Single-threaded: mutation requires `&mut self`, and the heap holds no locks.
///
/// # Example
///
/// ```rust
/// use fibheap::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// heap.insert(50, 1).unwrap();
/// let handle = heap.insert(90, 2).unwrap();
/// heap.decrease_key_ref(&handle, 10).unwrap();
/// assert_eq!(heap.find_min(), Some(2));
/// assert_eq!(heap.extract_min(), Some(2));
/// assert_eq!(heap.extract_min(), Some(1));
/// ```
pub struct FibonacciHeap<P: Ord> {
    pub(crate) arena: Arena<P>,
    pub(crate) min: Option<NodeId>,
    pub(crate) len: usize,
    /// Live count per data handle, used to reject duplicates in O(1).
    present: FxHashMap<Data, u32>,
    config: HeapConfig,
}

/// Read-only view of one node's position in the forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeView<'a, P> {
    /// Current key
    pub key: &'a P,
    /// Data handle
    pub data: Data,
    /// Number of direct children
    pub degree: Degree,
    /// Whether the node lost a child since it last became a child
    pub marked: bool,
    /// Data handle of the parent, `None` for roots
    pub parent: Option<Data>,
}

impl<P: Ord> FibonacciHeap<P> {
    /// Creates an empty heap with the default configuration.
    pub fn new() -> Self {
        Self::with_config(HeapConfig::default())
    }

    /// Creates an empty heap with the given configuration.
    pub fn with_config(config: HeapConfig) -> Self {
        Self {
            arena: Arena::with_capacity(config.capacity),
            min: None,
            len: 0,
            present: FxHashMap::default(),
            config,
        }
    }

    /// The configuration this heap was built with.
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of retired nodes held for reuse.
    pub fn pool_len(&self) -> usize {
        self.arena.pooled()
    }

    /// Number of trees in the root list.
    pub fn root_count(&self) -> usize {
        self.min.map_or(0, |min| self.arena.ring_len(min))
    }

    /// Inserts `data` with priority `key`.
    ///
    /// The node is added to the root list; no consolidation happens here.
    ///
    /// # Errors
    /// - [`HeapError::NegativeData`] if `data < 0`
    /// - [`HeapError::DuplicateData`] if `data` is present and the heap was
    ///   configured with [`DuplicatePolicy::Reject`]
    ///
    /// # Time Complexity
    /// O(1)
    pub fn insert(&mut self, key: P, data: Data) -> Result<NodeRef, HeapError> {
        if data < 0 {
            warn!(data, "rejected insert of negative data handle");
            return Err(HeapError::NegativeData(data));
        }
        if self.config.duplicates == DuplicatePolicy::Reject && self.present.contains_key(&data) {
            warn!(data, "rejected insert of duplicate data handle");
            return Err(HeapError::DuplicateData(data));
        }
        *self.present.entry(data).or_insert(0) += 1;

        let node = self.arena.alloc(key, data);
        match self.min {
            Some(min) => {
                self.arena.insert_before(min, node);
                if self.arena.key(node) < self.arena.key(min) {
                    self.min = Some(node);
                }
            }
            None => self.min = Some(node),
        }
        self.len += 1;
        trace!(data, len = self.len, "insert");
        self.check();
        Ok(self.arena.reference(node))
    }

    /// Returns the data handle of the minimum without removing it.
    ///
    /// # Time Complexity
    /// O(1)
    pub fn find_min(&self) -> Option<Data> {
        self.min.map(|min| self.arena.node(min).data)
    }

    /// Returns the minimum key and its data handle without removing them.
    pub fn peek_entry(&self) -> Option<(&P, Data)> {
        self.min
            .map(|min| (self.arena.key(min), self.arena.node(min).data))
    }

    /// Removes the minimum and returns its data handle.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn extract_min(&mut self) -> Option<Data> {
        self.pop_entry().map(|(_, data)| data)
    }

    /// Removes the minimum and returns its key and data handle.
    pub fn pop_entry(&mut self) -> Option<(P, Data)> {
        let min = self.min?;
        Some(self.extract_root(min))
    }

    /// Lowers the key of the first node holding `data`.
    ///
    /// Returns false if `data` is absent or `key` is greater than the current
    /// key; the heap is unchanged in that case. An equal key is accepted.
    ///
    /// # Time Complexity
    /// O(n) for the lookup, then O(1) amortized. Use
    /// [`decrease_key_ref`](Self::decrease_key_ref) to skip the lookup.
    pub fn decrease_key(&mut self, data: Data, key: P) -> bool {
        match self.find(data) {
            Some(node) => self.decrease_node(node, key).is_ok(),
            None => false,
        }
    }

    /// Lowers the key of the node behind `handle`.
    ///
    /// # Errors
    /// - [`HeapError::InvalidHandle`] if the node has been removed
    /// - [`HeapError::PriorityNotDecreased`] if `key` is greater than the
    ///   current key
    ///
    /// # Time Complexity
    /// O(1) amortized
    pub fn decrease_key_ref(&mut self, handle: &NodeRef, key: P) -> Result<(), HeapError> {
        let node = self.arena.resolve(handle).ok_or(HeapError::InvalidHandle)?;
        self.decrease_node(node, key)
    }

    /// Removes the first node holding `data`.
    ///
    /// Returns false, leaving the heap unchanged, if `data` is absent.
    ///
    /// # Time Complexity
    /// O(n) for the lookup, then O(log n) amortized
    pub fn delete(&mut self, data: Data) -> bool {
        match self.find(data) {
            Some(node) => {
                self.remove_node(node);
                true
            }
            None => false,
        }
    }

    /// Removes the node behind `handle`, returning its key and data handle.
    ///
    /// # Errors
    /// [`HeapError::InvalidHandle`] if the node has already been removed.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn delete_ref(&mut self, handle: &NodeRef) -> Result<(P, Data), HeapError> {
        let node = self.arena.resolve(handle).ok_or(HeapError::InvalidHandle)?;
        Ok(self.remove_node(node))
    }

    /// Returns true if some node holds `data`.
    ///
    /// # Time Complexity
    /// O(n)
    pub fn contains(&self, data: Data) -> bool {
        self.find(data).is_some()
    }

    /// Returns true if `handle` still refers to a node in this heap.
    pub fn contains_ref(&self, handle: &NodeRef) -> bool {
        self.arena.resolve(handle).is_some()
    }

    /// Reference to the first node holding `data`. O(n).
    ///
    /// Recovers a [`NodeRef`] for nodes that arrived through
    /// [`union`](Self::union), whose earlier references were invalidated.
    pub fn handle_of(&self, data: Data) -> Option<NodeRef> {
        self.find(data).map(|node| self.arena.reference(node))
    }

    /// Current key of the first node holding `data`. O(n).
    pub fn key_of(&self, data: Data) -> Option<&P> {
        self.find(data).map(|node| self.arena.key(node))
    }

    /// Current key of the node behind `handle`. O(1).
    pub fn key_of_ref(&self, handle: &NodeRef) -> Option<&P> {
        self.arena.resolve(handle).map(|node| self.arena.key(node))
    }

    /// Structural view of the node behind `handle`.
    pub fn inspect(&self, handle: &NodeRef) -> Option<NodeView<'_, P>> {
        let id = self.arena.resolve(handle)?;
        let node = self.arena.node(id);
        Some(NodeView {
            key: self.arena.key(id),
            data: node.data,
            degree: node.degree,
            marked: node.marked,
            parent: node.parent.map(|parent| self.arena.node(parent).data),
        })
    }

    /// Moves every element of `other` into this heap, leaving `other` empty.
    ///
    /// The two root lists are spliced together without consolidation. The
    /// donor's nodes are re-homed into this heap's arena, so references issued
    /// by `other` are invalidated; references issued by `self` stay valid.
    ///
    /// # Time Complexity
    /// O(m) in the donor's m live nodes, not the O(1) of a pointer-based
    /// Fibonacci heap: each heap owns its arena, so the donor's nodes are
    /// copied over before the O(1) root-list splice. Retired donor slots are
    /// not copied.
    pub fn union(&mut self, other: &mut Self) {
        let Some(other_min) = other.min else {
            other.clear();
            return;
        };

        let map = self.arena.absorb(&mut other.arena);
        let other_min = map[other_min.index()].expect("the donor minimum is a live node");

        match self.min {
            Some(min) => {
                self.arena.splice(min, other_min);
                if self.arena.key(other_min) < self.arena.key(min) {
                    self.min = Some(other_min);
                }
            }
            None => self.min = Some(other_min),
        }

        for (data, count) in other.present.drain() {
            let entry = self.present.entry(data).or_insert(0);
            if *entry > 0 && self.config.duplicates == DuplicatePolicy::Reject {
                warn!(data, "union introduced a duplicate data handle");
            }
            *entry += count;
        }
        self.len += other.len;
        debug!(len = self.len, absorbed = other.len, "union");
        other.clear();
        self.check();
    }

    /// Removes all elements and discards the free pool.
    ///
    /// # Time Complexity
    /// O(1) plus dropping the keys
    pub fn clear(&mut self) {
        self.arena.clear();
        self.present.clear();
        self.min = None;
        self.len = 0;
    }

    /// Returns an iterator that extracts entries in ascending key order.
    ///
    /// Entries not consumed stay in the heap.
    pub fn drain_sorted(&mut self) -> DrainSorted<'_, P> {
        DrainSorted { heap: self }
    }

    /// Locates the first node holding `data`.
    ///
    /// Walks the root ring starting at the minimum, then every child ring,
    /// depth first, with an explicit stack.
    fn find(&self, data: Data) -> Option<NodeId> {
        let mut rings: SmallVec<[NodeId; 32]> = SmallVec::new();
        rings.push(self.min?);
        while let Some(start) = rings.pop() {
            for id in self.arena.ring(start) {
                let node = self.arena.node(id);
                if node.data == data {
                    return Some(id);
                }
                if let Some(child) = node.child {
                    rings.push(child);
                }
            }
        }
        None
    }

    fn decrease_node(&mut self, node: NodeId, key: P) -> Result<(), HeapError> {
        if key > *self.arena.key(node) {
            return Err(HeapError::PriorityNotDecreased);
        }
        self.arena.node_mut(node).key = Some(key);

        if let Some(parent) = self.arena.node(node).parent {
            if self.arena.key(node) < self.arena.key(parent) {
                self.cut(node, parent);
                self.cascading_cut(parent);
            }
        }
        if let Some(min) = self.min {
            if self.arena.key(node) < self.arena.key(min) {
                self.min = Some(node);
            }
        }
        self.check();
        Ok(())
    }

    /// Removes an arbitrary node by treating it as the minimum.
    ///
    /// This stands in for decreasing the key to negative infinity: the node
    /// is cut to the root list (with the usual cascade) and made the minimum,
    /// then extracted.
    fn remove_node(&mut self, node: NodeId) -> (P, Data) {
        if let Some(parent) = self.arena.node(node).parent {
            self.cut(node, parent);
            self.cascading_cut(parent);
        }
        self.min = Some(node);
        self.extract_root(node)
    }

    /// Extracts `z`, which must be the root `self.min` points at.
    fn extract_root(&mut self, z: NodeId) -> (P, Data) {
        debug_assert_eq!(self.min, Some(z));

        if let Some(child) = self.arena.node_mut(z).child.take() {
            let mut current = child;
            loop {
                let node = self.arena.node_mut(current);
                node.parent = None;
                node.marked = false;
                let next = node.right;
                if next == child {
                    break;
                }
                current = next;
            }
            self.arena.splice(z, child);
            self.arena.node_mut(z).degree = 0;
        }

        let right = self.arena.node(z).right;
        if right == z {
            self.min = None;
        } else {
            self.arena.unlink(z);
            self.min = Some(right);
            self.consolidate(right);
        }

        self.len -= 1;
        let data = self.arena.node(z).data;
        let key = self
            .arena
            .retire(z, self.config.pool_limit)
            .expect("the extracted root is a live node");
        if let Some(count) = self.present.get_mut(&data) {
            *count -= 1;
            if *count == 0 {
                self.present.remove(&data);
            }
        }
        trace!(data, len = self.len, "extract_min");
        self.check();
        (key, data)
    }

    /// Links trees of equal degree until every root has a distinct degree,
    /// then recomputes the minimum.
    ///
    /// `start` is any root. Linking moves roots out of the ring mid-walk, so
    /// both the walk's stopping point and the saved next root are advanced
    /// whenever the node they name is linked away.
    fn consolidate(&mut self, start: NodeId) {
        let mut table: SmallVec<[Option<NodeId>; 64]> =
            SmallVec::from_elem(None, rank::table_size(self.len));
        let mut start = start;
        let mut w = start;
        let mut roots = 0usize;
        let mut links = 0usize;

        loop {
            roots += 1;
            let mut x = w;
            let mut next = self.arena.node(w).right;
            let mut d = self.arena.node(x).degree as usize;

            while let Some(mut y) = table.get(d).copied().flatten() {
                if self.arena.key(x) > self.arena.key(y) {
                    std::mem::swap(&mut x, &mut y);
                }
                if y == start {
                    start = self.arena.node(start).right;
                }
                if y == next {
                    next = self.arena.node(next).right;
                }
                self.link(y, x);
                links += 1;
                table[d] = None;
                d += 1;
            }
            if d >= table.len() {
                table.resize(d + 1, None);
            }
            table[d] = Some(x);

            w = next;
            if w == start {
                break;
            }
        }

        let mut min = start;
        for &root in table.iter().flatten() {
            if self.arena.key(root) < self.arena.key(min) {
                min = root;
            }
        }
        self.min = Some(min);
        debug!(
            roots,
            links,
            remaining = roots - links,
            max_degree = table.len(),
            "consolidate"
        );
    }

    /// Makes root `y` a child of root `x`.
    fn link(&mut self, y: NodeId, x: NodeId) {
        self.arena.unlink(y);
        match self.arena.node(x).child {
            Some(child) => self.arena.insert_before(child, y),
            None => {
                self.arena.make_circular(y);
                self.arena.node_mut(x).child = Some(y);
            }
        }
        let node = self.arena.node_mut(y);
        node.parent = Some(x);
        node.marked = false;
        let parent = self.arena.node_mut(x);
        parent.degree = rank::checked_increment(parent.degree);
        trace!(parent = parent.data, degree = parent.degree, "link");
    }

    /// Moves `x` from the child ring of `parent` to the root list.
    fn cut(&mut self, x: NodeId, parent: NodeId) {
        let right = self.arena.node(x).right;
        self.arena.unlink(x);
        {
            let p = self.arena.node_mut(parent);
            p.degree = rank::saturating_decrement(p.degree);
            if p.degree == 0 {
                p.child = None;
            } else if p.child == Some(x) {
                p.child = Some(right);
            }
        }

        match self.min {
            Some(min) => self.arena.insert_before(min, x),
            None => {
                self.arena.make_circular(x);
                self.min = Some(x);
            }
        }
        let node = self.arena.node_mut(x);
        node.parent = None;
        node.marked = false;
        trace!(data = node.data, "cut");
    }

    /// Walks up from `node`, cutting marked ancestors until it reaches an
    /// unmarked one (which gets marked) or a root.
    fn cascading_cut(&mut self, mut node: NodeId) {
        while let Some(parent) = self.arena.node(node).parent {
            if !self.arena.node(node).marked {
                self.arena.node_mut(node).marked = true;
                return;
            }
            self.cut(node, parent);
            node = parent;
        }
    }

    #[cfg(feature = "debug-invariants")]
    #[inline]
    fn check(&self) {
        if let Err(violation) = self.validate() {
            panic!("heap invariant violated: {violation}");
        }
    }

    #[cfg(not(feature = "debug-invariants"))]
    #[inline(always)]
    fn check(&self) {}
}

impl<P: Ord> Default for FibonacciHeap<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Ord> fmt::Debug for FibonacciHeap<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len)
            .field("roots", &self.root_count())
            .field("min", &self.find_min())
            .field("pooled", &self.pool_len())
            .finish()
    }
}

impl<P: Ord> Heap<P> for FibonacciHeap<P> {
    type Handle = NodeRef;

    fn new() -> Self {
        FibonacciHeap::new()
    }

    fn is_empty(&self) -> bool {
        FibonacciHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        FibonacciHeap::len(self)
    }

    fn push(&mut self, priority: P, data: Data) -> Result<NodeRef, HeapError> {
        self.insert(priority, data)
    }

    fn peek(&self) -> Option<(&P, Data)> {
        self.peek_entry()
    }

    fn pop(&mut self) -> Option<(P, Data)> {
        self.pop_entry()
    }

    fn merge(&mut self, other: &mut Self) {
        self.union(other)
    }

    fn clear(&mut self) {
        FibonacciHeap::clear(self)
    }
}

/// Skips entries the heap refuses (negative or duplicate data handles).
impl<P: Ord> Extend<(P, Data)> for FibonacciHeap<P> {
    fn extend<I: IntoIterator<Item = (P, Data)>>(&mut self, iter: I) {
        for (key, data) in iter {
            if let Err(err) = self.insert(key, data) {
                warn!(data, %err, "skipped entry while extending heap");
            }
        }
    }
}

/// Iterator returned by [`FibonacciHeap::drain_sorted`].
pub struct DrainSorted<'a, P: Ord> {
    heap: &'a mut FibonacciHeap<P>,
}

impl<P: Ord> Iterator for DrainSorted<'_, P> {
    type Item = (P, Data);

    fn next(&mut self) -> Option<(P, Data)> {
        self.heap.pop_entry()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

impl<P: Ord> ExactSizeIterator for DrainSorted<'_, P> {}
