//! Circular doubly linked rings over arena indices.
//!
//! Every node belongs to exactly one ring: the root list, or the child ring of
//! its parent. In a ring:
//! - A single node points to itself (both `left` and `right`)
//! - There is no head or tail; any member can be the entry point
//! - Splicing two rings together is O(1)
//! - Iteration wraps around, so the starting point must be tracked
//!
//! These operations only touch sibling links. Parent, child, degree and mark
//! bookkeeping belongs to the heap.

use crate::arena::{Arena, NodeId};

impl<P> Arena<P> {
    /// Turns `x` into a ring of one.
    #[inline]
    pub(crate) fn make_circular(&mut self, x: NodeId) {
        let node = self.node_mut(x);
        node.left = x;
        node.right = x;
    }

    /// Inserts the singleton `x` just left of `anchor`, i.e. at the "end" of
    /// the ring when `anchor` is treated as its entry point.
    #[inline]
    pub(crate) fn insert_before(&mut self, anchor: NodeId, x: NodeId) {
        let anchor_left = self.node(anchor).left;
        {
            let node = self.node_mut(x);
            node.right = anchor;
            node.left = anchor_left;
        }
        self.node_mut(anchor_left).right = x;
        self.node_mut(anchor).left = x;
    }

    /// Removes `x` from its ring.
    ///
    /// The neighbours are joined; `x` keeps its stale sibling links, so the
    /// caller must relink it (or read `x.right` as the old neighbour).
    #[inline]
    pub(crate) fn unlink(&mut self, x: NodeId) {
        let (left, right) = {
            let node = self.node(x);
            (node.left, node.right)
        };
        self.node_mut(left).right = right;
        self.node_mut(right).left = left;
    }

    /// Joins the ring containing `b` into the ring containing `a`.
    ///
    /// `b`'s ring is inserted right after `a`. The two rings must be distinct.
    pub(crate) fn splice(&mut self, a: NodeId, b: NodeId) {
        let a_right = self.node(a).right;
        let b_left = self.node(b).left;
        self.node_mut(a).right = b;
        self.node_mut(b).left = a;
        self.node_mut(b_left).right = a_right;
        self.node_mut(a_right).left = b_left;
    }

    /// Iterates the members of the ring containing `start`, beginning at
    /// `start` and following `right` links.
    ///
    /// The ring must not be modified while iterating.
    pub(crate) fn ring(&self, start: NodeId) -> Ring<'_, P> {
        Ring {
            arena: self,
            start,
            next: Some(start),
        }
    }

    /// Number of members in the ring containing `start`.
    pub(crate) fn ring_len(&self, start: NodeId) -> usize {
        self.ring(start).count()
    }
}

/// Iterator over one sibling ring.
pub(crate) struct Ring<'a, P> {
    arena: &'a Arena<P>,
    start: NodeId,
    next: Option<NodeId>,
}

impl<P> Iterator for Ring<'_, P> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        let right = self.arena.node(current).right;
        self.next = (right != self.start).then_some(right);
        Some(current)
    }
}
