//! Structural invariant checker for [`FibonacciHeap`].
//!
//! Corruption is a programming defect, not a runtime condition callers are
//! expected to handle, so nothing in the heap calls this on its own unless the
//! `debug-invariants` feature is enabled. Tests call
//! [`FibonacciHeap::validate`] after every mutation.

use crate::arena::NodeId;
use crate::fibonacci::FibonacciHeap;
use crate::traits::Data;
use thiserror::Error;

/// A broken structural invariant, naming the data handle of the node at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Walking `right` links revisits a node or reaches a retired slot before
    /// returning to the ring's start.
    #[error("ring through node {0} does not close")]
    BrokenRing(Data),
    /// `node.right.left != node`
    #[error("left link of the right neighbour of node {0} does not point back")]
    BrokenPrevLink(Data),
    /// A ring member's parent link disagrees with the ring it sits in.
    #[error("node {0} has the wrong parent link")]
    WrongParent(Data),
    /// A child's key is smaller than its parent's.
    #[error("node {0} has a smaller key than its parent")]
    HeapOrder(Data),
    /// `degree` differs from the length of the child ring.
    #[error("node {data} records degree {recorded} but has {actual} children")]
    WrongDegree {
        /// The node at fault
        data: Data,
        /// The degree field
        recorded: usize,
        /// The child ring length
        actual: usize,
    },
    /// A root carries a mark.
    #[error("root {0} is marked")]
    MarkedRoot(Data),
    /// Some root has a smaller key than the minimum.
    #[error("root {0} has a smaller key than the minimum")]
    MinNotMinimal(Data),
    /// A subtree with a degree-k root has fewer than F(k+2) nodes.
    #[error("subtree under node {0} is too small for its degree")]
    SubtreeTooSmall(Data),
    /// The recorded length differs from the number of reachable nodes.
    #[error("heap records {expected} nodes but {found} are reachable")]
    SizeMismatch {
        /// The length field
        expected: usize,
        /// Nodes reached by walking the forest
        found: usize,
    },
}

/// Smallest subtree that can hang under a root of the given degree, F(degree + 2).
fn min_subtree_size(degree: usize) -> usize {
    let (mut a, mut b) = (1usize, 1usize);
    for _ in 0..degree {
        (a, b) = (b, a.saturating_add(b));
    }
    b
}

impl<P: Ord> FibonacciHeap<P> {
    /// Checks every structural invariant of the forest.
    ///
    /// Verifies ring closure in both directions, parent links, degrees, heap
    /// order, root marks, the minimum, the Fibonacci subtree size bound, and
    /// the node count. Runs in O(n).
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let Some(min) = self.min else {
            return if self.len == 0 {
                Ok(())
            } else {
                Err(InvariantViolation::SizeMismatch {
                    expected: self.len,
                    found: 0,
                })
            };
        };

        let mut seen = vec![false; self.arena.slots()];
        let mut order = Vec::with_capacity(self.len);

        self.check_ring(min, None, &mut seen, &mut order)?;
        let min_key = self.arena.key(min);
        for &root in &order {
            let node = self.arena.node(root);
            if node.marked {
                return Err(InvariantViolation::MarkedRoot(node.data));
            }
            if self.arena.key(root) < min_key {
                return Err(InvariantViolation::MinNotMinimal(node.data));
            }
        }

        // Breadth-first: `order` grows while it is scanned
        let mut i = 0;
        while i < order.len() {
            let id = order[i];
            i += 1;
            let node = self.arena.node(id);
            let Some(child) = node.child else {
                if node.degree != 0 {
                    return Err(InvariantViolation::WrongDegree {
                        data: node.data,
                        recorded: node.degree as usize,
                        actual: 0,
                    });
                }
                continue;
            };
            let before = order.len();
            let actual = self.check_ring(child, Some(id), &mut seen, &mut order)?;
            if actual != node.degree as usize {
                return Err(InvariantViolation::WrongDegree {
                    data: node.data,
                    recorded: node.degree as usize,
                    actual,
                });
            }
            for &c in &order[before..] {
                if self.arena.key(c) < self.arena.key(id) {
                    return Err(InvariantViolation::HeapOrder(self.arena.node(c).data));
                }
            }
        }

        if order.len() != self.len {
            return Err(InvariantViolation::SizeMismatch {
                expected: self.len,
                found: order.len(),
            });
        }

        // Children come after their parents in `order`
        let mut sizes = vec![1usize; self.arena.slots()];
        for &id in order.iter().rev() {
            let node = self.arena.node(id);
            if sizes[id.index()] < min_subtree_size(node.degree as usize) {
                return Err(InvariantViolation::SubtreeTooSmall(node.data));
            }
            if let Some(parent) = node.parent {
                sizes[parent.index()] += sizes[id.index()];
            }
        }
        Ok(())
    }

    /// Walks one ring, recording its members. Returns the ring length.
    fn check_ring(
        &self,
        start: NodeId,
        parent: Option<NodeId>,
        seen: &mut [bool],
        order: &mut Vec<NodeId>,
    ) -> Result<usize, InvariantViolation> {
        let mut count = 0;
        let mut current = start;
        loop {
            let node = self.arena.node(current);
            if seen[current.index()] || node.key.is_none() {
                return Err(InvariantViolation::BrokenRing(node.data));
            }
            seen[current.index()] = true;
            order.push(current);
            count += 1;

            if node.parent != parent {
                return Err(InvariantViolation::WrongParent(node.data));
            }
            if self.arena.node(node.right).left != current {
                return Err(InvariantViolation::BrokenPrevLink(node.data));
            }
            current = node.right;
            if current == start {
                return Ok(count);
            }
        }
    }
}
