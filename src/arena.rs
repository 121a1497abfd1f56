//! Contiguous node storage for the Fibonacci heap
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`] index, so
//! the parent/child/sibling graph has no ownership cycles. The node that a ring
//! link points at is owned by the arena, never by the link.
//!
//! # Free pool
//!
//! Retired nodes are reset to a canonical singleton state and threaded onto a
//! doubly linked free pool: `child` names the next vacant slot and `parent`
//! the previous one. Insert takes from the pool before growing the vector, so
//! the arena never holds more slots than the peak number of live nodes.
//!
//! A pool limit bounds how many vacant slots are retained. Past it, vacant
//! slots at the end of the vector are released; vacancies below a live slot
//! stay pooled until they are reused or become the tail.
//!
//! # Generations
//!
//! Every slot carries a generation that is bumped when the node is retired. A
//! [`NodeRef`] records the generation it was issued under, so a reference to an
//! extracted node (or to a recycled slot) is detected instead of silently
//! addressing whatever lives there now. Slots created after a release or a
//! clear start above every generation handed out before, so old references
//! never match them.

use crate::rank::Degree;
use crate::traits::{Data, Handle};

/// Index of a node slot in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    fn from_index(index: usize) -> Self {
        NodeId(u32::try_from(index).expect("arena exceeds u32::MAX node slots"))
    }
}

/// Opaque, generation-checked reference to a node, returned by insert.
///
/// A `NodeRef` is only meaningful for the heap that issued it. It becomes
/// invalid once its node is extracted or deleted, when the heap is cleared, and
/// when the heap is merged into another one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub(crate) id: NodeId,
    pub(crate) generation: u32,
}

impl Handle for NodeRef {}

impl NodeRef {
    /// The slot this reference points at.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The slot generation this reference was issued under.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// A heap node.
///
/// `key` is `None` exactly when the slot is retired (pooled or dead).
#[derive(Debug)]
pub(crate) struct Node<P> {
    pub(crate) key: Option<P>,
    pub(crate) data: Data,
    pub(crate) parent: Option<NodeId>,
    pub(crate) child: Option<NodeId>,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) degree: Degree,
    pub(crate) marked: bool,
    pub(crate) generation: u32,
}

impl<P> Node<P> {
    fn singleton(id: NodeId, key: P, data: Data, generation: u32) -> Self {
        Node {
            key: Some(key),
            data,
            parent: None,
            child: None,
            left: id,
            right: id,
            degree: 0,
            marked: false,
            generation,
        }
    }

    /// Resets every structural field, keeping only the generation.
    fn reset(&mut self, id: NodeId) {
        self.data = 0;
        self.parent = None;
        self.child = None;
        self.left = id;
        self.right = id;
        self.degree = 0;
        self.marked = false;
    }
}

/// Node arena with a free pool of retired slots.
#[derive(Debug)]
pub(crate) struct Arena<P> {
    nodes: Vec<Node<P>>,
    free: Option<NodeId>,
    pooled: usize,
    /// Generation for freshly pushed slots
    base_generation: u32,
}

impl<P> Arena<P> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Arena {
            nodes: Vec::with_capacity(capacity),
            free: None,
            pooled: 0,
            base_generation: 0,
        }
    }

    /// Number of retired nodes waiting in the free pool.
    #[inline]
    pub(crate) fn pooled(&self) -> usize {
        self.pooled
    }

    /// Total number of slots, live or not.
    #[inline]
    pub(crate) fn slots(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<P> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<P> {
        &mut self.nodes[id.index()]
    }

    /// Key of a live node.
    #[inline]
    pub(crate) fn key(&self, id: NodeId) -> &P {
        self.node(id)
            .key
            .as_ref()
            .expect("structural links only reach live nodes")
    }

    /// Creates a singleton-ring node, recycling a pooled slot when possible.
    pub(crate) fn alloc(&mut self, key: P, data: Data) -> NodeId {
        match self.free {
            Some(id) => {
                let node = self.node_mut(id);
                debug_assert!(node.key.is_none());
                let next = node.child.take();
                node.key = Some(key);
                node.data = data;
                if let Some(next) = next {
                    self.node_mut(next).parent = None;
                }
                self.free = next;
                self.pooled -= 1;
                id
            }
            None => {
                let id = NodeId::from_index(self.nodes.len());
                self.nodes
                    .push(Node::singleton(id, key, data, self.base_generation));
                id
            }
        }
    }

    /// Retires a node that has already been unlinked from the forest.
    ///
    /// The slot is reset, its generation bumped, and it joins the free pool.
    /// With `pool_limit` set, vacant slots at the end of the vector are then
    /// released until the pool is back under the limit or the tail is live.
    pub(crate) fn retire(&mut self, id: NodeId, pool_limit: Option<usize>) -> Option<P> {
        let free = self.free;
        let node = self.node_mut(id);
        let key = node.key.take();
        node.reset(id);
        node.generation = node.generation.wrapping_add(1);
        node.child = free;
        if let Some(head) = free {
            self.node_mut(head).parent = Some(id);
        }
        self.free = Some(id);
        self.pooled += 1;

        if let Some(limit) = pool_limit {
            self.release_tail(limit);
        }
        key
    }

    /// Pops vacant slots off the end of the vector while more than `limit`
    /// slots are pooled.
    fn release_tail(&mut self, limit: usize) {
        while self.pooled > limit {
            let Some(last) = self.nodes.last() else {
                break;
            };
            if last.key.is_some() {
                break;
            }
            let id = NodeId::from_index(self.nodes.len() - 1);
            self.unlink_free(id);
            if let Some(node) = self.nodes.pop() {
                self.base_generation = self.base_generation.max(node.generation);
            }
            self.pooled -= 1;
        }
    }

    /// Removes a vacant slot from the free pool.
    fn unlink_free(&mut self, id: NodeId) {
        let (prev, next) = {
            let node = self.node_mut(id);
            (node.parent.take(), node.child.take())
        };
        match prev {
            Some(prev) => self.node_mut(prev).child = next,
            None => self.free = next,
        }
        if let Some(next) = next {
            self.node_mut(next).parent = prev;
        }
    }

    /// Issues a reference to a live node.
    #[inline]
    pub(crate) fn reference(&self, id: NodeId) -> NodeRef {
        NodeRef {
            id,
            generation: self.node(id).generation,
        }
    }

    /// Resolves a reference, returning `None` if it is stale.
    pub(crate) fn resolve(&self, handle: &NodeRef) -> Option<NodeId> {
        self.nodes
            .get(handle.id.index())
            .filter(|node| node.generation == handle.generation && node.key.is_some())
            .map(|_| handle.id)
    }

    /// Slots currently holding a live node.
    #[cfg(test)]
    pub(crate) fn live_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.key.is_some())
            .map(|(index, _)| NodeId::from_index(index))
    }

    /// Drops every node and the free pool.
    pub(crate) fn clear(&mut self) {
        self.base_generation = self.generation_floor();
        self.nodes.clear();
        self.free = None;
        self.pooled = 0;
    }

    /// A generation above every one handed out so far.
    fn generation_floor(&self) -> u32 {
        self.nodes
            .iter()
            .map(|node| node.generation.wrapping_add(1))
            .fold(self.base_generation, u32::max)
    }

    /// Moves every live node of `other` into this arena.
    ///
    /// Links are rewritten to the new slots and `other` is left empty. Returns
    /// the old-to-new slot mapping, indexed by the old slot.
    pub(crate) fn absorb(&mut self, other: &mut Arena<P>) -> Vec<Option<NodeId>> {
        let floor = other.generation_floor();
        let donor = std::mem::take(&mut other.nodes);
        other.clear();
        other.base_generation = floor;

        let mut map = vec![None; donor.len()];
        let mut moved = Vec::with_capacity(donor.len());
        for (old, mut node) in donor.into_iter().enumerate() {
            if let Some(key) = node.key.take() {
                let id = self.alloc(key, node.data);
                map[old] = Some(id);
                moved.push((id, node));
            }
        }

        let remap = |id: NodeId| map[id.index()].expect("live nodes only link to live nodes");
        for (id, old) in moved {
            let node = self.node_mut(id);
            node.parent = old.parent.map(remap);
            node.child = old.child.map(remap);
            node.left = remap(old.left);
            node.right = remap(old.right);
            node.degree = old.degree;
            node.marked = old.marked;
        }
        map
    }
}

impl<P> Default for Arena<P> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
