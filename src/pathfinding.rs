//! Graph algorithms driven by the Fibonacci heap
//!
//! Dijkstra's shortest path, A* and Prim's minimum spanning tree are the
//! classic consumers of a heap with cheap `decrease_key`. Each one inserts a
//! vertex once, keeps the returned [`NodeRef`], and lowers its key in O(1)
//! amortized whenever a better path or edge turns up.
//!
//! # Design
//!
//! Only lightweight indices go into the heap, as data handles. A fast hash map
//! (using FxHash) maps search states to their metadata, including costs and
//! heap references.
//!
//! # Example
//!
//! ```rust
//! use fibheap::pathfinding::{Graph, dijkstra};
//!
//! let mut graph = Graph::new(4);
//! graph.add_edge(0, 1, 4u32);
//! graph.add_edge(0, 2, 1);
//! graph.add_edge(2, 1, 2);
//! graph.add_edge(1, 3, 5);
//!
//! let paths = dijkstra(&graph, 0);
//! assert_eq!(paths.distance(3), Some(8));
//! assert_eq!(paths.path_to(3), Some(vec![0, 2, 1, 3]));
//! ```

use crate::arena::NodeRef;
use crate::config::HeapConfig;
use crate::fibonacci::FibonacciHeap;
use crate::traits::Data;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::hash::Hash;
use std::ops::Add;
use tracing::debug;

/// Trait for types that can be used as costs in pathfinding algorithms.
///
/// This requires the type to be orderable, copyable, and support addition.
/// `Default` supplies the zero cost.
pub trait Cost: Ord + Copy + Add<Output = Self> + Default {}

impl<T> Cost for T where T: Ord + Copy + Add<Output = Self> + Default {}

/// Trait for nodes in an implicit search graph.
///
/// The node carries all context needed to generate its successors and to
/// recognise a goal.
pub trait SearchNode: Clone + Eq + Hash {
    /// The cost type for edge weights (e.g., u32, u64, f64 wrapped in OrderedFloat)
    type Cost: Cost;

    /// Returns all successor nodes along with the cost to reach them.
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    /// Returns true if this node is a goal state.
    fn is_goal(&self) -> bool;
}

/// Trait for nodes that can provide a heuristic estimate for A* search.
///
/// The heuristic must be admissible (never overestimate the true cost)
/// for A* to find optimal paths.
pub trait AStarNode: SearchNode {
    /// Returns a heuristic estimate of the cost from this node to any goal.
    fn heuristic(&self) -> Self::Cost;
}

/// Heap priority that orders by f-score.
#[derive(Debug, Clone, Copy)]
struct PriorityCost<C> {
    /// g + h (h = 0 for Dijkstra)
    f_score: C,
    /// Cost from start
    g_score: C,
}

impl<C: Ord> PartialEq for PriorityCost<C> {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score
    }
}

impl<C: Ord> Eq for PriorityCost<C> {}

impl<C: Ord> PartialOrd for PriorityCost<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for PriorityCost<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score.cmp(&other.f_score)
    }
}

/// Metadata stored for each discovered state.
struct Entry<N: SearchNode> {
    node: N,
    g_score: N::Cost,
    /// Heap reference while the state is in the open set
    handle: Option<NodeRef>,
    came_from: Option<usize>,
    closed: bool,
}

/// Runs Dijkstra's algorithm over an implicit graph from `start` until `is_goal()` returns true.
///
/// Returns the path (start and goal inclusive) and its cost, or `None` if no
/// goal is reachable.
///
/// # Example
/// ```rust
/// use fibheap::pathfinding::{SearchNode, find_path};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// struct Node {
///     value: i32,
///     goal: i32,
/// }
///
/// impl SearchNode for Node {
///     type Cost = u32;
///
///     fn successors(&self) -> Vec<(Self, u32)> {
///         if self.value < 100 {
///             vec![(Node { value: self.value + 1, goal: self.goal }, 1)]
///         } else {
///             vec![]
///         }
///     }
///
///     fn is_goal(&self) -> bool {
///         self.value == self.goal
///     }
/// }
///
/// let (path, cost) = find_path(&Node { value: 0, goal: 5 }).unwrap();
/// assert_eq!(cost, 5);
/// assert_eq!(path.len(), 6);
/// ```
pub fn find_path<N: SearchNode>(start: &N) -> Option<(Vec<N>, N::Cost)> {
    best_first(start, |_| N::Cost::default())
}

/// Runs A* search from `start`, guided by the node's `heuristic()`.
pub fn find_path_astar<N: AStarNode>(start: &N) -> Option<(Vec<N>, N::Cost)> {
    best_first(start, |n| n.heuristic())
}

fn best_first<N: SearchNode>(
    start: &N,
    heuristic: impl Fn(&N) -> N::Cost,
) -> Option<(Vec<N>, N::Cost)> {
    let mut heap: FibonacciHeap<PriorityCost<N::Cost>> = FibonacciHeap::new();
    let mut entries: Vec<Entry<N>> = Vec::new();
    let mut index_of: FxHashMap<N, usize> = FxHashMap::default();

    let zero = N::Cost::default();
    entries.push(Entry {
        node: start.clone(),
        g_score: zero,
        handle: None,
        came_from: None,
        closed: false,
    });
    index_of.insert(start.clone(), 0);
    let priority = PriorityCost {
        f_score: heuristic(start),
        g_score: zero,
    };
    entries[0].handle = heap.insert(priority, 0).ok();

    while let Some((priority, data)) = heap.pop_entry() {
        let current = data as usize;
        let entry = &mut entries[current];
        entry.closed = true;
        entry.handle = None;
        let current_g = priority.g_score;

        if entry.node.is_goal() {
            debug!(expanded = index_of.len(), "search reached goal");
            return Some((reconstruct(&entries, current), current_g));
        }

        for (neighbor, edge_cost) in entry.node.successors() {
            let tentative_g = current_g + edge_cost;
            let f_score = tentative_g + heuristic(&neighbor);
            let priority = PriorityCost {
                f_score,
                g_score: tentative_g,
            };

            match index_of.get(&neighbor).copied() {
                None => {
                    let index = entries.len();
                    let handle = heap.insert(priority, index as Data).ok();
                    index_of.insert(neighbor.clone(), index);
                    entries.push(Entry {
                        node: neighbor,
                        g_score: tentative_g,
                        handle,
                        came_from: Some(current),
                        closed: false,
                    });
                }
                Some(index) => {
                    let entry = &mut entries[index];
                    if entry.closed || tentative_g >= entry.g_score {
                        continue;
                    }
                    entry.g_score = tentative_g;
                    entry.came_from = Some(current);
                    if let Some(handle) = entry.handle {
                        // h(neighbor) is unchanged, so a lower g always lowers f
                        let _ = heap.decrease_key_ref(&handle, priority);
                    }
                }
            }
        }
    }

    debug!(expanded = index_of.len(), "search exhausted without reaching a goal");
    None
}

fn reconstruct<N: SearchNode>(entries: &[Entry<N>], mut current: usize) -> Vec<N> {
    let mut path = vec![entries[current].node.clone()];
    while let Some(prev) = entries[current].came_from {
        path.push(entries[prev].node.clone());
        current = prev;
    }
    path.reverse();
    path
}

/// Weighted graph stored as adjacency lists over vertices `0..n`.
#[derive(Debug, Clone, Default)]
pub struct Graph<W> {
    adjacency: Vec<Vec<(usize, W)>>,
}

impl<W: Copy> Graph<W> {
    /// Creates a graph with `vertices` vertices and no edges.
    pub fn new(vertices: usize) -> Self {
        Graph {
            adjacency: vec![Vec::new(); vertices],
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Adds a directed edge `from -> to`.
    ///
    /// # Panics
    /// Panics if either endpoint is out of range.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: W) {
        assert!(to < self.adjacency.len(), "edge target {to} out of range");
        self.adjacency[from].push((to, weight));
    }

    /// Adds an edge in both directions.
    pub fn add_undirected_edge(&mut self, a: usize, b: usize, weight: W) {
        self.add_edge(a, b, weight);
        self.add_edge(b, a, weight);
    }

    /// Outgoing edges of `vertex`.
    pub fn neighbors(&self, vertex: usize) -> &[(usize, W)] {
        &self.adjacency[vertex]
    }
}

/// Single-source shortest path tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPaths<W> {
    source: usize,
    distances: Vec<Option<W>>,
    predecessors: Vec<Option<usize>>,
}

impl<W: Copy> ShortestPaths<W> {
    /// The source vertex.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Distance from the source, `None` if unreachable.
    pub fn distance(&self, vertex: usize) -> Option<W> {
        self.distances.get(vertex).copied().flatten()
    }

    /// Vertices from the source to `vertex`, inclusive.
    pub fn path_to(&self, vertex: usize) -> Option<Vec<usize>> {
        self.distance(vertex)?;
        let mut path = vec![vertex];
        let mut current = vertex;
        while let Some(prev) = self.predecessors[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

/// Dijkstra's algorithm over an explicit graph.
///
/// Every vertex enters the heap at most once; improvements use
/// [`FibonacciHeap::decrease_key_ref`]. Weights must be non-negative.
///
/// # Panics
/// Panics if `source` is not a vertex of `graph`.
pub fn dijkstra<W: Cost>(graph: &Graph<W>, source: usize) -> ShortestPaths<W> {
    let n = graph.vertex_count();
    assert!(source < n, "source {source} out of range");

    let mut distances: Vec<Option<W>> = vec![None; n];
    let mut predecessors = vec![None; n];
    let mut open: FxHashMap<usize, NodeRef> = FxHashMap::default();
    let mut settled = vec![false; n];
    let mut heap: FibonacciHeap<W> = FibonacciHeap::with_config(HeapConfig::new().with_capacity(n));

    distances[source] = Some(W::default());
    if let Ok(handle) = heap.insert(W::default(), source as Data) {
        open.insert(source, handle);
    }

    while let Some((dist, data)) = heap.pop_entry() {
        let u = data as usize;
        open.remove(&u);
        settled[u] = true;

        for &(v, weight) in graph.neighbors(u) {
            if settled[v] {
                continue;
            }
            let candidate = dist + weight;
            match distances[v] {
                Some(current) if candidate >= current => {}
                Some(_) => {
                    distances[v] = Some(candidate);
                    predecessors[v] = Some(u);
                    if let Some(handle) = open.get(&v) {
                        let _ = heap.decrease_key_ref(handle, candidate);
                    }
                }
                None => {
                    distances[v] = Some(candidate);
                    predecessors[v] = Some(u);
                    if let Ok(handle) = heap.insert(candidate, v as Data) {
                        open.insert(v, handle);
                    }
                }
            }
        }
    }

    debug!(
        source,
        reached = settled.iter().filter(|&&s| s).count(),
        "shortest paths computed"
    );
    ShortestPaths {
        source,
        distances,
        predecessors,
    }
}

/// Minimum spanning forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanningTree<W> {
    /// Tree edges as `(parent, child, weight)`
    pub edges: Vec<(usize, usize, W)>,
    /// Sum of edge weights
    pub total: W,
}

/// Prim's algorithm over an undirected graph.
///
/// Disconnected graphs produce a spanning forest: each component is grown from
/// its lowest-numbered vertex.
pub fn prim<W: Cost>(graph: &Graph<W>) -> SpanningTree<W> {
    let n = graph.vertex_count();
    let mut in_tree = vec![false; n];
    let mut best: Vec<Option<(W, usize)>> = vec![None; n];
    let mut open: FxHashMap<usize, NodeRef> = FxHashMap::default();
    let mut heap: FibonacciHeap<W> = FibonacciHeap::new();
    let mut edges = Vec::with_capacity(n.saturating_sub(1));
    let mut total = W::default();

    for root in 0..n {
        if in_tree[root] {
            continue;
        }
        if let Ok(handle) = heap.insert(W::default(), root as Data) {
            open.insert(root, handle);
        }

        while let Some((_, data)) = heap.pop_entry() {
            let u = data as usize;
            open.remove(&u);
            in_tree[u] = true;
            if let Some((weight, parent)) = best[u] {
                edges.push((parent, u, weight));
                total = total + weight;
            }

            for &(v, weight) in graph.neighbors(u) {
                if in_tree[v] {
                    continue;
                }
                match best[v] {
                    Some((current, _)) if weight >= current => {}
                    Some(_) => {
                        best[v] = Some((weight, u));
                        if let Some(handle) = open.get(&v) {
                            let _ = heap.decrease_key_ref(handle, weight);
                        }
                    }
                    None => {
                        best[v] = Some((weight, u));
                        if let Ok(handle) = heap.insert(weight, v as Data) {
                            open.insert(v, handle);
                        }
                    }
                }
            }
        }
    }

    debug!(vertices = n, edges = edges.len(), "spanning forest computed");
    SpanningTree { edges, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Simple linear graph node that carries its goal
    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    struct LinearNode {
        value: i32,
        goal: i32,
    }

    impl SearchNode for LinearNode {
        type Cost = u32;

        fn successors(&self) -> Vec<(Self, u32)> {
            let mut next = vec![];
            if self.value < 20 {
                next.push((LinearNode { value: self.value + 1, goal: self.goal }, 1));
            }
            if self.value > 0 {
                next.push((LinearNode { value: self.value - 1, goal: self.goal }, 1));
            }
            next
        }

        fn is_goal(&self) -> bool {
            self.value == self.goal
        }
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    struct GridPos {
        x: i32,
        y: i32,
        goal_x: i32,
        goal_y: i32,
    }

    impl SearchNode for GridPos {
        type Cost = u32;

        fn successors(&self) -> Vec<(Self, u32)> {
            [(1, 0), (-1, 0), (0, 1), (0, -1)]
                .iter()
                .map(|(dx, dy)| (self.x + dx, self.y + dy))
                .filter(|&(x, y)| (0..8).contains(&x) && (0..8).contains(&y))
                .map(|(x, y)| (GridPos { x, y, ..self.clone() }, 1))
                .collect()
        }

        fn is_goal(&self) -> bool {
            self.x == self.goal_x && self.y == self.goal_y
        }
    }

    impl AStarNode for GridPos {
        fn heuristic(&self) -> u32 {
            self.x.abs_diff(self.goal_x) + self.y.abs_diff(self.goal_y)
        }
    }

    #[test]
    fn test_find_path_simple() {
        let (path, cost) = find_path(&LinearNode { value: 0, goal: 5 }).unwrap();
        assert_eq!(cost, 5);
        assert_eq!(path.first().unwrap().value, 0);
        assert_eq!(path.last().unwrap().value, 5);
    }

    #[test]
    fn test_find_path_no_path() {
        assert!(find_path(&LinearNode { value: 0, goal: 50 }).is_none());
    }

    #[test]
    fn test_find_path_start_is_goal() {
        let (path, cost) = find_path(&LinearNode { value: 3, goal: 3 }).unwrap();
        assert_eq!(cost, 0);
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_find_path_astar_grid() {
        let start = GridPos { x: 0, y: 0, goal_x: 5, goal_y: 7 };
        let (path, cost) = find_path_astar(&start).unwrap();
        assert_eq!(cost, 12);
        assert_eq!(path.len(), 13);
    }

    // S -> A costs 10, S -> B -> A costs 2; A -> G costs 1
    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum Waypoint {
        S,
        A,
        B,
        G,
    }

    impl SearchNode for Waypoint {
        type Cost = u32;

        fn successors(&self) -> Vec<(Self, u32)> {
            match self {
                Waypoint::S => vec![(Waypoint::A, 10), (Waypoint::B, 1)],
                Waypoint::B => vec![(Waypoint::A, 1)],
                Waypoint::A => vec![(Waypoint::G, 1)],
                Waypoint::G => vec![],
            }
        }

        fn is_goal(&self) -> bool {
            *self == Waypoint::G
        }
    }

    impl AStarNode for Waypoint {
        fn heuristic(&self) -> u32 {
            match self {
                Waypoint::S => 2,
                Waypoint::A | Waypoint::B => 1,
                Waypoint::G => 0,
            }
        }
    }

    #[test]
    fn test_astar_lowers_queued_node() {
        // A is queued at f = 11, then reached through B at f = 3
        let (path, cost) = find_path_astar(&Waypoint::S).unwrap();
        assert_eq!(cost, 3);
        assert_eq!(path, vec![Waypoint::S, Waypoint::B, Waypoint::A, Waypoint::G]);

        let (plain, plain_cost) = find_path(&Waypoint::S).unwrap();
        assert_eq!(plain_cost, 3);
        assert_eq!(plain, path);
    }

    #[test]
    fn test_dijkstra_prefers_cheaper_detour() {
        let mut graph = Graph::new(5);
        graph.add_edge(0, 1, 10u32);
        graph.add_edge(0, 2, 1);
        graph.add_edge(2, 3, 1);
        graph.add_edge(3, 1, 1);
        graph.add_edge(1, 4, 1);

        let paths = dijkstra(&graph, 0);
        assert_eq!(paths.source(), 0);
        assert_eq!(paths.distance(1), Some(3));
        assert_eq!(paths.distance(4), Some(4));
        assert_eq!(paths.path_to(4), Some(vec![0, 2, 3, 1, 4]));
    }

    #[test]
    fn test_dijkstra_unreachable() {
        let mut graph = Graph::new(3);
        graph.add_edge(0, 1, 1u32);
        let paths = dijkstra(&graph, 0);
        assert_eq!(paths.distance(2), None);
        assert_eq!(paths.path_to(2), None);
    }

    #[test]
    fn test_prim_square_with_diagonal() {
        let mut graph = Graph::new(4);
        graph.add_undirected_edge(0, 1, 1u32);
        graph.add_undirected_edge(1, 2, 2);
        graph.add_undirected_edge(2, 3, 1);
        graph.add_undirected_edge(3, 0, 4);
        graph.add_undirected_edge(0, 2, 3);

        let tree = prim(&graph);
        assert_eq!(tree.edges.len(), 3);
        assert_eq!(tree.total, 4);
    }

    #[test]
    fn test_prim_forest() {
        let mut graph = Graph::new(4);
        graph.add_undirected_edge(0, 1, 5u32);
        graph.add_undirected_edge(2, 3, 7);
        let tree = prim(&graph);
        assert_eq!(tree.edges.len(), 2);
        assert_eq!(tree.total, 12);
    }
}
