//! Heap configuration parameters.

/// What [`FibonacciHeap::insert`](crate::fibonacci::FibonacciHeap::insert)
/// does with a data handle that is already present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Refuse the insert with [`HeapError::DuplicateData`](crate::HeapError::DuplicateData).
    #[default]
    Reject,
    /// Accept it. By-value lookups then resolve to the first node found by
    /// the forest walk, which starts at the current minimum.
    Allow,
}

/// Configuration for a [`FibonacciHeap`](crate::fibonacci::FibonacciHeap).
///
/// All values are fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeapConfig {
    /// Number of node slots to reserve up front.
    ///
    /// Default: 0.
    pub capacity: usize,

    /// Maximum number of vacant slots kept in the free pool for reuse.
    ///
    /// `None` keeps every retired slot. With a limit, vacant slots at the end
    /// of the arena are released once the pool exceeds it; `Some(0)` releases
    /// every one it can. Vacant slots below a live node stay pooled.
    pub pool_limit: Option<usize>,

    /// Handling of duplicate data handles on insert.
    pub duplicates: DuplicatePolicy,
}

impl HeapConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            capacity: 0,
            pool_limit: None,
            duplicates: DuplicatePolicy::Reject,
        }
    }

    /// Reserve room for `capacity` nodes.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Cap the free pool at `limit` retired nodes.
    pub fn with_pool_limit(mut self, limit: usize) -> Self {
        self.pool_limit = Some(limit);
        self
    }

    /// Set the duplicate handle policy.
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self::new()
    }
}
