//! Node degree type and the Fibonacci degree bound.
//!
//! # Degree bound
//!
//! Cuts never remove more than one child from a non-root node before that node
//! is itself cut, so a node of degree `k` always roots a subtree of at least
//! `F(k+2)` nodes, where `F` is the Fibonacci sequence. Since
//! `F(k+2) >= φ^k` (φ being the golden ratio), the degree of any node in a heap
//! of `n` nodes is at most `⌊log_φ(n)⌋`.
//!
//! # Degree width
//!
//! `log_φ(usize::MAX)` on a 64-bit target is about 92, so a `u8` degree has
//! ample headroom.

/// Type alias for the number of direct children of a node.
pub type Degree = u8;

/// Maximum representable degree.
pub const MAX_DEGREE: Degree = u8::MAX;

/// The golden ratio, φ = (1 + √5) / 2.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Increment a degree after linking a child.
///
/// # Panics
///
/// Panics if `degree == MAX_DEGREE`. A valid heap can never get there, so this
/// points at a corrupted forest.
///
/// # Example
///
/// ```rust
/// use fibheap::rank::{checked_increment, Degree};
///
/// let degree: Degree = 5;
/// assert_eq!(checked_increment(degree), 6);
/// ```
#[inline]
pub fn checked_increment(degree: Degree) -> Degree {
    degree.checked_add(1).expect(
        "degree overflow: a node's degree is bounded by log_φ(n), \
         which is far below u8::MAX for any addressable heap",
    )
}

/// Decrement a degree after cutting a child, saturating at zero.
#[inline]
pub fn saturating_decrement(degree: Degree) -> Degree {
    degree.saturating_sub(1)
}

/// Upper bound on the degree of any node in a heap of `len` nodes.
///
/// Returns `⌊log_φ(len)⌋`, which is 0 for heaps of zero or one node.
///
/// ```rust
/// use fibheap::rank::max_degree;
///
/// assert_eq!(max_degree(0), 0);
/// assert_eq!(max_degree(1), 0);
/// assert_eq!(max_degree(2), 1);
/// assert!(max_degree(1_000_000) <= 28);
/// ```
pub fn max_degree(len: usize) -> usize {
    if len < 2 {
        return 0;
    }
    ((len as f64).ln() / PHI.ln()).floor() as usize
}

/// Number of slots a consolidation table needs for a heap of `len` nodes.
///
/// One past [`max_degree`], plus one slot of slack for the floating point
/// rounding of the logarithm.
#[inline]
pub fn table_size(len: usize) -> usize {
    max_degree(len) + 2
}
