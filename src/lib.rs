//! # Implicit Sum Heap with Depth-Bounded Fork-Join
//!
//! This library lays an implicit complete binary tree ("heap") over a
//! power-of-two array of leaf values and uses it to compute, in parallel:
//!
//! 1. **Reduction**: the sum of every subtree, cached in an interior array
//!    of `N - 1` nodes (the grand total lands at the root).
//! 2. **Scan**: the inclusive prefix sum at every leaf, reusing the cached
//!    subtree sums instead of re-scanning the leaves.
//!
//! Both passes are recursive fork-join traversals. Work is forked onto the
//! rayon pool only at shallow depths (see [`ForkJoinConfig`]); deeper
//! recursion runs sequentially on the calling thread, so the number of
//! forked tasks is bounded by `2^(threshold + 1)` regardless of `N`.
//!
//! ## Usage Example
//!
//! ```
//! use sumheap::{ForkJoinConfig, SumHeap};
//!
//! let leaves = [3i64, 1, 4, 1, 5, 9, 2, 6];
//! let heap = SumHeap::with_config(&leaves, ForkJoinConfig::with_depth_threshold(1))?;
//! assert_eq!(heap.total(), 31);
//! assert_eq!(heap.prefix_sums(), vec![3, 4, 8, 9, 14, 23, 25, 31]);
//! # Ok::<(), sumheap::HeapError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod config;    // Fork-join policy and thread pool sizing
pub mod heap;      // Index arithmetic over the interior + leaf arrays
pub mod reference; // Sequential prefix sums and validation
pub mod sum_heap;  // Parallel reduction and scan engine
pub mod summand;   // Numeric leaf values

pub use config::ForkJoinConfig;
pub use heap::{HeapLayout, HeapView};
pub use reference::{sequential_prefix_sums, verify_prefix_sums};
pub use sum_heap::{PassStats, SumHeap};
pub use summand::Summand;

use thiserror::Error;

/// Errors reported by the sum heap and its configuration
#[derive(Error, Debug)]
pub enum HeapError {
    /// Leaf count is zero or not a power of two
    #[error("leaf count {len} is not a non-zero power of two")]
    InvalidSize {
        /// Number of leaves that was supplied
        len: usize,
    },

    /// Logical heap index outside `[0, size)`
    #[error("heap index {index} out of range (size {size})")]
    IndexOutOfRange {
        /// Index that was requested
        index: usize,
        /// Total number of logical nodes
        size: usize,
    },

    /// Output buffer length differs from the leaf count
    #[error("output buffer holds {actual} values but the heap has {expected} leaves")]
    LengthMismatch {
        /// Number of leaves in the heap
        expected: usize,
        /// Length of the buffer that was supplied
        actual: usize,
    },

    /// Fork-join configuration rejected
    #[error("invalid fork-join configuration: {0}")]
    InvalidConfiguration(String),

    /// Dedicated thread pool could not be created
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
