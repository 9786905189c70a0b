//! Parallel reduction and scan engine
//!
//! [`SumHeap`] borrows a power-of-two leaf array, owns the `N - 1` interior
//! sums, and runs:
//! - the reduction pass once at construction (and again on [`SumHeap::rebuild`])
//! - the scan pass on every [`SumHeap::compute_prefix_sums`] call
//!
//! The scan only reads interior sums, and the reduction has fully joined
//! before construction returns, so a constructed heap is always ready to scan.

mod reduce;
mod scan;

use tracing::{debug, debug_span};

use crate::config::ForkJoinConfig;
use crate::heap::{HeapLayout, HeapView};
use crate::summand::Summand;
use crate::HeapError;

/// Work distribution observed during one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassStats {
    /// Nodes that forked their children onto the pool
    pub forks: usize,

    /// Subtrees handed to in-thread sequential recursion
    pub sequential_subtrees: usize,
}

impl PassStats {
    pub(crate) fn sequential() -> Self {
        Self {
            forks: 0,
            sequential_subtrees: 1,
        }
    }

    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            forks: self.forks + other.forks,
            sequential_subtrees: self.sequential_subtrees + other.sequential_subtrees,
        }
    }

    pub(crate) fn with_fork(mut self) -> Self {
        self.forks += 1;
        self
    }
}

/// Implicit sum heap over a borrowed leaf array
#[derive(Debug)]
pub struct SumHeap<'a, T: Summand> {
    layout: HeapLayout,
    leaves: &'a [T],
    interior: Vec<T>,
    config: ForkJoinConfig,
    pool: Option<rayon::ThreadPool>,
    reduction: PassStats,
}

impl<'a, T: Summand> SumHeap<'a, T> {
    /// Build heap with the default (hardware-tuned) configuration
    ///
    /// Blocks until the parallel reduction completes.
    pub fn new(leaves: &'a [T]) -> Result<Self, HeapError> {
        Self::with_config(leaves, ForkJoinConfig::default())
    }

    /// Build heap with an explicit fork-join configuration
    ///
    /// # Errors
    /// - [`HeapError::InvalidSize`] if `leaves.len()` is zero or not a power of two
    /// - [`HeapError::InvalidConfiguration`] / [`HeapError::ThreadPool`] if the
    ///   requested dedicated pool cannot be built
    pub fn with_config(leaves: &'a [T], config: ForkJoinConfig) -> Result<Self, HeapError> {
        let layout = HeapLayout::new(leaves.len())?;
        let pool = config.build_pool()?;

        let mut heap = Self {
            layout,
            leaves,
            interior: vec![T::default(); layout.interior_len()],
            config,
            pool,
            reduction: PassStats::default(),
        };
        heap.reduce();
        Ok(heap)
    }

    /// Recompute every interior sum over `leaves`
    ///
    /// The only way to reflect new leaf data; there is no incremental update.
    /// The leaf count may change as long as it stays a power of two.
    pub fn rebuild(&mut self, leaves: &'a [T]) -> Result<(), HeapError> {
        let layout = HeapLayout::new(leaves.len())?;
        self.layout = layout;
        self.leaves = leaves;
        self.interior.clear();
        self.interior.resize(layout.interior_len(), T::default());
        self.reduce();
        Ok(())
    }

    fn reduce(&mut self) {
        let span = debug_span!("reduce", leaves = self.layout.leaf_count(), threshold = ?self.config.depth_threshold);
        let _enter = span.enter();

        let (layout, config, leaves) = (self.layout, self.config, self.leaves);
        let interior = &mut self.interior;
        let stats = install(self.pool.as_ref(), || {
            reduce::reduce(&layout, &config, interior, leaves)
        });
        debug!(forks = stats.forks, sequential = stats.sequential_subtrees, "interior sums ready");
        self.reduction = stats;
    }

    /// Grand total (root value)
    pub fn total(&self) -> T {
        self.view().value(0)
    }

    /// Sum of the subtree rooted at logical index `i`
    pub fn subtree_sum(&self, i: usize) -> Result<T, HeapError> {
        self.view().try_value(i)
    }

    /// Value at logical index `i`
    ///
    /// # Panics
    /// Panics if `i >= layout().size()`; use [`SumHeap::try_value`] for
    /// unchecked input.
    pub fn value(&self, i: usize) -> T {
        self.view().value(i)
    }

    /// Value at logical index `i`, reporting out-of-range indices
    pub fn try_value(&self, i: usize) -> Result<T, HeapError> {
        self.view().try_value(i)
    }

    /// Fill `out` with inclusive prefix sums of the leaves
    ///
    /// Blocks until the parallel scan completes.
    pub fn compute_prefix_sums(&self, out: &mut [T]) -> Result<(), HeapError> {
        self.compute_prefix_sums_with_stats(out).map(|_| ())
    }

    /// [`SumHeap::compute_prefix_sums`], also reporting how the scan forked
    pub fn compute_prefix_sums_with_stats(&self, out: &mut [T]) -> Result<PassStats, HeapError> {
        let expected = self.layout.leaf_count();
        if out.len() != expected {
            return Err(HeapError::LengthMismatch {
                expected,
                actual: out.len(),
            });
        }

        let span = debug_span!("scan", leaves = expected, threshold = ?self.config.depth_threshold);
        let _enter = span.enter();

        let view = self.view();
        let config = &self.config;
        Ok(install(self.pool.as_ref(), || scan::scan(&view, config, out)))
    }

    /// Allocate and return inclusive prefix sums
    pub fn prefix_sums(&self) -> Vec<T> {
        let mut out = vec![T::default(); self.layout.leaf_count()];
        let view = self.view();
        install(self.pool.as_ref(), || scan::scan(&view, &self.config, &mut out));
        out
    }

    /// Combined interior + leaf view
    pub fn view(&self) -> HeapView<'_, T> {
        HeapView::new(self.layout, &self.interior, self.leaves)
    }

    /// Heap shape
    pub fn layout(&self) -> &HeapLayout {
        &self.layout
    }

    /// Fork-join configuration
    pub fn config(&self) -> &ForkJoinConfig {
        &self.config
    }

    /// Borrowed leaf array
    pub fn leaves(&self) -> &'a [T] {
        self.leaves
    }

    /// Interior sums in level order
    pub fn interior(&self) -> &[T] {
        &self.interior
    }

    /// How the most recent reduction forked
    pub fn reduction_stats(&self) -> PassStats {
        self.reduction
    }
}

/// Run `op` on the dedicated pool if there is one, else on the caller's pool
fn install<R, OP>(pool: Option<&rayon::ThreadPool>, op: OP) -> R
where
    OP: FnOnce() -> R + Send,
    R: Send,
{
    match pool {
        Some(pool) => pool.install(op),
        None => op(),
    }
}
