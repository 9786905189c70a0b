//! Top-down scan pass
//!
//! Pre-order traversal carrying two accumulators from the root:
//! - `parent_prefix`: everything left of the current subtree's parent range
//! - `left_sibling`: the cached total of the immediate left sibling
//!
//! At a leaf, `parent_prefix + left_sibling + value` is the inclusive prefix.
//! The output buffer is split at each node's leaf midpoint, so every task
//! owns a disjoint output range.

use tracing::debug;

use super::PassStats;
use crate::config::ForkJoinConfig;
use crate::heap::HeapView;
use crate::summand::Summand;

/// Write inclusive prefix sums of the viewed heap into `out`
pub(crate) fn scan<T: Summand>(view: &HeapView<'_, T>, config: &ForkJoinConfig, out: &mut [T]) -> PassStats {
    debug_assert_eq!(out.len(), view.layout().leaf_count());
    let stats = scan_node(view, config, 0, T::default(), T::default(), out);
    debug!(forks = stats.forks, "scan complete");
    stats
}

fn scan_node<T: Summand>(
    view: &HeapView<'_, T>,
    config: &ForkJoinConfig,
    index: usize,
    parent_prefix: T,
    left_sibling: T,
    out: &mut [T],
) -> PassStats {
    let layout = view.layout();
    if layout.is_leaf(index) {
        out[0] = parent_prefix.combine(left_sibling).combine(view.value(index));
        return PassStats::default();
    }
    if !config.should_fork(layout.depth(index)) {
        scan_sequential(view, index, parent_prefix, left_sibling, out);
        return PassStats::sequential();
    }

    let my_prefix = parent_prefix.combine(left_sibling);
    let (left, right) = (layout.left(index), layout.right(index));
    let left_total = view.value(left);
    let (left_out, right_out) = out.split_at_mut(out.len() / 2);

    let (left_stats, right_stats) = rayon::join(
        || scan_node(view, config, left, my_prefix, T::default(), left_out),
        || scan_node(view, config, right, my_prefix, left_total, right_out),
    );
    left_stats.merge(right_stats).with_fork()
}

fn scan_sequential<T: Summand>(
    view: &HeapView<'_, T>,
    index: usize,
    parent_prefix: T,
    left_sibling: T,
    out: &mut [T],
) {
    let layout = view.layout();
    if layout.is_leaf(index) {
        out[0] = parent_prefix.combine(left_sibling).combine(view.value(index));
        return;
    }

    let my_prefix = parent_prefix.combine(left_sibling);
    let left = layout.left(index);
    let (left_out, right_out) = out.split_at_mut(out.len() / 2);
    scan_sequential(view, left, my_prefix, T::default(), left_out);
    scan_sequential(view, layout.right(index), my_prefix, view.value(left), right_out);
}
