//! Bottom-up reduction pass
//!
//! Post-order traversal from the root: every interior node receives the sum
//! of its two children once both children are final.
//!
//! The interior nodes of any subtree occupy one contiguous run per tree
//! level, so a subtree can be handed exclusive `&mut` access to exactly the
//! slots it writes. Forking splits every run in half; no slot is shared.

use tracing::debug;

use super::PassStats;
use crate::config::ForkJoinConfig;
use crate::heap::HeapLayout;
use crate::summand::Summand;

/// Storage owned by one subtree during reduction
struct Subtree<'s, T> {
    /// Depth of the subtree root in the full heap
    depth: u32,
    /// `levels[k]` holds this subtree's interior nodes at relative depth `k`
    levels: Vec<&'s mut [T]>,
    /// Leaves under this subtree
    leaves: &'s [T],
}

impl<'s, T: Summand> Subtree<'s, T> {
    fn is_leaf(&self) -> bool {
        self.levels.is_empty()
    }

    /// Detach the root slot and split the remaining levels between children
    fn split(self) -> (&'s mut T, Subtree<'s, T>, Subtree<'s, T>) {
        let below = self.levels.len() - 1;
        let mut levels = self.levels.into_iter();
        let root = match levels.next().and_then(|level| level.first_mut()) {
            Some(root) => root,
            None => unreachable!("split called on a leaf subtree"),
        };

        let mut left_levels = Vec::with_capacity(below);
        let mut right_levels = Vec::with_capacity(below);
        for level in levels {
            let (left, right) = level.split_at_mut(level.len() / 2);
            left_levels.push(left);
            right_levels.push(right);
        }
        let (left_leaves, right_leaves) = self.leaves.split_at(self.leaves.len() / 2);

        (
            root,
            Subtree {
                depth: self.depth + 1,
                levels: left_levels,
                leaves: left_leaves,
            },
            Subtree {
                depth: self.depth + 1,
                levels: right_levels,
                leaves: right_leaves,
            },
        )
    }
}

/// Fill `interior` with subtree sums over `leaves`
pub(crate) fn reduce<T: Summand>(
    layout: &HeapLayout,
    config: &ForkJoinConfig,
    interior: &mut [T],
    leaves: &[T],
) -> PassStats {
    debug_assert_eq!(interior.len(), layout.interior_len());
    debug_assert_eq!(leaves.len(), layout.leaf_count());

    let mut levels = Vec::with_capacity(layout.height() as usize);
    let mut rest = interior;
    for depth in 0..layout.height() {
        let width = layout.level_range(depth).len();
        let (level, tail) = std::mem::take(&mut rest).split_at_mut(width);
        levels.push(level);
        rest = tail;
    }

    let root = Subtree {
        depth: 0,
        levels,
        leaves,
    };
    let (total, stats) = reduce_subtree(root, config);
    debug!(?total, forks = stats.forks, "reduction complete");
    stats
}

fn reduce_subtree<T: Summand>(subtree: Subtree<'_, T>, config: &ForkJoinConfig) -> (T, PassStats) {
    if subtree.is_leaf() {
        return (subtree.leaves[0], PassStats::default());
    }

    if !config.should_fork(subtree.depth) {
        let Subtree {
            mut levels, leaves, ..
        } = subtree;
        let total = reduce_sequential(&mut levels, leaves, 0, 0);
        return (total, PassStats::sequential());
    }

    let (slot, left, right) = subtree.split();
    // Left half stays on this thread; right half may be stolen.
    let ((left_sum, left_stats), (right_sum, right_stats)) = rayon::join(
        || reduce_subtree(left, config),
        || reduce_subtree(right, config),
    );
    *slot = left_sum.combine(right_sum);
    (*slot, left_stats.merge(right_stats).with_fork())
}

/// Reduce node `(depth, offset)` relative to the subtree owning `levels`
fn reduce_sequential<T: Summand>(
    levels: &mut [&mut [T]],
    leaves: &[T],
    depth: usize,
    offset: usize,
) -> T {
    if depth == levels.len() {
        return leaves[offset];
    }
    let left = reduce_sequential(levels, leaves, depth + 1, 2 * offset);
    let right = reduce_sequential(levels, leaves, depth + 1, 2 * offset + 1);
    let sum = left.combine(right);
    levels[depth][offset] = sum;
    sum
}
