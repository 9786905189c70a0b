//! Property tests over random leaf arrays and thresholds

mod common;

use common::running_sum;
use proptest::prelude::*;
use sumheap::{verify_prefix_sums, ForkJoinConfig, SumHeap};

fn leaves_strategy() -> impl Strategy<Value = Vec<i64>> {
    (0u32..11).prop_flat_map(|log2_size| {
        proptest::collection::vec(-1_000_000i64..1_000_000, 1usize << log2_size)
    })
}

fn threshold_strategy() -> impl Strategy<Value = Option<u32>> {
    prop_oneof![Just(None), (0u32..12).prop_map(Some), Just(Some(u32::MAX))]
}

proptest! {
    #[test]
    fn total_is_arithmetic_sum(leaves in leaves_strategy(), threshold in threshold_strategy()) {
        let config = ForkJoinConfig::sequential().with_threshold(threshold);
        let heap = SumHeap::with_config(&leaves, config).unwrap();
        let expected = leaves.iter().fold(0i64, |acc, &v| acc.wrapping_add(v));
        prop_assert_eq!(heap.total(), expected);
    }

    #[test]
    fn prefix_matches_running_sum(leaves in leaves_strategy(), threshold in threshold_strategy()) {
        let config = ForkJoinConfig::sequential().with_threshold(threshold);
        let heap = SumHeap::with_config(&leaves, config).unwrap();
        let prefix = heap.prefix_sums();

        prop_assert_eq!(verify_prefix_sums(&leaves, &prefix), None);
        prop_assert_eq!(prefix[leaves.len() - 1], heap.total(), "last prefix must equal total");
        prop_assert_eq!(prefix, running_sum(&leaves));
    }

    #[test]
    fn threshold_never_changes_output(
        leaves in leaves_strategy(),
        a in threshold_strategy(),
        b in threshold_strategy(),
    ) {
        let left = SumHeap::with_config(&leaves, ForkJoinConfig::sequential().with_threshold(a)).unwrap();
        let right = SumHeap::with_config(&leaves, ForkJoinConfig::sequential().with_threshold(b)).unwrap();
        prop_assert_eq!(left.interior(), right.interior());
        prop_assert_eq!(left.prefix_sums(), right.prefix_sums());
    }

    #[test]
    fn forks_stay_within_bound(leaves in leaves_strategy(), threshold in threshold_strategy()) {
        let config = ForkJoinConfig::sequential().with_threshold(threshold);
        let heap = SumHeap::with_config(&leaves, config).unwrap();
        let bound = config.max_forks(heap.layout().height());

        prop_assert_eq!(heap.reduction_stats().forks, bound);
        let mut out = vec![0i64; leaves.len()];
        let scan = heap.compute_prefix_sums_with_stats(&mut out).unwrap();
        prop_assert_eq!(scan.forks, bound);
    }

    #[test]
    fn subtree_sums_cover_leaf_ranges(leaves in leaves_strategy()) {
        let heap = SumHeap::new(&leaves).unwrap();
        let layout = *heap.layout();
        for i in 0..layout.size() {
            let expected = leaves[layout.leaf_range(i)]
                .iter()
                .fold(0i64, |acc, &v| acc.wrapping_add(v));
            prop_assert_eq!(heap.subtree_sum(i).unwrap(), expected);
        }
    }
}
