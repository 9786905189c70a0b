#![allow(dead_code)]

use sumheap::ForkJoinConfig;

/// Thresholds every pass must agree across: none, shallow, deep, unbounded
pub fn threshold_sweep() -> Vec<ForkJoinConfig> {
    let mut configs = vec![ForkJoinConfig::sequential()];
    configs.extend([0, 1, 3, 6].into_iter().map(ForkJoinConfig::with_depth_threshold));
    configs.push(ForkJoinConfig::with_depth_threshold(u32::MAX));
    configs
}

/// Straightforward running sum for comparison
pub fn running_sum(leaves: &[i64]) -> Vec<i64> {
    leaves
        .iter()
        .scan(0i64, |acc, &leaf| {
            *acc = acc.wrapping_add(leaf);
            Some(*acc)
        })
        .collect()
}
