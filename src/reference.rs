//! Sequential reference implementation
//!
//! Single-threaded running sum used to validate heap output.

use crate::summand::Summand;

/// Compute inclusive prefix sum: out[i] = sum(leaves[0..=i])
///
/// # Panics
/// Panics if `out` is shorter than `leaves`.
pub fn sequential_prefix_sums<T: Summand>(leaves: &[T], out: &mut [T]) {
    assert!(out.len() >= leaves.len(), "output shorter than input");
    let mut running = T::default();
    for (slot, &leaf) in out.iter_mut().zip(leaves) {
        running = running.combine(leaf);
        *slot = running;
    }
}

/// Verify prefix sums; returns the first mismatching position
pub fn verify_prefix_sums<T: Summand>(leaves: &[T], prefix: &[T]) -> Option<usize> {
    if leaves.len() != prefix.len() {
        return Some(leaves.len().min(prefix.len()));
    }

    let mut expected = T::default();
    for (idx, (&leaf, &actual)) in leaves.iter().zip(prefix).enumerate() {
        expected = expected.combine(leaf);
        if actual != expected {
            return Some(idx);
        }
    }
    None
}
