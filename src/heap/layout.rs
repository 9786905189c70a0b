//! Heap index arithmetic
//!
//! For `N` leaves (a power of two):
//!   left(i)   = 2i + 1
//!   right(i)  = 2i + 2
//!   parent(i) = (i - 1) / 2, parent(0) = 0
//!   is_leaf(i) ⇔ i ≥ N - 1

use std::fmt;
use std::ops::Range;

use crate::HeapError;

/// Shape of a complete binary tree with `N` leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapLayout {
    /// Number of leaves (power of two)
    leaves: usize,
}

impl HeapLayout {
    /// Create layout for `leaves` leaves
    ///
    /// Rejects zero and any count that is not a power of two.
    pub fn new(leaves: usize) -> Result<Self, HeapError> {
        if !leaves.is_power_of_two() {
            return Err(HeapError::InvalidSize { len: leaves });
        }
        Ok(Self { leaves })
    }

    /// Total logical node count: `(N - 1) + N`
    #[inline]
    pub fn size(&self) -> usize {
        self.interior_len() + self.leaves
    }

    /// Number of leaves `N`
    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.leaves
    }

    /// Number of interior nodes `N - 1`
    #[inline]
    pub fn interior_len(&self) -> usize {
        self.leaves - 1
    }

    /// Tree height `log2 N` (0 for a single leaf)
    #[inline]
    pub fn height(&self) -> u32 {
        self.leaves.trailing_zeros()
    }

    /// Check if leaf
    #[inline]
    pub fn is_leaf(&self, i: usize) -> bool {
        i >= self.interior_len()
    }

    /// Left child index
    #[inline]
    pub fn left(&self, i: usize) -> usize {
        2 * i + 1
    }

    /// Right child index
    #[inline]
    pub fn right(&self, i: usize) -> usize {
        2 * i + 2
    }

    /// Parent index (the root is its own parent)
    #[inline]
    pub fn parent(&self, i: usize) -> usize {
        if i > 0 {
            (i - 1) / 2
        } else {
            0
        }
    }

    /// Depth of node `i` (root = 0)
    #[inline]
    pub fn depth(&self, i: usize) -> u32 {
        (i + 1).ilog2()
    }

    /// Position of leaf `i` in the leaf array
    #[inline]
    pub fn leaf_offset(&self, i: usize) -> usize {
        debug_assert!(self.is_leaf(i), "index {} is not a leaf", i);
        i - self.interior_len()
    }

    /// Range of leaf positions covered by the subtree at `i`
    ///
    /// Subtrees of a complete tree always cover a contiguous run of leaves,
    /// which is what lets the scan split its output buffer in halves.
    pub fn leaf_range(&self, i: usize) -> Range<usize> {
        debug_assert!(i < self.size(), "index {} outside heap of size {}", i, self.size());
        let depth = self.depth(i);
        let position = i + 1 - (1usize << depth);
        let span = self.leaves >> depth;
        position * span..(position + 1) * span
    }

    /// Interior-array indices holding tree level `depth`
    ///
    /// Only levels above the leaves are stored in the interior array.
    pub fn level_range(&self, depth: u32) -> Range<usize> {
        debug_assert!(depth < self.height(), "level {} is not an interior level", depth);
        let start = (1usize << depth) - 1;
        start..2 * start + 1
    }

    /// Validate a logical index
    pub fn check_index(&self, i: usize) -> Result<(), HeapError> {
        if i < self.size() {
            Ok(())
        } else {
            Err(HeapError::IndexOutOfRange {
                index: i,
                size: self.size(),
            })
        }
    }
}

impl fmt::Display for HeapLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "heap[{} leaves, {} interior, height {}]",
            self.leaves,
            self.interior_len(),
            self.height()
        )
    }
}
