//! Read-only view over the combined interior + leaf storage

use super::HeapLayout;
use crate::HeapError;

/// Borrowed interior and leaf arrays addressed through one index space
///
/// Holds only shared references, so a view is `Copy` and can be handed to
/// any number of concurrent scan tasks.
#[derive(Debug, Clone, Copy)]
pub struct HeapView<'h, T> {
    layout: HeapLayout,
    interior: &'h [T],
    leaves: &'h [T],
}

impl<'h, T: Copy> HeapView<'h, T> {
    /// Create view; slice lengths must match the layout
    pub fn new(layout: HeapLayout, interior: &'h [T], leaves: &'h [T]) -> Self {
        assert_eq!(interior.len(), layout.interior_len(), "interior length mismatch");
        assert_eq!(leaves.len(), layout.leaf_count(), "leaf length mismatch");
        Self {
            layout,
            interior,
            leaves,
        }
    }

    /// Layout this view is addressed by
    #[inline]
    pub fn layout(&self) -> &HeapLayout {
        &self.layout
    }

    /// Value at logical index `i`
    ///
    /// # Panics
    /// Panics if `i >= size()`. Callers inside the crate only pass indices
    /// derived from the root by `left`/`right`, so this signals a bug.
    #[inline]
    pub fn value(&self, i: usize) -> T {
        if i < self.layout.interior_len() {
            self.interior[i]
        } else {
            assert!(
                i < self.layout.size(),
                "heap index {} out of range (size {})",
                i,
                self.layout.size()
            );
            self.leaves[i - self.layout.interior_len()]
        }
    }

    /// Value at logical index `i`, reporting out-of-range indices
    pub fn try_value(&self, i: usize) -> Result<T, HeapError> {
        self.layout.check_index(i)?;
        Ok(self.value(i))
    }
}
