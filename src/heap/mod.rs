//! Implicit heap over an interior array and a leaf array
//!
//! Logical indices `0..2N-1` address a complete binary tree in level order
//! (root = 0). Indices below `N - 1` live in the interior array; the rest
//! map onto the leaf array at offset `i - (N - 1)`.
//!
//! No tree is materialized: navigation is integer arithmetic.

mod layout;
mod view;

pub use layout::HeapLayout;
pub use view::HeapView;
