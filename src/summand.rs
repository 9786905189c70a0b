//! Numeric leaf values
//!
//! A [`Summand`] is anything the heap can add up. The tree fixes the
//! association order of every addition, so results are reproducible
//! across runs and across fork-join thresholds, floats included.

use std::fmt::Debug;

/// Value type stored at leaves and interior nodes
///
/// `Default::default()` must be the additive identity.
pub trait Summand: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Add two values
    fn combine(self, other: Self) -> Self;
}

// Two's complement wraparound, so oversized inputs never abort a debug build.
macro_rules! wrapping_summand {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Summand for $ty {
                #[inline]
                fn combine(self, other: Self) -> Self {
                    self.wrapping_add(other)
                }
            }
        )*
    };
}

macro_rules! float_summand {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Summand for $ty {
                #[inline]
                fn combine(self, other: Self) -> Self {
                    self + other
                }
            }
        )*
    };
}

wrapping_summand!(i32, i64, u32, u64, usize);
float_summand!(f32, f64);
