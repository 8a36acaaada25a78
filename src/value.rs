use std::fmt::{Debug, Display};
use std::ops::AddAssign;

/// A quantity the tree can tally: packet counts, byte counts, weights.
///
/// The zero of the type is its `Default`. Signed and float tallies may go
/// negative; a node shows up in the histogram whenever its exclusive value is
/// not zero.
pub trait Tally: Copy + Default + PartialOrd + AddAssign + Debug + Display {
    #[inline]
    fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    #[inline]
    fn is_positive(&self) -> bool {
        *self > Self::default()
    }
}

macro_rules! impl_tally {
    ($($t:ty),*) => {
        $(impl Tally for $t {})*
    };
}

impl_tally!(u8, u16, u32, u64, u128, usize, i32, i64, f32, f64);
