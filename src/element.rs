//! Numeric element types the kernels operate on.
//!
//! Every element type pairs with a wider accumulation type used by the
//! forward pass:
//! - `i16` accumulates in `i32`
//! - `i32` accumulates in `i64`
//! - `f32` accumulates in `f32`
//!
//! Integer arithmetic wraps. This matches what the vector instructions do, so
//! the scalar path and the SIMD paths agree bit for bit.

use std::fmt::Debug;

mod sealed {
    pub trait Sealed {}

    impl Sealed for i16 {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
}

/// A lane type with a backend implementation.
///
/// Sealed: the set of element types is closed, so a missing backend
/// specialization is always a compile error.
pub trait Element: sealed::Sealed + Copy + Default + PartialOrd + Debug + Send + Sync + 'static {
    /// Accumulation type of the forward pass.
    type Wide: Copy + Default + PartialEq + Debug + Send + Sync + 'static;

    const ZERO: Self;

    fn lane_add(self, rhs: Self) -> Self;
    fn lane_sub(self, rhs: Self) -> Self;
    fn lane_max(self, rhs: Self) -> Self;
    fn lane_min(self, rhs: Self) -> Self;

    /// Product of two lanes, computed in the accumulation type.
    fn widening_mul(self, rhs: Self) -> Self::Wide;

    fn widen(self) -> Self::Wide;

    fn wide_add(lhs: Self::Wide, rhs: Self::Wide) -> Self::Wide;

    /// Converts an `i32` constant, clamping to the representable range.
    fn from_i32_saturating(v: i32) -> Self;
}

impl Element for i16 {
    type Wide = i32;

    const ZERO: Self = 0;

    #[inline(always)]
    fn lane_add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }

    #[inline(always)]
    fn lane_sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }

    #[inline(always)]
    fn lane_max(self, rhs: Self) -> Self {
        Ord::max(self, rhs)
    }

    #[inline(always)]
    fn lane_min(self, rhs: Self) -> Self {
        Ord::min(self, rhs)
    }

    #[inline(always)]
    fn widening_mul(self, rhs: Self) -> i32 {
        // Cannot overflow: |i16 * i16| <= 2^30.
        i32::from(self) * i32::from(rhs)
    }

    #[inline(always)]
    fn widen(self) -> i32 {
        i32::from(self)
    }

    #[inline(always)]
    fn wide_add(lhs: i32, rhs: i32) -> i32 {
        lhs.wrapping_add(rhs)
    }

    #[inline]
    fn from_i32_saturating(v: i32) -> Self {
        v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
    }
}

impl Element for i32 {
    type Wide = i64;

    const ZERO: Self = 0;

    #[inline(always)]
    fn lane_add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }

    #[inline(always)]
    fn lane_sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }

    #[inline(always)]
    fn lane_max(self, rhs: Self) -> Self {
        Ord::max(self, rhs)
    }

    #[inline(always)]
    fn lane_min(self, rhs: Self) -> Self {
        Ord::min(self, rhs)
    }

    #[inline(always)]
    fn widening_mul(self, rhs: Self) -> i64 {
        i64::from(self) * i64::from(rhs)
    }

    #[inline(always)]
    fn widen(self) -> i64 {
        i64::from(self)
    }

    #[inline(always)]
    fn wide_add(lhs: i64, rhs: i64) -> i64 {
        lhs.wrapping_add(rhs)
    }

    #[inline]
    fn from_i32_saturating(v: i32) -> Self {
        v
    }
}

impl Element for f32 {
    type Wide = f32;

    const ZERO: Self = 0.0;

    #[inline(always)]
    fn lane_add(self, rhs: Self) -> Self {
        self + rhs
    }

    #[inline(always)]
    fn lane_sub(self, rhs: Self) -> Self {
        self - rhs
    }

    #[inline(always)]
    fn lane_max(self, rhs: Self) -> Self {
        if self > rhs {
            self
        } else {
            rhs
        }
    }

    #[inline(always)]
    fn lane_min(self, rhs: Self) -> Self {
        if self < rhs {
            self
        } else {
            rhs
        }
    }

    #[inline(always)]
    fn widening_mul(self, rhs: Self) -> f32 {
        self * rhs
    }

    #[inline(always)]
    fn widen(self) -> f32 {
        self
    }

    #[inline(always)]
    fn wide_add(lhs: f32, rhs: f32) -> f32 {
        lhs + rhs
    }

    #[inline]
    fn from_i32_saturating(v: i32) -> Self {
        v as f32
    }
}
