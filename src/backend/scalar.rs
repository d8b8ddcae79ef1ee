//! Scalar fallback: one lane per register.
//!
//! Used when no SIMD backend is enabled, and as the reference the SIMD
//! backends are tested against.

use super::Backend;
use crate::element::Element;

#[derive(Debug, Clone, Copy, Default)]
pub struct Scalar;

impl<T: Element> Backend<T> for Scalar {
    type Vector = T;
    type Wide = T::Wide;

    const CHUNK: usize = 1;

    #[inline(always)]
    fn zero() -> T::Wide {
        T::ZERO.widen()
    }

    #[inline(always)]
    unsafe fn load(src: &[T], offset: usize) -> T {
        crate::bound_check!(offset < src.len());
        *src.get_unchecked(offset)
    }

    #[inline(always)]
    unsafe fn store(v: T, dst: &mut [T], offset: usize) {
        crate::bound_check!(offset < dst.len());
        *dst.get_unchecked_mut(offset) = v;
    }

    #[inline(always)]
    fn add(x: T, y: T) -> T {
        x.lane_add(y)
    }

    #[inline(always)]
    fn subtract(x: T, y: T) -> T {
        x.lane_sub(y)
    }

    #[inline(always)]
    fn multiply_and_add_adjacent(x: T, y: T) -> T::Wide {
        // A single lane has no neighbour.
        x.widening_mul(y)
    }

    #[inline(always)]
    fn add_wide(x: T::Wide, y: T::Wide) -> T::Wide {
        T::wide_add(x, y)
    }

    #[inline(always)]
    fn sum(v: T::Wide) -> T::Wide {
        v
    }

    #[inline(always)]
    fn splat(v: T) -> T {
        v
    }

    #[inline(always)]
    fn max(x: T, y: T) -> T {
        x.lane_max(y)
    }

    #[inline(always)]
    fn min(x: T, y: T) -> T {
        x.lane_min(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_store_at_offset() {
        let src = [1i16, 2, 3, 4];
        let mut dst = [0i16; 4];
        unsafe {
            let v = <Scalar as Backend<i16>>::load(&src, 2);
            <Scalar as Backend<i16>>::store(v, &mut dst, 1);
        }
        assert_eq!(dst, [0, 3, 0, 0]);
    }

    #[test]
    fn test_multiply_widens() {
        let wide = <Scalar as Backend<i16>>::multiply_and_add_adjacent(300, 300);
        assert_eq!(wide, 90_000);
        assert_eq!(<Scalar as Backend<i16>>::sum(wide), 90_000);
    }

    #[test]
    fn test_zero_is_additive_identity() {
        let z = <Scalar as Backend<f32>>::zero();
        assert_eq!(<Scalar as Backend<f32>>::add_wide(z, 1.5), 1.5);
    }
}
