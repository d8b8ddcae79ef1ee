//! AVX-512 backend: 512-bit registers.
//!
//! 16-bit lane arithmetic needs `avx512bw`; everything else is `avx512f`.

use std::arch::x86_64::*;

use super::Backend;

const I16_LANES: usize = 32;
const I32_LANES: usize = 16;
const F32_LANES: usize = 16;

/// Even lanes of a 16 x 32-bit register.
const EVEN_LANES: __mmask16 = 0b0101_0101_0101_0101;

#[derive(Debug, Clone, Copy, Default)]
pub struct Avx512;

impl Backend<i16> for Avx512 {
    type Vector = __m512i;
    type Wide = __m512i;

    const CHUNK: usize = I16_LANES;

    #[inline(always)]
    fn zero() -> __m512i {
        unsafe { _mm512_setzero_si512() }
    }

    #[inline(always)]
    unsafe fn load(src: &[i16], offset: usize) -> __m512i {
        crate::bound_check!(offset + I16_LANES <= src.len());
        _mm512_loadu_si512(src.as_ptr().add(offset).cast())
    }

    #[inline(always)]
    unsafe fn store(v: __m512i, dst: &mut [i16], offset: usize) {
        crate::bound_check!(offset + I16_LANES <= dst.len());
        _mm512_storeu_si512(dst.as_mut_ptr().add(offset).cast(), v);
    }

    #[inline(always)]
    fn add(x: __m512i, y: __m512i) -> __m512i {
        unsafe { _mm512_add_epi16(x, y) }
    }

    #[inline(always)]
    fn subtract(x: __m512i, y: __m512i) -> __m512i {
        unsafe { _mm512_sub_epi16(x, y) }
    }

    #[inline(always)]
    fn multiply_and_add_adjacent(x: __m512i, y: __m512i) -> __m512i {
        unsafe { _mm512_madd_epi16(x, y) }
    }

    #[inline(always)]
    fn add_wide(x: __m512i, y: __m512i) -> __m512i {
        unsafe { _mm512_add_epi32(x, y) }
    }

    #[inline(always)]
    fn sum(v: __m512i) -> i32 {
        unsafe { _mm512_reduce_add_epi32(v) }
    }

    #[inline(always)]
    fn splat(v: i16) -> __m512i {
        unsafe { _mm512_set1_epi16(v) }
    }

    #[inline(always)]
    fn max(x: __m512i, y: __m512i) -> __m512i {
        unsafe { _mm512_max_epi16(x, y) }
    }

    #[inline(always)]
    fn min(x: __m512i, y: __m512i) -> __m512i {
        unsafe { _mm512_min_epi16(x, y) }
    }
}

impl Backend<i32> for Avx512 {
    type Vector = __m512i;
    type Wide = __m512i;

    const CHUNK: usize = I32_LANES;

    #[inline(always)]
    fn zero() -> __m512i {
        unsafe { _mm512_setzero_si512() }
    }

    #[inline(always)]
    unsafe fn load(src: &[i32], offset: usize) -> __m512i {
        crate::bound_check!(offset + I32_LANES <= src.len());
        _mm512_loadu_si512(src.as_ptr().add(offset).cast())
    }

    #[inline(always)]
    unsafe fn store(v: __m512i, dst: &mut [i32], offset: usize) {
        crate::bound_check!(offset + I32_LANES <= dst.len());
        _mm512_storeu_si512(dst.as_mut_ptr().add(offset).cast(), v);
    }

    #[inline(always)]
    fn add(x: __m512i, y: __m512i) -> __m512i {
        unsafe { _mm512_add_epi32(x, y) }
    }

    #[inline(always)]
    fn subtract(x: __m512i, y: __m512i) -> __m512i {
        unsafe { _mm512_sub_epi32(x, y) }
    }

    #[inline(always)]
    fn multiply_and_add_adjacent(x: __m512i, y: __m512i) -> __m512i {
        unsafe {
            let even = _mm512_mul_epi32(x, y);
            let odd = _mm512_mul_epi32(_mm512_srli_epi64::<32>(x), _mm512_srli_epi64::<32>(y));
            _mm512_add_epi64(even, odd)
        }
    }

    #[inline(always)]
    fn add_wide(x: __m512i, y: __m512i) -> __m512i {
        unsafe { _mm512_add_epi64(x, y) }
    }

    #[inline(always)]
    fn sum(v: __m512i) -> i64 {
        unsafe { _mm512_reduce_add_epi64(v) }
    }

    #[inline(always)]
    fn splat(v: i32) -> __m512i {
        unsafe { _mm512_set1_epi32(v) }
    }

    #[inline(always)]
    fn max(x: __m512i, y: __m512i) -> __m512i {
        unsafe { _mm512_max_epi32(x, y) }
    }

    #[inline(always)]
    fn min(x: __m512i, y: __m512i) -> __m512i {
        unsafe { _mm512_min_epi32(x, y) }
    }
}

impl Backend<f32> for Avx512 {
    type Vector = __m512;
    type Wide = __m512;

    const CHUNK: usize = F32_LANES;

    #[inline(always)]
    fn zero() -> __m512 {
        unsafe { _mm512_setzero_ps() }
    }

    #[inline(always)]
    unsafe fn load(src: &[f32], offset: usize) -> __m512 {
        crate::bound_check!(offset + F32_LANES <= src.len());
        _mm512_loadu_ps(src.as_ptr().add(offset))
    }

    #[inline(always)]
    unsafe fn store(v: __m512, dst: &mut [f32], offset: usize) {
        crate::bound_check!(offset + F32_LANES <= dst.len());
        _mm512_storeu_ps(dst.as_mut_ptr().add(offset), v);
    }

    #[inline(always)]
    fn add(x: __m512, y: __m512) -> __m512 {
        unsafe { _mm512_add_ps(x, y) }
    }

    #[inline(always)]
    fn subtract(x: __m512, y: __m512) -> __m512 {
        unsafe { _mm512_sub_ps(x, y) }
    }

    #[inline(always)]
    fn multiply_and_add_adjacent(x: __m512, y: __m512) -> __m512 {
        unsafe {
            let product = _mm512_mul_ps(x, y);
            let swapped = _mm512_permute_ps::<0b10_11_00_01>(product);
            _mm512_maskz_mov_ps(EVEN_LANES, _mm512_add_ps(product, swapped))
        }
    }

    #[inline(always)]
    fn add_wide(x: __m512, y: __m512) -> __m512 {
        unsafe { _mm512_add_ps(x, y) }
    }

    #[inline(always)]
    fn sum(v: __m512) -> f32 {
        unsafe { _mm512_reduce_add_ps(v) }
    }

    #[inline(always)]
    fn splat(v: f32) -> __m512 {
        unsafe { _mm512_set1_ps(v) }
    }

    #[inline(always)]
    fn max(x: __m512, y: __m512) -> __m512 {
        unsafe { _mm512_max_ps(x, y) }
    }

    #[inline(always)]
    fn min(x: __m512, y: __m512) -> __m512 {
        unsafe { _mm512_min_ps(x, y) }
    }
}
