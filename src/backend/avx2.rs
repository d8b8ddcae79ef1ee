//! AVX2 backend: 256-bit registers.
//!
//! `i16` products pair up through `vpmaddwd`. `i32` products are formed as
//! even/odd 64-bit halves through `vpmuldq`. `f32` pairs are summed by adding
//! the lane-swapped product and clearing the odd lanes.

use std::arch::x86_64::*;

use super::Backend;

const I16_LANES: usize = 16;
const I32_LANES: usize = 8;
const F32_LANES: usize = 8;

#[derive(Debug, Clone, Copy, Default)]
pub struct Avx2;

impl Backend<i16> for Avx2 {
    type Vector = __m256i;
    type Wide = __m256i;

    const CHUNK: usize = I16_LANES;

    #[inline(always)]
    fn zero() -> __m256i {
        unsafe { _mm256_setzero_si256() }
    }

    #[inline(always)]
    unsafe fn load(src: &[i16], offset: usize) -> __m256i {
        crate::bound_check!(offset + I16_LANES <= src.len());
        _mm256_loadu_si256(src.as_ptr().add(offset).cast())
    }

    #[inline(always)]
    unsafe fn store(v: __m256i, dst: &mut [i16], offset: usize) {
        crate::bound_check!(offset + I16_LANES <= dst.len());
        _mm256_storeu_si256(dst.as_mut_ptr().add(offset).cast(), v);
    }

    #[inline(always)]
    fn add(x: __m256i, y: __m256i) -> __m256i {
        unsafe { _mm256_add_epi16(x, y) }
    }

    #[inline(always)]
    fn subtract(x: __m256i, y: __m256i) -> __m256i {
        unsafe { _mm256_sub_epi16(x, y) }
    }

    #[inline(always)]
    fn multiply_and_add_adjacent(x: __m256i, y: __m256i) -> __m256i {
        unsafe { _mm256_madd_epi16(x, y) }
    }

    #[inline(always)]
    fn add_wide(x: __m256i, y: __m256i) -> __m256i {
        unsafe { _mm256_add_epi32(x, y) }
    }

    #[inline(always)]
    fn sum(v: __m256i) -> i32 {
        unsafe { hsum_epi32(v) }
    }

    #[inline(always)]
    fn splat(v: i16) -> __m256i {
        unsafe { _mm256_set1_epi16(v) }
    }

    #[inline(always)]
    fn max(x: __m256i, y: __m256i) -> __m256i {
        unsafe { _mm256_max_epi16(x, y) }
    }

    #[inline(always)]
    fn min(x: __m256i, y: __m256i) -> __m256i {
        unsafe { _mm256_min_epi16(x, y) }
    }
}

impl Backend<i32> for Avx2 {
    type Vector = __m256i;
    type Wide = __m256i;

    const CHUNK: usize = I32_LANES;

    #[inline(always)]
    fn zero() -> __m256i {
        unsafe { _mm256_setzero_si256() }
    }

    #[inline(always)]
    unsafe fn load(src: &[i32], offset: usize) -> __m256i {
        crate::bound_check!(offset + I32_LANES <= src.len());
        _mm256_loadu_si256(src.as_ptr().add(offset).cast())
    }

    #[inline(always)]
    unsafe fn store(v: __m256i, dst: &mut [i32], offset: usize) {
        crate::bound_check!(offset + I32_LANES <= dst.len());
        _mm256_storeu_si256(dst.as_mut_ptr().add(offset).cast(), v);
    }

    #[inline(always)]
    fn add(x: __m256i, y: __m256i) -> __m256i {
        unsafe { _mm256_add_epi32(x, y) }
    }

    #[inline(always)]
    fn subtract(x: __m256i, y: __m256i) -> __m256i {
        unsafe { _mm256_sub_epi32(x, y) }
    }

    #[inline(always)]
    fn multiply_and_add_adjacent(x: __m256i, y: __m256i) -> __m256i {
        unsafe {
            // vpmuldq reads the low (even) i32 of every 64-bit lane.
            let even = _mm256_mul_epi32(x, y);
            let odd = _mm256_mul_epi32(_mm256_srli_epi64::<32>(x), _mm256_srli_epi64::<32>(y));
            _mm256_add_epi64(even, odd)
        }
    }

    #[inline(always)]
    fn add_wide(x: __m256i, y: __m256i) -> __m256i {
        unsafe { _mm256_add_epi64(x, y) }
    }

    #[inline(always)]
    fn sum(v: __m256i) -> i64 {
        unsafe {
            let lo = _mm256_castsi256_si128(v);
            let hi = _mm256_extracti128_si256::<1>(v);
            let sum_128 = _mm_add_epi64(lo, hi);
            let upper = _mm_unpackhi_epi64(sum_128, sum_128);
            _mm_cvtsi128_si64(_mm_add_epi64(sum_128, upper))
        }
    }

    #[inline(always)]
    fn splat(v: i32) -> __m256i {
        unsafe { _mm256_set1_epi32(v) }
    }

    #[inline(always)]
    fn max(x: __m256i, y: __m256i) -> __m256i {
        unsafe { _mm256_max_epi32(x, y) }
    }

    #[inline(always)]
    fn min(x: __m256i, y: __m256i) -> __m256i {
        unsafe { _mm256_min_epi32(x, y) }
    }
}

impl Backend<f32> for Avx2 {
    type Vector = __m256;
    type Wide = __m256;

    const CHUNK: usize = F32_LANES;

    #[inline(always)]
    fn zero() -> __m256 {
        unsafe { _mm256_setzero_ps() }
    }

    #[inline(always)]
    unsafe fn load(src: &[f32], offset: usize) -> __m256 {
        crate::bound_check!(offset + F32_LANES <= src.len());
        _mm256_loadu_ps(src.as_ptr().add(offset))
    }

    #[inline(always)]
    unsafe fn store(v: __m256, dst: &mut [f32], offset: usize) {
        crate::bound_check!(offset + F32_LANES <= dst.len());
        _mm256_storeu_ps(dst.as_mut_ptr().add(offset), v);
    }

    #[inline(always)]
    fn add(x: __m256, y: __m256) -> __m256 {
        unsafe { _mm256_add_ps(x, y) }
    }

    #[inline(always)]
    fn subtract(x: __m256, y: __m256) -> __m256 {
        unsafe { _mm256_sub_ps(x, y) }
    }

    #[inline(always)]
    fn multiply_and_add_adjacent(x: __m256, y: __m256) -> __m256 {
        unsafe {
            let product = _mm256_mul_ps(x, y);
            let swapped = _mm256_permute_ps::<0b10_11_00_01>(product);
            let pairs = _mm256_add_ps(product, swapped);
            // Every pair sum now sits in both lanes; keep the even copy only.
            _mm256_blend_ps::<0b1010_1010>(pairs, _mm256_setzero_ps())
        }
    }

    #[inline(always)]
    fn add_wide(x: __m256, y: __m256) -> __m256 {
        unsafe { _mm256_add_ps(x, y) }
    }

    #[inline(always)]
    fn sum(v: __m256) -> f32 {
        unsafe {
            let lo = _mm256_castps256_ps128(v);
            let hi = _mm256_extractf128_ps::<1>(v);
            let sum_128 = _mm_add_ps(lo, hi);
            let sum_64 = _mm_add_ps(sum_128, _mm_movehl_ps(sum_128, sum_128));
            let sum_32 = _mm_add_ss(sum_64, _mm_shuffle_ps::<0b01>(sum_64, sum_64));
            _mm_cvtss_f32(sum_32)
        }
    }

    #[inline(always)]
    fn splat(v: f32) -> __m256 {
        unsafe { _mm256_set1_ps(v) }
    }

    #[inline(always)]
    fn max(x: __m256, y: __m256) -> __m256 {
        unsafe { _mm256_max_ps(x, y) }
    }

    #[inline(always)]
    fn min(x: __m256, y: __m256) -> __m256 {
        unsafe { _mm256_min_ps(x, y) }
    }
}

#[inline(always)]
unsafe fn hsum_epi32(v: __m256i) -> i32 {
    let lo = _mm256_castsi256_si128(v);
    let hi = _mm256_extracti128_si256::<1>(v);
    let sum_128 = _mm_add_epi32(lo, hi);
    let sum_64 = _mm_add_epi32(sum_128, _mm_unpackhi_epi64(sum_128, sum_128));
    let sum_32 = _mm_add_epi32(sum_64, _mm_shuffle_epi32::<0b00_00_00_01>(sum_64));
    _mm_cvtsi128_si32(sum_32)
}
