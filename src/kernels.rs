//! Accumulator update and forward-pass kernels.
//!
//! Every kernel is generic over the backend `B` and instantiated once per
//! backend; the crate root re-exports versions bound to
//! [`Native`](crate::backend::Native). All of them work in place on
//! caller-owned arrays and never allocate.
//!
//! The kernels do not bounds-check offsets. Size relations that are known at
//! compile time (`N` a positive multiple of the chunk length, `N <= D`, the
//! weight table holding whole output blocks) fail the build instead. Runtime
//! offsets are the caller's obligation; see the `# Safety` sections, or use
//! [`checked`](crate::checked) for validated wrappers.

use crate::activation::Activation;
use crate::backend::Backend;
use crate::element::Element;

/// Adds `delta[oa..oa + N]` into `input_a` and `delta[ob..ob + N]` into
/// `input_b`.
///
/// # Safety
///
/// `oa + N <= D` and `ob + N <= D`.
#[inline]
pub unsafe fn add_to_all<B, T, const N: usize, const D: usize>(
    input_a: &mut [T; N],
    input_b: &mut [T; N],
    delta: &[T; D],
    oa: usize,
    ob: usize,
) where
    T: Element,
    B: Backend<T>,
{
    const { assert!(whole_chunks::<B, T, N>(), "N must be a multiple of the chunk length") };
    const { assert!(N <= D, "delta table shorter than the accumulator") };

    update::<B, T, N, D>(input_a, delta, oa, B::add);
    update::<B, T, N, D>(input_b, delta, ob, B::add);
}

/// Subtracts `delta[oa..oa + N]` from `input_a` and `delta[ob..ob + N]` from
/// `input_b`.
///
/// # Safety
///
/// `oa + N <= D` and `ob + N <= D`.
#[inline]
pub unsafe fn subtract_from_all<B, T, const N: usize, const D: usize>(
    input_a: &mut [T; N],
    input_b: &mut [T; N],
    delta: &[T; D],
    oa: usize,
    ob: usize,
) where
    T: Element,
    B: Backend<T>,
{
    const { assert!(whole_chunks::<B, T, N>(), "N must be a multiple of the chunk length") };
    const { assert!(N <= D, "delta table shorter than the accumulator") };

    update::<B, T, N, D>(input_a, delta, oa, B::subtract);
    update::<B, T, N, D>(input_b, delta, ob, B::subtract);
}

/// Replaces one feature with another in a single pass per accumulator:
/// `input_a[i] = input_a[i] - delta[oas + i] + delta[oaa + i]`, and the same
/// for `input_b` with `obs` and `oba`.
///
/// Equivalent to [`subtract_from_all`] followed by [`add_to_all`], reading
/// and writing each accumulator once instead of twice.
///
/// # Safety
///
/// Each of `oas`, `oaa`, `obs`, `oba` plus `N` is at most `D`.
#[inline]
#[allow(clippy::too_many_arguments)]
pub unsafe fn subtract_and_add_to_all<B, T, const N: usize, const D: usize>(
    input_a: &mut [T; N],
    input_b: &mut [T; N],
    delta: &[T; D],
    oas: usize,
    oaa: usize,
    obs: usize,
    oba: usize,
) where
    T: Element,
    B: Backend<T>,
{
    const { assert!(whole_chunks::<B, T, N>(), "N must be a multiple of the chunk length") };
    const { assert!(N <= D, "delta table shorter than the accumulator") };

    replace::<B, T, N, D>(input_a, delta, oas, oaa);
    replace::<B, T, N, D>(input_b, delta, obs, oba);
}

/// Forward pass of one layer over the two activated accumulators.
///
/// The weight table holds `W / (2 * N)` output blocks. Block `i` starts at
/// `i * 2 * N`: `N` weights for `input_a`, then `N` weights for `input_b`.
/// For each block the kernel computes
///
/// ```text
/// output[o + i] = bias[o + i]
///               + sum_j A(input_a[j]) * weight[i * 2N + j]
///               + sum_j A(input_b[j]) * weight[i * 2N + N + j]
/// ```
///
/// in the element's accumulation type. The accumulators are never written.
///
/// # Safety
///
/// `o + W / (2 * N)` is at most `bias.len()` and at most `output.len()`.
#[inline(never)]
pub unsafe fn activate_flatten_and_forward<B, A, T, const N: usize, const W: usize>(
    input_a: &[T; N],
    input_b: &[T; N],
    weight: &[T; W],
    bias: &[T],
    output: &mut [T::Wide],
    o: usize,
) where
    T: Element,
    B: Backend<T>,
    A: Activation<T>,
{
    const { assert!(whole_chunks::<B, T, N>(), "N must be a multiple of the chunk length") };
    const { assert!(W > 0 && W % (2 * N) == 0, "weight table must hold whole output blocks") };

    let outputs = W / (2 * N);
    crate::bound_check!(o + outputs <= bias.len());
    crate::bound_check!(o + outputs <= output.len());

    let mut stride = 0;
    for i in 0..outputs {
        let mut sum = B::zero();

        let mut j = 0;
        while j < N {
            let x = A::activate::<B>(B::load(input_a, j));
            let w = B::load(weight, stride + j);
            sum = B::add_wide(sum, B::multiply_and_add_adjacent(x, w));

            let x = A::activate::<B>(B::load(input_b, j));
            let w = B::load(weight, N + stride + j);
            sum = B::add_wide(sum, B::multiply_and_add_adjacent(x, w));

            j += B::CHUNK;
        }

        stride += 2 * N;

        let b = bias.get_unchecked(o + i).widen();
        *output.get_unchecked_mut(o + i) = T::wide_add(B::sum(sum), b);
    }
}

const fn whole_chunks<B: Backend<T>, T: Element, const N: usize>() -> bool {
    N > 0 && N % B::CHUNK == 0
}

#[inline(always)]
unsafe fn update<B, T, const N: usize, const D: usize>(
    input: &mut [T; N],
    delta: &[T; D],
    offset: usize,
    op: impl Fn(B::Vector, B::Vector) -> B::Vector,
) where
    T: Element,
    B: Backend<T>,
{
    let mut i = 0;
    while i < N {
        let acc = B::load(input, i);
        let d = B::load(delta, offset + i);
        B::store(op(acc, d), input, i);
        i += B::CHUNK;
    }
}

#[inline(always)]
unsafe fn replace<B, T, const N: usize, const D: usize>(
    input: &mut [T; N],
    delta: &[T; D],
    sub: usize,
    add: usize,
) where
    T: Element,
    B: Backend<T>,
{
    let mut i = 0;
    while i < N {
        let acc = B::load(input, i);
        let removed = B::load(delta, sub + i);
        let added = B::load(delta, add + i);
        B::store(B::add(B::subtract(acc, removed), added), input, i);
        i += B::CHUNK;
    }
}
