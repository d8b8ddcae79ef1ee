//! SIMD kernels for incrementally updated NNUE accumulators.
//!
//! Four operations over two paired accumulators ("perspectives") and a shared
//! table:
//! - [`add_to_all`] / [`subtract_from_all`]: a feature turns on / off
//! - [`subtract_and_add_to_all`]: one feature replaces another, one pass
//! - [`activate_flatten_and_forward`]: activation, concatenation and one
//!   affine layer fused into a single sweep
//!
//! The functions at the crate root run on [`backend::Native`], the widest
//! backend the build target enables (AVX-512, AVX2 or scalar). Selection is a
//! compile-time property of the target; build with e.g.
//! `RUSTFLAGS="-C target-cpu=native"` to get the SIMD paths. The
//! backend-generic versions live in [`kernels`], the bounds-checked ones in
//! [`checked`].
//!
//! Integer results are identical on every backend. Floating-point forward
//! passes may differ between backends by reduction-order rounding.

/// Asserts a slice bound in debug builds, or always with the `checked`
/// feature. Compiles to nothing otherwise.
macro_rules! bound_check {
    ($cond:expr) => {
        if cfg!(any(debug_assertions, feature = "checked")) {
            assert!($cond, "kernel access out of bounds: {}", stringify!($cond));
        }
    };
}
pub(crate) use bound_check;

pub mod accumulator;
pub mod activation;
pub mod backend;
pub mod checked;
pub mod element;
pub mod error;
pub mod kernels;

#[cfg(test)]
mod tests;

pub use accumulator::Accumulator;
pub use activation::{Activation, ClippedReLU, Identity, ReLU};
pub use backend::{Backend, BackendInfo, Native};
pub use element::Element;
pub use error::{KernelError, Operand};

/// [`kernels::add_to_all`] on the native backend.
///
/// # Safety
///
/// `oa + N <= D` and `ob + N <= D`.
#[inline(always)]
pub unsafe fn add_to_all<T, const N: usize, const D: usize>(
    input_a: &mut [T; N],
    input_b: &mut [T; N],
    delta: &[T; D],
    oa: usize,
    ob: usize,
) where
    T: Element,
    Native: Backend<T>,
{
    kernels::add_to_all::<Native, T, N, D>(input_a, input_b, delta, oa, ob);
}

/// [`kernels::subtract_from_all`] on the native backend.
///
/// # Safety
///
/// `oa + N <= D` and `ob + N <= D`.
#[inline(always)]
pub unsafe fn subtract_from_all<T, const N: usize, const D: usize>(
    input_a: &mut [T; N],
    input_b: &mut [T; N],
    delta: &[T; D],
    oa: usize,
    ob: usize,
) where
    T: Element,
    Native: Backend<T>,
{
    kernels::subtract_from_all::<Native, T, N, D>(input_a, input_b, delta, oa, ob);
}

/// [`kernels::subtract_and_add_to_all`] on the native backend.
///
/// # Safety
///
/// Each of `oas`, `oaa`, `obs`, `oba` plus `N` is at most `D`.
#[inline(always)]
#[allow(clippy::too_many_arguments)]
pub unsafe fn subtract_and_add_to_all<T, const N: usize, const D: usize>(
    input_a: &mut [T; N],
    input_b: &mut [T; N],
    delta: &[T; D],
    oas: usize,
    oaa: usize,
    obs: usize,
    oba: usize,
) where
    T: Element,
    Native: Backend<T>,
{
    kernels::subtract_and_add_to_all::<Native, T, N, D>(
        input_a, input_b, delta, oas, oaa, obs, oba,
    );
}

/// [`kernels::activate_flatten_and_forward`] on the native backend.
///
/// # Safety
///
/// `o + W / (2 * N)` is at most `bias.len()` and at most `output.len()`.
#[inline(always)]
pub unsafe fn activate_flatten_and_forward<A, T, const N: usize, const W: usize>(
    input_a: &[T; N],
    input_b: &[T; N],
    weight: &[T; W],
    bias: &[T],
    output: &mut [T::Wide],
    o: usize,
) where
    T: Element,
    A: Activation<T>,
    Native: Backend<T>,
{
    kernels::activate_flatten_and_forward::<Native, A, T, N, W>(
        input_a, input_b, weight, bias, output, o,
    );
}
