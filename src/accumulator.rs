//! Paired accumulator state.
//!
//! Holds both perspectives of a first-layer activation cache side by side and
//! routes updates through the checked kernels on the native backend.

use crate::activation::Activation;
use crate::backend::{Backend, Native};
use crate::checked;
use crate::element::Element;
use crate::error::KernelError;

/// Both perspectives of an accumulator, aligned for full-width SIMD access.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C, align(64))]
pub struct Accumulator<T: Element, const N: usize> {
    /// First perspective
    pub a: [T; N],
    /// Second perspective
    pub b: [T; N],
}

impl<T: Element, const N: usize> Default for Accumulator<T, N> {
    fn default() -> Self {
        Self {
            a: [T::ZERO; N],
            b: [T::ZERO; N],
        }
    }
}

impl<T: Element, const N: usize> Accumulator<T, N>
where
    Native: Backend<T>,
{
    /// Create an accumulator with both perspectives set to `bias`
    #[must_use]
    pub fn new(bias: &[T; N]) -> Self {
        Self { a: *bias, b: *bias }
    }

    /// Add a feature: `delta[oa..]` into A, `delta[ob..]` into B
    #[inline]
    pub fn add<const D: usize>(
        &mut self,
        delta: &[T; D],
        oa: usize,
        ob: usize,
    ) -> Result<(), KernelError> {
        checked::add_to_all(&mut self.a, &mut self.b, delta, oa, ob)
    }

    /// Remove a feature
    #[inline]
    pub fn subtract<const D: usize>(
        &mut self,
        delta: &[T; D],
        oa: usize,
        ob: usize,
    ) -> Result<(), KernelError> {
        checked::subtract_from_all(&mut self.a, &mut self.b, delta, oa, ob)
    }

    /// Move a feature: remove `oas`/`obs` and add `oaa`/`oba` in one pass
    #[inline]
    pub fn subtract_and_add<const D: usize>(
        &mut self,
        delta: &[T; D],
        oas: usize,
        oaa: usize,
        obs: usize,
        oba: usize,
    ) -> Result<(), KernelError> {
        checked::subtract_and_add_to_all(&mut self.a, &mut self.b, delta, oas, oaa, obs, oba)
    }

    /// Run the next layer over the activated accumulator, A before B.
    #[inline]
    pub fn forward<A: Activation<T>, const W: usize>(
        &self,
        weight: &[T; W],
        bias: &[T],
        output: &mut [T::Wide],
        o: usize,
    ) -> Result<(), KernelError> {
        checked::activate_flatten_and_forward::<A, T, N, W>(
            &self.a, &self.b, weight, bias, output, o,
        )
    }

    /// The same accumulator with the perspectives exchanged.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self { a: self.b, b: self.a }
    }
}
