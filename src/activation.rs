//! Activation strategies for the fused forward pass.
//!
//! An activation is a type, not a value: `activate_flatten_and_forward` takes
//! it as a generic parameter, so the transform is inlined into the
//! multiply-reduce loop of whichever backend is compiled in. Each strategy is
//! written once against [`Backend`] and works on every backend.

use crate::backend::Backend;
use crate::element::Element;

/// Pure lanewise transform applied to accumulator values as they are read.
pub trait Activation<T: Element> {
    fn activate<B: Backend<T>>(x: B::Vector) -> B::Vector;
}

/// Passes values through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<T: Element> Activation<T> for Identity {
    #[inline(always)]
    fn activate<B: Backend<T>>(x: B::Vector) -> B::Vector {
        x
    }
}

/// `max(x, 0)`
#[derive(Debug, Clone, Copy, Default)]
pub struct ReLU;

impl<T: Element> Activation<T> for ReLU {
    #[inline(always)]
    fn activate<B: Backend<T>>(x: B::Vector) -> B::Vector {
        B::max(x, B::splat(T::ZERO))
    }
}

/// `clamp(x, 0, MAX)`, the usual quantised NNUE activation.
///
/// `MAX` saturates to the element range, so `ClippedReLU<255>` on `i16` clips
/// at 255 and `ClippedReLU<100_000>` on `i16` clips at `i16::MAX`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClippedReLU<const MAX: i32>;

impl<T: Element, const MAX: i32> Activation<T> for ClippedReLU<MAX> {
    #[inline(always)]
    fn activate<B: Backend<T>>(x: B::Vector) -> B::Vector {
        let lower = B::max(x, B::splat(T::ZERO));
        B::min(lower, B::splat(T::from_i32_saturating(MAX)))
    }
}
